//! Dashboard summary and reference data commands

use std::sync::Arc;

use anyhow::bail;
use chrono::NaiveDate;
use clap::Args;
use mams_auth_core::Route;
use mams_dashboard::{DataSyncController, FetchOutcome};
use mams_types::FilterState;

use crate::context::App;
use crate::output;

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Base ID (base commanders always see their own base)
    #[arg(long)]
    pub base: Option<String>,

    /// Equipment type ID
    #[arg(long)]
    pub equipment_type: Option<String>,

    /// Start of the window (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// End of the window (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

impl SummaryArgs {
    fn filter(&self) -> FilterState {
        let mut filter = FilterState::new().with_dates(self.from, self.to);
        if let Some(base) = &self.base {
            filter = filter.with_base(base.as_str());
        }
        if let Some(equipment_type) = &self.equipment_type {
            filter = filter.with_equipment_type(equipment_type.as_str());
        }
        filter
    }
}

pub async fn summary(app: &App, args: SummaryArgs) -> anyhow::Result<()> {
    if let (Some(from), Some(to)) = (args.from, args.to) {
        if from > to {
            bail!("--from must not be after --to");
        }
    }
    let identity = app.open(Route::Dashboard).await?;

    let controller = DataSyncController::new(Arc::clone(&app.client)).with_identity(&identity);
    let outcome = controller.set_filter(args.filter()).await?;

    let view = controller.view();
    match (outcome, view.summary) {
        (FetchOutcome::Applied, Some(summary)) => output::print_summary(&summary, app.json),
        (FetchOutcome::Failed(signal), _) => bail!(signal),
        _ => bail!("dashboard summary was not loaded"),
    }
}

pub async fn bases(app: &App) -> anyhow::Result<()> {
    app.open(Route::Dashboard).await?;
    let controller = DataSyncController::new(Arc::clone(&app.client));
    let bases = controller.bases().await?;
    output::print_rows(bases.as_slice(), app.json)
}

pub async fn equipment_types(app: &App) -> anyhow::Result<()> {
    app.open(Route::Dashboard).await?;
    let controller = DataSyncController::new(Arc::clone(&app.client));
    let equipment_types = controller.equipment_types().await?;
    output::print_rows(equipment_types.as_slice(), app.json)
}
