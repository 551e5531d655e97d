//! Record list and create commands

use std::sync::Arc;

use anyhow::Context;
use clap::Subcommand;
use mams_auth_core::Route;
use mams_client::ApiClient;
use mams_dashboard::{Assignments, Expenditures, Purchases, RecordKind, RecordLoader, Transfers};
use mams_types::{NewAssignment, NewExpenditure, NewPurchase, NewTransfer};
use serde::Serialize;

use crate::context::App;
use crate::output::{self, Row};

#[derive(Subcommand, Debug)]
pub enum PurchaseCommand {
    /// List purchases
    List,
    /// Record a purchase
    Create {
        #[arg(long)]
        equipment_type: String,
        #[arg(long)]
        base: String,
        #[arg(long)]
        quantity: u32,
        #[arg(long)]
        vendor: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TransferCommand {
    /// List transfers
    List,
    /// Transfer equipment between bases
    Create {
        #[arg(long)]
        equipment_type: String,
        #[arg(long)]
        from_base: String,
        #[arg(long)]
        to_base: String,
        #[arg(long)]
        quantity: u32,
    },
}

#[derive(Subcommand, Debug)]
pub enum AssignmentCommand {
    /// List assignments
    List,
    /// Assign equipment to a person
    Create {
        #[arg(long)]
        equipment_type: String,
        /// User ID of the receiving person
        #[arg(long)]
        assigned_to: String,
        /// Base issuing the equipment
        #[arg(long)]
        base: String,
        #[arg(long)]
        quantity: u32,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExpenditureCommand {
    /// List expenditures
    List,
    /// Record expended equipment
    Create {
        #[arg(long)]
        equipment_type: String,
        #[arg(long)]
        base: String,
        #[arg(long)]
        quantity: u32,
        #[arg(long)]
        notes: Option<String>,
    },
}

pub async fn purchases(app: &App, command: PurchaseCommand) -> anyhow::Result<()> {
    let form = match command {
        PurchaseCommand::List => None,
        PurchaseCommand::Create {
            equipment_type,
            base,
            quantity,
            vendor,
        } => Some(NewPurchase {
            equipment_type_id: equipment_type.into(),
            base_id: base.into(),
            quantity,
            vendor,
        }),
    };
    run::<Purchases>(app, Route::Purchases, form).await
}

pub async fn transfers(app: &App, command: TransferCommand) -> anyhow::Result<()> {
    let form = match command {
        TransferCommand::List => None,
        TransferCommand::Create {
            equipment_type,
            from_base,
            to_base,
            quantity,
        } => Some(NewTransfer {
            equipment_type_id: equipment_type.into(),
            from_base_id: from_base.into(),
            to_base_id: to_base.into(),
            quantity,
        }),
    };
    run::<Transfers>(app, Route::Transfers, form).await
}

pub async fn assignments(app: &App, command: AssignmentCommand) -> anyhow::Result<()> {
    let form = match command {
        AssignmentCommand::List => None,
        AssignmentCommand::Create {
            equipment_type,
            assigned_to,
            base,
            quantity,
        } => Some(NewAssignment {
            equipment_type_id: equipment_type.into(),
            assigned_to_id: assigned_to.into(),
            issuing_base_id: base.into(),
            quantity,
        }),
    };
    run::<Assignments>(app, Route::Dashboard, form).await
}

pub async fn expenditures(app: &App, command: ExpenditureCommand) -> anyhow::Result<()> {
    let form = match command {
        ExpenditureCommand::List => None,
        ExpenditureCommand::Create {
            equipment_type,
            base,
            quantity,
            notes,
        } => Some(NewExpenditure {
            equipment_type_id: equipment_type.into(),
            base_id: base.into(),
            quantity,
            notes,
        }),
    };
    run::<Expenditures>(app, Route::Dashboard, form).await
}

/// Open `route`, then list records or submit `form`.
async fn run<K>(app: &App, route: Route, form: Option<K::Form>) -> anyhow::Result<()>
where
    K: RecordKind,
    K::Record: Row + Serialize,
{
    app.open(route).await?;
    let loader: RecordLoader<K, ApiClient> = RecordLoader::new(Arc::clone(&app.client));

    match form {
        None => {
            let records = loader
                .load()
                .await
                .with_context(|| format!("failed to load {}", K::NAME))?;
            output::print_rows(&records, app.json)
        }
        Some(form) => {
            let created = loader
                .submit(&form)
                .await
                .with_context(|| format!("failed to create {} record", K::NAME))?;
            output::print_rows(std::slice::from_ref(&created), app.json)
        }
    }
}
