//! MAMS CLI
//!
//! Command-line client for the Military Asset Management System.
//!
//! ## Usage
//!
//! ```bash
//! mams login --username cmd1
//! mams summary --from 2024-01-01 --to 2024-03-31
//! mams transfers create --equipment-type 1 --from-base 2 --to-base 3 --quantity 10
//! mams logout
//! ```
//!
//! Credentials persist in `~/.mams/credentials.json` (override with
//! `--credentials` or `MAMS_CREDENTIALS_PATH`) so later invocations start
//! authenticated without logging in again.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod output;

use commands::dashboard::SummaryArgs;
use commands::records::{AssignmentCommand, ExpenditureCommand, PurchaseCommand, TransferCommand};
use context::{App, GlobalArgs};

#[derive(Parser, Debug)]
#[command(name = "mams")]
#[command(about = "MAMS - Military Asset Management System client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API base URL
    #[arg(long, global = true, env = "MAMS_API_URL")]
    api_url: Option<String>,

    /// Credential file
    #[arg(long, global = true, env = "MAMS_CREDENTIALS_PATH")]
    credentials: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and store credentials
    Login {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Password (prompted on stdin when omitted)
        #[arg(long, env = "MAMS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Clear stored credentials
    Logout,

    /// Show the current identity and the screens it can open
    Whoami,

    /// Exchange the refresh token for a new access token
    Refresh,

    /// Show the dashboard summary
    Summary(SummaryArgs),

    /// List bases
    Bases,

    /// List equipment types
    EquipmentTypes,

    /// Purchases of new equipment
    #[command(subcommand)]
    Purchases(PurchaseCommand),

    /// Transfers between bases
    #[command(subcommand)]
    Transfers(TransferCommand),

    /// Equipment assigned to personnel
    #[command(subcommand)]
    Assignments(AssignmentCommand),

    /// Equipment expended at a base
    #[command(subcommand)]
    Expenditures(ExpenditureCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging (stderr only, stdout carries command output)
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let app = App::new(GlobalArgs {
        api_url: cli.api_url,
        credentials: cli.credentials,
        json: cli.json,
    })?;

    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&app, &username, password).await
        }
        Commands::Logout => commands::auth::logout(&app).await,
        Commands::Whoami => commands::auth::whoami(&app).await,
        Commands::Refresh => commands::auth::refresh(&app).await,
        Commands::Summary(args) => commands::dashboard::summary(&app, args).await,
        Commands::Bases => commands::dashboard::bases(&app).await,
        Commands::EquipmentTypes => commands::dashboard::equipment_types(&app).await,
        Commands::Purchases(command) => commands::records::purchases(&app, command).await,
        Commands::Transfers(command) => commands::records::transfers(&app, command).await,
        Commands::Assignments(command) => commands::records::assignments(&app, command).await,
        Commands::Expenditures(command) => commands::records::expenditures(&app, command).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_summary_filters() {
        let cli = Cli::try_parse_from([
            "mams",
            "summary",
            "--base",
            "B1",
            "--from",
            "2024-01-01",
            "--json",
        ])
        .unwrap();

        assert!(cli.json);
        let Commands::Summary(args) = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(args.base.as_deref(), Some("B1"));
        assert_eq!(args.from, chrono::NaiveDate::from_ymd_opt(2024, 1, 1));
        assert!(args.to.is_none());
    }

    #[test]
    fn test_bad_date_rejected() {
        assert!(Cli::try_parse_from(["mams", "summary", "--from", "01/02/2024"]).is_err());
    }

    #[test]
    fn test_parse_transfer_create() {
        let cli = Cli::try_parse_from([
            "mams",
            "transfers",
            "create",
            "--equipment-type",
            "1",
            "--from-base",
            "2",
            "--to-base",
            "3",
            "--quantity",
            "10",
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Commands::Transfers(TransferCommand::Create { quantity: 10, .. })
        ));
    }

    #[test]
    fn test_login_requires_username() {
        assert!(Cli::try_parse_from(["mams", "login"]).is_err());
    }
}
