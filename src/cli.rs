use crate::services::api::DashboardAction;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command line interface for LoanLens.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "LoanLens",
    author,
    version,
    about = "Interactive dashboard client for loan-collections analytics APIs"
)]
pub struct Cli {
    /// Optional path to a configuration file (TOML, YAML, JSON).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Named profile to load (e.g. dev, staging, prod).
    #[arg(short, long)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run one dashboard query without the UI and print the JSON response.
    Fetch {
        #[arg(value_enum)]
        action: DashboardActionArg,

        /// Primary identifier (lender_id / agent_id / branch_id).
        #[arg(short, long, default_value = "")]
        id: String,

        /// Optional filter (bucket_filter / status_filter / date).
        #[arg(short, long, default_value = "")]
        filter: String,

        /// Override the configured API base URL.
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum DashboardActionArg {
    Lender,
    Agent,
    Manager,
    Hr,
}

impl From<DashboardActionArg> for DashboardAction {
    fn from(value: DashboardActionArg) -> Self {
        match value {
            DashboardActionArg::Lender => DashboardAction::Lender,
            DashboardActionArg::Agent => DashboardAction::Agent,
            DashboardActionArg::Manager => DashboardAction::Manager,
            DashboardActionArg::Hr => DashboardAction::Hr,
        }
    }
}
