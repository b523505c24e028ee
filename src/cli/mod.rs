//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod catalog;
pub mod centers;
pub mod config;
pub mod estimate;
pub mod history;
pub mod serve;
pub mod submit;
pub mod support;
pub mod track;

use clap::{Parser, Subcommand};

/// Device-repair ordering client
#[derive(Parser)]
#[command(name = "repairhub")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List device brands
    Brands(catalog::BrandsArgs),

    /// Search device models of a brand
    Models(catalog::ModelsArgs),

    /// List repair issue kinds
    Issues(catalog::IssuesArgs),

    /// Compute a price/time estimate
    Estimate(estimate::EstimateArgs),

    /// List service centers, ranked by distance when a position is known
    Centers(centers::CentersArgs),

    /// Submit a repair request
    Submit(submit::SubmitArgs),

    /// Check the status of submitted requests
    Track(track::TrackArgs),

    /// Send a support message for a request
    Support(support::SupportArgs),

    /// View and manage the local request log
    History(history::HistoryArgs),

    /// Start the app server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Brands(args) => catalog::run_brands(args).await,
        Commands::Models(args) => catalog::run_models(args).await,
        Commands::Issues(args) => catalog::run_issues(args).await,
        Commands::Estimate(args) => estimate::run(args).await,
        Commands::Centers(args) => centers::run(args).await,
        Commands::Submit(args) => submit::run(args).await,
        Commands::Track(args) => track::run(args).await,
        Commands::Support(args) => support::run(args).await,
        Commands::History(args) => history::run(args),
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}
