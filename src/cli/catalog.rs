//! Catalog listing commands
//!
//! Lists brands, models, and issue kinds straight from the backend.

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::Result;
use clap::Args;

/// Brands command arguments
#[derive(Args)]
pub struct BrandsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Models command arguments
#[derive(Args)]
pub struct ModelsArgs {
    /// Brand id to search under
    #[arg(long, short = 'b')]
    pub brand: i64,

    /// Search text
    #[arg(long, short = 'q')]
    pub query: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Issues command arguments
#[derive(Args)]
pub struct IssuesArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

fn client() -> Result<ApiClient> {
    let config = Config::load()?;
    ApiClient::with_timeout(&config.backend.base_url, config.backend.timeout_secs)
}

/// Run the brands command
pub async fn run_brands(args: BrandsArgs) -> Result<()> {
    let brands = client()?.brands().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&brands)?);
        return Ok(());
    }

    if brands.is_empty() {
        println!("No brands available");
        return Ok(());
    }

    for brand in brands {
        println!("{:4}  {}", brand.id, brand.name);
    }
    Ok(())
}

/// Run the models command
pub async fn run_models(args: ModelsArgs) -> Result<()> {
    let models = client()?.models(args.brand, args.query.as_deref()).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&models)?);
        return Ok(());
    }

    if models.is_empty() {
        println!("No models matched");
        return Ok(());
    }

    for model in models {
        println!("{:4}  {}", model.id, model.name);
    }
    Ok(())
}

/// Run the issues command
pub async fn run_issues(args: IssuesArgs) -> Result<()> {
    let issues = client()?.issues().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&issues)?);
        return Ok(());
    }

    if issues.is_empty() {
        println!("No issue kinds available");
        return Ok(());
    }

    for issue in issues {
        println!("{:12}  {}", issue.code, issue.name);
    }
    Ok(())
}
