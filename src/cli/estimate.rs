//! Estimate command handler
//!
//! Resolves brand and model by name against the backend, pulls the price
//! table, and runs it through the estimator with the requested urgency.
//! The three-tier fallback guarantees an estimate even when the backend
//! has no price row for the issue.

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::pricing::{self, UrgencyLevel};
use clap::Args;

/// Estimate command arguments
#[derive(Args)]
pub struct EstimateArgs {
    /// Brand name (case-insensitive)
    #[arg(long, short = 'b')]
    pub brand: String,

    /// Model name or search text
    #[arg(long, short = 'm')]
    pub model: String,

    /// Issue code (see `repairhub issues`)
    #[arg(long, short = 'i')]
    pub issue: String,

    /// Urgency level: standard, faster, urgent
    #[arg(long, short = 'u')]
    pub urgency: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the estimate command
pub async fn run(args: EstimateArgs) -> Result<()> {
    let config = Config::load()?;
    let client = ApiClient::with_timeout(&config.backend.base_url, config.backend.timeout_secs)?;

    let urgency: UrgencyLevel = match &args.urgency {
        Some(value) => value.parse().map_err(Error::Config)?,
        None => config.default_urgency(),
    };

    let brands = client.brands().await?;
    let brand = brands
        .iter()
        .find(|b| b.name.eq_ignore_ascii_case(&args.brand))
        .ok_or_else(|| Error::NotFound(format!("brand '{}'", args.brand)))?;

    let models = client.models(brand.id, Some(&args.model)).await?;
    let model = models
        .iter()
        .find(|m| m.name.eq_ignore_ascii_case(&args.model))
        .or_else(|| models.first())
        .ok_or_else(|| Error::NotFound(format!("model '{}'", args.model)))?;

    let prices = client.model_prices(model.id).await?;
    let server_range = prices.get(&args.issue).copied();
    let from_server = server_range.is_some();

    let range = pricing::resolve_range(server_range, &args.issue);
    let estimate = pricing::estimate(&range, urgency);

    if args.json {
        let out = serde_json::json!({
            "brand": brand.name,
            "model": model.name,
            "issue": args.issue,
            "urgency": urgency,
            "range": range,
            "estimate": estimate,
            "from_server_price": from_server,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{} {} — {}", brand.name, model.name, args.issue);
    println!("Urgency:   {}", urgency);
    println!("Range:     {} – {}", range.min_price, range.max_price);
    println!("Estimate:  ~{}", estimate.mid_price);
    println!("Ready in:  ~{} h", estimate.eta_hours);
    if !from_server {
        println!("(no backend price for this issue; estimate uses the fallback table)");
    }

    Ok(())
}
