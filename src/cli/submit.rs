//! Submit command handler
//!
//! Assembles a repair draft from the command line, verifies the selections
//! against the backend catalog, and submits. The draft never reaches the
//! backend while any precondition is unmet.

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::history::{RequestLog, SubmittedRequest};
use crate::pricing::UrgencyLevel;
use crate::request::{self, RepairDraft};
use clap::Args;

/// Submit command arguments
#[derive(Args)]
pub struct SubmitArgs {
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

    /// Service center id (see `repairhub centers`)
    #[arg(long, short = 'c')]
    pub center: i64,

    /// Your name
    #[arg(long)]
    pub name: String,

    /// Your phone number
    #[arg(long)]
    pub phone: String,

    /// Free-form problem description
    #[arg(long, short = 'd', default_value = "")]
    pub description: String,

    /// Accept the public offer terms
    #[arg(long)]
    pub agree: bool,

    /// Don't record the request in the local log
    #[arg(long)]
    pub no_history: bool,
}

/// Run the submit command
pub async fn run(args: SubmitArgs) -> Result<()> {
    let config = Config::load()?;
    let client = ApiClient::with_timeout(&config.backend.base_url, config.backend.timeout_secs)?;

    let urgency: UrgencyLevel = match &args.urgency {
        Some(value) => value.parse().map_err(Error::Config)?,
        None => config.default_urgency(),
    };

    // Resolve selections against the backend so the payload carries
    // canonical display names and a center that actually exists
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

    let centers = client.service_centers().await?;
    let center = centers
        .iter()
        .find(|c| c.id == args.center)
        .ok_or(Error::UnknownCenter(args.center))?;

    let mut draft = RepairDraft {
        brand_name: Some(brand.name.clone()),
        model_name: Some(model.name.clone()),
        issue_code: Some(args.issue.clone()),
        urgency,
        description: args.description.clone(),
        center_id: Some(center.id),
        customer_name: args.name.clone(),
        customer_phone: args.phone.clone(),
        agreed_to_offer: args.agree,
    };

    let id = request::submit(&client, &mut draft).await?;

    println!("Repair request created: #{}", id);
    println!("Center: {} — {}", center.name, center.address);
    println!("Track it with: repairhub track {}", id);

    if !args.no_history {
        if let Ok(mut log) = RequestLog::load() {
            log.add(
                SubmittedRequest::new(id, brand.name.clone(), model.name.clone())
                    .with_issue(args.issue)
                    .with_center(center.name.clone()),
            );
            let _ = log.save();
        }
    }

    Ok(())
}
