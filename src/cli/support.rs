//! Support command handler
//!
//! Sends a support message attached to a submitted repair request.

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::Result;
use clap::Args;

/// Support command arguments
#[derive(Args)]
pub struct SupportArgs {
    /// Request id the message belongs to
    pub id: i64,

    /// Message text
    pub text: Vec<String>,
}

/// Run the support command
pub async fn run(args: SupportArgs) -> Result<()> {
    let config = Config::load()?;
    let client = ApiClient::with_timeout(&config.backend.base_url, config.backend.timeout_secs)?;

    let text = args.text.join(" ");
    if text.trim().is_empty() {
        eprintln!("Error: Message text is empty");
        std::process::exit(1);
    }

    client.send_support_message(args.id, &text).await?;
    println!("Message sent for request #{}", args.id);

    Ok(())
}
