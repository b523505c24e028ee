//! Track command handler
//!
//! Polls the backend for the status of repair requests. With no id, every
//! request in the local log is polled.

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::Result;
use crate::history::RequestLog;
use clap::Args;

/// Track command arguments
#[derive(Args)]
pub struct TrackArgs {
    /// Request id; omit to poll everything in the local log
    pub id: Option<i64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the track command
pub async fn run(args: TrackArgs) -> Result<()> {
    let config = Config::load()?;
    let client = ApiClient::with_timeout(&config.backend.base_url, config.backend.timeout_secs)?;

    let ids: Vec<i64> = match args.id {
        Some(id) => vec![id],
        None => {
            let log = RequestLog::load()?;
            if log.is_empty() {
                println!("No requests in the local log. Pass an id: repairhub track <id>");
                return Ok(());
            }
            log.entries().iter().map(|e| e.request_id).collect()
        }
    };

    let mut statuses = Vec::with_capacity(ids.len());
    for id in ids {
        match client.repair_status(id).await {
            Ok(status) => statuses.push(status),
            // One failed poll must not hide the others
            Err(e) => eprintln!("#{}: {}", id, e),
        }
    }

    // Remember what we saw for the next `history` listing
    if let Ok(mut log) = RequestLog::load() {
        let mut changed = false;
        for status in &statuses {
            changed |= log.update_status(status.id, &status.status);
        }
        if changed {
            let _ = log.save();
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    for status in statuses {
        println!(
            "#{:<6} {} {} — {}",
            status.id, status.brand, status.model, status.status
        );
    }

    Ok(())
}
