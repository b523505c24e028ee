//! History command handler
//!
//! Lists and manages the local log of submitted requests.

use crate::error::Result;
use crate::history::RequestLog;
use clap::Args;

/// History command arguments
#[derive(Args)]
pub struct HistoryArgs {
    /// Remove one request from the log
    #[arg(long)]
    pub remove: Option<i64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the history command
pub fn run(args: HistoryArgs) -> Result<()> {
    let mut log = RequestLog::load()?;

    if let Some(id) = args.remove {
        match log.remove(id) {
            Some(_) => {
                log.save()?;
                println!("Removed request #{} from the log", id);
            }
            None => {
                eprintln!("Request #{} is not in the log", id);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(log.entries())?);
        return Ok(());
    }

    if log.is_empty() {
        println!("No submitted requests yet");
        return Ok(());
    }

    for entry in log.entries() {
        let status = entry.last_status.as_deref().unwrap_or("unknown");
        let center = entry.center_name.as_deref().unwrap_or("-");
        println!(
            "#{:<6} {}  {} {}  [{}]  at {}",
            entry.request_id,
            entry.submitted_at.format("%Y-%m-%d %H:%M"),
            entry.brand,
            entry.model,
            status,
            center,
        );
    }

    Ok(())
}
