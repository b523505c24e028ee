//! repairhub CLI entry point
//!
//! Device-repair ordering client - CLI + app server

use repairhub::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
