//! Centers command handler
//!
//! Lists service centers, ranked by distance when a position is available.

use crate::api::ApiClient;
use crate::centers::CenterSelection;
use crate::config::Config;
use crate::error::Result;
use crate::geo::locate::Locator;
use crate::geo::Coordinates;
use clap::Args;
use std::time::Duration;

/// Centers command arguments
#[derive(Args)]
pub struct CentersArgs {
    /// Latitude of your position
    #[arg(long, requires = "lng")]
    pub lat: Option<f64>,

    /// Longitude of your position
    #[arg(long, requires = "lat")]
    pub lng: Option<f64>,

    /// Use your current position (IP geolocation)
    #[arg(long, conflicts_with_all = ["lat", "lng"])]
    pub here: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the centers command
pub async fn run(args: CentersArgs) -> Result<()> {
    let config = Config::load()?;
    let client = ApiClient::with_timeout(&config.backend.base_url, config.backend.timeout_secs)?;

    let user_pos = if let (Some(lat), Some(lng)) = (args.lat, args.lng) {
        let pos = Coordinates::new(lat, lng);
        pos.validate()?;
        Some(pos)
    } else if args.here || config.location.default_here {
        let pos = Locator::new()
            .with_timeout(Duration::from_secs(config.location.timeout_secs))
            .position()
            .await;
        if pos.is_none() {
            eprintln!("Could not determine your position; listing centers unranked");
        }
        pos
    } else {
        None
    };

    let mut selection = CenterSelection::new();
    selection.load(client.service_centers().await?);
    selection.set_user_pos(user_pos);

    let ranked = selection.ranked();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(());
    }

    if ranked.is_empty() {
        println!("No service centers available");
        return Ok(());
    }

    for row in ranked {
        match row.distance_km {
            Some(km) => println!(
                "{:4}  {:6.1} km  {} — {}",
                row.center.id, km, row.center.name, row.center.address
            ),
            None => println!(
                "{:4}  {} — {}",
                row.center.id, row.center.name, row.center.address
            ),
        }
    }

    Ok(())
}
