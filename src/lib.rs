//! repairhub: device-repair ordering client
//!
//! A library and CLI for ordering device repairs against a REST backend:
//! browse the catalog (brands, models, issues), compute a price/time
//! estimate, rank service centers by distance, submit a repair request,
//! then track it and message support.
//!
//! ## Features
//!
//! - Haversine distance ranking of service centers, with graceful
//!   degradation to backend order when no position is available
//! - Three-tier price estimation (backend price, fallback table, default)
//! - Guarded request submission: incomplete drafts never hit the backend
//! - Catalog cache with supersession guards for out-of-order fetches
//! - Local app server (HTTP API for a map/form front-end) + CLI
//!
//! ## Quick Start
//!
//! ```rust
//! use repairhub::centers;
//! use repairhub::geo::Coordinates;
//! use repairhub::pricing::{self, UrgencyLevel};
//!
//! // Estimate a screen repair without a backend price row
//! let range = pricing::resolve_range(None, "screen");
//! let estimate = pricing::estimate(&range, UrgencyLevel::Standard);
//! println!("~{} in ~{} h", estimate.mid_price, estimate.eta_hours);
//!
//! // Rank centers by distance from the user
//! let user = Some(Coordinates::new(45.043, 41.97));
//! let ranked = centers::rank(&[], user);
//! assert!(ranked.is_empty());
//! ```

pub mod api;
pub mod catalog;
pub mod centers;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod geo;
pub mod history;
pub mod pricing;
pub mod request;
pub mod server;

// Re-export commonly used types
pub use api::{ApiClient, Brand, DeviceModel, Issue, ServiceCenter};
pub use config::Config;
pub use error::{Error, Result};
pub use geo::Coordinates;
pub use pricing::{Estimate, PriceRange, UrgencyLevel};
pub use request::RepairDraft;
