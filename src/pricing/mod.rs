//! Price and turnaround estimation
//!
//! Combines a backend-supplied price range with a client-side urgency level
//! into a single displayable estimate. When the backend has no range for an
//! issue, a static fallback table keyed by issue code steps in, and a generic
//! default covers codes unknown to both. The estimate is non-binding and is
//! recomputed whenever the selection changes; nothing here is persisted.

use crate::constants::pricing::{DEFAULT_HOURS, DEFAULT_MAX_PRICE, DEFAULT_MIN_PRICE};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// User-selected priority tier
///
/// Faster service costs more but takes less time: the price and time
/// multipliers move in opposite directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    /// Regular queue
    Standard,
    /// Prioritized within the day
    Faster,
    /// Jump the queue
    Urgent,
}

impl UrgencyLevel {
    /// Numeric level sent to the backend (1, 2, 3)
    pub fn level(self) -> u8 {
        match self {
            Self::Standard => 1,
            Self::Faster => 2,
            Self::Urgent => 3,
        }
    }

    /// Multiplier applied to the midpoint price
    pub fn price_multiplier(self) -> f64 {
        match self {
            Self::Standard => 1.0,
            Self::Faster => 1.1,
            Self::Urgent => 1.25,
        }
    }

    /// Multiplier applied to the base turnaround hours
    pub fn time_multiplier(self) -> f64 {
        match self {
            Self::Standard => 1.2,
            Self::Faster => 1.0,
            Self::Urgent => 0.8,
        }
    }
}

impl Default for UrgencyLevel {
    fn default() -> Self {
        Self::Standard
    }
}

impl std::fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Faster => write!(f, "faster"),
            Self::Urgent => write!(f, "urgent"),
        }
    }
}

impl std::str::FromStr for UrgencyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" | "1" => Ok(Self::Standard),
            "faster" | "2" => Ok(Self::Faster),
            "urgent" | "3" => Ok(Self::Urgent),
            _ => Err(format!("Unknown urgency level: {}", s)),
        }
    }
}

/// A price range with base turnaround, keyed by issue code
///
/// Invariant: `max_price >= min_price >= 0` and `hours > 0`. Backend rows
/// violating this are dropped at the API boundary before reaching here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min_price: f64,
    pub max_price: f64,
    pub hours: f64,
}

impl PriceRange {
    pub fn new(min_price: f64, max_price: f64, hours: f64) -> Self {
        Self {
            min_price,
            max_price,
            hours,
        }
    }
}

/// A derived price/time estimate shown to the user before submission
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Midpoint of the price range after the urgency multiplier
    pub mid_price: f64,
    /// Estimated turnaround in hours, never below 1
    pub eta_hours: u32,
}

/// Compute an estimate from a price range and urgency level
///
/// `mid_price = (min + max) / 2 * price_multiplier`;
/// `eta_hours = max(1, round(hours * time_multiplier))`.
pub fn estimate(range: &PriceRange, urgency: UrgencyLevel) -> Estimate {
    let mid_price = (range.min_price + range.max_price) / 2.0 * urgency.price_multiplier();
    let eta = (range.hours * urgency.time_multiplier()).round();
    let eta_hours = if eta < 1.0 { 1 } else { eta as u32 };

    Estimate {
        mid_price,
        eta_hours,
    }
}

/// Static fallback range for an issue code
///
/// Used when the backend returned no price row for the selected model/issue
/// pair. Returns `None` for codes the table does not know.
pub fn fallback_range(issue_code: &str) -> Option<PriceRange> {
    let range = match issue_code {
        "screen" => PriceRange::new(7000.0, 12000.0, 2.0),
        "battery" => PriceRange::new(4000.0, 7000.0, 1.0),
        "camera" => PriceRange::new(5000.0, 9000.0, 2.0),
        "speaker" => PriceRange::new(3000.0, 6000.0, 1.0),
        "mic" => PriceRange::new(3000.0, 6000.0, 1.0),
        "charging" => PriceRange::new(3500.0, 6500.0, 1.0),
        "button" => PriceRange::new(2500.0, 5000.0, 1.0),
        "software" => PriceRange::new(2000.0, 4000.0, 1.0),
        "water" => PriceRange::new(8000.0, 15000.0, 24.0),
        _ => return None,
    };
    Some(range)
}

/// Resolve the price range for an issue through the three-tier fallback
///
/// Server-supplied range, then the static per-code table, then the generic
/// default. The result is always defined; the estimate can never be blank.
pub fn resolve_range(server_range: Option<PriceRange>, issue_code: &str) -> PriceRange {
    if let Some(range) = server_range {
        return range;
    }

    if let Some(range) = fallback_range(issue_code) {
        warn!("No backend price for issue '{}', using fallback table", issue_code);
        return range;
    }

    warn!("Issue '{}' unknown to the fallback table, using generic default", issue_code);
    PriceRange::new(DEFAULT_MIN_PRICE, DEFAULT_MAX_PRICE, DEFAULT_HOURS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_urgency_levels() {
        assert_eq!(UrgencyLevel::Standard.level(), 1);
        assert_eq!(UrgencyLevel::Faster.level(), 2);
        assert_eq!(UrgencyLevel::Urgent.level(), 3);
    }

    #[test]
    fn test_urgency_from_str() {
        use std::str::FromStr;
        assert_eq!(UrgencyLevel::from_str("standard").unwrap(), UrgencyLevel::Standard);
        assert_eq!(UrgencyLevel::from_str("FASTER").unwrap(), UrgencyLevel::Faster);
        assert_eq!(UrgencyLevel::from_str("3").unwrap(), UrgencyLevel::Urgent);
        assert!(UrgencyLevel::from_str("yesterday").is_err());
    }

    #[test]
    fn test_screen_standard_from_fallback_table() {
        let range = resolve_range(None, "screen");
        let est = estimate(&range, UrgencyLevel::Standard);
        assert_relative_eq!(est.mid_price, 9500.0);
        // round(2 * 1.2) = 2
        assert_eq!(est.eta_hours, 2);
    }

    #[test]
    fn test_screen_urgent_from_fallback_table() {
        let range = resolve_range(None, "screen");
        let est = estimate(&range, UrgencyLevel::Urgent);
        assert_relative_eq!(est.mid_price, 11875.0);
        // round(2 * 0.8) = 2
        assert_eq!(est.eta_hours, 2);
    }

    #[test]
    fn test_unknown_issue_uses_generic_default() {
        let range = resolve_range(None, "flux_capacitor");
        let est = estimate(&range, UrgencyLevel::Standard);
        assert_relative_eq!(est.mid_price, 10500.0);
        assert_eq!(est.eta_hours, 1);
    }

    #[test]
    fn test_server_range_wins_over_table() {
        let server = PriceRange::new(1000.0, 2000.0, 3.0);
        let range = resolve_range(Some(server), "screen");
        assert_eq!(range, server);

        let est = estimate(&range, UrgencyLevel::Faster);
        assert_relative_eq!(est.mid_price, 1650.0);
        assert_eq!(est.eta_hours, 3);
    }

    #[test]
    fn test_eta_clamped_to_one_hour() {
        let range = PriceRange::new(100.0, 200.0, 0.25);
        for urgency in [UrgencyLevel::Standard, UrgencyLevel::Faster, UrgencyLevel::Urgent] {
            assert_eq!(estimate(&range, urgency).eta_hours, 1);
        }
    }

    #[test]
    fn test_time_and_price_multipliers_are_inverse() {
        let range = PriceRange::new(5000.0, 10000.0, 10.0);

        let standard = estimate(&range, UrgencyLevel::Standard);
        let urgent = estimate(&range, UrgencyLevel::Urgent);

        assert!(urgent.mid_price > standard.mid_price);
        assert!(urgent.eta_hours < standard.eta_hours);
    }

    #[test]
    fn test_fallback_table_known_codes() {
        assert_eq!(
            fallback_range("screen"),
            Some(PriceRange::new(7000.0, 12000.0, 2.0))
        );
        assert!(fallback_range("battery").is_some());
        assert!(fallback_range("motherboard_transplant").is_none());
    }
}
