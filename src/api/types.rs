//! Wire types for the repair backend
//!
//! Raw rows mirror the backend's JSON as loosely as it actually arrives
//! (numbers that may be strings, list envelopes that may or may not be
//! paginated). Normalization into domain types happens here, once, so the
//! rest of the crate only sees well-formed values.

use crate::geo::Coordinates;
use crate::pricing::PriceRange;
use serde::{Deserialize, Serialize};

/// A device brand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: i64,
    pub name: String,
}

/// A device model belonging to a brand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceModel {
    pub id: i64,
    pub name: String,
    pub brand: i64,
}

/// A repair issue kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: i64,
    pub code: String,
    pub name: String,
}

/// A physical repair location with geocoordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCenter {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub location: Coordinates,
}

/// List responses arrive either as a bare array or wrapped in a pagination
/// envelope with a `results` field; both shapes are accepted uniformly.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Bare(Vec<T>),
    Paginated { results: Vec<T> },
}

impl<T> ListEnvelope<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) => items,
            Self::Paginated { results } => results,
        }
    }
}

/// A numeric field that the backend serializes as either a number or a string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Num(f64),
    Text(String),
}

impl RawNumber {
    /// Coerce to a finite f64, or `None` for unparseable/non-finite values
    pub fn as_finite(&self) -> Option<f64> {
        let value = match self {
            Self::Num(n) => *n,
            Self::Text(s) => s.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

/// Raw price row as returned by `GET /model-prices/`
#[derive(Debug, Clone, Deserialize)]
pub struct ModelPriceRow {
    pub id: i64,
    pub device_model: i64,
    pub issue: Issue,
    pub price_min: RawNumber,
    pub price_max: RawNumber,
    pub hours: RawNumber,
}

impl ModelPriceRow {
    /// Normalize to an issue-code keyed price range
    ///
    /// Returns `None` when any numeric field fails to coerce, or when the
    /// coerced values violate `max >= min >= 0` / `hours > 0`. Callers drop
    /// such rows instead of failing the whole fetch.
    pub fn normalize(&self) -> Option<(String, PriceRange)> {
        let min_price = self.price_min.as_finite()?;
        let max_price = self.price_max.as_finite()?;
        let hours = self.hours.as_finite()?;

        if min_price < 0.0 || max_price < min_price || hours <= 0.0 {
            return None;
        }

        Some((
            self.issue.code.clone(),
            PriceRange::new(min_price, max_price, hours),
        ))
    }
}

/// Raw service center row as returned by `GET /servicecenters/`
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceCenterRow {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

impl ServiceCenterRow {
    /// Normalize to a domain center, dropping rows with out-of-range coordinates
    pub fn normalize(self) -> Option<ServiceCenter> {
        let location = Coordinates::new(self.lat, self.lng);
        if !location.in_range() {
            return None;
        }
        Some(ServiceCenter {
            id: self.id,
            name: self.name,
            address: self.address,
            location,
        })
    }
}

/// Body of `POST /repairs/`
///
/// Brand and model are sent as display names, not ids, per the backend
/// contract; urgency is the numeric level.
#[derive(Debug, Clone, Serialize)]
pub struct NewRepairRequest {
    pub brand: String,
    pub model: String,
    pub issue: String,
    pub urgency: u8,
    pub description: String,
    pub center: i64,
    pub customer_name: String,
    pub customer_phone: String,
    pub agree_to_offer: bool,
}

/// Response of `POST /repairs/`
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedRepair {
    pub id: i64,
}

/// Response of `GET /repairs/<id>/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairStatus {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub status: String,
    #[serde(default)]
    pub center: Option<i64>,
}

/// Body of `POST /support-messages/`
#[derive(Debug, Clone, Serialize)]
pub struct SupportMessage {
    pub repair_request: i64,
    pub text: String,
}

/// Acknowledgement of `POST /support-messages/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportAck {
    #[serde(default)]
    pub id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_accepts_bare_array() {
        let json = r#"[{"id": 1, "name": "Apple"}]"#;
        let env: ListEnvelope<Brand> = serde_json::from_str(json).unwrap();
        let brands = env.into_vec();
        assert_eq!(brands.len(), 1);
        assert_eq!(brands[0].name, "Apple");
    }

    #[test]
    fn test_envelope_accepts_results_object() {
        let json = r#"{"count": 2, "results": [{"id": 1, "name": "Apple"}, {"id": 2, "name": "Samsung"}]}"#;
        let env: ListEnvelope<Brand> = serde_json::from_str(json).unwrap();
        let brands = env.into_vec();
        assert_eq!(brands.len(), 2);
        assert_eq!(brands[1].name, "Samsung");
    }

    #[test]
    fn test_raw_number_coercion() {
        let n: RawNumber = serde_json::from_str("7000").unwrap();
        assert_eq!(n.as_finite(), Some(7000.0));

        let s: RawNumber = serde_json::from_str(r#""7000.50""#).unwrap();
        assert_eq!(s.as_finite(), Some(7000.5));

        let padded: RawNumber = serde_json::from_str(r#"" 12000 ""#).unwrap();
        assert_eq!(padded.as_finite(), Some(12000.0));

        let garbage: RawNumber = serde_json::from_str(r#""free""#).unwrap();
        assert_eq!(garbage.as_finite(), None);

        let inf: RawNumber = serde_json::from_str(r#""inf""#).unwrap();
        assert_eq!(inf.as_finite(), None);
    }

    #[test]
    fn test_price_row_normalization() {
        let json = r#"{
            "id": 10,
            "device_model": 3,
            "issue": {"id": 1, "code": "screen", "name": "Screen replacement"},
            "price_min": "7000",
            "price_max": 12000,
            "hours": "2"
        }"#;
        let row: ModelPriceRow = serde_json::from_str(json).unwrap();
        let (code, range) = row.normalize().unwrap();
        assert_eq!(code, "screen");
        assert_eq!(range, PriceRange::new(7000.0, 12000.0, 2.0));
    }

    #[test]
    fn test_price_row_dropped_when_unparseable() {
        let json = r#"{
            "id": 10,
            "device_model": 3,
            "issue": {"id": 1, "code": "screen", "name": "Screen replacement"},
            "price_min": "n/a",
            "price_max": 12000,
            "hours": 2
        }"#;
        let row: ModelPriceRow = serde_json::from_str(json).unwrap();
        assert!(row.normalize().is_none());
    }

    #[test]
    fn test_price_row_dropped_when_inverted_or_negative() {
        let inverted = ModelPriceRow {
            id: 1,
            device_model: 1,
            issue: Issue {
                id: 1,
                code: "screen".to_string(),
                name: "Screen".to_string(),
            },
            price_min: RawNumber::Num(12000.0),
            price_max: RawNumber::Num(7000.0),
            hours: RawNumber::Num(2.0),
        };
        assert!(inverted.normalize().is_none());

        let negative = ModelPriceRow {
            price_min: RawNumber::Num(-1.0),
            price_max: RawNumber::Num(100.0),
            ..inverted
        };
        assert!(negative.normalize().is_none());
    }

    #[test]
    fn test_center_row_normalization() {
        let row = ServiceCenterRow {
            id: 5,
            name: "Downtown".to_string(),
            address: "1 Main St".to_string(),
            lat: 45.043,
            lng: 41.97,
        };
        let center = row.normalize().unwrap();
        assert_eq!(center.id, 5);
        assert_eq!(center.location.lat, 45.043);
    }

    #[test]
    fn test_center_row_dropped_when_off_the_map() {
        let row = ServiceCenterRow {
            id: 5,
            name: "Nowhere".to_string(),
            address: "".to_string(),
            lat: 120.0,
            lng: 0.0,
        };
        assert!(row.normalize().is_none());
    }

    #[test]
    fn test_new_repair_request_serialization() {
        let payload = NewRepairRequest {
            brand: "Apple".to_string(),
            model: "iPhone 13".to_string(),
            issue: "screen".to_string(),
            urgency: 2,
            description: "cracked glass".to_string(),
            center: 5,
            customer_name: "Ann".to_string(),
            customer_phone: "+7 999 123-45-67".to_string(),
            agree_to_offer: true,
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["brand"], "Apple");
        assert_eq!(json["urgency"], 2);
        assert_eq!(json["agree_to_offer"], true);
    }
}
