//! Repair request draft and submission flow
//!
//! The draft is transient client-side form state. Submission is guarded:
//! an incomplete draft never reaches the backend. On success the contact
//! fields reset so the form comes back clean; on failure everything is
//! kept so the user can fix and retry.

use crate::api::{ApiClient, NewRepairRequest};
use crate::error::{Error, Result};
use crate::pricing::UrgencyLevel;
use serde::{Deserialize, Serialize};
use tracing::info;

/// The in-progress, unsubmitted repair request form state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepairDraft {
    pub brand_name: Option<String>,
    pub model_name: Option<String>,
    pub issue_code: Option<String>,
    #[serde(default)]
    pub urgency: UrgencyLevel,
    #[serde(default)]
    pub description: String,
    pub center_id: Option<i64>,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub agreed_to_offer: bool,
}

impl RepairDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// All unmet submission preconditions, in display order
    ///
    /// Empty means the draft is ready to submit.
    pub fn validate(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        if self.brand_name.is_none() {
            missing.push("brand is not selected");
        }
        if self.model_name.is_none() {
            missing.push("model is not selected");
        }
        if self.center_id.is_none() {
            missing.push("service center is not selected");
        }
        if !valid_name(&self.customer_name) {
            missing.push("customer name needs at least 2 characters");
        }
        if !valid_phone(&self.customer_phone) {
            missing.push("customer phone needs at least 7 digits");
        }
        if !self.agreed_to_offer {
            missing.push("offer agreement is not accepted");
        }

        missing
    }

    pub fn is_submittable(&self) -> bool {
        self.validate().is_empty()
    }

    /// Reset the transient contact fields after a successful submission
    ///
    /// Center, brand, model, and issue selections persist so the user can
    /// file another request for the same device without re-selecting.
    pub fn clear_transient(&mut self) {
        self.customer_name.clear();
        self.customer_phone.clear();
        self.description.clear();
        self.agreed_to_offer = false;
    }

    /// Assemble the wire payload; `None` while preconditions are unmet
    fn to_payload(&self) -> Option<NewRepairRequest> {
        Some(NewRepairRequest {
            brand: self.brand_name.clone()?,
            model: self.model_name.clone()?,
            issue: self.issue_code.clone().unwrap_or_default(),
            urgency: self.urgency.level(),
            description: self.description.clone(),
            center: self.center_id?,
            customer_name: self.customer_name.clone(),
            customer_phone: self.customer_phone.clone(),
            agree_to_offer: self.agreed_to_offer,
        })
    }
}

/// Name must carry at least 2 non-whitespace characters
fn valid_name(name: &str) -> bool {
    name.chars().filter(|c| !c.is_whitespace()).count() >= 2
}

/// Phone must carry at least 7 digits after stripping every non-digit
fn valid_phone(phone: &str) -> bool {
    phone.chars().filter(char::is_ascii_digit).count() >= 7
}

/// Submit a draft, returning the backend-assigned request id
///
/// When any precondition is unmet this returns an error without making a
/// backend call. On backend failure the draft is left untouched and the
/// backend message is surfaced verbatim.
pub async fn submit(client: &ApiClient, draft: &mut RepairDraft) -> Result<i64> {
    let missing = draft.validate();
    if !missing.is_empty() {
        return Err(Error::DraftIncomplete(missing.join("; ")));
    }

    let payload = draft
        .to_payload()
        .ok_or_else(|| Error::DraftIncomplete("selection is incomplete".to_string()))?;

    let created = client.create_repair(&payload).await?;

    info!("Repair request {} created", created.id);
    draft.clear_transient();
    Ok(created.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ready_draft() -> RepairDraft {
        RepairDraft {
            brand_name: Some("Apple".to_string()),
            model_name: Some("iPhone 13".to_string()),
            issue_code: Some("screen".to_string()),
            urgency: UrgencyLevel::Faster,
            description: "cracked glass".to_string(),
            center_id: Some(5),
            customer_name: "Ann".to_string(),
            customer_phone: "+7 (999) 123-45-67".to_string(),
            agreed_to_offer: true,
        }
    }

    #[test]
    fn test_valid_name_counts_non_whitespace() {
        assert!(valid_name("Ann"));
        assert!(valid_name("A n"));
        assert!(!valid_name(" a "));
        assert!(!valid_name("   "));
        assert!(!valid_name(""));
    }

    #[test]
    fn test_valid_phone_counts_digits_only() {
        assert!(valid_phone("1234567"));
        assert!(valid_phone("+7 (999) 123-45-67"));
        assert!(!valid_phone("123-456"));
        assert!(!valid_phone("call me maybe"));
    }

    #[test]
    fn test_ready_draft_is_submittable() {
        assert!(ready_draft().is_submittable());
    }

    #[test]
    fn test_validate_lists_every_unmet_precondition() {
        let draft = RepairDraft::new();
        let missing = draft.validate();
        assert_eq!(missing.len(), 6);

        let mut partial = ready_draft();
        partial.customer_phone = "12345".to_string();
        partial.agreed_to_offer = false;
        let missing = partial.validate();
        assert_eq!(missing.len(), 2);
    }

    #[tokio::test]
    async fn test_short_phone_blocks_submission_without_backend_call() {
        let server = MockServer::start().await;
        // Any request reaching the backend is a test failure
        Mock::given(method("POST"))
            .and(path("/repairs/"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": 1})))
            .expect(0)
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let mut draft = ready_draft();
        draft.customer_phone = "123456".to_string();

        let err = submit(&client, &mut draft).await.unwrap_err();
        assert!(matches!(err, Error::DraftIncomplete(_)));
        // Draft untouched
        assert_eq!(draft.customer_name, "Ann");
    }

    #[tokio::test]
    async fn test_success_resets_transient_fields_only() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repairs/"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": 42})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let mut draft = ready_draft();

        let id = submit(&client, &mut draft).await.unwrap();
        assert_eq!(id, 42);

        assert!(draft.customer_name.is_empty());
        assert!(draft.customer_phone.is_empty());
        assert!(draft.description.is_empty());
        assert!(!draft.agreed_to_offer);

        assert_eq!(draft.center_id, Some(5));
        assert_eq!(draft.brand_name.as_deref(), Some("Apple"));
        assert_eq!(draft.model_name.as_deref(), Some("iPhone 13"));
        assert_eq!(draft.issue_code.as_deref(), Some("screen"));
    }

    #[tokio::test]
    async fn test_backend_failure_preserves_draft() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repairs/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "detail": "Phone number already blacklisted"
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let mut draft = ready_draft();
        let before = draft.clone();

        let err = submit(&client, &mut draft).await.unwrap_err();
        assert_eq!(err.to_string(), "Phone number already blacklisted");

        assert_eq!(draft.customer_name, before.customer_name);
        assert_eq!(draft.customer_phone, before.customer_phone);
        assert_eq!(draft.description, before.description);
        assert_eq!(draft.agreed_to_offer, before.agreed_to_offer);
    }
}
