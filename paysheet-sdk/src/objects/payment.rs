//! Payment link, gateway token and verification payloads.

use serde::{Deserialize, Serialize};

use super::{Validate, ValidationErrors, provided};

/// Request body for creating a gateway payment link.
///
/// `amount` is in the smallest currency unit (centavos).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLinkRequest {
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub livemode: bool,
}

impl Validate for CreateLinkRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors
            .require(
                "amount",
                self.amount.is_some_and(|a| a > 0),
                "amount is required.",
            )
            .require(
                "description",
                provided(&self.description),
                "description is required.",
            );
        errors.into_result()
    }
}

/// A payment link as created on the gateway.
///
/// `reference_no` is the gateway transaction id; it is the key used by every
/// purchase route afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLinkResponse {
    pub reference_no: String,
    pub url: String,
    pub status: String,
    pub amount: i64,
    pub description: String,
    pub remarks: String,
    pub livemode: bool,
}

/// A freshly issued gateway API token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiTokenResponse {
    pub token: String,
    /// Unix timestamp (seconds) after which the token is no longer accepted.
    pub expired_at: i64,
}

/// Returned with status 400 when a payment is still waiting on the payer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnpaidResponse {
    pub message: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_link_defaults() {
        let request: CreateLinkRequest =
            serde_json::from_str(r#"{"amount": 10000, "description": "2x Mug"}"#).unwrap();
        assert_eq!(request.remarks, "");
        assert!(!request.livemode);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_link_reports_every_missing_field() {
        let request: CreateLinkRequest = serde_json::from_str(r#"{"amount": 0}"#).unwrap();
        let errors = request.validate().unwrap_err();
        let fields: Vec<_> = errors.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["amount", "description"]);
    }
}
