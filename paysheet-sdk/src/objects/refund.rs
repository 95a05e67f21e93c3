//! Refund request payloads.

use serde::{Deserialize, Serialize};

use super::{Validate, ValidationErrors, provided};

/// Reason a refund is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundKind {
    Cancellation,
    BackOrder,
    Defective,
    Deceptive,
    Counterfeit,
    Missing,
    Expired,
}

impl RefundKind {
    pub const ALL: [RefundKind; 7] = [
        RefundKind::Cancellation,
        RefundKind::BackOrder,
        RefundKind::Defective,
        RefundKind::Deceptive,
        RefundKind::Counterfeit,
        RefundKind::Missing,
        RefundKind::Expired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RefundKind::Cancellation => "cancellation",
            RefundKind::BackOrder => "back_order",
            RefundKind::Defective => "defective",
            RefundKind::Deceptive => "deceptive",
            RefundKind::Counterfeit => "counterfeit",
            RefundKind::Missing => "missing",
            RefundKind::Expired => "expired",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

fn default_kind() -> String {
    RefundKind::Cancellation.as_str().to_owned()
}

/// Request body for filing a refund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRefundRequest {
    #[serde(default)]
    pub reference_no: Option<String>,
    /// The customer's reason, in their own words.
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_kind", rename = "type")]
    pub kind: String,
    /// Mode of payment for the payout (e.g. bank, e-wallet).
    #[serde(default)]
    pub mop: Option<String>,
    /// Account details for the payout.
    #[serde(default)]
    pub mop_details: Option<String>,
}

impl CreateRefundRequest {
    pub fn refund_kind(&self) -> Option<RefundKind> {
        RefundKind::parse(&self.kind)
    }
}

impl Validate for CreateRefundRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors
            .require(
                "reference_no",
                provided(&self.reference_no),
                "No Reference No Submitted",
            )
            .require("message", provided(&self.message), "No Message Submitted")
            .require("email", provided(&self.email), "No Email Submitted")
            .require("mop", provided(&self.mop), "No Mode Of Payment Submitted")
            .require(
                "mop_details",
                provided(&self.mop_details),
                "No Payout Details Submitted",
            )
            .require(
                "type",
                self.refund_kind().is_some(),
                "Refund Type Submitted is Invalid!",
            );
        errors.into_result()
    }
}
