//! Purchase records and delivery payloads.

use serde::{Deserialize, Serialize};

use super::{Validate, ValidationErrors, flag, provided};

fn default_true() -> bool {
    true
}

/// Request body for recording a new purchase.
///
/// Deliverable purchases (the default) must carry a receiver and an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePurchaseRequest {
    #[serde(default)]
    pub reference_no: Option<String>,
    /// Referral code credited for this purchase.
    #[serde(default)]
    pub referral: Option<String>,
    #[serde(default = "default_true", deserialize_with = "flag")]
    pub deliverable: bool,
    #[serde(default)]
    pub receiver_name: Option<String>,
    #[serde(default)]
    pub receiver_phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Validate for CreatePurchaseRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require(
            "reference_no",
            provided(&self.reference_no),
            "No Reference Number Submitted",
        );
        if self.deliverable {
            errors
                .require("address", provided(&self.address), "No Address Submitted")
                .require(
                    "receiver_name",
                    provided(&self.receiver_name),
                    "No Name Submitted",
                )
                .require(
                    "receiver_phone",
                    provided(&self.receiver_phone),
                    "No Contact No. Submitted",
                );
        }
        errors.into_result()
    }
}

/// Returned with status 201 once the purchase row is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseCreated {
    pub message: String,
    /// Position of the new row among data rows (header excluded).
    #[serde(rename = "rowNumber")]
    pub row_number: u32,
}

/// Request body for replacing the delivery details of a purchase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAddressRequest {
    #[serde(default)]
    pub reference_no: Option<String>,
    #[serde(default)]
    pub receiver_name: Option<String>,
    #[serde(default)]
    pub receiver_phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Validate for UpdateAddressRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors
            .require(
                "reference_no",
                provided(&self.reference_no),
                "No Reference Number Submitted",
            )
            .require("address", provided(&self.address), "No Address Submitted")
            .require(
                "receiver_name",
                provided(&self.receiver_name),
                "No Name Submitted",
            )
            .require(
                "receiver_phone",
                provided(&self.receiver_phone),
                "No Contact No. Submitted",
            );
        errors.into_result()
    }
}

/// Every column of a purchase row, as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseDetail {
    pub reference_no: String,
    pub deliverable: String,
    pub sent: String,
    pub courier: String,
    pub tracking_no: String,
    pub remarks: String,
    pub pm_link: String,
    pub payment_id: String,
    pub paid: String,
    pub date_paid: String,
    pub mop: String,
    pub currency: String,
    pub net_amount: String,
    pub fee: String,
    pub payout_date: String,
    pub referral_code: String,
    pub referral_fee: String,
    pub received: String,
    pub order_details: String,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub notes: String,
    pub delivery_address: String,
    pub payer_name: String,
    pub payer_email: String,
    pub payer_phone: String,
    pub billing_address: String,
}

/// Shipment details of a sent purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingInfo {
    pub tracking_no: String,
    pub courier: String,
    pub sent: String,
}
