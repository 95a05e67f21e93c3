//! Referral program payloads.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Validate, ValidationErrors, flag, provided};

/// How a referrer's commission is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferralType {
    /// A flat amount per purchase.
    Fixed,
    /// A percentage of the purchase's net amount.
    Percent,
}

impl ReferralType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferralType::Fixed => "fixed",
            ReferralType::Percent => "percent",
        }
    }

    /// Strict parse used when accepting new referral accounts.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "fixed" => Some(ReferralType::Fixed),
            "percent" => Some(ReferralType::Percent),
            _ => None,
        }
    }
}

fn default_type() -> String {
    ReferralType::Percent.as_str().to_owned()
}

fn default_amount() -> Decimal {
    Decimal::TEN
}

/// Request body for joining the referral program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReferralRequest {
    /// Becomes the referral code.
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_type", rename = "type")]
    pub kind: String,
    #[serde(default = "default_amount")]
    pub amount: Decimal,
    #[serde(default, deserialize_with = "flag")]
    pub active: bool,
}

impl CreateReferralRequest {
    pub fn referral_type(&self) -> Option<ReferralType> {
        ReferralType::parse(&self.kind)
    }
}

impl Validate for CreateReferralRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors
            .require("username", provided(&self.username), "No Username Submitted")
            .require("email", provided(&self.email), "No Email Submitted")
            .require("name", provided(&self.name), "No Name Submitted")
            .require(
                "type",
                self.referral_type().is_some(),
                "Referral Commission Type is Invalid!",
            );
        errors.into_result()
    }
}

/// Returned with status 201 once the referral row is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralCreated {
    pub message: String,
    /// Sheet row number of the new account.
    pub row: u32,
    /// A1 range covering the sheet up to the new row.
    pub cells: String,
}

/// Request body for every commission lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralCodeRequest {
    #[serde(default)]
    pub referral_code: Option<String>,
}

impl ReferralCodeRequest {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            referral_code: Some(code.into()),
        }
    }

    pub fn code(&self) -> &str {
        self.referral_code.as_deref().unwrap_or_default()
    }
}

impl Validate for ReferralCodeRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require(
            "referral_code",
            provided(&self.referral_code),
            "No Referral Code Submitted",
        );
        errors.into_result()
    }
}

/// Lifetime commission of a referrer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionResponse {
    pub commission: String,
}

/// Lifetime commission and the part of it already paid out by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionSummary {
    pub commission: String,
    pub withdrawable: String,
}
