pub mod payment;
pub mod purchase;
pub mod referral;
pub mod refund;

use serde::{Deserialize, Deserializer, Serialize, de};

/// A single failed field check, reported back with status 422.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Body of a 422 response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` against `field` unless `present` holds.
    pub fn require(&mut self, field: &str, present: bool, message: &str) -> &mut Self {
        if !present {
            self.errors.push(FieldError {
                field: field.to_owned(),
                message: message.to_owned(),
            });
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Request bodies that check their own required fields.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// `true` when the optional string is present and non-empty.
pub fn provided(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

/// Deserialize a yes/no flag sent either as a JSON boolean or as text.
///
/// Accepts `true`/`false`, `"true"`/`"false"`, `"yes"`/`"no"`, `"1"`/`"0"`
/// and the numbers `1`/`0`, case-insensitively.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Number(i64),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Number(1) => Ok(true),
        Flag::Number(0) => Ok(false),
        Flag::Number(n) => Err(de::Error::custom(format!(
            "invalid flag {n}, expected a boolean"
        ))),
        Flag::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            other => Err(de::Error::custom(format!(
                "invalid flag \"{other}\", expected a boolean"
            ))),
        },
    }
}

/// Generic `{"message": ...}` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Generic `{"error": ...}` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Request body carrying only a purchase reference number.
///
/// Used by payment verification and every purchase lookup/flag route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRequest {
    #[serde(default)]
    pub reference_no: Option<String>,
}

impl ReferenceRequest {
    pub fn new(reference_no: impl Into<String>) -> Self {
        Self {
            reference_no: Some(reference_no.into()),
        }
    }

    /// The reference number, or an empty string when absent.
    pub fn reference(&self) -> &str {
        self.reference_no.as_deref().unwrap_or_default()
    }
}

impl Validate for ReferenceRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require(
            "reference_no",
            provided(&self.reference_no),
            "No Reference No. Submitted, *reference_no* is required",
        );
        errors.into_result()
    }
}
