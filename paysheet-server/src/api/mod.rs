//! HTTP API.
//!
//! # Endpoints
//!
//! - `POST /payments/links`                 – create a gateway payment link
//! - `POST /payments/token`                 – issue a gateway API token
//! - `POST /payments/verify`                – reconcile a paid transaction onto its purchase
//! - `POST /purchases`                      – record a purchase
//! - `POST /purchases/lookup`               – every column of a purchase
//! - `POST /purchases/tracking`             – shipment details
//! - `POST /purchases/received`             – mark received
//! - `POST /purchases/toggle-received`      – flip the received flag
//! - `POST /purchases/address`              – replace delivery details
//! - `POST /referrals`                      – join the referral program
//! - `POST /referrals/commission`           – lifetime commission
//! - `POST /referrals/commission/summary`   – commission and withdrawable amount
//! - `POST /referrals/commission/history`   – referral fee of every referred purchase
//! - `POST /refunds`                        – file a refund request

mod extractors;
mod payments;
mod purchases;
mod referrals;
mod refunds;

#[cfg(test)]
pub(crate) mod test_support;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use paysheet_core::gateway::GatewayError;
use paysheet_core::ledger::FulfillmentError;
use paysheet_core::sheets::SheetError;
use paysheet_sdk::objects::payment::UnpaidResponse;
use paysheet_sdk::objects::{ErrorResponse, MessageResponse, Validate, ValidationErrors};

use crate::state::AppState;

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(payments::router())
        .merge(purchases::router())
        .merge(referrals::router())
        .merge(refunds::router())
}

/// Errors that can occur in API handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Required fields are missing or invalid.
    Validation(ValidationErrors),
    /// The `Authorization` header is missing or was rejected by the gateway.
    Unauthorized,
    /// The referenced record does not exist.
    NotFound(&'static str),
    /// A record with the same key already exists.
    AlreadyExists(&'static str),
    /// The request is valid but the record's state does not allow it.
    Rejected(String),
    /// The request conflicts with the record's current state.
    Conflict(String),
    /// The transaction has not been paid yet.
    Unpaid(UnpaidResponse),
    /// A spreadsheet call failed.
    Sheets(SheetError),
    /// A gateway call failed.
    Gateway(GatewayError),
    /// Upstream data could not be interpreted.
    Internal(String),
}

impl From<ValidationErrors> for ApiError {
    fn from(e: ValidationErrors) -> Self {
        ApiError::Validation(e)
    }
}

impl From<SheetError> for ApiError {
    fn from(e: SheetError) -> Self {
        ApiError::Sheets(e)
    }
}

impl From<GatewayError> for ApiError {
    fn from(e: GatewayError) -> Self {
        ApiError::Gateway(e)
    }
}

impl From<FulfillmentError> for ApiError {
    fn from(e: FulfillmentError) -> Self {
        match e {
            FulfillmentError::AddressNotDeliverable | FulfillmentError::AddressAlreadyReceived => {
                ApiError::Conflict(e.to_string())
            }
            FulfillmentError::NotDeliverable
            | FulfillmentError::NotYetSent
            | FulfillmentError::AlreadyDone => ApiError::Rejected(e.to_string()),
        }
    }
}

fn error_body(error: &str) -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: error.to_string(),
    })
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response()
            }
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                error_body("missing or rejected Authorization header"),
            )
                .into_response(),
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, error_body(what)).into_response(),
            ApiError::AlreadyExists(what) => {
                (StatusCode::BAD_REQUEST, error_body(what)).into_response()
            }
            ApiError::Rejected(message) => {
                (StatusCode::BAD_REQUEST, Json(MessageResponse::new(message))).into_response()
            }
            ApiError::Conflict(message) => {
                (StatusCode::CONFLICT, Json(MessageResponse::new(message))).into_response()
            }
            ApiError::Unpaid(unpaid) => (StatusCode::BAD_REQUEST, Json(unpaid)).into_response(),
            ApiError::Sheets(e) => {
                tracing::error!(error = %e, "Spreadsheet error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_body("internal server error"),
                )
                    .into_response()
            }
            ApiError::Gateway(e) => {
                tracing::error!(error = %e, "Payment gateway error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_body("internal server error"),
                )
                    .into_response()
            }
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_body("internal server error"),
                )
                    .into_response()
            }
        }
    }
}

/// Run a request body's field checks.
fn validated<T: Validate>(body: T) -> Result<T, ApiError> {
    body.validate()?;
    Ok(body)
}

/// Optional request text, empty when absent.
fn text(value: Option<String>) -> String {
    value.unwrap_or_default()
}
