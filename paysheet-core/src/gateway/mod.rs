//! Payment gateway access.
//!
//! The gateway issues short-lived API tokens from merchant credentials,
//! creates payment links ("transactions") and reports their payment status.

mod paymongo;
pub mod types;

pub use paymongo::PaymongoGateway;
pub use types::{
    ApiToken, Billing, BillingAddress, GatewayPayment, LinkAttributes, Transaction,
    TransactionStatus,
};

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when calling the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The transaction does not exist
    #[error("transaction not found")]
    NotFound,

    /// The gateway rejected the request
    #[error("gateway error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// The gateway base URL could not be joined with an endpoint path
    #[error("invalid gateway url: {0}")]
    Url(#[from] url::ParseError),
}

/// Merchant login for the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayCredentials {
    pub email: String,
    pub password: String,
}

/// Operations the back office needs from a payment gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Exchange merchant credentials for an API token.
    async fn authenticate(&self, credentials: &GatewayCredentials)
    -> Result<ApiToken, GatewayError>;

    /// Create a payment link.
    ///
    /// `authorization` is sent verbatim as the `Authorization` header.
    async fn create_link(
        &self,
        authorization: &str,
        link: &LinkAttributes,
    ) -> Result<Transaction, GatewayError>;

    /// Look up a transaction by its reference number.
    async fn get_transaction(
        &self,
        token: &str,
        reference_no: &str,
        livemode: bool,
    ) -> Result<Transaction, GatewayError>;
}
