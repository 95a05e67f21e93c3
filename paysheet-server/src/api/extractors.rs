//! Custom Axum extractors.
//!
//! Provides `GatewayAuthorization`, the caller's own gateway credential
//! forwarded verbatim when creating payment links, and `JsonBody`, a JSON
//! request body whose rejections use the same 422 shape as field validation.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts},
};
use paysheet_sdk::objects::{FieldError, ValidationErrors};
use serde::de::DeserializeOwned;

use super::ApiError;

/// Request bodies larger than this are rejected.
const BODY_LIMIT: usize = 1024 * 1024;

/// The raw `Authorization` header of the request.
///
/// Rejects with 401 when the header is missing, empty or not valid text.
pub struct GatewayAuthorization(pub String);

impl<S: Send + Sync> FromRequestParts<S> for GatewayAuthorization {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(ApiError::Unauthorized)?
            .to_str()
            .map_err(|_| ApiError::Unauthorized)?
            .trim();
        if value.is_empty() {
            return Err(ApiError::Unauthorized);
        }
        Ok(GatewayAuthorization(value.to_owned()))
    }
}

/// A JSON request body.
///
/// The `Content-Type` header is not checked and an empty body reads as `{}`.
/// Unreadable or malformed bodies reject with 422 and a single `body` error.
pub struct JsonBody<T>(pub T);

impl<S: Send + Sync, T: DeserializeOwned> FromRequest<S> for JsonBody<T> {
    type Rejection = ApiError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let bytes = axum::body::to_bytes(req.into_body(), BODY_LIMIT)
            .await
            .map_err(|e| body_error(format!("failed to read request body: {e}")))?;
        parse_body(&bytes).map(JsonBody)
    }
}

fn parse_body<T: DeserializeOwned>(bytes: &Bytes) -> Result<T, ApiError> {
    let bytes: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        bytes
    };
    serde_json::from_slice(bytes).map_err(|e| body_error(e.to_string()))
}

fn body_error(message: String) -> ApiError {
    ApiError::Validation(ValidationErrors {
        errors: vec![FieldError {
            field: "body".to_string(),
            message,
        }],
    })
}
