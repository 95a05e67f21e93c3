//! REST client for the PayMongo gateway.

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

use super::types::{Credentials, Envelope, Resource, TokenAttributes};
use super::{ApiToken, GatewayCredentials, GatewayError, LinkAttributes, PaymentGateway, Transaction};

/// [`PaymentGateway`] speaking the PayMongo REST API.
#[derive(Debug, Clone)]
pub struct PaymongoGateway {
    base_url: Url,
    http_client: reqwest::Client,
}

impl PaymongoGateway {
    pub const DEFAULT_BASE_URL: &str = "https://gateway.paymongo.com";

    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            http_client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Replace the default `reqwest::Client`.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = client;
        self
    }

    /// `/transactions/{reference_no}`, with the reference as a single
    /// percent-encoded path segment.
    fn transaction_url(&self, reference_no: &str) -> Result<Url, GatewayError> {
        let mut url = self.base_url.join("/transactions/")?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(reference_no);
        Ok(url)
    }
}

async fn parse<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, GatewayError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(GatewayError::NotFound);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GatewayError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json().await?)
}

#[async_trait]
impl PaymentGateway for PaymongoGateway {
    #[tracing::instrument(skip_all, err, name = "Gateway:authenticate")]
    async fn authenticate(
        &self,
        credentials: &GatewayCredentials,
    ) -> Result<ApiToken, GatewayError> {
        let attributes = Credentials {
            email: credentials.email.clone(),
            password: credentials.password.clone(),
        };
        let response = self
            .http_client
            .post(self.base_url.join("/auth")?)
            .json(&serde_json::json!({ "data": { "attributes": attributes } }))
            .send()
            .await?;
        let token: Envelope<Resource<TokenAttributes>> = parse(response).await?;
        Ok(ApiToken {
            token: token.data.id,
            expiry_timer: token.data.attributes.expiry_timer,
        })
    }

    #[tracing::instrument(skip_all, err, name = "Gateway:create_link")]
    async fn create_link(
        &self,
        authorization: &str,
        link: &LinkAttributes,
    ) -> Result<Transaction, GatewayError> {
        let response = self
            .http_client
            .post(self.base_url.join("/transactions")?)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .json(&serde_json::json!({ "data": { "attributes": link } }))
            .send()
            .await?;
        let transaction: Envelope<Transaction> = parse(response).await?;
        debug!(reference_no = %transaction.data.id, "Payment link created");
        Ok(transaction.data)
    }

    #[tracing::instrument(skip_all, err, name = "Gateway:get_transaction", fields(reference_no = %reference_no))]
    async fn get_transaction(
        &self,
        token: &str,
        reference_no: &str,
        livemode: bool,
    ) -> Result<Transaction, GatewayError> {
        let response = self
            .http_client
            .get(self.transaction_url(reference_no)?)
            .query(&[("livemode", livemode)])
            .bearer_auth(token)
            .send()
            .await?;
        let transaction: Envelope<Transaction> = parse(response).await?;
        Ok(transaction.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &'static str) -> reqwest::Response {
        http::Response::builder()
            .status(status)
            .body(body)
            .unwrap()
            .into()
    }

    #[test]
    fn test_transaction_url_encodes_reference() {
        let gateway = PaymongoGateway::new("https://gateway.example.com".parse().unwrap());
        assert_eq!(
            gateway.transaction_url("link_abc123").unwrap().as_str(),
            "https://gateway.example.com/transactions/link_abc123"
        );
        assert_eq!(
            gateway.transaction_url("a b/c?d").unwrap().as_str(),
            "https://gateway.example.com/transactions/a%20b%2Fc%3Fd"
        );
    }

    #[tokio::test]
    async fn test_parse_success() {
        let token: Envelope<Resource<TokenAttributes>> = parse(response(
            200,
            r#"{"data": {"id": "sk_token", "attributes": {"expiry_timer": 3600}}}"#,
        ))
        .await
        .unwrap();
        assert_eq!(token.data.id, "sk_token");
        assert_eq!(token.data.attributes.expiry_timer, 3600);
    }

    #[tokio::test]
    async fn test_parse_not_found() {
        let result: Result<serde_json::Value, _> =
            parse(response(404, r#"{"errors": [{"code": "resource_not_found"}]}"#)).await;
        assert!(matches!(result, Err(GatewayError::NotFound)));
    }

    #[tokio::test]
    async fn test_parse_api_error_keeps_body() {
        let result: Result<serde_json::Value, _> =
            parse(response(401, r#"{"errors": [{"code": "unauthorized"}]}"#)).await;
        assert!(
            matches!(&result, Err(GatewayError::Api { status: 401, body }) if body.contains("unauthorized")),
            "{result:?}"
        );
    }

    #[tokio::test]
    async fn test_parse_malformed_body() {
        let result: Result<Envelope<Resource<TokenAttributes>>, _> =
            parse(response(200, "<html>")).await;
        assert!(matches!(result, Err(GatewayError::Request(_))));
    }
}
