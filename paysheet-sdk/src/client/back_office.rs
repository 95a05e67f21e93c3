//! Typed client for every back-office route.

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::ClientError;
use crate::objects::payment::{
    ApiTokenResponse, CreateLinkRequest, PaymentLinkResponse,
};
use crate::objects::purchase::{
    CreatePurchaseRequest, PurchaseCreated, PurchaseDetail, TrackingInfo, UpdateAddressRequest,
};
use crate::objects::referral::{
    CommissionResponse, CommissionSummary, CreateReferralRequest, ReferralCodeRequest,
    ReferralCreated,
};
use crate::objects::refund::CreateRefundRequest;
use crate::objects::{MessageResponse, ReferenceRequest};

/// Typed HTTP client for the back-office API.
///
/// Every route is a JSON `POST`. Non-2xx answers surface as
/// [`ClientError::Api`] with the raw body, so callers can inspect the
/// 422 field list or the 400 message.
#[derive(Debug, Clone)]
pub struct BackOfficeClient {
    http: Client,
    base_url: Url,
}

impl BackOfficeClient {
    /// Create a new client rooted at `base_url` (e.g. `https://shop.example.com`).
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `POST /payments/links` – create a payment link with the caller's
    /// gateway token.
    pub async fn create_link(
        &self,
        gateway_token: &str,
        request: &CreateLinkRequest,
    ) -> Result<PaymentLinkResponse, ClientError> {
        let url = self.base_url.join("/payments/links")?;
        let resp = self
            .http
            .post(url)
            .header(reqwest::header::AUTHORIZATION, gateway_token)
            .json(request)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `POST /payments/token` – issue a gateway token from the server's
    /// configured credentials.
    pub async fn issue_token(&self) -> Result<ApiTokenResponse, ClientError> {
        let url = self.base_url.join("/payments/token")?;
        let resp = self.http.post(url).send().await?;
        parse_response(resp).await
    }

    /// `POST /payments/verify` – reconcile a purchase with the gateway.
    pub async fn verify_payment(&self, reference_no: &str) -> Result<MessageResponse, ClientError> {
        self.post("/payments/verify", &ReferenceRequest::new(reference_no))
            .await
    }

    /// `POST /purchases` – record a new purchase.
    pub async fn create_purchase(
        &self,
        request: &CreatePurchaseRequest,
    ) -> Result<PurchaseCreated, ClientError> {
        self.post("/purchases", request).await
    }

    /// `POST /purchases/lookup` – fetch every column of a purchase.
    pub async fn get_purchase(&self, reference_no: &str) -> Result<PurchaseDetail, ClientError> {
        self.post("/purchases/lookup", &ReferenceRequest::new(reference_no))
            .await
    }

    /// `POST /purchases/tracking` – shipment details of a sent purchase.
    pub async fn get_tracking(&self, reference_no: &str) -> Result<TrackingInfo, ClientError> {
        self.post("/purchases/tracking", &ReferenceRequest::new(reference_no))
            .await
    }

    /// `POST /purchases/received` – mark a purchase as received.
    pub async fn mark_received(&self, reference_no: &str) -> Result<MessageResponse, ClientError> {
        self.post("/purchases/received", &ReferenceRequest::new(reference_no))
            .await
    }

    /// `POST /purchases/toggle-received` – flip the received flag.
    pub async fn toggle_received(
        &self,
        reference_no: &str,
    ) -> Result<MessageResponse, ClientError> {
        self.post(
            "/purchases/toggle-received",
            &ReferenceRequest::new(reference_no),
        )
        .await
    }

    /// `POST /purchases/address` – replace the delivery details.
    pub async fn update_address(
        &self,
        request: &UpdateAddressRequest,
    ) -> Result<MessageResponse, ClientError> {
        self.post("/purchases/address", request).await
    }

    /// `POST /referrals` – join the referral program.
    pub async fn create_referral(
        &self,
        request: &CreateReferralRequest,
    ) -> Result<ReferralCreated, ClientError> {
        self.post("/referrals", request).await
    }

    /// `POST /referrals/commission`
    pub async fn get_commission(&self, code: &str) -> Result<CommissionResponse, ClientError> {
        self.post("/referrals/commission", &ReferralCodeRequest::new(code))
            .await
    }

    /// `POST /referrals/commission/summary`
    pub async fn get_commission_summary(
        &self,
        code: &str,
    ) -> Result<CommissionSummary, ClientError> {
        self.post(
            "/referrals/commission/summary",
            &ReferralCodeRequest::new(code),
        )
        .await
    }

    /// `POST /referrals/commission/history` – fee of every purchase
    /// credited to `code`.
    pub async fn get_commission_history(&self, code: &str) -> Result<Vec<String>, ClientError> {
        self.post(
            "/referrals/commission/history",
            &ReferralCodeRequest::new(code),
        )
        .await
    }

    /// `POST /refunds` – file a refund request.
    pub async fn create_refund(
        &self,
        request: &CreateRefundRequest,
    ) -> Result<MessageResponse, ClientError> {
        self.post("/refunds", request).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.base_url.join(path)?;
        let resp = self.http.post(url).json(body).send().await?;
        parse_response(resp).await
    }
}

async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}
