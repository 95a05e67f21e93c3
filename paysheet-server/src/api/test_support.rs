//! Router harness for handler tests: an in-memory spreadsheet and a stub
//! gateway.

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use kanau::processor::Processor;
use paysheet_core::config::{GatewayConfig, RefundPolicy, ServerConfig, SharedConfig};
use paysheet_core::entities::purchases::{InsertPurchase, PURCHASES, PurchaseRecord};
use paysheet_core::entities::referrals::{InsertReferral, ReferralRecord};
use paysheet_core::gateway::types::{Resource, TransactionAttributes};
use paysheet_core::gateway::{
    ApiToken, Billing, BillingAddress, GatewayCredentials, GatewayError, GatewayPayment,
    LinkAttributes, PaymentGateway, Transaction, TransactionStatus,
};
use paysheet_core::sheets::MemorySheets;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use crate::server::build_router;
use crate::state::AppState;

/// Payment settled 2023-11-14, available 2023-11-21, net 1450.50.
pub const PAID_AT: i64 = 1_700_000_000;

#[derive(Default)]
pub struct StubGateway {
    transactions: Mutex<HashMap<String, Transaction>>,
    last_authorization: Mutex<Option<String>>,
}

impl StubGateway {
    pub fn insert(&self, transaction: Transaction) {
        self.transactions
            .lock()
            .unwrap()
            .insert(transaction.id.clone(), transaction);
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.last_authorization.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn authenticate(
        &self,
        credentials: &GatewayCredentials,
    ) -> Result<ApiToken, GatewayError> {
        if credentials.password != "secret" {
            return Err(GatewayError::Api {
                status: 401,
                body: "bad credentials".into(),
            });
        }
        Ok(ApiToken {
            token: "tok_test".into(),
            expiry_timer: 3600,
        })
    }

    async fn create_link(
        &self,
        authorization: &str,
        link: &LinkAttributes,
    ) -> Result<Transaction, GatewayError> {
        *self.last_authorization.lock().unwrap() = Some(authorization.to_string());
        Ok(Resource {
            id: "ref_new".into(),
            attributes: TransactionAttributes {
                status: TransactionStatus::Unpaid,
                url: "https://pay.example.com/ref_new".into(),
                amount: link.amount,
                description: link.description.clone(),
                remarks: link.remarks.clone(),
                livemode: link.livemode,
                payments: Vec::new(),
            },
        })
    }

    async fn get_transaction(
        &self,
        token: &str,
        reference_no: &str,
        _livemode: bool,
    ) -> Result<Transaction, GatewayError> {
        assert_eq!(token, "tok_test");
        self.transactions
            .lock()
            .unwrap()
            .get(reference_no)
            .cloned()
            .ok_or(GatewayError::NotFound)
    }
}

pub fn unpaid_transaction(reference_no: &str) -> Transaction {
    Resource {
        id: reference_no.into(),
        attributes: TransactionAttributes {
            status: TransactionStatus::Unpaid,
            url: format!("https://pay.example.com/{reference_no}"),
            amount: 150_050,
            description: "2x T-shirt".into(),
            remarks: String::new(),
            livemode: false,
            payments: Vec::new(),
        },
    }
}

pub fn paid_transaction(reference_no: &str) -> Transaction {
    let mut transaction = unpaid_transaction(reference_no);
    transaction.attributes.status = TransactionStatus::Paid;
    transaction.attributes.payments = vec![GatewayPayment {
        id: "pay_1".into(),
        status: "paid".into(),
        currency: "PHP".into(),
        net_amount: 145_050,
        fee: 5_000,
        mop_text: "GCash".into(),
        description: "2x T-shirt".into(),
        paid_at: PAID_AT,
        available_at: PAID_AT + 7 * 24 * 3600,
        billing: Billing {
            name: "Juan Dela Cruz".into(),
            email: "juan@example.com".into(),
            phone: "09170000000".into(),
            address: BillingAddress {
                line1: "12 Rizal St".into(),
                line2: "Unit 3".into(),
                city: "Makati".into(),
                state: "NCR".into(),
                postal_code: "1200".into(),
                country: "PH".into(),
            },
        },
    }];
    transaction
}

pub struct TestApp {
    pub sheets: Arc<MemorySheets>,
    pub gateway: Arc<StubGateway>,
    pub state: AppState,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_refund_policy(RefundPolicy::default())
    }

    pub fn with_refund_policy(refund: RefundPolicy) -> Self {
        let sheets = Arc::new(MemorySheets::new());
        let gateway = Arc::new(StubGateway::default());
        let config = SharedConfig::new(
            ServerConfig {
                listen: "127.0.0.1:0".parse().unwrap(),
            },
            GatewayConfig {
                base_url: "https://gateway.example.com".parse().unwrap(),
                email: "merchant@example.com".into(),
                password: "secret".into(),
                livemode: false,
            },
            refund,
        );
        let state = AppState::new(sheets.clone(), gateway.clone(), config);
        let router = build_router(state.clone());
        Self {
            sheets,
            gateway,
            state,
            router,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_with_auth(
        &self,
        uri: &str,
        authorization: &str,
        body: Value,
    ) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, authorization)
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Posts `body` as-is, with no `Content-Type` header.
    pub async fn post_raw(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::from(body.to_owned()))
                .unwrap(),
        )
        .await
    }

    /// Sends a request and returns the raw response, for header checks.
    pub async fn request(&self, method: &str, uri: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Stores a deliverable purchase and returns its sheet row.
    pub async fn seed_purchase(&self, reference_no: &str, referral_code: &str) -> u32 {
        self.insert_purchase(PurchaseRecord {
            reference_no: reference_no.into(),
            deliverable: "TRUE".into(),
            referral_code: referral_code.into(),
            receiver_name: "Maria".into(),
            receiver_phone: "0918".into(),
            delivery_address: "5 Mabini St".into(),
            ..Default::default()
        })
        .await
    }

    pub async fn insert_purchase(&self, purchase: PurchaseRecord) -> u32 {
        self.state
            .sheets
            .process(InsertPurchase { purchase })
            .await
            .unwrap()
            .row
    }

    pub async fn seed_referral(&self, code: &str, kind: &str, amount: &str, active: &str) -> u32 {
        self.state
            .sheets
            .process(InsertReferral {
                referral: ReferralRecord {
                    referral_code: code.into(),
                    name: "Juan".into(),
                    email: "juan@example.com".into(),
                    kind: kind.into(),
                    amount: amount.into(),
                    active: active.into(),
                    ..Default::default()
                },
            })
            .await
            .unwrap()
            .row
    }

    pub async fn purchase_cell(&self, row: u32, header: &str) -> String {
        self.sheets
            .cell(PURCHASES.id, row, header)
            .await
            .unwrap_or_default()
    }
}
