//! Refund request handler.

use axum::{Json, Router, extract::State, routing::post};
use kanau::processor::Processor;
use paysheet_core::entities::refunds::{FindRefund, InsertRefund, RefundRecord};
use paysheet_core::gateway::GatewayError;
use paysheet_core::ledger::RefundWindow;
use paysheet_core::ledger::reconcile::centavos;
use paysheet_sdk::objects::MessageResponse;
use paysheet_sdk::objects::refund::CreateRefundRequest;

use super::extractors::JsonBody;
use super::{ApiError, text, validated};
use crate::state::AppState;

pub(super) fn router() -> Router<AppState> {
    Router::new().route("/refunds", post(create_refund))
}

/// `POST /refunds`: record a refund request against a paid transaction.
///
/// The request is stored with `mail_sent = NO`; whether it falls inside the
/// refund policy window is only logged.
async fn create_refund(
    state: State<AppState>,
    JsonBody(body): JsonBody<CreateRefundRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let body = validated(body)?;
    let reference_no = text(body.reference_no);

    let existing = state
        .sheets
        .process(FindRefund {
            reference_no: reference_no.clone(),
        })
        .await?;
    if existing.is_some() {
        return Err(ApiError::AlreadyExists("Refund Request Already Exist!"));
    }

    let token = state.gateway_token().await?;
    let livemode = state.livemode().await;
    let transaction = state
        .gateway
        .get_transaction(&token, &reference_no, livemode)
        .await
        .map_err(|e| match e {
            GatewayError::NotFound => ApiError::NotFound("Reference No. Not Found!"),
            e => ApiError::Gateway(e),
        })?;
    let payment = transaction.paid_payment().ok_or_else(|| {
        ApiError::Rejected("You Cannot Request Refund On UNPAID Order!".to_string())
    })?;

    let policy = *state.config.refund.read().await;
    let window = RefundWindow::new(payment.paid_at, &policy)
        .map_err(|e| ApiError::Internal(format!("payment {} paid_at: {e}", payment.id)))?;

    let refund = RefundRecord {
        reference_no,
        payment_id: payment.id.clone(),
        currency: payment.currency.clone(),
        amount: centavos(payment.net_amount).to_string(),
        refundable_until: window.refundable_until_date(),
        kind: body.kind,
        mail_sent: "NO".to_string(),
        message: text(body.message),
        email: text(body.email),
        phone: payment.billing.phone.clone(),
        mop: text(body.mop),
        mop_details: text(body.mop_details),
        ..Default::default()
    };
    let stored = state.sheets.process(InsertRefund { refund }).await?;

    if window.is_open(time::OffsetDateTime::now_utc()) {
        tracing::info!(
            reference_no = %stored.reference_no,
            refundable_until = %stored.refundable_until,
            "Refund requested within policy window"
        );
    } else {
        tracing::info!(
            reference_no = %stored.reference_no,
            row = stored.row,
            "Refund request recorded"
        );
    }

    Ok(Json(MessageResponse::new(
        "Refund Request Successfully Submitted",
    )))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{TestApp, paid_transaction, unpaid_transaction};
    use axum::http::StatusCode;
    use paysheet_core::config::RefundPolicy;
    use paysheet_core::entities::refunds::REFUNDS;
    use serde_json::{Value, json};

    fn request(reference_no: &str) -> Value {
        json!({
            "reference_no": reference_no,
            "message": "Wrong size",
            "email": "juan@example.com",
            "type": "defective",
            "mop": "gcash",
            "mop_details": "09170000000",
        })
    }

    #[tokio::test]
    async fn test_create_refund() {
        let app = TestApp::new();
        app.gateway.insert(paid_transaction("ref_1"));

        let (status, body) = app.post("/refunds", request("ref_1")).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["message"], "Refund Request Successfully Submitted");

        for (header, expected) in [
            ("payment_id", "pay_1"),
            ("amount", "1450.5"),
            ("currency", "PHP"),
            ("refundable_until", "2023-11-14"),
            ("type", "defective"),
            ("mail_sent", "NO"),
            ("phone", "09170000000"),
            ("approved", ""),
        ] {
            let value = app.sheets.cell(REFUNDS.id, 2, header).await;
            assert_eq!(value.as_deref(), Some(expected), "{header}");
        }

        let (status, body) = app.post("/refunds", request("ref_1")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Refund Request Already Exist!");
    }

    #[tokio::test]
    async fn test_refund_window_from_policy() {
        let app = TestApp::with_refund_policy(RefundPolicy {
            window_hours: Some(72),
        });
        app.gateway.insert(paid_transaction("ref_1"));

        let (status, _) = app.post("/refunds", request("ref_1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            app.sheets
                .cell(REFUNDS.id, 2, "refundable_until")
                .await
                .unwrap(),
            "2023-11-17"
        );
    }

    #[tokio::test]
    async fn test_refund_unknown_or_unpaid() {
        let app = TestApp::new();
        let (status, body) = app.post("/refunds", request("ghost")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Reference No. Not Found!");

        app.gateway.insert(unpaid_transaction("ref_2"));
        let (status, body) = app.post("/refunds", request("ref_2")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "You Cannot Request Refund On UNPAID Order!");
        assert_eq!(app.sheets.row_count(REFUNDS.id).await, 0);
    }

    #[tokio::test]
    async fn test_refund_validation() {
        let app = TestApp::new();
        let (status, body) = app
            .post("/refunds", json!({"reference_no": "ref_1", "type": "whim"}))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let fields: Vec<_> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(fields, ["message", "email", "mop", "mop_details", "type"]);
    }
}
