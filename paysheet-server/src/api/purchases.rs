//! Purchase record and fulfillment handlers.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use kanau::processor::Processor;
use paysheet_core::entities::purchases::{
    FindPurchase, InsertPurchase, PurchaseRecord, SavePurchase,
};
use paysheet_core::entities::{checkbox, yes_no};
use paysheet_core::ledger::fulfillment::{self, ADDRESS_COLUMNS, DeliveryAddress};
use paysheet_core::ledger::reconcile::select_cells;
use paysheet_sdk::objects::purchase::{
    CreatePurchaseRequest, PurchaseCreated, PurchaseDetail, TrackingInfo, UpdateAddressRequest,
};
use paysheet_sdk::objects::{MessageResponse, ReferenceRequest};

use super::extractors::JsonBody;
use super::{ApiError, text, validated};
use crate::state::AppState;

const NOT_FOUND: &str = "Reference Number Not Found!";
const NOT_APPLICABLE: &str = "N/A";

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/purchases", post(create_purchase))
        .route("/purchases/lookup", post(get_purchase))
        .route("/purchases/tracking", post(get_tracking))
        .route("/purchases/received", post(mark_received))
        .route("/purchases/toggle-received", post(toggle_received))
        .route("/purchases/address", post(update_address))
}

fn to_detail(record: PurchaseRecord) -> PurchaseDetail {
    PurchaseDetail {
        reference_no: record.reference_no,
        deliverable: record.deliverable,
        sent: record.sent,
        courier: record.courier,
        tracking_no: record.tracking_no,
        remarks: record.remarks,
        pm_link: record.pm_link,
        payment_id: record.payment_id,
        paid: record.paid,
        date_paid: record.date_paid,
        mop: record.mop,
        currency: record.currency,
        net_amount: record.net_amount,
        fee: record.fee,
        payout_date: record.payout_date,
        referral_code: record.referral_code,
        referral_fee: record.referral_fee,
        received: record.received,
        order_details: record.order_details,
        receiver_name: record.receiver_name,
        receiver_phone: record.receiver_phone,
        notes: record.notes,
        delivery_address: record.delivery_address,
        payer_name: record.payer_name,
        payer_email: record.payer_email,
        payer_phone: record.payer_phone,
        billing_address: record.billing_address,
    }
}

async fn find(state: &AppState, reference_no: &str) -> Result<PurchaseRecord, ApiError> {
    state
        .sheets
        .process(FindPurchase {
            reference_no: reference_no.to_owned(),
        })
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))
}

/// `POST /purchases`: record a purchase before it is paid.
///
/// Digital (non-deliverable) purchases get `N/A` shipping columns.
async fn create_purchase(
    state: State<AppState>,
    JsonBody(body): JsonBody<CreatePurchaseRequest>,
) -> Result<(StatusCode, Json<PurchaseCreated>), ApiError> {
    let body = validated(body)?;
    let reference_no = text(body.reference_no);

    let existing = state
        .sheets
        .process(FindPurchase {
            reference_no: reference_no.clone(),
        })
        .await?;
    if existing.is_some() {
        return Err(ApiError::AlreadyExists("Purchase Record Already Exist!"));
    }

    let mut purchase = PurchaseRecord {
        reference_no,
        deliverable: checkbox(body.deliverable).to_owned(),
        referral_code: text(body.referral),
        notes: text(body.notes),
        ..Default::default()
    };
    if body.deliverable {
        purchase.receiver_name = text(body.receiver_name);
        purchase.receiver_phone = text(body.receiver_phone);
        purchase.delivery_address = text(body.address);
    } else {
        purchase.sent = NOT_APPLICABLE.to_owned();
        purchase.courier = NOT_APPLICABLE.to_owned();
        purchase.tracking_no = NOT_APPLICABLE.to_owned();
    }

    let stored = state.sheets.process(InsertPurchase { purchase }).await?;
    tracing::info!(
        reference_no = %stored.reference_no,
        row = stored.row,
        deliverable = body.deliverable,
        "Purchase recorded"
    );
    Ok((
        StatusCode::CREATED,
        Json(PurchaseCreated {
            message: "Successfully Created A New Purchase!".to_string(),
            row_number: stored.data_index(),
        }),
    ))
}

/// `POST /purchases/lookup`: every column of a purchase.
async fn get_purchase(
    state: State<AppState>,
    JsonBody(body): JsonBody<ReferenceRequest>,
) -> Result<Json<PurchaseDetail>, ApiError> {
    let body = validated(body)?;
    let purchase = find(&state, body.reference()).await?;
    Ok(Json(to_detail(purchase)))
}

/// `POST /purchases/tracking`: courier and tracking number of a sent purchase.
async fn get_tracking(
    state: State<AppState>,
    JsonBody(body): JsonBody<ReferenceRequest>,
) -> Result<Json<TrackingInfo>, ApiError> {
    let body = validated(body)?;
    let purchase = find(&state, body.reference()).await?;
    let tracking = fulfillment::tracking(&purchase)?;
    Ok(Json(TrackingInfo {
        tracking_no: tracking.tracking_no,
        courier: tracking.courier,
        sent: tracking.sent,
    }))
}

/// `POST /purchases/received`: mark a purchase received.
async fn mark_received(
    state: State<AppState>,
    JsonBody(body): JsonBody<ReferenceRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let body = validated(body)?;
    let purchase = find(&state, body.reference()).await?;
    state
        .sheets
        .process(SavePurchase {
            row: purchase.row,
            cells: vec![("received", yes_no(true).to_owned())],
        })
        .await?;
    Ok(Json(MessageResponse::new(
        "Product Purchase Mark As Received",
    )))
}

/// `POST /purchases/toggle-received`: flip the received flag.
async fn toggle_received(
    state: State<AppState>,
    JsonBody(body): JsonBody<ReferenceRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let body = validated(body)?;
    let mut purchase = find(&state, body.reference()).await?;
    let toggle = fulfillment::toggle_received(&mut purchase)?;
    state
        .sheets
        .process(SavePurchase {
            row: purchase.row,
            cells: vec![("received", purchase.received.clone())],
        })
        .await?;
    Ok(Json(MessageResponse::new(toggle.message())))
}

/// `POST /purchases/address`: replace the delivery details of a purchase
/// that has not been received.
async fn update_address(
    state: State<AppState>,
    JsonBody(body): JsonBody<UpdateAddressRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let body = validated(body)?;
    let mut purchase = find(&state, body.reference_no.as_deref().unwrap_or_default()).await?;
    fulfillment::update_address(
        &mut purchase,
        DeliveryAddress {
            receiver_name: text(body.receiver_name),
            receiver_phone: text(body.receiver_phone),
            address: text(body.address),
            notes: text(body.notes),
        },
    )?;
    state
        .sheets
        .process(SavePurchase {
            row: purchase.row,
            cells: select_cells(&purchase, ADDRESS_COLUMNS),
        })
        .await?;
    Ok(Json(MessageResponse::new("Delivery Address Updated.")))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::TestApp;
    use axum::http::StatusCode;
    use paysheet_core::entities::purchases::PurchaseRecord;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_purchase() {
        let app = TestApp::new();
        let request = json!({
            "reference_no": "ref_1",
            "referral": "juan",
            "receiver_name": "Maria",
            "receiver_phone": "0918",
            "address": "5 Mabini St",
        });
        let (status, body) = app.post("/purchases", request.clone()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Successfully Created A New Purchase!");
        assert_eq!(body["rowNumber"], 1);
        assert_eq!(app.purchase_cell(2, "deliverable").await, "TRUE");
        assert_eq!(app.purchase_cell(2, "delivery_address").await, "5 Mabini St");
        assert_eq!(app.purchase_cell(2, "referral_code").await, "juan");

        let (status, body) = app.post("/purchases", request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Purchase Record Already Exist!");
    }

    #[tokio::test]
    async fn test_create_digital_purchase() {
        let app = TestApp::new();
        let (status, body) = app
            .post(
                "/purchases",
                json!({"reference_no": "ref_2", "deliverable": false}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["rowNumber"], 1);
        assert_eq!(app.purchase_cell(2, "deliverable").await, "FALSE");
        for header in ["sent", "courier", "tracking_no"] {
            assert_eq!(app.purchase_cell(2, header).await, "N/A");
        }
    }

    #[tokio::test]
    async fn test_create_purchase_validation() {
        let app = TestApp::new();
        let (status, body) = app
            .post("/purchases", json!({"reference_no": "ref_1", "address": ""}))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"].as_array().unwrap().len(), 3);
        assert_eq!(body["errors"][0]["field"], "address");
    }

    #[tokio::test]
    async fn test_get_purchase() {
        let app = TestApp::new();
        app.seed_purchase("ref_1", "").await;
        let (status, body) = app
            .post("/purchases/lookup", json!({"reference_no": "ref_1"}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["receiver_name"], "Maria");
        assert_eq!(body["billing_address"], "");
        assert_eq!(body.as_object().unwrap().len(), 27);

        let (status, body) = app
            .post("/purchases/lookup", json!({"reference_no": "ref_9"}))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Reference Number Not Found!");
    }

    #[tokio::test]
    async fn test_missing_reference() {
        let app = TestApp::new();
        let (status, body) = app.post("/purchases/tracking", json!({})).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"][0]["field"], "reference_no");
    }

    #[tokio::test]
    async fn test_malformed_body_is_unprocessable() {
        let app = TestApp::new();
        app.seed_purchase("ref_1", "").await;

        let (status, body) = app
            .post("/purchases/lookup", json!({"reference_no": 12345}))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"][0]["field"], "body");

        let (status, body) = app.post_raw("/purchases/lookup", "{not json").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"].as_array().unwrap().len(), 1);

        let (status, body) = app.post_raw("/purchases/tracking", "").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"][0]["field"], "reference_no");
    }

    #[tokio::test]
    async fn test_body_without_content_type() {
        let app = TestApp::new();
        app.seed_purchase("ref_1", "").await;
        let (status, body) = app
            .post_raw("/purchases/lookup", r#"{"reference_no": "ref_1"}"#)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["receiver_name"], "Maria");
    }

    #[tokio::test]
    async fn test_deliverable_sent_as_text() {
        let app = TestApp::new();
        let (status, _) = app
            .post(
                "/purchases",
                json!({"reference_no": "ref_3", "deliverable": "false"}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(app.purchase_cell(2, "deliverable").await, "FALSE");
    }

    #[tokio::test]
    async fn test_tracking() {
        let app = TestApp::new();
        app.seed_purchase("ref_1", "").await;
        let (status, body) = app
            .post("/purchases/tracking", json!({"reference_no": "ref_1"}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Order Not Yet Delivered");

        app.insert_purchase(PurchaseRecord {
            reference_no: "ref_2".into(),
            deliverable: "TRUE".into(),
            sent: "yes".into(),
            courier: "LBC".into(),
            tracking_no: "LBC123".into(),
            ..Default::default()
        })
        .await;
        let (status, body) = app
            .post("/purchases/tracking", json!({"reference_no": "ref_2"}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"tracking_no": "LBC123", "courier": "LBC", "sent": "yes"}));
    }

    #[tokio::test]
    async fn test_mark_and_toggle_received() {
        let app = TestApp::new();
        let row = app.seed_purchase("ref_1", "").await;

        let (status, body) = app
            .post("/purchases/received", json!({"reference_no": "ref_1"}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Product Purchase Mark As Received");
        assert_eq!(app.purchase_cell(row, "received").await, "yes");

        let (_, body) = app
            .post("/purchases/toggle-received", json!({"reference_no": "ref_1"}))
            .await;
        assert_eq!(body["message"], "Order Unmarked as Received!");
        assert_eq!(app.purchase_cell(row, "received").await, "no");

        let (_, body) = app
            .post("/purchases/toggle-received", json!({"reference_no": "ref_1"}))
            .await;
        assert_eq!(body["message"], "Order Marked As Received!");
        assert_eq!(app.purchase_cell(row, "received").await, "yes");
    }

    #[tokio::test]
    async fn test_toggle_done_purchase() {
        let app = TestApp::new();
        app.insert_purchase(PurchaseRecord {
            reference_no: "ref_1".into(),
            deliverable: "TRUE".into(),
            remarks: "DONE".into(),
            received: "yes".into(),
            ..Default::default()
        })
        .await;
        let (status, body) = app
            .post("/purchases/toggle-received", json!({"reference_no": "ref_1"}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Oops!Request Failed. We Already Marked This Transaction as DONE"
        );
    }

    #[tokio::test]
    async fn test_update_address() {
        let app = TestApp::new();
        let row = app.seed_purchase("ref_1", "").await;
        let request = json!({
            "reference_no": "ref_1",
            "receiver_name": "Jose",
            "receiver_phone": "0919",
            "address": "7 Luna St",
        });
        let (status, body) = app.post("/purchases/address", request.clone()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Delivery Address Updated.");
        assert_eq!(app.purchase_cell(row, "delivery_address").await, "7 Luna St");
        assert_eq!(app.purchase_cell(row, "receiver_name").await, "Jose");

        app.post("/purchases/received", json!({"reference_no": "ref_1"}))
            .await;
        let (status, body) = app.post("/purchases/address", request).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            body["message"],
            "Oops! Cant Update Delivery Address, Product Purchase was Already Received!"
        );
    }
}
