//! Payment link, token and verification handlers.

use axum::{Json, Router, extract::State, routing::post};
use kanau::processor::Processor;
use paysheet_core::entities::purchases::{FindPurchase, SavePurchase};
use paysheet_core::entities::referrals::FindReferral;
use paysheet_core::gateway::{GatewayError, LinkAttributes, Transaction, TransactionStatus};
use paysheet_core::ledger::ReferralOutcome;
use paysheet_core::ledger::reconcile::{
    PAYMENT_COLUMNS, apply_payment, apply_referral, centavos, select_cells,
};
use paysheet_sdk::objects::payment::{
    ApiTokenResponse, CreateLinkRequest, PaymentLinkResponse, UnpaidResponse,
};
use paysheet_sdk::objects::{MessageResponse, ReferenceRequest};

use super::extractors::{GatewayAuthorization, JsonBody};
use super::{ApiError, text, validated};
use crate::state::AppState;

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/payments/links", post(create_link))
        .route("/payments/token", post(issue_token))
        .route("/payments/verify", post(verify_payment))
}

fn to_response(transaction: Transaction) -> PaymentLinkResponse {
    let attributes = transaction.attributes;
    PaymentLinkResponse {
        reference_no: transaction.id,
        url: attributes.url,
        status: attributes.status.as_str().to_string(),
        amount: attributes.amount,
        description: attributes.description,
        remarks: attributes.remarks,
        livemode: attributes.livemode,
    }
}

/// `POST /payments/links`: create a payment link.
///
/// The caller's `Authorization` header is forwarded to the gateway as is.
async fn create_link(
    state: State<AppState>,
    GatewayAuthorization(authorization): GatewayAuthorization,
    JsonBody(body): JsonBody<CreateLinkRequest>,
) -> Result<Json<PaymentLinkResponse>, ApiError> {
    let body = validated(body)?;
    let link = LinkAttributes {
        amount: body.amount.unwrap_or_default(),
        description: text(body.description),
        livemode: body.livemode,
        remarks: body.remarks,
    };
    let transaction = state
        .gateway
        .create_link(&authorization, &link)
        .await
        .map_err(|e| match e {
            GatewayError::Api {
                status: 401 | 403, ..
            } => ApiError::Unauthorized,
            e => ApiError::Gateway(e),
        })?;
    tracing::info!(reference_no = %transaction.id, amount = link.amount, "Payment link created");
    Ok(Json(to_response(transaction)))
}

/// `POST /payments/token`: issue a gateway token from the configured
/// merchant credentials.
async fn issue_token(state: State<AppState>) -> Result<Json<ApiTokenResponse>, ApiError> {
    let credentials = state.config.gateway.read().await.credentials();
    let token = state.gateway.authenticate(&credentials).await?;
    let now = time::OffsetDateTime::now_utc().unix_timestamp();
    Ok(Json(ApiTokenResponse {
        token: token.token,
        expired_at: now + token.expiry_timer,
    }))
}

/// `POST /payments/verify`: copy a settled payment onto its purchase row
/// and credit the referrer.
async fn verify_payment(
    state: State<AppState>,
    JsonBody(body): JsonBody<ReferenceRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let body = validated(body)?;
    let reference_no = body.reference();

    let mut purchase = state
        .sheets
        .process(FindPurchase {
            reference_no: reference_no.to_owned(),
        })
        .await?
        .ok_or(ApiError::NotFound("Reference Number Not Found!"))?;
    if purchase.is_paid() {
        return Err(ApiError::Rejected("Payment is Already Verified!".to_string()));
    }

    let token = state.gateway_token().await?;
    let livemode = state.livemode().await;
    let transaction = state
        .gateway
        .get_transaction(&token, reference_no, livemode)
        .await
        .map_err(|e| match e {
            GatewayError::NotFound => ApiError::NotFound("Reference Number Not Found!"),
            e => ApiError::Gateway(e),
        })?;

    let payment = match transaction.paid_payment() {
        Some(payment) if transaction.attributes.status != TransactionStatus::Unpaid => payment,
        _ => {
            let url = transaction.attributes.url.clone();
            return Err(ApiError::Unpaid(UnpaidResponse {
                message: format!("Go to This Link and Settle Payment: {url}"),
                url,
            }));
        }
    };

    apply_payment(&mut purchase, &transaction, payment);
    let mut columns = PAYMENT_COLUMNS.to_vec();

    if !purchase.referral_code.is_empty() {
        let referral = state
            .sheets
            .process(FindReferral {
                referral_code: purchase.referral_code.clone(),
            })
            .await?;
        let outcome = ReferralOutcome::resolve(referral.as_ref(), centavos(payment.net_amount));
        match &outcome {
            ReferralOutcome::Unknown => tracing::warn!(
                referral_code = %purchase.referral_code,
                "Purchase references an unknown referral code"
            ),
            ReferralOutcome::Invalid(amount) => tracing::warn!(
                referral_code = %purchase.referral_code,
                amount = %amount,
                "Referral amount is not a number, no fee recorded"
            ),
            ReferralOutcome::Revoke => tracing::info!(
                referral_code = %purchase.referral_code,
                "Referrer is inactive, clearing referral code"
            ),
            ReferralOutcome::Credit(_) => {}
        }
        columns.extend_from_slice(apply_referral(&mut purchase, &outcome));
    }

    state
        .sheets
        .process(SavePurchase {
            row: purchase.row,
            cells: select_cells(&purchase, &columns),
        })
        .await?;
    tracing::info!(reference_no, payment_id = %purchase.payment_id, "Payment verified");

    Ok(Json(MessageResponse::new(
        "Payment Has Been Verified , Thank You!",
    )))
}
