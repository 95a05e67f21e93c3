//! Referral program handlers.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use kanau::processor::Processor;
use paysheet_core::entities::checkbox;
use paysheet_core::entities::purchases::ListReferralFees;
use paysheet_core::entities::referrals::{FindReferral, InsertReferral, ReferralRecord};
use paysheet_sdk::objects::referral::{
    CommissionResponse, CommissionSummary, CreateReferralRequest, ReferralCodeRequest,
    ReferralCreated,
};

use super::extractors::JsonBody;
use super::{ApiError, text, validated};
use crate::state::AppState;

const NOT_FOUND: &str = "Referral Code Not Found!";

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/referrals", post(create_referral))
        .route("/referrals/commission", post(get_commission))
        .route("/referrals/commission/summary", post(get_commission_summary))
        .route("/referrals/commission/history", post(get_commission_history))
}

async fn find(state: &AppState, referral_code: &str) -> Result<ReferralRecord, ApiError> {
    state
        .sheets
        .process(FindReferral {
            referral_code: referral_code.to_owned(),
        })
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))
}

/// `POST /referrals`: open a referral account keyed by username.
///
/// Accounts created inactive wait for approval on the sheet.
async fn create_referral(
    state: State<AppState>,
    JsonBody(body): JsonBody<CreateReferralRequest>,
) -> Result<(StatusCode, Json<ReferralCreated>), ApiError> {
    let body = validated(body)?;
    let referral_code = text(body.username);

    let existing = state
        .sheets
        .process(FindReferral {
            referral_code: referral_code.clone(),
        })
        .await?;
    if existing.is_some() {
        return Err(ApiError::AlreadyExists(
            "Referral Account Record Already Exist!",
        ));
    }

    let referral = ReferralRecord {
        referral_code,
        name: text(body.name),
        email: text(body.email),
        kind: body.kind,
        amount: body.amount.normalize().to_string(),
        active: checkbox(body.active).to_owned(),
        ..Default::default()
    };
    let stored = state.sheets.process(InsertReferral { referral }).await?;
    tracing::info!(
        referral_code = %stored.referral_code,
        row = stored.row,
        active = body.active,
        "Referral account created"
    );

    let message = if body.active {
        "You Have Successfully Join Our Referral Program!"
    } else {
        "Please Wait For Us To Approved Your Application"
    };
    Ok((
        StatusCode::CREATED,
        Json(ReferralCreated {
            message: message.to_string(),
            row: stored.row,
            cells: format!("A1:H{}", stored.row),
        }),
    ))
}

/// `POST /referrals/commission`: lifetime commission of a referrer.
async fn get_commission(
    state: State<AppState>,
    JsonBody(body): JsonBody<ReferralCodeRequest>,
) -> Result<Json<CommissionResponse>, ApiError> {
    let body = validated(body)?;
    let referral = find(&state, body.code()).await?;
    Ok(Json(CommissionResponse {
        commission: referral.commission,
    }))
}

/// `POST /referrals/commission/summary`
async fn get_commission_summary(
    state: State<AppState>,
    JsonBody(body): JsonBody<ReferralCodeRequest>,
) -> Result<Json<CommissionSummary>, ApiError> {
    let body = validated(body)?;
    let referral = find(&state, body.code()).await?;
    Ok(Json(CommissionSummary {
        commission: referral.commission,
        withdrawable: referral.withdrawable,
    }))
}

/// `POST /referrals/commission/history`: the referral fee of every purchase
/// made with the code, in sheet order.
async fn get_commission_history(
    state: State<AppState>,
    JsonBody(body): JsonBody<ReferralCodeRequest>,
) -> Result<Json<Vec<String>>, ApiError> {
    let body = validated(body)?;
    let fees = state
        .sheets
        .process(ListReferralFees {
            referral_code: body.code().to_owned(),
        })
        .await?;
    if fees.is_empty() {
        return Err(ApiError::NotFound(NOT_FOUND));
    }
    Ok(Json(fees))
}
