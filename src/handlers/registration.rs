//! Proprietor registration handlers

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use crate::handlers::{ApiResponse, AppState, ValidatedJson};
use crate::models::{PaymentInfoRequest, PersonalInfoRequest, ProprietorView, SchoolInfoRequest, StepResponse};
use crate::utils::errors::Result;

/// POST /api/registration/step1
pub async fn step1(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<PersonalInfoRequest>,
) -> Result<Json<ApiResponse<StepResponse>>> {
    let proprietor = state.services.registration.submit_personal_info(request).await?;
    Ok(Json(ApiResponse::ok(StepResponse::from_proprietor(
        &proprietor,
        "Personal information saved",
    ))))
}

/// POST /api/registration/step2
pub async fn step2(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SchoolInfoRequest>,
) -> Result<Json<ApiResponse<StepResponse>>> {
    let proprietor = state.services.registration.submit_school_info(request).await?;
    Ok(Json(ApiResponse::ok(StepResponse::from_proprietor(
        &proprietor,
        "School information saved",
    ))))
}

/// POST /api/registration/step3
pub async fn step3(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<PaymentInfoRequest>,
) -> Result<Json<ApiResponse<StepResponse>>> {
    let final_submit = request.final_submit;
    let proprietor = state
        .services
        .registration
        .submit_payment_info(request, Utc::now())
        .await?;

    let message = if final_submit {
        "Registration submitted successfully"
    } else {
        "Payment information saved"
    };
    Ok(Json(ApiResponse::ok(StepResponse::from_proprietor(&proprietor, message))))
}

/// GET /api/registration/{submission_id}
pub async fn status(
    State(state): State<AppState>,
    Path(submission_id): Path<String>,
) -> Result<Json<ApiResponse<ProprietorView>>> {
    let view = state.services.registration.get(&submission_id).await?;
    Ok(Json(ApiResponse::ok(view)))
}
