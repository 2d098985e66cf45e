//! HTTP request handlers.

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    Extension, Form, Json,
};
use chrono::Utc;

use crate::api::types::*;
use crate::auth::{AuthGate, Subject};
use crate::domain::{NewSurveyRecord, SurveyReceipt, SurveyRecord, SurveySubmission};
use crate::error::SurveyResult;
use crate::AppState;

/// Store a survey submission.
///
/// POST /surveys
#[utoipa::path(
    post,
    path = "/surveys",
    request_body = SurveySubmission,
    responses(
        (status = 200, description = "Survey stored", body = SurveyReceipt),
        (status = 415, description = "Body is not JSON"),
        (status = 422, description = "Missing or malformed field"),
        (status = 503, description = "Storage unavailable")
    ),
    tag = "surveys"
)]
pub async fn submit_survey(
    State(state): State<AppState>,
    payload: Result<Json<SurveySubmission>, JsonRejection>,
) -> SurveyResult<Json<SurveyReceipt>> {
    let Json(submission) = payload.map_err(|rejection| {
        tracing::info!(reason = %rejection.body_text(), "Rejected survey payload");
        rejection
    })?;

    let record = NewSurveyRecord::from_submission(submission, Utc::now());
    let receipt = state.repository.insert_survey(&record).await?;

    tracing::info!(
        survey_id = receipt.id,
        assembly = %record.assembly,
        ward = %record.gba_ward,
        has_location = record.latitude.is_some() && record.longitude.is_some(),
        has_audio = record.audio_base64.is_some(),
        "Survey stored"
    );

    Ok(Json(receipt))
}

/// List all stored survey responses, newest first.
///
/// GET /api/responses
#[utoipa::path(
    get,
    path = "/api/responses",
    responses(
        (status = 200, description = "All survey responses", body = Vec<SurveyRecord>),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 503, description = "Storage unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "surveys"
)]
pub async fn list_responses(
    State(state): State<AppState>,
    Extension(Subject(subject)): Extension<Subject>,
) -> SurveyResult<Json<Vec<SurveyRecord>>> {
    let surveys = state.repository.list_surveys().await?;

    tracing::info!(subject = %subject, count = surveys.len(), "Survey responses listed");

    Ok(Json(surveys))
}

/// Health check endpoint.
///
/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// ==================== Authentication Endpoints ====================

/// Exchange credentials for a bearer token.
///
/// POST /token
#[utoipa::path(
    post,
    path = "/token",
    request_body(content = TokenRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Incorrect username or password"),
        (status = 415, description = "Body is not form-encoded"),
        (status = 422, description = "Missing username or password")
    ),
    tag = "auth"
)]
pub async fn issue_token(
    State(gate): State<AuthGate>,
    form: Result<Form<TokenRequest>, FormRejection>,
) -> SurveyResult<Json<TokenResponse>> {
    let Form(request) = form?;
    let subject = gate.authenticate(&request.username, &request.password)?;
    let access_token = gate.issue_token(&subject)?;

    tracing::info!(
        subject = %subject,
        expires_in_secs = gate.jwt_manager().token_duration().num_seconds(),
        "Access token issued"
    );

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
