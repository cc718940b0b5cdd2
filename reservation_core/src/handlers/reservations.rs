//! Reservation endpoints: the form catalog and the submission itself

use crate::{
    extractors::EnvelopeJson,
    form::current_month_options,
    models::{photo_type_catalog, request::ApiResponse, ReservationRequest},
    services::SubmissionOutcome,
    AppState,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::info;

pub async fn handle_photo_types() -> impl IntoResponse {
    Json(ApiResponse::success(photo_type_catalog()))
}

pub async fn handle_months() -> impl IntoResponse {
    Json(ApiResponse::success(current_month_options()))
}

pub async fn handle_create_reservation(
    State(state): State<AppState>,
    EnvelopeJson(request): EnvelopeJson<ReservationRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/reservations - photo_types: {:?}, shooting_month: {}",
        request.photo_types, request.shooting_month
    );

    let outcome = state.reservations.process(request).await;
    let status = match &outcome {
        SubmissionOutcome::Created(_) => StatusCode::CREATED,
        SubmissionOutcome::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SubmissionOutcome::Rejected(_) => StatusCode::BAD_GATEWAY,
        SubmissionOutcome::Failed => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, Json(outcome.into_result()))
}
