//! Submission view handler implementations

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    clients::grading::FeedbackRequest,
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    models::Feedback,
    services::SubmissionService,
    state::AppState,
    utils::validation::parse_user_id_param,
};

use super::{
    request::{AssignmentSubmissionsQuery, OverviewQuery},
    response::{AssignmentSubmissionsResponse, OverviewResponse},
};

/// Consolidated submission view for one assignment
pub async fn assignment_submissions(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
    Query(query): Query<AssignmentSubmissionsQuery>,
) -> AppResult<Json<AssignmentSubmissionsResponse>> {
    let target = match query.user_id.as_deref() {
        Some(raw) => Some(parse_user_id_param("userId", raw)?),
        None => None,
    };

    let view = SubmissionService::assignment_submissions(
        state.repo(),
        state.grading(),
        state.config().grading.timeout(),
        id,
        auth_user.id,
        target,
    )
    .await?;

    Ok(Json(view))
}

/// Role-dependent submissions overview
pub async fn overview(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<OverviewQuery>,
) -> AppResult<Json<OverviewResponse>> {
    let target = match query.user_id.as_deref() {
        Some(raw) => Some(parse_user_id_param("userId", raw)?),
        None => None,
    };

    let overview = SubmissionService::overview(
        state.repo(),
        state.grading(),
        state.directory(),
        state.config().grading.timeout(),
        auth_user.id,
        target,
    )
    .await?;

    Ok(Json(overview))
}

/// Forward tutor feedback to the grading service
pub async fn post_feedback(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<FeedbackRequest>,
) -> AppResult<(StatusCode, Json<Feedback>)> {
    let feedback = SubmissionService::post_feedback(
        state.grading(),
        state.directory(),
        auth_user.id,
        payload,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(feedback)))
}
