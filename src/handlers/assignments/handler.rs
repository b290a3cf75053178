//! Assignment handler implementations

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    services::AssignmentService,
    state::AppState,
    utils::validation::parse_bool_param,
};

use super::{
    request::{
        AddQuestionsRequest, CreateAssignmentRequest, ListAssignmentsQuery,
        UpdateAssignmentRequest,
    },
    response::{AssignmentDetailResponse, AssignmentsListResponse},
};

/// List assignments visible to the requesting user
pub async fn list_assignments(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<ListAssignmentsQuery>,
) -> AppResult<Json<AssignmentsListResponse>> {
    let include_past = match query.include_past.as_deref() {
        Some(raw) => parse_bool_param("includePast", raw)?,
        None => false,
    };
    let is_published = match query.is_published.as_deref() {
        Some(raw) => Some(parse_bool_param("isPublished", raw)?),
        None => None,
    };

    let assignments =
        AssignmentService::list_assignments(state.repo(), auth_user.id, include_past, is_published)
            .await?;

    let total = assignments.len();
    Ok(Json(AssignmentsListResponse { assignments, total }))
}

/// Create a new draft assignment
pub async fn create_assignment(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateAssignmentRequest>,
) -> AppResult<(StatusCode, Json<AssignmentDetailResponse>)> {
    payload.validate()?;

    let detail = AssignmentService::create_assignment(
        state.repo(),
        state.directory(),
        auth_user.id,
        payload,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

/// Get an assignment detail
pub async fn get_assignment(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AssignmentDetailResponse>> {
    let detail = AssignmentService::get_assignment(state.repo(), id, auth_user.id).await?;
    Ok(Json(detail))
}

/// Update an assignment's top-level fields
pub async fn update_assignment(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateAssignmentRequest>,
) -> AppResult<Json<AssignmentDetailResponse>> {
    payload.validate()?;

    let detail = AssignmentService::update_assignment(
        state.repo(),
        state.directory(),
        id,
        auth_user.id,
        payload,
    )
    .await?;

    Ok(Json(detail))
}

/// Delete an assignment and everything it owns
pub async fn delete_assignment(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    AssignmentService::delete_assignment(state.repo(), id, auth_user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Append a batch of questions to a draft assignment
pub async fn add_questions(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<AddQuestionsRequest>,
) -> AppResult<(StatusCode, Json<AssignmentDetailResponse>)> {
    payload.validate()?;

    let detail =
        AssignmentService::add_questions(state.repo(), id, auth_user.id, payload.questions)
            .await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

/// Publish an assignment (one-way)
pub async fn publish_assignment(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AssignmentDetailResponse>> {
    let detail = AssignmentService::publish_assignment(state.repo(), id, auth_user.id).await?;
    Ok(Json(detail))
}
