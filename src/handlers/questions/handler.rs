//! Question handler implementations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    services::QuestionService,
    state::AppState,
};

use super::{request::UpdateQuestionRequest, response::QuestionDetailResponse};

/// Get a question detail, filtered for the requesting viewer
pub async fn get_question(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<QuestionDetailResponse>> {
    let detail = QuestionService::get_question(state.repo(), id, auth_user.id).await?;
    Ok(Json(detail))
}

/// Edit a question's content fields
pub async fn update_question(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateQuestionRequest>,
) -> AppResult<Json<QuestionDetailResponse>> {
    payload.validate()?;

    let detail =
        QuestionService::update_question(state.repo(), id, auth_user.id, payload).await?;
    Ok(Json(detail))
}

/// Remove a question from its draft parent
pub async fn delete_question(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    QuestionService::delete_question(state.repo(), id, auth_user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
