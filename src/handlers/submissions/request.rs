//! Submission view request DTOs

use serde::Deserialize;

/// Query parameters for the per-assignment submission view.
///
/// `userId` defaults to the authenticated user; tutors who author the
/// assignment may pass any student's id.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentSubmissionsQuery {
    pub user_id: Option<String>,
}

/// Query parameters for the submissions overview
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewQuery {
    pub user_id: Option<String>,
}
