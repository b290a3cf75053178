//! User model (user-directory contract)

use serde::{Deserialize, Serialize};

/// User profile as served by the user directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    /// One of the identifiers in [`crate::constants::roles`]
    pub role: String,
}

impl User {
    pub fn is_tutor(&self) -> bool {
        self.role == crate::constants::roles::TUTOR
    }
}
