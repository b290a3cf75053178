//! User directory client
//!
//! Resolves user ids to profiles. Unlike grading lookups, directory
//! calls are mandatory for the operations that use them, so failures
//! propagate instead of being absorbed.

use async_trait::async_trait;

use crate::{config::DirectoryConfig, error::AppError, models::User};

/// User directory failure modes
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("user directory timed out")]
    Timeout,

    #[error("user directory unreachable: {0}")]
    Unreachable(String),

    #[error("user directory returned an invalid response: {0}")]
    InvalidResponse(String),
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        AppError::UpstreamTimeout(err.to_string())
    }
}

/// Read access to the user directory
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolve a user id; `Ok(None)` means the user does not exist
    async fn get_user(&self, user_id: i64) -> Result<Option<User>, DirectoryError>;
}

/// reqwest-backed user directory client
pub struct HttpUserDirectory {
    http: reqwest::Client,
    base_url: String,
}

impl HttpUserDirectory {
    pub fn new(config: &DirectoryConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Configuration(format!("directory client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn map_err(err: reqwest::Error) -> DirectoryError {
        if err.is_timeout() {
            DirectoryError::Timeout
        } else if err.is_decode() {
            DirectoryError::InvalidResponse(err.to_string())
        } else {
            DirectoryError::Unreachable(err.to_string())
        }
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn get_user(&self, user_id: i64) -> Result<Option<User>, DirectoryError> {
        let url = format!("{}/users/{}", self.base_url, user_id);

        let response = self.http.get(&url).send().await.map_err(Self::map_err)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = response.error_for_status().map_err(Self::map_err)?;
        let user = response.json().await.map_err(Self::map_err)?;

        Ok(Some(user))
    }
}
