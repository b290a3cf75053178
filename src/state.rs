//! Application state management
//!
//! Shared state passed to all request handlers via Axum's State
//! extractor. The persistence and upstream clients sit behind trait
//! objects so handlers stay decoupled from the concrete transports.

use std::sync::Arc;

use crate::{
    clients::{directory::UserDirectory, grading::GradingClient},
    config::Config,
    db::repository::EntityRepository,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Entity persistence
    pub repo: Arc<dyn EntityRepository>,

    /// Grading service client
    pub grading: Arc<dyn GradingClient>,

    /// User directory client
    pub directory: Arc<dyn UserDirectory>,

    /// Application configuration
    pub config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(
        repo: Arc<dyn EntityRepository>,
        grading: Arc<dyn GradingClient>,
        directory: Arc<dyn UserDirectory>,
        config: Config,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                repo,
                grading,
                directory,
                config,
            }),
        }
    }

    /// Get a reference to the entity repository
    pub fn repo(&self) -> &dyn EntityRepository {
        self.inner.repo.as_ref()
    }

    /// Get a reference to the grading client
    pub fn grading(&self) -> &dyn GradingClient {
        self.inner.grading.as_ref()
    }

    /// Get a reference to the user directory client
    pub fn directory(&self) -> &dyn UserDirectory {
        self.inner.directory.as_ref()
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
