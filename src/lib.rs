//! TaskGrade - Assignment Lifecycle Backend
//!
//! This library provides the coordination core of a programming-course
//! platform: tutors author assignments composed of questions, test
//! cases and reference solutions, publish them to students, and both
//! sides read consolidated submission state sourced from the external
//! grading service.
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Business logic and lifecycle rules
//! - **Repository**: Database access behind a trait seam
//! - **Clients**: Grading service and user directory
//! - **Models**: Domain models and DTOs

pub mod clients;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
