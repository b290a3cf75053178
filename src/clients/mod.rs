//! Collaborator clients
//!
//! Typed HTTP clients for the external services this core depends on:
//! the grading service (submissions, feedback) and the user directory
//! (profiles, author validation). Traits sit at the seam so services can
//! be tested against mocks.

pub mod directory;
pub mod grading;

pub use directory::{DirectoryError, HttpUserDirectory, UserDirectory};
pub use grading::{FeedbackRequest, GradingClient, GradingError, HttpGradingClient};
