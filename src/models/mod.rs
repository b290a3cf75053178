//! Domain models
//!
//! This module contains all domain models used throughout the application.

pub mod assignment;
pub mod question;
pub mod reference_solution;
pub mod submission;
pub mod test_case;
pub mod user;

pub use assignment::*;
pub use question::*;
pub use reference_solution::*;
pub use submission::*;
pub use test_case::*;
pub use user::*;
