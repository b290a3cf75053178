//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// AUTHENTICATION DEFAULTS
// =============================================================================

/// Default JWT token expiry in hours
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

// =============================================================================
// COLLABORATOR DEFAULTS
// =============================================================================

/// Default timeout for grading-service lookups, in milliseconds
pub const DEFAULT_GRADING_TIMEOUT_MS: u64 = 3000;

/// Default timeout for user-directory lookups, in milliseconds
pub const DEFAULT_DIRECTORY_TIMEOUT_MS: u64 = 3000;

// =============================================================================
// REFERENCE SOLUTION LANGUAGES
// =============================================================================

/// Language identifiers accepted for reference solutions
pub mod languages {
    pub const PYTHON: &str = "python";
    pub const C: &str = "c";
    pub const JAVA: &str = "java";

    /// All supported language identifiers
    pub const ALL: &[&str] = &[PYTHON, C, JAVA];
}

// =============================================================================
// USER ROLES
// =============================================================================

/// User role identifiers (owned by the user directory)
pub mod roles {
    pub const TUTOR: &str = "tutor";
    pub const STUDENT: &str = "student";

    /// All user roles
    pub const ALL: &[&str] = &[TUTOR, STUDENT];
}

// =============================================================================
// API VERSIONING
// =============================================================================

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";

// =============================================================================
// VALIDATION
// =============================================================================

/// Maximum assignment title length
pub const MAX_ASSIGNMENT_TITLE_LENGTH: u64 = 255;

/// Maximum question title length
pub const MAX_QUESTION_TITLE_LENGTH: u64 = 255;

/// Maximum question description length
pub const MAX_QUESTION_DESCRIPTION_LENGTH: u64 = 50_000;
