//! Time utilities

use chrono::{DateTime, Utc};

/// Get current UTC time
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Check if a datetime is in the past
pub fn is_past(dt: DateTime<Utc>) -> bool {
    dt < now_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_past() {
        assert!(is_past(Utc::now() - chrono::Duration::hours(1)));
        assert!(!is_past(Utc::now() + chrono::Duration::hours(1)));
    }
}
