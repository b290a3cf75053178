//! Utility functions

pub mod time;
pub mod validation;

pub use time::now_utc;
pub use validation::{parse_bool_param, parse_user_id_param};
