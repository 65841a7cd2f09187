//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Current UTC time, used to stamp mood observations
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
