//! Time helpers. Steam stamps requests with its own clock, so every time-based value is
//! computed from the local time plus the session's clock offset.

use std::time::{SystemTime, UNIX_EPOCH};
use chrono::{DateTime, TimeZone, Utc};

/// A timestamp from Steam.
pub type ServerTime = DateTime<Utc>;

/// Converts a unix timestamp in seconds into a [`ServerTime`].
pub fn timestamp_to_server_time(timestamp: i64) -> ServerTime {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .unwrap_or_default()
}

/// The current local unix time in seconds.
pub fn get_system_time() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(n) => n.as_secs(),
        // should never occur
        Err(_) => 0,
    }
}

/// The current local unix time in milliseconds.
pub fn get_system_time_millis() -> u128 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(n) => n.as_millis(),
        Err(_) => 0,
    }
}

/// The current unix time on Steam's servers given the offset (server time - local time).
pub fn server_time(time_offset: i64) -> u64 {
    (get_system_time() as i64)
        .saturating_add(time_offset)
        .max(0) as u64
}
