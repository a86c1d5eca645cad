//! Small shared value types

use std::time::{SystemTime, UNIX_EPOCH};

/// Current Unix time in seconds.
///
/// Saturates to 0 on a pre-epoch clock instead of panicking.
pub fn unix_now() -> i64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
		.unwrap_or(0)
}


// vim: ts=4
