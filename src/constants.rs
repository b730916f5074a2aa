use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// How often soft-deleted posts are purged.
pub const PURGE_INTERVAL_SECS: u64 = 60 * 60 * 24;
