//! Temporal protocol identifiers.
//!
//! A protocol id is the creation wall-clock instant written out as a
//! 17-digit decimal string: year, month, day, hour, minute, second, and
//! millisecond, each zero-padded. Ids generated on one process are
//! monotonically increasing as long as no two creations land in the same
//! millisecond; a same-millisecond pair collides on the primary key and the
//! insert fails.

use chrono::{Local, NaiveDateTime};

/// YYYYMMDDHHMMSS plus three millisecond digits.
pub const PROTOCOL_ID_LEN: usize = 17;

/// Generates a protocol id from the current local wall-clock time.
#[must_use]
pub fn generate() -> String {
    format_timestamp(Local::now().naive_local())
}

fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%Y%m%d%H%M%S%3f").to_string()
}
