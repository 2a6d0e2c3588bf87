//! Record identifiers
//!
//! Ids are the creation time in milliseconds since the Unix epoch, rendered
//! as a decimal string. Within one process they are strictly increasing:
//! a request landing in the same millisecond as the previous one is bumped
//! to the next free value.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Generate a fresh record id
pub fn next_id() -> String {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_ID.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_ID.compare_exchange_weak(last, candidate, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => return candidate.to_string(),
            Err(actual) => last = actual,
        }
    }
}
