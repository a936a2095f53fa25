//! Listing quota arithmetic.
//!
//! Every owner account may hold a bounded number of listings. The client
//! runs an advisory pre-flight against these rules; the publish endpoint
//! enforces them authoritatively with the same functions.

use crate::error::CoreError;

/// Default maximum number of listings per owner account.
pub const MAX_LISTINGS_PER_OWNER: i64 = 5;

/// Whether an owner holding `current` listings may publish another one.
pub fn can_publish(current: i64, max: i64) -> bool {
    current < max
}

/// How many more listings the owner may publish.
pub fn remaining(current: i64, max: i64) -> i64 {
    (max - current).max(0)
}

/// Quota gate returning the structured error the API maps to a 403.
pub fn check_quota(current: i64, max: i64) -> Result<(), CoreError> {
    if can_publish(current, max) {
        Ok(())
    } else {
        Err(CoreError::QuotaExceeded { current, max })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
