//! Catalogue search constants and helpers.
//!
//! This module lives in `core` (zero internal deps) so the API layer and
//! any future CLI tooling share the same pagination and matching rules.

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of catalogue results per page.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Maximum number of catalogue results per page.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Pattern helpers
// ---------------------------------------------------------------------------

/// Escape `%`, `_` and `\` in user input and wrap it for an ILIKE
/// substring match. Used by the location filter so "Fidjrossè_2" matches
/// literally instead of as a wildcard.
pub fn ilike_contains_pattern(input: &str) -> String {
    let escaped = input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- clamp_limit ---------------------------------------------------------

    #[test]
    fn clamp_limit_uses_default_when_none() {
        assert_eq!(clamp_limit(None, 20, 100), 20);
    }

    #[test]
    fn clamp_limit_respects_max() {
        assert_eq!(clamp_limit(Some(200), 20, 100), 100);
    }

    #[test]
    fn clamp_limit_floors_at_one() {
        assert_eq!(clamp_limit(Some(-5), 20, 100), 1);
        assert_eq!(clamp_limit(Some(0), 20, 100), 1);
    }

    #[test]
    fn clamp_limit_passes_through_valid_value() {
        assert_eq!(clamp_limit(Some(50), 20, 100), 50);
    }

    // -- clamp_offset --------------------------------------------------------

    #[test]
    fn clamp_offset_defaults_to_zero() {
        assert_eq!(clamp_offset(None), 0);
    }

    #[test]
    fn clamp_offset_floors_at_zero() {
        assert_eq!(clamp_offset(Some(-10)), 0);
    }

    #[test]
    fn clamp_offset_passes_through_valid_value() {
        assert_eq!(clamp_offset(Some(40)), 40);
    }

    // -- ilike_contains_pattern ----------------------------------------------

    #[test]
    fn pattern_wraps_plain_input() {
        assert_eq!(ilike_contains_pattern("Cotonou"), "%Cotonou%");
    }

    #[test]
    fn pattern_escapes_wildcards() {
        assert_eq!(ilike_contains_pattern("a%b"), "%a\\%b%");
        assert_eq!(ilike_contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(ilike_contains_pattern("a\\b"), "%a\\\\b%");
    }
}
