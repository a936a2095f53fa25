//! Shared primitive type aliases.

/// Database identifier (`BIGSERIAL` / `BIGINT`).
pub type DbId = i64;

/// UTC timestamp as stored in `TIMESTAMPTZ` columns.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Monetary amount in whole CFA francs. XOF has no minor unit, so prices
/// are carried as plain integers end to end.
pub type Fcfa = i64;
