use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Publication limit reached: {current} of {max} listings")]
    QuotaExceeded { current: i64, max: i64 },

    #[error("Internal error: {0}")]
    Internal(String),
}
