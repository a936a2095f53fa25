use std::sync::Arc;

use crate::config::ServerConfig;
use crate::media::ImageHost;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: kwabo_db::DbPool,
    /// Server configuration (quota limit, image host settings).
    pub config: Arc<ServerConfig>,
    /// External image host used by the publish pipeline. Swapped for a fake
    /// in tests.
    pub image_host: Arc<dyn ImageHost>,
}
