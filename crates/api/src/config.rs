use kwabo_core::quota::MAX_LISTINGS_PER_OWNER;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Maximum number of listings one owner account may hold.
    pub max_listings_per_owner: i64,
    /// Upload endpoint of the external image host. When unset, every photo
    /// falls back to inline storage.
    pub image_host_url: Option<String>,
    /// API key sent with image host uploads.
    pub image_host_api_key: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `HOST`                   | `0.0.0.0`               |
    /// | `PORT`                   | `3000`                  |
    /// | `CORS_ORIGINS`           | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                    |
    /// | `MAX_LISTINGS_PER_OWNER` | `5`                     |
    /// | `IMAGE_HOST_URL`         | unset                   |
    /// | `IMAGE_HOST_API_KEY`     | unset                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_listings_per_owner: i64 = std::env::var("MAX_LISTINGS_PER_OWNER")
            .ok()
            .map(|v| v.parse().expect("MAX_LISTINGS_PER_OWNER must be a valid i64"))
            .unwrap_or(MAX_LISTINGS_PER_OWNER);

        let image_host_url = std::env::var("IMAGE_HOST_URL").ok().filter(|s| !s.is_empty());
        let image_host_api_key = std::env::var("IMAGE_HOST_API_KEY")
            .ok()
            .filter(|s| !s.is_empty());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_listings_per_owner,
            image_host_url,
            image_host_api_key,
        }
    }
}
