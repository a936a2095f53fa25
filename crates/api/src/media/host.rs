//! Image host client.
//!
//! Uploads photo bytes to a configured external hosting API and returns the
//! stable URL. Every failure here is recoverable: the publish pipeline falls
//! back to inline storage rather than failing the request, so the trait's
//! error type only feeds log lines and the fallback decision.

use async_trait::async_trait;
use serde::Deserialize;

use kwabo_core::types::DbId;

/// Errors from the image host layer.
#[derive(Debug, thiserror::Error)]
pub enum ImageHostError {
    /// No upload endpoint configured. Expected in development; every photo
    /// stores inline.
    #[error("Image host is not configured")]
    NotConfigured,

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The host returned a non-2xx status code.
    #[error("Image host error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The host answered 2xx but the body did not carry a URL.
    #[error("Image host returned an unusable response: {0}")]
    BadResponse(String),
}

/// Where uploaded photos end up. Object-safe so the app state can carry a
/// fake in tests.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload one photo and return its stable URL. `record_id` and `index`
    /// tag the asset so uploads are organized per listing.
    async fn upload(
        &self,
        record_id: DbId,
        index: usize,
        bytes: &[u8],
        mime: &str,
    ) -> Result<String, ImageHostError>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// Successful upload response from the hosting API.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// Client for a plain HTTP upload API (`POST <url>` multipart, `{ "url": .. }`
/// response).
pub struct HttpImageHost {
    client: reqwest::Client,
    upload_url: Option<String>,
    api_key: Option<String>,
}

impl HttpImageHost {
    pub fn new(upload_url: Option<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            upload_url,
            api_key,
        }
    }
}

#[async_trait]
impl ImageHost for HttpImageHost {
    async fn upload(
        &self,
        record_id: DbId,
        index: usize,
        bytes: &[u8],
        mime: &str,
    ) -> Result<String, ImageHostError> {
        let Some(upload_url) = self.upload_url.as_deref() else {
            return Err(ImageHostError::NotConfigured);
        };

        let part = reqwest::multipart::Part::bytes(bytes.to_vec())
            .file_name(format!("listing-{record_id}-{index}"))
            .mime_str(mime)
            .map_err(|e| ImageHostError::BadResponse(format!("Invalid MIME type: {e}")))?;
        let form = reqwest::multipart::Form::new()
            .text("folder", format!("listings/{record_id}"))
            .part("file", part);

        let mut request = self.client.post(upload_url).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImageHostError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| ImageHostError::BadResponse(e.to_string()))?;
        Ok(parsed.url)
    }
}

// ---------------------------------------------------------------------------
// Test fakes
// ---------------------------------------------------------------------------

/// Fake host answering canned URLs. Used by tests and offline demos.
pub struct StaticImageHost {
    base_url: String,
}

impl StaticImageHost {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ImageHost for StaticImageHost {
    async fn upload(
        &self,
        record_id: DbId,
        index: usize,
        _bytes: &[u8],
        _mime: &str,
    ) -> Result<String, ImageHostError> {
        Ok(format!("{}/listings/{record_id}/{index}", self.base_url))
    }
}

/// Fake host that always fails, for exercising the inline fallback.
pub struct FailingImageHost;

#[async_trait]
impl ImageHost for FailingImageHost {
    async fn upload(
        &self,
        _record_id: DbId,
        _index: usize,
        _bytes: &[u8],
        _mime: &str,
    ) -> Result<String, ImageHostError> {
        Err(ImageHostError::ApiError {
            status: 503,
            body: "host down".into(),
        })
    }
}
