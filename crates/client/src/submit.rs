//! Submission client for `POST /api/publish`.
//!
//! Turns a reviewed draft into one composite multipart request: the JSON
//! metadata plus every photo the fallback chain could still resolve. The
//! quota pre-flight is advisory only; the server re-checks.

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;

use kwabo_core::draft::{DraftPhoto, ListingDraft};
use kwabo_core::media::{parse_data_url, PhotoSource};
use kwabo_core::publish::{ErrorBody, ListingCountResponse, PublishResponse, PublishedListing};
use kwabo_core::quota::MAX_LISTINGS_PER_OWNER;

use crate::session::SessionMediaCache;

/// Why a submission did not produce a published listing.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Another submission from this wizard is still running.
    #[error("Une publication est déjà en cours")]
    InFlight,

    /// The owner is at the listing limit.
    #[error("Limite de publication atteinte ({current}/{max} annonces)")]
    QuotaExceeded { current: i64, max: i64 },

    /// The draft was rejected, locally or by the server.
    #[error("{0}")]
    ValidationRejected(String),

    /// Transport failure or a non-validation server error.
    #[error("Échec de la publication: {0}")]
    NetworkOrServer(String),
}

/// One resolved `photos` part, ready for the multipart form.
#[derive(Debug, PartialEq, Eq)]
enum ResolvedPart {
    Bytes { bytes: Vec<u8>, mime: String },
    Url(String),
}

/// HTTP client for the publish API.
pub struct PublishSubmitter {
    client: reqwest::Client,
    base_url: String,
}

impl PublishSubmitter {
    /// `base_url` without a trailing slash, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Submit the draft. Photos resolve in parallel and keep their draft
    /// order; slots that no longer resolve are dropped with a warning.
    pub async fn submit(
        &self,
        draft: &ListingDraft,
        session: &SessionMediaCache,
    ) -> Result<PublishedListing, SubmitError> {
        let meta = draft
            .to_publish_metadata()
            .map_err(|e| SubmitError::ValidationRejected(e.to_string()))?;

        self.preflight_quota(&meta.owner.email).await?;

        let resolutions = draft
            .photos
            .iter()
            .enumerate()
            .map(|(index, photo)| resolve_photo(index, photo, session));
        let parts: Vec<ResolvedPart> = futures::future::join_all(resolutions)
            .await
            .into_iter()
            .flatten()
            .collect();

        if parts.len() < draft.photos.len() {
            tracing::warn!(
                submitted = draft.photos.len(),
                resolved = parts.len(),
                "Some draft photos could not be resolved"
            );
        }
        if parts.is_empty() && !draft.photos.is_empty() {
            return Err(SubmitError::ValidationRejected(
                "Aucune photo n'a pu être préparée. Ajoutez à nouveau vos photos.".to_string(),
            ));
        }

        let data = serde_json::to_string(&meta)
            .map_err(|e| SubmitError::NetworkOrServer(e.to_string()))?;
        let mut form = Form::new().text("data", data);
        for (index, part) in parts.into_iter().enumerate() {
            form = match part {
                ResolvedPart::Bytes { bytes, mime } => {
                    let file = Part::bytes(bytes)
                        .file_name(format!("photo-{index}"))
                        .mime_str(&mime)
                        .map_err(|e| SubmitError::NetworkOrServer(e.to_string()))?;
                    form.part("photos", file)
                }
                ResolvedPart::Url(url) => form.text("photos", url),
            };
        }

        let response = self
            .client
            .post(format!("{}/api/publish", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| SubmitError::NetworkOrServer(e.to_string()))?;

        classify_response(response).await
    }

    /// Advisory quota check before building the request. Transport or
    /// parse failures are logged and ignored: the server re-checks.
    async fn preflight_quota(&self, email: &str) -> Result<(), SubmitError> {
        let request = self
            .client
            .get(format!("{}/api/user/listings/count", self.base_url))
            .query(&[("email", email)]);
        let count = match request.send().await {
            Ok(response) => response.json::<ListingCountResponse>().await,
            Err(e) => {
                tracing::warn!(error = %e, "Quota pre-flight unreachable, submitting anyway");
                return Ok(());
            }
        };
        match count {
            Ok(count) if count.success && !count.can_publish => Err(SubmitError::QuotaExceeded {
                current: count.count,
                max: count.limit,
            }),
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::warn!(error = %e, "Quota pre-flight unreadable, submitting anyway");
                Ok(())
            }
        }
    }
}

/// Map the publish response onto the submit outcome.
async fn classify_response(response: reqwest::Response) -> Result<PublishedListing, SubmitError> {
    let status = response.status();
    if status.is_success() {
        let parsed: PublishResponse = response
            .json()
            .await
            .map_err(|e| SubmitError::NetworkOrServer(e.to_string()))?;
        return Ok(parsed.data);
    }

    let body: ErrorBody = response
        .json()
        .await
        .unwrap_or_else(|_| ErrorBody::new("Réponse illisible du serveur"));
    if body.limit_reached == Some(true) {
        return Err(SubmitError::QuotaExceeded {
            current: body.current_count.unwrap_or(0),
            max: body.max_limit.unwrap_or(MAX_LISTINGS_PER_OWNER),
        });
    }
    if status == StatusCode::BAD_REQUEST {
        return Err(SubmitError::ValidationRejected(body.error));
    }
    Err(SubmitError::NetworkOrServer(format!(
        "{status}: {}",
        body.error
    )))
}

/// Resolve one draft photo through the fallback chain. `None` drops the
/// slot.
async fn resolve_photo(
    index: usize,
    photo: &DraftPhoto,
    session: &SessionMediaCache,
) -> Option<ResolvedPart> {
    match &photo.source {
        PhotoSource::File(path) => match tokio::fs::read(path).await {
            Ok(bytes) if !bytes.is_empty() => Some(ResolvedPart::Bytes {
                bytes,
                mime: "application/octet-stream".to_string(),
            }),
            Ok(_) => {
                tracing::warn!(index, path = %path.display(), "Dropping empty photo file");
                None
            }
            Err(e) => {
                tracing::warn!(index, path = %path.display(), error = %e, "Dropping unreadable photo file");
                None
            }
        },
        PhotoSource::Session(reference) => match session.get(reference) {
            Some(cached) => Some(ResolvedPart::Bytes {
                bytes: cached.bytes.clone(),
                mime: cached.mime.clone(),
            }),
            None => {
                // A reference from a previous session; the bytes are gone.
                tracing::warn!(index, "Dropping stale session photo reference");
                None
            }
        },
        PhotoSource::DataUrl(url) => match parse_data_url(url) {
            Ok(decoded) => Some(ResolvedPart::Bytes {
                bytes: decoded.bytes,
                mime: decoded.mime,
            }),
            Err(e) => {
                tracing::warn!(index, error = %e, "Dropping undecodable data URL");
                None
            }
        },
        PhotoSource::Remote(url) => Some(ResolvedPart::Url(url.clone())),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
