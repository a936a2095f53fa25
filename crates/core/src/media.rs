//! Photo reference classification and media helpers.
//!
//! A draft photo is a reference plus a kind. Both the client submitter and
//! the publish endpoint work through the same fallback chain: binary file,
//! session-scoped reference, inline data URL, remote URL. Anything that
//! fits none of these is dropped by the caller, never a hard failure.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Scheme prefix for session-scoped photo references.
pub const SESSION_SCHEME: &str = "session:";

/// Placeholder reference prefix used by not-yet-finalized records.
pub const PENDING_SCHEME: &str = "pending://";

/// Generic placeholder stored when a record is created with no photos.
pub const PENDING_LISTING_REF: &str = "pending://listing";

static DATA_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:(?P<mime>[^;,]+)?(?P<b64>;base64)?,(?P<payload>.*)$").expect("valid regex")
});

// ---------------------------------------------------------------------------
// Photo sources
// ---------------------------------------------------------------------------

/// Where the bytes of a draft photo live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "ref", rename_all = "camelCase")]
pub enum PhotoSource {
    /// Picked file on the local filesystem.
    File(PathBuf),
    /// Session-scoped reference (`session:<uuid>`). Resolvable only through
    /// the live session cache; goes stale across a draft restore.
    Session(String),
    /// Inline `data:` URL.
    DataUrl(String),
    /// Absolute http(s) URL.
    Remote(String),
}

impl PhotoSource {
    /// Classify a raw reference string. Returns `None` for empty strings
    /// and schemes outside the fallback chain.
    pub fn classify(raw: &str) -> Option<PhotoSource> {
        let r = raw.trim();
        if r.is_empty() {
            return None;
        }
        if is_remote_url(r) {
            return Some(Self::Remote(r.to_string()));
        }
        if r.starts_with("data:") {
            return Some(Self::DataUrl(r.to_string()));
        }
        if r.starts_with(SESSION_SCHEME) {
            return Some(Self::Session(r.to_string()));
        }
        if let Some(path) = r.strip_prefix("file://") {
            return Some(Self::File(PathBuf::from(path)));
        }
        if !r.contains("://") {
            return Some(Self::File(PathBuf::from(r)));
        }
        None
    }

    /// Short kind tag for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Session(_) => "session",
            Self::DataUrl(_) => "data_url",
            Self::Remote(_) => "remote",
        }
    }
}

impl Default for PhotoSource {
    fn default() -> Self {
        Self::Remote(String::new())
    }
}

/// True for absolute http(s) URLs, which pass through the publish pipeline
/// verbatim.
pub fn is_remote_url(r: &str) -> bool {
    r.starts_with("http://") || r.starts_with("https://")
}

// ---------------------------------------------------------------------------
// Data URLs
// ---------------------------------------------------------------------------

/// A decoded `data:` URL payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Parse a base64 `data:` URL. Percent-encoded (non-base64) payloads are
/// rejected; photo capture only ever produces base64.
pub fn parse_data_url(url: &str) -> Result<DecodedDataUrl, CoreError> {
    let caps = DATA_URL_RE
        .captures(url)
        .ok_or_else(|| CoreError::Validation(format!("Not a data URL: '{}'", truncate(url, 32))))?;
    if caps.name("b64").is_none() {
        return Err(CoreError::Validation(
            "Only base64 data URLs are supported".to_string(),
        ));
    }
    let mime = caps
        .name("mime")
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let payload = caps.name("payload").map(|m| m.as_str()).unwrap_or_default();
    let bytes = BASE64
        .decode(payload)
        .map_err(|e| CoreError::Validation(format!("Invalid base64 in data URL: {e}")))?;
    Ok(DecodedDataUrl { mime, bytes })
}

/// Encode bytes as an inline `data:` URL (the storage fallback when the
/// external image host is unavailable).
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", BASE64.encode(bytes))
}

/// Best-effort MIME type from magic bytes. `None` when the bytes are not
/// one of the supported photo formats.
pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    match image::guess_format(bytes).ok()? {
        image::ImageFormat::Png => Some("image/png"),
        image::ImageFormat::Jpeg => Some("image/jpeg"),
        image::ImageFormat::WebP => Some("image/webp"),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Placeholder references
// ---------------------------------------------------------------------------

/// Placeholder references for a not-yet-finalized record: one pending
/// marker per expected photo, or a single generic marker when none.
pub fn placeholder_refs(photo_count: usize) -> Vec<String> {
    if photo_count == 0 {
        return vec![PENDING_LISTING_REF.to_string()];
    }
    (0..photo_count)
        .map(|i| format!("{PENDING_SCHEME}photo/{i}"))
        .collect()
}

/// True for references produced by [`placeholder_refs`].
pub fn is_placeholder_ref(r: &str) -> bool {
    r.starts_with(PENDING_SCHEME)
}

// ---------------------------------------------------------------------------
// Reference list hygiene
// ---------------------------------------------------------------------------

/// Drop duplicate references, keeping first occurrences in order. Returns
/// the deduplicated list and the number of duplicates removed.
pub fn dedup_preserving_order(refs: Vec<String>) -> (Vec<String>, usize) {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(refs.len());
    let mut dropped = 0usize;
    for r in refs {
        if seen.insert(r.clone()) {
            out.push(r);
        } else {
            dropped += 1;
        }
    }
    (out, dropped)
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
