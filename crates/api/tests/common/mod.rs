//! Shared helpers for the API integration tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, Response};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceExt;

use kwabo_api::config::ServerConfig;
use kwabo_api::media::{ImageHost, StaticImageHost};
use kwabo_api::router::build_app_router;
use kwabo_api::state::AppState;

/// Multipart boundary used by [`publish_body`] and [`post_multipart`].
pub const BOUNDARY: &str = "kwabo-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_listings_per_owner: 5,
        image_host_url: None,
        image_host_api_key: None,
    }
}

/// Build the full application router with all middleware layers, backed by
/// a canned image host that always answers a hosted URL.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_host(pool, Arc::new(StaticImageHost::new("https://img.test")))
}

/// Same as [`build_test_app`] but with an injectable image host, for
/// exercising the inline-storage fallback.
pub fn build_test_app_with_host(pool: PgPool, image_host: Arc<dyn ImageHost>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        image_host,
    };
    build_app_router(state, &config)
}

/// Send a GET request to the app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a multipart POST with a body built by [`publish_body`].
pub async fn post_multipart(app: Router, uri: &str, body: Vec<u8>) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Publish request building
// ---------------------------------------------------------------------------

/// One `photos` part of a publish request.
pub enum PhotoPart<'a> {
    /// Binary upload with a filename and declared content type.
    File {
        filename: &'a str,
        mime: &'a str,
        bytes: &'a [u8],
    },
    /// Bare string part: a remote URL or an inline data URL.
    Text(&'a str),
}

/// Minimal bytes that sniff as JPEG.
pub const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0\x00\x10JFIF\x00\x01";

/// Minimal bytes that sniff as PNG.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";

/// Encode a `data` JSON field plus `photos` parts as one multipart body
/// delimited by [`BOUNDARY`].
pub fn publish_body(data: &serde_json::Value, photos: &[PhotoPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    push_text_part(&mut body, "data", &data.to_string());
    for photo in photos {
        match photo {
            PhotoPart::File {
                filename,
                mime,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photos\"; \
                         filename=\"{filename}\"\r\nContent-Type: {mime}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
            PhotoPart::Text(text) => push_text_part(&mut body, "photos", text),
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn push_text_part(body: &mut Vec<u8>, name: &str, value: &str) {
    body.extend_from_slice(
        format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(value.as_bytes());
    body.extend_from_slice(b"\r\n");
}

/// A complete, valid house metadata payload.
pub fn house_payload(email: &str, title: &str) -> serde_json::Value {
    serde_json::json!({
        "owner": {
            "name": "Ayélé Hounsou",
            "phone": "+22997000001",
            "email": email,
        },
        "category": "HOUSE",
        "subType": "villa",
        "privacy": "ENTIRE",
        "location": {
            "city": "Cotonou",
            "neighborhood": "Fidjrossè",
            "address": "Rue 12.080, Fidjrossè Plage",
        },
        "sizeSqm": 180,
        "floors": 1,
        "basics": {
            "category": "HOUSE",
            "maxGuests": 6,
            "bedrooms": 3,
            "beds": 4,
            "bathrooms": 2,
        },
        "amenities": ["Wi-Fi", "climatisation"],
        "title": title,
        "description": {
            "summary": "Grande villa avec jardin à deux minutes de la plage, idéale pour les familles.",
        },
        "pricing": { "basePrice": 45000 },
        "primaryPhotoIndex": 0,
    })
}
