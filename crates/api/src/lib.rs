//! HTTP service for the Kwabo listing catalogue: the publish endpoint with
//! its two-phase write, the owner quota count endpoint and the read-side
//! catalogue queries.
//!
//! Exposed as a library so integration tests can build the exact router the
//! binary serves.

pub mod config;
pub mod error;
pub mod handlers;
pub mod media;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
