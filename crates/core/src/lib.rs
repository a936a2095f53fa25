//! Domain logic for the Kwabo listing publication pipeline.
//!
//! Everything in this crate is pure: wizard step validation, draft and wire
//! types, amenity alias resolution, media reference classification and quota
//! arithmetic. No I/O happens here; `kwabo-db`, `kwabo-api` and
//! `kwabo-client` build on these types.

pub mod amenity;
pub mod draft;
pub mod error;
pub mod listing;
pub mod media;
pub mod publish;
pub mod quota;
pub mod search;
pub mod types;
pub mod wizard;

pub use error::CoreError;
