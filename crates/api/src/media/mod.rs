//! External image hosting for the publish pipeline.

pub mod host;

pub use host::{FailingImageHost, HttpImageHost, ImageHost, ImageHostError, StaticImageHost};
