//! HTTP handler implementations, grouped per resource.

pub mod listings;
pub mod owners;
pub mod publish;
