//! Owner-side publication wizard: draft persistence, the step controller
//! and the submission client for the Kwabo publish API.

pub mod config;
pub mod flow;
pub mod session;
pub mod store;
pub mod submit;
