//! Database row models.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the table row. Write-side inputs come straight from the `kwabo-core`
//! wire types, so there are no separate create DTOs here.

pub mod amenity;
pub mod description;
pub mod owner;
pub mod property;
