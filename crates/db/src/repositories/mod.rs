//! Table repositories. One struct per table, stateless, taking the pool
//! (or a transaction) per call.

pub mod amenity_repo;
pub mod description_repo;
pub mod owner_repo;
pub mod property_repo;

pub use amenity_repo::AmenityRepo;
pub use description_repo::DescriptionRepo;
pub use owner_repo::OwnerRepo;
pub use property_repo::PropertyRepo;
