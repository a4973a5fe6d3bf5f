mod fixture;
pub mod models;
mod repository;
pub mod stats;

pub use fixture::seed_repository;
pub use repository::{InMemoryRepository, MetadataRepository, NullRepository};
