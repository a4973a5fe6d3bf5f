//! Shared test infrastructure
//!
//! Spawns an isolated admin server per test on a random port; requests go
//! through the crate's own HTTP client backend.

mod server;

pub use server::TestServer;
