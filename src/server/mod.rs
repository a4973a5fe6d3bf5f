pub mod config;
mod fix_routes;
mod http_layers;
pub mod metrics;
mod search_routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use http_layers::*;
pub(self) use fix_routes::make_fix_routes;
pub(self) use search_routes::make_search_routes;
#[allow(unused_imports)] // Used by main.rs
pub use server::{make_app, run_server};
