pub mod api;
pub mod config;
pub mod earth_map;

pub use api::{router, BackendState};
pub use config::ServerConfig;
