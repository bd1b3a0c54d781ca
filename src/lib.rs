//! Client for a Docker Hub pull-limit exporter's `/limit` endpoint.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod render;
pub mod types;

pub use error::{ConfigError, FetchError, SetupError};
pub use fetcher::{StatusFetcher, StatusView};
pub use render::{DisplaySurface, Location, MemorySurface, TerminalSurface};
pub use types::LimitStatus;
