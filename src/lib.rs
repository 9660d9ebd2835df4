//! Static Container Registry Library
//!
//! Scans a directory tree of exported container images and generates nginx
//! configuration that serves it as a read-only Docker Registry HTTP API v2.

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod image;
pub mod logging;
pub mod routes;

pub use config::GeneratorConfig;
pub use error::{RegistryError, Result};
pub use generator::ConfigGenerator;
pub use logging::Logger;
pub use routes::{GlobalRoutes, RouteRule};
