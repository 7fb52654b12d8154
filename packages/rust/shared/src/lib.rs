//! Shared types, error model, and configuration for Cravey.
//!
//! This crate is the foundation depended on by all other Cravey crates.
//! It provides:
//! - [`CraveyError`]: the unified error type
//! - Wire types ([`EnrichRequest`], [`EnrichResponse`], [`HealthResponse`], [`ErrorResponse`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ClientSettings, CorsSettings, PORT_ENV_VAR, ServerSettings, config_dir,
    config_file_path, init_config, load_config, load_config_from, write_default_config,
};
pub use error::{CraveyError, Result};
pub use types::{
    API_VERSION, CSV_DATA_FIELD, EnrichRequest, EnrichResponse, ErrorResponse, HealthResponse,
};
