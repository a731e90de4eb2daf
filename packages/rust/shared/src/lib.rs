//! Shared types, error model, and configuration for coursemigrate.
//!
//! This crate is the foundation depended on by all other coursemigrate crates.
//! It provides:
//! - [`MigrateError`], the unified error type
//! - The page mapping ([`MappingEntry`], [`MappingTable`])
//! - Configuration ([`AppConfig`], [`FiltersConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_ASSET_BASE, DEFAULT_ASSET_PLACEHOLDER, DEFAULT_TIMESTAMP_MARKER,
    DEFAULT_VIDEO_MARKER, DefaultsConfig, FiltersConfig, config_dir, config_file_path,
    init_config, init_config_at, load_config, load_config_from, resolve_config,
};
pub use error::{MigrateError, Result};
pub use types::{MappingEntry, MappingTable};
