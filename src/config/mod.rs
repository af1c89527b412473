//! Configuration module for tilecomp
//!
//! Provides types and parsing for `tilecomp.toml` configuration.

pub mod loader;
pub mod schema;

pub use loader::{load_config, merge_cli_overrides, CliOverrides, ConfigError};
pub use schema::*;
