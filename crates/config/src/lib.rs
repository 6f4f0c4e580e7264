//! Configuration loading, validation, and env substitution.
//!
//! Config files: `satchel.toml`, `satchel.yaml`, `satchel.yml`, or
//! `satchel.json`, searched in `./` then `~/.config/satchel/`.
//!
//! Supports `${ENV_VAR}` and `${ENV_VAR:-default}` substitution in the raw
//! file text.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{apply_env_overrides, config_dir, discover_and_load, find_config_file, load_config},
    schema::{AttachmentsConfig, LoggingConfig, SatchelConfig},
    validate::{Diagnostic, Severity, ValidationResult},
};
