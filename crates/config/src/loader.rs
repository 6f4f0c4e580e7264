use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    env_subst::substitute_env,
    error::{Context, Error, Result},
    schema::SatchelConfig,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "satchel.toml",
    "satchel.yaml",
    "satchel.yml",
    "satchel.json",
];

/// Overrides `attachments.max_bytes` when set to a positive integer.
pub const MAX_BYTES_ENV: &str = "SATCHEL_MAX_BYTES";

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<SatchelConfig> {
    let raw = read_raw(path)?;
    parse_config(&raw, path)
}

fn read_raw(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(substitute_env(&raw))
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./satchel.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/satchel/satchel.{toml,yaml,yml,json}` (user-global)
///
/// Returns `SatchelConfig::default()` if no config file is found or the one
/// found cannot be loaded.
#[must_use]
pub fn discover_and_load() -> SatchelConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    SatchelConfig::default()
}

/// Find the first config file in standard locations.
#[must_use]
pub fn find_config_file() -> Option<PathBuf> {
    let local = CONFIG_FILENAMES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists());
    if local.is_some() {
        return local;
    }

    let dir = config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/satchel/`).
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "satchel").map(|d| d.config_dir().to_path_buf())
}

/// Apply `SATCHEL_*` environment overrides on top of a loaded config.
pub fn apply_env_overrides(config: &mut SatchelConfig) {
    apply_env_overrides_with(config, |name| std::env::var(name).ok());
}

fn apply_env_overrides_with(config: &mut SatchelConfig, lookup: impl Fn(&str) -> Option<String>) {
    let Some(raw) = lookup(MAX_BYTES_ENV) else {
        return;
    };
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => {
            debug!(max_bytes = value, "max_bytes overridden from environment");
            config.attachments.max_bytes = value;
        },
        _ => warn!(value = %raw, "ignoring invalid {MAX_BYTES_ENV}"),
    }
}

fn extension(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("toml")
}

fn parse_config(raw: &str, path: &Path) -> Result<SatchelConfig> {
    match extension(path) {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        ext => Err(Error::UnsupportedFormat {
            extension: ext.to_string(),
        }),
    }
}

pub(crate) fn parse_config_value(raw: &str, path: &Path) -> Result<serde_json::Value> {
    match extension(path) {
        "toml" => {
            let v: toml::Value = toml::from_str(raw)?;
            Ok(serde_json::to_value(v)?)
        },
        "yaml" | "yml" => {
            let v: serde_yaml::Value = serde_yaml::from_str(raw)?;
            Ok(serde_json::to_value(v)?)
        },
        "json" => Ok(serde_json::from_str(raw)?),
        ext => Err(Error::UnsupportedFormat {
            extension: ext.to_string(),
        }),
    }
}
