//! Config schema types.

use {
    satchel_media::{BuildOptions, ParseOptions, WarnLog},
    serde::{Deserialize, Serialize},
};

pub use satchel_media::DEFAULT_MAX_BYTES;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SatchelConfig {
    pub attachments: AttachmentsConfig,
    pub logging: LoggingConfig,
}

impl SatchelConfig {
    /// Serialize as pretty TOML.
    pub fn to_toml(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Attachment limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentsConfig {
    /// Largest decoded attachment accepted on the inbound (parse) path.
    pub max_bytes: usize,
    /// Outbound (build) limit. Falls back to `max_bytes` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_max_bytes: Option<usize>,
}

impl Default for AttachmentsConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            build_max_bytes: None,
        }
    }
}

impl AttachmentsConfig {
    #[must_use]
    pub fn parse_max_bytes(&self) -> usize {
        self.max_bytes
    }

    #[must_use]
    pub fn build_max_bytes(&self) -> usize {
        self.build_max_bytes.unwrap_or(self.max_bytes)
    }

    /// Options for the outbound path, limited by [`Self::build_max_bytes`].
    #[must_use]
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions::default().with_max_bytes(self.build_max_bytes())
    }

    /// Options for the inbound path, reporting drops and retypes to `log`.
    #[must_use]
    pub fn parse_options<'a>(&self, log: &'a dyn WarnLog) -> ParseOptions<'a> {
        ParseOptions::new(log).with_max_bytes(self.parse_max_bytes())
    }
}

/// Log output settings, used by the binary when no CLI flag overrides them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `satchel_media=debug`.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
        }
    }
}
