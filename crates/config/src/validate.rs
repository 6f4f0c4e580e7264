//! Configuration validation.
//!
//! Checks a config file against the known schema, flags unknown or
//! misspelled fields, and reports limits that are unusable or suspicious.

use std::{collections::HashMap, path::Path};

use crate::{loader::parse_config_value, schema::SatchelConfig};

/// `max_bytes` values above this are reported as a warning.
pub const LARGE_LIMIT_BYTES: usize = 50_000_000;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Category: "syntax", "unknown-field", "type-error", "limits", "file-ref"
    pub category: &'static str,
    /// Dotted path, e.g. "attachments.max_byte"
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{} [{}] {}", self.severity, self.category, self.message)
        } else {
            write!(
                f,
                "{} [{}] {}: {}",
                self.severity, self.category, self.path, self.message
            )
        }
    }
}

/// Result of validating a configuration file.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub config_path: Option<std::path::PathBuf>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

// ── Schema tree for unknown-field detection ─────────────────────────────────

/// Expected shape of the configuration.
enum KnownKeys {
    Struct(HashMap<&'static str, KnownKeys>),
    Leaf,
}

fn build_schema_map() -> KnownKeys {
    use KnownKeys::{Leaf, Struct};

    Struct(HashMap::from([
        (
            "attachments",
            Struct(HashMap::from([
                ("max_bytes", Leaf),
                ("build_max_bytes", Leaf),
            ])),
        ),
        (
            "logging",
            Struct(HashMap::from([("level", Leaf), ("json", Leaf)])),
        ),
    ]))
}

// ── Levenshtein distance ────────────────────────────────────────────────────

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b_chars.len()]
}

/// Closest candidate within `max_distance`, if any.
fn suggest<'a>(needle: &str, candidates: &[&'a str], max_distance: usize) -> Option<&'a str> {
    candidates
        .iter()
        .map(|&c| (c, levenshtein(needle, c)))
        .filter(|&(_, d)| d > 0 && d <= max_distance)
        .min_by_key(|&(c, d)| (d, c))
        .map(|(c, _)| c)
}

// ── Core validation ─────────────────────────────────────────────────────────

/// Validate a config file at the given path, or discover the default config
/// file location if `path` is `None`.
#[must_use]
pub fn validate(path: Option<&Path>) -> ValidationResult {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => crate::loader::find_config_file(),
    };

    let Some(ref actual_path) = config_path else {
        return ValidationResult {
            diagnostics: vec![Diagnostic {
                severity: Severity::Info,
                category: "file-ref",
                path: String::new(),
                message: "no config file found; using defaults".into(),
            }],
            config_path: None,
        };
    };

    let diagnostics = match std::fs::read_to_string(actual_path) {
        Ok(content) => {
            let content = crate::env_subst::substitute_env(&content);
            match parse_config_value(&content, actual_path) {
                Ok(value) => validate_value(&value).diagnostics,
                Err(e) => vec![Diagnostic {
                    severity: Severity::Error,
                    category: "syntax",
                    path: String::new(),
                    message: e.to_string(),
                }],
            }
        },
        Err(e) => vec![Diagnostic {
            severity: Severity::Error,
            category: "syntax",
            path: String::new(),
            message: format!("failed to read config file: {e}"),
        }],
    };

    ValidationResult {
        diagnostics,
        config_path,
    }
}

/// Validate a TOML string without touching the filesystem.
#[must_use]
pub fn validate_toml_str(toml_str: &str) -> ValidationResult {
    let parsed = toml::from_str::<toml::Value>(toml_str)
        .map_err(|e| format!("TOML syntax error: {e}"))
        .and_then(|v| serde_json::to_value(v).map_err(|e| e.to_string()));

    match parsed {
        Ok(value) => validate_value(&value),
        Err(message) => ValidationResult {
            diagnostics: vec![Diagnostic {
                severity: Severity::Error,
                category: "syntax",
                path: String::new(),
                message,
            }],
            config_path: None,
        },
    }
}

/// Validate an already-parsed config tree (any source format).
#[must_use]
pub fn validate_value(value: &serde_json::Value) -> ValidationResult {
    let mut diagnostics = Vec::new();

    check_unknown_fields(value, &build_schema_map(), "", &mut diagnostics);

    match serde_json::from_value::<SatchelConfig>(value.clone()) {
        Ok(config) => check_limits(&config, &mut diagnostics),
        Err(e) => diagnostics.push(Diagnostic {
            severity: Severity::Error,
            category: "type-error",
            path: String::new(),
            message: format!("type error: {e}"),
        }),
    }

    ValidationResult {
        diagnostics,
        config_path: None,
    }
}

/// Walk the value tree against the schema tree and flag unknown keys.
fn check_unknown_fields(
    value: &serde_json::Value,
    schema: &KnownKeys,
    prefix: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let (serde_json::Value::Object(table), KnownKeys::Struct(fields)) = (value, schema) else {
        return;
    };

    let known_keys: Vec<&str> = fields.keys().copied().collect();
    for (key, child_value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        if let Some(child_schema) = fields.get(key.as_str()) {
            check_unknown_fields(child_value, child_schema, &path, diagnostics);
            continue;
        }

        let message = match suggest(key, &known_keys, 3) {
            Some(s) => format!("unknown field (did you mean \"{s}\"?)"),
            None => "unknown field".to_string(),
        };
        diagnostics.push(Diagnostic {
            severity: Severity::Error,
            category: "unknown-field",
            path,
            message,
        });
    }
}

fn check_limits(config: &SatchelConfig, diagnostics: &mut Vec<Diagnostic>) {
    let limits = [
        ("attachments.max_bytes", Some(config.attachments.max_bytes)),
        (
            "attachments.build_max_bytes",
            config.attachments.build_max_bytes,
        ),
    ];

    for (path, value) in limits {
        match value {
            Some(0) => diagnostics.push(Diagnostic {
                severity: Severity::Error,
                category: "limits",
                path: path.into(),
                message: "must be greater than zero; every attachment would be rejected".into(),
            }),
            Some(v) if v > LARGE_LIMIT_BYTES => diagnostics.push(Diagnostic {
                severity: Severity::Warning,
                category: "limits",
                path: path.into(),
                message: format!(
                    "{v} bytes is unusually large; attachments are held in memory as base64"
                ),
            }),
            _ => {},
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, std::io::Write};

    #[test]
    fn levenshtein_basics() {
        assert_eq!(levenshtein("hello", "hello"), 0);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("max_byte", "max_bytes"), 1);
        assert_eq!(levenshtein("logigng", "logging"), 2);
    }

    #[test]
    fn default_config_is_clean() {
        let result = validate_toml_str("");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn unknown_nested_key_with_suggestion() {
        let result = validate_toml_str("[attachments]\nmax_byte = 10\n");
        let d = result
            .diagnostics
            .iter()
            .find(|d| d.category == "unknown-field")
            .expect("unknown-field diagnostic");
        assert_eq!(d.path, "attachments.max_byte");
        assert!(d.message.contains("max_bytes"), "{}", d.message);
        assert!(result.has_errors());
    }

    #[test]
    fn unknown_top_level_key_without_suggestion() {
        let result = validate_toml_str("[providers]\nx = 1\n");
        let d = &result.diagnostics[0];
        assert_eq!(d.path, "providers");
        assert_eq!(d.message, "unknown field");
    }

    #[test]
    fn zero_limit_is_an_error() {
        let result = validate_toml_str("[attachments]\nmax_bytes = 0\n");
        assert_eq!(result.count(Severity::Error), 1);
        assert_eq!(result.diagnostics[0].category, "limits");
    }

    #[test]
    fn huge_limit_is_a_warning() {
        let result = validate_toml_str("[attachments]\nbuild_max_bytes = 100000000\n");
        assert!(!result.has_errors());
        assert_eq!(result.count(Severity::Warning), 1);
        assert_eq!(result.diagnostics[0].path, "attachments.build_max_bytes");
    }

    #[test]
    fn wrong_type_is_reported() {
        let result = validate_toml_str("[logging]\njson = \"yes\"\n");
        assert!(result.diagnostics.iter().any(|d| d.category == "type-error"));
    }

    #[test]
    fn syntax_error_is_reported() {
        let result = validate_toml_str("[attachments\n");
        assert_eq!(result.diagnostics[0].category, "syntax");
    }

    #[test]
    fn validates_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("satchel.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"logging:\n  levl: debug\n").unwrap();

        let result = validate(Some(&path));
        assert_eq!(result.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].path, "logging.levl");
    }

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic {
            severity: Severity::Warning,
            category: "limits",
            path: "attachments.max_bytes".into(),
            message: "big".into(),
        };
        assert_eq!(d.to_string(), "warning [limits] attachments.max_bytes: big");
    }
}
