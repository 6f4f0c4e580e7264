/// Fatal attachment failures. Any of these aborts the whole build or parse
/// call; recoverable problems are reported through a
/// [`WarnLog`](satchel_common::WarnLog) instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("attachment {label}: invalid base64 content")]
    InvalidBase64 { label: String },

    #[error("attachment {label}: exceeds size limit ({size} > {max} bytes)")]
    SizeLimitExceeded {
        label: String,
        size: usize,
        max: usize,
    },

    #[error("attachment {label}: only image/* attachments are supported (got {mime})")]
    UnsupportedType { label: String, mime: String },
}

impl Error {
    #[must_use]
    pub fn invalid_base64(label: impl Into<String>) -> Self {
        Self::InvalidBase64 {
            label: label.into(),
        }
    }

    #[must_use]
    pub fn size_limit_exceeded(label: impl Into<String>, size: usize, max: usize) -> Self {
        Self::SizeLimitExceeded {
            label: label.into(),
            size,
            max,
        }
    }

    #[must_use]
    pub fn unsupported_type(label: impl Into<String>, mime: Option<&str>) -> Self {
        Self::UnsupportedType {
            label: label.into(),
            mime: mime.unwrap_or("none").to_string(),
        }
    }

    /// Label of the attachment that caused the failure.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::InvalidBase64 { label }
            | Self::SizeLimitExceeded { label, .. }
            | Self::UnsupportedType { label, .. } => label,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
