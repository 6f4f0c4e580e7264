//! Attachment descriptors and the normalized values produced from them.

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    data_uri::{build_data_uri, strip_data_uri_header},
    mime::normalize_mime,
    validate::{check_size, ensure_base64},
};

/// Attachment tag as sent by chat clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    #[default]
    Image,
    File,
}

impl AttachmentKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::File => "file",
        }
    }
}

/// A chat attachment as received from, or about to be sent to, a client.
///
/// `content` is base64, optionally prefixed with a
/// `data:<mime>;base64,` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatAttachment {
    #[serde(rename = "type", default)]
    pub kind: AttachmentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub content: String,
}

impl ChatAttachment {
    #[must_use]
    pub fn image(content: impl Into<String>) -> Self {
        Self {
            kind: AttachmentKind::Image,
            mime_type: None,
            file_name: None,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn file(content: impl Into<String>) -> Self {
        Self {
            kind: AttachmentKind::File,
            ..Self::image(content)
        }
    }

    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Name used in errors, warnings and rendered markers: the file name,
    /// else the type tag with the 1-based position (`image-2`). `index` is
    /// zero-based.
    #[must_use]
    pub fn label(&self, index: usize) -> String {
        match self.file_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{}-{}", self.kind.as_str(), index + 1),
        }
    }

    /// Trim the content, split off a data-URI header and resolve the
    /// declared MIME type (explicit `mime_type` first, header second).
    pub(crate) fn payload(&self, index: usize) -> Payload<'_> {
        let (header_mime, data) = strip_data_uri_header(self.content.trim());
        let declared_mime = self
            .mime_type
            .as_deref()
            .and_then(normalize_mime)
            .or_else(|| header_mime.and_then(normalize_mime));
        Payload {
            label: self.label(index),
            declared_mime,
            data,
        }
    }
}

/// Base64 payload of one attachment with its header stripped.
#[derive(Debug)]
pub(crate) struct Payload<'a> {
    pub label: String,
    pub declared_mime: Option<String>,
    pub data: &'a str,
}

impl Payload<'_> {
    /// Structural base64 check followed by the size guard. Returns the
    /// decoded size.
    pub(crate) fn validate(&self, max_bytes: usize) -> Result<usize> {
        ensure_base64(&self.label, self.data)?;
        check_size(&self.label, self.data, max_bytes)
    }
}

/// An accepted inbound attachment. `mime_type` is always `image/*` or
/// `application/pdf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedImage {
    pub mime_type: String,
    /// Base64 payload without a data-URI header.
    pub data: String,
}

impl ParsedImage {
    #[must_use]
    pub fn to_data_uri(&self) -> String {
        build_data_uri(&self.mime_type, &self.data)
    }
}

/// Outcome of parsing an inbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    /// The input text, unchanged.
    pub message: String,
    /// Accepted attachments in input order.
    pub images: Vec<ParsedImage>,
}
