//! Outbound path: embed image attachments into a message as markdown images
//! with inline data URIs.

use tracing::debug;

use crate::{
    ChatAttachment, DEFAULT_MAX_BYTES, Error, Result, data_uri::build_data_uri,
    mime::is_image_mime,
};

/// Options for [`build_message_with_attachments`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Largest decoded size allowed for a single attachment.
    pub max_bytes: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

impl BuildOptions {
    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

/// Append every attachment to `message` as `![label](data:<mime>;base64,<payload>)`.
///
/// All-or-nothing: each attachment must declare an `image/*` type (directly
/// or through its data-URI header), hold valid base64 and stay within
/// `max_bytes`, otherwise the first failure is returned and nothing is built.
pub fn build_message_with_attachments(
    message: &str,
    attachments: &[ChatAttachment],
    options: &BuildOptions,
) -> Result<String> {
    if attachments.is_empty() {
        return Ok(message.to_string());
    }

    let mut blocks = Vec::with_capacity(attachments.len());
    for (idx, attachment) in attachments.iter().enumerate() {
        let payload = attachment.payload(idx);

        let mime = match payload.declared_mime.as_deref() {
            Some(mime) if is_image_mime(mime) => mime,
            other => return Err(Error::unsupported_type(&payload.label, other)),
        };

        let size = payload.validate(options.max_bytes)?;
        debug!(label = %payload.label, mime, size, "embedding attachment");

        blocks.push(format!(
            "![{}]({})",
            marker_label(&payload.label),
            build_data_uri(mime, payload.data)
        ));
    }

    let separator = if message.trim().is_empty() {
        ""
    } else {
        "\n\n"
    };
    Ok(format!("{message}{separator}{}", blocks.join("\n\n")))
}

/// Collapse whitespace runs so the label cannot break the markdown marker.
fn marker_label(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join("_")
}
