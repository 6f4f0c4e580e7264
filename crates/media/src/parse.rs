//! Inbound path: validate attachments and keep the ones a downstream model
//! can consume.
//!
//! Per attachment, in input order:
//!
//! 1. trim and strip a `data:<mime>;base64,` header, falling back to the
//!    header's MIME type when none was declared
//! 2. reject malformed base64 (fatal)
//! 3. reject payloads whose decoded size exceeds `max_bytes` (fatal)
//! 4. sniff the real type from the leading bytes
//! 5. resolve the effective type, dropping anything outside `image/*` and
//!    `application/pdf` with a warning
//!
//! Fatal failures abort the call and discard everything accepted so far.

use {satchel_common::WarnLog, tracing::debug};

use crate::{
    ChatAttachment, DEFAULT_MAX_BYTES, ParseResult, ParsedImage, Result,
    mime::{is_accepted_mime, sniff_base64},
};

/// Options for [`parse_message_with_attachments`].
#[derive(Clone, Copy)]
pub struct ParseOptions<'a> {
    /// Largest decoded size allowed for a single attachment.
    pub max_bytes: usize,
    /// Receives one warning per dropped or retyped attachment.
    pub log: &'a dyn WarnLog,
}

impl<'a> ParseOptions<'a> {
    #[must_use]
    pub fn new(log: &'a dyn WarnLog) -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            log,
        }
    }

    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

impl std::fmt::Debug for ParseOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseOptions")
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

/// How a single attachment's MIME type was settled.
#[derive(Debug, PartialEq, Eq)]
enum Resolution {
    Keep(String),
    Retyped { declared: String, sniffed: String },
    NotAccepted(String),
    Undetectable,
}

fn resolve(declared: Option<String>, sniffed: Option<&str>) -> Resolution {
    match (declared, sniffed) {
        (_, Some(sniffed)) if !is_accepted_mime(sniffed) => {
            Resolution::NotAccepted(sniffed.to_string())
        },
        (Some(declared), Some(sniffed)) if declared != sniffed => Resolution::Retyped {
            declared,
            sniffed: sniffed.to_string(),
        },
        (_, Some(sniffed)) => Resolution::Keep(sniffed.to_string()),
        (Some(declared), None) if is_accepted_mime(&declared) => Resolution::Keep(declared),
        (Some(declared), None) => Resolution::NotAccepted(declared),
        (None, None) => Resolution::Undetectable,
    }
}

/// Validate `attachments` and return the accepted ones alongside the
/// unchanged `message`.
///
/// Fails only for malformed base64 or an oversized payload. Unsupported or
/// undetectable types drop the attachment and a mislabeled type is replaced
/// by the sniffed one; each of those emits exactly one warning through
/// `options.log`.
pub async fn parse_message_with_attachments(
    message: &str,
    attachments: &[ChatAttachment],
    options: &ParseOptions<'_>,
) -> Result<ParseResult> {
    let mut images = Vec::with_capacity(attachments.len());

    for (idx, attachment) in attachments.iter().enumerate() {
        let payload = attachment.payload(idx);
        let size = payload.validate(options.max_bytes)?;
        let label = &payload.label;

        let mime = match resolve(payload.declared_mime.clone(), sniff_base64(payload.data)) {
            Resolution::Keep(mime) => mime,
            Resolution::Retyped { declared, sniffed } => {
                options.log.warn(&format!(
                    "attachment {label}: mime mismatch (declared {declared}, detected {sniffed}), using detected type"
                ));
                sniffed
            },
            Resolution::NotAccepted(mime) => {
                options.log.warn(&format!(
                    "attachment {label}: {mime} is not an accepted attachment type, dropping"
                ));
                continue;
            },
            Resolution::Undetectable => {
                options.log.warn(&format!(
                    "attachment {label}: unable to detect an accepted mime type, dropping"
                ));
                continue;
            },
        };

        debug!(label = %label, mime = %mime, size, "accepted attachment");
        images.push(ParsedImage {
            mime_type: mime,
            data: payload.data.to_string(),
        });
    }

    Ok(ParseResult {
        message: message.to_string(),
        images,
    })
}
