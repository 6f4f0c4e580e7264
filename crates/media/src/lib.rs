//! Attachment pipeline: base64 validation, size limits, MIME sniffing, and the
//! build (outbound) and parse (inbound) paths for chat attachments.
//!
//! Outbound messages embed each image as a markdown image whose target is a
//! `data:<mime>;base64,<payload>` reference. Inbound attachments are
//! normalized into [`ParsedImage`]s whose MIME type is always an image type
//! or `application/pdf`.

pub mod attachment;
pub mod build;
pub mod data_uri;
pub mod error;
pub mod mime;
pub mod parse;
pub mod validate;

pub use {
    attachment::{AttachmentKind, ChatAttachment, ParseResult, ParsedImage},
    build::{BuildOptions, build_message_with_attachments},
    error::{Error, Result},
    parse::{ParseOptions, parse_message_with_attachments},
    satchel_common::WarnLog,
};

/// Default decoded-size ceiling for a single attachment.
pub const DEFAULT_MAX_BYTES: usize = 5_000_000;
