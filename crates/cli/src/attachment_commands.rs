use std::path::{Path, PathBuf};

use {
    anyhow::{Context, Result},
    base64::Engine as _,
    clap::Args,
    satchel_common::TracingWarnLog,
    satchel_config::AttachmentsConfig,
    satchel_media::{
        ChatAttachment, build_message_with_attachments, mime, parse_message_with_attachments,
    },
    tracing::info,
};

/// Bytes read from a file for `sniff`; matches the sniffing prefix.
const SNIFF_READ_BYTES: usize = mime::SNIFF_PREFIX_CHARS / 4 * 3;

#[derive(Args)]
pub struct MessageArgs {
    /// Message text.
    #[arg(short, long, default_value = "")]
    text: String,
    /// JSON file holding an array of attachments
    /// (`[{"type":"image","mimeType":"image/png","fileName":"a.png","content":"..."}]`).
    #[arg(short, long)]
    attachments: Option<PathBuf>,
    /// Decoded-size ceiling per attachment (overrides config).
    #[arg(long)]
    max_bytes: Option<usize>,
}

fn read_attachments(path: Option<&Path>) -> Result<Vec<ChatAttachment>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid attachment JSON in {}", path.display()))
}

pub fn build(args: &MessageArgs, config: &AttachmentsConfig) -> Result<()> {
    let attachments = read_attachments(args.attachments.as_deref())?;
    let mut options = config.build_options();
    if let Some(max_bytes) = args.max_bytes {
        options = options.with_max_bytes(max_bytes);
    }

    let message = build_message_with_attachments(&args.text, &attachments, &options)?;
    info!(attachments = attachments.len(), "built message");
    println!("{message}");
    Ok(())
}

pub async fn parse(args: &MessageArgs, config: &AttachmentsConfig) -> Result<()> {
    let attachments = read_attachments(args.attachments.as_deref())?;
    let log = TracingWarnLog;
    let mut options = config.parse_options(&log);
    if let Some(max_bytes) = args.max_bytes {
        options = options.with_max_bytes(max_bytes);
    }

    let result = parse_message_with_attachments(&args.text, &attachments, &options).await?;
    info!(
        received = attachments.len(),
        accepted = result.images.len(),
        "parsed attachments"
    );
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub fn sniff(path: &Path) -> Result<()> {
    match sniff_file(path)? {
        Some(mime_type) => println!("{mime_type}"),
        None => println!("unknown"),
    }
    Ok(())
}

/// Detect the MIME type of a local file from its leading bytes.
fn sniff_file(path: &Path) -> Result<Option<&'static str>> {
    use std::io::Read;

    let mut file =
        std::fs::File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let mut head = Vec::with_capacity(SNIFF_READ_BYTES);
    file.by_ref()
        .take(SNIFF_READ_BYTES as u64)
        .read_to_end(&mut head)
        .with_context(|| format!("failed to read {}", path.display()))?;

    // Go through the same base64 path inbound attachments take.
    let encoded = base64::engine::general_purpose::STANDARD.encode(&head);
    Ok(mime::sniff_base64(&encoded))
}
