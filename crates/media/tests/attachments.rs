#![allow(clippy::unwrap_used, clippy::expect_used)]

use {
    base64::{Engine as _, engine::general_purpose::STANDARD},
    satchel_common::RecordingWarnLog,
    satchel_media::{
        BuildOptions, ChatAttachment, Error, ParseOptions, build_message_with_attachments,
        parse_message_with_attachments,
    },
};

const PNG_SIGNATURE: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

fn png_b64() -> String {
    let mut bytes = PNG_SIGNATURE.to_vec();
    bytes.extend_from_slice(b"\x00\x00\x00\x0dIHDR\x00\x00\x00\x01\x00\x00\x00\x01");
    STANDARD.encode(bytes)
}

fn oversized_b64() -> String {
    STANDARD.encode(vec![0u8; 6_000_000])
}

// ── build ──────────────────────────────────────────────────────────────────

#[test]
fn build_contains_text_marker_and_data_uri() {
    let content = png_b64();
    let att = ChatAttachment::image(content.clone())
        .with_mime_type("image/png")
        .with_file_name("dot.png");
    let out = build_message_with_attachments("look at this", &[att], &BuildOptions::default())
        .unwrap();

    assert!(out.contains("look at this"));
    assert!(out.contains("![dot.png]"));
    assert!(out.contains(&format!("data:image/png;base64,{content}")));
}

#[test]
fn build_rejects_non_image() {
    let att = ChatAttachment::file(STANDARD.encode(b"hello"))
        .with_mime_type("text/plain")
        .with_file_name("notes.txt");
    let err = build_message_with_attachments("x", &[att], &BuildOptions::default()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedType { .. }));
    assert!(err.to_string().contains("image"));
}

#[test]
fn build_rejects_invalid_base64() {
    let att = ChatAttachment::image("%not-base64%")
        .with_mime_type("image/png")
        .with_file_name("bad.png");
    let err = build_message_with_attachments("x", &[att], &BuildOptions::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidBase64 { .. }));
    assert!(err.to_string().contains("base64"));
}

#[test]
fn build_rejects_oversized_payload() {
    let att = ChatAttachment::image(oversized_b64())
        .with_mime_type("image/png")
        .with_file_name("huge.png");
    let err = build_message_with_attachments(
        "x",
        &[att],
        &BuildOptions::default().with_max_bytes(5_000_000),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::SizeLimitExceeded {
            size: 6_000_000,
            max: 5_000_000,
            ..
        }
    ));
    assert!(err.to_string().contains("exceeds size limit"));
}

// ── parse ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn parse_rejects_invalid_base64() {
    let log = RecordingWarnLog::new();
    let att = ChatAttachment::image("%not-base64%").with_mime_type("image/png");
    let err = parse_message_with_attachments("x", &[att], &ParseOptions::new(&log))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("base64"));
}

#[tokio::test]
async fn parse_rejects_oversized_payload() {
    let log = RecordingWarnLog::new();
    let att = ChatAttachment::image(oversized_b64()).with_mime_type("image/png");
    let err = parse_message_with_attachments(
        "x",
        &[att],
        &ParseOptions::new(&log).with_max_bytes(5_000_000),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("exceeds size limit"));
}

#[tokio::test]
async fn parse_sniffs_png_without_declared_type() {
    let log = RecordingWarnLog::new();
    let att = ChatAttachment::image(png_b64()).with_file_name("dot");
    let result = parse_message_with_attachments("hi", &[att], &ParseOptions::new(&log))
        .await
        .unwrap();
    assert_eq!(result.images.len(), 1);
    assert_eq!(result.images[0].mime_type, "image/png");
    assert!(log.is_empty());
}

#[tokio::test]
async fn parse_prefers_sniffed_type_on_mismatch() {
    let log = RecordingWarnLog::new();
    let att = ChatAttachment::image(png_b64())
        .with_mime_type("image/jpeg")
        .with_file_name("actually-png.jpg");
    let result = parse_message_with_attachments("hi", &[att], &ParseOptions::new(&log))
        .await
        .unwrap();
    assert_eq!(result.images[0].mime_type, "image/png");

    let warnings = log.messages();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("mime mismatch"));
    assert!(warnings[0].contains("actually-png.jpg"));
}

#[tokio::test]
async fn parse_keeps_pdf() {
    let log = RecordingWarnLog::new();
    let att = ChatAttachment::file(STANDARD.encode(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n"))
        .with_mime_type("application/pdf")
        .with_file_name("doc.pdf");
    let result = parse_message_with_attachments("hi", &[att], &ParseOptions::new(&log))
        .await
        .unwrap();
    assert_eq!(result.images.len(), 1);
    assert_eq!(result.images[0].mime_type, "application/pdf");
}

#[tokio::test]
async fn parse_drops_declared_zip() {
    let log = RecordingWarnLog::new();
    let att = ChatAttachment::file(STANDARD.encode(b"PK\x03\x04\x14\x00\x00\x00"))
        .with_mime_type("application/zip")
        .with_file_name("archive.zip");
    let result = parse_message_with_attachments("hi", &[att], &ParseOptions::new(&log))
        .await
        .unwrap();
    assert!(result.images.is_empty());

    let warnings = log.messages();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("not an accepted"));
    assert!(warnings[0].contains("archive.zip"));
}

#[tokio::test]
async fn parse_drops_undetectable_payload() {
    let log = RecordingWarnLog::new();
    let att = ChatAttachment::file(STANDARD.encode(b"\x01\x02\x03\x04\x05\x06"))
        .with_file_name("mystery.bin");
    let result = parse_message_with_attachments("hi", &[att], &ParseOptions::new(&log))
        .await
        .unwrap();
    assert!(result.images.is_empty());

    let warnings = log.messages();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("unable to detect"));
    assert!(warnings[0].contains("mystery.bin"));
}

#[tokio::test]
async fn parse_does_not_mistake_text_starting_with_bm_for_bitmap() {
    let log = RecordingWarnLog::new();
    let att = ChatAttachment::file(STANDARD.encode(b"BMW quarterly report, plain text"))
        .with_mime_type("text/plain")
        .with_file_name("notes.txt");
    let result = parse_message_with_attachments("hi", &[att], &ParseOptions::new(&log))
        .await
        .unwrap();
    assert!(result.images.is_empty());

    let warnings = log.messages();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("text/plain is not an accepted"));
    assert!(!warnings[0].contains("image/bmp"));
}

#[tokio::test]
async fn parse_mixed_list_keeps_only_accepted_in_order() {
    let log = RecordingWarnLog::new();
    let first_png = png_b64();
    let pdf = STANDARD.encode(b"%PDF-1.4\n");
    let attachments = [
        ChatAttachment::file(STANDARD.encode(b"\x7fELF\x02\x01\x01\x00"))
            .with_file_name("tool"),
        ChatAttachment::image(first_png.clone()).with_file_name("dot.png"),
        ChatAttachment::file(STANDARD.encode(b"\x00\x01\x02\x03")).with_file_name("noise"),
        ChatAttachment::file(pdf.clone()).with_file_name("doc.pdf"),
    ];
    let result =
        parse_message_with_attachments("original text", &attachments, &ParseOptions::new(&log))
            .await
            .unwrap();

    assert_eq!(result.message, "original text");
    assert_eq!(result.images.len(), 2);
    assert_eq!(result.images[0].data, first_png);
    assert_eq!(result.images[0].mime_type, "image/png");
    assert_eq!(result.images[1].data, pdf);
    assert_eq!(result.images[1].mime_type, "application/pdf");
    assert_eq!(log.len(), 2);
}

#[tokio::test]
async fn parse_output_feeds_build() {
    let log = RecordingWarnLog::new();
    let att = ChatAttachment::image(format!("data:image/png;base64,{}", png_b64()))
        .with_file_name("pasted image.png");
    let parsed = parse_message_with_attachments("caption", &[att], &ParseOptions::new(&log))
        .await
        .unwrap();

    let forward: Vec<ChatAttachment> = parsed
        .images
        .iter()
        .map(|image| ChatAttachment::image(image.to_data_uri()).with_file_name("pasted image.png"))
        .collect();
    let out = build_message_with_attachments(&parsed.message, &forward, &BuildOptions::default())
        .unwrap();
    assert!(out.starts_with("caption\n\n![pasted_image.png](data:image/png;base64,"));
}
