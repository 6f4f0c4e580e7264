//! MIME normalization and magic-byte sniffing.
//!
//! Detection is driven by the static [`SIGNATURES`] table. Formats outside
//! the accepted set (archives, executables, audio) are listed too, so a
//! mislabeled payload is recognised and rejected rather than trusted.

use base64::{
    Engine as _,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};

/// Base64 characters decoded for sniffing: 64 chars yield 48 bytes, enough
/// for every entry in [`SIGNATURES`].
pub const SNIFF_PREFIX_CHARS: usize = 64;

/// MIME type accepted alongside the `image/*` family.
pub const PDF_MIME: &str = "application/pdf";

const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A run of bytes expected at a fixed offset.
type Magic = (usize, &'static [u8]);

/// One detectable format. Every part must match.
#[derive(Debug)]
pub struct Signature {
    pub mime: &'static str,
    pub parts: &'static [Magic],
}

impl Signature {
    fn matches(&self, bytes: &[u8]) -> bool {
        self.parts.iter().all(|&(offset, magic)| {
            bytes
                .get(offset..offset + magic.len())
                .is_some_and(|window| window == magic)
        })
    }

    fn weight(&self) -> usize {
        self.parts.iter().map(|(_, magic)| magic.len()).sum()
    }
}

/// Known signatures. When several match, the one with the most magic bytes
/// wins.
pub static SIGNATURES: &[Signature] = &[
    // Images
    Signature {
        mime: "image/png",
        parts: &[(0, &[0x89, b'P', b'N', b'G'])],
    },
    Signature {
        mime: "image/jpeg",
        parts: &[(0, &[0xFF, 0xD8, 0xFF])],
    },
    Signature {
        mime: "image/gif",
        parts: &[(0, b"GIF87a")],
    },
    Signature {
        mime: "image/gif",
        parts: &[(0, b"GIF89a")],
    },
    Signature {
        mime: "image/webp",
        parts: &[(0, b"RIFF"), (8, b"WEBP")],
    },
    Signature {
        mime: "image/bmp",
        // "BM" alone matches plain text; the reserved header words are zero.
        parts: &[(0, b"BM"), (6, &[0x00, 0x00, 0x00, 0x00])],
    },
    Signature {
        mime: "image/tiff",
        parts: &[(0, &[b'I', b'I', 0x2A, 0x00])],
    },
    Signature {
        mime: "image/tiff",
        parts: &[(0, &[b'M', b'M', 0x00, 0x2A])],
    },
    Signature {
        mime: "image/x-icon",
        parts: &[(0, &[0x00, 0x00, 0x01, 0x00])],
    },
    Signature {
        mime: "image/heic",
        parts: &[(4, b"ftypheic")],
    },
    Signature {
        mime: "image/heic",
        parts: &[(4, b"ftypheix")],
    },
    Signature {
        mime: "image/heif",
        parts: &[(4, b"ftypmif1")],
    },
    Signature {
        mime: "image/avif",
        parts: &[(4, b"ftypavif")],
    },
    // Documents
    Signature {
        mime: PDF_MIME,
        parts: &[(0, b"%PDF")],
    },
    // Recognised but never accepted
    Signature {
        mime: "application/zip",
        parts: &[(0, &[b'P', b'K', 0x03, 0x04])],
    },
    Signature {
        mime: "application/zip",
        parts: &[(0, &[b'P', b'K', 0x05, 0x06])],
    },
    Signature {
        mime: "application/gzip",
        parts: &[(0, &[0x1F, 0x8B])],
    },
    Signature {
        mime: "application/x-7z-compressed",
        parts: &[(0, &[b'7', b'z', 0xBC, 0xAF, 0x27, 0x1C])],
    },
    Signature {
        mime: "application/vnd.rar",
        parts: &[(0, &[b'R', b'a', b'r', b'!', 0x1A, 0x07])],
    },
    Signature {
        mime: "application/x-elf",
        parts: &[(0, &[0x7F, b'E', b'L', b'F'])],
    },
    // Two printable bytes, but never accepted: a loose match can only drop.
    Signature {
        mime: "application/vnd.microsoft.portable-executable",
        parts: &[(0, b"MZ")],
    },
    Signature {
        mime: "audio/wav",
        parts: &[(0, b"RIFF"), (8, b"WAVE")],
    },
    Signature {
        mime: "audio/ogg",
        parts: &[(0, b"OggS")],
    },
    Signature {
        mime: "audio/mpeg",
        parts: &[(0, b"ID3")],
    },
    Signature {
        mime: "video/mp4",
        parts: &[(4, b"ftypisom")],
    },
    Signature {
        mime: "video/mp4",
        parts: &[(4, b"ftypmp42")],
    },
];

/// Detect the MIME type of `bytes` from its leading magic bytes.
#[must_use]
pub fn sniff(bytes: &[u8]) -> Option<&'static str> {
    SIGNATURES
        .iter()
        .filter(|sig| sig.matches(bytes))
        .max_by_key(|sig| sig.weight())
        .map(|sig| sig.mime)
}

/// Detect the MIME type of a base64 payload by decoding only its first
/// [`SNIFF_PREFIX_CHARS`] characters.
#[must_use]
pub fn sniff_base64(b64: &str) -> Option<&'static str> {
    let end = b64.len().min(SNIFF_PREFIX_CHARS);
    let end = end - end % 4;
    let prefix = b64.get(..end)?;
    let bytes = LENIENT.decode(prefix).ok()?;
    sniff(&bytes)
}

/// Lowercase `raw`, drop any `;` parameters and surrounding whitespace.
/// Returns `None` when nothing is left.
#[must_use]
pub fn normalize_mime(raw: &str) -> Option<String> {
    let essence = raw.split(';').next().unwrap_or_default().trim();
    if essence.is_empty() {
        return None;
    }
    Some(essence.to_ascii_lowercase())
}

#[must_use]
pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// `image/*` or `application/pdf`.
#[must_use]
pub fn is_accepted_mime(mime: &str) -> bool {
    is_image_mime(mime) || mime == PDF_MIME
}
