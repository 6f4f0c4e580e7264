//! Structural base64 checks and the decoded-size guard.
//!
//! Nothing here decodes the payload: validity and size are derived from the
//! characters alone so oversized or hostile input is rejected before any
//! allocation proportional to its length.

use crate::{Error, Result};

/// Returns `true` when `value` is non-empty standard base64 with canonical
/// padding: a length that is a multiple of 4, only `A-Z a-z 0-9 + /` in the
/// body, and at most two trailing `=`.
#[must_use]
pub fn is_valid_base64(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.is_empty() || bytes.len() % 4 != 0 {
        return false;
    }

    let body_len = bytes
        .iter()
        .rposition(|&b| b != b'=')
        .map_or(0, |idx| idx + 1);
    if bytes.len() - body_len > 2 {
        return false;
    }

    bytes[..body_len]
        .iter()
        .all(|&b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
}

/// Number of bytes `value` decodes to.
///
/// Every 4 characters carry 3 bytes and each trailing `=` removes one. Only
/// meaningful for input accepted by [`is_valid_base64`].
#[must_use]
pub fn decoded_len(value: &str) -> usize {
    let padding = value
        .as_bytes()
        .iter()
        .rev()
        .take(2)
        .take_while(|&&b| b == b'=')
        .count();
    (value.len() / 4 * 3).saturating_sub(padding)
}

/// Fails with [`Error::InvalidBase64`] unless `value` is valid base64.
pub fn ensure_base64(label: &str, value: &str) -> Result<()> {
    if is_valid_base64(value) {
        Ok(())
    } else {
        Err(Error::invalid_base64(label))
    }
}

/// Returns the decoded size of `value`, or [`Error::SizeLimitExceeded`] when
/// it is larger than `max_bytes`.
pub fn check_size(label: &str, value: &str, max_bytes: usize) -> Result<usize> {
    let size = decoded_len(value);
    if size > max_bytes {
        return Err(Error::size_limit_exceeded(label, size, max_bytes));
    }
    Ok(size)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, base64::Engine as _, rstest::rstest};

    #[rstest]
    #[case("aGVsbG8gd29ybGQ=")]
    #[case("iVBORw0KGgo=")]
    #[case("AA==")]
    #[case("AAAA")]
    #[case("+/+/")]
    fn accepts_well_formed_base64(#[case] input: &str) {
        assert!(is_valid_base64(input), "{input} should be valid");
    }

    #[rstest]
    #[case("")]
    #[case("%not-base64%")]
    #[case("abc")]
    #[case("A===")]
    #[case("====")]
    #[case("AA=A")]
    #[case("aGVs bG8=")]
    #[case("aGVsbG8-d29ybGQ_")]
    fn rejects_malformed_base64(#[case] input: &str) {
        assert!(!is_valid_base64(input), "{input} should be rejected");
    }

    #[test]
    fn decoded_len_matches_real_decoder() {
        let engine = base64::engine::general_purpose::STANDARD;
        for len in 0..32usize {
            let raw = vec![0xA5u8; len];
            let encoded = engine.encode(&raw);
            assert_eq!(decoded_len(&encoded), len, "len {len}");
        }
    }

    #[test]
    fn size_guard_boundary() {
        // 8 chars, one pad -> 5 bytes.
        let value = "aGVsbG8=";
        assert_eq!(check_size("x", value, 5).unwrap(), 5);
        let err = check_size("x", value, 4).unwrap_err();
        assert!(matches!(
            err,
            Error::SizeLimitExceeded {
                size: 5,
                max: 4,
                ..
            }
        ));
    }

    #[test]
    fn ensure_base64_names_the_attachment() {
        let err = ensure_base64("photo.png", "%%%%").unwrap_err();
        assert!(err.to_string().contains("photo.png"));
        assert!(err.to_string().contains("base64"));
    }
}
