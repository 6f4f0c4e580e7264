//! `data:<mime>;base64,<payload>` references.

/// Build a data URI from media type and base64 data.
#[must_use]
pub fn build_data_uri(media_type: &str, data: &str) -> String {
    format!("data:{media_type};base64,{data}")
}

/// Split an attachment's content into the media type from its data-URI
/// header (if it has one) and the bare base64 payload.
///
/// Content without a header is returned untouched. An empty payload after a
/// header is kept so the caller can reject it as invalid base64.
#[must_use]
pub fn strip_data_uri_header(content: &str) -> (Option<&str>, &str) {
    match split_header(content) {
        Some((media_type, data)) => (Some(media_type), data),
        None => (None, content),
    }
}

fn split_header(uri: &str) -> Option<(&str, &str)> {
    let rest = uri.strip_prefix("data:")?;
    let (media_type, data) = rest.split_once(";base64,")?;
    if media_type.is_empty() || media_type.contains(';') {
        return None;
    }
    Some((media_type, data))
}
