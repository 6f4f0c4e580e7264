/// Replace `${ENV_VAR}` and `${ENV_VAR:-default}` placeholders in raw config
/// text.
///
/// Unresolvable variables without a default are left as-is. `$${` escapes a
/// literal `${`.
#[must_use]
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

/// Same as [`substitute_env`] with a custom lookup, so tests do not have to
/// mutate the process environment.
fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        result.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(after) = tail.strip_prefix("$${") {
            result.push_str("${");
            rest = after;
            continue;
        }

        let Some(body_start) = tail.strip_prefix("${") else {
            result.push('$');
            rest = &tail[1..];
            continue;
        };

        let Some(close) = body_start.find('}') else {
            // Unterminated, emit the remainder literally.
            result.push_str(tail);
            return result;
        };

        let body = &body_start[..close];
        let (name, default) = match body.split_once(":-") {
            Some((name, default)) => (name, Some(default)),
            None => (body, None),
        };

        match (name.is_empty(), lookup(name), default) {
            (false, Some(value), _) => result.push_str(&value),
            (false, None, Some(default)) => result.push_str(default),
            _ => {
                result.push_str("${");
                result.push_str(body);
                result.push('}');
            },
        }
        rest = &body_start[close + 1..];
    }

    result.push_str(rest);
    result
}
