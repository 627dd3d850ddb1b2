use serde::Serialize;

/// Renders `value` as pretty JSON for `log_action`, skipping the work unless DEBUG is on.
pub(crate) fn with_pretty_json_debug<T, F>(value: &T, log_action: F)
where
    T: Serialize,
    F: FnOnce(&str),
{
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }

    let pretty_json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|error| format!("<pretty serialize failed: {error}>"));
    log_action(pretty_json.as_str());
}

/// Comma-joined list for log fields; `-` when empty.
pub(crate) fn join_names<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        return "-".to_string();
    }
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_names_marks_empty_lists() {
        assert_eq!(join_names::<String>(&[]), "-");
        assert_eq!(join_names(&["a/b", "c/d"]), "a/b, c/d");
    }
}
