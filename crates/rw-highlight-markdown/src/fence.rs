//! Fence info string splitting.

/// Split a fence info string into language and directive string.
///
/// The language is everything up to the first whitespace. Returns `None`
/// for the language when the info string is blank.
///
/// # Examples
///
/// - `"rust"` → `(Some("rust"), "")`
/// - `"rust hide=1 highlight=2"` → `(Some("rust"), "hide=1 highlight=2")`
/// - `""` → `(None, "")`
pub(crate) fn split_fence_info(info: &str) -> (Option<&str>, &str) {
    let info = info.trim();
    if info.is_empty() {
        return (None, "");
    }
    match info.split_once(char::is_whitespace) {
        Some((language, directive)) => (Some(language), directive.trim_start()),
        None => (Some(info), ""),
    }
}
