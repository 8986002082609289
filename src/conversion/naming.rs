//! File-name suffix helpers.
//!
//! Suffix matching selects conversion candidates; suffix replacement derives
//! the output name written next to the source.

/// Check if `name` ends with `suffix`, ignoring ASCII case.
pub fn has_suffix(name: &str, suffix: &str) -> bool {
    let (n, s) = (name.len(), suffix.len());
    n >= s && name.is_char_boundary(n - s) && name[n - s..].eq_ignore_ascii_case(suffix)
}

/// Derive a target file name from `name` by replacing `old` with `new`.
///
/// When `name` does not carry the `old` suffix (including names with no
/// extension at all), `new` is appended instead of the rewrite silently
/// failing.
pub fn replace_suffix(name: &str, old: &str, new: &str) -> String {
    if has_suffix(name, old) {
        format!("{}{}", &name[..name.len() - old.len()], new)
    } else {
        format!("{}{}", name, new)
    }
}
