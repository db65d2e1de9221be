use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$?\{(\d+)\}").unwrap());

/// Substitutes `{0}`, `{1}`, ... (or `${0}`, `${1}`, ...) in `template` with
/// the matching entry of `params`. Placeholders without a parameter are kept.
pub fn format_message<P: AsRef<str>>(template: &str, params: &[P]) -> String {
    PLACEHOLDER_PATTERN
        .replace_all(template, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| params.get(i))
                .map_or_else(|| caps[0].to_string(), |p| p.as_ref().to_string())
        })
        .into_owned()
}
