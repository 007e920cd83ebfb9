use once_cell::sync::Lazy;
use regex::Regex;

static ALT_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"alt="([^"]*)""#).expect("alt attribute pattern is valid"));

/// Return the value of the first `alt="..."` in `body`, or `""`.
///
/// This is a plain text scan over the raw summary, not a markup parse, so
/// entities inside the value are returned as they appear upstream.
pub fn extract_caption(body: &str) -> &str {
    ALT_ATTR
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or("")
}
