//! Removal of `<think>...</think>` reasoning blocks from model output.

use regex::Regex;
use std::sync::OnceLock;

fn think_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid think-tag regex"))
}

/// Strip every think block when `enabled`, matching each opening tag with the
/// nearest closing tag across newlines. Unclosed tags are left as they are.
pub fn trim_think_tags(text: &str, enabled: bool) -> String {
    if !enabled {
        return text.to_string();
    }
    think_pattern().replace_all(text, "").into_owned()
}
