use once_cell::sync::Lazy;
use regex::Regex;

/// Longest title text a menu entry shows, ellipsis included.
pub const MAX_DISPLAY_CHARS: usize = 35;
const ELLIPSIS: &str = "...";

// Also matches an unterminated tag at the end of the text.
static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[^>]+(>|$)").expect("tag pattern is valid"));

/// Turn a stored field value into a single-line menu label: markup removed,
/// whitespace and control characters collapsed, trimmed, and shortened to
/// [`MAX_DISPLAY_CHARS`]. Returns an empty string when nothing displayable is left.
pub fn display_value(raw: &str) -> String {
    let without_tags = TAG_PATTERN.replace_all(raw, "");
    let text = without_tags.replace("&nbsp;", " ");

    let mut collapsed = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() || ch.is_control() {
            pending_space = !collapsed.is_empty();
            continue;
        }
        if pending_space {
            collapsed.push(' ');
            pending_space = false;
        }
        collapsed.push(ch);
    }

    shorten(collapsed)
}

fn shorten(text: String) -> String {
    if text.chars().count() <= MAX_DISPLAY_CHARS {
        return text;
    }
    let keep = MAX_DISPLAY_CHARS - ELLIPSIS.len();
    let mut shortened: String = text.chars().take(keep).collect();
    shortened.push_str(ELLIPSIS);
    shortened
}
