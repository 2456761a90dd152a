//! Text processing utilities.

use regex::Regex;
use std::sync::OnceLock;

static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();

fn whitespace_re() -> &'static Regex {
    WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("static regex is valid"))
}

/// Collapse consecutive whitespace into single spaces and trim the ends.
///
/// Returns an empty string for inputs that are entirely whitespace.
pub fn normalize_whitespace(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    whitespace_re().replace_all(s, " ").trim().to_string()
}

/// Truncate `s` to at most `max_len` Unicode scalar values, appending `"..."`
/// if truncation occurred. Counts characters, not bytes, so multi-byte UTF-8
/// content is never split mid-codepoint.
///
/// `max_len == 0` yields an empty string; `max_len <= 3` yields up to
/// `max_len` dots.
pub fn truncate_with_ellipsis(s: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }

    if s.chars().count() <= max_len {
        return s.to_string();
    }

    if max_len <= 3 {
        return ".".repeat(max_len);
    }

    let keep = max_len - 3;
    let byte_offset = s
        .char_indices()
        .nth(keep)
        .map(|(i, _)| i)
        .unwrap_or(s.len());

    format!("{}...", &s[..byte_offset])
}

/// Extract the first JSON object or array from a potentially markdown-wrapped
/// LLM response.
///
/// Tries, in order: a ` ```json ` fenced block, a plain ` ``` ` fenced block,
/// then a bare `{...}` or `[...]` span. Returns `None` if nothing JSON-like
/// is present.
pub fn extract_json_from_response(s: &str) -> Option<&str> {
    if let Some(inner) = extract_fenced_block(s, "```json") {
        return Some(inner);
    }

    if let Some(inner) = extract_fenced_block(s, "```") {
        return Some(inner);
    }

    if let Some(start) = s.find('{') {
        if let Some(end) = s.rfind('}') {
            if end > start {
                return Some(&s[start..=end]);
            }
        }
    }

    if let Some(start) = s.find('[') {
        if let Some(end) = s.rfind(']') {
            if end > start {
                return Some(&s[start..=end]);
            }
        }
    }

    None
}

fn extract_fenced_block<'a>(s: &'a str, fence: &str) -> Option<&'a str> {
    let start = s.find(fence)?;
    let after_fence = start + fence.len();

    let newline = s[after_fence..].find('\n')?;
    let content_start = after_fence + newline + 1;

    let close = s[content_start..].find("```")?;
    let content = s[content_start..content_start + close].trim();

    if content.is_empty() {
        return None;
    }

    Some(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- normalize_whitespace ---

    #[test]
    fn test_normalize_whitespace_collapses_runs() {
        assert_eq!(normalize_whitespace("hello   world"), "hello world");
        assert_eq!(normalize_whitespace("hello\t\nworld"), "hello world");
        assert_eq!(normalize_whitespace("  hello  world  "), "hello world");
    }

    #[test]
    fn test_normalize_whitespace_empty_and_blank() {
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace("   \t\n  "), "");
    }

    // --- truncate_with_ellipsis ---

    #[test]
    fn test_truncate_basic() {
        assert_eq!(truncate_with_ellipsis("hello world", 8), "hello...");
        assert_eq!(truncate_with_ellipsis("hi", 10), "hi");
        assert_eq!(truncate_with_ellipsis("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_with_ellipsis("😀😀😀😀😀", 4), "😀...");
        assert_eq!(truncate_with_ellipsis("你好世界测试", 5), "你好...");
    }

    #[test]
    fn test_truncate_tiny_budgets() {
        assert_eq!(truncate_with_ellipsis("hello", 0), "");
        assert_eq!(truncate_with_ellipsis("hello", 1), ".");
        assert_eq!(truncate_with_ellipsis("hello", 3), "...");
    }

    // --- extract_json_from_response ---

    #[test]
    fn test_extract_json_fenced() {
        let s = "Result:\n```json\n{\"key\": \"value\"}\n```\nDone.";
        assert_eq!(extract_json_from_response(s), Some("{\"key\": \"value\"}"));

        let s = "Result:\n```\n[1, 2, 3]\n```";
        assert_eq!(extract_json_from_response(s), Some("[1, 2, 3]"));
    }

    #[test]
    fn test_extract_json_bare() {
        let s = "The answer is {\"foo\": 42} as shown.";
        assert_eq!(extract_json_from_response(s), Some("{\"foo\": 42}"));
    }

    #[test]
    fn test_extract_json_nested_braces() {
        let s = r#"{"outer": {"inner": 1}}"#;
        assert_eq!(extract_json_from_response(s), Some(r#"{"outer": {"inner": 1}}"#));
    }

    #[test]
    fn test_extract_json_none() {
        assert_eq!(extract_json_from_response("No JSON here."), None);
        assert_eq!(extract_json_from_response(""), None);
    }
}
