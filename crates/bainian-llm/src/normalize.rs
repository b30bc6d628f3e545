//! Turns free-text model completions into JSON values.

use bainian_core::ReplyError;
use serde_json::Value;

const FENCE: &str = "```";

/// Removes Markdown code-fence markup around a completion.
///
/// A leading fence drops the rest of its line when that rest is a bare
/// language tag (`json`, `JSON`, ...). Everything from the closing fence on is
/// discarded. Text without a leading fence only loses a trailing fence.
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();

    let Some(rest) = text.strip_prefix(FENCE) else {
        return text.strip_suffix(FENCE).unwrap_or(text).trim();
    };

    let body = match rest.split_once('\n') {
        Some((tag, body)) if is_language_tag(tag) => body,
        _ => rest.strip_prefix("json").unwrap_or(rest),
    };

    match body.find(FENCE) {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

/// Empty, or a word starting with a letter such as `json` or `c++`.
fn is_language_tag(line: &str) -> bool {
    let line = line.trim();
    let mut chars = line.chars();
    match chars.next() {
        None => true,
        Some(first) => {
            first.is_ascii_alphabetic() && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'))
        }
    }
}

/// Strips fences and parses what remains as JSON.
///
/// The value is returned as-is; shape checks belong to
/// [`ReplySet::from_value`](bainian_core::ReplySet::from_value).
pub fn normalize_completion(text: &str) -> Result<Value, ReplyError> {
    let body = strip_code_fence(text);
    serde_json::from_str(body).map_err(|e| ReplyError::Parse(format!("{} (completion: {:?})", e, preview(body))))
}

fn preview(text: &str) -> String {
    const LIMIT: usize = 120;
    match text.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
