//! Pull a JSON object out of free-form model output.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Greedy: from the first `{` to the last `}`, across newlines.
static OBJECT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[\s\S]*\}").unwrap());

/// Extract and parse the outermost JSON object embedded in `text`.
///
/// Surrounding prose and ```json fences are ignored. Returns `None` when there
/// is no brace-delimited span or it does not parse as JSON.
pub fn extract_json_object(text: &str) -> Option<Value> {
    let span = OBJECT_RE.find(text)?;
    let value: Value = serde_json::from_str(span.as_str()).ok()?;
    value.is_object().then_some(value)
}
