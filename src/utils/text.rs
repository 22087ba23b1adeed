//! Display helpers for menu summaries.

use serde_json::Value;

/// Clip `text` to at most `max` characters, ending in `...` when clipped.
pub fn clip_to_maximum(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let mut clipped: String = text.chars().take(max - 3).collect();
    clipped.push_str("...");
    clipped
}

/// Human-readable rendering of an arbitrary value: strings as-is, absent as
/// `none`, everything else as compact JSON.
pub fn string_from_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "none".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_leaves_short_text() {
        assert_eq!(clip_to_maximum("short", 10), "short");
        assert_eq!(clip_to_maximum("exactly10!", 10), "exactly10!");
    }

    #[test]
    fn clip_adds_ellipsis() {
        assert_eq!(clip_to_maximum("a much longer string", 10), "a much ...");
        assert_eq!(clip_to_maximum("a much longer string", 10).chars().count(), 10);
    }

    #[test]
    fn clip_counts_characters_not_bytes() {
        assert_eq!(clip_to_maximum("ééééé", 5), "ééééé");
    }

    #[test]
    fn string_from_value_renders() {
        assert_eq!(string_from_value(&Value::from("x")), "x");
        assert_eq!(string_from_value(&Value::Null), "none");
        assert_eq!(string_from_value(&Value::from(3)), "3");
        assert_eq!(string_from_value(&serde_json::json!(["a", 1])), r#"["a",1]"#);
    }
}
