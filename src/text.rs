//! Free-text emission policy and YAML escaping.
//!
//! Two decisions live here. First, block vs inline: text that is already
//! multi-line, or that contains a colon or a single quote, goes out in folded
//! block style (`>-`); everything else is written inline after its key.
//! Second, `must_escape`: a literal must be quoted exactly when a generic
//! YAML parser would auto-type it away from a string (integer, float,
//! boolean, null, timestamp).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::sink::Doc;

/// Wrap width for text that arrives as one long line.
const WRAP_COLUMNS: usize = 70;

/// YAML 1.1 timestamp shape: four-digit year, month, day, optional
/// time-of-day and offset.
static TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)^
          [0-9][0-9][0-9][0-9]
          -[0-9][0-9]?
          -[0-9][0-9]?
          (?:
            (?:[Tt]|[\ \t]+)
            [0-9][0-9]?
            :[0-9][0-9]
            :[0-9][0-9]
            (?:\.[0-9]*)?
            (?:[\ \t]*(?:Z|[-+][0-9][0-9]?(?::[0-9][0-9])?))?
          )?$",
    )
    .expect("timestamp regex")
});

/// Split text into display lines. Text that already contains newlines is
/// taken as pre-formatted; otherwise it is greedily wrapped.
pub fn wrap_text(text: &str) -> Vec<String> {
    let lines: Vec<String> = text.lines().map(str::to_string).collect();
    if lines.len() > 1 {
        return lines;
    }
    wrap_line(text, WRAP_COLUMNS)
}

fn wrap_line(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            out.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

/// Emit `key: value` for free text, choosing folded block style when the
/// value would not survive as an inline scalar.
pub fn emit_text_value(doc: &mut Doc, indent: usize, key: &str, text: &str) {
    let lines = wrap_text(text);
    let needs_block =
        lines.len() > 1 || lines[0].contains(':') || lines[0].contains('\'');
    if needs_block {
        doc.line(indent, format!("{key}: >-"));
        for line in &lines {
            doc.line(indent + 1, line.trim_start());
        }
    } else {
        doc.line(indent, format!("{key}: {}", lines[0]));
    }
}

/// True when a bare literal would be auto-typed by a YAML parser and must be
/// quoted to stay a string.
pub fn must_escape(s: &str) -> bool {
    if s.parse::<i64>().is_ok() || s.parse::<f64>().is_ok() {
        return true;
    }
    if s == "true" || s == "false" {
        return true;
    }
    if s == "null" || s == "~" {
        return true;
    }
    TIMESTAMP_RE.is_match(s)
}

/// Quote a list value when it would otherwise be mis-parsed.
pub fn quote_if_needed(s: &str) -> String {
    if must_escape(s) { format!("'{s}'") } else { s.to_string() }
}

/// dashed-or-snake name -> camelCase. Applied only to property and attribute
/// names, never to type names.
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut first_segment = true;
    for segment in name.split(['-', '_']).filter(|s| !s.is_empty()) {
        let mut chars = segment.chars();
        let Some(head) = chars.next() else { continue };
        if first_segment {
            out.extend(head.to_lowercase());
            first_segment = false;
        } else {
            out.extend(head.to_uppercase());
        }
        out.push_str(chars.as_str());
    }
    if out.is_empty() { name.to_string() } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaping_rule_round_trip() {
        assert!(must_escape("42"));
        assert!(must_escape("-7"));
        assert!(must_escape("3.14"));
        assert!(must_escape("true"));
        assert!(must_escape("false"));
        assert!(must_escape("null"));
        assert!(must_escape("~"));
        assert!(must_escape("2024-01-01"));
        assert!(must_escape("2024-01-01 12:30:45"));
        assert!(!must_escape("hello"));
        assert!(!must_escape("ethernet-csmacd"));
        assert!(!must_escape("1a"));
    }

    #[test]
    fn quote_if_needed_wraps_only_escapables() {
        assert_eq!(quote_if_needed("42"), "'42'");
        assert_eq!(quote_if_needed("up"), "up");
    }

    #[test]
    fn preformatted_text_keeps_its_lines() {
        assert_eq!(wrap_text("a\nb\nc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn long_text_wraps_at_word_boundaries() {
        let text = "word ".repeat(40);
        let lines = wrap_text(text.trim());
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.len() <= WRAP_COLUMNS));
    }

    #[test]
    fn empty_text_yields_one_empty_line() {
        assert_eq!(wrap_text(""), vec![String::new()]);
    }

    #[test]
    fn inline_value_stays_on_the_key_line() {
        let mut doc = Doc::new();
        emit_text_value(&mut doc, 0, "description", "plain text");
        assert_eq!(doc.as_str(), "description: plain text\n");
    }

    #[test]
    fn colon_forces_block_style() {
        let mut doc = Doc::new();
        emit_text_value(&mut doc, 1, "description", "see RFC 7950: section 7");
        let out = doc.as_str();
        assert!(out.starts_with("  description: >-\n"));
        assert!(out.contains("    see RFC 7950: section 7\n"));
    }

    #[test]
    fn multiline_text_uses_block_style() {
        let mut doc = Doc::new();
        emit_text_value(&mut doc, 0, "contact", "line one\nline two");
        let out = doc.as_str();
        assert!(out.starts_with("contact: >-\n"));
        assert!(out.contains("  line one\n  line two\n"));
    }

    #[test]
    fn camel_case_transform() {
        assert_eq!(camel_case("mgmt-interface"), "mgmtInterface");
        assert_eq!(camel_case("a_b_c"), "aBC");
        assert_eq!(camel_case("plain"), "plain");
        assert_eq!(camel_case("Already"), "already");
    }
}
