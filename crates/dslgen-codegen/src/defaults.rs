//! Default-value recovery from source text.
//!
//! Default expressions of constructor parameters are always read back from
//! the raw source, never from the structured model: the constructor span is
//! re-located by class name, split into top-level fragments, and each
//! `name: Type = expression` fragment yields one entry.
//!
//! Recovery is best effort. A parameter whose fragment does not match simply
//! has no recovered default and is generated as a required parameter.

use crate::common::kotlin::mask_comments;
use crate::scanner::constructor_span;
use crate::splitter::split_parameter_list;
use dslgen_core::Declaration;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static DEFAULT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)^(?:@(?:\w+:)?[\w.]+(?:\([^)]*\))?\s+)*(?:(?:private|protected|public|internal|val|var|override|open|final)\s+)*([A-Za-z_]\w*)\s*:\s*[^=]+=\s*(.+)$",
    )
    .expect("valid regex")
});

/// Recovers default-value expressions for `declaration` from `source`.
///
/// Returns a map from parameter name to the literal expression text. The map
/// is empty when the class or its constructor cannot be found.
///
/// # Examples
///
/// ```
/// use dslgen_codegen::defaults::recover_defaults;
/// use dslgen_core::Declaration;
///
/// let source = "class Card(a: Map<String, List<Int>>, b: Int = 5)";
/// let defaults = recover_defaults(&Declaration::new("Card", ""), source);
///
/// assert_eq!(defaults.get("b").map(String::as_str), Some("5"));
/// assert!(!defaults.contains_key("a"));
/// ```
#[must_use]
pub fn recover_defaults(declaration: &Declaration, source: &str) -> BTreeMap<String, String> {
    let masked = mask_comments(source);
    let Some((start, end)) = constructor_span(&masked, &declaration.name) else {
        tracing::debug!(
            declaration = %declaration.qualified_name(),
            "constructor span not found; no defaults recovered"
        );
        return BTreeMap::new();
    };

    let mut defaults = BTreeMap::new();
    for fragment in split_parameter_list(&masked[start..end]) {
        let Some(caps) = DEFAULT_REGEX.captures(&fragment) else {
            continue;
        };
        let expression = clean_expression(&caps[2]);
        if !expression.is_empty() {
            defaults.insert(caps[1].to_string(), expression);
        }
    }
    defaults
}

/// Removes comments and stray trailing separators from an expression.
///
/// Comment markers inside string and character literals are kept.
///
/// # Examples
///
/// ```
/// use dslgen_codegen::defaults::clean_expression;
///
/// assert_eq!(clean_expression("false, // toggled later"), "false");
/// assert_eq!(clean_expression("listOf(1, 2) /* small */"), "listOf(1, 2)");
/// assert_eq!(clean_expression(r#""http://example.com""#), r#""http://example.com""#);
/// ```
#[must_use]
pub fn clean_expression(expression: &str) -> String {
    let mut out = String::with_capacity(expression.len());
    let mut chars = expression.chars().peekable();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    while let Some(ch) = chars.next() {
        if let Some(open) = quote {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == open {
                quote = None;
            }
            continue;
        }
        let lookahead = chars.peek().copied();
        match (ch, lookahead) {
            ('/', Some('/')) => break,
            ('/', Some('*')) => {
                chars.next();
                let mut previous = ' ';
                for next in chars.by_ref() {
                    if previous == '*' && next == '/' {
                        break;
                    }
                    previous = next;
                }
                out.push(' ');
            }
            ('"' | '\'', _) => {
                quote = Some(ch);
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }

    out.trim()
        .trim_end_matches([',', ';'])
        .trim()
        .to_string()
}
