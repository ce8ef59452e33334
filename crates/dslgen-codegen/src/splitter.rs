//! Delimiter-aware splitting of comma-separated source fragments.
//!
//! Used on constructor parameter lists, type argument lists and supertype
//! lists. The scan is best effort: malformed input never fails, it only
//! produces fewer (larger) fragments.
//!
//! # Examples
//!
//! ```
//! use dslgen_codegen::splitter::split_top_level;
//!
//! let parts = split_top_level("a: Map<String, List<Int>>, b: Int = 5");
//! assert_eq!(parts, vec!["a: Map<String, List<Int>>", "b: Int = 5"]);
//! ```

use regex::Regex;
use std::sync::LazyLock;

static PARAMETER_START_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:@(?:\w+:)?[\w.]+(?:\([^()]*\))?\s+)*(?:(?:public|private|protected|internal|override|open|final|vararg)\s+)*(?:(?:val|var)\s+)?[A-Za-z_]\w*\s*:",
    )
    .expect("valid regex")
});

/// Byte offsets of the top-level commas in `text`, plus the angle depth
/// left open at the end.
fn top_level_commas(text: &str, track_angles: bool) -> (Vec<usize>, usize) {
    let mut commas = Vec::new();
    let mut depth: usize = 0;
    let mut angle_depth: usize = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut previous: Option<char> = None;

    for (index, ch) in text.char_indices() {
        if let Some(open) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == open {
                quote = None;
            }
            previous = Some(ch);
            continue;
        }

        match ch {
            '"' | '\'' => quote = Some(ch),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            '<' if track_angles => angle_depth += 1,
            '>' if track_angles && previous != Some('-') => {
                angle_depth = angle_depth.saturating_sub(1);
            }
            ',' if depth == 0 && angle_depth == 0 => commas.push(index),
            _ => {}
        }
        previous = Some(ch);
    }
    (commas, angle_depth)
}

/// Cuts `text` at `commas`, trimming every piece. An empty last piece is
/// dropped.
fn cut(text: &str, commas: &[usize]) -> Vec<String> {
    let mut fragments = Vec::with_capacity(commas.len() + 1);
    let mut start = 0;
    for &comma in commas {
        fragments.push(text[start..comma].trim().to_string());
        start = comma + 1;
    }
    let last = text[start..].trim();
    if !last.is_empty() {
        fragments.push(last.to_string());
    }
    fragments
}

/// Splits `text` at commas that are outside any nesting and string literal.
///
/// Parentheses, brackets and braces share one depth counter; angle brackets
/// have their own, and the `>` of a `->` arrow never closes a generic. A
/// quote character opens a literal that only the same unescaped quote
/// character closes. Every fragment is trimmed and a trailing empty fragment
/// (from a trailing comma) is dropped. If nesting never closes, everything
/// after the last top-level comma stays one fragment.
#[must_use]
pub fn split_top_level(text: &str) -> Vec<String> {
    let (commas, _) = top_level_commas(text, true);
    cut(text, &commas)
}

/// Splits a constructor parameter list.
///
/// Works like [`split_top_level`], except that a fragment whose angle
/// brackets never close (a `<` comparison in a default expression) is cut
/// again at the first comma, counted without angle brackets, that is
/// followed by something shaped like `name:`.
///
/// # Examples
///
/// ```
/// use dslgen_codegen::splitter::split_parameter_list;
///
/// let parts = split_parameter_list("small: Boolean = LIMIT < 3, size: Int = 4");
/// assert_eq!(parts, vec!["small: Boolean = LIMIT < 3", "size: Int = 4"]);
/// ```
#[must_use]
pub fn split_parameter_list(text: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    for fragment in split_top_level(text) {
        let (_, open_angles) = top_level_commas(&fragment, true);
        if open_angles == 0 {
            fragments.push(fragment);
            continue;
        }
        let (commas, _) = top_level_commas(&fragment, false);
        match commas
            .into_iter()
            .find(|&comma| PARAMETER_START_REGEX.is_match(&fragment[comma + 1..]))
        {
            Some(comma) => {
                fragments.push(fragment[..comma].trim().to_string());
                fragments.extend(split_parameter_list(&fragment[comma + 1..]));
            }
            None => fragments.push(fragment),
        }
    }
    fragments
}
