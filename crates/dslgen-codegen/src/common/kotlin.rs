//! Kotlin lexical helpers shared by the scanner and the default recoverer.
//!
//! Only the constrained subset needed for constructor headers is handled:
//! comment masking, balanced delimiter matching, import tables and type
//! references.

use crate::classify::EXPORTABLE_BASES;
use crate::splitter::split_top_level;
use dslgen_core::{TypeRef, WrapperKind};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static IDENTIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*").expect("valid regex")
});

/// Simple names implicitly imported by every Kotlin file.
const BUILTINS: &[(&str, &str)] = &[
    ("Any", "kotlin.Any"),
    ("Array", "kotlin.Array"),
    ("Boolean", "kotlin.Boolean"),
    ("Byte", "kotlin.Byte"),
    ("Char", "kotlin.Char"),
    ("CharSequence", "kotlin.CharSequence"),
    ("Collection", "kotlin.collections.Collection"),
    ("Double", "kotlin.Double"),
    ("Float", "kotlin.Float"),
    ("Int", "kotlin.Int"),
    ("Iterable", "kotlin.collections.Iterable"),
    ("List", "kotlin.collections.List"),
    ("Long", "kotlin.Long"),
    ("Map", "kotlin.collections.Map"),
    ("MutableCollection", "kotlin.collections.MutableCollection"),
    ("MutableList", "kotlin.collections.MutableList"),
    ("MutableMap", "kotlin.collections.MutableMap"),
    ("MutableSet", "kotlin.collections.MutableSet"),
    ("Nothing", "kotlin.Nothing"),
    ("Number", "kotlin.Number"),
    ("Pair", "kotlin.Pair"),
    ("Set", "kotlin.collections.Set"),
    ("Short", "kotlin.Short"),
    ("String", "kotlin.String"),
    ("Triple", "kotlin.Triple"),
    ("UByte", "kotlin.UByte"),
    ("UInt", "kotlin.UInt"),
    ("ULong", "kotlin.ULong"),
    ("UShort", "kotlin.UShort"),
    ("Unit", "kotlin.Unit"),
];

/// Returns the qualified name of a Kotlin builtin simple name.
#[must_use]
pub fn builtin(simple: &str) -> Option<&'static str> {
    BUILTINS
        .binary_search_by(|(name, _)| name.cmp(&simple))
        .ok()
        .map(|index| BUILTINS[index].1)
}

/// Returns `true` for qualified names the generator knows exist, so a
/// simple name can be taken from a star-imported package.
fn is_known_type(qualified: &str) -> bool {
    EXPORTABLE_BASES.contains(&qualified)
        || [WrapperKind::Mutable, WrapperKind::ReadOnly]
            .into_iter()
            .any(|kind| kind.bindable_name() == qualified || kind.counterpart_name() == qualified)
}

/// Import aliases of one source unit, plus its package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportTable {
    package: String,
    aliases: BTreeMap<String, String>,
    stars: Vec<String>,
}

impl ImportTable {
    /// Creates an empty table for `package`.
    #[must_use]
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            aliases: BTreeMap::new(),
            stars: Vec::new(),
        }
    }

    /// Records `import qualified [as alias]`.
    pub fn insert(&mut self, qualified: &str, alias: Option<&str>) {
        let alias = alias.unwrap_or_else(|| qualified.rsplit('.').next().unwrap_or(qualified));
        self.aliases.insert(alias.to_string(), qualified.to_string());
    }

    /// Records `import package.*`.
    pub fn insert_star(&mut self, package: &str) {
        if !self.stars.iter().any(|star| star == package) {
            self.stars.push(package.to_string());
        }
    }

    /// Star-imported packages in source order.
    #[must_use]
    pub fn star_packages(&self) -> &[String] {
        &self.stars
    }

    /// Package of the unit.
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Returns the explicitly imported qualified name for `alias`.
    #[must_use]
    pub fn imported(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    /// Resolves a written type name to a qualified name.
    ///
    /// Explicit imports win over builtins; a dotted name whose first segment
    /// is imported is expanded; other dotted names are taken as qualified.
    /// A simple name that a star-imported package is known to hold (the
    /// component bases and the signal wrappers) resolves into that package;
    /// remaining simple names are assumed to live in the unit's package.
    #[must_use]
    pub fn resolve(&self, written: &str) -> String {
        if let Some((head, rest)) = written.split_once('.') {
            return match self.imported(head) {
                Some(qualified) => format!("{qualified}.{rest}"),
                None => written.to_string(),
            };
        }
        if let Some(qualified) = self.imported(written) {
            return qualified.to_string();
        }
        if let Some(qualified) = builtin(written) {
            return qualified.to_string();
        }
        if let Some(qualified) = self
            .stars
            .iter()
            .map(|star| format!("{star}.{written}"))
            .find(|candidate| is_known_type(candidate))
        {
            return qualified;
        }
        if self.package.is_empty() {
            written.to_string()
        } else {
            format!("{}.{written}", self.package)
        }
    }
}

/// Parses a written type into a [`TypeRef`].
///
/// `locals` lists names that must stay unqualified (type parameters).
/// Function types, projections and anything else outside
/// `Name<Args>?` become opaque references that still list the imported
/// names they mention.
///
/// # Examples
///
/// ```
/// use dslgen_codegen::common::kotlin::{parse_type, ImportTable};
///
/// let mut imports = ImportTable::new("com.example");
/// imports.insert("org.slf4j.Logger", None);
///
/// let ty = parse_type("Map<String, Logger?>", &imports, &[]);
/// assert_eq!(ty.name, "kotlin.collections.Map");
/// assert_eq!(ty.arguments[1].name, "org.slf4j.Logger");
/// assert!(ty.arguments[1].nullable);
/// assert_eq!(ty.render(), "Map<String, Logger?>");
/// ```
#[must_use]
pub fn parse_type(text: &str, imports: &ImportTable, locals: &[String]) -> TypeRef {
    let text = text.trim();
    let (body, nullable) = match text.strip_suffix('?') {
        Some(body) if !body.trim_end().ends_with(')') => (body.trim_end(), true),
        _ => (text, false),
    };

    let (head, arguments) = match body.find('<') {
        Some(open) if body.ends_with('>') => (&body[..open], Some(&body[open + 1..body.len() - 1])),
        _ => (body, None),
    };
    let head = head.trim();

    if head.is_empty() || !is_qualified_identifier(head) {
        return opaque(text, imports);
    }

    let name = if locals.iter().any(|local| local == head) {
        head.to_string()
    } else {
        imports.resolve(head)
    };
    let arguments = arguments
        .map(|args| {
            split_top_level(args)
                .iter()
                .map(|arg| parse_type(arg, imports, locals))
                .collect()
        })
        .unwrap_or_default();

    let parsed = TypeRef::new(name).with_arguments(arguments);
    if nullable { parsed.into_nullable() } else { parsed }
}

fn is_qualified_identifier(text: &str) -> bool {
    IDENTIFIER_REGEX
        .find(text)
        .is_some_and(|m| m.start() == 0 && m.end() == text.len())
}

fn opaque(text: &str, imports: &ImportTable) -> TypeRef {
    let mentioned = IDENTIFIER_REGEX
        .find_iter(text)
        .filter_map(|m| {
            let word = m.as_str();
            let head = word.split('.').next().unwrap_or(word);
            imports.imported(head).map(|_| TypeRef::new(imports.resolve(word)))
        })
        .collect();
    TypeRef::opaque(text, mentioned)
}

/// Replaces comments with spaces, keeping newlines and string literals.
///
/// The result has the same length and line structure as `text`, so byte
/// offsets and line numbers stay valid.
#[must_use]
pub fn mask_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
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
            ('/', Some('/')) => {
                out.push(' ');
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                    push_blank(&mut out, next);
                }
            }
            ('/', Some('*')) => {
                out.push(' ');
                if let Some(star) = chars.next() {
                    push_blank(&mut out, star);
                }
                let mut previous = ' ';
                for next in chars.by_ref() {
                    let closes = previous == '*' && next == '/';
                    push_blank(&mut out, next);
                    if closes {
                        break;
                    }
                    previous = next;
                }
            }
            ('"' | '\'', _) => {
                quote = Some(ch);
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

fn push_blank(out: &mut String, ch: char) {
    if ch == '\n' {
        out.push('\n');
    } else {
        out.extend(std::iter::repeat_n(' ', ch.len_utf8()));
    }
}

/// Finds the byte index of the delimiter closing the one at `open_index`.
///
/// String literals are skipped. Returns `None` when the delimiter never
/// closes.
#[must_use]
pub fn find_closing(text: &str, open_index: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (offset, ch) in text.get(open_index..)?.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        if ch == '"' || ch == '\'' {
            quote = Some(ch);
        } else if ch == open {
            depth += 1;
        } else if ch == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(open_index + offset);
            }
        }
    }
    None
}

/// One-based line number of byte `offset` in `text`.
#[must_use]
pub fn line_of(text: &str, offset: usize) -> usize {
    text.get(..offset)
        .map_or(1, |prefix| prefix.bytes().filter(|b| *b == b'\n').count() + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ImportTable {
        let mut imports = ImportTable::new("com.example");
        imports.insert("org.slf4j.Logger", None);
        imports.insert("com.vaadin.flow.component.button.Button", Some("VButton"));
        imports
    }

    #[test]
    fn test_builtins_sorted_for_lookup() {
        let names: Vec<&str> = BUILTINS.iter().map(|(name, _)| *name).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert_eq!(builtin("String"), Some("kotlin.String"));
        assert_eq!(builtin("List"), Some("kotlin.collections.List"));
        assert_eq!(builtin("Logger"), None);
    }

    #[test]
    fn test_resolve_order() {
        let imports = table();
        assert_eq!(imports.resolve("Logger"), "org.slf4j.Logger");
        assert_eq!(imports.resolve("VButton"), "com.vaadin.flow.component.button.Button");
        assert_eq!(imports.resolve("Int"), "kotlin.Int");
        assert_eq!(imports.resolve("Card"), "com.example.Card");
        assert_eq!(imports.resolve("java.time.Duration"), "java.time.Duration");
    }

    #[test]
    fn test_resolve_through_star_imports() {
        let mut imports = table();
        imports.insert_star("com.github.fenrur.signal");
        imports.insert_star("com.vaadin.flow.component");
        imports.insert_star("com.example.model");
        imports.insert_star("com.example.model");

        assert_eq!(imports.star_packages().len(), 3);
        assert_eq!(
            imports.resolve("BindableMutableSignal"),
            "com.github.fenrur.signal.BindableMutableSignal"
        );
        assert_eq!(imports.resolve("Composite"), "com.vaadin.flow.component.Composite");
        // Explicit imports and builtins still come first.
        assert_eq!(imports.resolve("Logger"), "org.slf4j.Logger");
        assert_eq!(imports.resolve("String"), "kotlin.String");
        // Unknown names stay in the unit's package.
        assert_eq!(imports.resolve("Repository"), "com.example.Repository");
    }

    #[test]
    fn test_parse_nullable_generic() {
        let ty = parse_type("List<Logger>?", &table(), &[]);
        assert!(ty.nullable);
        assert_eq!(ty.name, "kotlin.collections.List");
        assert_eq!(ty.arguments[0].name, "org.slf4j.Logger");
        assert_eq!(ty.render(), "List<Logger>?");
    }

    #[test]
    fn test_parse_function_type_is_opaque() {
        let ty = parse_type("(Logger) -> Unit", &table(), &[]);
        assert!(ty.opaque);
        assert_eq!(ty.render(), "(Logger) -> Unit");
        assert_eq!(ty.arguments.len(), 1);
        assert_eq!(ty.arguments[0].name, "org.slf4j.Logger");
    }

    #[test]
    fn test_parse_local_type_parameter() {
        let ty = parse_type("List<T>", &table(), &["T".to_string()]);
        assert_eq!(ty.arguments[0].name, "T");
    }

    #[test]
    fn test_mask_comments_preserves_layout() {
        let text = "a: Int, // one, two\n/* x, y */ b: String = \"// not a comment\"";
        let masked = mask_comments(text);
        assert_eq!(masked.len(), text.len());
        assert_eq!(masked.lines().count(), text.lines().count());
        assert!(!masked.contains("one"));
        assert!(!masked.contains("x, y"));
        assert!(masked.contains("\"// not a comment\""));
    }

    #[test]
    fn test_find_closing_skips_literals() {
        let text = r#"(a: String = ")", b: Int = f(1))"#;
        assert_eq!(find_closing(text, 0, '(', ')'), Some(text.len() - 1));
        assert_eq!(find_closing("(a, (b)", 0, '(', ')'), None);
    }

    #[test]
    fn test_line_of() {
        let text = "one\ntwo\nthree";
        assert_eq!(line_of(text, 0), 1);
        assert_eq!(line_of(text, 4), 2);
        assert_eq!(line_of(text, 8), 3);
    }
}
