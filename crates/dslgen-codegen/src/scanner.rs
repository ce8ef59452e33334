//! Declaration scanner for Kotlin source units.
//!
//! Extracts, from a constrained subset of Kotlin, everything the
//! synthesizers need:
//!
//! - `@GenDsl` classes with their ordered primary constructor parameters,
//!   parameter roles and supertypes
//! - the supertypes of every other class in the unit, for classification
//! - `@ExposeSignal` properties, declared in class bodies or as constructor
//!   properties
//!
//! This is not a Kotlin parser. Comments are masked first, then class
//! headers are located by pattern and their delimiters matched explicitly.
//! Problems with one declaration are reported as diagnostics on the returned
//! [`ScannedUnit`]; the rest of the unit is still scanned.
//!
//! # Examples
//!
//! ```
//! use dslgen_codegen::scanner::{scan_source, ScanOptions};
//! use dslgen_core::Role;
//!
//! let source = r#"
//! package com.example
//!
//! import com.vaadin.flow.component.button.Button
//! import org.slf4j.Logger
//!
//! @GenDsl
//! class CustomButton(
//!     @GenDslInject private val logger: Logger,
//!     label: String,
//!     val primary: Boolean = false,
//! ) : Button(label)
//! "#;
//!
//! let unit = scan_source("CustomButton.kt", source, &ScanOptions::default());
//! let decl = &unit.declarations[0];
//!
//! assert_eq!(decl.qualified_name(), "com.example.CustomButton");
//! assert_eq!(decl.parameters[0].role, Role::Injected);
//! assert_eq!(decl.parameters[1].role, Role::Exposed);
//! assert!(decl.parameters[2].has_default);
//! assert_eq!(decl.supertypes[0].name, "com.vaadin.flow.component.button.Button");
//! ```

use crate::classify::TypeIndex;
use crate::common::kotlin::{find_closing, line_of, mask_comments, parse_type, ImportTable};
use crate::splitter::{split_parameter_list, split_top_level};
use dslgen_core::{
    Declaration, Diagnostic, DiagnosticKind, Diagnostics, MarkerConvention, ParamMarkers,
    Parameter, PropertyBinding, Role, SourceLocation, TypeRef, Visibility,
};
use regex::Regex;
use std::sync::LazyLock;

static PACKAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*package\s+([\w.]+)").expect("valid regex"));
static IMPORT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*import\s+([\w.]+?)(\.\*)?(?:\s+as\s+(\w+))?\s*;?\s*$").expect("valid regex")
});
static CLASS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:^|[^\w:.@])((?:@(?:\w+:)?[\w.]+(?:\([^()]*\))?\s+)*)((?:\b(?:public|private|protected|internal|open|abstract|sealed|data|final|inner|value|inline|enum|annotation|fun|companion|expect|actual)\s+)*)\b(class|interface|object)\s+([A-Za-z_]\w*)",
    )
    .expect("valid regex")
});
static CONSTRUCTOR_PREFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:@(?:\w+:)?[\w.]+(?:\([^()]*\))?\s+)*)(?:(public|private|protected|internal)\s+)?constructor\s*")
        .expect("valid regex")
});
static PARAM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)^((?:@(?:\w+:)?[\w.]+(?:\([^()]*\))?\s+)*)((?:(?:public|private|protected|internal|override|open|final|vararg)\s+)*)((?:val|var)\s+)?([A-Za-z_]\w*)\s*:\s*(.+)$",
    )
    .expect("valid regex")
});
static PROPERTY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"((?:@(?:\w+:)?[\w.]+(?:\([^()]*\))?\s+)*)((?:\b(?:public|private|protected|internal|override|open|final|lateinit|const|abstract)\s+)*)\b(?:val|var)\s+([A-Za-z_]\w*)(?:[ \t]*:[ \t]*([^=\n{]+))?",
    )
    .expect("valid regex")
});
static SECONDARY_CONSTRUCTOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\w.])constructor\s*\(").expect("valid regex"));
static ANNOTATION_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(?:\w+:)?([\w.]+)").expect("valid regex"));

const GEN_DSL: &str = "GenDsl";
const INJECT_MARKER: &str = "GenDslInject";
const EXPOSE_MARKER: &str = "GenDslParam";
const EXPOSE_SIGNAL: &str = "ExposeSignal";

/// Scanner settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Convention for declarations that carry no parameter markers
    pub default_convention: MarkerConvention,
}

/// Everything extracted from one source unit.
#[derive(Debug, Clone, Default)]
pub struct ScannedUnit {
    /// Path the unit was read from
    pub path: String,
    /// Declared package (empty for the default package)
    pub package: String,
    /// Marked declarations with a usable constructor, in source order
    pub declarations: Vec<Declaration>,
    /// Properties carrying the binding marker, in source order
    pub properties: Vec<PropertyBinding>,
    /// Supertypes of every class in the unit
    pub index: TypeIndex,
    /// Declarations skipped for structural problems
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassKind {
    Class,
    Interface,
    Object,
    Enum,
    Annotation,
}

impl ClassKind {
    fn from_header(keyword: &str, modifiers: &str) -> Self {
        let has = |word: &str| modifiers.split_whitespace().any(|m| m == word);
        match keyword {
            "interface" => Self::Interface,
            "object" => Self::Object,
            _ if has("enum") => Self::Enum,
            _ if has("annotation") => Self::Annotation,
            _ => Self::Class,
        }
    }

    const fn describe(self) -> &'static str {
        match self {
            Self::Class => "a class",
            Self::Interface => "an interface",
            Self::Object => "an object",
            Self::Enum => "an enum class",
            Self::Annotation => "an annotation class",
        }
    }
}

/// How a class header declares its primary constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConstructorShape {
    /// Parenthesized parameter list; `start..end` is its interior
    Primary {
        start: usize,
        end: usize,
        visibility: Visibility,
    },
    /// No parentheses: an implicit no-argument constructor
    Implicit,
    /// Opening parenthesis without a matching close
    Unbalanced,
}

#[derive(Debug)]
struct ClassHeader {
    type_parameters: Vec<String>,
    constructor: ConstructorShape,
    supertypes: Vec<String>,
    body: Option<(usize, usize)>,
}

/// Scans one Kotlin source unit.
///
/// Never fails: unreadable structure is reported through
/// [`ScannedUnit::diagnostics`] and unmatched text is skipped.
#[must_use]
pub fn scan_source(path: &str, text: &str, options: &ScanOptions) -> ScannedUnit {
    let masked = mask_comments(text);
    let package = PACKAGE_REGEX
        .captures(&masked)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default();

    let mut imports = ImportTable::new(package.clone());
    for caps in IMPORT_REGEX.captures_iter(&masked) {
        if caps.get(2).is_some() {
            imports.insert_star(&caps[1]);
        } else {
            imports.insert(&caps[1], caps.get(3).map(|m| m.as_str()));
        }
    }

    let mut unit = ScannedUnit {
        path: path.to_string(),
        package,
        ..ScannedUnit::default()
    };

    for caps in CLASS_REGEX.captures_iter(&masked) {
        let (Some(annotations), Some(modifiers), Some(keyword), Some(name)) =
            (caps.get(1), caps.get(2), caps.get(3), caps.get(4))
        else {
            continue;
        };
        if modifiers.as_str().split_whitespace().any(|m| m == "companion") {
            continue;
        }

        let kind = ClassKind::from_header(keyword.as_str(), modifiers.as_str());
        let header = parse_header(&masked, name.end());
        let location = SourceLocation::new(path, line_of(&masked, name.start()));
        let qualified = qualify(&unit.package, name.as_str());

        let supertypes: Vec<TypeRef> = header
            .supertypes
            .iter()
            .map(|text| parse_type(text, &imports, &header.type_parameters))
            .collect();
        unit.index.insert_with_star_imports(
            qualified.clone(),
            supertypes.clone(),
            imports.star_packages().to_vec(),
        );

        if let ConstructorShape::Primary { start, end, .. } = header.constructor {
            collect_constructor_properties(&masked[start..end], start, name.as_str(), &masked, &imports, &mut unit);
        }
        if let Some((start, end)) = header.body {
            collect_body_properties(&masked[start..end], start, name.as_str(), &masked, &imports, &mut unit);
        }

        if !has_marker(annotations.as_str(), GEN_DSL) {
            continue;
        }

        let structural = |reason: String| {
            Diagnostic::error(DiagnosticKind::Structural, qualified.clone(), reason).at(location.clone())
        };

        if kind != ClassKind::Class {
            unit.diagnostics.push(structural(format!(
                "@GenDsl requires a class with a primary constructor, but this is {}",
                kind.describe()
            )));
            continue;
        }
        if modifiers.as_str().split_whitespace().any(|m| m == "abstract" || m == "sealed") {
            unit.diagnostics
                .push(structural("abstract and sealed classes cannot be constructed".to_string()));
            continue;
        }
        if !header.type_parameters.is_empty() {
            unit.diagnostics
                .push(structural("generic declarations are not supported".to_string()));
            continue;
        }

        let declaration = match header.constructor {
            ConstructorShape::Unbalanced => {
                unit.diagnostics
                    .push(structural("unbalanced parentheses in the primary constructor".to_string()));
                continue;
            }
            ConstructorShape::Implicit => {
                let has_secondary = header
                    .body
                    .is_some_and(|(start, end)| SECONDARY_CONSTRUCTOR_REGEX.is_match(&masked[start..end]));
                if has_secondary {
                    unit.diagnostics.push(structural(
                        "no primary constructor; only secondary constructors are declared".to_string(),
                    ));
                    continue;
                }
                Declaration::new(name.as_str(), unit.package.clone())
            }
            ConstructorShape::Primary { visibility, .. }
                if matches!(visibility, Visibility::Private | Visibility::Protected) =>
            {
                unit.diagnostics
                    .push(structural(format!("primary constructor is {visibility}")));
                continue;
            }
            ConstructorShape::Primary { start, end, .. } => {
                match parse_parameters(&masked[start..end], &imports, options) {
                    Ok(parameters) => {
                        let mut declaration = Declaration::new(name.as_str(), unit.package.clone());
                        declaration.parameters = parameters;
                        declaration
                    }
                    Err(reason) => {
                        unit.diagnostics.push(structural(reason));
                        continue;
                    }
                }
            }
        };

        let mut declaration = declaration.with_location(location);
        declaration.supertypes = supertypes;
        declaration.star_imports = imports.star_packages().to_vec();
        tracing::debug!(
            declaration = %declaration.qualified_name(),
            parameters = declaration.parameters.len(),
            "found marked declaration"
        );
        unit.declarations.push(declaration);
    }

    tracing::debug!(
        path,
        declarations = unit.declarations.len(),
        properties = unit.properties.len(),
        classes = unit.index.len(),
        "scanned source unit"
    );
    unit
}

/// Locates the interior of the primary constructor parentheses of class
/// `name` in comment-masked text.
///
/// Returns `None` when the class is missing or has no parenthesized
/// constructor.
pub(crate) fn constructor_span(masked: &str, name: &str) -> Option<(usize, usize)> {
    CLASS_REGEX
        .captures_iter(masked)
        .filter_map(|caps| caps.get(4))
        .filter(|found| found.as_str() == name)
        .find_map(|found| match parse_header(masked, found.end()).constructor {
            ConstructorShape::Primary { start, end, .. } => Some((start, end)),
            ConstructorShape::Implicit | ConstructorShape::Unbalanced => None,
        })
}

fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}

/// Returns `true` if `annotations` contains `@simple` or `@a.b.simple`.
fn has_marker(annotations: &str, simple: &str) -> bool {
    ANNOTATION_NAME_REGEX.captures_iter(annotations).any(|caps| {
        let name = &caps[1];
        name.rsplit('.').next() == Some(simple)
    })
}

fn visibility_of(modifiers: &str) -> Visibility {
    modifiers
        .split_whitespace()
        .find_map(Visibility::from_keyword)
        .unwrap_or_default()
}

fn skip_whitespace(text: &str, mut pos: usize) -> usize {
    while let Some(ch) = text[pos..].chars().next() {
        if !ch.is_whitespace() {
            break;
        }
        pos += ch.len_utf8();
    }
    pos
}

/// Parses what follows a class name: type parameters, the primary
/// constructor, the supertype list and the body span.
fn parse_header(text: &str, mut pos: usize) -> ClassHeader {
    let mut header = ClassHeader {
        type_parameters: Vec::new(),
        constructor: ConstructorShape::Implicit,
        supertypes: Vec::new(),
        body: None,
    };

    pos = skip_whitespace(text, pos);
    if text[pos..].starts_with('<') {
        let Some(close) = find_closing(text, pos, '<', '>') else {
            header.constructor = ConstructorShape::Unbalanced;
            return header;
        };
        header.type_parameters = type_parameter_names(&text[pos + 1..close]);
        pos = skip_whitespace(text, close + 1);
    }

    let mut visibility = Visibility::Public;
    let mut explicit_keyword = false;
    if let Some(caps) = CONSTRUCTOR_PREFIX_REGEX.captures(&text[pos..]) {
        visibility = caps
            .get(2)
            .and_then(|m| Visibility::from_keyword(m.as_str()))
            .unwrap_or_default();
        explicit_keyword = true;
        pos += caps.get(0).map_or(0, |m| m.end());
    }

    if text[pos..].starts_with('(') {
        let Some(close) = find_closing(text, pos, '(', ')') else {
            header.constructor = ConstructorShape::Unbalanced;
            return header;
        };
        header.constructor = ConstructorShape::Primary {
            start: pos + 1,
            end: close,
            visibility,
        };
        pos = close + 1;
    } else if explicit_keyword {
        header.constructor = ConstructorShape::Unbalanced;
        return header;
    }

    pos = skip_whitespace(text, pos);
    if text[pos..].starts_with(':') {
        let (list, end) = supertype_list(text, pos + 1);
        header.supertypes = split_top_level(&list)
            .into_iter()
            .map(|entry| strip_supertype_call(&entry))
            .filter(|entry| !entry.is_empty())
            .collect();
        pos = skip_whitespace(text, end);
    }

    if text[pos..].starts_with('{') {
        if let Some(close) = find_closing(text, pos, '{', '}') {
            header.body = Some((pos + 1, close));
        }
    }
    header
}

fn type_parameter_names(list: &str) -> Vec<String> {
    split_top_level(list)
        .iter()
        .filter_map(|entry| {
            entry
                .split_whitespace()
                .find(|token| !token.starts_with('@') && !matches!(*token, "in" | "out" | "reified"))
                .map(|token| token.split(':').next().unwrap_or(token).to_string())
        })
        .collect()
}

/// Collects the supertype list starting after `:`.
///
/// The list ends at a body brace, a `where` clause, or a line break that
/// does not continue the list.
fn supertype_list(text: &str, start: usize) -> (String, usize) {
    let mut depth = 0usize;
    let mut previous = ' ';
    let mut end = text.len();

    for (offset, ch) in text[start..].char_indices() {
        let pos = start + offset;
        match ch {
            '(' | '[' | '<' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            '>' if previous != '-' => depth = depth.saturating_sub(1),
            '{' if depth == 0 => {
                end = pos;
                break;
            }
            '\n' if depth == 0 => {
                let so_far = text[start..pos].trim();
                let continues = so_far.is_empty()
                    || so_far.ends_with(',')
                    || text[pos..].trim_start().starts_with(',')
                    || text[pos..].trim_start().starts_with('{');
                if !continues {
                    end = pos;
                    break;
                }
            }
            _ => {}
        }
        previous = ch;
    }

    let list = &text[start..end];
    let list = match list.find(" where ").or_else(|| list.find("\nwhere ")) {
        Some(index) => &list[..index],
        None => list,
    };
    (list.trim().to_string(), end)
}

/// `Button(label)` becomes `Button`; `Base by delegate` becomes `Base`.
fn strip_supertype_call(entry: &str) -> String {
    let entry = entry.split(" by ").next().unwrap_or(entry).trim();
    let mut angle = 0usize;
    let mut previous = ' ';
    for (index, ch) in entry.char_indices() {
        match ch {
            '<' => angle += 1,
            '>' if previous != '-' => angle = angle.saturating_sub(1),
            '(' if angle == 0 => return entry[..index].trim().to_string(),
            _ => {}
        }
        previous = ch;
    }
    entry.to_string()
}

/// Blanks the contents of braces nested inside a class body, so only
/// direct members remain visible. Offsets are preserved.
fn direct_members(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for ch in body.chars() {
        let hidden = depth > 0;
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
        } else {
            match ch {
                '"' | '\'' => quote = Some(ch),
                '{' => depth += 1,
                '}' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        if hidden && depth > 0 && ch != '\n' {
            out.extend(std::iter::repeat_n(' ', ch.len_utf8()));
        } else {
            out.push(ch);
        }
    }
    out
}

fn collect_body_properties(
    body: &str,
    offset: usize,
    owner: &str,
    masked: &str,
    imports: &ImportTable,
    unit: &mut ScannedUnit,
) {
    let members = direct_members(body);
    for caps in PROPERTY_REGEX.captures_iter(&members) {
        let annotations = caps.get(1).map_or("", |m| m.as_str());
        if !has_marker(annotations, EXPOSE_SIGNAL) {
            continue;
        }
        let (Some(modifiers), Some(name)) = (caps.get(2), caps.get(3)) else {
            continue;
        };
        let declared_type = caps
            .get(4)
            .map(|m| m.as_str().split(" by ").next().unwrap_or_default().trim().to_string());
        let line = line_of(masked, offset + name.start());
        push_property(
            unit,
            imports,
            owner,
            name.as_str(),
            declared_type.as_deref(),
            visibility_of(modifiers.as_str()),
            line,
        );
    }
}

fn collect_constructor_properties(
    list: &str,
    offset: usize,
    owner: &str,
    masked: &str,
    imports: &ImportTable,
    unit: &mut ScannedUnit,
) {
    for (fragment, start) in fragments_with_offsets(list) {
        let Some(caps) = PARAM_REGEX.captures(&fragment) else {
            continue;
        };
        if caps.get(3).is_none() || !has_marker(&caps[1], EXPOSE_SIGNAL) {
            continue;
        }
        let type_text = caps[5].split('=').next().unwrap_or_default().trim().to_string();
        let line = line_of(masked, offset + start);
        push_property(
            unit,
            imports,
            owner,
            &caps[4],
            Some(&type_text),
            visibility_of(&caps[2]),
            line,
        );
    }
}

fn push_property(
    unit: &mut ScannedUnit,
    imports: &ImportTable,
    owner: &str,
    name: &str,
    declared_type: Option<&str>,
    visibility: Visibility,
    line: usize,
) {
    let type_ref = declared_type
        .filter(|text| !text.is_empty())
        .map_or_else(|| TypeRef::opaque("", Vec::new()), |text| parse_type(text, imports, &[]));
    unit.properties.push(PropertyBinding {
        owner: owner.to_string(),
        package: unit.package.clone(),
        name: name.to_string(),
        type_ref,
        visibility,
        star_imports: imports.star_packages().to_vec(),
        location: SourceLocation::new(unit.path.clone(), line),
    });
}

/// Splits a parameter list and reports where each fragment starts.
fn fragments_with_offsets(list: &str) -> Vec<(String, usize)> {
    let mut search_from = 0;
    split_parameter_list(list)
        .into_iter()
        .map(|fragment| {
            let start = list[search_from..]
                .find(&fragment)
                .map_or(search_from, |index| search_from + index);
            search_from = start + fragment.len();
            (fragment, start)
        })
        .collect()
}

fn parse_parameters(
    list: &str,
    imports: &ImportTable,
    options: &ScanOptions,
) -> Result<Vec<Parameter>, String> {
    struct Raw {
        name: String,
        type_ref: TypeRef,
        markers: ParamMarkers,
        has_default: bool,
    }

    let mut raw = Vec::new();
    for (fragment, _) in fragments_with_offsets(list) {
        let caps = PARAM_REGEX
            .captures(&fragment)
            .ok_or_else(|| format!("cannot read constructor parameter '{}'", fragment.trim()))?;
        if caps[2].split_whitespace().any(|m| m == "vararg") {
            return Err(format!("vararg parameter '{}' is not supported", &caps[4]));
        }
        let (type_text, default) = match caps[5].split_once('=') {
            Some((type_text, default)) => (type_text, Some(default)),
            None => (&caps[5], None),
        };
        raw.push(Raw {
            name: caps[4].to_string(),
            type_ref: parse_type(type_text, imports, &[]),
            markers: ParamMarkers {
                inject: has_marker(&caps[1], INJECT_MARKER),
                expose: has_marker(&caps[1], EXPOSE_MARKER),
            },
            has_default: default.is_some_and(|d| !d.trim().is_empty()),
        });
    }

    let markers: Vec<ParamMarkers> = raw.iter().map(|r| r.markers).collect();
    let convention = MarkerConvention::infer(&markers, options.default_convention);
    Ok(raw
        .into_iter()
        .map(|r| {
            let mut parameter = Parameter::new(r.name, r.type_ref, Role::classify(r.markers, convention));
            parameter.has_default = r.has_default;
            parameter
        })
        .collect())
}
