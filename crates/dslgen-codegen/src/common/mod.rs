//! Shared code generation utilities.
//!
//! Used by both the factory synthesizer and the binding synthesizer:
//! output types and Kotlin lexical helpers.

pub mod kotlin;
pub mod types;

use std::collections::BTreeSet;

/// Renders a sorted import block, skipping names from `package` itself.
///
/// Entries ending in `.*` are star imports; explicit names from a
/// star-imported package are then left out. Returns an empty vector when
/// nothing needs importing.
#[must_use]
pub fn import_lines(imports: &BTreeSet<String>, package: &str) -> Vec<String> {
    let stars: BTreeSet<&str> = imports
        .iter()
        .filter_map(|name| name.strip_suffix(".*"))
        .collect();
    imports
        .iter()
        .filter(|name| {
            name.rsplit_once('.').is_some_and(|(pkg, member)| {
                pkg != package && (member == "*" || !stars.contains(pkg))
            })
        })
        .map(|name| format!("import {name}"))
        .collect()
}

/// Adds `package.*` entries for star-imported packages to `imports`.
pub fn insert_star_imports(imports: &mut BTreeSet<String>, packages: &[String]) {
    for package in packages.iter().filter(|p| !p.is_empty()) {
        imports.insert(format!("{package}.*"));
    }
}
