//! Exportability classification.
//!
//! A declaration is *exportable* (receives a builder function) when its
//! supertype chain reaches a UI component: either one of the base component
//! types, or any type declared in a known component package.

use dslgen_core::{Declaration, TypeRef};
use std::collections::{BTreeMap, BTreeSet};

/// Types that make any subtype exportable.
pub const EXPORTABLE_BASES: &[&str] = &[
    "com.vaadin.flow.component.Component",
    "com.vaadin.flow.component.Composite",
];

/// Packages whose types are all treated as exportable components.
pub const EXPORTABLE_PACKAGES: &[&str] = &[
    "com.vaadin.flow.component",
    "com.vaadin.flow.component.accordion",
    "com.vaadin.flow.component.applayout",
    "com.vaadin.flow.component.avatar",
    "com.vaadin.flow.component.board",
    "com.vaadin.flow.component.button",
    "com.vaadin.flow.component.charts",
    "com.vaadin.flow.component.checkbox",
    "com.vaadin.flow.component.combobox",
    "com.vaadin.flow.component.confirmdialog",
    "com.vaadin.flow.component.contextmenu",
    "com.vaadin.flow.component.cookieconsent",
    "com.vaadin.flow.component.crud",
    "com.vaadin.flow.component.customfield",
    "com.vaadin.flow.component.datepicker",
    "com.vaadin.flow.component.datetimepicker",
    "com.vaadin.flow.component.details",
    "com.vaadin.flow.component.dialog",
    "com.vaadin.flow.component.formlayout",
    "com.vaadin.flow.component.grid",
    "com.vaadin.flow.component.gridpro",
    "com.vaadin.flow.component.html",
    "com.vaadin.flow.component.icon",
    "com.vaadin.flow.component.inputfield",
    "com.vaadin.flow.component.listbox",
    "com.vaadin.flow.component.login",
    "com.vaadin.flow.component.map",
    "com.vaadin.flow.component.menubar",
    "com.vaadin.flow.component.messages",
    "com.vaadin.flow.component.notification",
    "com.vaadin.flow.component.orderedlayout",
    "com.vaadin.flow.component.progressbar",
    "com.vaadin.flow.component.radiobutton",
    "com.vaadin.flow.component.richtexteditor",
    "com.vaadin.flow.component.select",
    "com.vaadin.flow.component.shared",
    "com.vaadin.flow.component.sidenav",
    "com.vaadin.flow.component.splitlayout",
    "com.vaadin.flow.component.spreadsheet",
    "com.vaadin.flow.component.tabs",
    "com.vaadin.flow.component.textfield",
    "com.vaadin.flow.component.timepicker",
    "com.vaadin.flow.component.treegrid",
    "com.vaadin.flow.component.upload",
    "com.vaadin.flow.component.virtuallist",
];

/// Supertypes of every class seen during a pass, keyed by qualified name.
///
/// Unmarked classes are indexed too, so a marked declaration can reach an
/// exportable base through intermediate hand-written classes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeIndex {
    classes: BTreeMap<String, IndexedClass>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct IndexedClass {
    supertypes: Vec<TypeRef>,
    star_imports: Vec<String>,
}

impl TypeIndex {
    /// Creates an empty index.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            classes: BTreeMap::new(),
        }
    }

    /// Records the direct supertypes of `qualified_name`.
    pub fn insert(&mut self, qualified_name: impl Into<String>, supertypes: Vec<TypeRef>) {
        self.insert_with_star_imports(qualified_name, supertypes, Vec::new());
    }

    /// Records the direct supertypes of `qualified_name` together with the
    /// packages its unit imports with `*`.
    pub fn insert_with_star_imports(
        &mut self,
        qualified_name: impl Into<String>,
        supertypes: Vec<TypeRef>,
        star_imports: Vec<String>,
    ) {
        self.classes.insert(
            qualified_name.into(),
            IndexedClass {
                supertypes,
                star_imports,
            },
        );
    }

    /// Records a declaration.
    pub fn insert_declaration(&mut self, declaration: &Declaration) {
        self.insert_with_star_imports(
            declaration.qualified_name(),
            declaration.supertypes.clone(),
            declaration.star_imports.clone(),
        );
    }

    /// Merges another index into this one.
    pub fn merge(&mut self, other: Self) {
        self.classes.extend(other.classes);
    }

    /// Direct supertypes of a known class.
    #[must_use]
    pub fn supertypes(&self, qualified_name: &str) -> Option<&[TypeRef]> {
        self.classes
            .get(qualified_name)
            .map(|class| class.supertypes.as_slice())
    }

    /// Returns `true` if the class is known.
    #[must_use]
    pub fn contains(&self, qualified_name: &str) -> bool {
        self.classes.contains_key(qualified_name)
    }

    /// Number of known classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if no class is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Decides whether `declaration` receives a builder function.
///
/// Each direct supertype is checked against [`EXPORTABLE_BASES`], then
/// against [`EXPORTABLE_PACKAGES`], then followed through `index`.
/// A supertype that was left in the declaring package and is not indexed
/// is retried in every star-imported package. Supertypes that match
/// nothing and are not indexed make no contribution.
///
/// # Examples
///
/// ```
/// use dslgen_codegen::classify::{is_exportable, TypeIndex};
/// use dslgen_core::{Declaration, TypeRef};
///
/// let mut index = TypeIndex::new();
/// index.insert("com.example.Mid", vec![TypeRef::new("com.vaadin.flow.component.Component")]);
///
/// let card = Declaration::new("Card", "com.example")
///     .with_supertype(TypeRef::new("com.example.Mid"));
/// assert!(is_exportable(&card, &index));
///
/// let service = Declaration::new("Service", "com.example");
/// assert!(!is_exportable(&service, &index));
/// ```
#[must_use]
pub fn is_exportable(declaration: &Declaration, index: &TypeIndex) -> bool {
    let mut visited = BTreeSet::new();
    let owner = declaration.qualified_name();
    visited.insert(owner.clone());
    reaches_component(
        &owner,
        &declaration.supertypes,
        &declaration.star_imports,
        index,
        &mut visited,
    )
}

fn package_of(qualified_name: &str) -> &str {
    qualified_name
        .rsplit_once('.')
        .map_or("", |(package, _)| package)
}

fn reaches_component(
    owner: &str,
    supertypes: &[TypeRef],
    star_imports: &[String],
    index: &TypeIndex,
    visited: &mut BTreeSet<String>,
) -> bool {
    supertypes.iter().any(|supertype| {
        if supertype.opaque {
            return false;
        }
        let name = supertype.name.as_str();
        if reaches_by_name(name, index, visited) {
            return true;
        }
        if index.contains(name) || package_of(name) != package_of(owner) {
            return false;
        }
        let simple = supertype.simple_name();
        star_imports.iter().any(|star| {
            EXPORTABLE_PACKAGES.contains(&star.as_str())
                || reaches_by_name(&format!("{star}.{simple}"), index, visited)
        })
    })
}

fn reaches_by_name(name: &str, index: &TypeIndex, visited: &mut BTreeSet<String>) -> bool {
    if EXPORTABLE_BASES.contains(&name) {
        return true;
    }
    if name
        .rsplit_once('.')
        .is_some_and(|(package, _)| EXPORTABLE_PACKAGES.contains(&package))
    {
        return true;
    }
    if !visited.insert(name.to_string()) {
        return false;
    }
    index.classes.get(name).is_some_and(|class| {
        reaches_component(name, &class.supertypes, &class.star_imports, index, visited)
    })
}
