//! Declaration model consumed by the synthesizers.
//!
//! A scan (or a structured manifest) produces [`Declaration`] values for
//! marked classes and [`PropertyBinding`] values for marked properties.
//! Both are immutable once built; the pipeline derives new values instead of
//! mutating them.
//!
//! # Examples
//!
//! ```
//! use dslgen_core::{Declaration, Parameter, Role, TypeRef};
//!
//! let decl = Declaration::new("CustomButton", "com.example")
//!     .with_parameter(Parameter::new("logger", TypeRef::new("org.slf4j.Logger"), Role::Injected))
//!     .with_parameter(Parameter::new("label", TypeRef::new("kotlin.String"), Role::Exposed));
//!
//! assert_eq!(decl.qualified_name(), "com.example.CustomButton");
//! assert_eq!(decl.factory_name(), "CustomButtonFactory");
//! assert_eq!(decl.builder_name(), "customButton");
//! assert_eq!(decl.injected().count(), 1);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Reference to a type, as written in a constructor parameter, supertype
/// list or property declaration.
///
/// `name` is fully qualified whenever the scanner could resolve it. Types
/// outside the constrained grammar (function types, projections) are kept
/// verbatim as *opaque* references; their `arguments` then list the
/// component types they mention, which only feed import collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    /// Qualified (or verbatim, when opaque) type name
    pub name: String,
    /// Generic type arguments in declaration order
    #[serde(default)]
    pub arguments: Vec<TypeRef>,
    /// Whether the type is marked nullable (`?`)
    #[serde(default)]
    pub nullable: bool,
    /// Whether `name` holds verbatim source text
    #[serde(default)]
    pub opaque: bool,
}

impl TypeRef {
    /// Creates a non-nullable type reference without type arguments.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            nullable: false,
            opaque: false,
        }
    }

    /// Creates an opaque reference holding verbatim source text.
    #[must_use]
    pub fn opaque(text: impl Into<String>, mentioned: Vec<Self>) -> Self {
        Self {
            name: text.into(),
            arguments: mentioned,
            nullable: false,
            opaque: true,
        }
    }

    /// Returns this reference with the given type arguments.
    #[must_use]
    pub fn with_arguments(mut self, arguments: Vec<Self>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Returns this reference with the nullable flag set.
    #[must_use]
    pub fn into_nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Returns the last segment of the qualified name.
    ///
    /// # Examples
    ///
    /// ```
    /// use dslgen_core::TypeRef;
    ///
    /// assert_eq!(TypeRef::new("org.slf4j.Logger").simple_name(), "Logger");
    /// assert_eq!(TypeRef::new("Card").simple_name(), "Card");
    /// ```
    #[must_use]
    pub fn simple_name(&self) -> &str {
        if self.opaque {
            return &self.name;
        }
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Returns the package part of a qualified name, if any.
    #[must_use]
    pub fn package(&self) -> Option<&str> {
        if self.opaque {
            return None;
        }
        self.name.rsplit_once('.').map(|(package, _)| package)
    }

    /// Returns `true` for types that never need an import.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        self.name.starts_with("kotlin.") || self.name.starts_with("java.lang.")
    }

    /// Renders the type using simple names, as it appears in generated code.
    ///
    /// # Examples
    ///
    /// ```
    /// use dslgen_core::TypeRef;
    ///
    /// let ty = TypeRef::new("kotlin.collections.Map")
    ///     .with_arguments(vec![
    ///         TypeRef::new("kotlin.String"),
    ///         TypeRef::new("com.example.Item").into_nullable(),
    ///     ]);
    /// assert_eq!(ty.render(), "Map<String, Item?>");
    /// ```
    #[must_use]
    pub fn render(&self) -> String {
        if self.opaque {
            return self.name.clone();
        }
        let mut out = self.simple_name().to_string();
        if !self.arguments.is_empty() {
            let args: Vec<String> = self.arguments.iter().map(Self::render).collect();
            out.push('<');
            out.push_str(&args.join(", "));
            out.push('>');
        }
        if self.nullable {
            out.push('?');
        }
        out
    }

    /// Adds every qualified, non-builtin name referenced by this type to `imports`.
    pub fn collect_imports(&self, imports: &mut BTreeSet<String>) {
        if !self.opaque && self.name.contains('.') && !self.is_builtin() {
            imports.insert(self.name.clone());
        }
        for argument in &self.arguments {
            argument.collect_imports(imports);
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Role of a constructor parameter in the generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Supplied by the dependency-injection container through the factory.
    Injected,
    /// Surfaced as an argument of `create` and of the builder function.
    Exposed,
}

impl Role {
    /// Decides a parameter's role from its markers.
    ///
    /// An explicit marker always wins; unmarked parameters follow the
    /// declaration's convention.
    ///
    /// # Examples
    ///
    /// ```
    /// use dslgen_core::{MarkerConvention, ParamMarkers, Role};
    ///
    /// let unmarked = ParamMarkers::default();
    /// assert_eq!(Role::classify(unmarked, MarkerConvention::MarkToInject), Role::Exposed);
    /// assert_eq!(Role::classify(unmarked, MarkerConvention::MarkToExpose), Role::Injected);
    ///
    /// let inject = ParamMarkers { inject: true, expose: false };
    /// assert_eq!(Role::classify(inject, MarkerConvention::MarkToExpose), Role::Injected);
    /// ```
    #[must_use]
    pub const fn classify(markers: ParamMarkers, convention: MarkerConvention) -> Self {
        if markers.inject {
            return Self::Injected;
        }
        if markers.expose {
            return Self::Exposed;
        }
        match convention {
            MarkerConvention::MarkToInject => Self::Exposed,
            MarkerConvention::MarkToExpose => Self::Injected,
        }
    }

    /// Returns the role name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Injected => "injected",
            Self::Exposed => "exposed",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter-level markers found on a constructor parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamMarkers {
    /// Carries the injection marker (`@GenDslInject`)
    #[serde(default)]
    pub inject: bool,
    /// Carries the exposure marker (`@GenDslParam`)
    #[serde(default)]
    pub expose: bool,
}

/// Which parameter marker a declaration uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerConvention {
    /// Parameters are exposed unless marked with the injection marker.
    #[default]
    MarkToInject,
    /// Parameters are injected unless marked with the exposure marker.
    MarkToExpose,
}

impl MarkerConvention {
    /// Infers the convention from the markers present on a declaration.
    ///
    /// Any injection marker selects [`MarkerConvention::MarkToInject`]; any
    /// exposure marker (without injection markers) selects
    /// [`MarkerConvention::MarkToExpose`]; unmarked declarations use `fallback`.
    #[must_use]
    pub fn infer(markers: &[ParamMarkers], fallback: Self) -> Self {
        if markers.iter().any(|m| m.inject) {
            Self::MarkToInject
        } else if markers.iter().any(|m| m.expose) {
            Self::MarkToExpose
        } else {
            fallback
        }
    }
}

impl std::str::FromStr for MarkerConvention {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mark-to-inject" | "inject" => Ok(Self::MarkToInject),
            "mark-to-expose" | "expose" => Ok(Self::MarkToExpose),
            _ => Err(crate::Error::InvalidArgument(format!(
                "invalid marker convention: '{s}' (expected: mark-to-inject or mark-to-expose)"
            ))),
        }
    }
}

/// A constructor parameter of a marked declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Declared type
    pub type_ref: TypeRef,
    /// Injected or exposed
    pub role: Role,
    /// Whether the declaration gives this parameter a default value
    #[serde(default)]
    pub has_default: bool,
    /// Recovered default-value expression
    #[serde(default)]
    pub default_expression: Option<String>,
}

impl Parameter {
    /// Creates a parameter without a default value.
    #[must_use]
    pub fn new(name: impl Into<String>, type_ref: TypeRef, role: Role) -> Self {
        Self {
            name: name.into(),
            type_ref,
            role,
            has_default: false,
            default_expression: None,
        }
    }

    /// Returns this parameter with a default-value expression.
    #[must_use]
    pub fn with_default(mut self, expression: impl Into<String>) -> Self {
        self.has_default = true;
        self.default_expression = Some(expression.into());
        self
    }

    /// Returns `true` if the parameter is supplied by the container.
    #[inline]
    #[must_use]
    pub fn is_injected(&self) -> bool {
        self.role == Role::Injected
    }
}

/// Position of a declaration or property in its source unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Source file path as given to the scanner
    pub file: String,
    /// 1-based line number (0 when unknown)
    pub line: usize,
}

impl SourceLocation {
    /// Creates a location.
    #[must_use]
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A marked class with the structure needed for generation.
///
/// Identity is `(package, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Simple class name
    pub name: String,
    /// Package (empty for the default package)
    #[serde(default)]
    pub package: String,
    /// Primary constructor parameters in declared order
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Direct supertypes in declared order
    #[serde(default)]
    pub supertypes: Vec<TypeRef>,
    /// Packages the declaring unit imports with `*`
    #[serde(default)]
    pub star_imports: Vec<String>,
    /// Where the declaration was found
    #[serde(default)]
    pub location: SourceLocation,
}

impl Declaration {
    /// Creates a declaration with no parameters or supertypes.
    #[must_use]
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            parameters: Vec::new(),
            supertypes: Vec::new(),
            star_imports: Vec::new(),
            location: SourceLocation::default(),
        }
    }

    /// Returns this declaration with one more constructor parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Returns this declaration with one more direct supertype.
    #[must_use]
    pub fn with_supertype(mut self, supertype: TypeRef) -> Self {
        self.supertypes.push(supertype);
        self
    }

    /// Returns this declaration with one more star-imported package.
    #[must_use]
    pub fn with_star_import(mut self, package: impl Into<String>) -> Self {
        self.star_imports.push(package.into());
        self
    }

    /// Returns this declaration with the given source location.
    #[must_use]
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    /// Returns `package.Name`, or `Name` in the default package.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    /// Name of the generated factory type.
    #[must_use]
    pub fn factory_name(&self) -> String {
        format!("{}Factory", self.name)
    }

    /// Name of the generated builder function (first letter lowercased).
    #[must_use]
    pub fn builder_name(&self) -> String {
        let mut chars = self.name.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_lowercase().collect::<String>() + chars.as_str()
        })
    }

    /// Injected parameters in declared order.
    pub fn injected(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| p.role == Role::Injected)
    }

    /// Exposed parameters in declared order.
    pub fn exposed(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| p.role == Role::Exposed)
    }

    /// Returns a copy whose default expressions come from `recovered`.
    ///
    /// A recovered expression also marks the parameter as defaulted. A
    /// parameter flagged as defaulted without a recovered expression keeps
    /// no expression and is treated as required by the synthesizers.
    #[must_use]
    pub fn with_recovered_defaults(&self, recovered: &BTreeMap<String, String>) -> Self {
        let mut derived = self.clone();
        for parameter in &mut derived.parameters {
            parameter.default_expression = recovered.get(&parameter.name).cloned();
            parameter.has_default |= parameter.default_expression.is_some();
        }
        derived
    }
}

/// Declared visibility of a property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    /// No modifier or `public`
    #[default]
    Public,
    /// `internal`
    Internal,
    /// `protected`
    Protected,
    /// `private`
    Private,
}

impl Visibility {
    /// Maps a visibility keyword to its value.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "public" => Some(Self::Public),
            "internal" => Some(Self::Internal),
            "protected" => Some(Self::Protected),
            "private" => Some(Self::Private),
            _ => None,
        }
    }

    /// Returns the keyword for this visibility.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Internal => "internal",
            Self::Protected => "protected",
            Self::Private => "private",
        }
    }

    /// Returns `true` only for unrestricted visibility.
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two property wrapper types eligible for binding functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WrapperKind {
    /// `BindableMutableSignal<T>`, bound from a `MutableSignal<T>`
    Mutable,
    /// `BindableSignal<T>`, bound from a `Signal<T>`
    ReadOnly,
}

impl WrapperKind {
    /// Qualified name of the bindable wrapper type.
    #[must_use]
    pub const fn bindable_name(self) -> &'static str {
        match self {
            Self::Mutable => "com.github.fenrur.signal.BindableMutableSignal",
            Self::ReadOnly => "com.github.fenrur.signal.BindableSignal",
        }
    }

    /// Qualified name of the counterpart (non-bindable) wrapper type.
    #[must_use]
    pub const fn counterpart_name(self) -> &'static str {
        match self {
            Self::Mutable => "com.github.fenrur.signal.MutableSignal",
            Self::ReadOnly => "com.github.fenrur.signal.Signal",
        }
    }

    /// Recognizes the wrapper kind of a property type.
    ///
    /// Qualified names must match exactly; an unqualified name (one the
    /// scanner could not resolve through imports) matches by simple name.
    ///
    /// # Examples
    ///
    /// ```
    /// use dslgen_core::{TypeRef, WrapperKind};
    ///
    /// let ty = TypeRef::new("com.github.fenrur.signal.BindableSignal");
    /// assert_eq!(WrapperKind::of(&ty), Some(WrapperKind::ReadOnly));
    /// assert_eq!(WrapperKind::of(&TypeRef::new("kotlin.String")), None);
    /// ```
    #[must_use]
    pub fn of(type_ref: &TypeRef) -> Option<Self> {
        if type_ref.opaque {
            return None;
        }
        [Self::Mutable, Self::ReadOnly].into_iter().find(|kind| {
            let bindable = kind.bindable_name();
            if type_ref.name.contains('.') {
                type_ref.name == bindable
            } else {
                bindable.rsplit('.').next() == Some(type_ref.name.as_str())
            }
        })
    }
}

/// A marked property that may receive a binding function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyBinding {
    /// Simple name of the declaring type
    pub owner: String,
    /// Package of the declaring type
    #[serde(default)]
    pub package: String,
    /// Property name
    pub name: String,
    /// Declared property type
    pub type_ref: TypeRef,
    /// Declared visibility
    #[serde(default)]
    pub visibility: Visibility,
    /// Packages the declaring unit imports with `*`
    #[serde(default)]
    pub star_imports: Vec<String>,
    /// Where the property was found
    #[serde(default)]
    pub location: SourceLocation,
}

impl PropertyBinding {
    /// Wrapper kind of the declared type, if recognized.
    #[must_use]
    pub fn wrapper_kind(&self) -> Option<WrapperKind> {
        WrapperKind::of(&self.type_ref)
    }

    /// The single element type of the wrapper, if exactly one is declared.
    #[must_use]
    pub fn element_type(&self) -> Option<&TypeRef> {
        match self.type_ref.arguments.as_slice() {
            [element] => Some(element),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string() -> TypeRef {
        TypeRef::new("kotlin.String")
    }

    #[test]
    fn test_render_nested_generics() {
        let ty = TypeRef::new("kotlin.collections.Map").with_arguments(vec![
            string(),
            TypeRef::new("kotlin.collections.List").with_arguments(vec![TypeRef::new("kotlin.Int")]),
        ]);
        assert_eq!(ty.render(), "Map<String, List<Int>>");
    }

    #[test]
    fn test_render_nullable_generic() {
        let ty = TypeRef::new("kotlin.collections.List")
            .with_arguments(vec![string()])
            .into_nullable();
        assert_eq!(ty.render(), "List<String>?");
    }

    #[test]
    fn test_opaque_renders_verbatim() {
        let ty = TypeRef::opaque("(Item) -> Unit", vec![TypeRef::new("com.example.Item")]);
        assert_eq!(ty.render(), "(Item) -> Unit");
        assert_eq!(ty.package(), None);
    }

    #[test]
    fn test_collect_imports_skips_builtins() {
        let ty = TypeRef::new("kotlin.collections.List")
            .with_arguments(vec![TypeRef::new("com.example.Item")]);
        let mut imports = BTreeSet::new();
        ty.collect_imports(&mut imports);
        assert_eq!(imports.into_iter().collect::<Vec<_>>(), vec!["com.example.Item"]);
    }

    #[test]
    fn test_collect_imports_from_opaque_mentions() {
        let ty = TypeRef::opaque("(Item) -> Unit", vec![TypeRef::new("com.example.Item")]);
        let mut imports = BTreeSet::new();
        ty.collect_imports(&mut imports);
        assert!(imports.contains("com.example.Item"));
        assert_eq!(imports.len(), 1);
    }

    #[test]
    fn test_collect_imports_skips_unqualified() {
        let mut imports = BTreeSet::new();
        TypeRef::new("LocalType").collect_imports(&mut imports);
        assert!(imports.is_empty());
    }

    #[test]
    fn test_role_classify_explicit_marker_wins() {
        let expose = ParamMarkers {
            inject: false,
            expose: true,
        };
        assert_eq!(
            Role::classify(expose, MarkerConvention::MarkToInject),
            Role::Exposed
        );
        assert_eq!(
            Role::classify(expose, MarkerConvention::MarkToExpose),
            Role::Exposed
        );
    }

    #[test]
    fn test_convention_inference() {
        let inject = ParamMarkers {
            inject: true,
            expose: false,
        };
        let expose = ParamMarkers {
            inject: false,
            expose: true,
        };
        let none = ParamMarkers::default();

        assert_eq!(
            MarkerConvention::infer(&[none, inject], MarkerConvention::MarkToExpose),
            MarkerConvention::MarkToInject
        );
        assert_eq!(
            MarkerConvention::infer(&[expose, none], MarkerConvention::MarkToInject),
            MarkerConvention::MarkToExpose
        );
        assert_eq!(
            MarkerConvention::infer(&[none], MarkerConvention::MarkToExpose),
            MarkerConvention::MarkToExpose
        );
    }

    #[test]
    fn test_marker_convention_from_str() {
        assert_eq!(
            "Mark-To-Expose".parse::<MarkerConvention>().unwrap(),
            MarkerConvention::MarkToExpose
        );
        assert!("sideways".parse::<MarkerConvention>().is_err());
    }

    #[test]
    fn test_builder_name_lowercases_first_char() {
        assert_eq!(Declaration::new("InfoCard", "x").builder_name(), "infoCard");
        assert_eq!(Declaration::new("A", "x").builder_name(), "a");
    }

    #[test]
    fn test_qualified_name_default_package() {
        assert_eq!(Declaration::new("Card", "").qualified_name(), "Card");
    }

    #[test]
    fn test_with_recovered_defaults() {
        let mut flagged = Parameter::new("enabled", TypeRef::new("kotlin.Boolean"), Role::Exposed);
        flagged.has_default = true;
        let decl = Declaration::new("Card", "com.example")
            .with_parameter(Parameter::new("title", string(), Role::Exposed))
            .with_parameter(flagged)
            .with_parameter(Parameter::new("size", TypeRef::new("kotlin.Int"), Role::Exposed));

        let mut recovered = BTreeMap::new();
        recovered.insert("size".to_string(), "3".to_string());
        let derived = decl.with_recovered_defaults(&recovered);

        assert_eq!(derived.parameters[0].default_expression, None);
        assert!(!derived.parameters[0].has_default);
        assert!(derived.parameters[1].has_default);
        assert_eq!(derived.parameters[1].default_expression, None);
        assert_eq!(derived.parameters[2].default_expression.as_deref(), Some("3"));
        assert!(derived.parameters[2].has_default);
        // The source declaration is untouched.
        assert_eq!(decl.parameters[2].default_expression, None);
    }

    #[test]
    fn test_wrapper_kind_simple_name_fallback() {
        assert_eq!(
            WrapperKind::of(&TypeRef::new("BindableMutableSignal")),
            Some(WrapperKind::Mutable)
        );
        assert_eq!(
            WrapperKind::of(&TypeRef::new("com.other.BindableSignal")),
            None
        );
    }

    #[test]
    fn test_element_type_requires_exactly_one_argument() {
        let mut binding = PropertyBinding {
            owner: "Card".to_string(),
            package: "com.example".to_string(),
            name: "title".to_string(),
            type_ref: TypeRef::new(WrapperKind::Mutable.bindable_name()),
            visibility: Visibility::Public,
            star_imports: Vec::new(),
            location: SourceLocation::default(),
        };
        assert!(binding.element_type().is_none());

        binding.type_ref = binding.type_ref.clone().with_arguments(vec![string()]);
        assert_eq!(binding.element_type(), Some(&string()));
    }

    #[test]
    fn test_declaration_fields_default_when_absent() {
        let decl: Declaration = serde_json::from_str(r#"{"name": "Card"}"#).unwrap();
        assert_eq!(decl.qualified_name(), "Card");
        assert!(decl.star_imports.is_empty());
        assert!(decl.parameters.is_empty());

        let binding: PropertyBinding = serde_json::from_str(
            r#"{"owner": "Card", "name": "title", "type_ref": {"name": "BindableSignal"},
                "star_imports": ["com.github.fenrur.signal"]}"#,
        )
        .unwrap();
        assert_eq!(binding.visibility, Visibility::Public);
        assert_eq!(binding.star_imports, vec!["com.github.fenrur.signal"]);
        assert_eq!(binding.wrapper_kind(), Some(WrapperKind::ReadOnly));
    }

    #[test]
    fn test_visibility_keywords() {
        assert_eq!(Visibility::from_keyword("internal"), Some(Visibility::Internal));
        assert_eq!(Visibility::from_keyword("open"), None);
        assert!(Visibility::Public.is_public());
        assert!(!Visibility::Protected.is_public());
    }
}
