//! Template contexts for factory files.
//!
//! Every line that varies in shape (separators, defaults, annotations) is
//! rendered in Rust; the template only lays the pieces out.

use serde::{Deserialize, Serialize};

/// Context for rendering one factory file.
///
/// # Examples
///
/// ```
/// use dslgen_codegen::factory::{FactoryBlock, FactoryContext};
///
/// let context = FactoryContext {
///     package: "com.example".to_string(),
///     imports: vec!["import org.slf4j.Logger".to_string()],
///     target: "Card".to_string(),
///     factory: Some(FactoryBlock {
///         name: "CardFactory".to_string(),
///         annotations: vec!["@Component".to_string()],
///         fields: vec!["private val logger: Logger".to_string()],
///         create_params: vec![],
///         arguments: "logger".to_string(),
///     }),
///     builder: None,
/// };
///
/// assert_eq!(context.target, "Card");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryContext {
    /// Package of the generated file (empty for the default package)
    pub package: String,
    /// Rendered `import` lines, sorted and deduplicated
    pub imports: Vec<String>,
    /// Simple name of the constructed class
    pub target: String,
    /// Factory type, absent under direct construction
    pub factory: Option<FactoryBlock>,
    /// Builder function, present only for exportable declarations
    pub builder: Option<BuilderBlock>,
}

/// The factory type and its `create` function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryBlock {
    /// Factory type name
    pub name: String,
    /// Container annotation lines
    pub annotations: Vec<String>,
    /// Constructor property lines for injected parameters, with separators
    pub fields: Vec<String>,
    /// Parameter lines of `create`, with separators and defaults
    pub create_params: Vec<String>,
    /// Argument list of the target constructor call, in declared order
    pub arguments: String,
}

/// The builder extension function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderBlock {
    /// Function name
    pub name: String,
    /// Parameter lines, ending with the configuration block
    pub params: Vec<String>,
    /// Body statements
    pub body: Vec<String>,
}
