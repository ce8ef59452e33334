//! Factory and builder synthesis.
//!
//! # File Structure
//!
//! For a declaration `com.example.CustomButton` the generated file is:
//!
//! ```text
//! com/example/
//! └── CustomButtonFactory.kt    # factory type + builder function
//! ```
//!
//! Under [`ZeroInjectedPolicy::DirectConstruction`](dslgen_core::ZeroInjectedPolicy)
//! a declaration without injected parameters gets `CustomButtonDsl.kt`
//! holding only the builder.

pub mod generator;
pub mod types;

pub use generator::{FactoryGenerator, DSL_MARKER_IMPORT, HAS_COMPONENTS_IMPORT};
pub use types::{BuilderBlock, FactoryBlock, FactoryContext};
