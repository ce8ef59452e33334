//! Property-binding synthesis.
//!
//! Every public `@ExposeSignal` property typed `BindableMutableSignal<T>` or
//! `BindableSignal<T>` receives an extension function on its owner that binds
//! a `MutableSignal<T>` or `Signal<T>` to it. All functions of one owner share
//! a single `<Owner>SignalExtensions.kt` file.

pub mod generator;
pub mod types;

pub use generator::BindingGenerator;
pub use types::{BindingContext, BindingFunction, BindingOutcome};
