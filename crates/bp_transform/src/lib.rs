//! Shared machinery for backport's desugaring passes.
//!
//! A pass is a [`Transformer`]: an `swc_ecma_visit::Fold` that overrides only
//! the node types it rewrites. Passes that need fresh bindings also implement
//! [`TempVarTransformer`] and get hygienic temporaries scoped to the function
//! body being rebuilt. The [`scope`] helpers answer the questions those
//! rewrites depend on: does this subtree use the enclosing `this`, and how do
//! I rename a name without touching its shadowed uses.

mod error;
pub mod scope;
mod temp_var;
mod transformer;

pub use error::{ErrorSlot, TransformError};
pub use temp_var::{temp_var_decl, NameCollector, TempVarManager, TempVarTransformer};
pub use transformer::Transformer;
