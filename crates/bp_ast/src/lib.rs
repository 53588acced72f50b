//! Tree model for backport.
//!
//! Re-exports the standard SWC ECMAScript AST, which serves as the immutable,
//! strongly-variant tree every pass consumes and produces, and adds:
//! - [`factory`]: helpers for synthesizing location-free nodes
//! - [`CompileOptions`]: the pipeline configuration consumed by the passes

pub use swc_ecma_ast::*;

pub mod factory;
mod options;

pub use options::{CompileOptions, ModuleFormat, ModuleName};
