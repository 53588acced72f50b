//! Desugaring passes that lower modern JavaScript to an older dialect.
//!
//! Transforms:
//! - class fields   → constructor assignments and `Object.defineProperty`
//! - `(a) => this`  → `($__0 = this, function (a) { return $__0; })`
//! - `import`/`export` → an AMD, CommonJS, System or global-script envelope

pub mod arrow;
pub mod class;
pub mod desugar;
pub mod module;
pub mod pipeline;

#[cfg(test)]
mod test_util;

pub use arrow::ArrowFunctionTransformer;
pub use class::Es6ClassTransformer;
pub use desugar::desugar_module;
pub use module::ModuleTransformer;
pub use pipeline::{Pass, Pipeline};
