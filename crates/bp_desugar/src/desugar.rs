//! Top-level desugaring entry point.

use bp_ast::CompileOptions;
use bp_transform::TransformError;
use swc_ecma_ast::Module;

use crate::Pipeline;

/// Lower every construct the configured passes handle.
///
/// `unit_name` is the module's path without extension, used by formats
/// that name modules after their file.
pub fn desugar_module(
    module: Module,
    options: &CompileOptions,
    unit_name: Option<&str>,
) -> Result<Module, TransformError> {
    Pipeline::new(options, unit_name).run(module)
}
