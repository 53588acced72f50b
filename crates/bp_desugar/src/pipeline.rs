//! Ordered pass list for one compilation unit.

use bp_ast::CompileOptions;
use bp_transform::{TransformError, Transformer};
use swc_ecma_ast::Module;

use crate::{ArrowFunctionTransformer, Es6ClassTransformer, ModuleTransformer};

/// A whole-module rewrite the pipeline can run.
pub trait Pass {
    fn name(&self) -> &'static str;

    fn run(&mut self, module: Module) -> Result<Module, TransformError>;
}

impl<T: Transformer> Pass for T {
    fn name(&self) -> &'static str {
        Transformer::name(self)
    }

    fn run(&mut self, module: Module) -> Result<Module, TransformError> {
        Transformer::run(self, module)
    }
}

/// Passes in the order they must run: class fields first (their
/// initializers may contain arrows), arrow functions next, module wrapping
/// last.
///
/// A pipeline holds per-unit state and compiles exactly one unit.
pub struct Pipeline {
    passes: Vec<Box<dyn Pass>>,
}

impl Pipeline {
    pub fn new(options: &CompileOptions, unit_name: Option<&str>) -> Self {
        let mut passes: Vec<Box<dyn Pass>> = Vec::new();
        if options.class_fields {
            passes.push(Box::new(Es6ClassTransformer::new()));
        }
        if options.arrow_functions {
            passes.push(Box::new(ArrowFunctionTransformer::new()));
        }
        if let Some(modules) = ModuleTransformer::new(options, unit_name) {
            passes.push(Box::new(modules));
        }
        Self { passes }
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    /// Run every pass, feeding each the previous one's output.
    #[tracing::instrument(name = "pipeline", skip_all, fields(passes = self.passes.len()))]
    pub fn run(mut self, mut module: Module) -> Result<Module, TransformError> {
        for pass in &mut self.passes {
            module = pass.run(module)?;
            tracing::debug!(pass = pass.name(), "finished");
        }
        Ok(module)
    }
}
