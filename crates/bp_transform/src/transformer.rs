use swc_ecma_ast::Module;
use swc_ecma_visit::{Fold, FoldWith};

use crate::{ErrorSlot, TransformError};

/// A desugaring pass: a [`Fold`] that rebuilds every node it does not
/// override and rewrites the ones it does.
///
/// A pass must not fold a tree it has just synthesized with its own
/// `fold_*` methods for the same node type, or it may rewrite forever.
pub trait Transformer: Fold + Sized {
    /// Short pass name used in logs and errors.
    fn name(&self) -> &'static str;

    fn errors(&mut self) -> &mut ErrorSlot;

    /// Rewrite any tree: a whole module, a statement, a single expression.
    fn transform_any<T: FoldWith<Self>>(&mut self, tree: T) -> T {
        tree.fold_with(self)
    }

    /// Record `result`'s error, if any, and hand back its value.
    fn check<T, E: Into<TransformError>>(&mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.errors().record(error);
                None
            }
        }
    }

    /// Run the pass over a whole module.
    fn run(&mut self, module: Module) -> Result<Module, TransformError> {
        let name = self.name();
        tracing::debug!(pass = name, "running");
        let module = self.transform_any(module);
        match self.errors().take() {
            Some(error) => {
                tracing::debug!(pass = name, %error, "failed");
                Err(error)
            }
            None => Ok(module),
        }
    }
}
