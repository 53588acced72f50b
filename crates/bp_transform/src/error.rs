use bp_template::TemplateError;
use thiserror::Error;

/// A hard stop raised while running a pass.
///
/// Every variant is an internal consistency failure: the input tree is assumed
/// to be well formed, so none of these describe a mistake in user code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("{pass}: unexpected {node}")]
    UnexpectedNode { pass: &'static str, node: String },
}

impl TransformError {
    pub fn unexpected(pass: &'static str, node: impl Into<String>) -> Self {
        TransformError::UnexpectedNode {
            pass,
            node: node.into(),
        }
    }
}

/// Holds the first error a fold ran into.
///
/// `Fold` methods return trees, not results, so a pass records the failure
/// here and keeps rebuilding; [`Transformer::run`](crate::Transformer::run)
/// turns a filled slot into `Err` once the fold is over.
#[derive(Debug, Default)]
pub struct ErrorSlot(Option<TransformError>);

impl ErrorSlot {
    pub fn record(&mut self, error: impl Into<TransformError>) {
        if self.0.is_none() {
            self.0 = Some(error.into());
        }
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    pub fn take(&mut self) -> Option<TransformError> {
        self.0.take()
    }
}
