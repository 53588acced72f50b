use thiserror::Error;

/// An authoring error in a template or its substitutions.
///
/// These are bugs in the pass that wrote the template, never diagnostics
/// about user code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template `{template}` does not parse: {message}")]
    Syntax { template: String, message: String },

    #[error("placeholder ${index} in `{template}` holds a single node but was given {found}")]
    PlaceholderArity {
        template: String,
        index: usize,
        found: &'static str,
    },

    #[error("placeholder ${index} in `{template}` cannot hold {found} in {expected} position")]
    PlaceholderKind {
        template: String,
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("placeholder ${index} in `{template}` has no substitution")]
    MissingSubstitution { template: String, index: usize },

    #[error("substitution {index} is never used by `{template}`")]
    UnusedSubstitution { template: String, index: usize },
}

impl TemplateError {
    pub(crate) fn syntax(template: &str, message: impl std::fmt::Display) -> Self {
        TemplateError::Syntax {
            template: template.to_string(),
            message: message.to_string(),
        }
    }
}
