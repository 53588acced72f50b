//! Scope analysis over `this`, `arguments` and ordinary names.

pub mod bindings;
mod finder;
mod rename;

pub use finder::{find_this_or_arguments, scope_contains_this, FindThisOrArguments, ThisOrArguments};
pub use rename::{AlphaRenamer, BindingRenamer};
