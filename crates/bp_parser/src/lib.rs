//! Text boundary for backport.
//!
//! Wraps the SWC parser and code generator: source text becomes a tree
//! before the pipeline runs, and the final tree becomes text again after.
//! Also parses the small snippets the template engine is written in.

pub mod emit;
pub mod parse;

pub use emit::{emit_module, emit_module_with_source_map, erase_spans, print_module, SpanEraser};
pub use parse::{parse_snippet_expr, parse_snippet_script, parse_source, ParseResult};
