use pretty_assertions::assert_eq;
use swc_ecma_ast::Module;

pub fn parse(src: &str) -> Module {
    bp_parser::parse_source(src, "test.js").unwrap().module
}

pub fn print(module: &Module) -> String {
    bp_parser::print_module(module).unwrap()
}

/// Compare a lowered module with hand-written source, ignoring layout.
pub fn assert_lowers_to(actual: Module, expected: &str) {
    assert_eq!(print(&actual), print(&parse(expected)));
}
