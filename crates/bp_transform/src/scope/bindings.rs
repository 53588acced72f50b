//! Which declarations bind a given name.

use swc_ecma_ast::*;
use swc_ecma_visit::{Visit, VisitWith};

pub fn pat_binds(pat: &Pat, name: &str) -> bool {
    match pat {
        Pat::Ident(binding) => &*binding.id.sym == name,
        Pat::Array(array) => array.elems.iter().flatten().any(|elem| pat_binds(elem, name)),
        Pat::Rest(rest) => pat_binds(&rest.arg, name),
        Pat::Object(object) => object.props.iter().any(|prop| match prop {
            ObjectPatProp::KeyValue(kv) => pat_binds(&kv.value, name),
            ObjectPatProp::Assign(assign) => &*assign.key.id.sym == name,
            ObjectPatProp::Rest(rest) => pat_binds(&rest.arg, name),
        }),
        Pat::Assign(assign) => pat_binds(&assign.left, name),
        Pat::Invalid(_) | Pat::Expr(_) => false,
    }
}

/// Every identifier a pattern binds, in source order.
pub fn pat_idents(pat: &Pat) -> Vec<Ident> {
    let mut out = Vec::new();
    collect_pat_idents(pat, &mut out);
    out
}

fn collect_pat_idents(pat: &Pat, out: &mut Vec<Ident>) {
    match pat {
        Pat::Ident(binding) => out.push(binding.id.clone()),
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                collect_pat_idents(elem, out);
            }
        }
        Pat::Rest(rest) => collect_pat_idents(&rest.arg, out),
        Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    ObjectPatProp::KeyValue(kv) => collect_pat_idents(&kv.value, out),
                    ObjectPatProp::Assign(assign) => out.push(assign.key.id.clone()),
                    ObjectPatProp::Rest(rest) => collect_pat_idents(&rest.arg, out),
                }
            }
        }
        Pat::Assign(assign) => collect_pat_idents(&assign.left, out),
        Pat::Invalid(_) | Pat::Expr(_) => {}
    }
}

pub fn params_bind(params: &[Param], name: &str) -> bool {
    params.iter().any(|param| pat_binds(&param.pat, name))
}

fn decl_binds(decl: &VarDecl, name: &str) -> bool {
    decl.decls.iter().any(|d| pat_binds(&d.name, name))
}

/// Does a function body declare `name` with `var` or a function declaration,
/// anywhere outside nested functions?
pub fn var_scope_binds(stmts: &[Stmt], name: &str) -> bool {
    let mut finder = VarFinder { name, found: false };
    for stmt in stmts {
        stmt.visit_with(&mut finder);
    }
    finder.found
}

struct VarFinder<'a> {
    name: &'a str,
    found: bool,
}

impl Visit for VarFinder<'_> {
    fn visit_var_decl(&mut self, decl: &VarDecl) {
        if decl.kind == VarDeclKind::Var && decl_binds(decl, self.name) {
            self.found = true;
        }
    }

    fn visit_fn_decl(&mut self, decl: &FnDecl) {
        if &*decl.ident.sym == self.name {
            self.found = true;
        }
    }

    fn visit_function(&mut self, _: &Function) {}

    fn visit_arrow_expr(&mut self, _: &ArrowExpr) {}

    fn visit_class(&mut self, _: &Class) {}

    fn visit_expr(&mut self, _: &Expr) {}
}

/// Does this statement list declare `name` at its own level with `let`,
/// `const`, `class` or `function`?
pub fn lexically_binds(stmts: &[Stmt], name: &str) -> bool {
    stmts.iter().any(|stmt| match stmt {
        Stmt::Decl(Decl::Var(decl)) => decl.kind != VarDeclKind::Var && decl_binds(decl, name),
        Stmt::Decl(Decl::Class(class)) => &*class.ident.sym == name,
        Stmt::Decl(Decl::Fn(function)) => &*function.ident.sym == name,
        _ => false,
    })
}

/// A `let`/`const` loop head binding `name`.
pub fn lexical_head_binds(decl: &VarDecl, name: &str) -> bool {
    decl.kind != VarDeclKind::Var && decl_binds(decl, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(src: &str) -> Vec<Stmt> {
        bp_parser::parse_snippet_script(src).unwrap().body
    }

    #[test]
    fn patterns() {
        let stmts = body("var [a, {b, c: [d = 1], ...e}, ...f] = x;");
        let Stmt::Decl(Decl::Var(decl)) = &stmts[0] else {
            panic!("not a declaration");
        };
        let pat = &decl.decls[0].name;
        for name in ["a", "b", "d", "e", "f"] {
            assert!(pat_binds(pat, name), "{name}");
        }
        assert!(!pat_binds(pat, "c"));
        assert!(!pat_binds(pat, "x"));
        let names: Vec<_> = pat_idents(pat).iter().map(|i| i.sym.to_string()).collect();
        assert_eq!(names, ["a", "b", "d", "e", "f"]);
    }

    #[test]
    fn var_scope_crosses_blocks_but_not_functions() {
        assert!(var_scope_binds(&body("if (a) { for (var x of y) {} }"), "x"));
        assert!(var_scope_binds(&body("{ function x() {} }"), "x"));
        assert!(!var_scope_binds(&body("function f() { var x; }"), "x"));
        assert!(!var_scope_binds(&body("let x;"), "x"));
    }

    #[test]
    fn lexical_declarations_stay_at_their_level() {
        assert!(lexically_binds(&body("const x = 1;"), "x"));
        assert!(lexically_binds(&body("class x {}"), "x"));
        assert!(!lexically_binds(&body("var x;"), "x"));
        assert!(!lexically_binds(&body("{ let x; }"), "x"));
    }
}
