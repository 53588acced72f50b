//! Quasi-quote templates.
//!
//! A template is ordinary surface syntax with numbered placeholders `$0`,
//! `$1`, ... standing for caller-supplied trees:
//!
//! ```text
//! parse_statement("if (!$0 || !$0.__esModule) $0 = {default: $0};", vec![local.into()])
//! parse_statements("define([$0], $1);", vec![dep_paths.into(), factory.into()])
//! ```
//!
//! Expansion runs in two stages. The template text is parsed by the regular
//! parser (placeholders are plain identifiers, so no special grammar is
//! needed) and its spans are erased. The tree is then walked and every
//! placeholder leaf is replaced by its [`Subst`]. In list positions a sequence
//! value is spliced element by element. Anywhere else a sequence is a
//! [`TemplateError::PlaceholderArity`] error.

mod error;
mod expand;
mod subst;

pub use error::TemplateError;
pub use subst::Subst;

use swc_ecma_ast::{ClassMember, Decl, Expr, PropOrSpread, Stmt};
use swc_ecma_visit::VisitMutWith;

use crate::expand::Expander;

fn parse_expr_template(template: &str) -> Result<Box<Expr>, TemplateError> {
    let mut expr = bp_parser::parse_snippet_expr(template).map_err(|e| TemplateError::syntax(template, e))?;
    bp_parser::erase_spans(&mut *expr);
    Ok(expr)
}

fn parse_stmts_template(template: &str) -> Result<Vec<Stmt>, TemplateError> {
    let mut script = bp_parser::parse_snippet_script(template).map_err(|e| TemplateError::syntax(template, e))?;
    bp_parser::erase_spans(&mut script);
    Ok(script.body)
}

/// Build an expression.
pub fn parse_expression(template: &str, substitutions: Vec<Subst>) -> Result<Box<Expr>, TemplateError> {
    let mut expr = parse_expr_template(template)?;
    let mut expander = Expander::new(template, substitutions);
    expr.visit_mut_with(&mut expander);
    expander.finish()?;
    Ok(expr)
}

/// Build a statement list.
pub fn parse_statements(template: &str, substitutions: Vec<Subst>) -> Result<Vec<Stmt>, TemplateError> {
    let mut stmts = parse_stmts_template(template)?;
    let mut expander = Expander::new(template, substitutions);
    stmts.visit_mut_with(&mut expander);
    expander.finish()?;
    Ok(stmts)
}

/// Build exactly one statement.
pub fn parse_statement(template: &str, substitutions: Vec<Subst>) -> Result<Stmt, TemplateError> {
    let mut stmts = parse_statements(template, substitutions)?;
    if stmts.len() != 1 {
        return Err(TemplateError::syntax(
            template,
            format_args!("expected one statement, found {}", stmts.len()),
        ));
    }
    Ok(stmts.remove(0))
}

/// Build one object-literal property, e.g. `get $0() { return $1; }`.
pub fn parse_property_definition(template: &str, substitutions: Vec<Subst>) -> Result<PropOrSpread, TemplateError> {
    let wrapped = format!("({{{template}}})");
    let mut expr = parse_expr_template(&wrapped).map_err(|_| {
        TemplateError::syntax(template, "not a property definition")
    })?;
    let mut expander = Expander::new(template, substitutions);
    expr.visit_mut_with(&mut expander);
    expander.finish()?;

    let props = match *expr {
        Expr::Paren(paren) => match *paren.expr {
            Expr::Object(object) => object.props,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    let count = props.len();
    match <[PropOrSpread; 1]>::try_from(props) {
        Ok([prop]) => Ok(prop),
        Err(_) => Err(TemplateError::syntax(
            template,
            format_args!("expected one property, found {count}"),
        )),
    }
}

/// Build one class member, e.g. `constructor() {}`.
///
/// The member is parsed inside a derived class, so `super(...)` is allowed.
pub fn parse_class_member(template: &str, substitutions: Vec<Subst>) -> Result<ClassMember, TemplateError> {
    let wrapped = format!("class __template__ extends __base__ {{{template}}}");
    let mut stmts = parse_stmts_template(&wrapped).map_err(|_| {
        TemplateError::syntax(template, "not a class member")
    })?;
    let mut expander = Expander::new(template, substitutions);
    stmts.visit_mut_with(&mut expander);
    expander.finish()?;

    let members = match stmts.pop() {
        Some(Stmt::Decl(Decl::Class(decl))) => decl.class.body,
        _ => Vec::new(),
    };
    let count = members.len();
    match <[ClassMember; 1]>::try_from(members) {
        Ok([member]) => Ok(member),
        Err(_) => Err(TemplateError::syntax(
            template,
            format_args!("expected one class member, found {count}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp_ast::factory;
    use pretty_assertions::assert_eq;
    use swc_ecma_ast::*;

    fn print_stmts(stmts: Vec<Stmt>) -> String {
        let module = Module {
            span: Default::default(),
            body: stmts.into_iter().map(ModuleItem::Stmt).collect(),
            shebang: None,
        };
        bp_parser::print_module(&module).unwrap()
    }

    fn print_expr(expr: Box<Expr>) -> String {
        print_stmts(vec![factory::expr_stmt(expr)])
    }

    fn normalize(src: &str) -> String {
        bp_parser::print_module(&bp_parser::parse_source(src, "expected.js").unwrap().module).unwrap()
    }

    #[test]
    fn scalar_expression_substitution() {
        let expr = parse_expression("$0 + $1", vec![factory::ident_expr("a").into(), factory::str_lit("b").into()]).unwrap();
        assert_eq!(print_expr(expr), normalize("a + \"b\";"));
    }

    #[test]
    fn placeholder_may_repeat() {
        let stmt = parse_statement(
            "if (!$0 || !$0.__esModule) $0 = {default: $0};",
            vec![factory::ident("dep").into()],
        )
        .unwrap();
        assert_eq!(
            print_stmts(vec![stmt]),
            normalize("if (!dep || !dep.__esModule) dep = {default: dep};")
        );
    }

    #[test]
    fn sequences_splice_into_argument_and_array_lists() {
        let deps: Vec<Box<Expr>> = vec![factory::str_expr("./a"), factory::str_expr("./b")];
        let stmts = parse_statements(
            "define([$0], f($1, x));",
            vec![deps.clone().into(), deps.into()],
        )
        .unwrap();
        assert_eq!(
            print_stmts(stmts),
            normalize("define([\"./a\", \"./b\"], f(\"./a\", \"./b\", x));")
        );
    }

    #[test]
    fn statements_splice_into_bodies() {
        let body = vec![
            factory::expr_stmt(factory::ident_expr("a")),
            factory::expr_stmt(factory::ident_expr("b")),
        ];
        let expr = parse_expression("function () { $0; return c; }", vec![body.into()]).unwrap();
        assert_eq!(print_expr(factory::paren(expr)), normalize("(function () { a; b; return c; });"));
    }

    #[test]
    fn parameters_splice_into_function_heads() {
        let params = vec![
            factory::param(Pat::Ident(factory::ident("x").into())),
            factory::param(Pat::Ident(factory::ident("y").into())),
        ];
        let expr = parse_expression("function ($0) { return x + y; }", vec![params.into()]).unwrap();
        assert_eq!(print_expr(factory::paren(expr)), normalize("(function (x, y) { return x + y; });"));
    }

    #[test]
    fn sequence_in_scalar_slot_is_an_arity_error() {
        let exprs: Vec<Box<Expr>> = vec![factory::ident_expr("a")];
        let err = parse_expression("$0 + 1", vec![exprs.into()]).unwrap_err();
        assert!(matches!(err, TemplateError::PlaceholderArity { index: 0, .. }), "{err}");
    }

    #[test]
    fn statements_fill_single_statement_slots() {
        let stmt = parse_statement(
            "if (c) $0; else while (x) $1",
            vec![
                factory::return_stmt(factory::ident_expr("a")).into(),
                factory::expr_stmt(factory::ident_expr("b")).into(),
            ],
        )
        .unwrap();
        assert_eq!(print_stmts(vec![stmt]), normalize("if (c) return a; else while (x) b;"));
    }

    #[test]
    fn statement_list_in_single_statement_slot_is_an_arity_error() {
        let body = vec![factory::expr_stmt(factory::ident_expr("a"))];
        let err = parse_statement("if (c) $0", vec![body.into()]).unwrap_err();
        assert!(
            matches!(err, TemplateError::PlaceholderArity { index: 0, found: "a statement list", .. }),
            "{err}"
        );
    }

    #[test]
    fn lists_only_splice_sequences_of_their_element_kind() {
        let stmts = vec![factory::expr_stmt(factory::ident_expr("a"))];
        let err = parse_expression("f($0)", vec![stmts.into()]).unwrap_err();
        assert!(
            matches!(err, TemplateError::PlaceholderArity { index: 0, found: "a statement list", .. }),
            "{err}"
        );

        let params = vec![factory::param(Pat::Ident(factory::ident("x").into()))];
        let err = parse_expression("[$0]", vec![params.into()]).unwrap_err();
        assert!(
            matches!(err, TemplateError::PlaceholderArity { index: 0, found: "a parameter list", .. }),
            "{err}"
        );

        let exprs: Vec<Box<Expr>> = vec![factory::ident_expr("a")];
        let err = parse_expression("function ($0) {}", vec![exprs.into()]).unwrap_err();
        assert!(matches!(err, TemplateError::PlaceholderArity { index: 0, .. }), "{err}");
    }

    #[test]
    fn statement_in_expression_slot_is_a_kind_error() {
        let stmt = factory::return_stmt(factory::ident_expr("a"));
        let err = parse_expression("f($0)", vec![stmt.into()]).unwrap_err();
        assert!(matches!(err, TemplateError::PlaceholderKind { index: 0, .. }), "{err}");
    }

    #[test]
    fn malformed_template_is_a_syntax_error() {
        let err = parse_statement("if (", Vec::new()).unwrap_err();
        assert!(matches!(err, TemplateError::Syntax { .. }));
    }

    #[test]
    fn missing_and_unused_substitutions_fail() {
        let err = parse_expression("$1", vec![factory::ident("a").into()]).unwrap_err();
        assert!(matches!(err, TemplateError::MissingSubstitution { index: 1, .. }));

        let err = parse_expression("a", vec![factory::ident("b").into()]).unwrap_err();
        assert!(matches!(err, TemplateError::UnusedSubstitution { index: 0, .. }));
    }

    #[test]
    fn substituted_user_trees_are_not_rescanned() {
        let user = factory::ident_expr("$1");
        let expr = parse_expression("[$0]", vec![user.into()]).unwrap();
        assert_eq!(print_expr(expr), normalize("[$1];"));
    }

    #[test]
    fn template_nodes_have_no_location() {
        let expr = parse_expression("a + b", Vec::new()).unwrap();
        match *expr {
            Expr::Bin(bin) => assert!(bin.span.is_dummy()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn identifiers_fill_binding_and_property_slots() {
        let stmt = parse_statement(
            "let $0 = $1.$2;",
            vec![factory::ident("x").into(), factory::ident_expr("obj").into(), factory::ident("y").into()],
        )
        .unwrap();
        assert_eq!(print_stmts(vec![stmt]), normalize("let x = obj.y;"));
    }

    #[test]
    fn property_definitions() {
        let prop = parse_property_definition(
            "get $0() { return $1; }",
            vec![factory::ident("answer").into(), factory::ident_expr("value").into()],
        )
        .unwrap();
        let object = Box::new(Expr::Object(ObjectLit {
            span: Default::default(),
            props: vec![prop],
        }));
        assert_eq!(
            print_stmts(vec![factory::var_decl(VarDeclKind::Var, vec![(factory::ident("o"), Some(object))])]),
            normalize("var o = { get answer() { return value; } };")
        );
    }

    #[test]
    fn class_members_allow_super_calls() {
        let member = parse_class_member("constructor(...args) { super(...args); }", Vec::new()).unwrap();
        match member {
            ClassMember::Constructor(ctor) => {
                assert_eq!(ctor.params.len(), 1);
                assert_eq!(ctor.body.map(|b| b.stmts.len()), Some(1));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
