//! Construction helpers for synthesized trees.
//!
//! Every node built here carries `DUMMY_SP`: synthesized code has no source
//! location of its own.

use swc_common::{SyntaxContext, DUMMY_SP};
use swc_ecma_ast::*;

pub fn ident(name: &str) -> Ident {
    Ident::new_no_ctxt(name.into(), DUMMY_SP)
}

pub fn ident_expr(name: &str) -> Box<Expr> {
    Box::new(Expr::Ident(ident(name)))
}

pub fn str_lit(value: &str) -> Str {
    Str {
        span: DUMMY_SP,
        value: value.into(),
        raw: None,
    }
}

pub fn str_expr(value: &str) -> Box<Expr> {
    Box::new(Expr::Lit(Lit::Str(str_lit(value))))
}

/// The processed (unescaped) value of a string literal.
pub fn str_value(s: &Str) -> String {
    s.value.to_string_lossy().into_owned()
}

pub fn this_expr() -> Box<Expr> {
    Box::new(Expr::This(ThisExpr { span: DUMMY_SP }))
}

pub fn paren(expr: Box<Expr>) -> Box<Expr> {
    Box::new(Expr::Paren(ParenExpr {
        span: DUMMY_SP,
        expr,
    }))
}

/// `a, b, c`. A single operand is returned as is.
pub fn comma(mut exprs: Vec<Box<Expr>>) -> Box<Expr> {
    if exprs.len() == 1 {
        if let Some(only) = exprs.pop() {
            return only;
        }
    }
    Box::new(Expr::Seq(SeqExpr {
        span: DUMMY_SP,
        exprs,
    }))
}

/// `target = value`
pub fn assign(target: Ident, value: Box<Expr>) -> Box<Expr> {
    Box::new(Expr::Assign(AssignExpr {
        span: DUMMY_SP,
        op: AssignOp::Assign,
        left: AssignTarget::Simple(SimpleAssignTarget::Ident(target.into())),
        right: value,
    }))
}

/// `obj.name`
pub fn member(obj: Box<Expr>, name: &str) -> Box<Expr> {
    Box::new(Expr::Member(MemberExpr {
        span: DUMMY_SP,
        obj,
        prop: MemberProp::Ident(IdentName::new(name.into(), DUMMY_SP)),
    }))
}

/// Member access through a property name: `obj.x`, `obj["a-b"]`, `obj[0]`,
/// `obj[key]`.
pub fn member_for_key(obj: Box<Expr>, key: PropName) -> MemberExpr {
    let prop = match key {
        PropName::Ident(name) => MemberProp::Ident(name),
        PropName::Computed(computed) => MemberProp::Computed(computed),
        other => MemberProp::Computed(ComputedPropName {
            span: DUMMY_SP,
            expr: prop_name_to_expr(other),
        }),
    };
    MemberExpr {
        span: DUMMY_SP,
        obj,
        prop,
    }
}

/// `obj[key] = value`, spelled with dot access where the key allows it.
pub fn assign_member(obj: Box<Expr>, key: PropName, value: Box<Expr>) -> Box<Expr> {
    Box::new(Expr::Assign(AssignExpr {
        span: DUMMY_SP,
        op: AssignOp::Assign,
        left: AssignTarget::Simple(SimpleAssignTarget::Member(member_for_key(obj, key))),
        right: value,
    }))
}

/// The runtime value of a property key: identifiers become string literals.
pub fn prop_name_to_expr(key: PropName) -> Box<Expr> {
    match key {
        PropName::Ident(name) => str_expr(&name.sym),
        PropName::Str(s) => Box::new(Expr::Lit(Lit::Str(s))),
        PropName::Num(n) => Box::new(Expr::Lit(Lit::Num(n))),
        PropName::BigInt(b) => Box::new(Expr::Lit(Lit::BigInt(b))),
        PropName::Computed(computed) => computed.expr,
    }
}

pub fn expr_stmt(expr: Box<Expr>) -> Stmt {
    Stmt::Expr(ExprStmt {
        span: DUMMY_SP,
        expr,
    })
}

pub fn return_stmt(arg: Box<Expr>) -> Stmt {
    Stmt::Return(ReturnStmt {
        span: DUMMY_SP,
        arg: Some(arg),
    })
}

pub fn block(stmts: Vec<Stmt>) -> BlockStmt {
    BlockStmt {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        stmts,
    }
}

/// `var a, b = init;` (or `let`/`const`).
pub fn var_decl(kind: VarDeclKind, decls: Vec<(Ident, Option<Box<Expr>>)>) -> Stmt {
    let decls = decls
        .into_iter()
        .map(|(name, init)| VarDeclarator {
            span: DUMMY_SP,
            name: Pat::Ident(name.into()),
            init,
            definite: false,
        })
        .collect();
    Stmt::Decl(Decl::Var(Box::new(VarDecl {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        kind,
        declare: false,
        decls,
    })))
}

pub fn param(pat: Pat) -> Param {
    Param {
        span: DUMMY_SP,
        decorators: Vec::new(),
        pat,
    }
}

/// An anonymous `function (params) { body }` keeping the given location.
pub fn function(span: swc_common::Span, params: Vec<Param>, body: BlockStmt, is_async: bool) -> Function {
    Function {
        params,
        decorators: Vec::new(),
        span,
        ctxt: SyntaxContext::empty(),
        body: Some(body),
        is_generator: false,
        is_async,
        type_params: None,
        return_type: None,
    }
}

pub fn fn_expr(function: Function) -> Box<Expr> {
    Box::new(Expr::Fn(FnExpr {
        ident: None,
        function: Box::new(function),
    }))
}

/// `(function () { body })()`
pub fn iife(body: Vec<Stmt>) -> Box<Expr> {
    let callee = paren(fn_expr(function(DUMMY_SP, Vec::new(), block(body), false)));
    Box::new(Expr::Call(CallExpr {
        span: DUMMY_SP,
        callee: Callee::Expr(callee),
        args: Vec::new(),
        type_args: None,
        ..Default::default()
    }))
}

/// A string-literal expression statement such as `"use strict";`.
pub fn is_directive(stmt: &Stmt) -> bool {
    matches!(stmt, Stmt::Expr(ExprStmt { expr, .. }) if matches!(&**expr, Expr::Lit(Lit::Str(_))))
}

pub fn is_use_strict(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Expr(ExprStmt { expr, .. }) => match &**expr {
            Expr::Lit(Lit::Str(s)) => str_value(s) == "use strict",
            _ => false,
        },
        _ => false,
    }
}

/// Insert `new` ahead of `stmts`, after any leading directive prologue.
pub fn prepend_statements(mut stmts: Vec<Stmt>, new: Vec<Stmt>) -> Vec<Stmt> {
    if new.is_empty() {
        return stmts;
    }
    let at = stmts.iter().take_while(|s| is_directive(s)).count();
    stmts.splice(at..at, new);
    stmts
}

/// Module-item flavour of [`prepend_statements`].
pub fn prepend_module_items(mut items: Vec<ModuleItem>, new: Vec<Stmt>) -> Vec<ModuleItem> {
    if new.is_empty() {
        return items;
    }
    let at = items
        .iter()
        .take_while(|item| matches!(item, ModuleItem::Stmt(s) if is_directive(s)))
        .count();
    items.splice(at..at, new.into_iter().map(ModuleItem::Stmt));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prepend_keeps_directives_first() {
        let stmts = vec![expr_stmt(str_expr("use strict")), expr_stmt(ident_expr("a"))];
        let out = prepend_statements(stmts, vec![expr_stmt(ident_expr("b"))]);
        assert!(is_use_strict(&out[0]));
        assert_eq!(out[1], expr_stmt(ident_expr("b")));
        assert_eq!(out[2], expr_stmt(ident_expr("a")));
    }

    #[test]
    fn identifier_keys_become_strings() {
        let key = PropName::Ident(IdentName::new("x".into(), DUMMY_SP));
        assert_eq!(prop_name_to_expr(key), str_expr("x"));
    }

    #[test]
    fn single_operand_comma_is_the_operand() {
        assert_eq!(comma(vec![ident_expr("a")]), ident_expr("a"));
    }
}
