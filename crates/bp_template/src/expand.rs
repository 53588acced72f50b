//! Second stage of template expansion: replace placeholder leaves.
//!
//! Only template-origin nodes are visited. A substituted sub-tree is dropped
//! in place and never re-scanned, so user code that happens to contain an
//! identifier like `$0` is left alone.

use swc_ecma_ast::*;
use swc_ecma_visit::{VisitMut, VisitMutWith};

use crate::{Subst, TemplateError};

/// `$0`, `$1`, ... → 0, 1, ...
pub(crate) fn placeholder_index(sym: &str) -> Option<usize> {
    let digits = sym.strip_prefix('$')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn expr_placeholder(expr: &Expr) -> Option<usize> {
    match expr {
        Expr::Ident(i) => placeholder_index(&i.sym),
        _ => None,
    }
}

fn stmt_placeholder(stmt: &Stmt) -> Option<usize> {
    match stmt {
        Stmt::Expr(ExprStmt { expr, .. }) => expr_placeholder(expr),
        _ => None,
    }
}

fn pat_placeholder(pat: &Pat) -> Option<usize> {
    match pat {
        Pat::Ident(b) => placeholder_index(&b.id.sym),
        _ => None,
    }
}

fn arg_placeholder(arg: &ExprOrSpread) -> Option<usize> {
    if arg.spread.is_some() {
        return None;
    }
    expr_placeholder(&arg.expr)
}

fn prop_placeholder(prop: &PropOrSpread) -> Option<usize> {
    match prop {
        PropOrSpread::Prop(p) => match &**p {
            Prop::Shorthand(i) => placeholder_index(&i.sym),
            _ => None,
        },
        PropOrSpread::Spread(_) => None,
    }
}

/// A bare `$N;` class member, which is how a member-list slot parses.
fn member_placeholder(member: &ClassMember) -> Option<usize> {
    match member {
        ClassMember::ClassProp(p) if p.value.is_none() && !p.is_static => match &p.key {
            PropName::Ident(name) => placeholder_index(&name.sym),
            _ => None,
        },
        _ => None,
    }
}

pub(crate) struct Expander<'a> {
    template: &'a str,
    substitutions: Vec<Subst>,
    used: Vec<bool>,
    error: Option<TemplateError>,
}

impl<'a> Expander<'a> {
    pub(crate) fn new(template: &'a str, substitutions: Vec<Subst>) -> Self {
        let used = vec![false; substitutions.len()];
        Self {
            template,
            substitutions,
            used,
            error: None,
        }
    }

    pub(crate) fn finish(self) -> Result<(), TemplateError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        match self.used.iter().position(|used| !used) {
            Some(index) => Err(TemplateError::UnusedSubstitution {
                template: self.template.to_string(),
                index,
            }),
            None => Ok(()),
        }
    }

    fn fail(&mut self, error: TemplateError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn lookup(&mut self, index: usize) -> Option<Subst> {
        match self.substitutions.get(index) {
            Some(value) => {
                self.used[index] = true;
                Some(value.clone())
            }
            None => {
                self.fail(TemplateError::MissingSubstitution {
                    template: self.template.to_string(),
                    index,
                });
                None
            }
        }
    }

    /// The value for a list slot, when it is a sequence. Scalars fall back to
    /// the single-node path, which also reports mismatches.
    fn sequence(&mut self, index: usize) -> Option<Subst> {
        match self.substitutions.get(index) {
            Some(value) if value.is_sequence() => {
                self.used[index] = true;
                Some(value.clone())
            }
            _ => None,
        }
    }

    /// The value for a single-node slot.
    fn scalar(&mut self, index: usize) -> Option<Subst> {
        let value = self.lookup(index)?;
        if value.is_sequence() {
            self.fail(TemplateError::PlaceholderArity {
                template: self.template.to_string(),
                index,
                found: value.kind(),
            });
            return None;
        }
        Some(value)
    }

    fn convert<T>(
        &mut self,
        index: usize,
        expected: &'static str,
        convert: impl FnOnce(Subst) -> Result<T, &'static str>,
    ) -> Option<T> {
        let value = self.scalar(index)?;
        match convert(value) {
            Ok(node) => Some(node),
            Err(found) => {
                self.fail(TemplateError::PlaceholderKind {
                    template: self.template.to_string(),
                    index,
                    expected,
                    found,
                });
                None
            }
        }
    }

    fn splice_args(&mut self, args: &mut Vec<ExprOrSpread>) {
        for mut arg in std::mem::take(args) {
            if let Some(Subst::Exprs(exprs)) = arg_placeholder(&arg).and_then(|i| self.sequence(i)) {
                args.extend(exprs.into_iter().map(|expr| ExprOrSpread { spread: None, expr }));
                continue;
            }
            arg.visit_mut_with(self);
            args.push(arg);
        }
    }

    fn splice_params(&mut self, params: &mut Vec<Param>) {
        for mut param in std::mem::take(params) {
            if let Some(Subst::Params(spliced)) = pat_placeholder(&param.pat).and_then(|i| self.sequence(i)) {
                params.extend(spliced);
                continue;
            }
            param.visit_mut_with(self);
            params.push(param);
        }
    }
}

impl VisitMut for Expander<'_> {
    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        if let Some(index) = expr_placeholder(expr) {
            if let Some(node) = self.convert(index, "expression", Subst::into_expr) {
                *expr = *node;
            }
            return;
        }
        expr.visit_mut_children_with(self);
    }

    fn visit_mut_pat(&mut self, pat: &mut Pat) {
        if let Some(index) = pat_placeholder(pat) {
            if let Some(node) = self.convert(index, "binding", Subst::into_pat) {
                *pat = node;
            }
            return;
        }
        pat.visit_mut_children_with(self);
    }

    fn visit_mut_ident(&mut self, ident: &mut Ident) {
        if let Some(index) = placeholder_index(&ident.sym) {
            if let Some(node) = self.convert(index, "identifier", Subst::into_ident) {
                *ident = node;
            }
        }
    }

    fn visit_mut_member_prop(&mut self, prop: &mut MemberProp) {
        if let MemberProp::Ident(name) = prop {
            if let Some(index) = placeholder_index(&name.sym) {
                if let Some(node) = self.convert(index, "property access", Subst::into_member_prop) {
                    *prop = node;
                }
                return;
            }
        }
        prop.visit_mut_children_with(self);
    }

    fn visit_mut_prop_name(&mut self, name: &mut PropName) {
        if let PropName::Ident(ident) = name {
            if let Some(index) = placeholder_index(&ident.sym) {
                if let Some(node) = self.convert(index, "property name", Subst::into_prop_name) {
                    *name = node;
                }
                return;
            }
        }
        name.visit_mut_children_with(self);
    }

    /// A single-statement slot such as `if (c) $0`. Statement lists splice
    /// in `visit_mut_stmts` before reaching here.
    fn visit_mut_stmt(&mut self, stmt: &mut Stmt) {
        if let Some(index) = stmt_placeholder(stmt) {
            if matches!(self.substitutions.get(index), Some(Subst::Stmt(_) | Subst::Stmts(_))) {
                if let Some(Subst::Stmt(single)) = self.scalar(index) {
                    *stmt = single;
                }
                return;
            }
        }
        stmt.visit_mut_children_with(self);
    }

    fn visit_mut_stmts(&mut self, stmts: &mut Vec<Stmt>) {
        for mut stmt in std::mem::take(stmts) {
            if let Some(index) = stmt_placeholder(&stmt) {
                if matches!(self.substitutions.get(index), Some(Subst::Stmts(_) | Subst::Stmt(_))) {
                    match self.lookup(index) {
                        Some(Subst::Stmts(spliced)) => stmts.extend(spliced),
                        Some(Subst::Stmt(single)) => stmts.push(single),
                        _ => {}
                    }
                    continue;
                }
            }
            stmt.visit_mut_with(self);
            stmts.push(stmt);
        }
    }

    fn visit_mut_call_expr(&mut self, call: &mut CallExpr) {
        call.callee.visit_mut_with(self);
        self.splice_args(&mut call.args);
    }

    fn visit_mut_new_expr(&mut self, new: &mut NewExpr) {
        new.callee.visit_mut_with(self);
        if let Some(args) = &mut new.args {
            self.splice_args(args);
        }
    }

    fn visit_mut_array_lit(&mut self, array: &mut ArrayLit) {
        for elem in std::mem::take(&mut array.elems) {
            let Some(mut elem) = elem else {
                array.elems.push(None);
                continue;
            };
            if let Some(Subst::Exprs(exprs)) = arg_placeholder(&elem).and_then(|i| self.sequence(i)) {
                array
                    .elems
                    .extend(exprs.into_iter().map(|expr| Some(ExprOrSpread { spread: None, expr })));
                continue;
            }
            elem.visit_mut_with(self);
            array.elems.push(Some(elem));
        }
    }

    fn visit_mut_seq_expr(&mut self, seq: &mut SeqExpr) {
        for mut expr in std::mem::take(&mut seq.exprs) {
            if let Some(Subst::Exprs(exprs)) = expr_placeholder(&expr).and_then(|i| self.sequence(i)) {
                seq.exprs.extend(exprs);
                continue;
            }
            expr.visit_mut_with(self);
            seq.exprs.push(expr);
        }
    }

    fn visit_mut_object_lit(&mut self, object: &mut ObjectLit) {
        for mut prop in std::mem::take(&mut object.props) {
            if let Some(Subst::Props(props)) = prop_placeholder(&prop).and_then(|i| self.sequence(i)) {
                object.props.extend(props);
                continue;
            }
            if let Some(index) = prop_placeholder(&prop) {
                if matches!(self.substitutions.get(index), Some(Subst::Prop(_))) {
                    if let Some(Subst::Prop(single)) = self.lookup(index) {
                        object.props.push(single);
                    }
                    continue;
                }
            }
            prop.visit_mut_with(self);
            object.props.push(prop);
        }
    }

    fn visit_mut_function(&mut self, function: &mut Function) {
        function.decorators.visit_mut_with(self);
        self.splice_params(&mut function.params);
        function.body.visit_mut_with(self);
    }

    fn visit_mut_arrow_expr(&mut self, arrow: &mut ArrowExpr) {
        for mut pat in std::mem::take(&mut arrow.params) {
            if let Some(Subst::Params(spliced)) = pat_placeholder(&pat).and_then(|i| self.sequence(i)) {
                arrow.params.extend(spliced.into_iter().map(|param| param.pat));
                continue;
            }
            pat.visit_mut_with(self);
            arrow.params.push(pat);
        }
        arrow.body.visit_mut_with(self);
    }

    fn visit_mut_constructor(&mut self, constructor: &mut Constructor) {
        constructor.key.visit_mut_with(self);
        for mut param in std::mem::take(&mut constructor.params) {
            if let ParamOrTsParamProp::Param(p) = &param {
                if let Some(Subst::Params(spliced)) = pat_placeholder(&p.pat).and_then(|i| self.sequence(i)) {
                    constructor
                        .params
                        .extend(spliced.into_iter().map(ParamOrTsParamProp::Param));
                    continue;
                }
            }
            param.visit_mut_with(self);
            constructor.params.push(param);
        }
        constructor.body.visit_mut_with(self);
    }

    fn visit_mut_class(&mut self, class: &mut Class) {
        class.decorators.visit_mut_with(self);
        class.super_class.visit_mut_with(self);
        for mut member in std::mem::take(&mut class.body) {
            if let Some(index) = member_placeholder(&member) {
                if matches!(self.substitutions.get(index), Some(Subst::Members(_) | Subst::Member(_))) {
                    match self.lookup(index) {
                        Some(Subst::Members(spliced)) => class.body.extend(spliced),
                        Some(Subst::Member(single)) => class.body.push(single),
                        _ => {}
                    }
                    continue;
                }
            }
            member.visit_mut_with(self);
            class.body.push(member);
        }
    }
}
