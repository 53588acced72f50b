use swc_common::Span;
use swc_ecma_ast::*;
use swc_ecma_visit::{Fold, FoldWith};

use super::bindings::{lexical_head_binds, lexically_binds, params_bind, pat_binds, var_scope_binds};

/// Replaces free occurrences of one name with an identifier.
///
/// `from` may be an ordinary name, `arguments` or `this`. Any nested scope
/// that re-binds `from` is left alone from that point down; for `this` and
/// `arguments` that means every construct with its own receiver.
pub struct AlphaRenamer {
    from: String,
    to: Ident,
}

impl AlphaRenamer {
    pub fn rename<T: FoldWith<Self>>(tree: T, from: &str, to: &Ident) -> T {
        let mut renamer = AlphaRenamer {
            from: from.to_string(),
            to: to.clone(),
        };
        tree.fold_with(&mut renamer)
    }

    fn receiver_like(&self) -> bool {
        self.from == "this" || self.from == "arguments"
    }

    fn matches(&self, ident: &Ident) -> bool {
        &*ident.sym == self.from.as_str()
    }

    fn renamed(&self, span: Span) -> Ident {
        Ident {
            span,
            ..self.to.clone()
        }
    }
}

impl Fold for AlphaRenamer {
    fn fold_expr(&mut self, expr: Expr) -> Expr {
        match expr {
            Expr::This(this) if self.from == "this" => Expr::Ident(self.renamed(this.span)),
            Expr::Ident(ident) if self.matches(&ident) => Expr::Ident(self.renamed(ident.span)),
            other => other.fold_children_with(self),
        }
    }

    fn fold_simple_assign_target(&mut self, target: SimpleAssignTarget) -> SimpleAssignTarget {
        match target {
            SimpleAssignTarget::Ident(binding) if self.matches(&binding.id) => SimpleAssignTarget::Ident(BindingIdent {
                id: self.renamed(binding.id.span),
                type_ann: binding.type_ann,
            }),
            other => other.fold_children_with(self),
        }
    }

    fn fold_prop(&mut self, prop: Prop) -> Prop {
        match prop {
            Prop::Shorthand(ident) if self.matches(&ident) => Prop::KeyValue(KeyValueProp {
                key: PropName::Ident(IdentName::new(ident.sym.clone(), ident.span)),
                value: Box::new(Expr::Ident(self.renamed(ident.span))),
            }),
            Prop::Getter(getter) if self.receiver_like() => Prop::Getter(GetterProp {
                key: getter.key.fold_with(self),
                ..getter
            }),
            Prop::Setter(setter) if self.receiver_like() => Prop::Setter(SetterProp {
                key: setter.key.fold_with(self),
                ..setter
            }),
            other => other.fold_children_with(self),
        }
    }

    fn fold_function(&mut self, function: Function) -> Function {
        let rebinds = self.receiver_like()
            || params_bind(&function.params, &self.from)
            || function
                .body
                .as_ref()
                .is_some_and(|body| var_scope_binds(&body.stmts, &self.from));
        if rebinds {
            return function;
        }
        function.fold_children_with(self)
    }

    fn fold_fn_expr(&mut self, expr: FnExpr) -> FnExpr {
        if expr.ident.as_ref().is_some_and(|ident| self.matches(ident)) {
            return expr;
        }
        expr.fold_children_with(self)
    }

    fn fold_class_expr(&mut self, expr: ClassExpr) -> ClassExpr {
        if expr.ident.as_ref().is_some_and(|ident| self.matches(ident)) {
            return expr;
        }
        expr.fold_children_with(self)
    }

    fn fold_constructor(&mut self, ctor: Constructor) -> Constructor {
        if self.receiver_like() {
            return Constructor {
                key: ctor.key.fold_with(self),
                ..ctor
            };
        }
        let rebinds = ctor.params.iter().any(|param| match param {
            ParamOrTsParamProp::Param(param) => pat_binds(&param.pat, &self.from),
            ParamOrTsParamProp::TsParamProp(_) => false,
        }) || ctor
            .body
            .as_ref()
            .is_some_and(|body| var_scope_binds(&body.stmts, &self.from));
        if rebinds {
            return ctor;
        }
        ctor.fold_children_with(self)
    }

    fn fold_class_prop(&mut self, prop: ClassProp) -> ClassProp {
        if self.receiver_like() {
            return ClassProp {
                key: prop.key.fold_with(self),
                ..prop
            };
        }
        prop.fold_children_with(self)
    }

    fn fold_private_prop(&mut self, prop: PrivateProp) -> PrivateProp {
        if self.receiver_like() {
            return prop;
        }
        prop.fold_children_with(self)
    }

    fn fold_static_block(&mut self, block: StaticBlock) -> StaticBlock {
        if self.receiver_like() {
            return block;
        }
        block.fold_children_with(self)
    }

    fn fold_arrow_expr(&mut self, arrow: ArrowExpr) -> ArrowExpr {
        let rebinds = arrow.params.iter().any(|param| pat_binds(param, &self.from))
            || matches!(&*arrow.body, BlockStmtOrExpr::BlockStmt(body) if var_scope_binds(&body.stmts, &self.from));
        if rebinds {
            return arrow;
        }
        arrow.fold_children_with(self)
    }

    fn fold_block_stmt(&mut self, block: BlockStmt) -> BlockStmt {
        if lexically_binds(&block.stmts, &self.from) {
            return block;
        }
        block.fold_children_with(self)
    }

    fn fold_catch_clause(&mut self, clause: CatchClause) -> CatchClause {
        if clause.param.as_ref().is_some_and(|param| pat_binds(param, &self.from)) {
            return clause;
        }
        clause.fold_children_with(self)
    }

    fn fold_for_stmt(&mut self, stmt: ForStmt) -> ForStmt {
        if let Some(VarDeclOrExpr::VarDecl(decl)) = &stmt.init {
            if lexical_head_binds(decl, &self.from) {
                return stmt;
            }
        }
        stmt.fold_children_with(self)
    }

    fn fold_for_in_stmt(&mut self, stmt: ForInStmt) -> ForInStmt {
        if let ForHead::VarDecl(decl) = &stmt.left {
            if lexical_head_binds(decl, &self.from) {
                return stmt;
            }
        }
        stmt.fold_children_with(self)
    }

    fn fold_for_of_stmt(&mut self, stmt: ForOfStmt) -> ForOfStmt {
        if let ForHead::VarDecl(decl) = &stmt.left {
            if lexical_head_binds(decl, &self.from) {
                return stmt;
            }
        }
        stmt.fold_children_with(self)
    }
}

/// Renames every occurrence of one name, binding sites included.
///
/// Meant for a scope that binds `from` itself, such as a function whose
/// parameter has to make way for an outer reference. Nested re-bindings are
/// renamed along with it, which keeps them consistent.
pub struct BindingRenamer {
    from: String,
    to: Ident,
}

impl BindingRenamer {
    pub fn rename<T: FoldWith<Self>>(tree: T, from: &str, to: &Ident) -> T {
        let mut renamer = BindingRenamer {
            from: from.to_string(),
            to: to.clone(),
        };
        tree.fold_with(&mut renamer)
    }

    fn matches(&self, ident: &Ident) -> bool {
        &*ident.sym == self.from.as_str()
    }

    fn renamed(&self, span: Span) -> Ident {
        Ident {
            span,
            ..self.to.clone()
        }
    }
}

impl Fold for BindingRenamer {
    fn fold_ident(&mut self, ident: Ident) -> Ident {
        if self.matches(&ident) {
            return self.renamed(ident.span);
        }
        ident
    }

    /// `{y}` keeps its key: `{y: $__y}`.
    fn fold_prop(&mut self, prop: Prop) -> Prop {
        match prop {
            Prop::Shorthand(ident) if self.matches(&ident) => Prop::KeyValue(KeyValueProp {
                key: PropName::Ident(IdentName::new(ident.sym.clone(), ident.span)),
                value: Box::new(Expr::Ident(self.renamed(ident.span))),
            }),
            other => other.fold_children_with(self),
        }
    }

    /// `{y = 1} = o` keeps its key: `{y: $__y = 1} = o`.
    fn fold_object_pat_prop(&mut self, prop: ObjectPatProp) -> ObjectPatProp {
        match prop {
            ObjectPatProp::Assign(assign) if self.matches(&assign.key.id) => {
                let binding = Pat::Ident(BindingIdent {
                    id: self.renamed(assign.key.id.span),
                    type_ann: assign.key.type_ann,
                });
                let value = match assign.value {
                    Some(default) => Pat::Assign(AssignPat {
                        span: assign.span,
                        left: Box::new(binding),
                        right: default.fold_with(self),
                    }),
                    None => binding,
                };
                ObjectPatProp::KeyValue(KeyValuePatProp {
                    key: PropName::Ident(IdentName::new(assign.key.id.sym.clone(), assign.key.id.span)),
                    value: Box::new(value),
                })
            }
            other => other.fold_children_with(self),
        }
    }
}
