//! Arrow function lowering.
//!
//! `(a) => this.x + a` → `($__0 = this, function (a) { return $__0.x + a; })`
//!
//! The enclosing `this`/`arguments` are captured into temporaries declared in
//! the enclosing function body, and every free use inside the arrow (nested
//! arrows included) is renamed to the temporary.

use bp_ast::factory;
use bp_transform::scope::{find_this_or_arguments, AlphaRenamer};
use bp_template::parse_expression;
use bp_transform::{temp_var_decl, ErrorSlot, TempVarManager, TempVarTransformer, Transformer};
use swc_common::DUMMY_SP;
use swc_ecma_ast::*;
use swc_ecma_visit::{Fold, FoldWith};

#[derive(Debug, Default)]
pub struct ArrowFunctionTransformer {
    temps: TempVarManager,
    errors: ErrorSlot,
}

impl ArrowFunctionTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lower(&mut self, mut arrow: ArrowExpr) -> Expr {
        let found = find_this_or_arguments(&arrow);
        let mut captures = Vec::new();
        if found.arguments {
            let temp = self.add_temp_var(None);
            arrow = AlphaRenamer::rename(arrow, "arguments", &temp);
            captures.push(factory::assign(temp, factory::ident_expr("arguments")));
        }
        if found.this {
            let temp = self.add_temp_var(None);
            arrow = AlphaRenamer::rename(arrow, "this", &temp);
            captures.push(factory::assign(temp, factory::this_expr()));
        }
        tracing::debug!(
            this = found.this,
            arguments = found.arguments,
            "lowering arrow function"
        );

        let ArrowExpr {
            span,
            params,
            body,
            is_async,
            ..
        } = arrow;
        let params = params
            .into_iter()
            .map(|pat| factory::param(pat.fold_with(self)))
            .collect();
        let body = match *body {
            BlockStmtOrExpr::BlockStmt(block) => block,
            BlockStmtOrExpr::Expr(expr) => factory::block(vec![factory::return_stmt(expr)]),
        };
        let body = self.transform_function_body(body);
        let function = factory::fn_expr(factory::function(span, params, body, is_async));

        if captures.is_empty() {
            return *factory::paren(function);
        }
        captures.push(function);
        *factory::paren(factory::comma(captures))
    }

    /// A field initializer runs once per instance (or once for the class),
    /// so its captures live in a wrapper called with the field's `this`.
    fn lower_field_value(&mut self, value: Box<Expr>) -> Box<Expr> {
        let (value, declared) = self.in_temp_scope(|this| value.fold_with(this));
        let Some(decl) = temp_var_decl(declared) else {
            return value;
        };
        let wrapped = parse_expression(
            "(function () { $0; return $1; }).call(this)",
            vec![decl.into(), value.into()],
        );
        self.check(wrapped)
            .unwrap_or_else(|| Box::new(Expr::Invalid(Invalid { span: DUMMY_SP })))
    }
}

impl Fold for ArrowFunctionTransformer {
    fn fold_expr(&mut self, expr: Expr) -> Expr {
        match expr {
            Expr::Arrow(arrow) => self.lower(arrow),
            other => other.fold_children_with(self),
        }
    }

    fn fold_function(&mut self, function: Function) -> Function {
        let decorators = function.decorators.fold_with(self);
        let params = function.params.fold_with(self);
        let body = function.body.map(|body| self.transform_function_body(body));
        Function {
            decorators,
            params,
            body,
            ..function
        }
    }

    fn fold_constructor(&mut self, ctor: Constructor) -> Constructor {
        let key = ctor.key.fold_with(self);
        let params = ctor.params.fold_with(self);
        let body = ctor.body.map(|body| self.transform_function_body(body));
        Constructor {
            key,
            params,
            body,
            ..ctor
        }
    }

    fn fold_getter_prop(&mut self, prop: GetterProp) -> GetterProp {
        let key = prop.key.fold_with(self);
        let body = prop.body.map(|body| self.transform_function_body(body));
        GetterProp { key, body, ..prop }
    }

    fn fold_setter_prop(&mut self, prop: SetterProp) -> SetterProp {
        let key = prop.key.fold_with(self);
        let param = prop.param.fold_with(self);
        let body = prop.body.map(|body| self.transform_function_body(body));
        SetterProp {
            key,
            param,
            body,
            ..prop
        }
    }

    fn fold_class_prop(&mut self, prop: ClassProp) -> ClassProp {
        let key = prop.key.fold_with(self);
        let decorators = prop.decorators.fold_with(self);
        let value = prop.value.map(|value| self.lower_field_value(value));
        ClassProp {
            key,
            decorators,
            value,
            ..prop
        }
    }

    fn fold_private_prop(&mut self, prop: PrivateProp) -> PrivateProp {
        let decorators = prop.decorators.fold_with(self);
        let value = prop.value.map(|value| self.lower_field_value(value));
        PrivateProp {
            decorators,
            value,
            ..prop
        }
    }

    fn fold_static_block(&mut self, block: StaticBlock) -> StaticBlock {
        let body = self.transform_function_body(block.body);
        StaticBlock { body, ..block }
    }

    fn fold_module(&mut self, module: Module) -> Module {
        self.temps.reserve_names_in(&module);
        let body = self.transform_module_body(module.body);
        Module { body, ..module }
    }
}

impl Transformer for ArrowFunctionTransformer {
    fn name(&self) -> &'static str {
        "arrow-functions"
    }

    fn errors(&mut self) -> &mut ErrorSlot {
        &mut self.errors
    }
}

impl TempVarTransformer for ArrowFunctionTransformer {
    fn temps(&mut self) -> &mut TempVarManager {
        &mut self.temps
    }
}
