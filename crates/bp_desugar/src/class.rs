//! Class field lowering.
//!
//! Instance fields move into the constructor as `this.x = v;`, after the
//! `super(...)` call in a derived class. Static fields become
//! `Object.defineProperty` statements after the class declaration, or, for a
//! class expression, statements inside an immediately-invoked wrapper that
//! returns the class.

use bp_ast::factory;
use bp_template::{parse_class_member, parse_statement};
use bp_transform::scope::bindings::{lexically_binds, pat_binds, var_scope_binds};
use bp_transform::scope::{AlphaRenamer, BindingRenamer};
use bp_transform::{ErrorSlot, NameCollector, TempVarManager, TempVarTransformer, TransformError, Transformer};
use swc_ecma_ast::*;
use swc_ecma_visit::{Fold, FoldWith, Visit, VisitWith};

const PASS: &str = "class-fields";

/// A field initializer waiting to be placed: `key = value`.
struct FieldInit {
    key: PropName,
    value: Box<Expr>,
}

#[derive(Debug, Default)]
pub struct Es6ClassTransformer {
    temps: TempVarManager,
    errors: ErrorSlot,
}

impl Es6ClassTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the class without fields; returns the static initializers
    /// still to be emitted.
    fn lower_class(&mut self, class: Class) -> (Class, Vec<FieldInit>) {
        let super_class = class.super_class.fold_with(self);
        let mut members = Vec::with_capacity(class.body.len());
        let mut instance_inits = Vec::new();
        let mut static_inits = Vec::new();
        let mut constructor = None;
        let mut constructor_index = 0;

        for member in class.body {
            match member {
                ClassMember::Constructor(ctor) => {
                    constructor_index = members.len();
                    constructor = Some(ctor.fold_with(self));
                }
                ClassMember::Method(method) => members.push(ClassMember::Method(method.fold_with(self))),
                ClassMember::ClassProp(prop) => {
                    let prop = prop.fold_with(self);
                    let Some(value) = prop.value else {
                        continue;
                    };
                    let init = FieldInit { key: prop.key, value };
                    if prop.is_static {
                        static_inits.push(init);
                    } else {
                        instance_inits.push(init);
                    }
                }
                ClassMember::Empty(_) => members.push(member),
                other => {
                    self.errors.record(TransformError::unexpected(PASS, member_kind(&other)));
                    members.push(other);
                }
            }
        }

        if !instance_inits.is_empty() {
            let derived = super_class.is_some();
            let ctor = match constructor {
                Some(ctor) => Some(ctor),
                None => self.default_constructor(derived),
            };
            constructor = ctor.map(|ctor| {
                let ctor = self.make_way_for(ctor, &instance_inits);
                inject_initializers(ctor, instance_inits, derived)
            });
        }
        if let Some(ctor) = constructor {
            members.insert(constructor_index, ClassMember::Constructor(ctor));
        }

        let class = Class {
            super_class,
            body: members,
            decorators: class.decorators.fold_with(self),
            ..class
        };
        (class, static_inits)
    }

    fn default_constructor(&mut self, derived: bool) -> Option<Constructor> {
        let template = if derived {
            "constructor(...args) { super(...args); }"
        } else {
            "constructor() {}"
        };
        match self.check(parse_class_member(template, Vec::new()))? {
            ClassMember::Constructor(ctor) => Some(ctor),
            other => {
                self.errors.record(TransformError::unexpected(PASS, member_kind(&other)));
                None
            }
        }
    }

    /// Rename constructor bindings that would capture a free name of an
    /// instance initializer about to be moved into the constructor.
    fn make_way_for(&mut self, mut ctor: Constructor, inits: &[FieldInit]) -> Constructor {
        let mut names: Vec<String> = inits
            .iter()
            .flat_map(|init| NameCollector::names_in(&*init.value))
            .collect();
        names.sort();
        names.dedup();
        for name in names {
            if !constructor_binds(&ctor, &name) {
                continue;
            }
            let fresh = self.temp_identifier(Some(&name));
            tracing::debug!(%name, fresh = %fresh.sym, "renaming constructor binding");
            ctor = Constructor {
                params: BindingRenamer::rename(ctor.params, &name, &fresh),
                body: BindingRenamer::rename(ctor.body, &name, &fresh),
                ..ctor
            };
        }
        ctor
    }

    /// `Object.defineProperty(C, key, {...})` per static field. The values
    /// leave the class body, so `this` and the class expression's own name
    /// (`self_name`) become `class_name`.
    fn static_initializers(
        &mut self,
        class_name: &Ident,
        self_name: Option<&Ident>,
        inits: Vec<FieldInit>,
    ) -> Vec<Stmt> {
        inits
            .into_iter()
            .filter_map(|init| {
                let mut value = AlphaRenamer::rename(init.value, "this", class_name);
                if let Some(self_name) = self_name.filter(|name| name.sym != class_name.sym) {
                    value = AlphaRenamer::rename(value, &self_name.sym, class_name);
                }
                let stmt = parse_statement(
                    "Object.defineProperty($0, $1, {enumerable: true, configurable: true, value: $2, writable: true});",
                    vec![
                        class_name.clone().into(),
                        factory::prop_name_to_expr(init.key).into(),
                        value.into(),
                    ],
                );
                self.check(stmt)
            })
            .collect()
    }

    /// A class declaration followed by its static initializers.
    fn lower_class_decl(&mut self, decl: ClassDecl) -> (ClassDecl, Vec<Stmt>) {
        tracing::debug!(class = %decl.ident.sym, "lowering class declaration");
        let (class, inits) = self.lower_class(*decl.class);
        let statics = self.static_initializers(&decl.ident, None, inits);
        (
            ClassDecl {
                class: Box::new(class),
                ..decl
            },
            statics,
        )
    }

    /// A class expression, wrapped when it has static initializers:
    /// `(function () { let $__0 = class {...}; Object.defineProperty($__0, ...); return $__0; })()`
    fn lower_class_expr(&mut self, expr: ClassExpr) -> Expr {
        let (class, inits) = self.lower_class(*expr.class);
        let self_name = expr.ident.clone();
        let class_expr = ClassExpr {
            class: Box::new(class),
            ..expr
        };
        if inits.is_empty() {
            return Expr::Class(class_expr);
        }
        tracing::debug!(statics = inits.len(), "wrapping class expression");
        let (body, _) = self.in_temp_scope(|this| {
            let name = this.temp_identifier(None);
            let mut body = vec![factory::var_decl(
                VarDeclKind::Let,
                vec![(name.clone(), Some(Box::new(Expr::Class(class_expr))))],
            )];
            body.extend(this.static_initializers(&name, self_name.as_ref(), inits));
            body.push(factory::return_stmt(Box::new(Expr::Ident(name))));
            body
        });
        *factory::iife(body)
    }
}

fn member_kind(member: &ClassMember) -> &'static str {
    match member {
        ClassMember::Constructor(_) => "constructor",
        ClassMember::Method(_) => "method",
        ClassMember::PrivateMethod(_) => "private method",
        ClassMember::ClassProp(_) => "class field",
        ClassMember::PrivateProp(_) => "private field",
        ClassMember::TsIndexSignature(_) => "index signature",
        ClassMember::Empty(_) => "empty member",
        ClassMember::StaticBlock(_) => "static block",
        ClassMember::AutoAccessor(_) => "auto-accessor",
    }
}

/// Place `this.key = value;` statements in the constructor body: after the
/// first top-level statement that calls `super(...)` when the class is
/// derived, otherwise ahead of the body.
fn inject_initializers(ctor: Constructor, inits: Vec<FieldInit>, derived: bool) -> Constructor {
    let inits: Vec<Stmt> = inits
        .into_iter()
        .map(|init| factory::expr_stmt(factory::assign_member(factory::this_expr(), init.key, init.value)))
        .collect();
    let mut body = ctor.body.unwrap_or_else(|| factory::block(Vec::new()));
    let super_at = if derived {
        body.stmts.iter().position(contains_super_call)
    } else {
        None
    };
    body.stmts = match super_at {
        Some(at) => {
            body.stmts.splice(at + 1..at + 1, inits);
            body.stmts
        }
        None => factory::prepend_statements(body.stmts, inits),
    };
    Constructor {
        body: Some(body),
        ..ctor
    }
}

fn constructor_binds(ctor: &Constructor, name: &str) -> bool {
    let in_params = ctor.params.iter().any(|param| match param {
        ParamOrTsParamProp::Param(param) => pat_binds(&param.pat, name),
        ParamOrTsParamProp::TsParamProp(_) => false,
    });
    in_params
        || ctor
            .body
            .as_ref()
            .is_some_and(|body| var_scope_binds(&body.stmts, name) || lexically_binds(&body.stmts, name))
}

fn contains_super_call(stmt: &Stmt) -> bool {
    let mut finder = SuperCallFinder { found: false };
    stmt.visit_with(&mut finder);
    finder.found
}

/// `super(...)` belonging to this constructor; arrows share it, functions and
/// nested classes do not.
struct SuperCallFinder {
    found: bool,
}

impl Visit for SuperCallFinder {
    fn visit_call_expr(&mut self, call: &CallExpr) {
        if matches!(call.callee, Callee::Super(_)) {
            self.found = true;
            return;
        }
        call.visit_children_with(self);
    }

    fn visit_function(&mut self, _: &Function) {}

    fn visit_class(&mut self, _: &Class) {}
}

impl Fold for Es6ClassTransformer {
    fn fold_expr(&mut self, expr: Expr) -> Expr {
        match expr {
            Expr::Class(class) => self.lower_class_expr(class),
            other => other.fold_children_with(self),
        }
    }

    fn fold_stmts(&mut self, stmts: Vec<Stmt>) -> Vec<Stmt> {
        let mut out = Vec::with_capacity(stmts.len());
        for stmt in stmts {
            match stmt {
                Stmt::Decl(Decl::Class(decl)) => {
                    let (decl, statics) = self.lower_class_decl(decl);
                    out.push(Stmt::Decl(Decl::Class(decl)));
                    out.extend(statics);
                }
                other => out.push(other.fold_with(self)),
            }
        }
        out
    }

    fn fold_module_items(&mut self, items: Vec<ModuleItem>) -> Vec<ModuleItem> {
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            match item {
                ModuleItem::Stmt(Stmt::Decl(Decl::Class(decl))) => {
                    let (decl, statics) = self.lower_class_decl(decl);
                    out.push(ModuleItem::Stmt(Stmt::Decl(Decl::Class(decl))));
                    out.extend(statics.into_iter().map(ModuleItem::Stmt));
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
                    span,
                    decl: Decl::Class(decl),
                })) => {
                    let (decl, statics) = self.lower_class_decl(decl);
                    out.push(ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
                        span,
                        decl: Decl::Class(decl),
                    })));
                    out.extend(statics.into_iter().map(ModuleItem::Stmt));
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(ExportDefaultDecl {
                    span,
                    decl: DefaultDecl::Class(expr),
                })) => out.extend(self.lower_default_class(span, expr)),
                other => out.push(other.fold_with(self)),
            }
        }
        out
    }

    fn fold_module(&mut self, module: Module) -> Module {
        self.temps.reserve_names_in(&module);
        module.fold_children_with(self)
    }
}

impl Es6ClassTransformer {
    /// `export default class ...`: a named class keeps its declaration form;
    /// an anonymous one with statics is exported as the wrapped expression.
    fn lower_default_class(&mut self, span: swc_common::Span, expr: ClassExpr) -> Vec<ModuleItem> {
        let Some(ident) = expr.ident.clone() else {
            let lowered = self.lower_class_expr(expr);
            let item = match lowered {
                Expr::Class(expr) => ModuleDecl::ExportDefaultDecl(ExportDefaultDecl {
                    span,
                    decl: DefaultDecl::Class(expr),
                }),
                wrapped => ModuleDecl::ExportDefaultExpr(ExportDefaultExpr {
                    span,
                    expr: Box::new(wrapped),
                }),
            };
            return vec![ModuleItem::ModuleDecl(item)];
        };
        let (class, inits) = self.lower_class(*expr.class);
        let statics = self.static_initializers(&ident, None, inits);
        let decl = ModuleDecl::ExportDefaultDecl(ExportDefaultDecl {
            span,
            decl: DefaultDecl::Class(ClassExpr {
                class: Box::new(class),
                ..expr
            }),
        });
        std::iter::once(ModuleItem::ModuleDecl(decl))
            .chain(statics.into_iter().map(ModuleItem::Stmt))
            .collect()
    }
}

impl Transformer for Es6ClassTransformer {
    fn name(&self) -> &'static str {
        PASS
    }

    fn errors(&mut self) -> &mut ErrorSlot {
        &mut self.errors
    }
}

impl TempVarTransformer for Es6ClassTransformer {
    fn temps(&mut self) -> &mut TempVarManager {
        &mut self.temps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_lowers_to, parse};
    use pretty_assertions::assert_eq;

    fn lower(src: &str) -> Module {
        Es6ClassTransformer::new().run(parse(src)).unwrap()
    }

    #[test]
    fn instance_field_gets_a_default_constructor() {
        assert_lowers_to(
            lower("class A { x = 1; m() { return this.x; } }"),
            "class A { constructor() { this.x = 1; } m() { return this.x; } }",
        );
    }

    #[test]
    fn derived_default_constructor_calls_super_first() {
        assert_lowers_to(
            lower("class B extends A { x = 1; }"),
            "class B extends A { constructor(...args) { super(...args); this.x = 1; } }",
        );
    }

    #[test]
    fn initializers_follow_the_super_call() {
        assert_lowers_to(
            lower(
                "class B extends A { m() {} y; constructor(a) { log(a); super(a); use(this); } ['k' + 1] = 2; 'a-b' = 3; }",
            ),
            "class B extends A { m() {} constructor(a) { log(a); super(a); this['k' + 1] = 2; this['a-b'] = 3; use(this); } }",
        );
    }

    #[test]
    fn base_constructor_keeps_its_directives_first() {
        assert_lowers_to(
            lower("class A { constructor() { 'use strict'; go(); } x = f(); }"),
            "class A { constructor() { 'use strict'; this.x = f(); go(); } }",
        );
    }

    #[test]
    fn static_fields_follow_the_declaration() {
        assert_lowers_to(
            lower("function f() { class A { static x = 1; static y; static m() {} } return A; }"),
            r#"function f() {
                class A { static m() {} }
                Object.defineProperty(A, "x", {enumerable: true, configurable: true, value: 1, writable: true});
                return A;
            }"#,
        );
    }

    #[test]
    fn static_initializers_see_the_class_as_this() {
        assert_lowers_to(
            lower("class A { static x = 1; static y = this.x + 1; static f = function () { return this; }; }"),
            r#"
            class A {}
            Object.defineProperty(A, "x", {enumerable: true, configurable: true, value: 1, writable: true});
            Object.defineProperty(A, "y", {enumerable: true, configurable: true, value: A.x + 1, writable: true});
            Object.defineProperty(A, "f", {enumerable: true, configurable: true, value: function () { return this; }, writable: true});
            "#,
        );
    }

    #[test]
    fn class_expression_statics_refer_to_the_wrapped_class() {
        assert_lowers_to(
            lower("var C = class K { static a = 1; static b = K.a + this.a; m() { return K; } };"),
            r#"var C = (function () {
                let $__0 = class K { m() { return K; } };
                Object.defineProperty($__0, "a", {enumerable: true, configurable: true, value: 1, writable: true});
                Object.defineProperty($__0, "b", {enumerable: true, configurable: true, value: $__0.a + $__0.a, writable: true});
                return $__0;
            })();"#,
        );
    }

    #[test]
    fn constructor_bindings_make_way_for_moved_initializers() {
        assert_lowers_to(
            lower("var y = 1; class A { x = y; constructor(y) { this.z = y; } }"),
            "var y = 1; class A { constructor($__y) { this.x = y; this.z = $__y; } }",
        );
        assert_lowers_to(
            lower("class B extends A { x = n; constructor() { super(); var n = 2; use({n}); } }"),
            "class B extends A { constructor() { super(); this.x = n; var $__n = 2; use({n: $__n}); } }",
        );
    }

    #[test]
    fn class_expression_with_statics_is_wrapped() {
        assert_lowers_to(
            lower("var C = class extends B { static s = 2; i = 1; };"),
            r#"var C = (function () {
                let $__0 = class extends B { constructor(...args) { super(...args); this.i = 1; } };
                Object.defineProperty($__0, "s", {enumerable: true, configurable: true, value: 2, writable: true});
                return $__0;
            })();"#,
        );
    }

    #[test]
    fn exported_classes_keep_their_export() {
        assert_lowers_to(
            lower("export class A { static a = 1; } export default class { static b = 2; }"),
            r#"
            export class A {}
            Object.defineProperty(A, "a", {enumerable: true, configurable: true, value: 1, writable: true});
            export default (function () {
                let $__0 = class {};
                Object.defineProperty($__0, "b", {enumerable: true, configurable: true, value: 2, writable: true});
                return $__0;
            })();
            "#,
        );
    }

    #[test]
    fn nested_classes_are_lowered() {
        assert_lowers_to(
            lower("class A { m() { return class { y = 2; }; } }"),
            "class A { m() { return class { constructor() { this.y = 2; } }; } }",
        );
    }

    #[test]
    fn private_members_are_rejected() {
        let err = Es6ClassTransformer::new().run(parse("class A { #x = 1; }")).unwrap_err();
        assert_eq!(err, TransformError::unexpected(PASS, "private field"));
    }

    #[test]
    fn classes_without_fields_pass_through() {
        let module = parse("class A extends B { constructor() { super(); } get x() { return 1; } static m() {} }");
        assert_eq!(Es6ClassTransformer::new().run(module.clone()).unwrap(), module);
    }

    #[test]
    fn lowering_is_idempotent() {
        let once = lower("class A { x = 1; static y = 2; } var B = class { static z = 3; };");
        let twice = Es6ClassTransformer::new().run(once.clone()).unwrap();
        assert_eq!(twice, once);
    }
}
