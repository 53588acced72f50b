use swc_ecma_ast::*;
use swc_ecma_visit::{Visit, VisitWith};

/// Free uses of `this` and `arguments` found in a tree.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ThisOrArguments {
    pub this: bool,
    pub arguments: bool,
}

/// Looks for `this`/`arguments` belonging to the scope the walk starts in.
///
/// Anything with its own receiver ends the descent: ordinary functions,
/// constructors, getters/setters, class field initializers and static
/// blocks. Arrow functions do not.
#[derive(Default)]
pub struct FindThisOrArguments {
    found: ThisOrArguments,
}

impl Visit for FindThisOrArguments {
    fn visit_this_expr(&mut self, _: &ThisExpr) {
        self.found.this = true;
    }

    fn visit_expr(&mut self, expr: &Expr) {
        if let Expr::Ident(ident) = expr {
            if &*ident.sym == "arguments" {
                self.found.arguments = true;
            }
            return;
        }
        expr.visit_children_with(self);
    }

    fn visit_prop(&mut self, prop: &Prop) {
        if let Prop::Shorthand(ident) = prop {
            if &*ident.sym == "arguments" {
                self.found.arguments = true;
            }
            return;
        }
        prop.visit_children_with(self);
    }

    fn visit_function(&mut self, _: &Function) {}

    fn visit_constructor(&mut self, _: &Constructor) {}

    fn visit_getter_prop(&mut self, prop: &GetterProp) {
        prop.key.visit_with(self);
    }

    fn visit_setter_prop(&mut self, prop: &SetterProp) {
        prop.key.visit_with(self);
    }

    fn visit_class_prop(&mut self, prop: &ClassProp) {
        prop.key.visit_with(self);
    }

    fn visit_private_prop(&mut self, _: &PrivateProp) {}

    fn visit_static_block(&mut self, _: &StaticBlock) {}
}

pub fn find_this_or_arguments<N: VisitWith<FindThisOrArguments> + ?Sized>(tree: &N) -> ThisOrArguments {
    let mut finder = FindThisOrArguments::default();
    tree.visit_with(&mut finder);
    finder.found
}

/// Does `tree` use `this` of the scope it sits in?
pub fn scope_contains_this<N: VisitWith<FindThisOrArguments> + ?Sized>(tree: &N) -> bool {
    find_this_or_arguments(tree).this
}
