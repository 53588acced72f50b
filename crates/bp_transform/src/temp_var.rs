//! Hygienic temporaries.
//!
//! Every name the manager hands out is checked against the identifiers the
//! input module already uses and against every name minted before it, so
//! synthesized bindings can neither capture nor be captured by user code.

use std::collections::HashSet;

use bp_ast::factory;
use swc_ecma_ast::{BlockStmt, Ident, Module, ModuleItem, Stmt, VarDeclKind};
use swc_ecma_visit::{FoldWith, Visit, VisitWith};

use crate::Transformer;

/// Temporaries minted while one function body (or the module top level) was
/// open, in minting order.
#[derive(Debug, Default)]
struct TempScope {
    declared: Vec<Ident>,
}

#[derive(Debug)]
pub struct TempVarManager {
    reserved: HashSet<String>,
    counter: usize,
    /// `scopes[0]` is the root scope and is never popped.
    scopes: Vec<TempScope>,
}

impl Default for TempVarManager {
    fn default() -> Self {
        Self {
            reserved: HashSet::new(),
            counter: 0,
            scopes: vec![TempScope::default()],
        }
    }
}

impl TempVarManager {
    /// A manager that avoids every identifier appearing in `module`.
    pub fn for_module(module: &Module) -> Self {
        let mut manager = Self::default();
        manager.reserve_names_in(module);
        manager
    }

    pub fn reserve_names_in<N: VisitWith<NameCollector> + ?Sized>(&mut self, tree: &N) {
        self.reserved.extend(NameCollector::names_in(tree));
    }

    /// Keep `name` away from future temporaries.
    pub fn reserve(&mut self, name: &str) {
        self.reserved.insert(name.to_string());
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.contains(name)
    }

    fn mint(&mut self, hint: Option<&str>) -> Ident {
        let name = match hint {
            Some(hint) => {
                let base = format!("$__{}", sanitize(hint));
                let mut name = base.clone();
                let mut suffix = 0;
                while self.reserved.contains(&name) {
                    suffix += 1;
                    name = format!("{base}_{suffix}");
                }
                name
            }
            None => loop {
                let name = format!("$__{}", self.counter);
                self.counter += 1;
                if !self.reserved.contains(&name) {
                    break name;
                }
            },
        };
        tracing::trace!(%name, depth = self.scopes.len(), "minted temporary");
        self.reserved.insert(name.clone());
        factory::ident(&name)
    }

    /// Mint a temporary and register it for declaration in the innermost
    /// open scope.
    pub fn add_temp_var(&mut self, hint: Option<&str>) -> Ident {
        let ident = self.mint(hint);
        if let Some(scope) = self.scopes.last_mut() {
            scope.declared.push(ident.clone());
        }
        ident
    }

    /// Mint a temporary the caller declares itself.
    pub fn temp_identifier(&mut self, hint: Option<&str>) -> Ident {
        self.mint(hint)
    }

    pub fn push_temp_scope(&mut self) {
        self.scopes.push(TempScope::default());
    }

    /// Close the innermost scope and return the names it must declare.
    ///
    /// Returns `None` when only the root scope is left.
    pub fn pop_temp_scope(&mut self) -> Option<Vec<Ident>> {
        if self.scopes.len() == 1 {
            return None;
        }
        self.scopes.pop().map(|scope| scope.declared)
    }

    /// Drain temporaries registered while no scope was open.
    pub fn take_root_vars(&mut self) -> Vec<Ident> {
        std::mem::take(&mut self.scopes[0].declared)
    }

    /// Number of open scopes, not counting the root.
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }
}

/// `./lib/a-b` → `lib_a_b`
fn sanitize(hint: &str) -> String {
    let mut hint = hint;
    while let Some(rest) = hint.strip_prefix("./").or_else(|| hint.strip_prefix("../")) {
        hint = rest;
    }
    hint.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
        .collect()
}

/// Collects the text of every identifier in a tree.
#[derive(Default)]
pub struct NameCollector {
    names: HashSet<String>,
}

impl NameCollector {
    /// Every identifier text appearing in `tree`.
    pub fn names_in<N: VisitWith<Self> + ?Sized>(tree: &N) -> HashSet<String> {
        let mut collector = NameCollector::default();
        tree.visit_with(&mut collector);
        collector.names
    }
}

impl Visit for NameCollector {
    fn visit_ident(&mut self, ident: &Ident) {
        self.names.insert(ident.sym.to_string());
    }
}

/// `var a, b;` for the given temporaries, if there are any.
pub fn temp_var_decl(names: Vec<Ident>) -> Option<Stmt> {
    if names.is_empty() {
        return None;
    }
    Some(factory::var_decl(
        VarDeclKind::Var,
        names.into_iter().map(|name| (name, None)).collect(),
    ))
}

/// A [`Transformer`] that mints temporaries.
///
/// Scopes are opened and closed only through [`in_temp_scope`], which keeps
/// pushes and pops paired on every path.
///
/// [`in_temp_scope`]: TempVarTransformer::in_temp_scope
pub trait TempVarTransformer: Transformer {
    fn temps(&mut self) -> &mut TempVarManager;

    /// Run `f` inside a fresh scope; returns its result and the temporaries
    /// the scope must declare.
    fn in_temp_scope<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> (R, Vec<Ident>) {
        self.temps().push_temp_scope();
        let result = f(self);
        let declared = self.temps().pop_temp_scope().unwrap_or_default();
        (result, declared)
    }

    fn add_temp_var(&mut self, hint: Option<&str>) -> Ident {
        self.temps().add_temp_var(hint)
    }

    fn temp_identifier(&mut self, hint: Option<&str>) -> Ident {
        self.temps().temp_identifier(hint)
    }

    /// Fold a function body in its own scope and declare what it minted.
    fn transform_function_body(&mut self, body: BlockStmt) -> BlockStmt {
        let (mut body, declared) = self.in_temp_scope(|this| body.fold_with(this));
        if let Some(decl) = temp_var_decl(declared) {
            body.stmts = factory::prepend_statements(body.stmts, vec![decl]);
        }
        body
    }

    /// Fold a module's top level in its own scope and declare what it minted.
    fn transform_module_body(&mut self, items: Vec<ModuleItem>) -> Vec<ModuleItem> {
        let (items, mut declared) = self.in_temp_scope(|this| items.fold_with(this));
        declared.extend(self.temps().take_root_vars());
        match temp_var_decl(declared) {
            Some(decl) => factory::prepend_module_items(items, vec![decl]),
            None => items,
        }
    }
}
