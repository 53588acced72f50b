//! The module-format capability interface and helpers shared by its
//! implementations.

use bp_ast::{factory, CompileOptions, ModuleFormat};
use bp_template::{parse_expression, parse_statement, TemplateError};
use bp_transform::scope::scope_contains_this;
use bp_transform::{TempVarManager, TransformError};
use swc_ecma_ast::{Expr, Ident, Param, Stmt};

use super::{AmdStrategy, CommonJsStrategy, GlobalStrategy, SystemStrategy};

/// A module the unit being compiled depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct Dependency {
    /// The specifier as it appears in the emitted loader call.
    pub specifier: String,
    /// The binding the unit reads the dependency's exports from.
    pub local: Ident,
}

/// Dependencies in first-use order, one per normalized specifier.
#[derive(Debug, Default)]
pub struct Dependencies(Vec<Dependency>);

impl Dependencies {
    /// The binding already recorded for `specifier`.
    pub fn local_of(&self, specifier: &str) -> Option<&Ident> {
        self.0.iter().find(|dep| dep.specifier == specifier).map(|dep| &dep.local)
    }

    /// The binding for `specifier`, minting one on first use.
    pub fn local_for(&mut self, specifier: String, mint: impl FnOnce() -> Ident) -> Ident {
        if let Some(local) = self.local_of(&specifier) {
            return local.clone();
        }
        let local = mint();
        self.0.push(Dependency {
            specifier,
            local: local.clone(),
        });
        local
    }

    pub fn as_slice(&self) -> &[Dependency] {
        &self.0
    }
}

/// What a strategy sees when it builds the prolog and the envelope.
pub struct ModuleContext<'a> {
    pub name: Option<&'a str>,
    pub dependencies: &'a [Dependency],
}

/// One target module format.
pub trait ModuleStrategy: Sync {
    fn format(&self) -> ModuleFormat;

    /// The registered name of the unit, or `None` for an anonymous module.
    fn get_module_name(&self, options: &CompileOptions, unit_name: Option<&str>) -> Option<String> {
        options.resolve_module_name(unit_name)
    }

    /// How `specifier` is spelled in the dependency list.
    fn dependency_path(&self, specifier: &str) -> String {
        specifier.to_string()
    }

    /// Record `specifier` as a dependency and return the expression user code
    /// reads its exports from.
    fn transform_module_specifier(
        &self,
        specifier: &str,
        dependencies: &mut Dependencies,
        temps: &mut TempVarManager,
    ) -> Result<Box<Expr>, TransformError> {
        let path = self.dependency_path(specifier);
        let local = dependencies.local_for(path, || {
            temps.temp_identifier(Some(&file_path_to_binding_name(specifier)))
        });
        Ok(Box::new(Expr::Ident(local)))
    }

    /// Format-specific statements after `"use strict"` and `__moduleName`.
    fn module_prolog(&self, _ctx: &ModuleContext) -> Result<Vec<Stmt>, TemplateError> {
        Ok(Vec::new())
    }

    /// Whether the export object carries `__esModule: true`.
    fn export_marker(&self) -> bool {
        false
    }

    /// Hand the export object to the loader.
    fn export_statement(&self, exports: Box<Expr>) -> Result<Stmt, TemplateError> {
        parse_statement("return $0;", vec![exports.into()])
    }

    /// Put the module body in the format's envelope.
    fn wrap_module(&self, ctx: &ModuleContext, body: Vec<Stmt>) -> Result<Vec<Stmt>, TemplateError>;
}

pub fn strategy_for(format: ModuleFormat) -> Option<&'static dyn ModuleStrategy> {
    match format {
        ModuleFormat::Amd => Some(&AmdStrategy),
        ModuleFormat::Commonjs => Some(&CommonJsStrategy),
        ModuleFormat::System => Some(&SystemStrategy),
        ModuleFormat::Global => Some(&GlobalStrategy),
        ModuleFormat::None => None,
    }
}

/// `./lib/a-b.js` → `lib_a_b`
pub fn file_path_to_binding_name(path: &str) -> String {
    let mut name = path;
    while let Some(rest) = name.strip_prefix("./").or_else(|| name.strip_prefix("../")) {
        name = rest;
    }
    let name = name.strip_suffix(".js").unwrap_or(name);
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
        .collect()
}

/// `if (!dep || !dep.__esModule) dep = {default: dep};`
pub(super) fn interop_guard(local: &Ident) -> Result<Stmt, TemplateError> {
    parse_statement(
        "if (!$0 || !$0.__esModule) $0 = {default: $0};",
        vec![local.clone().into()],
    )
}

/// The module factory: `function (params) { body }`, bound to the global
/// object when the body uses top-level `this`.
pub(super) fn module_factory(params: Vec<Param>, body: Vec<Stmt>) -> Result<Box<Expr>, TemplateError> {
    let has_top_level_this = body.iter().any(|stmt| scope_contains_this(stmt));
    let function = factory::fn_expr(factory::function(
        Default::default(),
        params,
        factory::block(body),
        false,
    ));
    if !has_top_level_this {
        return Ok(function);
    }
    tracing::debug!("binding module factory to the global object");
    parse_expression(
        "($0).bind(typeof global !== \"undefined\" ? global : this)",
        vec![function.into()],
    )
}
