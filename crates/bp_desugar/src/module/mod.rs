//! Module wrapping.
//!
//! Declarative `import`/`export` forms are lowered to plain bindings and an
//! export object, then the whole unit is put in the envelope of the target
//! loader:
//!
//! ```text
//! import {x} from "./dep.js";          define(["./dep"], function ($__dep) {
//! export var y = x + 1;          →       "use strict";
//!                                        var __moduleName = null;
//!                                        if (!$__dep || !$__dep.__esModule) $__dep = {default: $__dep};
//!                                        var x = $__dep.x;
//!                                        var y = x + 1;
//!                                        return {get y() { return y; }, __esModule: true};
//!                                      });
//! ```
//!
//! The format-specific parts live behind [`ModuleStrategy`].

mod amd;
mod commonjs;
mod global;
mod strategy;
mod system;

pub use amd::AmdStrategy;
pub use commonjs::CommonJsStrategy;
pub use global::{global_binding_name, GlobalStrategy};
pub use system::SystemStrategy;
pub use strategy::{
    file_path_to_binding_name, strategy_for, Dependencies, Dependency, ModuleContext, ModuleStrategy,
};

use bp_ast::{factory, CompileOptions};
use bp_template::{parse_property_definition, parse_statement, Subst};
use bp_transform::scope::bindings::pat_idents;
use bp_transform::{ErrorSlot, TempVarManager, TempVarTransformer, TransformError, Transformer};
use swc_common::DUMMY_SP;
use swc_ecma_ast::*;
use swc_ecma_visit::Fold;

const PASS: &str = "modules";

/// Copies the exports of an `export * from` dependency onto the export
/// object, skipping `default` and names the module exports itself.
const STAR_EXPORT: &str = r#"Object.keys($0).forEach(function (key) {
    if (key !== "default" && !Object.prototype.hasOwnProperty.call($1, key))
        Object.defineProperty($1, key, {enumerable: true, get: function () { return $0[key]; }});
});"#;

/// One entry of the export object.
struct ExportBinding {
    name: String,
    value: Box<Expr>,
}

#[derive(Default)]
struct Exports {
    bindings: Vec<ExportBinding>,
    star: Vec<Box<Expr>>,
}

impl Exports {
    fn bind(&mut self, name: impl Into<String>, value: Box<Expr>) {
        self.bindings.push(ExportBinding {
            name: name.into(),
            value,
        });
    }

    fn is_empty(&self) -> bool {
        self.bindings.is_empty() && self.star.is_empty()
    }
}

/// The statement lists a unit's module items are sorted into.
#[derive(Default)]
struct Lowered {
    imports: Vec<Stmt>,
    body: Vec<Stmt>,
    exports: Exports,
}

pub struct ModuleTransformer {
    strategy: &'static dyn ModuleStrategy,
    options: CompileOptions,
    unit_name: Option<String>,
    dependencies: Dependencies,
    temps: TempVarManager,
    errors: ErrorSlot,
}

impl ModuleTransformer {
    /// A transformer for the configured format; `None` when modules are
    /// left as they are.
    pub fn new(options: &CompileOptions, unit_name: Option<&str>) -> Option<Self> {
        let strategy = strategy_for(options.module_format)?;
        Some(Self::with_strategy(strategy, options, unit_name))
    }

    pub fn with_strategy(
        strategy: &'static dyn ModuleStrategy,
        options: &CompileOptions,
        unit_name: Option<&str>,
    ) -> Self {
        Self {
            strategy,
            options: options.clone(),
            unit_name: unit_name.map(str::to_string),
            dependencies: Dependencies::default(),
            temps: TempVarManager::default(),
            errors: ErrorSlot::default(),
        }
    }

    /// Dependencies recorded by the last run, in first-use order.
    pub fn dependencies(&self) -> &[Dependency] {
        self.dependencies.as_slice()
    }

    pub fn module_name(&self) -> Option<String> {
        self.strategy.get_module_name(&self.options, self.unit_name.as_deref())
    }

    fn specifier(&mut self, src: &Str) -> Result<Box<Expr>, TransformError> {
        let strategy = self.strategy;
        strategy.transform_module_specifier(&factory::str_value(src), &mut self.dependencies, &mut self.temps)
    }

    fn lower(&mut self, items: Vec<ModuleItem>) -> Result<Vec<Stmt>, TransformError> {
        let mut lowered = Lowered::default();
        let mut in_prologue = true;
        for item in items {
            match item {
                ModuleItem::Stmt(stmt) => {
                    in_prologue = in_prologue && factory::is_directive(&stmt);
                    if in_prologue && factory::is_use_strict(&stmt) {
                        continue;
                    }
                    lowered.body.push(stmt);
                }
                ModuleItem::ModuleDecl(decl) => {
                    in_prologue = false;
                    self.lower_module_decl(decl, &mut lowered)?;
                }
            }
        }

        let epilog = self.export_epilog(lowered.exports)?;
        let name = self.module_name();
        tracing::debug!(
            format = %self.strategy.format(),
            name = name.as_deref().unwrap_or("<anonymous>"),
            dependencies = self.dependencies.as_slice().len(),
            "wrapping module"
        );
        let ctx = ModuleContext {
            name: name.as_deref(),
            dependencies: self.dependencies.as_slice(),
        };
        let mut stmts = shared_prolog(ctx.name);
        stmts.extend(self.strategy.module_prolog(&ctx)?);
        stmts.extend(lowered.imports);
        stmts.extend(lowered.body);
        stmts.extend(epilog);
        Ok(self.strategy.wrap_module(&ctx, stmts)?)
    }

    fn lower_module_decl(&mut self, decl: ModuleDecl, lowered: &mut Lowered) -> Result<(), TransformError> {
        match decl {
            ModuleDecl::Import(import) => {
                if import.type_only {
                    return Ok(());
                }
                let dep = self.specifier(&import.src)?;
                let mut decls = Vec::new();
                for specifier in import.specifiers {
                    match specifier {
                        ImportSpecifier::Default(s) => decls.push((s.local, Some(factory::member(dep.clone(), "default")))),
                        ImportSpecifier::Namespace(s) => decls.push((s.local, Some(dep.clone()))),
                        ImportSpecifier::Named(s) if s.is_type_only => {}
                        ImportSpecifier::Named(s) => {
                            let value = match s.imported {
                                Some(imported) => export_member(dep.clone(), imported),
                                None => factory::member(dep.clone(), &s.local.sym),
                            };
                            decls.push((s.local, Some(value)));
                        }
                    }
                }
                if !decls.is_empty() {
                    lowered.imports.push(factory::var_decl(VarDeclKind::Var, decls));
                }
            }
            ModuleDecl::ExportDecl(ExportDecl { decl, .. }) => {
                for name in declared_names(&decl)? {
                    lowered.exports.bind(name.sym.to_string(), Box::new(Expr::Ident(name)));
                }
                lowered.body.push(Stmt::Decl(decl));
            }
            ModuleDecl::ExportNamed(named) => {
                if named.type_only {
                    return Ok(());
                }
                let source = named.src.as_deref().map(|src| self.specifier(src)).transpose()?;
                for specifier in named.specifiers {
                    match (specifier, &source) {
                        (ExportSpecifier::Named(s), _) if s.is_type_only => {}
                        (ExportSpecifier::Named(s), source) => {
                            let exported = export_name(s.exported.as_ref().unwrap_or(&s.orig));
                            let value = match (source, s.orig) {
                                (Some(dep), orig) => export_member(dep.clone(), orig),
                                (None, ModuleExportName::Ident(local)) => Box::new(Expr::Ident(local)),
                                (None, ModuleExportName::Str(_)) => {
                                    return Err(TransformError::unexpected(PASS, "string export without a source"));
                                }
                            };
                            lowered.exports.bind(exported, value);
                        }
                        (ExportSpecifier::Namespace(s), Some(dep)) => lowered.exports.bind(export_name(&s.name), dep.clone()),
                        (ExportSpecifier::Namespace(_), None) => {
                            return Err(TransformError::unexpected(PASS, "namespace export without a source"));
                        }
                        (ExportSpecifier::Default(_), _) => {
                            return Err(TransformError::unexpected(PASS, "default export specifier"));
                        }
                    }
                }
            }
            ModuleDecl::ExportDefaultDecl(ExportDefaultDecl { decl, .. }) => {
                let (ident, decl) = match decl {
                    DefaultDecl::Fn(FnExpr { ident, function }) => {
                        let ident = ident.unwrap_or_else(|| self.temp_identifier(Some("default")));
                        let decl = Decl::Fn(FnDecl {
                            ident: ident.clone(),
                            declare: false,
                            function,
                        });
                        (ident, decl)
                    }
                    DefaultDecl::Class(ClassExpr { ident, class }) => {
                        let ident = ident.unwrap_or_else(|| self.temp_identifier(Some("default")));
                        let decl = Decl::Class(ClassDecl {
                            ident: ident.clone(),
                            declare: false,
                            class,
                        });
                        (ident, decl)
                    }
                    DefaultDecl::TsInterfaceDecl(_) => {
                        return Err(TransformError::unexpected(PASS, "interface export"));
                    }
                };
                lowered.exports.bind("default", Box::new(Expr::Ident(ident)));
                lowered.body.push(Stmt::Decl(decl));
            }
            ModuleDecl::ExportDefaultExpr(ExportDefaultExpr { expr, .. }) => {
                let local = self.temp_identifier(Some("default"));
                lowered
                    .body
                    .push(factory::var_decl(VarDeclKind::Var, vec![(local.clone(), Some(expr))]));
                lowered.exports.bind("default", Box::new(Expr::Ident(local)));
            }
            ModuleDecl::ExportAll(all) => {
                if !all.type_only {
                    let dep = self.specifier(&all.src)?;
                    lowered.exports.star.push(dep);
                }
            }
            ModuleDecl::TsImportEquals(_) => return Err(TransformError::unexpected(PASS, "`import =` declaration")),
            ModuleDecl::TsExportAssignment(_) => return Err(TransformError::unexpected(PASS, "`export =` assignment")),
            ModuleDecl::TsNamespaceExport(_) => return Err(TransformError::unexpected(PASS, "namespace export")),
        }
        Ok(())
    }

    /// The statements that publish the export object; none when the unit
    /// exports nothing.
    fn export_epilog(&mut self, exports: Exports) -> Result<Vec<Stmt>, TransformError> {
        if exports.is_empty() {
            return Ok(Vec::new());
        }
        let mut props = Vec::with_capacity(exports.bindings.len() + 1);
        for binding in exports.bindings {
            props.push(parse_property_definition(
                "get $0() { return $1; }",
                vec![export_key(&binding.name), binding.value.into()],
            )?);
        }
        if self.strategy.export_marker() {
            props.push(parse_property_definition("__esModule: true", Vec::new())?);
        }
        let object = Box::new(Expr::Object(ObjectLit { span: DUMMY_SP, props }));

        if exports.star.is_empty() {
            return Ok(vec![self.strategy.export_statement(object)?]);
        }
        let target = self.temp_identifier(Some("exports"));
        let mut stmts = vec![factory::var_decl(VarDeclKind::Var, vec![(target.clone(), Some(object))])];
        for dep in exports.star {
            stmts.push(parse_statement(STAR_EXPORT, vec![dep.into(), target.clone().into()])?);
        }
        stmts.push(self.strategy.export_statement(Box::new(Expr::Ident(target)))?);
        Ok(stmts)
    }
}

/// `"use strict"; var __moduleName = "name";` (`null` when anonymous).
fn shared_prolog(name: Option<&str>) -> Vec<Stmt> {
    let name = match name {
        Some(name) => factory::str_expr(name),
        None => Box::new(Expr::Lit(Lit::Null(Null { span: DUMMY_SP }))),
    };
    vec![
        factory::expr_stmt(factory::str_expr("use strict")),
        factory::var_decl(VarDeclKind::Var, vec![(factory::ident("__moduleName"), Some(name))]),
    ]
}

fn declared_names(decl: &Decl) -> Result<Vec<Ident>, TransformError> {
    match decl {
        Decl::Var(var) => Ok(var.decls.iter().flat_map(|d| pat_idents(&d.name)).collect()),
        Decl::Fn(function) => Ok(vec![function.ident.clone()]),
        Decl::Class(class) => Ok(vec![class.ident.clone()]),
        Decl::Using(_) => Err(TransformError::unexpected(PASS, "exported `using` declaration")),
        Decl::TsInterface(_) | Decl::TsTypeAlias(_) | Decl::TsEnum(_) | Decl::TsModule(_) => {
            Err(TransformError::unexpected(PASS, "exported type declaration"))
        }
    }
}

fn export_name(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::Ident(ident) => ident.sym.to_string(),
        ModuleExportName::Str(s) => factory::str_value(s),
    }
}

/// `dep.name`, or `dep["name"]` for string export names.
fn export_member(dep: Box<Expr>, name: ModuleExportName) -> Box<Expr> {
    match name {
        ModuleExportName::Ident(ident) => factory::member(dep, &ident.sym),
        ModuleExportName::Str(s) => Box::new(Expr::Member(factory::member_for_key(dep, PropName::Str(s)))),
    }
}

/// An export-object key: an identifier name where possible.
fn export_key(name: &str) -> Subst {
    let mut chars = name.chars();
    let is_ident = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_ident {
        factory::ident(name).into()
    } else {
        factory::str_lit(name).into()
    }
}

impl Fold for ModuleTransformer {
    fn fold_module(&mut self, module: Module) -> Module {
        self.temps.reserve_names_in(&module);
        let body = match self.lower(module.body) {
            Ok(stmts) => stmts.into_iter().map(ModuleItem::Stmt).collect(),
            Err(error) => {
                self.errors.record(error);
                Vec::new()
            }
        };
        Module { body, ..module }
    }
}

impl Transformer for ModuleTransformer {
    fn name(&self) -> &'static str {
        PASS
    }

    fn errors(&mut self) -> &mut ErrorSlot {
        &mut self.errors
    }
}

impl TempVarTransformer for ModuleTransformer {
    fn temps(&mut self) -> &mut TempVarManager {
        &mut self.temps
    }
}

#[cfg(test)]
mod tests;
