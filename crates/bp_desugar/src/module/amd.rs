//! `define([deps], function (locals) { ... })`

use bp_ast::{factory, ModuleFormat};
use bp_template::{parse_statements, TemplateError};
use swc_ecma_ast::{Expr, Pat, Stmt};

use super::strategy::{interop_guard, module_factory, ModuleContext, ModuleStrategy};

pub struct AmdStrategy;

impl ModuleStrategy for AmdStrategy {
    fn format(&self) -> ModuleFormat {
        ModuleFormat::Amd
    }

    /// AMD loaders resolve module ids, not file names.
    fn dependency_path(&self, specifier: &str) -> String {
        specifier.strip_suffix(".js").unwrap_or(specifier).to_string()
    }

    fn module_prolog(&self, ctx: &ModuleContext) -> Result<Vec<Stmt>, TemplateError> {
        ctx.dependencies.iter().map(|dep| interop_guard(&dep.local)).collect()
    }

    fn export_marker(&self) -> bool {
        true
    }

    fn wrap_module(&self, ctx: &ModuleContext, body: Vec<Stmt>) -> Result<Vec<Stmt>, TemplateError> {
        let params = ctx
            .dependencies
            .iter()
            .map(|dep| factory::param(Pat::Ident(dep.local.clone().into())))
            .collect();
        let paths: Vec<Box<Expr>> = ctx.dependencies.iter().map(|dep| factory::str_expr(&dep.specifier)).collect();
        let func = module_factory(params, body)?;
        match ctx.name {
            Some(name) => parse_statements(
                "define($0, [$1], $2);",
                vec![factory::str_lit(name).into(), paths.into(), func.into()],
            ),
            None => parse_statements("define([$0], $1);", vec![paths.into(), func.into()]),
        }
    }
}
