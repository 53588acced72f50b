use bp_ast::{factory, CompileOptions, ModuleFormat, ModuleName};
use bp_template::{parse_statement, TemplateError};
use swc_ecma_ast::{Expr, Stmt};

use super::strategy::{interop_guard, ModuleContext, ModuleStrategy};

/// Flat output: dependencies come from `require`, exports go to
/// `module.exports`.
pub struct CommonJsStrategy;

impl ModuleStrategy for CommonJsStrategy {
    fn format(&self) -> ModuleFormat {
        ModuleFormat::Commonjs
    }

    /// Node identifies modules by path, so only an explicit name is kept.
    fn get_module_name(&self, options: &CompileOptions, _unit_name: Option<&str>) -> Option<String> {
        match &options.module_name {
            ModuleName::Explicit(name) => Some(name.clone()),
            _ => None,
        }
    }

    fn module_prolog(&self, ctx: &ModuleContext) -> Result<Vec<Stmt>, TemplateError> {
        let mut prolog = Vec::with_capacity(ctx.dependencies.len() * 2);
        for dep in ctx.dependencies {
            prolog.push(parse_statement(
                "var $0 = require($1);",
                vec![dep.local.clone().into(), factory::str_lit(&dep.specifier).into()],
            )?);
        }
        for dep in ctx.dependencies {
            prolog.push(interop_guard(&dep.local)?);
        }
        Ok(prolog)
    }

    fn export_marker(&self) -> bool {
        true
    }

    fn export_statement(&self, exports: Box<Expr>) -> Result<Stmt, TemplateError> {
        parse_statement("module.exports = $0;", vec![exports.into()])
    }

    fn wrap_module(&self, _ctx: &ModuleContext, body: Vec<Stmt>) -> Result<Vec<Stmt>, TemplateError> {
        Ok(body)
    }
}
