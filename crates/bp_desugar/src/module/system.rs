use bp_ast::{factory, ModuleFormat};
use bp_template::{parse_statement, parse_statements, TemplateError};
use swc_ecma_ast::{Expr, Stmt};

use super::strategy::{module_factory, ModuleContext, ModuleStrategy};

/// `System.registerModule(name, [deps], function () { ... })`, reading each
/// dependency with `System.get`.
pub struct SystemStrategy;

impl ModuleStrategy for SystemStrategy {
    fn format(&self) -> ModuleFormat {
        ModuleFormat::System
    }

    fn module_prolog(&self, ctx: &ModuleContext) -> Result<Vec<Stmt>, TemplateError> {
        ctx.dependencies
            .iter()
            .map(|dep| {
                parse_statement(
                    "var $0 = System.get($1);",
                    vec![dep.local.clone().into(), factory::str_lit(&dep.specifier).into()],
                )
            })
            .collect()
    }

    fn wrap_module(&self, ctx: &ModuleContext, body: Vec<Stmt>) -> Result<Vec<Stmt>, TemplateError> {
        let paths: Vec<Box<Expr>> = ctx.dependencies.iter().map(|dep| factory::str_expr(&dep.specifier)).collect();
        let func = module_factory(Vec::new(), body)?;
        match ctx.name {
            Some(name) => parse_statements(
                "System.registerModule($0, [$1], $2);",
                vec![factory::str_lit(name).into(), paths.into(), func.into()],
            ),
            None => parse_statements("System.register([$0], $1);", vec![paths.into(), func.into()]),
        }
    }
}
