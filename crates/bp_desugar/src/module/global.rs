use bp_ast::{factory, CompileOptions, ModuleFormat, ModuleName};
use bp_template::{parse_statement, TemplateError};
use bp_transform::{TempVarManager, TransformError};
use swc_ecma_ast::{Expr, Stmt};

use super::strategy::{file_path_to_binding_name, module_factory, Dependencies, ModuleContext, ModuleStrategy};

/// Script-tag output: each module publishes its exports in a global
/// `$__<name>` binding and reads its dependencies from theirs.
pub struct GlobalStrategy;

/// The global a module published under `path` is stored in.
pub fn global_binding_name(path: &str) -> String {
    format!("$__{}", file_path_to_binding_name(path))
}

impl ModuleStrategy for GlobalStrategy {
    fn format(&self) -> ModuleFormat {
        ModuleFormat::Global
    }

    /// Importers find the module by its path, so the name never depends on
    /// the anonymity options.
    fn get_module_name(&self, options: &CompileOptions, unit_name: Option<&str>) -> Option<String> {
        match &options.module_name {
            ModuleName::Explicit(name) => Some(name.clone()),
            _ => unit_name.map(str::to_string),
        }
    }

    fn transform_module_specifier(
        &self,
        specifier: &str,
        dependencies: &mut Dependencies,
        temps: &mut TempVarManager,
    ) -> Result<Box<Expr>, TransformError> {
        if let Some(local) = dependencies.local_of(specifier) {
            return Ok(Box::new(Expr::Ident(local.clone())));
        }
        let name = global_binding_name(specifier);
        if temps.is_reserved(&name) {
            return Err(TransformError::unexpected(
                "modules",
                format!("user binding `{name}` shadowing the global of {specifier:?}"),
            ));
        }
        temps.reserve(&name);
        let local = dependencies.local_for(specifier.to_string(), || factory::ident(&name));
        Ok(Box::new(Expr::Ident(local)))
    }

    fn wrap_module(&self, ctx: &ModuleContext, body: Vec<Stmt>) -> Result<Vec<Stmt>, TemplateError> {
        let func = module_factory(Vec::new(), body)?;
        let stmt = match ctx.name {
            Some(name) => parse_statement(
                "var $0 = ($1)();",
                vec![factory::ident(&global_binding_name(name)).into(), func.into()],
            )?,
            None => parse_statement("($0)();", vec![func.into()])?,
        };
        Ok(vec![stmt])
    }
}
