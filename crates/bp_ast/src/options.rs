use serde::{Deserialize, Serialize};

/// Runtime loading convention the module pass targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    /// `module.exports` / `require` style.
    Commonjs,
    /// `define([deps], factory)` style.
    Amd,
    /// `System.registerModule(name, [deps], factory)` style.
    System,
    /// Factory IIFE bound to a global variable.
    Global,
    /// Leave `import`/`export` untouched.
    #[default]
    None,
}

impl std::fmt::Display for ModuleFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ModuleFormat::Commonjs => "commonjs",
            ModuleFormat::Amd => "amd",
            ModuleFormat::System => "system",
            ModuleFormat::Global => "global",
            ModuleFormat::None => "none",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ModuleFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "commonjs" | "cjs" => Ok(ModuleFormat::Commonjs),
            "amd" => Ok(ModuleFormat::Amd),
            "system" | "register" => Ok(ModuleFormat::System),
            "global" | "inline" => Ok(ModuleFormat::Global),
            "none" => Ok(ModuleFormat::None),
            other => Err(format!("unknown module format `{other}`")),
        }
    }
}

/// The `moduleName` option: absent/`false`, `true` (derive from the file
/// path), or an explicit name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawModuleName", into = "RawModuleName")]
pub enum ModuleName {
    #[default]
    Unset,
    FromPath,
    Explicit(String),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawModuleName {
    Flag(bool),
    Name(String),
}

impl From<RawModuleName> for ModuleName {
    fn from(raw: RawModuleName) -> Self {
        match raw {
            RawModuleName::Flag(false) => ModuleName::Unset,
            RawModuleName::Flag(true) => ModuleName::FromPath,
            RawModuleName::Name(name) => ModuleName::Explicit(name),
        }
    }
}

impl From<ModuleName> for RawModuleName {
    fn from(name: ModuleName) -> Self {
        match name {
            ModuleName::Unset => RawModuleName::Flag(false),
            ModuleName::FromPath => RawModuleName::Flag(true),
            ModuleName::Explicit(name) => RawModuleName::Name(name),
        }
    }
}

/// Options recognised by the desugaring pipeline.
///
/// Keys are camelCase; missing keys take their defaults and unknown keys are
/// ignored, so one options file can be shared with other tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    pub module_format: ModuleFormat,
    pub anonymous_modules: bool,
    pub bundle: bool,
    pub module_name: ModuleName,
    /// Lower `() => ...` to function expressions.
    pub arrow_functions: bool,
    /// Lower instance and static class fields.
    pub class_fields: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            module_format: ModuleFormat::None,
            anonymous_modules: false,
            bundle: false,
            module_name: ModuleName::Unset,
            arrow_functions: true,
            class_fields: true,
        }
    }
}

impl CompileOptions {
    /// Whether loader-registered modules should be emitted without a name.
    ///
    /// An explicit name always wins. Otherwise modules are anonymous when
    /// requested, or when they are compiled one at a time (not bundled) and
    /// no path-derived name was asked for.
    pub fn is_anonymous(&self) -> bool {
        match self.module_name {
            ModuleName::Explicit(_) => false,
            ModuleName::FromPath => self.anonymous_modules,
            ModuleName::Unset => self.anonymous_modules || !self.bundle,
        }
    }

    /// The module's name when it is not anonymous: the explicit name, or the
    /// compilation unit's path-derived name.
    pub fn resolve_module_name(&self, unit_name: Option<&str>) -> Option<String> {
        match &self.module_name {
            ModuleName::Explicit(name) => Some(name.clone()),
            _ if self.is_anonymous() => None,
            _ => unit_name.map(str::to_string),
        }
    }
}
