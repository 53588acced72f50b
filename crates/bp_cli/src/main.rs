use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bp_ast::{CompileOptions, ModuleFormat, ModuleName};
use bp_desugar::desugar_module;
use bp_parser::{emit_module_with_source_map, parse_source};
use clap::{Parser, Subcommand};
use swc_common::source_map::DefaultSourceMapGenConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bp", about = "backport: compile modern JavaScript down to older syntax and module formats")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse, desugar, and emit the lowered module.
    Compile {
        /// Input .js file.
        input: PathBuf,
        /// Output file (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Target module format: amd, commonjs, system, global or none.
        #[arg(long, value_name = "FORMAT")]
        modules: Option<ModuleFormat>,
        /// Register the module under NAME, or under its path when NAME is omitted.
        #[arg(long, value_name = "NAME", num_args = 0..=1, default_missing_value = "")]
        module_name: Option<String>,
        /// Never name registered modules.
        #[arg(long)]
        anonymous_modules: bool,
        /// The module is compiled as part of a bundle.
        #[arg(long)]
        bundle: bool,
        /// JSON file with compile options; flags take precedence.
        #[arg(long, value_name = "FILE")]
        options: Option<PathBuf>,
        /// Generate a source map.
        #[arg(long)]
        source_map: bool,
    },
    /// Parse the file and report any syntax errors.
    Check { input: PathBuf },
    /// Parse and dump the AST.
    Parse {
        input: PathBuf,
        /// Print JSON instead of the debug representation.
        #[arg(long)]
        ast: bool,
    },
}

/// Log to stderr when `BP_LOG` (or `RUST_LOG`) is set.
fn init_tracing() {
    let Ok(filter) = std::env::var("BP_LOG").or_else(|_| std::env::var("RUST_LOG")) else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
}

fn load_options(path: Option<&Path>) -> Result<CompileOptions> {
    let Some(path) = path else {
        return Ok(CompileOptions::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid options in {}", path.display()))
}

/// `src/lib/util.js` → `src/lib/util`
fn unit_name(input: &Path) -> String {
    input.with_extension("").to_string_lossy().replace('\\', "/")
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            input,
            output,
            modules,
            module_name,
            anonymous_modules,
            bundle,
            options,
            source_map,
        } => {
            let mut compile_options = load_options(options.as_deref())?;
            if let Some(format) = modules {
                compile_options.module_format = format;
            }
            match module_name {
                Some(name) if name.is_empty() => compile_options.module_name = ModuleName::FromPath,
                Some(name) => compile_options.module_name = ModuleName::Explicit(name),
                None => {}
            }
            compile_options.anonymous_modules |= anonymous_modules;
            compile_options.bundle |= bundle;

            let source = std::fs::read_to_string(&input)?;
            let filename = input.display().to_string();
            tracing::debug!(input = %filename, format = %compile_options.module_format, "compiling");
            let parsed = parse_source(&source, &filename)?;
            let module = desugar_module(parsed.module, &compile_options, Some(&unit_name(&input)))
                .with_context(|| format!("failed to compile {filename}"))?;

            let mut srcmap_buf = if source_map { Some(vec![]) } else { None };
            let output_str =
                emit_module_with_source_map(&module, parsed.source_map.clone(), srcmap_buf.as_mut())?;

            match &output {
                Some(path) => std::fs::write(path, &output_str)?,
                None => print!("{output_str}"),
            }

            if let Some(srcmap_data) = srcmap_buf {
                let srcmap = parsed
                    .source_map
                    .build_source_map(&srcmap_data, None, DefaultSourceMapGenConfig);
                let mut srcmap_json = vec![];
                srcmap
                    .to_writer(&mut srcmap_json)
                    .context("failed to serialize source map")?;

                let map_path = match &output {
                    Some(path) => format!("{}.map", path.display()),
                    None => format!("{filename}.map"),
                };
                std::fs::write(&map_path, &srcmap_json)?;
                eprintln!("Source map written to {map_path}");
            }
        }
        Commands::Check { input } => {
            let source = std::fs::read_to_string(&input)?;
            let filename = input.display().to_string();
            parse_source(&source, &filename)?;
            eprintln!("OK: {filename}");
        }
        Commands::Parse { input, ast } => {
            let source = std::fs::read_to_string(&input)?;
            let filename = input.display().to_string();
            let parsed = parse_source(&source, &filename)?;

            if ast {
                let json = serde_json::to_string_pretty(&parsed.module)?;
                println!("{json}");
            } else {
                println!("{:#?}", parsed.module);
            }
        }
    }

    Ok(())
}
