//! Golden-file test harness for backport.
//!
//! Discovers `.input.js` files under `tests/fixtures/`, runs the pipeline
//! (parse → desugar → codegen), and compares the output against the
//! corresponding `.expected.js` file. Both sides are compared in printed
//! form, so expected files may be laid out by hand.
//!
//! A fixture whose first line is `// options: {...}` is compiled with those
//! options (same JSON shape as `bp compile --options`). The unit name is the
//! fixture path relative to `tests/fixtures/`, minus `.input.js`.
//!
//! Set `BP_UPDATE_FIXTURES=1` to overwrite expected files with actual output.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bp_ast::CompileOptions;
use bp_desugar::desugar_module;
use bp_parser::{emit_module, parse_source, print_module};

const INPUT_SUFFIX: &str = ".input.js";
const EXPECTED_SUFFIX: &str = ".expected.js";

fn fixtures_dir() -> PathBuf {
    // CARGO_MANIFEST_DIR is crates/bp_test/, so go up two levels to workspace root.
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
}

fn collect_input_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<_> = walkdir(dir)
        .into_iter()
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(INPUT_SUFFIX))
        })
        .collect();
    files.sort();
    files
}

fn walkdir(dir: &Path) -> Vec<PathBuf> {
    let mut result = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                result.extend(walkdir(&path));
            } else {
                result.push(path);
            }
        }
    }
    result
}

fn fixture_options(source: &str) -> Result<CompileOptions> {
    let first = source.lines().next().unwrap_or_default().trim();
    match first.strip_prefix("// options:") {
        Some(json) => serde_json::from_str(json.trim()).context("bad options line"),
        None => Ok(CompileOptions::default()),
    }
}

fn unit_name(input_path: &Path, fixtures: &Path) -> String {
    let relative = input_path.strip_prefix(fixtures).unwrap_or(input_path);
    let relative = relative.to_string_lossy().replace('\\', "/");
    relative.trim_end_matches(INPUT_SUFFIX).to_string()
}

fn run_pipeline(source: &str, filename: &str, unit_name: &str) -> Result<bp_ast::Module> {
    let options = fixture_options(source)?;
    let parsed = parse_source(source, filename)?;
    Ok(desugar_module(parsed.module, &options, Some(unit_name))?)
}

fn normalize(source: &str, filename: &str) -> Result<String> {
    print_module(&parse_source(source, filename)?.module)
}

#[test]
fn golden_file_tests() {
    let fixtures = fixtures_dir();
    let input_files = collect_input_files(&fixtures);

    assert!(
        !input_files.is_empty(),
        "No test fixtures found in {}",
        fixtures.display()
    );

    let update_mode = std::env::var("BP_UPDATE_FIXTURES").is_ok();
    let mut failures = Vec::new();

    for input_path in &input_files {
        let expected_path = PathBuf::from(
            input_path
                .to_string_lossy()
                .replace(INPUT_SUFFIX, EXPECTED_SUFFIX),
        );
        let test_name = unit_name(input_path, &fixtures);

        let source = match std::fs::read_to_string(input_path) {
            Ok(s) => s,
            Err(e) => {
                failures.push(format!("{test_name}: failed to read input: {e}"));
                continue;
            }
        };

        let filename = input_path.display().to_string();
        let module = match run_pipeline(&source, &filename, &test_name) {
            Ok(m) => m,
            Err(e) => {
                failures.push(format!("{test_name}: pipeline failed: {e:#}"));
                continue;
            }
        };

        if update_mode {
            let written = emit_module(&module, Default::default())
                .and_then(|text| Ok(std::fs::write(&expected_path, text)?));
            if let Err(e) = written {
                failures.push(format!("{test_name}: failed to write expected: {e}"));
            }
            continue;
        }

        let expected = match std::fs::read_to_string(&expected_path) {
            Ok(s) => s,
            Err(e) => {
                failures.push(format!(
                    "{test_name}: missing expected file {}: {e}",
                    expected_path.display()
                ));
                continue;
            }
        };

        let compared = print_module(&module)
            .and_then(|actual| Ok((actual, normalize(&expected, &expected_path.display().to_string())?)));
        match compared {
            Ok((actual, expected)) if actual.trim() != expected.trim() => failures.push(format!(
                "{test_name}: output mismatch\n--- expected ---\n{}\n--- actual ---\n{}",
                expected.trim(),
                actual.trim()
            )),
            Ok(_) => {}
            Err(e) => failures.push(format!("{test_name}: {e:#}")),
        }
    }

    if !failures.is_empty() {
        panic!(
            "\n{} golden test(s) failed:\n\n{}",
            failures.len(),
            failures.join("\n\n")
        );
    }
}

/// Compiled output must itself parse, and compiling the bare syntax passes
/// a second time must not change it.
#[test]
fn roundtrip_tests() {
    let fixtures = fixtures_dir().join("roundtrip");
    let input_files = collect_input_files(&fixtures);

    let mut failures = Vec::new();

    for input_path in &input_files {
        let test_name = unit_name(input_path, &fixtures);

        let source = match std::fs::read_to_string(input_path) {
            Ok(s) => s,
            Err(e) => {
                failures.push(format!("{test_name}: failed to read: {e}"));
                continue;
            }
        };

        let filename = input_path.display().to_string();
        let once = match run_pipeline(&source, &filename, &test_name).and_then(|m| print_module(&m)) {
            Ok(s) => s,
            Err(e) => {
                failures.push(format!("{test_name}: pipeline failed: {e:#}"));
                continue;
            }
        };

        let reparsed = match parse_source(&once, &format!("{test_name}.output.js")) {
            Ok(parsed) => parsed,
            Err(e) => {
                failures.push(format!(
                    "{test_name}: output does not parse: {e}\n--- output ---\n{}",
                    once.trim()
                ));
                continue;
            }
        };

        let twice = desugar_module(reparsed.module, &CompileOptions::default(), Some(&test_name))
            .map_err(anyhow::Error::from)
            .and_then(|m| print_module(&m));
        match twice {
            Ok(twice) if twice != once => failures.push(format!(
                "{test_name}: second compile changed the output\n--- once ---\n{}\n--- twice ---\n{}",
                once.trim(),
                twice.trim()
            )),
            Ok(_) => {}
            Err(e) => failures.push(format!("{test_name}: second compile failed: {e:#}")),
        }
    }

    if !failures.is_empty() {
        panic!(
            "\n{} roundtrip test(s) failed:\n\n{}",
            failures.len(),
            failures.join("\n\n")
        );
    }
}
