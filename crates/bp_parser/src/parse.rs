use anyhow::{bail, Result};
use swc_common::{
    comments::SingleThreadedComments, errors::Handler, sync::Lrc, FileName, SourceFile, SourceMap,
};
use swc_ecma_ast::{EsVersion, Expr, Script};
use swc_ecma_parser::{EsSyntax, Syntax};

/// Result of parsing a source file.
pub struct ParseResult {
    pub module: swc_ecma_ast::Module,
    pub comments: SingleThreadedComments,
    pub source_map: Lrc<SourceMap>,
}

/// Parse a JavaScript source file as an ES module.
///
/// Syntax errors, including ones the parser recovered from, are reported to
/// stderr and fail the parse: the passes assume a well-formed tree.
pub fn parse_source(source: &str, filename: &str) -> Result<ParseResult> {
    let source_map: Lrc<SourceMap> = Default::default();
    let source_file = source_map.new_source_file(
        Lrc::new(FileName::Custom(filename.to_string())),
        source.to_string(),
    );

    let comments = SingleThreadedComments::default();

    let handler = Handler::with_emitter_writer(Box::new(std::io::stderr()), Some(source_map.clone()));

    let syntax = Syntax::Es(EsSyntax {
        jsx: filename.ends_with(".jsx"),
        ..Default::default()
    });

    let mut recovered = Vec::new();
    let module = swc_ecma_parser::parse_file_as_module(
        &source_file,
        syntax,
        EsVersion::latest(),
        Some(&comments),
        &mut recovered,
    )
    .map_err(|e| {
        e.into_diagnostic(&handler).emit();
        anyhow::anyhow!("failed to parse {filename}")
    })?;

    if !recovered.is_empty() {
        let count = recovered.len();
        for e in recovered {
            e.into_diagnostic(&handler).emit();
        }
        bail!("failed to parse {filename}: {count} syntax error(s)");
    }

    Ok(ParseResult {
        module,
        comments,
        source_map,
    })
}

/// Syntax accepted inside template snippets: a snippet is a fragment of a
/// function body or class, so `return` and `super` are allowed anywhere.
fn snippet_syntax() -> Syntax {
    Syntax::Es(EsSyntax {
        allow_return_outside_function: true,
        allow_super_outside_method: true,
        ..Default::default()
    })
}

fn snippet_file(src: &str) -> Lrc<SourceFile> {
    let source_map: Lrc<SourceMap> = Default::default();
    source_map.new_source_file(Lrc::new(FileName::Anon), src.to_string())
}

fn first_error(errors: Vec<swc_ecma_parser::error::Error>) -> Result<()> {
    match errors.into_iter().next() {
        Some(e) => bail!("{}", e.kind().msg()),
        None => Ok(()),
    }
}

/// Parse a snippet as a single expression.
pub fn parse_snippet_expr(src: &str) -> Result<Box<Expr>> {
    let file = snippet_file(src);
    let mut recovered = Vec::new();
    let expr = swc_ecma_parser::parse_file_as_expr(
        &file,
        snippet_syntax(),
        EsVersion::latest(),
        None,
        &mut recovered,
    )
    .map_err(|e| anyhow::anyhow!("{}", e.kind().msg()))?;
    first_error(recovered)?;
    Ok(expr)
}

/// Parse a snippet as a statement list.
pub fn parse_snippet_script(src: &str) -> Result<Script> {
    let file = snippet_file(src);
    let mut recovered = Vec::new();
    let script = swc_ecma_parser::parse_file_as_script(
        &file,
        snippet_syntax(),
        EsVersion::latest(),
        None,
        &mut recovered,
    )
    .map_err(|e| anyhow::anyhow!("{}", e.kind().msg()))?;
    first_error(recovered)?;
    Ok(script)
}
