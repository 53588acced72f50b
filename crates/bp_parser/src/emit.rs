use anyhow::Result;
use swc_common::{sync::Lrc, BytePos, LineCol, SourceMap, Span, DUMMY_SP};
use swc_ecma_ast::Module;
use swc_ecma_codegen::{text_writer::JsWriter, Emitter, Node};
use swc_ecma_visit::{VisitMut, VisitMutWith};

/// Generate source text for `module`, resolving spans against `cm`.
pub fn emit_module(module: &Module, cm: Lrc<SourceMap>) -> Result<String> {
    emit_module_with_source_map(module, cm, None)
}

/// Like [`emit_module`], also recording source-map entries into `srcmap`
/// for `SourceMap::build_source_map`.
pub fn emit_module_with_source_map(
    module: &Module,
    cm: Lrc<SourceMap>,
    srcmap: Option<&mut Vec<(BytePos, LineCol)>>,
) -> Result<String> {
    let mut buf = Vec::new();
    {
        let writer = JsWriter::new(cm.clone(), "\n", &mut buf, srcmap);
        let mut emitter = Emitter {
            cfg: swc_ecma_codegen::Config::default().with_target(swc_ecma_ast::EsVersion::latest()),
            cm,
            comments: None,
            wr: writer,
        };
        module.emit_with(&mut emitter)?;
    }
    Ok(String::from_utf8(buf)?)
}

/// Generate source text independent of source locations.
///
/// Two trees that differ only in spans print identically, which makes this
/// the comparison form for synthesized versus hand-written code.
pub fn print_module(module: &Module) -> Result<String> {
    let mut module = module.clone();
    erase_spans(&mut module);
    emit_module(&module, Default::default())
}

/// Resets every span it visits to `DUMMY_SP`.
pub struct SpanEraser;

impl VisitMut for SpanEraser {
    fn visit_mut_span(&mut self, span: &mut Span) {
        *span = DUMMY_SP;
    }
}

/// Reset every span in `tree` to `DUMMY_SP`.
pub fn erase_spans<N: VisitMutWith<SpanEraser> + ?Sized>(tree: &mut N) {
    tree.visit_mut_with(&mut SpanEraser);
}
