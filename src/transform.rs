//! Transform Driver for envfold
//!
//! parse → collect import bindings → fold conditions → print.
//! Each call owns its allocator, binding table and log, so files can be
//! transformed concurrently without coordination.

use oxc_allocator::Allocator;
use oxc_ast_visit::VisitMut;
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_span::SourceType;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bindings::{BindingTable, ModuleMatcher};
use crate::config::{TargetConfig, TransformOptions};
use crate::error::{Result, TransformError};
use crate::rewriter::ConditionFolder;
use crate::static_eval::Evaluator;

const ANONYMOUS_FILENAME: &str = "<input>";

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    Property,
    Combinator,
    Feature,
    Decorator,
}

impl TransformKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransformKind::Property => "property",
            TransformKind::Combinator => "combinator",
            TransformKind::Feature => "feature",
            TransformKind::Decorator => "decorator",
        }
    }
}

/// One applied rewrite. `line` is 1-indexed, `column` 0-indexed (in
/// characters), both pointing at the original node's first character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationRecord {
    pub kind: TransformKind,
    pub original: String,
    pub replacement: String,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResult {
    pub code: String,
    pub transform_count: usize,
    pub transformations: Vec<TransformationRecord>,
    /// Always `None`: source maps are not produced.
    pub source_map: Option<String>,
}

impl TransformResult {
    fn unchanged(source: &str) -> Self {
        Self {
            code: source.to_string(),
            transform_count: 0,
            transformations: Vec::new(),
            source_map: None,
        }
    }

    pub fn is_changed(&self) -> bool {
        self.transform_count > 0
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// POSITIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Byte offset → (line, column) lookup over the original source text.
pub struct LineIndex<'s> {
    source: &'s str,
    line_starts: Vec<usize>,
}

impl<'s> LineIndex<'s> {
    pub fn new(source: &'s str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            source,
            line_starts,
        }
    }

    pub fn position(&self, offset: u32) -> (u32, u32) {
        let offset = (offset as usize).min(self.source.len());
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let start = self.line_starts[line];
        let column = self
            .source
            .get(start..offset)
            .map_or(0, |text| text.chars().count());
        (line as u32 + 1, column as u32)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENTRY POINT
// ═══════════════════════════════════════════════════════════════════════════════

fn source_type_for(filename: Option<&str>) -> SourceType {
    let fallback = SourceType::default()
        .with_typescript(true)
        .with_module(true);
    match filename {
        Some(name) => SourceType::from_path(name).unwrap_or(fallback),
        None => fallback,
    }
}

/// Fold statically known environment checks in `source` for `config`.
///
/// Files that import nothing from the detection package are returned
/// verbatim without traversal.
pub fn transform(
    source: &str,
    config: &TargetConfig,
    options: &TransformOptions,
) -> Result<TransformResult> {
    let filename = options.filename.as_deref().unwrap_or(ANONYMOUS_FILENAME);
    let matcher = match &options.module_specifiers {
        Some(specifiers) => ModuleMatcher::new(specifiers),
        None => ModuleMatcher::default_matcher(),
    };

    if options.source_map {
        warn!(file = filename, "source map generation is not supported; ignoring");
    }

    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, source_type_for(options.filename.as_deref())).parse();
    if ret.panicked || !ret.errors.is_empty() {
        let message = ret
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(TransformError::Parse {
            filename: filename.to_string(),
            message,
        });
    }

    let mut program = ret.program;
    let table = BindingTable::collect(&program, &matcher);
    if table.is_empty() {
        debug!(file = filename, "no detection imports; leaving file untouched");
        return Ok(TransformResult::unchanged(source));
    }
    debug!(file = filename, bindings = table.len(), "collected detection imports");

    let mut folder = ConditionFolder::new(&allocator, Evaluator::new(&table, config), source);
    folder.visit_program(&mut program);
    let transformations = folder.into_records();

    if transformations.is_empty() {
        return Ok(TransformResult::unchanged(source));
    }

    let code = Codegen::new().build(&program).code;
    debug!(file = filename, count = transformations.len(), "transform complete");

    Ok(TransformResult {
        code,
        transform_count: transformations.len(),
        transformations,
        source_map: None,
    })
}
