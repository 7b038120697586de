//! Node bindings for envfold.
//!
//! Config and options cross the boundary as JSON strings, the same way the
//! rest of the native API takes structured input.

use napi_derive::napi;
use std::path::Path;

use crate::batch::{transform_dir, FileOutcome};
use crate::config::{TargetConfig, TransformOptions};
use crate::transform::{transform, TransformResult, TransformationRecord};

#[napi(object)]
pub struct NativeTransformation {
    pub kind: String,
    pub original: String,
    pub replacement: String,
    pub line: u32,
    pub column: u32,
}

#[napi(object)]
pub struct NativeTransformOutput {
    pub code: String,
    pub transform_count: u32,
    pub transformations: Vec<NativeTransformation>,
    pub source_map: Option<String>,
}

#[napi(object)]
pub struct NativeFileOutcome {
    pub path: String,
    pub transform_count: u32,
    pub written: bool,
    pub error: Option<String>,
}

impl From<TransformationRecord> for NativeTransformation {
    fn from(record: TransformationRecord) -> Self {
        Self {
            kind: record.kind.as_str().to_string(),
            original: record.original,
            replacement: record.replacement,
            line: record.line,
            column: record.column,
        }
    }
}

impl From<TransformResult> for NativeTransformOutput {
    fn from(result: TransformResult) -> Self {
        Self {
            code: result.code,
            transform_count: result.transform_count as u32,
            transformations: result.transformations.into_iter().map(Into::into).collect(),
            source_map: result.source_map,
        }
    }
}

impl From<FileOutcome> for NativeFileOutcome {
    fn from(outcome: FileOutcome) -> Self {
        Self {
            path: outcome.path.to_string_lossy().to_string(),
            transform_count: outcome.transform_count as u32,
            written: outcome.written,
            error: outcome.error,
        }
    }
}

fn parse_inputs(
    config_json: &str,
    options_json: Option<&str>,
) -> napi::Result<(TargetConfig, TransformOptions)> {
    let config = TargetConfig::from_json_str(config_json)
        .map_err(|e| napi::Error::from_reason(e.to_string()))?;
    let options = match options_json {
        Some(json) => TransformOptions::from_json_str(json)
            .map_err(|e| napi::Error::from_reason(e.to_string()))?,
        None => TransformOptions::default(),
    };
    Ok((config, options))
}

#[napi]
pub fn transform_native(
    source: String,
    config_json: String,
    options_json: Option<String>,
) -> napi::Result<NativeTransformOutput> {
    let (config, options) = parse_inputs(&config_json, options_json.as_deref())?;
    let result =
        transform(&source, &config, &options).map_err(|e| napi::Error::from_reason(e.to_string()))?;
    Ok(result.into())
}

#[napi]
pub fn transform_dir_native(
    root: String,
    config_json: String,
    options_json: Option<String>,
    write: bool,
) -> napi::Result<Vec<NativeFileOutcome>> {
    let (config, options) = parse_inputs(&config_json, options_json.as_deref())?;
    let outcomes = transform_dir(Path::new(&root), &config, &options, write)
        .map_err(|e| napi::Error::from_reason(e.to_string()))?;
    Ok(outcomes.into_iter().map(Into::into).collect())
}
