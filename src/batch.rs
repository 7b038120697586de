//! Batch Module for envfold
//!
//! Walks a source tree and folds every script file in parallel. Each file
//! is an independent `transform` call; one bad file is reported in its
//! outcome and does not stop the others.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::{TargetConfig, TransformOptions};
use crate::error::{Result, TransformError};
use crate::transform::{transform, TransformResult};

pub const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOutcome {
    pub path: PathBuf,
    pub transform_count: usize,
    pub written: bool,
    pub error: Option<String>,
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name == "node_modules" || name.starts_with('.'))
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Script files under `root`, sorted. `node_modules` and hidden
/// directories are not entered.
pub fn collect_sources(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !is_skipped_dir(entry))
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && has_source_extension(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

/// Transform one file on disk, writing it back when `write` is set and
/// something changed.
pub fn transform_file(
    path: &Path,
    config: &TargetConfig,
    options: &TransformOptions,
    write: bool,
) -> Result<TransformResult> {
    let source = fs::read_to_string(path).map_err(|e| TransformError::io(path, e))?;
    let options = TransformOptions {
        filename: Some(path.to_string_lossy().to_string()),
        ..options.clone()
    };

    let result = transform(&source, config, &options)?;
    if write && result.is_changed() {
        fs::write(path, &result.code).map_err(|e| TransformError::io(path, e))?;
    }
    Ok(result)
}

/// Transform every script file under `root`.
pub fn transform_dir(
    root: &Path,
    config: &TargetConfig,
    options: &TransformOptions,
    write: bool,
) -> Result<Vec<FileOutcome>> {
    fs::metadata(root).map_err(|e| TransformError::io(root, e))?;

    let files = collect_sources(root);
    debug!(root = %root.display(), files = files.len(), "transforming directory");

    let outcomes = files
        .par_iter()
        .map(|path| match transform_file(path, config, options, write) {
            Ok(result) => FileOutcome {
                path: path.clone(),
                transform_count: result.transform_count,
                written: write && result.is_changed(),
                error: None,
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to transform file");
                FileOutcome {
                    path: path.clone(),
                    transform_count: 0,
                    written: false,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect();

    Ok(outcomes)
}
