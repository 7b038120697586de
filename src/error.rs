//! Error types for the condition-folding transform.

use std::path::PathBuf;

/// Failures that abort a whole transform call.
///
/// Unrecognized constructs are never errors: they resolve to "unknown" and
/// are left in the output as written.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// The source text did not parse.
    #[error("failed to parse {filename}: {message}")]
    Parse { filename: String, message: String },

    /// A target configuration or options document was malformed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Unknown platform/runtime/architecture identifier.
    #[error("unknown {category} '{value}'")]
    UnknownTarget {
        category: &'static str,
        value: String,
    },

    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TransformError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TransformError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;
