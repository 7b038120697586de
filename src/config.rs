//! Target Configuration for envfold
//!
//! Describes which environment the output is being built for. Every field
//! is optional: an absent field means "leave checks of this category as
//! runtime checks", never "false for every variant".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, TransformError};

// ═══════════════════════════════════════════════════════════════════════════════
// TARGET IDENTIFIERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Operating system identifiers, spelled the way Node's `process.platform` does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Darwin,
    Linux,
    #[serde(alias = "windows")]
    Win32,
}

/// Execution environments a script may run under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Runtime {
    Node,
    Deno,
    Bun,
    Browser,
}

/// CPU architectures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    X64,
    Arm64,
}

/// The three detection categories a configuration can pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Platform,
    Runtime,
    Architecture,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Platform => "platform",
            Category::Runtime => "runtime",
            Category::Architecture => "architecture",
        }
    }
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Darwin => "darwin",
            Platform::Linux => "linux",
            Platform::Win32 => "win32",
        }
    }

    /// Platform of the machine running this process, if it is one we know.
    pub fn host() -> Option<Self> {
        match std::env::consts::OS {
            "macos" => Some(Platform::Darwin),
            "linux" => Some(Platform::Linux),
            "windows" => Some(Platform::Win32),
            _ => None,
        }
    }
}

impl Runtime {
    pub fn as_str(self) -> &'static str {
        match self {
            Runtime::Node => "node",
            Runtime::Deno => "deno",
            Runtime::Bun => "bun",
            Runtime::Browser => "browser",
        }
    }
}

impl Architecture {
    pub fn as_str(self) -> &'static str {
        match self {
            Architecture::X64 => "x64",
            Architecture::Arm64 => "arm64",
        }
    }

    pub fn host() -> Option<Self> {
        match std::env::consts::ARCH {
            "x86_64" => Some(Architecture::X64),
            "aarch64" => Some(Architecture::Arm64),
            _ => None,
        }
    }
}

impl FromStr for Platform {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "darwin" | "macos" => Ok(Platform::Darwin),
            "linux" => Ok(Platform::Linux),
            "win32" | "windows" => Ok(Platform::Win32),
            other => Err(unknown(Category::Platform, other)),
        }
    }
}

impl FromStr for Runtime {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "node" => Ok(Runtime::Node),
            "deno" => Ok(Runtime::Deno),
            "bun" => Ok(Runtime::Bun),
            "browser" => Ok(Runtime::Browser),
            other => Err(unknown(Category::Runtime, other)),
        }
    }
}

impl FromStr for Architecture {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "x64" | "x86_64" => Ok(Architecture::X64),
            "arm64" | "aarch64" => Ok(Architecture::Arm64),
            other => Err(unknown(Category::Architecture, other)),
        }
    }
}

fn unknown(category: Category, value: &str) -> TransformError {
    TransformError::UnknownTarget {
        category: category.as_str(),
        value: value.to_string(),
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TARGET CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetConfig {
    #[serde(default)]
    pub platform: Option<Platform>,
    #[serde(default)]
    pub runtime: Option<Runtime>,
    #[serde(default)]
    pub architecture: Option<Architecture>,
    /// Enabled feature names. Order is irrelevant; duplicates are harmless.
    #[serde(default)]
    pub features: Option<Vec<String>>,
}

impl TargetConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin platform and architecture to the machine running this process.
    /// Runtime and features stay dynamic.
    pub fn host() -> Self {
        Self {
            platform: Platform::host(),
            architecture: Architecture::host(),
            ..Self::default()
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn with_runtime(mut self, runtime: Runtime) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn with_architecture(mut self, architecture: Architecture) -> Self {
        self.architecture = Some(architecture);
        self
    }

    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = Some(features.into_iter().map(Into::into).collect());
        self
    }

    /// True when nothing is pinned, so no expression can ever fold.
    pub fn is_empty(&self) -> bool {
        self.platform.is_none()
            && self.runtime.is_none()
            && self.architecture.is_none()
            && self.features.is_none()
    }

    /// `None` when the features category is not pinned at all.
    pub fn has_feature(&self, name: &str) -> Option<bool> {
        self.features
            .as_ref()
            .map(|features| features.iter().any(|f| f == name))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON configuration file such as
    /// `{ "platform": "darwin", "features": ["beta"] }`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|e| TransformError::io(path, e))?;
        Self::from_json_str(&data)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRANSFORM OPTIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOptions {
    /// Replaces the default set of accepted module specifiers.
    #[serde(default)]
    pub module_specifiers: Option<Vec<String>>,
    /// Used in diagnostics and to pick the parser's source type.
    #[serde(default)]
    pub filename: Option<String>,
    /// Source maps are not generated; a request is accepted and ignored.
    #[serde(default)]
    pub source_map: bool,
}

impl TransformOptions {
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_module_specifiers<I, S>(mut self, specifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.module_specifiers = Some(specifiers.into_iter().map(Into::into).collect());
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_json() {
        let config =
            TargetConfig::from_json_str(r#"{"platform":"windows","architecture":"arm64"}"#)
                .unwrap();
        assert_eq!(config.platform, Some(Platform::Win32));
        assert_eq!(config.architecture, Some(Architecture::Arm64));
        assert_eq!(config.runtime, None);
        assert_eq!(config.features, None);
    }

    #[test]
    fn test_absent_features_are_not_empty_features() {
        let unset = TargetConfig::new();
        assert_eq!(unset.has_feature("beta"), None);

        let empty = TargetConfig::new().with_features(Vec::<String>::new());
        assert_eq!(empty.has_feature("beta"), Some(false));
        assert!(!empty.is_empty());
    }

    #[test]
    fn test_unknown_identifier_is_rejected() {
        assert!("plan9".parse::<Platform>().is_err());
        assert!(TargetConfig::from_json_str(r#"{"runtime":"rhino"}"#).is_err());
        assert_eq!("aarch64".parse::<Architecture>().unwrap(), Architecture::Arm64);
    }

    #[test]
    fn test_host_leaves_runtime_dynamic() {
        let host = TargetConfig::host();
        assert_eq!(host.runtime, None);
        assert_eq!(host.features, None);
        assert_eq!(host.platform, Platform::host());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("envfold.json");
        std::fs::write(&path, r#"{"runtime":"deno","features":["beta"]}"#).unwrap();

        let config = TargetConfig::from_file(&path).unwrap();
        assert_eq!(config.runtime, Some(Runtime::Deno));
        assert_eq!(config.has_feature("beta"), Some(true));

        let missing = TargetConfig::from_file(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(TransformError::Io { .. })));
    }
}
