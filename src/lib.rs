//! # envfold
//!
//! Build-time folding of environment checks. Source files that import the
//! `envfold` detection API get every check whose answer is fixed by the
//! target (platform, runtime, architecture, enabled features) replaced with
//! a boolean literal, so a bundler can drop the dead branch afterwards.
//!
//! ## Invariants
//!
//! 1. **Imports only**: an identifier is recognized solely through a
//!    top-level `import` from an accepted module specifier. A file without
//!    such an import comes back byte-for-byte unchanged.
//!
//! 2. **Absent is unknown**: a target field that is not set never folds.
//!    Pinning the platform leaves `env.node` alone.
//!
//! 3. **No partial logic**: `all`/`any`/`not` fold to a literal only when
//!    every argument is known. Otherwise the call stays, with whichever
//!    arguments were known replaced in place.
//!
//! 4. **Guards keep shape**: `@env(cond)` with a false condition empties
//!    bodies and initializers but keeps the declaration, its name, its
//!    signatures and its members.
//!
//! 5. **Every rewrite is logged**: one `TransformationRecord` per folded
//!    node or removed guard, positioned at the original text.

mod batch;
mod bindings;
mod config;
mod decorators;
mod error;
mod rewriter;
mod static_eval;
mod transform;

#[cfg(feature = "napi")]
mod native;

#[cfg(test)]
mod transform_tests;

pub use batch::{collect_sources, transform_dir, transform_file, FileOutcome, SOURCE_EXTENSIONS};
pub use bindings::{BindingTable, Combinator, ImportBinding, ModuleMatcher, DEFAULT_MODULE_SPECIFIERS};
pub use config::{Architecture, Category, Platform, Runtime, TargetConfig, TransformOptions};
pub use error::{Result, TransformError};
pub use static_eval::{Evaluator, Resolution};
pub use transform::{transform, TransformKind, TransformResult, TransformationRecord};

#[cfg(feature = "napi")]
pub use native::{transform_dir_native, transform_native};
