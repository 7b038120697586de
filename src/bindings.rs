//! Import Resolver for envfold
//!
//! Builds the per-file table of local identifiers that refer to the
//! detection API, following aliases and namespace imports. Only top-level
//! `import` declarations whose specifier matches an accepted module name
//! contribute; nothing else introduces a binding.

use lazy_static::lazy_static;
use oxc_ast::ast::{ImportDeclaration, ImportDeclarationSpecifier, ModuleExportName, Program, Statement};
use regex::Regex;
use std::collections::HashMap;

use crate::config::Category;

// ═══════════════════════════════════════════════════════════════════════════════
// CANONICAL NAMES
// ═══════════════════════════════════════════════════════════════════════════════

pub const AGGREGATE_EXPORT: &str = "env";
pub const PLATFORM_EXPORT: &str = "platform";
pub const RUNTIME_EXPORT: &str = "runtime";
pub const ARCH_EXPORT: &str = "arch";
pub const ALL_EXPORT: &str = "all";
pub const ANY_EXPORT: &str = "any";
pub const NOT_EXPORT: &str = "not";
pub const FEATURE_EXPORT: &str = "feature";

/// Logical operation denoted by a combinator export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    All,
    Any,
    Not,
}

impl Combinator {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            ALL_EXPORT => Some(Combinator::All),
            ANY_EXPORT => Some(Combinator::Any),
            NOT_EXPORT => Some(Combinator::Not),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Combinator::All => ALL_EXPORT,
            Combinator::Any => ANY_EXPORT,
            Combinator::Not => NOT_EXPORT,
        }
    }
}

/// What a local identifier was imported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportBinding {
    /// The aggregate object. `namespace` marks `import * as X`, which
    /// needs one extra hop (`X.env.darwin`).
    Aggregate { namespace: bool },
    Split(Category),
    Combinator(Combinator),
    Feature,
}

lazy_static! {
    /// Named exports recognized by their pre-alias name.
    static ref NAMED_EXPORTS: HashMap<&'static str, ImportBinding> = {
        let mut m = HashMap::new();
        m.insert(AGGREGATE_EXPORT, ImportBinding::Aggregate { namespace: false });
        m.insert(PLATFORM_EXPORT, ImportBinding::Split(Category::Platform));
        m.insert(RUNTIME_EXPORT, ImportBinding::Split(Category::Runtime));
        m.insert(ARCH_EXPORT, ImportBinding::Split(Category::Architecture));
        m.insert(ALL_EXPORT, ImportBinding::Combinator(Combinator::All));
        m.insert(ANY_EXPORT, ImportBinding::Combinator(Combinator::Any));
        m.insert(NOT_EXPORT, ImportBinding::Combinator(Combinator::Not));
        m.insert(FEATURE_EXPORT, ImportBinding::Feature);
        m
    };

    /// Published names on npm and JSR plus relative self-references used
    /// inside the package itself.
    pub static ref DEFAULT_MODULE_SPECIFIERS: Vec<&'static str> = vec![
        "envfold",
        "@envfold/core",
        "npm:envfold",
        "jsr:@envfold/core",
        "./mod.ts",
        "../mod.ts",
        "./index.js",
        "../index.js",
    ];

    static ref DEFAULT_MATCHER: ModuleMatcher =
        ModuleMatcher::new(DEFAULT_MODULE_SPECIFIERS.iter().copied());
}

/// Binding a canonical export name denotes, if it is one of ours.
pub fn named_export(name: &str) -> Option<ImportBinding> {
    NAMED_EXPORTS.get(name).copied()
}

// ═══════════════════════════════════════════════════════════════════════════════
// MODULE MATCHER
// ═══════════════════════════════════════════════════════════════════════════════

/// Accepts a module specifier that equals one of the configured names, or
/// one of them followed by `@` and a version.
#[derive(Debug, Clone)]
pub struct ModuleMatcher {
    pattern: Option<Regex>,
}

impl ModuleMatcher {
    pub fn new<I, S>(specifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let alternatives: Vec<String> = specifiers
            .into_iter()
            .map(|s| regex::escape(s.as_ref()))
            .filter(|s| !s.is_empty())
            .collect();

        if alternatives.is_empty() {
            return Self { pattern: None };
        }

        let source = format!(r"^(?:{})(?:@.*)?$", alternatives.join("|"));
        // Every alternative is escaped, so the pattern is always valid.
        let pattern = Regex::new(&source).ok();
        Self { pattern }
    }

    /// Matcher over the package's published names.
    pub fn default_matcher() -> Self {
        DEFAULT_MATCHER.clone()
    }

    pub fn matches(&self, specifier: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|re| re.is_match(specifier))
    }
}

impl Default for ModuleMatcher {
    fn default() -> Self {
        Self::default_matcher()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BINDING TABLE
// ═══════════════════════════════════════════════════════════════════════════════

/// Local name → role, for one source file.
///
/// All categories share one map, so when a later import reuses a local name
/// under a different role the later one wins.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    bindings: HashMap<String, ImportBinding>,
}

impl BindingTable {
    pub fn new() -> Self {
        BindingTable::default()
    }

    /// Scan the top-level imports of `program`.
    pub fn collect(program: &Program<'_>, matcher: &ModuleMatcher) -> Self {
        let mut table = BindingTable::new();
        for stmt in &program.body {
            if let Statement::ImportDeclaration(decl) = stmt {
                if matcher.matches(decl.source.value.as_str()) {
                    table.add_declaration(decl);
                }
            }
        }
        table
    }

    fn add_declaration(&mut self, decl: &ImportDeclaration<'_>) {
        if decl.import_kind.is_type() {
            return;
        }
        let Some(specifiers) = &decl.specifiers else {
            return;
        };

        for specifier in specifiers {
            match specifier {
                ImportDeclarationSpecifier::ImportSpecifier(spec) => {
                    if spec.import_kind.is_type() {
                        continue;
                    }
                    let imported = match &spec.imported {
                        ModuleExportName::IdentifierName(id) => id.name.as_str(),
                        ModuleExportName::IdentifierReference(id) => id.name.as_str(),
                        ModuleExportName::StringLiteral(s) => s.value.as_str(),
                    };
                    if let Some(binding) = named_export(imported) {
                        self.insert(spec.local.name.as_str(), binding);
                    }
                }
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(spec) => {
                    self.insert(
                        spec.local.name.as_str(),
                        ImportBinding::Aggregate { namespace: true },
                    );
                }
                ImportDeclarationSpecifier::ImportDefaultSpecifier(spec) => {
                    // No real default export exists, but interop shims synthesize one.
                    self.insert(
                        spec.local.name.as_str(),
                        ImportBinding::Aggregate { namespace: false },
                    );
                }
            }
        }
    }

    pub fn insert(&mut self, local: &str, binding: ImportBinding) {
        if binding == ImportBinding::Feature {
            // At most one feature alias is live per file.
            self.bindings.retain(|_, b| *b != ImportBinding::Feature);
        }
        self.bindings.insert(local.to_string(), binding);
    }

    pub fn get(&self, local: &str) -> Option<ImportBinding> {
        self.bindings.get(local).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }
}
