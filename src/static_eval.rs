//! Static Condition Evaluator for envfold
//!
//! Decides whether an expression that references the detection API has a
//! value that is fixed by the target configuration. Anything it does not
//! recognize, and anything whose category is not pinned, is `Unknown` and
//! stays a runtime check.

use lazy_static::lazy_static;
use oxc_ast::ast::{Argument, CallExpression, Expression, StaticMemberExpression};
use std::collections::HashMap;

use crate::bindings::{named_export, BindingTable, Combinator, ImportBinding, FEATURE_EXPORT};
use crate::config::{Architecture, Category, Platform, Runtime, TargetConfig};
use crate::transform::TransformKind;

/// Outcome of statically evaluating one expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Known(bool),
    Unknown,
}

impl Resolution {
    pub fn known(self) -> Option<bool> {
        match self {
            Resolution::Known(value) => Some(value),
            Resolution::Unknown => None,
        }
    }
}

impl From<Option<bool>> for Resolution {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Resolution::Unknown, Resolution::Known)
    }
}

/// What an identifier, or a one-hop member of one, denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// `import * as X` object
    Module,
    Aggregate,
    Split(Category),
    Combinator(Combinator),
    Feature,
}

impl From<ImportBinding> for Role {
    fn from(binding: ImportBinding) -> Self {
        match binding {
            ImportBinding::Aggregate { namespace: true } => Role::Module,
            ImportBinding::Aggregate { namespace: false } => Role::Aggregate,
            ImportBinding::Split(category) => Role::Split(category),
            ImportBinding::Combinator(op) => Role::Combinator(op),
            ImportBinding::Feature => Role::Feature,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DETECTION PROPERTIES
// ═══════════════════════════════════════════════════════════════════════════════

/// A detection property and the configuration value that makes it true.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Platform(Platform),
    Runtime(Runtime),
    Architecture(Architecture),
}

impl Target {
    pub fn category(self) -> Category {
        match self {
            Target::Platform(_) => Category::Platform,
            Target::Runtime(_) => Category::Runtime,
            Target::Architecture(_) => Category::Architecture,
        }
    }
}

lazy_static! {
    static ref DETECTION_PROPERTIES: HashMap<&'static str, Target> = {
        let mut m = HashMap::new();
        m.insert("darwin", Target::Platform(Platform::Darwin));
        m.insert("linux", Target::Platform(Platform::Linux));
        m.insert("windows", Target::Platform(Platform::Win32));
        m.insert("node", Target::Runtime(Runtime::Node));
        m.insert("deno", Target::Runtime(Runtime::Deno));
        m.insert("bun", Target::Runtime(Runtime::Bun));
        m.insert("browser", Target::Runtime(Runtime::Browser));
        m.insert("x64", Target::Architecture(Architecture::X64));
        m.insert("arm64", Target::Architecture(Architecture::Arm64));
        m
    };
}

/// Look up a detection property. With a category, only that category's
/// names are recognized; without one, the union of all three is.
pub fn detection_property(category: Option<Category>, name: &str) -> Option<Target> {
    let target = DETECTION_PROPERTIES.get(name).copied()?;
    match category {
        Some(c) if c != target.category() => None,
        _ => Some(target),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EVALUATOR
// ═══════════════════════════════════════════════════════════════════════════════

pub struct Evaluator<'t> {
    table: &'t BindingTable,
    config: &'t TargetConfig,
}

impl<'t> Evaluator<'t> {
    pub fn new(table: &'t BindingTable, config: &'t TargetConfig) -> Self {
        Self { table, config }
    }

    pub fn role_of(&self, expr: &Expression<'_>) -> Option<Role> {
        match expr.without_parentheses() {
            Expression::Identifier(ident) => self.table.get(ident.name.as_str()).map(Role::from),
            Expression::StaticMemberExpression(member) => {
                let name = member.property.name.as_str();
                match self.role_of(&member.object)? {
                    Role::Module => named_export(name).map(Role::from),
                    Role::Aggregate => Combinator::from_name(name)
                        .map(Role::Combinator)
                        .or_else(|| (name == FEATURE_EXPORT).then_some(Role::Feature)),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    pub fn resolve(&self, expr: &Expression<'_>) -> Resolution {
        match expr.without_parentheses() {
            Expression::BooleanLiteral(lit) => Resolution::Known(lit.value),
            Expression::StaticMemberExpression(member) => self.resolve_property(member),
            Expression::CallExpression(call) => self.resolve_call(call),
            _ => Resolution::Unknown,
        }
    }

    /// Record kind for an expression that resolved, `None` for a node that
    /// is already a literal.
    pub fn classify(&self, expr: &Expression<'_>) -> Option<TransformKind> {
        match expr.without_parentheses() {
            Expression::StaticMemberExpression(_) => Some(TransformKind::Property),
            Expression::CallExpression(call) => match self.role_of(&call.callee)? {
                Role::Combinator(_) => Some(TransformKind::Combinator),
                Role::Feature => Some(TransformKind::Feature),
                _ => None,
            },
            _ => None,
        }
    }

    fn resolve_property(&self, member: &StaticMemberExpression<'_>) -> Resolution {
        let category = match self.role_of(&member.object) {
            Some(Role::Split(category)) => Some(category),
            Some(Role::Aggregate) => None,
            _ => return Resolution::Unknown,
        };

        match detection_property(category, member.property.name.as_str()) {
            Some(target) => self.compare(target),
            None => Resolution::Unknown,
        }
    }

    fn compare(&self, target: Target) -> Resolution {
        let config = self.config;
        match target {
            Target::Platform(p) => config.platform.map(|c| c == p),
            Target::Runtime(r) => config.runtime.map(|c| c == r),
            Target::Architecture(a) => config.architecture.map(|c| c == a),
        }
        .into()
    }

    fn resolve_call(&self, call: &CallExpression<'_>) -> Resolution {
        match self.role_of(&call.callee) {
            Some(Role::Combinator(op)) => self.resolve_combinator(op, &call.arguments),
            Some(Role::Feature) => self.resolve_feature(&call.arguments),
            _ => Resolution::Unknown,
        }
    }

    /// Every argument must be known; no short-circuit on the logical value.
    fn resolve_combinator(&self, op: Combinator, args: &[Argument<'_>]) -> Resolution {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            let Some(expr) = arg.as_expression() else {
                return Resolution::Unknown;
            };
            match self.resolve(expr) {
                Resolution::Known(value) => values.push(value),
                Resolution::Unknown => return Resolution::Unknown,
            }
        }

        match op {
            Combinator::All => Resolution::Known(values.iter().all(|v| *v)),
            Combinator::Any => Resolution::Known(values.iter().any(|v| *v)),
            Combinator::Not => match values.as_slice() {
                [value] => Resolution::Known(!value),
                _ => Resolution::Unknown,
            },
        }
    }

    fn resolve_feature(&self, args: &[Argument<'_>]) -> Resolution {
        let [arg] = args else {
            return Resolution::Unknown;
        };
        let Some(expr) = arg.as_expression() else {
            return Resolution::Unknown;
        };

        let name = match expr.without_parentheses() {
            Expression::StringLiteral(lit) => lit.value.as_str(),
            Expression::TemplateLiteral(tpl) if tpl.expressions.is_empty() => {
                match tpl.quasis.first().and_then(|q| q.value.cooked.as_ref()) {
                    Some(cooked) => cooked.as_str(),
                    None => return Resolution::Unknown,
                }
            }
            _ => return Resolution::Unknown,
        };

        self.config.has_feature(name).into()
    }
}
