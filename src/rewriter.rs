//! Condition Folder for envfold
//!
//! A single pre-order `VisitMut` pass. Every expression is offered to the
//! evaluator before its children; a known value replaces the node with a
//! boolean literal and the subtree is not entered. Otherwise the walk goes
//! on, so a combinator call with a dynamic argument keeps its shape while
//! its resolvable arguments are folded individually.

use oxc_allocator::{Allocator, Vec as ArenaVec};
use oxc_ast::ast::{Class, Decorator, Expression, MethodDefinition};
use oxc_ast::AstBuilder;
use oxc_ast_visit::walk_mut::{walk_class, walk_expression, walk_method_definition};
use oxc_ast_visit::VisitMut;
use oxc_span::{GetSpan, Span};
use tracing::debug;

use crate::decorators::{guard_condition, stub_class_members, stub_method};
use crate::static_eval::Evaluator;
use crate::transform::{LineIndex, TransformKind, TransformationRecord};

pub struct ConditionFolder<'a, 't> {
    ast: AstBuilder<'a>,
    evaluator: Evaluator<'t>,
    source: &'t str,
    lines: LineIndex<'t>,
    records: Vec<TransformationRecord>,
}

impl<'a, 't> ConditionFolder<'a, 't> {
    pub fn new(allocator: &'a Allocator, evaluator: Evaluator<'t>, source: &'t str) -> Self {
        Self {
            ast: AstBuilder::new(allocator),
            evaluator,
            source,
            lines: LineIndex::new(source),
            records: Vec::new(),
        }
    }

    pub fn into_records(self) -> Vec<TransformationRecord> {
        self.records
    }

    fn record(&mut self, kind: TransformKind, span: Span, replacement: String) {
        let original = self
            .source
            .get(span.start as usize..span.end as usize)
            .unwrap_or_default()
            .to_string();
        let (line, column) = self.lines.position(span.start);
        debug!(
            kind = kind.as_str(),
            line,
            column,
            original = %original,
            replacement = %replacement,
            "folded"
        );
        self.records.push(TransformationRecord {
            kind,
            original,
            replacement,
            line,
            column,
        });
    }

    /// Remove every guard decorator whose condition is known.
    /// Returns `None` if none was, otherwise the conjunction of their values.
    fn apply_decorators(
        &mut self,
        decorators: &mut ArenaVec<'a, Decorator<'a>>,
        subject: &str,
    ) -> Option<bool> {
        let mut outcome = None;
        let mut removed = Vec::with_capacity(decorators.len());

        for decorator in decorators.iter() {
            let value = guard_condition(&self.evaluator, decorator)
                .and_then(|condition| self.evaluator.resolve(condition).known());
            removed.push(value.is_some());

            if let Some(value) = value {
                let replacement = if value {
                    format!("removed guard on {subject} (condition true)")
                } else {
                    format!("stubbed {subject} (condition false)")
                };
                self.record(TransformKind::Decorator, decorator.span, replacement);
                outcome = Some(outcome.unwrap_or(true) && value);
            }
        }

        if outcome.is_some() {
            let mut index = 0;
            decorators.retain(|_| {
                let keep = !removed[index];
                index += 1;
                keep
            });
        }
        outcome
    }
}

impl<'a> VisitMut<'a> for ConditionFolder<'a, '_> {
    fn visit_expression(&mut self, expr: &mut Expression<'a>) {
        if !matches!(expr, Expression::BooleanLiteral(_)) {
            if let Some(value) = self.evaluator.resolve(expr).known() {
                if let Some(kind) = self.evaluator.classify(expr) {
                    let span = expr.span();
                    self.record(kind, span, value.to_string());
                    *expr = self.ast.expression_boolean_literal(span, value);
                    return;
                }
            }
        }
        walk_expression(self, expr);
    }

    // Decorator expressions are never rewritten in place.
    fn visit_decorator(&mut self, _decorator: &mut Decorator<'a>) {}

    fn visit_class(&mut self, class: &mut Class<'a>) {
        let subject = match &class.id {
            Some(id) => format!("class {}", id.name),
            None => "anonymous class".to_string(),
        };
        if self.apply_decorators(&mut class.decorators, &subject) == Some(false) {
            stub_class_members(&mut class.body);
            return;
        }
        walk_class(self, class);
    }

    fn visit_method_definition(&mut self, method: &mut MethodDefinition<'a>) {
        let subject = match method.key.static_name() {
            Some(name) => format!("method {name}"),
            None => "computed method".to_string(),
        };
        if self.apply_decorators(&mut method.decorators, &subject) == Some(false) {
            stub_method(method);
            return;
        }
        walk_method_definition(self, method);
    }
}
