//! Decorator Optimizer for envfold
//!
//! A class or method guarded by `@env(condition)` whose condition is fixed
//! by the target loses the guard. When the condition is false the
//! declaration is also stubbed: same name, same signatures, same members,
//! but every executable body is empty and every property initializer is
//! gone, so the type still exists for `instanceof` and re-exports.

use oxc_ast::ast::{ClassBody, ClassElement, Decorator, Expression, MethodDefinition, PropertyDefinition};

use crate::static_eval::{Evaluator, Role};

/// The condition of a recognized guard decorator: a call with exactly one
/// argument whose callee is the aggregate object.
pub fn guard_condition<'d, 'a>(
    evaluator: &Evaluator<'_>,
    decorator: &'d Decorator<'a>,
) -> Option<&'d Expression<'a>> {
    let Expression::CallExpression(call) = &decorator.expression else {
        return None;
    };
    if evaluator.role_of(&call.callee) != Some(Role::Aggregate) {
        return None;
    }
    let [argument] = &call.arguments[..] else {
        return None;
    };
    argument.as_expression()
}

/// Empty every method body and drop every property initializer.
/// Accessor properties, static blocks and index signatures pass through.
pub fn stub_class_members(body: &mut ClassBody<'_>) {
    for element in body.body.iter_mut() {
        match element {
            ClassElement::MethodDefinition(method) => stub_method(method),
            ClassElement::PropertyDefinition(property) => stub_property(property),
            _ => {}
        }
    }
}

/// Keeps key, parameters, return type and modifiers; decorators are stripped.
/// Bodiless signatures (overloads, abstract methods) stay as they are.
pub fn stub_method(method: &mut MethodDefinition<'_>) {
    method.decorators.clear();
    if let Some(body) = method.value.body.as_mut() {
        body.directives.clear();
        body.statements.clear();
    }
}

pub fn stub_property(property: &mut PropertyDefinition<'_>) {
    property.decorators.clear();
    property.value = None;
}
