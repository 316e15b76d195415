//! Matching values against `case` patterns.

use crate::value::Value;
use wox_mem::{StringInterner, Symbol};
use wox_syntax::ast::Pattern;

/// Tests `value` against `pattern`, appending bindings left to right.
///
/// Returns `false` as soon as any part fails. `bindings` may then hold
/// entries from sub-patterns that matched before the failure; callers
/// discard them.
pub fn match_pattern(
    pattern: &Pattern,
    value: &Value,
    interner: &StringInterner,
    bindings: &mut Vec<(Symbol, Value)>,
) -> bool {
    match pattern {
        Pattern::Wild { .. } => true,
        Pattern::Var { name } => {
            bindings.push((name.name, value.clone()));
            true
        }
        Pattern::Unit { .. } => matches!(value, Value::Nil),
        Pattern::Literal { value: literal, .. } => {
            Value::from_literal(*literal, interner) == *value
        }
        Pattern::At { name, pattern } => {
            if match_pattern(pattern, value, interner, bindings) {
                bindings.push((name.name, value.clone()));
                true
            } else {
                false
            }
        }
        Pattern::Tuple { elements, .. } => match value {
            Value::Tuple(items) => match_all(elements, items, interner, bindings),
            _ => false,
        },
        Pattern::Vector { elements, .. } => match value {
            Value::Vector(items) => match_all(elements, items, interner, bindings),
            _ => false,
        },
    }
}

fn match_all(
    patterns: &[Pattern],
    values: &[Value],
    interner: &StringInterner,
    bindings: &mut Vec<(Symbol, Value)>,
) -> bool {
    patterns.len() == values.len()
        && patterns
            .iter()
            .zip(values)
            .all(|(pattern, value)| match_pattern(pattern, value, interner, bindings))
}
