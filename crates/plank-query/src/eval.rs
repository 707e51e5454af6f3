//! AST evaluation against a single work item.

use plank_core::model::item::WorkItem;
use plank_core::model::priority::Priority;

use crate::ast::{Expr, FieldPredicate, Operator};
use crate::fields::{FieldValue, resolve_field};
use crate::lexer::TEXT_FIELD;

/// Query value standing in for the current user on `assignee`.
pub const CURRENT_USER: &str = "@me";

/// Evaluate `expr` against `item`.
///
/// Both operands of `AND`/`OR` are evaluated; accessors have no side effects
/// so the result is the same as with short-circuiting.
#[must_use]
pub fn evaluate(expr: &Expr, item: &WorkItem) -> bool {
    match expr {
        Expr::Field(predicate) => matches_predicate(predicate, item),
        Expr::And { left, right } => {
            let l = evaluate(left, item);
            let r = evaluate(right, item);
            l && r
        }
        Expr::Or { left, right } => {
            let l = evaluate(left, item);
            let r = evaluate(right, item);
            l || r
        }
        Expr::Not { operand } => !evaluate(operand, item),
    }
}

/// Evaluate one leaf predicate.
#[must_use]
pub fn matches_predicate(predicate: &FieldPredicate, item: &WorkItem) -> bool {
    if predicate.field == "assignee" && predicate.value.eq_ignore_ascii_case(CURRENT_USER) {
        let assigned = item.assignee.as_deref().is_some_and(|a| !a.trim().is_empty());
        return match predicate.operator {
            Operator::Equal | Operator::Contains => assigned,
            Operator::NotEqual => !assigned,
            _ => false,
        };
    }

    let value = resolve_field(item, &predicate.field);

    // Bare words search, they do not have to match the whole text.
    if predicate.field == TEXT_FIELD {
        return match predicate.operator {
            Operator::Equal => contains(&value, &predicate.value),
            Operator::NotEqual => !contains(&value, &predicate.value),
            _ => compare(&value, predicate),
        };
    }

    compare(&value, predicate)
}

/// Apply the predicate's operator to an already-resolved value.
#[must_use]
pub fn compare(value: &FieldValue, predicate: &FieldPredicate) -> bool {
    let query = predicate.value.as_str();
    match predicate.operator {
        Operator::Equal => equals(value, &predicate.field, query),
        Operator::NotEqual => !equals(value, &predicate.field, query),
        Operator::Contains => contains(value, query),
        Operator::GreaterThan => numeric(value, &predicate.field, query, |a, b| a > b),
        Operator::GreaterOrEqual => numeric(value, &predicate.field, query, |a, b| a >= b),
        Operator::LessThan => numeric(value, &predicate.field, query, |a, b| a < b),
        Operator::LessOrEqual => numeric(value, &predicate.field, query, |a, b| a <= b),
        Operator::Range => {
            let Some(n) = as_number(value) else {
                return false;
            };
            let low = query_number(&predicate.field, query);
            let high = predicate
                .range_end
                .as_deref()
                .and_then(|end| query_number(&predicate.field, end));
            match (low, high) {
                (Some(low), Some(high)) => low <= n && n <= high,
                _ => false,
            }
        }
    }
}

fn equals(value: &FieldValue, field: &str, query: &str) -> bool {
    match value {
        FieldValue::Text(text) => text.to_lowercase() == query.to_lowercase(),
        FieldValue::Number(n) => {
            query_number(field, query).is_some_and(|q| (q - n).abs() < f64::EPSILON)
        }
        FieldValue::Bool(b) => parse_bool(query) == Some(*b),
        FieldValue::List(items) => {
            let query = query.to_lowercase();
            items.iter().any(|item| item.to_lowercase() == query)
        }
        FieldValue::Missing => false,
    }
}

fn contains(value: &FieldValue, query: &str) -> bool {
    let query = query.to_lowercase();
    match value {
        FieldValue::Text(text) => text.to_lowercase().contains(&query),
        FieldValue::Number(n) => n.to_string().contains(&query),
        FieldValue::List(items) => items.iter().any(|item| item.to_lowercase().contains(&query)),
        FieldValue::Bool(_) | FieldValue::Missing => false,
    }
}

fn numeric(value: &FieldValue, field: &str, query: &str, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (as_number(value), query_number(field, query)) {
        (Some(n), Some(q)) => cmp(n, q),
        _ => false,
    }
}

fn as_number(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Number(n) => Some(*n),
        FieldValue::Text(text) => text.trim().parse().ok(),
        FieldValue::Bool(_) | FieldValue::List(_) | FieldValue::Missing => None,
    }
}

/// Numeric reading of a query operand. `priority` also accepts level names.
fn query_number(field: &str, raw: &str) -> Option<f64> {
    if field == "priority" {
        if let Ok(priority) = raw.parse::<Priority>() {
            return Some(f64::from(priority.ordinal()));
        }
    }
    raw.trim().parse().ok()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
