//! Field resolution.
//!
//! Maps a work item and a field name to a comparable [`FieldValue`]. The
//! mapping is an explicit table ([`FIELD_ACCESSORS`]); names not in the table
//! fall through to a lookup in [`WorkItem::extra`].

use plank_core::model::item::WorkItem;
use serde::Serialize;

use crate::lexer::TEXT_FIELD;

/// Value of a field as seen by the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    List(Vec<String>),
    Missing,
}

pub type Accessor = fn(&WorkItem) -> FieldValue;

/// Every field the resolver knows by name, in lookup order.
pub const FIELD_ACCESSORS: &[(&str, Accessor)] = &[
    (TEXT_FIELD, full_text),
    ("id", id),
    ("title", title),
    ("description", description),
    ("status", status),
    ("priority", priority),
    ("labels", labels),
    ("blocked", blocked),
    ("ready", ready),
    ("blockedby", blocked_by),
    ("blocking", blocking),
    ("assignee", assignee),
    ("branch", branch),
    ("pr", pr_state),
    ("prnumber", pr_number),
    ("agent", agent_state),
];

/// Placeholder returned for `pr` and `agent` when nothing is attached.
pub const NONE_VALUE: &str = "none";

/// Look up the accessor registered for `field`.
#[must_use]
pub fn accessor(field: &str) -> Option<Accessor> {
    FIELD_ACCESSORS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, accessor)| *accessor)
}

/// Names of all table-backed fields.
pub fn known_fields() -> impl Iterator<Item = &'static str> {
    FIELD_ACCESSORS.iter().map(|(name, _)| *name)
}

/// Resolve `field` on `item`.
#[must_use]
pub fn resolve_field(item: &WorkItem, field: &str) -> FieldValue {
    accessor(field).map_or_else(|| extra_field(item, field), |accessor| accessor(item))
}

/// Status as shown on the board: the explicit one, else derived from agent
/// activity and blockers.
#[must_use]
pub fn effective_status(item: &WorkItem) -> &str {
    if let Some(status) = item.status.as_deref().filter(|s| !s.is_empty()) {
        return status;
    }
    if item.has_running_agent() {
        "in_progress"
    } else if item.is_blocked() {
        "blocked"
    } else {
        "open"
    }
}

fn full_text(item: &WorkItem) -> FieldValue {
    let text = match item.description.as_deref() {
        Some(description) => format!("{} {description}", item.title),
        None => item.title.clone(),
    };
    FieldValue::Text(text)
}

fn id(item: &WorkItem) -> FieldValue {
    FieldValue::Text(item.id.clone())
}

fn title(item: &WorkItem) -> FieldValue {
    FieldValue::Text(item.title.clone())
}

fn description(item: &WorkItem) -> FieldValue {
    optional_text(item.description.as_deref())
}

fn status(item: &WorkItem) -> FieldValue {
    FieldValue::Text(effective_status(item).to_string())
}

fn priority(item: &WorkItem) -> FieldValue {
    FieldValue::Number(f64::from(item.priority.ordinal()))
}

fn labels(item: &WorkItem) -> FieldValue {
    FieldValue::List(item.labels.clone())
}

fn blocked(item: &WorkItem) -> FieldValue {
    FieldValue::Bool(item.is_blocked())
}

fn ready(item: &WorkItem) -> FieldValue {
    FieldValue::Bool(!item.is_blocked())
}

fn blocked_by(item: &WorkItem) -> FieldValue {
    FieldValue::List(item.blockers().to_vec())
}

fn blocking(item: &WorkItem) -> FieldValue {
    FieldValue::List(item.blocked_items().to_vec())
}

fn assignee(item: &WorkItem) -> FieldValue {
    optional_text(item.assignee.as_deref())
}

fn branch(item: &WorkItem) -> FieldValue {
    optional_text(item.branch.as_deref())
}

fn optional_text(value: Option<&str>) -> FieldValue {
    value.map_or(FieldValue::Missing, |v| FieldValue::Text(v.to_string()))
}

fn pr_state(item: &WorkItem) -> FieldValue {
    let state = item.pr.as_ref().map_or(NONE_VALUE, |pr| pr.state.as_str());
    FieldValue::Text(state.to_string())
}

#[allow(clippy::cast_precision_loss)]
fn pr_number(item: &WorkItem) -> FieldValue {
    item.pr
        .as_ref()
        .map_or(FieldValue::Missing, |pr| FieldValue::Number(pr.number as f64))
}

fn agent_state(item: &WorkItem) -> FieldValue {
    let state = item
        .agent
        .as_ref()
        .map_or(NONE_VALUE, |agent| agent.state.as_str());
    FieldValue::Text(state.to_string())
}

/// Default branch: case-insensitive lookup among the item's extra properties.
fn extra_field(item: &WorkItem, field: &str) -> FieldValue {
    item.extra
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(field))
        .map_or(FieldValue::Missing, |(_, value)| from_json(value))
}

fn from_json(value: &serde_json::Value) -> FieldValue {
    use serde_json::Value;

    match value {
        Value::String(s) => FieldValue::Text(s.clone()),
        Value::Number(n) => n.as_f64().map_or(FieldValue::Missing, FieldValue::Number),
        Value::Bool(b) => FieldValue::Bool(*b),
        Value::Array(values) => FieldValue::List(
            values
                .iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    Value::Bool(b) => Some(b.to_string()),
                    _ => None,
                })
                .collect(),
        ),
        Value::Null | Value::Object(_) => FieldValue::Missing,
    }
}
