//! Compile-once, evaluate-many query facade.
//!
//! Filtering is fail-open: an invalid or empty query lets every item
//! through so a half-typed search box never blanks the board.

use std::borrow::Cow;

use plank_core::model::item::WorkItem;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::ast::Expr;
use crate::eval::evaluate;
use crate::parser::parse_query;

/// A parsed query plus its validity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledFilter {
    pub query: String,
    pub ast: Option<Expr>,
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_position: Option<usize>,
}

impl CompiledFilter {
    /// Filter that matches everything (the empty query).
    #[must_use]
    pub const fn match_all() -> Self {
        Self {
            query: String::new(),
            ast: None,
            is_valid: true,
            error: None,
            error_position: None,
        }
    }

    /// The tree to evaluate, or `None` when the filter passes everything.
    #[must_use]
    pub const fn active_ast(&self) -> Option<&Expr> {
        if self.is_valid { self.ast.as_ref() } else { None }
    }
}

impl Default for CompiledFilter {
    fn default() -> Self {
        Self::match_all()
    }
}

/// Result of [`validate_query`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Parse `query` once for repeated evaluation. Never fails; errors are
/// recorded on the returned filter.
#[must_use]
#[instrument(level = "debug")]
pub fn compile_query(query: &str) -> CompiledFilter {
    let query = query.trim();
    match parse_query(query) {
        Ok(ast) => {
            debug!(
                predicates = ast.as_ref().map_or(0, Expr::predicate_count),
                "compiled query"
            );
            CompiledFilter {
                query: query.to_string(),
                ast,
                is_valid: true,
                error: None,
                error_position: None,
            }
        }
        Err(err) => {
            debug!(error = %err, "query did not compile");
            CompiledFilter {
                query: query.to_string(),
                ast: None,
                is_valid: false,
                error: Some(err.message),
                error_position: Some(err.position),
            }
        }
    }
}

/// Items matching `filter`, in input order.
///
/// Returns `items` itself, borrowed, when the filter is invalid or empty.
#[must_use]
pub fn filter_items<'a>(items: &'a [WorkItem], filter: &CompiledFilter) -> Cow<'a, [WorkItem]> {
    let Some(ast) = filter.active_ast() else {
        return Cow::Borrowed(items);
    };
    Cow::Owned(
        items
            .iter()
            .filter(|item| evaluate(ast, item))
            .cloned()
            .collect(),
    )
}

/// Whether a single item passes `filter`.
#[must_use]
pub fn matches_filter(item: &WorkItem, filter: &CompiledFilter) -> bool {
    filter.active_ast().is_none_or(|ast| evaluate(ast, item))
}

/// Check `query` without keeping the tree.
#[must_use]
pub fn validate_query(query: &str) -> QueryValidation {
    match parse_query(query.trim()) {
        Ok(_) => QueryValidation {
            valid: true,
            error: None,
        },
        Err(err) => QueryValidation {
            valid: false,
            error: Some(err.message),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plank_core::model::priority::Priority;

    fn board() -> Vec<WorkItem> {
        vec![
            WorkItem::new("1", "Login page").with_priority(Priority::Urgent),
            WorkItem::new("2", "Signup form").with_priority(Priority::Low),
            WorkItem::new("3", "Login API").with_priority(Priority::Medium),
        ]
    }

    #[test]
    fn compile_trims_and_records_query() {
        let filter = compile_query("  login  ");
        assert_eq!(filter.query, "login");
        assert!(filter.is_valid);
        assert!(filter.ast.is_some());
    }

    #[test]
    fn empty_query_is_valid_without_ast() {
        let filter = compile_query("   ");
        assert!(filter.is_valid);
        assert!(filter.ast.is_none());
        assert_eq!(filter, CompiledFilter::match_all());
    }

    #[test]
    fn invalid_query_keeps_error_and_position() {
        let filter = compile_query("(login");
        assert!(!filter.is_valid);
        assert!(filter.ast.is_none());
        assert_eq!(filter.error_position, Some(6));
        assert!(filter.error.as_deref().is_some_and(|e| e.contains("closing")));
    }

    #[test]
    fn invalid_filter_passes_items_through_unchanged() {
        let items = board();
        let out = filter_items(&items, &compile_query("(login"));
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out.as_ref(), items.as_slice());
        assert!(matches_filter(&items[1], &compile_query("AND")));
    }

    #[test]
    fn filtering_preserves_input_order() {
        let items = board();
        let out = filter_items(&items, &compile_query("login"));
        let ids: Vec<&str> = out.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
        assert!(matches!(out, Cow::Owned(_)));
    }

    #[test]
    fn validate_reports_message_only() {
        assert_eq!(
            validate_query("priority:1"),
            QueryValidation {
                valid: true,
                error: None
            }
        );
        let bad = validate_query("a OR");
        assert!(!bad.valid);
        assert!(bad.error.is_some());
    }

    #[test]
    fn compiled_filter_serializes_camel_case() {
        let json = serde_json::to_value(compile_query("(x")).unwrap();
        assert_eq!(json["isValid"], false);
        assert_eq!(json["errorPosition"], 2);
    }
}
