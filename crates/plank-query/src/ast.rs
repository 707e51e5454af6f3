//! Immutable query AST.
//!
//! Built once per compiled query and evaluated against many items. Nothing
//! in here is mutated after parsing, so a tree can be shared freely.

use std::fmt;

use serde::Serialize;

/// Comparison embedded in a field value (`priority:>=2`, `title:*auth*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    /// Inclusive numeric range; the upper bound lives in `range_end`.
    Range,
    Contains,
}

/// Leaf predicate: `field` compared to `value` with `operator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPredicate {
    pub field: String,
    pub value: String,
    pub operator: Operator,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_end: Option<String>,
}

impl FieldPredicate {
    /// Split an operator prefix off `raw` and build the predicate.
    ///
    /// Prefixes are tried in order: `!`, `>=`, `<=`, `>`, `<`, then a
    /// `digits-digits` range, then a leading or trailing `*` (contains),
    /// falling back to equality.
    #[must_use]
    pub fn parse(field: &str, raw: &str) -> Self {
        let (operator, value, range_end) = split_operator(raw);
        Self {
            field: field.to_string(),
            value: value.to_string(),
            operator,
            range_end: range_end.map(str::to_string),
        }
    }
}

fn split_operator(raw: &str) -> (Operator, &str, Option<&str>) {
    const PREFIXES: [(&str, Operator); 5] = [
        ("!", Operator::NotEqual),
        (">=", Operator::GreaterOrEqual),
        ("<=", Operator::LessOrEqual),
        (">", Operator::GreaterThan),
        ("<", Operator::LessThan),
    ];

    for (prefix, operator) in PREFIXES {
        if let Some(rest) = raw.strip_prefix(prefix) {
            return (operator, rest, None);
        }
    }

    if let Some((low, high)) = split_range(raw) {
        return (Operator::Range, low, Some(high));
    }

    if raw.starts_with('*') || raw.ends_with('*') {
        return (Operator::Contains, raw.trim_matches('*'), None);
    }

    (Operator::Equal, raw, None)
}

fn split_range(raw: &str) -> Option<(&str, &str)> {
    let (low, high) = raw.split_once('-')?;
    (is_digits(low) && is_digits(high)).then_some((low, high))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Boolean expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Expr {
    Field(FieldPredicate),
    And { left: Box<Expr>, right: Box<Expr> },
    Or { left: Box<Expr>, right: Box<Expr> },
    Not { operand: Box<Expr> },
}

impl Expr {
    #[must_use]
    pub fn and(left: Self, right: Self) -> Self {
        Self::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[must_use]
    pub fn or(left: Self, right: Self) -> Self {
        Self::Or {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(operand: Self) -> Self {
        Self::Not {
            operand: Box::new(operand),
        }
    }

    #[must_use]
    pub fn field(field: &str, raw: &str) -> Self {
        Self::Field(FieldPredicate::parse(field, raw))
    }

    /// Number of leaf predicates in the tree.
    #[must_use]
    pub fn predicate_count(&self) -> usize {
        match self {
            Self::Field(_) => 1,
            Self::And { left, right } | Self::Or { left, right } => {
                left.predicate_count() + right.predicate_count()
            }
            Self::Not { operand } => operand.predicate_count(),
        }
    }
}

impl fmt::Display for FieldPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = &self.field;
        let value = &self.value;
        match self.operator {
            Operator::Equal => write!(f, "{field}:{value}"),
            Operator::NotEqual => write!(f, "{field}:!{value}"),
            Operator::GreaterThan => write!(f, "{field}:>{value}"),
            Operator::GreaterOrEqual => write!(f, "{field}:>={value}"),
            Operator::LessThan => write!(f, "{field}:<{value}"),
            Operator::LessOrEqual => write!(f, "{field}:<={value}"),
            Operator::Range => write!(
                f,
                "{field}:{value}-{}",
                self.range_end.as_deref().unwrap_or_default()
            ),
            Operator::Contains => write!(f, "{field}:*{value}*"),
        }
    }
}

/// Fully parenthesized rendering, handy for checking precedence.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(predicate) => write!(f, "{predicate}"),
            Self::And { left, right } => write!(f, "({left} AND {right})"),
            Self::Or { left, right } => write!(f, "({left} OR {right})"),
            Self::Not { operand } => write!(f, "NOT {operand}"),
        }
    }
}
