//! Condition primitives for WHERE/HAVING clauses.
//!
//! A [`Condition`] is one leaf test ([`Expression`]) plus the combinator that joins it
//! to the *next* leaf and an optional group marker. Conditions nest into a
//! [`ConditionTree`] through [`grouping`].
//!
//! # Example
//! ```ignore
//! use sqlweave::condition::{eq, gt, grouping, like};
//!
//! let tree = vec![
//!     eq("status", "active").into(),
//!     grouping([like("name", "a%").or(), gt("age", 30)]),
//! ];
//! // WHERE status = '...' AND (name LIKE '...' OR age > '...')
//! ```

use crate::value::Value;
use std::fmt;

/// Comparison operators of the equality family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `<>`
    Ne,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `>`
    Gt,
    /// `>=`
    Gte,
}

impl CompareOp {
    /// SQL token.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
        }
    }

    /// Parse a SQL comparison token.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "=" => Some(CompareOp::Eq),
            "<>" => Some(CompareOp::Ne),
            "!=" => Some(CompareOp::NotEq),
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Lte),
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::Gte),
            _ => None,
        }
    }

    /// `<>` and `!=`
    pub fn is_negative(&self) -> bool {
        matches!(self, CompareOp::Ne | CompareOp::NotEq)
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean joiner placed after a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combinator {
    #[default]
    And,
    Or,
    Not,
    AndNot,
}

impl Combinator {
    /// SQL token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Combinator::And => "AND",
            Combinator::Or => "OR",
            Combinator::Not => "NOT",
            Combinator::AndNot => "AND NOT",
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Literal parenthesis attached to a single condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupMarker {
    /// `(` before the condition
    Open,
    /// `)` after the condition
    Close,
}

/// A single leaf test.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// column op value
    Comparison {
        column: String,
        op: CompareOp,
        value: Value,
    },
    /// column [NOT] LIKE pattern
    Pattern {
        column: String,
        pattern: Value,
        negated: bool,
    },
    /// column [NOT] IN (values...)
    SetMembership {
        column: String,
        values: Vec<Value>,
        negated: bool,
    },
    /// column [NOT] BETWEEN low AND high
    Range {
        column: String,
        low: Value,
        high: Value,
        negated: bool,
    },
    /// column IS [NOT] NULL
    Nullness { column: String, negated: bool },
    /// Operator token supplied as text; classified when the clause is assembled.
    Tuple {
        column: String,
        operator: String,
        values: Vec<Value>,
    },
}

impl Expression {
    /// Column this expression tests.
    pub fn column(&self) -> &str {
        match self {
            Expression::Comparison { column, .. }
            | Expression::Pattern { column, .. }
            | Expression::SetMembership { column, .. }
            | Expression::Range { column, .. }
            | Expression::Nullness { column, .. }
            | Expression::Tuple { column, .. } => column,
        }
    }

    /// Operator token as it appears in SQL.
    pub fn operator_token(&self) -> &str {
        match self {
            Expression::Comparison { op, .. } => op.as_str(),
            Expression::Pattern { negated, .. } => {
                if *negated {
                    "NOT LIKE"
                } else {
                    "LIKE"
                }
            }
            Expression::SetMembership { negated, .. } => {
                if *negated {
                    "NOT IN"
                } else {
                    "IN"
                }
            }
            Expression::Range { negated, .. } => {
                if *negated {
                    "NOT BETWEEN"
                } else {
                    "BETWEEN"
                }
            }
            Expression::Nullness { negated, .. } => {
                if *negated {
                    "IS NOT"
                } else {
                    "IS"
                }
            }
            Expression::Tuple { operator, .. } => operator,
        }
    }
}

/// A leaf condition with its trailing combinator and optional group marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    expr: Expression,
    combinator: Combinator,
    group: Option<GroupMarker>,
}

impl Condition {
    /// Wrap an expression, joined to the next condition with `AND`.
    pub fn new(expr: Expression) -> Self {
        Self {
            expr,
            combinator: Combinator::And,
            group: None,
        }
    }

    /// Build a condition from a textual operator token.
    ///
    /// The token is not checked here; an unknown or empty operator fails the
    /// WHERE/HAVING build it ends up in.
    pub fn from_parts<V: Into<Value>>(
        column: impl Into<String>,
        operator: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::new(Expression::Tuple {
            column: column.into(),
            operator: operator.into(),
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    /// Set the combinator that joins this condition to the next one.
    pub fn combine(mut self, combinator: Combinator) -> Self {
        self.combinator = combinator;
        self
    }

    /// Join to the next condition with `AND`.
    pub fn and(self) -> Self {
        self.combine(Combinator::And)
    }

    /// Join to the next condition with `OR`.
    pub fn or(self) -> Self {
        self.combine(Combinator::Or)
    }

    /// Join to the next condition with `NOT`.
    pub fn not(self) -> Self {
        self.combine(Combinator::Not)
    }

    /// Join to the next condition with `AND NOT`.
    pub fn and_not(self) -> Self {
        self.combine(Combinator::AndNot)
    }

    /// Emit `(` before this condition.
    pub fn open_group(mut self) -> Self {
        self.group = Some(GroupMarker::Open);
        self
    }

    /// Emit `)` after this condition.
    pub fn close_group(mut self) -> Self {
        self.group = Some(GroupMarker::Close);
        self
    }

    pub fn expression(&self) -> &Expression {
        &self.expr
    }

    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    pub fn group_marker(&self) -> Option<GroupMarker> {
        self.group
    }
}

/// A condition or a parenthesized group of conditions.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionTree {
    Leaf(Condition),
    Group(Vec<ConditionTree>),
}

impl From<Condition> for ConditionTree {
    fn from(c: Condition) -> Self {
        ConditionTree::Leaf(c)
    }
}

/// Group conditions so they render inside one pair of parentheses.
pub fn grouping<I, T>(items: I) -> ConditionTree
where
    I: IntoIterator<Item = T>,
    T: Into<ConditionTree>,
{
    ConditionTree::Group(items.into_iter().map(Into::into).collect())
}

fn compare(column: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Condition {
    Condition::new(Expression::Comparison {
        column: column.into(),
        op,
        value: value.into(),
    })
}

/// column = value
pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Condition {
    compare(column, CompareOp::Eq, value)
}

/// column <> value
pub fn neq(column: impl Into<String>, value: impl Into<Value>) -> Condition {
    compare(column, CompareOp::Ne, value)
}

/// column != value
pub fn ne(column: impl Into<String>, value: impl Into<Value>) -> Condition {
    compare(column, CompareOp::NotEq, value)
}

/// column < value
pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Condition {
    compare(column, CompareOp::Lt, value)
}

/// column <= value
pub fn lte(column: impl Into<String>, value: impl Into<Value>) -> Condition {
    compare(column, CompareOp::Lte, value)
}

/// column > value
pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Condition {
    compare(column, CompareOp::Gt, value)
}

/// column >= value
pub fn gte(column: impl Into<String>, value: impl Into<Value>) -> Condition {
    compare(column, CompareOp::Gte, value)
}

/// column LIKE pattern
pub fn like(column: impl Into<String>, pattern: impl Into<Value>) -> Condition {
    Condition::new(Expression::Pattern {
        column: column.into(),
        pattern: pattern.into(),
        negated: false,
    })
}

/// column NOT LIKE pattern
pub fn not_like(column: impl Into<String>, pattern: impl Into<Value>) -> Condition {
    Condition::new(Expression::Pattern {
        column: column.into(),
        pattern: pattern.into(),
        negated: true,
    })
}

/// column IN (values...)
pub fn in_list<V: Into<Value>>(
    column: impl Into<String>,
    values: impl IntoIterator<Item = V>,
) -> Condition {
    Condition::new(Expression::SetMembership {
        column: column.into(),
        values: values.into_iter().map(Into::into).collect(),
        negated: false,
    })
}

/// column NOT IN (values...)
pub fn not_in<V: Into<Value>>(
    column: impl Into<String>,
    values: impl IntoIterator<Item = V>,
) -> Condition {
    Condition::new(Expression::SetMembership {
        column: column.into(),
        values: values.into_iter().map(Into::into).collect(),
        negated: true,
    })
}

/// column BETWEEN low AND high
pub fn between(
    column: impl Into<String>,
    low: impl Into<Value>,
    high: impl Into<Value>,
) -> Condition {
    Condition::new(Expression::Range {
        column: column.into(),
        low: low.into(),
        high: high.into(),
        negated: false,
    })
}

/// column NOT BETWEEN low AND high
pub fn not_between(
    column: impl Into<String>,
    low: impl Into<Value>,
    high: impl Into<Value>,
) -> Condition {
    Condition::new(Expression::Range {
        column: column.into(),
        low: low.into(),
        high: high.into(),
        negated: true,
    })
}

/// column IS NULL
pub fn is_null(column: impl Into<String>) -> Condition {
    Condition::new(Expression::Nullness {
        column: column.into(),
        negated: false,
    })
}

/// column IS NOT NULL
pub fn is_not_null(column: impl Into<String>) -> Condition {
    Condition::new(Expression::Nullness {
        column: column.into(),
        negated: true,
    })
}
