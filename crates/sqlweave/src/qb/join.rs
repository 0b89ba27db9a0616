//! JOIN fragments.

use crate::condition::CompareOp;
use crate::error::{QbError, QbResult};
use crate::qb::fragment::{Fragment, FragmentKind};
use crate::qb::param::ParamList;
use std::str::FromStr;

/// Supported join kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
            JoinKind::Full => "FULL",
        }
    }
}

impl FromStr for JoinKind {
    type Err = QbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INNER" => Ok(JoinKind::Inner),
            "LEFT" => Ok(JoinKind::Left),
            "RIGHT" => Ok(JoinKind::Right),
            "FULL" => Ok(JoinKind::Full),
            other => Err(QbError::UnsupportedJoin(format!("join kind '{other}'"))),
        }
    }
}

/// A join between `left` and `right`.
///
/// ```ignore
/// let f = Join::new(JoinKind::Left, "users", "orders", "id")
///     .right_column("user_id")
///     .alias("o")
///     .build()?;
/// assert_eq!(f.as_str(), " LEFT JOIN orders AS o ON users.id = o.user_id ");
/// ```
#[derive(Debug, Clone)]
pub struct Join {
    kind: JoinKind,
    left: String,
    right: String,
    left_column: String,
    right_column: Option<String>,
    alias: Option<String>,
    condition: String,
}

impl Join {
    pub fn new(
        kind: JoinKind,
        left: impl Into<String>,
        right: impl Into<String>,
        left_column: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            left: left.into(),
            right: right.into(),
            left_column: left_column.into(),
            right_column: None,
            alias: None,
            condition: CompareOp::Eq.as_str().to_string(),
        }
    }

    /// Column on the joined table; defaults to the left column name.
    pub fn right_column(mut self, column: impl Into<String>) -> Self {
        self.right_column = Some(column.into());
        self
    }

    /// Alias for the joined table; defaults to the table name.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Comparison token used in the ON clause (default `=`).
    pub fn condition(mut self, token: impl Into<String>) -> Self {
        self.condition = token.into();
        self
    }

    /// Render ` KIND JOIN right AS alias ON left.lc <op> alias.rc `.
    pub fn build(&self) -> QbResult<Fragment> {
        let left = self.left.trim();
        let right = self.right.trim();
        let left_column = self.left_column.trim();
        if left.is_empty() || right.is_empty() {
            return Err(QbError::EmptyArgument("join table"));
        }
        if left_column.is_empty() {
            return Err(QbError::EmptyArgument("join column"));
        }
        let op = CompareOp::parse(&self.condition).ok_or_else(|| {
            QbError::UnsupportedJoin(format!("join condition '{}'", self.condition.trim()))
        })?;

        let alias = self
            .alias
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(right);
        let right_column = self
            .right_column
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(left_column);

        Ok(Fragment::new(
            FragmentKind::Join,
            format!(
                " {} JOIN {right} AS {alias} ON {left}.{left_column} {op} {alias}.{right_column} ",
                self.kind.as_str()
            ),
            ParamList::new(),
        ))
    }
}

/// Join with a kind given as text (`INNER`, `LEFT`, `RIGHT`, `FULL`).
pub fn join(
    kind: &str,
    left: impl Into<String>,
    right: impl Into<String>,
    left_column: impl Into<String>,
) -> QbResult<Join> {
    Ok(Join::new(kind.parse()?, left, right, left_column))
}

/// ` INNER JOIN right AS right ON left.column = right.column `
pub fn inner_join(
    left: impl Into<String>,
    right: impl Into<String>,
    left_column: impl Into<String>,
) -> Join {
    Join::new(JoinKind::Inner, left, right, left_column)
}

pub fn left_join(
    left: impl Into<String>,
    right: impl Into<String>,
    left_column: impl Into<String>,
) -> Join {
    Join::new(JoinKind::Left, left, right, left_column)
}

pub fn right_join(
    left: impl Into<String>,
    right: impl Into<String>,
    left_column: impl Into<String>,
) -> Join {
    Join::new(JoinKind::Right, left, right, left_column)
}

pub fn full_join(
    left: impl Into<String>,
    right: impl Into<String>,
    left_column: impl Into<String>,
) -> Join {
    Join::new(JoinKind::Full, left, right, left_column)
}

impl TryFrom<Join> for Fragment {
    type Error = QbError;

    fn try_from(join: Join) -> Result<Self, Self::Error> {
        join.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_alias_and_right_column() {
        let f = inner_join("users", "profiles", "user_id").build().unwrap();
        assert_eq!(f.kind(), FragmentKind::Join);
        assert_eq!(
            f.as_str(),
            " INNER JOIN profiles AS profiles ON users.user_id = profiles.user_id "
        );
    }

    #[test]
    fn explicit_alias_column_and_condition() {
        let f = left_join("users", "orders", "id")
            .right_column("user_id")
            .alias("o")
            .condition(">=")
            .build()
            .unwrap();
        assert_eq!(f.as_str(), " LEFT JOIN orders AS o ON users.id >= o.user_id ");
    }

    #[test]
    fn kind_from_text() {
        let f = join("full", "a", "b", "id").unwrap().build().unwrap();
        assert!(f.as_str().starts_with(" FULL JOIN b"));
        assert!(matches!(
            join("CROSS", "a", "b", "id"),
            Err(QbError::UnsupportedJoin(_))
        ));
    }

    #[test]
    fn unsupported_condition_fails() {
        let err = right_join("a", "b", "id").condition("LIKE").build().unwrap_err();
        assert!(matches!(err, QbError::UnsupportedJoin(_)));
        assert!(err.is_soft());
    }

    #[test]
    fn empty_tables_fail() {
        assert!(inner_join("", "b", "id").build().is_err());
        assert!(inner_join("a", "b", " ").build().is_err());
    }
}
