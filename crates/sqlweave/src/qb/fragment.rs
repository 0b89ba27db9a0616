//! Clause fragments and keyword sniffing.
//!
//! Every clause builder returns a [`Fragment`]: rendered SQL text, the clause it
//! belongs to, and the parameters bound by its placeholders. Fragments can also be
//! created from plain strings, in which case the clause is recognized from the
//! leading keyword so the composer can slot it into the right position.

use crate::error::{QbError, QbResult};
use crate::qb::param::ParamList;
use crate::value::Value;
use std::fmt;

/// Which clause a fragment renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FragmentKind {
    Join,
    Where,
    GroupBy,
    Having,
    OrderBy,
    Limit,
    Union,
    /// Not recognized as any clause
    Raw,
}

impl FragmentKind {
    /// Clause-grammar position; fragments are concatenated in ascending rank.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            FragmentKind::Join => 0,
            FragmentKind::Where => 1,
            FragmentKind::GroupBy => 2,
            FragmentKind::Having => 3,
            FragmentKind::OrderBy => 4,
            FragmentKind::Limit => 5,
            FragmentKind::Union => 6,
            FragmentKind::Raw => 7,
        }
    }

    /// Whether a statement may carry more than one fragment of this kind.
    pub(crate) fn repeatable(&self) -> bool {
        matches!(self, FragmentKind::Join | FragmentKind::Union)
    }
}

/// Keywords that may open a JOIN fragment.
const JOIN_PREFIXES: [&str; 7] = ["JOIN", "INNER", "LEFT", "RIGHT", "FULL", "CROSS", "NATURAL"];

pub(crate) fn starts_with_keyword(s: &str, keyword: &str) -> bool {
    match s.get(0..keyword.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(keyword) => s[keyword.len()..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_ascii_alphanumeric() && c != '_'),
        _ => false,
    }
}

/// Recognize the clause a pre-rendered SQL string belongs to.
pub fn classify(sql: &str) -> FragmentKind {
    let s = sql.trim_start();
    if starts_with_keyword(s, "WHERE") {
        FragmentKind::Where
    } else if starts_with_keyword(s, "GROUP BY") {
        FragmentKind::GroupBy
    } else if starts_with_keyword(s, "HAVING") {
        FragmentKind::Having
    } else if starts_with_keyword(s, "ORDER BY") {
        FragmentKind::OrderBy
    } else if starts_with_keyword(s, "LIMIT") {
        FragmentKind::Limit
    } else if starts_with_keyword(s, "UNION") {
        FragmentKind::Union
    } else if JOIN_PREFIXES.iter().any(|k| starts_with_keyword(s, k))
        && s.to_ascii_uppercase().contains("JOIN")
    {
        FragmentKind::Join
    } else {
        FragmentKind::Raw
    }
}

/// A rendered clause and the parameters its placeholders stand for.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    kind: FragmentKind,
    sql: String,
    params: ParamList,
}

impl Fragment {
    pub(crate) fn new(kind: FragmentKind, sql: String, params: ParamList) -> Self {
        Self { kind, sql, params }
    }

    /// Wrap a pre-rendered SQL string, recognizing its clause by keyword.
    pub fn raw(sql: impl Into<String>) -> Self {
        let sql = sql.into();
        Self {
            kind: classify(&sql),
            sql,
            params: ParamList::new(),
        }
    }

    /// Wrap a pre-rendered SQL string together with the values for its placeholders.
    pub fn with_params(sql: impl Into<String>, params: Vec<Value>) -> Self {
        let mut fragment = Self::raw(sql);
        fragment.params = ParamList::from(params);
        fragment
    }

    pub fn kind(&self) -> FragmentKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &ParamList {
        &self.params
    }

    pub fn into_parts(self) -> (String, ParamList) {
        (self.sql, self.params)
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

impl From<&str> for Fragment {
    fn from(s: &str) -> Self {
        Fragment::raw(s)
    }
}

impl From<String> for Fragment {
    fn from(s: String) -> Self {
        Fragment::raw(s)
    }
}

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

fn column_list<I, S>(columns: I) -> QbResult<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let cols: Vec<String> = columns
        .into_iter()
        .map(|c| c.as_ref().trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    if cols.is_empty() {
        return Err(QbError::EmptyArgument("column list"));
    }
    Ok(cols.join(", "))
}

/// ` GROUP BY a, b `
pub fn group_by<I, S>(columns: I) -> QbResult<Fragment>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let cols = column_list(columns)?;
    Ok(Fragment::new(
        FragmentKind::GroupBy,
        format!(" GROUP BY {cols} "),
        ParamList::new(),
    ))
}

/// ` ORDER BY a, b DESC `
pub fn order_by<I, S>(columns: I, direction: Direction) -> QbResult<Fragment>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let cols = column_list(columns)?;
    Ok(Fragment::new(
        FragmentKind::OrderBy,
        format!(" ORDER BY {cols} {} ", direction.as_str()),
        ParamList::new(),
    ))
}

/// ` LIMIT n ` or ` LIMIT n OFFSET m `
pub fn limit(count: u64, offset: Option<u64>) -> Fragment {
    let sql = match offset {
        Some(offset) => format!(" LIMIT {count} OFFSET {offset} "),
        None => format!(" LIMIT {count} "),
    };
    Fragment::new(FragmentKind::Limit, sql, ParamList::new())
}
