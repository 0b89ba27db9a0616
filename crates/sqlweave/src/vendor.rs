//! Database vendors, escaping, and placeholder rewriting.
//!
//! The assembler never emits vendor-specific placeholders. Wherever a bound parameter
//! belongs it writes [`PLACEHOLDER`], and the statement is rewritten into the target
//! vendor's positional syntax right before it is handed to a driver:
//!
//! ```ignore
//! use sqlweave::{rewrite_placeholders, PlaceholderStyle, PLACEHOLDER};
//!
//! let sql = format!("a = {PLACEHOLDER} AND b = {PLACEHOLDER}");
//! assert_eq!(rewrite_placeholders(&sql, PlaceholderStyle::Numbered), "a = $1 AND b = $2");
//! ```

use crate::error::QbError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Vendor-neutral marker emitted wherever a bound parameter belongs.
pub const PLACEHOLDER: &str = "__param__";

/// Supported database vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Vendor {
    MySql,
    PostgreSql,
    Sqlite3,
    SqlServer,
}

/// Native positional parameter syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `?` for every parameter
    Question,
    /// `$1, $2, ...`
    Numbered,
}

impl Vendor {
    /// All supported vendors.
    pub const ALL: [Vendor; 4] = [
        Vendor::MySql,
        Vendor::PostgreSql,
        Vendor::Sqlite3,
        Vendor::SqlServer,
    ];

    /// Canonical lowercase identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::MySql => "mysql",
            Vendor::PostgreSql => "postgresql",
            Vendor::Sqlite3 => "sqlite3",
            Vendor::SqlServer => "sqlserver",
        }
    }

    /// Positional placeholder syntax understood by this vendor's driver.
    pub fn placeholder_style(&self) -> PlaceholderStyle {
        match self {
            Vendor::PostgreSql => PlaceholderStyle::Numbered,
            Vendor::MySql | Vendor::Sqlite3 | Vendor::SqlServer => PlaceholderStyle::Question,
        }
    }

    /// Escape a raw string for inclusion between single quotes.
    ///
    /// MySQL treats backslash as an escape character inside string literals, so it is
    /// doubled there; every vendor gets `'` doubled. NUL bytes are dropped.
    pub fn escape(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len() + 2);
        for ch in raw.chars() {
            match ch {
                '\'' => out.push_str("''"),
                '\\' if *self == Vendor::MySql => out.push_str("\\\\"),
                '\0' => {}
                c => out.push(c),
            }
        }
        out
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vendor {
    type Err = QbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mysqli" | "mariadb" => Ok(Vendor::MySql),
            "pgsql" | "postgres" | "postgresql" => Ok(Vendor::PostgreSql),
            "sqlite" | "sqlite3" => Ok(Vendor::Sqlite3),
            "sqlsrv" | "mssql" | "sqlserver" => Ok(Vendor::SqlServer),
            other => Err(QbError::Config(format!("unknown vendor '{other}'"))),
        }
    }
}

impl TryFrom<String> for Vendor {
    type Error = QbError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Vendor> for String {
    fn from(v: Vendor) -> Self {
        v.as_str().to_string()
    }
}

/// The context a driver layer supplies to the assembler: which vendor is active and
/// how raw strings are escaped when parameter mode is off.
pub trait Dialect: Send + Sync {
    /// The active vendor, or `None` when no connection context has been established.
    fn vendor(&self) -> Option<Vendor>;

    /// Escape a raw string for inclusion between single quotes.
    fn escape(&self, raw: &str) -> String {
        match self.vendor() {
            Some(v) => v.escape(raw),
            None => raw.replace('\'', "''"),
        }
    }
}

impl Dialect for Vendor {
    fn vendor(&self) -> Option<Vendor> {
        Some(*self)
    }
}

impl Dialect for Option<Vendor> {
    fn vendor(&self) -> Option<Vendor> {
        *self
    }
}

impl<D: Dialect + ?Sized> Dialect for std::sync::Arc<D> {
    fn vendor(&self) -> Option<Vendor> {
        (**self).vendor()
    }

    fn escape(&self, raw: &str) -> String {
        (**self).escape(raw)
    }
}

/// Rewrite every [`PLACEHOLDER`] into the given positional syntax, numbering from 1.
pub fn rewrite_placeholders(sql: &str, style: PlaceholderStyle) -> String {
    let mut result = String::with_capacity(sql.len());
    let mut idx = 0usize;
    let mut rest = sql;

    while let Some(pos) = rest.find(PLACEHOLDER) {
        result.push_str(&rest[..pos]);
        idx += 1;
        match style {
            PlaceholderStyle::Question => result.push('?'),
            PlaceholderStyle::Numbered => {
                result.push('$');
                result.push_str(&idx.to_string());
            }
        }
        rest = &rest[pos + PLACEHOLDER.len()..];
    }
    result.push_str(rest);

    result
}

/// Count the [`PLACEHOLDER`] markers in a SQL string.
pub fn count_placeholders(sql: &str) -> usize {
    sql.matches(PLACEHOLDER).count()
}
