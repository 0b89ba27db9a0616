//! Column definition DSL.
//!
//! Abstract type tokens are resolved against the active vendor's keyword tables and
//! rendered into column-definition fragments for `CREATE TABLE` / `ALTER TABLE`.
//!
//! ```ignore
//! use sqlweave::schema::{Schema, SchemaArg, NUMERIC, VARCHAR, AUTO, INTEGER};
//! use sqlweave::Vendor;
//!
//! let schema = Schema::new(&Vendor::MySql);
//! // id INTEGER NOT NULL AUTO_INCREMENT
//! schema.column("id", INTEGER, &["NOT NULL".into(), AUTO.into()])?;
//! // name VARCHAR(80) NOT NULL
//! schema.column("name", VARCHAR, &[80u32.into(), "NOT NULL".into()])?;
//! // price NUMERIC(6,2)
//! schema.column("price", NUMERIC, &[6u32.into(), 2u32.into()])?;
//! ```

mod types;

#[cfg(test)]
mod tests;

pub use types::{
    AUTO, BIGINT, BLOB, BOOLEAN, CHAR, DATE, DATETIME, DECIMAL, FLOAT, INT, INTEGER, JSON,
    NUMERIC, SEQUENCE, SMALLINT, TEXT, TIME, TIMESTAMP, TypeCategory, VARCHAR, lookup,
};

use crate::error::{QbError, QbResult};
use crate::vendor::{Dialect, Vendor};
use std::fmt;

/// Pseudo-types that render key lists and ALTER actions instead of a column.
pub const CONSTRAINT: &str = "CONSTRAINT";
pub const INDEX: &str = "INDEX";
pub const ADD: &str = "ADD";
pub const DROP: &str = "DROP";
pub const CHANGE: &str = "CHANGE";

const DEFAULT_PRECISION: u32 = 10;
const DEFAULT_SCALE: u32 = 2;

/// One argument after the type token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaArg {
    /// Size, precision or scale
    Int(u32),
    /// Literal, nullability, option or free-form extra
    Text(String),
}

impl From<u32> for SchemaArg {
    fn from(v: u32) -> Self {
        SchemaArg::Int(v)
    }
}

impl From<&str> for SchemaArg {
    fn from(v: &str) -> Self {
        SchemaArg::Text(v.to_string())
    }
}

impl From<String> for SchemaArg {
    fn from(v: String) -> Self {
        SchemaArg::Text(v)
    }
}

impl fmt::Display for SchemaArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaArg::Int(v) => write!(f, "{v}"),
            SchemaArg::Text(s) => f.write_str(s.trim()),
        }
    }
}

/// Parsed column definition, rendered once against a vendor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: Option<String>,
    pub category: TypeCategory,
    pub type_name: &'static str,
    pub size: Option<u32>,
    pub precision: Option<(u32, u32)>,
    pub literal: Option<String>,
    /// Nullability, default, constraint and extra tokens, in order
    pub options: Vec<String>,
}

fn text_tokens(args: &[SchemaArg]) -> impl Iterator<Item = String> + '_ {
    args.iter()
        .map(ToString::to_string)
        .filter(|s| !s.is_empty())
}

impl ColumnSchema {
    /// Resolve `token` for `vendor` and sort the arguments into their slots.
    pub fn parse(
        vendor: Vendor,
        name: Option<&str>,
        token: &str,
        args: &[SchemaArg],
    ) -> QbResult<Self> {
        let (category, type_name) = lookup(vendor, token)
            .ok_or_else(|| QbError::UnknownDataType(token.trim().to_string()))?;

        let mut column = ColumnSchema {
            name: name.map(|n| n.trim().to_string()),
            category,
            type_name,
            size: None,
            precision: None,
            literal: None,
            options: Vec::new(),
        };

        match category {
            TypeCategory::String | TypeCategory::WholeNumber | TypeCategory::DateTime => {
                let rest = match args.first() {
                    Some(SchemaArg::Int(size)) => {
                        column.size = Some(*size);
                        &args[1..]
                    }
                    Some(SchemaArg::Text(literal)) if !is_option_token(literal) => {
                        column.literal = Some(literal.trim().to_string());
                        &args[1..]
                    }
                    _ => args,
                };
                column.options = text_tokens(rest).collect();
            }
            TypeCategory::FixedPoint => {
                let ints: Vec<u32> = args
                    .iter()
                    .take(2)
                    .map_while(|a| match a {
                        SchemaArg::Int(v) => Some(*v),
                        SchemaArg::Text(_) => None,
                    })
                    .collect();
                let precision = ints.first().copied().unwrap_or(DEFAULT_PRECISION);
                let scale = ints.get(1).copied().unwrap_or(DEFAULT_SCALE);
                column.precision = Some((precision, scale));
                column.options = text_tokens(&args[ints.len()..]).collect();
            }
            TypeCategory::LargeObject => {
                column.options = text_tokens(args).collect();
            }
        }
        Ok(column)
    }

    /// Render the definition, substituting the increment placeholders.
    pub fn render(&self, vendor: Vendor) -> String {
        let mut tokens: Vec<String> = Vec::with_capacity(self.options.len() + 3);
        if let Some(name) = &self.name {
            tokens.push(name.clone());
        }
        let ty = match (self.size, self.precision) {
            (Some(size), _) => format!("{}({size})", self.type_name),
            (None, Some((p, s))) => format!("{}({p},{s})", self.type_name),
            (None, None) => self.type_name.to_string(),
        };
        tokens.push(ty);
        if let Some(literal) = &self.literal {
            tokens.push(literal.clone());
        }
        tokens.extend(self.options.iter().cloned());

        tokens
            .join(" ")
            .replace(AUTO, types::auto_increment(vendor))
            .replace(SEQUENCE, types::sequence(vendor))
    }
}

/// Tokens that belong to the option slots rather than the literal slot.
fn is_option_token(s: &str) -> bool {
    let upper = s.trim().to_ascii_uppercase();
    upper.starts_with("NOT NULL")
        || upper == "NULL"
        || upper.starts_with("DEFAULT")
        || upper.starts_with("PRIMARY KEY")
        || upper.starts_with("UNIQUE")
        || upper.starts_with("CHECK")
        || upper.starts_with("REFERENCES")
        || s.contains(AUTO)
        || s.contains(SEQUENCE)
}

/// Column definitions and key/ALTER fragments for one dialect.
#[derive(Clone, Copy)]
pub struct Schema<'d> {
    dialect: &'d dyn Dialect,
}

impl<'d> Schema<'d> {
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self { dialect }
    }

    fn vendor(&self) -> QbResult<Vendor> {
        self.dialect.vendor().ok_or(QbError::NoVendor)
    }

    /// `<name> <type definition>`, or a pseudo-type fragment when `token` is one of
    /// [`CONSTRAINT`], [`INDEX`], [`ADD`], [`DROP`] or [`CHANGE`].
    pub fn column(&self, name: &str, token: &str, args: &[SchemaArg]) -> QbResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(QbError::EmptyArgument("column name"));
        }
        let vendor = self.vendor()?;
        let pseudo = token.trim().to_ascii_uppercase();
        match pseudo.as_str() {
            CONSTRAINT => self.constraint(name, args),
            INDEX => key_list(args).map(|keys| format!("INDEX {name} ({keys})")),
            ADD => {
                let (ty, rest) = split_type(args)?;
                Ok(format!("ADD {name} {}", self.datatype(&ty, rest)?))
            }
            DROP => Ok(format!("DROP COLUMN {name}")),
            CHANGE => {
                let (ty, rest) = split_type(args)?;
                self.change(vendor, name, &ty, rest)
            }
            _ => resolve(vendor, Some(name), token, args),
        }
    }

    /// Type definition without a column name.
    pub fn datatype(&self, token: &str, args: &[SchemaArg]) -> QbResult<String> {
        let vendor = self.vendor()?;
        resolve(vendor, None, token, args)
    }

    fn constraint(&self, name: &str, args: &[SchemaArg]) -> QbResult<String> {
        let (key_type, keys) = match args.split_first() {
            Some((SchemaArg::Text(kt), rest)) if !kt.trim().is_empty() => (kt.trim(), rest),
            _ => return Err(QbError::EmptyArgument("constraint key type")),
        };
        let keys = key_list(keys)?;
        Ok(format!(
            "CONSTRAINT {name} {} ({keys})",
            key_type.to_ascii_uppercase()
        ))
    }

    fn change(
        &self,
        vendor: Vendor,
        name: &str,
        token: &str,
        args: &[SchemaArg],
    ) -> QbResult<String> {
        let ty = resolve(vendor, None, token, args)?;
        match vendor {
            Vendor::MySql => Ok(format!("MODIFY {name} {ty}")),
            Vendor::PostgreSql => Ok(format!("ALTER COLUMN {name} TYPE {ty}")),
            Vendor::SqlServer => Ok(format!("ALTER COLUMN {name} {ty}")),
            Vendor::Sqlite3 => Err(QbError::unsupported(vendor, "changing a column definition")),
        }
    }

    /// `CONSTRAINT <name> PRIMARY KEY (<keys>)`
    pub fn primary<I, S>(&self, name: &str, keys: I) -> QbResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.column(name, CONSTRAINT, &key_args("PRIMARY KEY", keys))
    }

    /// `CONSTRAINT <name> UNIQUE (<keys>)`
    pub fn unique<I, S>(&self, name: &str, keys: I) -> QbResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.column(name, CONSTRAINT, &key_args("UNIQUE", keys))
    }

    /// `CONSTRAINT <name> FOREIGN KEY (<keys>) REFERENCES <table> (<columns>)`
    pub fn foreign<I, S, J, T>(
        &self,
        name: &str,
        keys: I,
        table: &str,
        references: J,
    ) -> QbResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        J: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let table = table.trim();
        if table.is_empty() {
            return Err(QbError::EmptyArgument("referenced table"));
        }
        let constraint = self.column(name, CONSTRAINT, &key_args("FOREIGN KEY", keys))?;
        let references: Vec<SchemaArg> = references
            .into_iter()
            .map(|k| SchemaArg::from(k.as_ref()))
            .collect();
        Ok(format!(
            "{constraint} REFERENCES {table} ({})",
            key_list(&references)?
        ))
    }

    /// `INDEX <name> (<keys>)`
    pub fn index<I, S>(&self, name: &str, keys: I) -> QbResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: Vec<SchemaArg> = keys.into_iter().map(|k| SchemaArg::from(k.as_ref())).collect();
        self.column(name, INDEX, &keys)
    }

    /// `ADD <name> <type definition>`
    pub fn add_column(&self, name: &str, token: &str, args: &[SchemaArg]) -> QbResult<String> {
        let mut all = Vec::with_capacity(args.len() + 1);
        all.push(SchemaArg::from(token));
        all.extend_from_slice(args);
        self.column(name, ADD, &all)
    }

    /// `DROP COLUMN <name>`
    pub fn drop_column(&self, name: &str) -> QbResult<String> {
        self.column(name, DROP, &[])
    }

    /// Vendor ALTER verb for changing a column's type.
    pub fn changing_column(&self, name: &str, token: &str, args: &[SchemaArg]) -> QbResult<String> {
        let mut all = Vec::with_capacity(args.len() + 1);
        all.push(SchemaArg::from(token));
        all.extend_from_slice(args);
        self.column(name, CHANGE, &all)
    }
}

fn resolve(
    vendor: Vendor,
    name: Option<&str>,
    token: &str,
    args: &[SchemaArg],
) -> QbResult<String> {
    match ColumnSchema::parse(vendor, name, token, args) {
        Ok(column) => Ok(column.render(vendor)),
        Err(err) => {
            tracing::warn!(
                target: "sqlweave.qb",
                vendor = %vendor,
                token = %token.trim(),
                "data type not found"
            );
            Err(err)
        }
    }
}

fn split_type(args: &[SchemaArg]) -> QbResult<(String, &[SchemaArg])> {
    match args.split_first() {
        Some((SchemaArg::Text(ty), rest)) if !ty.trim().is_empty() => {
            Ok((ty.trim().to_string(), rest))
        }
        _ => Err(QbError::EmptyArgument("data type")),
    }
}

fn key_args<I, S>(key_type: &str, keys: I) -> Vec<SchemaArg>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    std::iter::once(SchemaArg::from(key_type))
        .chain(keys.into_iter().map(|k| SchemaArg::from(k.as_ref())))
        .collect()
}

fn key_list(keys: &[SchemaArg]) -> QbResult<String> {
    let keys: Vec<String> = text_tokens(keys).collect();
    if keys.is_empty() {
        return Err(QbError::EmptyArgument("key columns"));
    }
    Ok(keys.join(", "))
}
