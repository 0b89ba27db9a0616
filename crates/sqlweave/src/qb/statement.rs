//! Finished statements.

use crate::client::GenericClient;
use crate::error::{QbError, QbResult};
use crate::qb::param::ParamList;
use crate::value::Value;
use crate::vendor::{Vendor, count_placeholders, rewrite_placeholders};
use std::fmt;

/// The operation a statement performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Replace,
    Update,
    Delete,
    InsertSelect,
    CreateSelect,
    SelectInto,
    Create,
    Alter,
    Drop,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Select => "select",
            StatementKind::Insert => "insert",
            StatementKind::Replace => "replace",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
            StatementKind::InsertSelect => "insert_select",
            StatementKind::CreateSelect => "create_select",
            StatementKind::SelectInto => "select_into",
            StatementKind::Create => "create",
            StatementKind::Alter => "alter",
            StatementKind::Drop => "drop",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SQL text with generic placeholders plus the values bound to them, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    kind: StatementKind,
    sql: String,
    params: ParamList,
    /// Built in parameter mode. Escaped statements carry no placeholders of their own,
    /// so marker text inside their literals is user data.
    prepared: bool,
}

impl Statement {
    pub(crate) fn new(
        kind: StatementKind,
        sql: String,
        params: ParamList,
        prepared: bool,
    ) -> Self {
        let prepared = prepared || !params.is_empty();
        Self {
            kind,
            sql,
            params,
            prepared,
        }
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// SQL with vendor-neutral placeholders.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        self.params.as_slice()
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params.into_vec())
    }

    /// SQL rewritten into the vendor's positional placeholder syntax.
    ///
    /// Escaped statements are returned as built.
    pub fn to_vendor_sql(&self, vendor: Vendor) -> String {
        if self.prepared {
            rewrite_placeholders(&self.sql, vendor.placeholder_style())
        } else {
            self.sql.clone()
        }
    }

    /// Hand the statement to a client, once.
    ///
    /// Placeholders are rewritten for the client's vendor. Parameters are forwarded
    /// only when there are any.
    pub async fn execute<C: GenericClient + ?Sized>(&self, client: &C) -> QbResult<u64> {
        let placeholders = if self.prepared {
            count_placeholders(&self.sql)
        } else {
            0
        };
        if placeholders != self.params.len() {
            return Err(QbError::query(format!(
                "statement has {placeholders} placeholders but {} parameters",
                self.params.len()
            )));
        }

        let sql = match client.vendor() {
            Some(vendor) => self.to_vendor_sql(vendor),
            None if placeholders == 0 => self.sql.clone(),
            None => return Err(QbError::NoVendor),
        };

        let affected = client.execute(&sql, self.params.as_slice()).await?;
        tracing::trace!(
            target: "sqlweave.sql",
            kind = %self.kind,
            param_count = self.params.len(),
            affected,
            "statement executed"
        );
        Ok(affected)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
