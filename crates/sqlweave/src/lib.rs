//! # sqlweave
//!
//! A vendor-agnostic SQL statement assembler.
//!
//! ## Features
//!
//! - **Condition trees**: typed builders (`eq`, `like`, `in_list`, `between`, ...) with
//!   combinators and nested groups
//! - **Parameter bookkeeping**: values are bound behind a generic placeholder and
//!   rewritten to `?` or `$n` for the target vendor
//! - **Escaped mode**: inline quoted literals through the driver's escape function
//! - **Order-free composition**: pre-built JOIN/WHERE/GROUP BY/HAVING/ORDER BY/LIMIT/UNION
//!   fragments are placed in grammar order
//! - **Schema DSL**: abstract column types resolved against per-vendor keyword tables
//!
//! ## Example
//!
//! ```ignore
//! use sqlweave::prelude::*;
//!
//! let mut qb = Composer::new(Vendor::PostgreSql);
//! let filter = qb.where_clause([eq("status", "active"), gt("age", 18)])?;
//! let stmt = qb.select("users", ["id", "name"], [filter, limit(10, None)])?;
//!
//! assert_eq!(
//!     stmt.to_vendor_sql(Vendor::PostgreSql),
//!     "SELECT id, name FROM users WHERE status = $1 AND age > $2 LIMIT 10 "
//! );
//!
//! // Execute mutations on any `GenericClient`
//! let affected = qb
//!     .update("users", [("last_seen", "NOW()")], [eq("id", 7)])?
//!     .execute(&client)
//!     .await?;
//! ```

pub mod client;
pub mod condition;
pub mod config;
pub mod db;
pub mod error;
pub mod prelude;
pub mod qb;
pub mod schema;
pub mod value;
pub mod vendor;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use client::GenericClient;
pub use condition::{
    Combinator, CompareOp, Condition, ConditionTree, Expression, GroupMarker, between, eq,
    grouping, gt, gte, in_list, is_not_null, is_null, like, lt, lte, ne, neq, not_between,
    not_in, not_like,
};
pub use config::ComposerConfig;
pub use db::Db;
pub use error::{QbError, QbResult};
pub use qb::{
    Clause, ClauseKeyword, Composer, Direction, Fragment, FragmentKind, Join, JoinKind,
    NO_CLAUSES, ParamList, Statement, StatementKind, full_join, group_by, inner_join, join,
    left_join, limit, order_by, right_join,
};
pub use schema::{ColumnSchema, Schema, SchemaArg};
pub use value::Value;
pub use vendor::{
    Dialect, PLACEHOLDER, PlaceholderStyle, Vendor, count_placeholders, rewrite_placeholders,
};
