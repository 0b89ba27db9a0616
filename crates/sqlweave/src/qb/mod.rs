//! Statement assembly.
//!
//! # Features
//!
//! - **Nested conditions**: groups flatten depth-first into parenthesized leaves
//! - **Two value modes**: bound parameters behind a generic placeholder, or escaped literals
//! - **Order-free clauses**: pre-built fragments are recognized and placed in grammar order
//! - **Vendor-neutral output**: placeholders are rewritten per vendor at execution time
//!
//! # Usage
//!
//! ```ignore
//! use sqlweave::prelude::*;
//!
//! let mut qb = Composer::new(Vendor::MySql);
//!
//! // SELECT with grouping, in any argument order
//! let having = qb.having([gt("COUNT(*)", 1)])?;
//! let filter = qb.where_clause([eq("status", "paid")])?;
//! let stmt = qb.select(
//!     "orders",
//!     ["customer_id", "COUNT(*)"],
//!     [having, group_by(["customer_id"])?, filter],
//! )?;
//!
//! // UPDATE
//! let stmt = qb.update("users", [("seen_at", "NOW()")], [eq("id", 7)])?;
//! ```

mod clause;
mod compose;
mod flatten;
mod fragment;
mod join;
mod param;
mod statement;


pub use clause::ClauseKeyword;
pub use compose::{Clause, Composer, NO_CLAUSES};
pub use flatten::{FlatLeaf, flatten};
pub use fragment::{Direction, Fragment, FragmentKind, classify, group_by, limit, order_by};
pub use join::{Join, JoinKind, full_join, inner_join, join, left_join, right_join};
pub use param::ParamList;
pub use statement::{Statement, StatementKind};
