//! Convenient imports for typical `sqlweave` usage.
//!
//! ```ignore
//! use sqlweave::prelude::*;
//! ```

pub use crate::{
    Clause, Composer, ComposerConfig, Condition, Db, Dialect, Direction, Fragment, GenericClient,
    NO_CLAUSES, QbError, QbResult, Schema, SchemaArg, Statement, Value, Vendor,
};

pub use crate::condition::{
    between, eq, grouping, gt, gte, in_list, is_not_null, is_null, like, lt, lte, ne, neq,
    not_between, not_in, not_like,
};

pub use crate::qb::{full_join, group_by, inner_join, left_join, limit, order_by, right_join};
