//! Generic client trait for statement execution.

use crate::error::QbResult;
use crate::value::Value;
use crate::vendor::Dialect;

/// A driver connection the assembler can hand finished statements to.
///
/// The [`Dialect`] supertrait supplies the active vendor (used for placeholder
/// rewriting and the schema DSL) and the escape function used when parameter mode
/// is off.
pub trait GenericClient: Dialect {
    /// Execute a statement and return the number of affected rows.
    ///
    /// `sql` already uses the vendor's native placeholder syntax; `params` is empty
    /// when nothing was bound.
    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = QbResult<u64>> + Send;
}

impl<C: GenericClient + ?Sized> GenericClient for std::sync::Arc<C> {
    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = QbResult<u64>> + Send {
        (**self).execute(sql, params)
    }
}
