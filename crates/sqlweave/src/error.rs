//! Error types for sqlweave

use thiserror::Error;

/// Result type alias for sqlweave operations
pub type QbResult<T> = Result<T, QbError>;

/// Error types for statement assembly and execution.
///
/// Most variants are *soft* rejections: the builder refused to produce SQL for the
/// input it was given and cleared any parameters it had accumulated. The one *hard*
/// variant is [`QbError::UnknownDataType`], which signals a broken schema definition
/// in the calling code rather than a data-shape problem.
#[derive(Debug, Error)]
pub enum QbError {
    /// A required argument (table name, column list, key/value pairs...) was empty
    #[error("Empty argument: {0}")]
    EmptyArgument(&'static str),

    /// A condition leaf was missing its column or operator
    #[error("Malformed condition: {0}")]
    MalformedCondition(String),

    /// Operator token not handled by any clause renderer
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// LIKE / NOT LIKE pattern without `%`, `_` or a placeholder marker
    #[error("LIKE pattern without wildcard: {0}")]
    MissingWildcard(String),

    /// Join kind or join comparison not supported
    #[error("Unsupported join: {0}")]
    UnsupportedJoin(String),

    /// A HAVING fragment was supplied without a GROUP BY fragment
    #[error("HAVING clause requires a GROUP BY clause")]
    HavingWithoutGroupBy,

    /// INSERT column list and SELECT column list differ in length
    #[error("INSERT names {insert} columns but SELECT yields {select}")]
    ColumnMismatch { insert: usize, select: usize },

    /// A pre-built fragment could not be classified or was supplied twice
    #[error("Invalid fragment: {0}")]
    InvalidFragment(String),

    /// No vendor context is available for schema rendering
    #[error("No active database vendor")]
    NoVendor,

    /// The active vendor has no equivalent for the requested construct
    #[error("Unsupported by {vendor}: {message}")]
    Unsupported { vendor: String, message: String },

    /// Abstract column type token not found in any vendor keyword table.
    ///
    /// This is the hard failure channel of the schema DSL.
    #[error("Data type not found: {0}")]
    UnknownDataType(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Query execution error reported by a client adapter
    #[error("Query error: {0}")]
    Query(String),

    /// PostgreSQL driver error
    #[cfg(feature = "postgres")]
    #[error("Postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),
}

impl QbError {
    /// Create a malformed condition error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedCondition(message.into())
    }

    /// Create an invalid fragment error
    pub fn invalid_fragment(message: impl Into<String>) -> Self {
        Self::InvalidFragment(message.into())
    }

    /// Create an unsupported-by-vendor error
    pub fn unsupported(vendor: impl std::fmt::Display, message: impl Into<String>) -> Self {
        Self::Unsupported {
            vendor: vendor.to_string(),
            message: message.into(),
        }
    }

    /// Create a query error from a driver message
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query(message.into())
    }

    /// Check if this is a soft build rejection (as opposed to a programming or driver error).
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            Self::EmptyArgument(_)
                | Self::MalformedCondition(_)
                | Self::UnsupportedOperator(_)
                | Self::MissingWildcard(_)
                | Self::UnsupportedJoin(_)
                | Self::HavingWithoutGroupBy
                | Self::ColumnMismatch { .. }
                | Self::InvalidFragment(_)
                | Self::NoVendor
                | Self::Unsupported { .. }
        )
    }

    /// Check if this is the hard schema failure for an unknown type token
    pub fn is_unknown_data_type(&self) -> bool {
        matches!(self, Self::UnknownDataType(_))
    }
}
