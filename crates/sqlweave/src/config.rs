//! Composer configuration.
//!
//! ```toml
//! vendor = "pgsql"
//! prepare = true
//! log_sql = true
//! max_sql_log_length = 500
//! ```

use crate::error::{QbError, QbResult};
use crate::vendor::Vendor;
use serde::Deserialize;
use std::path::Path;

/// Configuration for a [`Composer`](crate::Composer).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposerConfig {
    /// Vendor used when the composer is created without an explicit dialect.
    pub vendor: Option<Vendor>,
    /// Bind values as parameters. When off, values are inlined as escaped literals.
    pub prepare: bool,
    /// Emit built statements on the `sqlweave.sql` tracing target.
    pub log_sql: bool,
    /// Truncate logged SQL (in bytes). `None` means no truncation.
    pub max_sql_log_length: Option<usize>,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            vendor: None,
            prepare: true,
            log_sql: false,
            max_sql_log_length: Some(200),
        }
    }
}

impl ComposerConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback vendor.
    pub fn vendor(mut self, vendor: Vendor) -> Self {
        self.vendor = Some(vendor);
        self
    }

    /// Enable or disable parameter mode.
    pub fn prepare(mut self, prepare: bool) -> Self {
        self.prepare = prepare;
        self
    }

    /// Inline escaped literals instead of binding parameters.
    pub fn escaped(self) -> Self {
        self.prepare(false)
    }

    /// Enable SQL logging.
    pub fn log_sql(mut self, enabled: bool) -> Self {
        self.log_sql = enabled;
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_sql_log_length(mut self, len: usize) -> Self {
        self.max_sql_log_length = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_log_length = None;
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> QbResult<Self> {
        let config: ComposerConfig = toml::from_str(raw)
            .map_err(|e| QbError::Config(format!("failed to parse composer config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> QbResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            QbError::Config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> QbResult<()> {
        if self.max_sql_log_length == Some(0) {
            return Err(QbError::Config(
                "max_sql_log_length must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn truncate_sql<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_sql_log_length {
            Some(max) if sql.len() > max => {
                let mut end = max;
                while end > 0 && !sql.is_char_boundary(end) {
                    end -= 1;
                }
                format!("{}...", &sql[..end]).into()
            }
            _ => sql.into(),
        }
    }
}
