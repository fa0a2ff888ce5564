//! Error type for correlation runs.

use thiserror::Error;

use faultline_core::error::ConfigError;

/// Errors that abort a correlation run outright.
///
/// Channel outages do not appear here: an unavailable text scorer or
/// feedback store degrades the diagnosis instead of failing it.
#[derive(Debug, Error)]
pub enum CorrelateError {
    /// The supplied engine configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
