//! Session error taxonomy.
//!
//! Every failure is surfaced to the caller; nothing is swallowed and nothing
//! is retried. Execution failures carry the reconstructed bound SQL so the
//! message is actionable even though the root cause came from the driver.

use sqlchain_driver::DriverError;
use thiserror::Error;

/// Errors raised by a [`Session`](crate::Session).
#[derive(Debug, Error)]
pub enum Error {
    /// The driver rejected the SQL at prepare time.
    #[error("failed to prepare `{sql}`: {source}")]
    Prepare {
        /// The SQL text that was rejected.
        sql: String,
        /// Driver detail.
        source: DriverError,
    },

    /// A single bind failed.
    #[error("failed to bind `{placeholder}`: {source}")]
    Bind {
        /// The normalized placeholder name.
        placeholder: String,
        /// What went wrong.
        source: BindError,
    },

    /// A bulk bind was handed something that is not a mapping.
    #[error("invalid bulk bind argument: {0}")]
    InvalidArgument(String),

    /// The driver failed to execute the statement.
    ///
    /// `bound_sql` is the diagnostic reconstruction of the statement with
    /// bound values substituted in. It is for reading, not for re-executing.
    #[error("execution failed: {detail}\nstatement: {bound_sql}")]
    Execution {
        /// Driver detail.
        detail: DriverError,
        /// Rendered diagnostic SQL.
        bound_sql: String,
    },

    /// The driver rejected a transaction control call.
    #[error("transaction {operation} failed: {source}")]
    Transaction {
        /// Which call was rejected (`begin`, `commit`, `rollback`).
        operation: &'static str,
        /// Driver detail.
        source: DriverError,
    },
}

impl Error {
    pub(crate) fn no_active_statement(op: &str) -> Self {
        Self::Execution {
            detail: DriverError::new(format!("no active statement to {op}; call prepare() first")),
            bound_sql: String::new(),
        }
    }
}

/// Why a bind was rejected.
#[derive(Debug, Error)]
pub enum BindError {
    /// No statement has been prepared on this session.
    #[error("no active statement; call prepare() first")]
    NoActiveStatement,

    /// The driver rejected the bind.
    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// Convenient alias for session results.
pub type Result<T> = std::result::Result<T, Error>;
