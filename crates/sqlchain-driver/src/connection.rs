//! Driver traits the session layer builds on.
//!
//! A driver supplies two things: a [`Connection`] that can prepare statements
//! and control transactions, and the [`StatementHandle`] those preparations
//! return. Both are synchronous; every call blocks until the driver responds.
//! Timeout and cancellation policy belongs to the driver, not this layer.

use crate::error::DriverError;
use crate::row::Row;
use crate::value::{DeclaredType, SqlValue};

/// One prepared statement owned by its caller.
///
/// A handle carries its own cursor. Calling [`execute`](Self::execute) again
/// re-runs the statement and rewinds the cursor to the first row; the session
/// layer's iteration semantics depend on that.
pub trait StatementHandle {
    /// Bind a value to a named placeholder.
    ///
    /// `placeholder` arrives already normalized (single leading `:`).
    fn bind(
        &mut self,
        placeholder: &str,
        value: SqlValue,
        declared: Option<DeclaredType>,
    ) -> Result<(), DriverError>;

    /// Run the statement with the currently bound parameters.
    fn execute(&mut self) -> Result<(), DriverError>;

    /// Pull the next row from the open cursor.
    ///
    /// Returns `None` once the cursor is drained; exhaustion is a normal
    /// terminal state, not a failure.
    fn fetch_next_row(&mut self) -> Option<Row>;

    /// Drain the entire cursor.
    fn fetch_all_rows(&mut self) -> Vec<Row>;

    /// Affected/selected row count of the last execution.
    fn affected_row_count(&self) -> u64;
}

/// A live database connection.
pub trait Connection {
    /// The statement handle type this connection produces.
    type Statement: StatementHandle;

    /// Prepare a statement against the given SQL text.
    fn prepare_statement(&mut self, sql: &str) -> Result<Self::Statement, DriverError>;

    /// Driver-reported auto-generated identity of the last insert, as text.
    fn last_insert_identity(&self) -> String;

    /// Open a transaction.
    fn begin_transaction(&mut self) -> Result<(), DriverError>;

    /// Commit the open transaction.
    fn commit(&mut self) -> Result<(), DriverError>;

    /// Roll back the open transaction.
    fn rollback(&mut self) -> Result<(), DriverError>;
}
