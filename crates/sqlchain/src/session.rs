//! The statement session: one prepared statement's lifecycle behind a fluent
//! chain.
//!
//! A [`Session`] owns a driver connection and at most one active statement.
//! Mutating calls return `&mut Self` so callers can chain
//! `prepare(..)?.bind_value(..)?.fetch_one()`; terminal reads (`fetch_one`,
//! `fetch_all`, the counts) return their value directly.
//!
//! The interesting part is the implicit iteration state machine: `fetch_one`
//! executes on first call and feeds later calls from the open cursor, so a
//! caller can loop on `fetch_one()` until it returns `None` without ever
//! touching `execute` or cursor state. Preparing the *same* SQL text while
//! that cursor is open is a no-op, which is what lets the prepare call sit
//! inside the caller's loop body.

use sqlchain_driver::{Connection, DeclaredType, Row, SqlValue, StatementHandle};

use crate::error::{BindError, Error, Result};
use crate::recorder::BoundSqlRecorder;

/// Where the session is in a statement's lifecycle.
///
/// Exhaustion has no state of its own: a drained cursor drops back to
/// `Prepared`, so the next `fetch_one` re-executes the statement and the
/// cursor restarts from row one. On a LIMIT-bounded query that means repeated
/// single-row fetches return the same first row forever after exhaustion
/// instead of advancing past the limit. Long-standing quirk, kept on purpose;
/// callers that need a fresh statement for the same SQL call
/// [`Session::reset`] first.
enum StatementState<S> {
    /// No statement; only `prepare` is useful.
    Unprepared,
    /// Statement ready, cursor not open this cycle.
    Prepared {
        /// The driver handle.
        statement: S,
        /// The SQL text it was prepared from.
        sql: String,
    },
    /// Cursor open, rows may remain.
    Iterating {
        /// The driver handle.
        statement: S,
        /// The SQL text it was prepared from.
        sql: String,
    },
}

/// A fluent, chainable wrapper around one logical prepared statement.
///
/// Not safe for concurrent use: a session holds single-cursor,
/// single-in-flight-statement state. Use one session per concurrent logical
/// unit of work.
///
/// # Example
///
/// ```rust,ignore
/// let mut session = Session::new(connection);
/// session
///     .prepare("SELECT name FROM users WHERE team = :team")?
///     .bind_value("team", "core")?;
/// while let Some(row) = session.fetch_one()? {
///     println!("{:?}", row.get("name"));
/// }
/// ```
pub struct Session<C: Connection> {
    connection: C,
    state: StatementState<C::Statement>,
    recorder: BoundSqlRecorder,
}

impl<C: Connection> Session<C> {
    /// Create a session over an established connection.
    pub fn new(connection: C) -> Self {
        Self {
            connection,
            state: StatementState::Unprepared,
            recorder: BoundSqlRecorder::new(),
        }
    }

    /// Prepare a statement.
    ///
    /// If a cursor is open and `sql` matches the text of the statement being
    /// iterated, this is a no-op and the chain continues against the open
    /// cursor. Any other call discards the current statement, prepares a
    /// fresh one, and clears the bound-SQL recorder. A rejected prepare
    /// leaves the session unprepared.
    pub fn prepare(&mut self, sql: &str) -> Result<&mut Self> {
        if let StatementState::Iterating { sql: current, .. } = &self.state {
            if current == sql {
                tracing::trace!(sql = sql, "prepare skipped; cursor still open");
                return Ok(self);
            }
        }

        tracing::debug!(sql = sql, "preparing statement");

        // The old statement is discarded before the driver call, so a failed
        // prepare never leaves a stale cursor behind.
        self.state = StatementState::Unprepared;
        self.recorder.reset();

        let statement = self
            .connection
            .prepare_statement(sql)
            .map_err(|source| Error::Prepare {
                sql: sql.to_owned(),
                source,
            })?;

        self.recorder.seed(sql);
        self.state = StatementState::Prepared {
            statement,
            sql: sql.to_owned(),
        };
        Ok(self)
    }

    /// Bind a value to a named placeholder.
    ///
    /// The name is normalized to carry a single leading `:`; already-marked
    /// names pass through unchanged.
    pub fn bind_value(
        &mut self,
        placeholder: &str,
        value: impl Into<SqlValue>,
    ) -> Result<&mut Self> {
        self.bind_normalized(normalize_placeholder(placeholder), value.into(), None)?;
        Ok(self)
    }

    /// Bind a value with an explicit declared type.
    ///
    /// The declared type is forwarded to the driver and steers how the value
    /// prints in the diagnostic SQL.
    pub fn bind_value_as(
        &mut self,
        placeholder: &str,
        value: impl Into<SqlValue>,
        declared: DeclaredType,
    ) -> Result<&mut Self> {
        self.bind_normalized(
            normalize_placeholder(placeholder),
            value.into(),
            Some(declared),
        )?;
        Ok(self)
    }

    /// Bind every pair of an ordered mapping.
    ///
    /// A duplicate placeholder name (after normalization) means the argument
    /// is not a mapping and fails with [`Error::InvalidArgument`]. Binds
    /// already applied when a later pair fails stay applied; there is no
    /// rollback. That mirrors the driver's own behavior and is a documented
    /// limitation, not an oversight to fix here.
    pub fn bind_many<K, V, I>(&mut self, mapping: I) -> Result<&mut Self>
    where
        K: AsRef<str>,
        V: Into<SqlValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut seen: Vec<String> = Vec::new();
        for (name, value) in mapping {
            let placeholder = normalize_placeholder(name.as_ref());
            if seen.contains(&placeholder) {
                return Err(Error::InvalidArgument(format!(
                    "duplicate placeholder `{placeholder}`; the argument is not a mapping"
                )));
            }
            seen.push(placeholder.clone());
            self.bind_normalized(placeholder, value.into(), None)?;
        }
        Ok(self)
    }

    fn bind_normalized(
        &mut self,
        placeholder: String,
        value: SqlValue,
        declared: Option<DeclaredType>,
    ) -> Result<()> {
        let statement = match &mut self.state {
            StatementState::Prepared { statement, .. }
            | StatementState::Iterating { statement, .. } => statement,
            StatementState::Unprepared => {
                return Err(Error::Bind {
                    placeholder,
                    source: BindError::NoActiveStatement,
                });
            }
        };

        statement
            .bind(&placeholder, value.clone(), declared)
            .map_err(|e| Error::Bind {
                placeholder: placeholder.clone(),
                source: e.into(),
            })?;

        self.recorder.record(placeholder, value, declared);
        Ok(())
    }

    /// Run the active statement.
    ///
    /// On both outcomes the diagnostic SQL is rendered and the pending
    /// bindings consumed; a failure carries the rendered text in the error.
    /// Does not change the iterating flag: executing mid-iteration restarts
    /// the driver cursor but the session stays in its iterating state.
    pub fn execute(&mut self) -> Result<&mut Self> {
        let result = match &mut self.state {
            StatementState::Prepared { statement, sql }
            | StatementState::Iterating { statement, sql } => {
                tracing::debug!(sql = sql.as_str(), "executing statement");
                statement.execute()
            }
            StatementState::Unprepared => return Err(Error::no_active_statement("execute")),
        };

        let bound_sql = self.recorder.flush();
        match result {
            Ok(()) => Ok(self),
            Err(detail) => {
                tracing::debug!(bound_sql = bound_sql, error = %detail, "execution failed");
                Err(Error::Execution {
                    detail,
                    bound_sql: bound_sql.to_owned(),
                })
            }
        }
    }

    /// Fetch the next row, executing first if no cursor is open.
    ///
    /// Returns `None` exactly once per drained cursor; exhaustion is a normal
    /// terminal state. The call after that re-executes the statement and
    /// starts over from the first row (see the state-machine notes on
    /// [`Session`]).
    pub fn fetch_one(&mut self) -> Result<Option<Row>> {
        if !self.is_iterating() {
            self.execute()?;
            self.set_iterating(true);
        }

        let row = match &mut self.state {
            StatementState::Iterating { statement, .. } => statement.fetch_next_row(),
            // execute() above either errored out or left an executable
            // statement behind, so this arm only guards the type.
            _ => None,
        };

        if row.is_none() {
            tracing::trace!("cursor exhausted");
            self.set_iterating(false);
        }
        Ok(row)
    }

    /// Re-execute the statement and drain the entire cursor.
    ///
    /// Always restarts: a partially iterated cursor is abandoned, not
    /// resumed, and the session is left non-iterating.
    pub fn fetch_all(&mut self) -> Result<Vec<Row>> {
        self.execute()?;
        self.set_iterating(false);
        let rows = match &mut self.state {
            StatementState::Prepared { statement, .. } => statement.fetch_all_rows(),
            _ => Vec::new(),
        };
        Ok(rows)
    }

    /// Driver-reported affected/selected row count of the last execution.
    ///
    /// Zero is a valid, non-error result.
    pub fn affected_row_count(&self) -> Result<u64> {
        match &self.state {
            StatementState::Prepared { statement, .. }
            | StatementState::Iterating { statement, .. } => Ok(statement.affected_row_count()),
            StatementState::Unprepared => Err(Error::no_active_statement("count rows for")),
        }
    }

    /// Auto-generated identity of the last insert.
    ///
    /// Purely numeric text converts to an integer; anything else comes back
    /// as opaque text.
    #[must_use]
    pub fn last_insert_identity(&self) -> InsertIdentity {
        InsertIdentity::from_text(self.connection.last_insert_identity())
    }

    /// The diagnostic SQL rendered by the most recent execute cycle.
    ///
    /// Bound values are substituted in textually, strings quoted but not
    /// escaped. For logs and error messages only; never execute it.
    #[must_use]
    pub fn bound_sql(&self) -> &str {
        self.recorder.rendered()
    }

    /// The SQL text of the active statement, if any.
    #[must_use]
    pub fn prepared_sql(&self) -> Option<&str> {
        match &self.state {
            StatementState::Prepared { sql, .. } | StatementState::Iterating { sql, .. } => {
                Some(sql)
            }
            StatementState::Unprepared => None,
        }
    }

    /// Whether a cursor is open and may still have unread rows.
    #[must_use]
    pub fn is_iterating(&self) -> bool {
        matches!(self.state, StatementState::Iterating { .. })
    }

    /// Drop the active statement, the iteration flag, and the recorder.
    ///
    /// Afterwards the session behaves like a freshly constructed one. Use
    /// this to reissue the same SQL text as a genuinely fresh statement
    /// instead of continuing a prior cursor, e.g. before re-running a
    /// `LIMIT 1` lookup.
    pub fn reset(&mut self) -> &mut Self {
        tracing::debug!("resetting session");
        self.state = StatementState::Unprepared;
        self.recorder.reset();
        self
    }

    /// Prepare and execute in one call.
    pub fn query(&mut self, sql: &str) -> Result<&mut Self> {
        self.prepare(sql)?;
        self.execute()
    }

    /// Prepare `sql` and fetch the next row.
    ///
    /// Follows the usual prepare rule, so calling this in a loop with the
    /// same SQL keeps advancing the open cursor.
    pub fn fetch_one_query(&mut self, sql: &str) -> Result<Option<Row>> {
        self.prepare(sql)?;
        self.fetch_one()
    }

    /// Prepare `sql` and drain the entire result set.
    pub fn fetch_all_query(&mut self, sql: &str) -> Result<Vec<Row>> {
        self.prepare(sql)?;
        self.fetch_all()
    }

    /// Execute `sql` and return its affected row count.
    pub fn affected_row_count_query(&mut self, sql: &str) -> Result<u64> {
        self.query(sql)?;
        self.affected_row_count()
    }

    /// Execute an insert and return the generated identity.
    pub fn last_insert_identity_query(&mut self, sql: &str) -> Result<InsertIdentity> {
        self.query(sql)?;
        Ok(self.last_insert_identity())
    }

    /// Open a transaction on the underlying connection.
    pub fn begin(&mut self) -> Result<&mut Self> {
        self.transaction_call("begin", Connection::begin_transaction)
    }

    /// Commit the open transaction.
    pub fn commit(&mut self) -> Result<&mut Self> {
        self.transaction_call("commit", Connection::commit)
    }

    /// Roll back the open transaction.
    pub fn rollback(&mut self) -> Result<&mut Self> {
        self.transaction_call("rollback", Connection::rollback)
    }

    fn transaction_call(
        &mut self,
        operation: &'static str,
        call: fn(&mut C) -> std::result::Result<(), sqlchain_driver::DriverError>,
    ) -> Result<&mut Self> {
        tracing::debug!(operation = operation, "transaction control");
        call(&mut self.connection).map_err(|source| Error::Transaction { operation, source })?;
        Ok(self)
    }

    /// Borrow the underlying connection.
    pub fn connection(&mut self) -> &mut C {
        &mut self.connection
    }

    /// Consume the session and give the connection back.
    pub fn into_connection(self) -> C {
        self.connection
    }

    fn set_iterating(&mut self, iterating: bool) {
        self.state = match std::mem::replace(&mut self.state, StatementState::Unprepared) {
            StatementState::Prepared { statement, sql } if iterating => {
                StatementState::Iterating { statement, sql }
            }
            StatementState::Iterating { statement, sql } if !iterating => {
                StatementState::Prepared { statement, sql }
            }
            other => other,
        };
    }
}

impl<C: Connection> std::fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("prepared_sql", &self.prepared_sql())
            .field("iterating", &self.is_iterating())
            .finish()
    }
}

/// Normalize a placeholder name to carry a single leading `:`.
///
/// Idempotent; empty names pass through untouched and are left for the driver
/// to reject.
fn normalize_placeholder(name: &str) -> String {
    if name.is_empty() || name.starts_with(':') {
        name.to_owned()
    } else {
        format!(":{name}")
    }
}

/// The driver-reported identity of the last inserted row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertIdentity {
    /// The identity was purely numeric text.
    Numeric(i64),
    /// Anything else, passed through opaquely.
    Text(String),
}

impl InsertIdentity {
    fn from_text(text: String) -> Self {
        match text.parse::<i64>() {
            Ok(n) => Self::Numeric(n),
            Err(_) => Self::Text(text),
        }
    }

    /// The numeric identity, if it was numeric.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Numeric(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl std::fmt::Display for InsertIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(t) => f.write_str(t),
        }
    }
}
