//! A scripted, in-memory driver.
//!
//! Each SQL text maps to a [`StatementScript`] describing the rows it
//! returns and the failures it should inject. Executing a statement rewinds
//! its cursor to the first row, the same way real drivers re-open a cursor on
//! re-execution, so session iteration semantics can be exercised faithfully.
//!
//! Connections clone cheaply and share state, so tests keep a clone as a
//! probe after handing one to a session. Everything is `Rc`-based and
//! single-threaded; the session model requires no more.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use sqlchain_driver::{Connection, DeclaredType, DriverError, Row, SqlValue, StatementHandle};

/// What a prepared statement should do when driven.
#[derive(Debug, Clone, Default)]
pub struct StatementScript {
    rows: Vec<Row>,
    affected: Option<u64>,
    prepare_error: Option<String>,
    execute_error: Option<String>,
    rejected_placeholders: Vec<String>,
}

impl StatementScript {
    /// An empty script: executes fine, returns no rows.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A script returning the given rows on every execution.
    #[must_use]
    pub fn returning(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// Report this affected row count instead of the returned-row count.
    #[must_use]
    pub fn with_affected(mut self, count: u64) -> Self {
        self.affected = Some(count);
        self
    }

    /// Reject the prepare call itself.
    #[must_use]
    pub fn failing_prepare(mut self, message: impl Into<String>) -> Self {
        self.prepare_error = Some(message.into());
        self
    }

    /// Reject every execute call.
    #[must_use]
    pub fn failing_execute(mut self, message: impl Into<String>) -> Self {
        self.execute_error = Some(message.into());
        self
    }

    /// Reject binds for the given (normalized) placeholder.
    #[must_use]
    pub fn rejecting_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.rejected_placeholders.push(placeholder.into());
        self
    }
}

/// One bind observed by the scripted driver.
#[derive(Debug, Clone, PartialEq)]
pub struct BindRecord {
    /// SQL text of the statement bound against.
    pub sql: String,
    /// Normalized placeholder name.
    pub placeholder: String,
    /// Bound value.
    pub value: SqlValue,
}

#[derive(Debug, Default)]
struct Inner {
    scripts: HashMap<String, StatementScript>,
    bind_log: Vec<BindRecord>,
    prepares: Vec<String>,
    executions: Vec<String>,
    identity: String,
    in_transaction: bool,
}

/// A scripted connection.
///
/// Clones share state; keep one as a probe for assertions after a session
/// takes ownership of the other.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConnection {
    inner: Rc<RefCell<Inner>>,
}

impl ScriptedConnection {
    /// Create a connection with no scripts.
    ///
    /// Unscripted SQL prepares and executes successfully with zero rows.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a script to a SQL text.
    #[must_use]
    pub fn with_script(self, sql: impl Into<String>, script: StatementScript) -> Self {
        self.inner.borrow_mut().scripts.insert(sql.into(), script);
        self
    }

    /// Set the identity text reported after inserts.
    #[must_use]
    pub fn with_identity(self, identity: impl Into<String>) -> Self {
        self.inner.borrow_mut().identity = identity.into();
        self
    }

    /// Every bind the driver has seen, in order.
    #[must_use]
    pub fn bind_log(&self) -> Vec<BindRecord> {
        self.inner.borrow().bind_log.clone()
    }

    /// How many times `sql` has been prepared.
    #[must_use]
    pub fn prepare_count(&self, sql: &str) -> usize {
        self.inner.borrow().prepares.iter().filter(|s| *s == sql).count()
    }

    /// How many times `sql` has executed successfully.
    #[must_use]
    pub fn execution_count(&self, sql: &str) -> usize {
        self.inner
            .borrow()
            .executions
            .iter()
            .filter(|s| *s == sql)
            .count()
    }

    /// Whether a transaction is currently open.
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.inner.borrow().in_transaction
    }
}

impl Connection for ScriptedConnection {
    type Statement = ScriptedStatement;

    fn prepare_statement(&mut self, sql: &str) -> Result<Self::Statement, DriverError> {
        let mut inner = self.inner.borrow_mut();
        inner.prepares.push(sql.to_owned());
        let script = inner.scripts.get(sql).cloned().unwrap_or_default();
        if let Some(message) = &script.prepare_error {
            return Err(DriverError::new(message.clone()));
        }
        Ok(ScriptedStatement {
            inner: Rc::clone(&self.inner),
            sql: sql.to_owned(),
            script,
            cursor: None,
            affected: 0,
        })
    }

    fn last_insert_identity(&self) -> String {
        self.inner.borrow().identity.clone()
    }

    fn begin_transaction(&mut self) -> Result<(), DriverError> {
        let mut inner = self.inner.borrow_mut();
        if inner.in_transaction {
            return Err(DriverError::new("a transaction is already open"));
        }
        inner.in_transaction = true;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), DriverError> {
        let mut inner = self.inner.borrow_mut();
        if !inner.in_transaction {
            return Err(DriverError::new("no active transaction to commit"));
        }
        inner.in_transaction = false;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), DriverError> {
        let mut inner = self.inner.borrow_mut();
        if !inner.in_transaction {
            return Err(DriverError::new("no active transaction to roll back"));
        }
        inner.in_transaction = false;
        Ok(())
    }
}

/// A prepared statement driven by its [`StatementScript`].
#[derive(Debug)]
pub struct ScriptedStatement {
    inner: Rc<RefCell<Inner>>,
    sql: String,
    script: StatementScript,
    /// `None` until the first execute; rewound to `Some(0)` on every execute.
    cursor: Option<usize>,
    affected: u64,
}

impl StatementHandle for ScriptedStatement {
    fn bind(
        &mut self,
        placeholder: &str,
        value: SqlValue,
        _declared: Option<DeclaredType>,
    ) -> Result<(), DriverError> {
        if self
            .script
            .rejected_placeholders
            .iter()
            .any(|p| p == placeholder)
        {
            return Err(DriverError::new(format!(
                "unknown placeholder `{placeholder}`"
            )));
        }
        self.inner.borrow_mut().bind_log.push(BindRecord {
            sql: self.sql.clone(),
            placeholder: placeholder.to_owned(),
            value,
        });
        Ok(())
    }

    fn execute(&mut self) -> Result<(), DriverError> {
        if let Some(message) = &self.script.execute_error {
            return Err(DriverError::new(message.clone()));
        }
        self.cursor = Some(0);
        self.affected = self
            .script
            .affected
            .unwrap_or(self.script.rows.len() as u64);
        self.inner.borrow_mut().executions.push(self.sql.clone());
        Ok(())
    }

    fn fetch_next_row(&mut self) -> Option<Row> {
        let index = self.cursor?;
        let row = self.script.rows.get(index).cloned()?;
        self.cursor = Some(index + 1);
        Some(row)
    }

    fn fetch_all_rows(&mut self) -> Vec<Row> {
        self.cursor = Some(self.script.rows.len());
        self.script.rows.clone()
    }

    fn affected_row_count(&self) -> u64 {
        self.affected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_rows() -> Vec<Row> {
        vec![
            Row::from_pairs([("id", 1i64)]),
            Row::from_pairs([("id", 2i64)]),
        ]
    }

    #[test]
    fn test_execute_rewinds_cursor() {
        let mut conn = ScriptedConnection::new()
            .with_script("SELECT id FROM t", StatementScript::returning(two_rows()));
        let mut stmt = conn.prepare_statement("SELECT id FROM t").unwrap();

        stmt.execute().unwrap();
        assert_eq!(stmt.fetch_next_row(), Some(Row::from_pairs([("id", 1i64)])));
        stmt.execute().unwrap();
        assert_eq!(stmt.fetch_next_row(), Some(Row::from_pairs([("id", 1i64)])));
    }

    #[test]
    fn test_fetch_before_execute_yields_nothing() {
        let mut conn = ScriptedConnection::new()
            .with_script("SELECT id FROM t", StatementScript::returning(two_rows()));
        let mut stmt = conn.prepare_statement("SELECT id FROM t").unwrap();
        assert_eq!(stmt.fetch_next_row(), None);
    }

    #[test]
    fn test_transaction_misuse_rejected() {
        let mut conn = ScriptedConnection::new();
        assert!(conn.commit().is_err());
        conn.begin_transaction().unwrap();
        assert!(conn.begin_transaction().is_err());
        conn.rollback().unwrap();
        assert!(!conn.in_transaction());
    }

    #[test]
    fn test_probe_shares_state() {
        let conn = ScriptedConnection::new();
        let mut session_side = conn.clone();
        let mut stmt = session_side.prepare_statement("SELECT 1").unwrap();
        stmt.execute().unwrap();
        assert_eq!(conn.prepare_count("SELECT 1"), 1);
        assert_eq!(conn.execution_count("SELECT 1"), 1);
    }
}
