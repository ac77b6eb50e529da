//! # sqlchain
//!
//! A fluent, chainable convenience layer over a relational database driver.
//!
//! The core type is [`Session`]: it owns one prepared statement's lifecycle
//! (prepare → bind → execute → iterate → reset), lets callers chain mutating
//! calls, and hides cursor bookkeeping behind an implicit iteration state
//! machine — call [`Session::fetch_one`] in a loop until it returns `None`
//! and the session executes, iterates, and re-arms on its own. Alongside it,
//! every executed statement yields a reconstructed, fully substituted SQL
//! string for logs and error messages via [`Session::bound_sql`].
//!
//! Connections are external collaborators: anything implementing the
//! [`Connection`] trait from `sqlchain-driver` plugs in at construction time.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sqlchain::Session;
//!
//! let mut session = Session::new(connection);
//! session
//!     .prepare("SELECT id, name FROM users WHERE team = :team")?
//!     .bind_value("team", "core")?;
//!
//! while let Some(row) = session.fetch_one()? {
//!     println!("{:?} {:?}", row.get("id"), row.get("name"));
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
mod recorder;
pub mod registry;
pub mod session;

// Re-export commonly used types
pub use error::{BindError, Error, Result};
pub use registry::SessionRegistry;
pub use session::{InsertIdentity, Session};
pub use sqlchain_driver::{Config, Connection, DeclaredType, Row, SqlValue, StatementHandle};
