//! # sqlchain-driver
//!
//! Driver-facing traits and value types for the sqlchain statement-session
//! layer.
//!
//! The session crate never talks to a database directly; it composes with an
//! implementation of [`Connection`] and drives the [`StatementHandle`]s that
//! connection produces. This crate defines that seam plus the types that flow
//! across it: [`SqlValue`], [`Row`], [`DeclaredType`], [`Config`], and
//! [`DriverError`].

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod connection;
pub mod error;
pub mod row;
pub mod value;

pub use config::Config;
pub use connection::{Connection, StatementHandle};
pub use error::{ConfigError, DriverError};
pub use row::Row;
pub use value::{DeclaredType, SqlValue};
