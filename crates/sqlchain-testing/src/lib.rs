//! # sqlchain-testing
//!
//! Scripted in-memory driver for exercising sqlchain sessions without a
//! database. Script rows and failures per SQL text, hand the connection to a
//! session, and keep a clone as a probe for assertions.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod scripted;

pub use scripted::{BindRecord, ScriptedConnection, ScriptedStatement, StatementScript};
