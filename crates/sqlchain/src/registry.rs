//! Keyed session cache for connection bootstrapping layers.
//!
//! Whatever layer knows how to open connections (by configuration name, DSN,
//! or anything else) can park the resulting sessions here and hand out the
//! same session for the same key. This is an explicit, owned cache a caller
//! composes with, never ambient process-wide state.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use sqlchain_driver::Connection;

use crate::error::Result;
use crate::session::Session;

/// An owned cache mapping lookup keys to sessions.
///
/// Single-threaded like the sessions it holds; borrows hand out `&mut`
/// access, so sharing across tasks requires external synchronization the same
/// way a bare [`Session`] does.
pub struct SessionRegistry<C: Connection> {
    sessions: HashMap<String, Session<C>>,
}

impl<C: Connection> Default for SessionRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connection> SessionRegistry<C> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Get the session for `key`, opening one with `open` on first use.
    ///
    /// `open` runs at most once per key; a failed open caches nothing, so the
    /// next lookup tries again.
    pub fn get_or_open<F>(&mut self, key: &str, open: F) -> Result<&mut Session<C>>
    where
        F: FnOnce() -> Result<Session<C>>,
    {
        match self.sessions.entry(key.to_owned()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                tracing::debug!(key = key, "opening session for registry");
                Ok(entry.insert(open()?))
            }
        }
    }

    /// Get an already-open session.
    pub fn get(&mut self, key: &str) -> Option<&mut Session<C>> {
        self.sessions.get_mut(key)
    }

    /// Whether a session is cached under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.sessions.contains_key(key)
    }

    /// Remove and return the session under `key`.
    pub fn remove(&mut self, key: &str) -> Option<Session<C>> {
        self.sessions.remove(key)
    }

    /// Number of cached sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
