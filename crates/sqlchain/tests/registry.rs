//! Tests for the keyed session cache.

use sqlchain::{Session, SessionRegistry};
use sqlchain_testing::ScriptedConnection;

#[test]
fn get_or_open_opens_once_per_key() {
    let mut registry: SessionRegistry<ScriptedConnection> = SessionRegistry::new();
    let mut opened = 0;

    for _ in 0..3 {
        registry
            .get_or_open("default", || {
                opened += 1;
                Ok(Session::new(ScriptedConnection::new()))
            })
            .unwrap();
    }

    assert_eq!(opened, 1);
    assert_eq!(registry.len(), 1);
    assert!(registry.contains("default"));
}

#[test]
fn distinct_keys_get_distinct_sessions() {
    let mut registry = SessionRegistry::new();
    registry
        .get_or_open("a", || Ok(Session::new(ScriptedConnection::new())))
        .unwrap();
    registry
        .get_or_open("mysql://app@db/a", || {
            Ok(Session::new(ScriptedConnection::new()))
        })
        .unwrap();
    assert_eq!(registry.len(), 2);
}

#[test]
fn cached_sessions_keep_their_statement_state() {
    const SQL: &str = "SELECT 1";
    let mut registry = SessionRegistry::new();
    registry
        .get_or_open("default", || Ok(Session::new(ScriptedConnection::new())))
        .unwrap()
        .prepare(SQL)
        .unwrap();

    let session = registry.get("default").unwrap();
    assert_eq!(session.prepared_sql(), Some(SQL));
}

#[test]
fn failed_open_caches_nothing() {
    let mut registry: SessionRegistry<ScriptedConnection> = SessionRegistry::new();
    let result = registry.get_or_open("default", || {
        Err(sqlchain::Error::InvalidArgument("no opener".to_owned()))
    });
    assert!(result.is_err());
    assert!(registry.is_empty());
    assert!(!registry.contains("default"));
}

#[test]
fn remove_hands_the_session_back() {
    let mut registry = SessionRegistry::new();
    registry
        .get_or_open("default", || Ok(Session::new(ScriptedConnection::new())))
        .unwrap();
    assert!(registry.remove("default").is_some());
    assert!(registry.is_empty());
}
