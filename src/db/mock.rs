//! Mock store for testing.
//!
//! Provides an in-memory store with scripted statement results and counters
//! that record how many sessions were opened, committed, and closed.

use super::{Session, StatementResult, Store};
use crate::error::{MenuError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared counters describing session lifecycle events.
#[derive(Debug, Default)]
pub struct SessionCounters {
    opened: AtomicUsize,
    committed: AtomicUsize,
    closed: AtomicUsize,
}

impl SessionCounters {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn committed(&self) -> usize {
        self.committed.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
enum Scripted {
    Result(StatementResult),
    Error(String),
}

/// A mock store that returns predefined results.
///
/// Statements without a scripted response return a non-describable result.
#[derive(Debug, Default)]
pub struct MockStore {
    responses: HashMap<String, Scripted>,
    refuse_connections: bool,
    counters: Arc<SessionCounters>,
}

impl MockStore {
    /// Creates a new mock store with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose `open` always fails with a connection error.
    pub fn unreachable() -> Self {
        Self {
            refuse_connections: true,
            ..Self::default()
        }
    }

    /// Scripts the result returned for an exact statement.
    pub fn with_result(mut self, sql: impl Into<String>, result: StatementResult) -> Self {
        self.responses.insert(sql.into(), Scripted::Result(result));
        self
    }

    /// Scripts a query error for an exact statement.
    pub fn with_error(mut self, sql: impl Into<String>, message: impl Into<String>) -> Self {
        self.responses
            .insert(sql.into(), Scripted::Error(message.into()));
        self
    }

    /// Returns the lifecycle counters shared with every session.
    pub fn counters(&self) -> Arc<SessionCounters> {
        Arc::clone(&self.counters)
    }
}

#[async_trait]
impl Store for MockStore {
    async fn open(&self) -> Result<Box<dyn Session>> {
        if self.refuse_connections {
            return Err(MenuError::connection("mock store is unreachable"));
        }

        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockSession {
            responses: self.responses.clone(),
            counters: Arc::clone(&self.counters),
        }))
    }
}

struct MockSession {
    responses: HashMap<String, Scripted>,
    counters: Arc<SessionCounters>,
}

#[async_trait]
impl Session for MockSession {
    async fn execute(&mut self, sql: &str) -> Result<StatementResult> {
        match self.responses.get(sql) {
            Some(Scripted::Result(result)) => Ok(result.clone()),
            Some(Scripted::Error(message)) => Err(MenuError::query(message.clone())),
            None => Ok(StatementResult::no_result()),
        }
    }

    async fn commit(&mut self) -> Result<()> {
        self.counters.committed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
