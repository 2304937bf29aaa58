//! Store abstraction layer for menu-maker.
//!
//! Provides a trait-based interface to the relational store. A [`Store`]
//! hands out short-lived [`Session`]s; each tool call opens its own session
//! and closes it before returning.

mod mock;
mod sqlite;
mod statements;
mod types;

pub use mock::{MockStore, SessionCounters};
pub use sqlite::SqliteStore;
pub use types::{Record, Row, StatementResult, Value};

use crate::error::Result;
use async_trait::async_trait;

/// A relational store that can open independent sessions.
///
/// Implementations hold no connection state between calls.
#[async_trait]
pub trait Store: Send + Sync {
    /// Opens a new session, failing with a connection error if the store is unreachable.
    async fn open(&self) -> Result<Box<dyn Session>>;
}

/// A connection-scoped session capable of executing one statement at a time.
#[async_trait]
pub trait Session: Send {
    /// Executes a single statement verbatim and returns its columns and rows.
    ///
    /// A statement without a result shape returns an empty column list.
    /// Text holding more than one statement fails with a query error before
    /// any of it runs.
    async fn execute(&mut self, sql: &str) -> Result<StatementResult>;

    /// Makes pending changes durable. A no-op when nothing is pending.
    async fn commit(&mut self) -> Result<()>;

    /// Closes the session, discarding anything not committed.
    async fn close(self: Box<Self>) -> Result<()>;
}
