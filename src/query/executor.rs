//! Query execution and result normalization.
//!
//! Runs a statement verbatim in a session scoped to the call and turns the
//! outcome into either a list of records or a single acknowledgement.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, warn};

use crate::db::{Record, Session, StatementResult, Store, Value};
use crate::error::Result;

/// Message returned for statements that produce no rows.
pub const SUCCESS_MESSAGE: &str = "Query executed successfully.";

/// Query executor that normalizes store results into records.
pub struct QueryExecutor<'a> {
    store: &'a dyn Store,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new query executor.
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Executes a statement in a fresh session.
    ///
    /// The session is closed before returning on every path. A close failure
    /// is logged and never replaces the statement's own outcome.
    pub async fn execute(&self, sql: &str) -> Result<QueryResponse> {
        let start = Instant::now();
        debug!("Executing statement: {sql}");

        let mut session = self.store.open().await?;
        let outcome = run_statement(session.as_mut(), sql).await;

        if let Err(e) = session.close().await {
            warn!("Failed to close store session: {e}");
        }

        let response = outcome?;
        debug!(
            "Statement finished in {:?}: {}",
            start.elapsed(),
            response.summary()
        );
        Ok(response)
    }
}

async fn run_statement(session: &mut dyn Session, sql: &str) -> Result<QueryResponse> {
    let result = session.execute(sql).await?;

    if result.is_describable() {
        return QueryResponse::from_rows(result);
    }

    session.commit().await?;
    Ok(QueryResponse::acknowledged())
}

/// The normalized outcome of one statement.
///
/// Serializes as a JSON list in both cases: the rows, or a single
/// `{"message": ...}` record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResponse {
    /// Zero or more records sharing the statement's column list.
    Rows(Vec<Record>),
    /// A single acknowledgement for a statement without a result shape.
    Acknowledged([Record; 1]),
}

impl QueryResponse {
    fn from_rows(result: StatementResult) -> Result<Self> {
        result.into_records().map(Self::Rows)
    }

    /// Builds the fixed acknowledgement record.
    pub fn acknowledged() -> Self {
        let mut record = Record::new();
        record.insert("message".to_string(), Value::from(SUCCESS_MESSAGE));
        Self::Acknowledged([record])
    }

    /// Returns true for an acknowledgement.
    pub fn is_acknowledgement(&self) -> bool {
        matches!(self, Self::Acknowledged(_))
    }

    /// Returns the records, treating an acknowledgement as a one-record list.
    pub fn records(&self) -> &[Record] {
        match self {
            Self::Rows(rows) => rows.as_slice(),
            Self::Acknowledged(ack) => ack.as_slice(),
        }
    }

    /// Consumes the response, returning its records.
    pub fn into_records(self) -> Vec<Record> {
        match self {
            Self::Rows(rows) => rows,
            Self::Acknowledged(ack) => ack.into(),
        }
    }

    fn summary(&self) -> String {
        match self {
            Self::Rows(rows) => format!("{} row(s)", rows.len()),
            Self::Acknowledged(_) => "acknowledged".to_string(),
        }
    }
}
