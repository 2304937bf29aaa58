//! Error types for menu-maker.
//!
//! Defines the main error enum shared by the query executor, the metrics
//! summarizer, and the tool/RPC layer.

use thiserror::Error;

/// Main error type for menu-maker operations.
#[derive(Error, Debug)]
pub enum MenuError {
    /// The store could not be reached or opened.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The store rejected or failed a statement (syntax errors, constraint violations, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// One or more analyzed fields are absent from every input record.
    #[error("Missing field(s): {}", fields.join(", "))]
    MissingField { fields: Vec<String> },

    /// An analyzed field holds a non-numeric value.
    #[error("Type mismatch: field '{field}' in record {index} holds {found}, expected a number")]
    TypeMismatch {
        field: String,
        index: usize,
        found: &'static str,
    },

    /// A statistic over an analyzed field exceeds the range of a 64-bit float.
    #[error("Numeric overflow: statistics for field '{field}' exceed the range of a 64-bit float")]
    NumericOverflow { field: String },

    /// Configuration errors (invalid config file, unreadable schema document, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown tool name or malformed tool arguments.
    #[error("Tool error: {0}")]
    Tool(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MenuError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a tool error with the given message.
    pub fn tool(msg: impl Into<String>) -> Self {
        Self::Tool(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::MissingField { .. } => "Missing Field Error",
            Self::TypeMismatch { .. } => "Type Mismatch Error",
            Self::NumericOverflow { .. } => "Numeric Overflow Error",
            Self::Config(_) => "Configuration Error",
            Self::Tool(_) => "Tool Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using MenuError.
pub type Result<T> = std::result::Result<T, MenuError>;
