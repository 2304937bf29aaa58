//! Tool definitions and dispatch for agent function calling.
//!
//! Exposes the query executor and the metrics summarizer as two named tools
//! taking and returning JSON.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::{Record, Store};
use crate::error::{MenuError, Result};
use crate::metrics;
use crate::query::QueryExecutor;

/// Name of the SQL execution tool.
pub const QUERY_TOOL: &str = "async_query_to_df";

/// Name of the metrics summary tool.
pub const SUMMARY_TOOL: &str = "generate_menu_metrics_summary";

/// Tool definition for agent function calling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub parameters: serde_json::Value,
}

/// Input parameters for the async_query_to_df tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryInput {
    pub query: String,
}

/// Input parameters for the generate_menu_metrics_summary tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryInput {
    pub data: Vec<Record>,
}

/// Returns the tool definitions available to the agent.
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: QUERY_TOOL.to_string(),
            description: "Execute any SQL query on the menu database. \
                          SELECT queries return a list of records (one per row). \
                          Non-SELECT queries are committed and return a single-item list \
                          with a message."
                .to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "A single SQLite statement, executed verbatim"
                    }
                },
                "required": ["query"]
            }),
        },
        ToolDefinition {
            name: SUMMARY_TOOL.to_string(),
            description: "Analyze key menu item performance metrics and return a structured \
                          summary. Continuous fields analyzed: Price, Avg_Rating, Total_Orders, \
                          Last_Week_Sales, Last_Month_Sales. Returns one record per field with \
                          metric, count, mean, std, min, 25%, 50%, 75%, max, median and sum."
                .to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "data": {
                        "type": "array",
                        "description": "Menu items and their metrics, e.g. \
                                        [{\"Price\": 120, \"Avg_Rating\": 4.5, \"Total_Orders\": 300, \
                                        \"Last_Week_Sales\": 50, \"Last_Month_Sales\": 200}]",
                        "items": { "type": "object" }
                    }
                },
                "required": ["data"]
            }),
        },
    ]
}

/// Dispatches tool calls to the executor and the summarizer.
#[derive(Clone)]
pub struct ToolRouter {
    store: Arc<dyn Store>,
}

impl ToolRouter {
    /// Creates a router whose query tool runs against the given store.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Calls a tool by name with JSON arguments, returning its JSON result.
    pub async fn call(&self, name: &str, arguments: serde_json::Value) -> Result<serde_json::Value> {
        debug!("Tool call: {name}");
        match name {
            QUERY_TOOL => {
                let input: QueryInput = parse_arguments(name, arguments)?;
                let response = QueryExecutor::new(self.store.as_ref())
                    .execute(&input.query)
                    .await?;
                to_json(&response)
            }
            SUMMARY_TOOL => {
                let input: SummaryInput = parse_arguments(name, arguments)?;
                let summary = metrics::summarize(&input.data)?;
                to_json(&summary)
            }
            other => Err(MenuError::tool(format!("unknown tool '{other}'"))),
        }
    }
}

fn parse_arguments<T: serde::de::DeserializeOwned>(
    tool: &str,
    arguments: serde_json::Value,
) -> Result<T> {
    serde_json::from_value(arguments)
        .map_err(|e| MenuError::tool(format!("invalid arguments for '{tool}': {e}")))
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| MenuError::internal(format!("failed to serialize tool result: {e}")))
}
