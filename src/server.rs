//! JSON-RPC 2.0 server.
//!
//! Implements the subset of the Model Context Protocol needed to list and
//! call the tools and to read the schema resource. Message handling is
//! transport-agnostic; this module also runs the newline-delimited stdio
//! transport, where each input line is one request and each response is
//! written as one line. See [`crate::http`] for the HTTP transport.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::error::{MenuError, Result};
use crate::resources::SchemaResource;
use crate::tools::{get_tool_definitions, ToolRouter};

/// Protocol revision announced when the client does not request one.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2025-06-18";

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;
const INTERNAL_ERROR: i64 = -32603;

/// An incoming JSON-RPC message. A missing `id` marks a notification.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<JsonValue>,
    pub method: String,
    #[serde(default)]
    pub params: JsonValue,
}

/// An outgoing JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    pub id: JsonValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

/// A JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcResponse {
    fn success(id: JsonValue, result: JsonValue) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: JsonValue, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CallToolParams {
    name: String,
    #[serde(default)]
    arguments: Option<JsonValue>,
}

#[derive(Debug, Deserialize)]
struct ReadResourceParams {
    uri: String,
}

/// Serves the tools and the schema resource to one client.
pub struct Server {
    config: ServerConfig,
    router: ToolRouter,
    schema: SchemaResource,
}

impl Server {
    /// Creates a server from its identity, tool router, and schema resource.
    pub fn new(config: ServerConfig, router: ToolRouter, schema: SchemaResource) -> Self {
        Self {
            config,
            router,
            schema,
        }
    }

    /// Returns the server name announced to clients.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Serves requests from stdin until it is closed.
    pub async fn serve_stdio(&self) -> Result<()> {
        info!("{} listening on stdio", self.config.name);
        let stdin = BufReader::new(tokio::io::stdin());
        self.run(stdin, tokio::io::stdout()).await
    }

    /// Serves requests read line by line from `reader`, writing responses to `writer`.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| MenuError::internal(format!("Failed to read request: {e}")))?
        {
            if line.trim().is_empty() {
                continue;
            }

            if let Some(response) = self.handle_line(&line).await {
                let mut payload = serde_json::to_string(&response).map_err(|e| {
                    MenuError::internal(format!("Failed to serialize response: {e}"))
                })?;
                payload.push('\n');
                writer
                    .write_all(payload.as_bytes())
                    .await
                    .map_err(|e| MenuError::internal(format!("Failed to write response: {e}")))?;
                writer
                    .flush()
                    .await
                    .map_err(|e| MenuError::internal(format!("Failed to flush response: {e}")))?;
            }
        }

        info!("Input closed, shutting down");
        Ok(())
    }

    /// Handles one raw line, returning the response to send, if any.
    pub async fn handle_line(&self, line: &str) -> Option<RpcResponse> {
        match serde_json::from_str::<RpcRequest>(line) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                warn!("Rejected malformed message: {e}");
                Some(RpcResponse::failure(
                    JsonValue::Null,
                    PARSE_ERROR,
                    format!("Parse error: {e}"),
                ))
            }
        }
    }

    /// Handles a parsed request. Notifications produce no response.
    pub async fn handle(&self, request: RpcRequest) -> Option<RpcResponse> {
        let Some(id) = request.id.clone() else {
            debug!("Notification: {}", request.method);
            return None;
        };

        if request.jsonrpc.as_deref() != Some("2.0") {
            return Some(RpcResponse::failure(
                id,
                INVALID_REQUEST,
                "Invalid request: jsonrpc must be \"2.0\"",
            ));
        }

        debug!("Request {}: {}", id, request.method);
        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.initialize(&request.params)),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": get_tool_definitions() })),
            "tools/call" => self.call_tool(request.params).await,
            "resources/list" => Ok(json!({ "resources": [&self.schema] })),
            "resources/read" => self.read_resource(request.params),
            other => Err(RpcError {
                code: METHOD_NOT_FOUND,
                message: format!("Method not found: {other}"),
            }),
        };

        Some(match outcome {
            Ok(result) => RpcResponse::success(id, result),
            Err(error) => RpcResponse {
                jsonrpc: "2.0",
                id,
                result: None,
                error: Some(error),
            },
        })
    }

    fn initialize(&self, params: &JsonValue) -> JsonValue {
        let protocol_version = params
            .get("protocolVersion")
            .and_then(JsonValue::as_str)
            .unwrap_or(DEFAULT_PROTOCOL_VERSION);

        json!({
            "protocolVersion": protocol_version,
            "capabilities": {
                "tools": { "listChanged": false },
                "resources": { "listChanged": false }
            },
            "serverInfo": {
                "name": self.config.name,
                "version": env!("CARGO_PKG_VERSION")
            },
            "instructions": self.config.instructions
        })
    }

    /// Runs a tool. Tool failures are reported in the result with `isError`,
    /// so the agent sees the store's message.
    async fn call_tool(&self, params: JsonValue) -> std::result::Result<JsonValue, RpcError> {
        let params: CallToolParams = serde_json::from_value(params).map_err(|e| RpcError {
            code: INVALID_PARAMS,
            message: format!("Invalid params: {e}"),
        })?;

        let arguments = params.arguments.unwrap_or_else(|| json!({}));
        match self.router.call(&params.name, arguments).await {
            Ok(value) => {
                let text = serde_json::to_string(&value).map_err(|e| RpcError {
                    code: INTERNAL_ERROR,
                    message: format!("Failed to serialize tool result: {e}"),
                })?;
                Ok(json!({
                    "content": [{ "type": "text", "text": text }],
                    "structuredContent": { "result": value },
                    "isError": false
                }))
            }
            Err(e) => {
                warn!("Tool '{}' failed: {}: {}", params.name, e.category(), e);
                Ok(json!({
                    "content": [{ "type": "text", "text": e.to_string() }],
                    "isError": true
                }))
            }
        }
    }

    fn read_resource(&self, params: JsonValue) -> std::result::Result<JsonValue, RpcError> {
        let params: ReadResourceParams = serde_json::from_value(params).map_err(|e| RpcError {
            code: INVALID_PARAMS,
            message: format!("Invalid params: {e}"),
        })?;

        if params.uri != self.schema.uri {
            return Err(RpcError {
                code: INVALID_PARAMS,
                message: format!("Unknown resource: {}", params.uri),
            });
        }

        Ok(json!({
            "contents": [{
                "uri": self.schema.uri,
                "mimeType": self.schema.mime_type,
                "text": self.schema.text
            }]
        }))
    }
}
