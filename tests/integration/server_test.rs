//! End-to-end JSON-RPC tests: requests in, tool results out, against SQLite.

use std::sync::Arc;

use super::common::create_seeded_store;
use menu_maker::config::ServerConfig;
use menu_maker::resources::SchemaResource;
use menu_maker::server::Server;
use menu_maker::tools::ToolRouter;
use serde_json::{json, Value as JsonValue};

async fn exchange(server: &Server, requests: &[JsonValue]) -> Vec<JsonValue> {
    let input: String = requests
        .iter()
        .map(|r| format!("{r}\n"))
        .collect();
    let mut output = Vec::new();

    server.run(input.as_bytes(), &mut output).await.unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn structured_result(response: &JsonValue) -> &JsonValue {
    assert_eq!(response["result"]["isError"], false, "{response}");
    &response["result"]["structuredContent"]["result"]
}

#[tokio::test]
async fn test_query_then_summarize_session() {
    let (store, _dir) = create_seeded_store().await;
    let server = Server::new(
        ServerConfig::default(),
        ToolRouter::new(Arc::new(store)),
        SchemaResource::builtin(),
    );

    let responses = exchange(
        &server,
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call", "params": {
                "name": "async_query_to_df",
                "arguments": {"query": "SELECT 1 AS x"}
            }}),
            json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call", "params": {
                "name": "async_query_to_df",
                "arguments": {"query": "INSERT INTO menu_items (Item_Name, Price, Avg_Rating, Total_Orders, Last_Week_Sales, Last_Month_Sales) VALUES ('Masala Chai', 40, 4.7, 1500, 130, 560)"}
            }}),
            json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call", "params": {
                "name": "generate_menu_metrics_summary",
                "arguments": {"data": [
                    {"Price": 100, "Avg_Rating": 4, "Total_Orders": 10, "Last_Week_Sales": 2, "Last_Month_Sales": 8},
                    {"Price": 200, "Avg_Rating": 5, "Total_Orders": 20, "Last_Week_Sales": 4, "Last_Month_Sales": 16}
                ]}
            }}),
            json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call", "params": {
                "name": "async_query_to_df",
                "arguments": {"query": "SELECT COUNT(*) AS n FROM menu_items"}
            }}),
        ],
    )
    .await;

    assert_eq!(responses.len(), 5);
    assert_eq!(
        responses[0]["result"]["protocolVersion"],
        menu_maker::server::DEFAULT_PROTOCOL_VERSION
    );

    assert_eq!(structured_result(&responses[1]), &json!([{"x": 1}]));
    assert_eq!(
        structured_result(&responses[2]),
        &json!([{"message": "Query executed successfully."}])
    );

    let summary = structured_result(&responses[3]);
    assert_eq!(summary[0]["metric"], "Price");
    assert_eq!(summary[0]["count"], 2);
    assert_eq!(summary[0]["mean"], 150.0);

    assert_eq!(structured_result(&responses[4]), &json!([{"n": 5}]));
}

#[tokio::test]
async fn test_store_error_is_reported_as_tool_error() {
    let (store, _dir) = create_seeded_store().await;
    let server = Server::new(
        ServerConfig::default(),
        ToolRouter::new(Arc::new(store)),
        SchemaResource::builtin(),
    );

    let responses = exchange(
        &server,
        &[json!({"jsonrpc": "2.0", "id": 7, "method": "tools/call", "params": {
            "name": "async_query_to_df",
            "arguments": {"query": "SELECT * FROM no_such_table"}
        }})],
    )
    .await;

    let result = &responses[0]["result"];
    assert_eq!(result["isError"], true);
    assert!(result["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("no such table"));
}
