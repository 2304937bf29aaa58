//! Query executor integration tests against SQLite.

use super::common::{create_seeded_store, create_test_store};
use menu_maker::db::{Store, Value};
use menu_maker::error::MenuError;
use menu_maker::query::{QueryExecutor, QueryResponse, SUCCESS_MESSAGE};
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn test_select_literal() {
    let (store, _dir) = create_test_store();
    let executor = QueryExecutor::new(&store);

    let response = executor.execute("SELECT 1 AS x").await.unwrap();

    assert_eq!(serde_json::to_value(&response).unwrap(), json!([{ "x": 1 }]));
}

#[tokio::test]
async fn test_records_share_the_column_list() {
    let (store, _dir) = create_seeded_store().await;
    let executor = QueryExecutor::new(&store);

    let response = executor
        .execute("SELECT Price, Item_Name, Avg_Rating FROM menu_items ORDER BY Item_ID")
        .await
        .unwrap();

    let records = response.records();
    assert_eq!(records.len(), 4);
    for record in records {
        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Price", "Item_Name", "Avg_Rating"]);
    }

    assert_eq!(records[0]["Item_Name"], Value::from("Paneer Tikka"));
    assert_eq!(records[0]["Price"], Value::Float(220.0));
    assert_eq!(records[3]["Avg_Rating"], Value::Null);
}

#[tokio::test]
async fn test_rows_keep_store_order() {
    let (store, _dir) = create_seeded_store().await;
    let executor = QueryExecutor::new(&store);

    let response = executor
        .execute("SELECT Item_Name FROM menu_items ORDER BY Total_Orders DESC")
        .await
        .unwrap();

    let names: Vec<Value> = response
        .records()
        .iter()
        .map(|r| r["Item_Name"].clone())
        .collect();
    assert_eq!(
        names,
        vec![
            Value::from("Butter Chicken"),
            Value::from("Dal Makhani"),
            Value::from("Paneer Tikka"),
            Value::from("Gulab Jamun"),
        ]
    );
}

#[tokio::test]
async fn test_empty_select_is_empty_list_not_acknowledgement() {
    let (store, _dir) = create_seeded_store().await;
    let executor = QueryExecutor::new(&store);

    let response = executor
        .execute("SELECT * FROM menu_items WHERE Price > 10000")
        .await
        .unwrap();

    assert_eq!(response, QueryResponse::Rows(vec![]));
}

#[tokio::test]
async fn test_mutation_is_acknowledged_and_durable() {
    let (store, _dir) = create_seeded_store().await;
    let executor = QueryExecutor::new(&store);

    let response = executor
        .execute("UPDATE menu_items SET Price = 99 WHERE Item_Name = 'Gulab Jamun'")
        .await
        .unwrap();
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!([{ "message": SUCCESS_MESSAGE }])
    );

    // A separate session sees the change.
    let mut session = store.open().await.unwrap();
    let result = session
        .execute("SELECT Price FROM menu_items WHERE Item_Name = 'Gulab Jamun'")
        .await
        .unwrap();
    session.close().await.unwrap();
    assert_eq!(result.rows, vec![vec![Value::Float(99.0)]]);
}

#[tokio::test]
async fn test_returning_clause_yields_rows() {
    let (store, _dir) = create_seeded_store().await;
    let executor = QueryExecutor::new(&store);

    let response = executor
        .execute("DELETE FROM menu_items WHERE Category = 'Dessert' RETURNING Item_Name")
        .await
        .unwrap();

    assert!(!response.is_acknowledgement());
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!([{ "Item_Name": "Gulab Jamun" }])
    );
}

#[tokio::test]
async fn test_syntax_error_is_query_error() {
    let (store, _dir) = create_test_store();
    let executor = QueryExecutor::new(&store);

    let err = executor.execute("SELEC * FROM menu_items").await.unwrap_err();

    assert!(matches!(err, MenuError::Query(_)));
    assert!(err.to_string().to_lowercase().contains("syntax error"));
}

#[tokio::test]
async fn test_constraint_violation_leaves_no_partial_write() {
    let (store, _dir) = create_seeded_store().await;
    let executor = QueryExecutor::new(&store);

    let err = executor
        .execute("INSERT INTO menu_items (Item_ID, Item_Name) VALUES (1, 'Duplicate'), (99, 'New')")
        .await
        .unwrap_err();
    assert!(matches!(err, MenuError::Query(_)));

    let response = executor
        .execute("SELECT COUNT(*) AS n FROM menu_items")
        .await
        .unwrap();
    assert_eq!(response.records()[0]["n"], Value::Int(4));
}

#[tokio::test]
async fn test_two_selects_are_rejected_not_mislabeled() {
    let (store, _dir) = create_test_store();
    let executor = QueryExecutor::new(&store);

    let err = executor
        .execute("SELECT 1 AS x; SELECT 'p' AS y, 2 AS z")
        .await
        .unwrap_err();

    assert!(matches!(err, MenuError::Query(ref m) if m.contains("one statement at a time")));
}

#[tokio::test]
async fn test_trailing_mutation_after_select_never_runs() {
    let (store, _dir) = create_seeded_store().await;
    let executor = QueryExecutor::new(&store);

    let err = executor
        .execute("SELECT 1 AS x; DELETE FROM menu_items")
        .await
        .unwrap_err();
    assert!(matches!(err, MenuError::Query(_)));

    let response = executor
        .execute("SELECT COUNT(*) AS n FROM menu_items")
        .await
        .unwrap();
    assert_eq!(response.records()[0]["n"], Value::Int(4));
}

#[tokio::test]
async fn test_multi_statement_ddl_leaves_no_table_behind() {
    let (store, _dir) = create_test_store();
    let executor = QueryExecutor::new(&store);

    let err = executor
        .execute("CREATE TABLE a (x INTEGER); INSERT INTO a VALUES (1);")
        .await
        .unwrap_err();
    assert!(matches!(err, MenuError::Query(_)));

    let response = executor
        .execute("SELECT name FROM sqlite_master WHERE name = 'a'")
        .await
        .unwrap();
    assert_eq!(response, QueryResponse::Rows(vec![]));
}

#[tokio::test]
async fn test_vacuum_is_acknowledged() {
    let (store, _dir) = create_seeded_store().await;
    let executor = QueryExecutor::new(&store);

    let response = executor.execute("VACUUM").await.unwrap();

    assert!(response.is_acknowledgement());
}

#[tokio::test]
async fn test_transaction_control_statement_is_acknowledged() {
    let (store, _dir) = create_seeded_store().await;
    let executor = QueryExecutor::new(&store);

    assert!(executor.execute("BEGIN").await.unwrap().is_acknowledgement());

    // The abandoned transaction does not hold a lock past its session.
    let response = executor
        .execute("UPDATE menu_items SET Price = 100 WHERE Item_ID = 1")
        .await
        .unwrap();
    assert!(response.is_acknowledgement());
}

#[tokio::test]
async fn test_unopenable_database_is_connection_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = menu_maker::db::SqliteStore::new(&menu_maker::config::DatabaseConfig {
        path: dir.path().join("no_such_dir").join("menu.db"),
        create_if_missing: true,
    });
    let executor = QueryExecutor::new(&store);

    let err = executor.execute("SELECT 1").await.unwrap_err();
    assert!(matches!(err, MenuError::Connection(_)));
}

#[tokio::test]
async fn test_concurrent_calls_use_independent_sessions() {
    let (store, _dir) = create_seeded_store().await;

    let tasks = (0..4).map(|_| {
        let store = store.clone();
        tokio::spawn(async move {
            QueryExecutor::new(&store)
                .execute("SELECT COUNT(*) AS n FROM menu_items")
                .await
                .map(|response| response.into_records())
        })
    });

    for task in tasks.collect::<Vec<_>>() {
        let records = task.await.unwrap().unwrap();
        assert_eq!(records[0]["n"], Value::Int(4));
    }
}
