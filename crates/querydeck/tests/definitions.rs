use std::fs;
use std::sync::Arc;

use querydeck::{
    async_trait, DefinitionError, DefinitionStore, ExecutorError, ExecutorResponse, Lifecycle,
    MemoryDefinitionStore, Panel, ProcessorRegistry, QueryDefinition, QueryExecutor, QueryResult,
};
use serde_json::json;
use tempfile::TempDir;

const YAML: &str = r#"
id: revenue
name: Revenue by month
template: |
  SELECT month, sum(amount) AS revenue, sum(cost) AS cost
  FROM sales WHERE region = {{region}}
  GROUP BY month
target: warehouse
view: line
variables:
  - name: region
    value: emea
"#;

#[test]
fn test_load_yaml_and_json_files() {
    let dir = TempDir::new().unwrap();

    let yaml_path = dir.path().join("revenue.yaml");
    fs::write(&yaml_path, YAML).unwrap();
    let from_yaml = QueryDefinition::from_path(&yaml_path).unwrap();

    let json_path = dir.path().join("revenue.json");
    fs::write(&json_path, serde_json::to_string_pretty(&from_yaml).unwrap()).unwrap();
    let from_json = QueryDefinition::from_path(&json_path).unwrap();

    assert_eq!(from_yaml, from_json);
    assert_eq!(from_yaml.view, "line");
    assert_eq!(from_yaml.variables[0].value, "emea");
}

#[test]
fn test_yml_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("q.yml");
    fs::write(&path, "id: q\ntemplate: SELECT 1\ntarget: db\n").unwrap();
    assert_eq!(QueryDefinition::from_path(&path).unwrap().id, "q");
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("q.toml");
    fs::write(&path, "id = 'q'").unwrap();
    assert!(matches!(
        QueryDefinition::from_path(&path),
        Err(DefinitionError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = QueryDefinition::from_path(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, DefinitionError::Io { .. }));
    assert!(err.to_string().contains("absent.yaml"));
}

#[test]
fn test_parse_error_names_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{\"id\": ").unwrap();

    let err = QueryDefinition::from_path(&path).unwrap_err();
    match &err {
        DefinitionError::Json { path: Some(p), .. } => assert_eq!(p, &path),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("broken.json"));
}

struct Warehouse;

#[async_trait]
impl QueryExecutor for Warehouse {
    async fn execute(&self, target: &str, query: &str) -> Result<QueryResult, ExecutorError> {
        let response: ExecutorResponse = if target != "warehouse" {
            ExecutorResponse::failed(format!("no such data source: {target}"))
        } else if query.contains("'emea'") {
            serde_json::from_value(json!({
                "success": true,
                "data": {
                    "rows": [
                        {"month": "2024-01", "revenue": 100, "cost": "40.5"},
                        {"month": "2024-02", "revenue": 120, "cost": 42}
                    ],
                    "columns": [
                        {"name": "month", "type": "text"},
                        {"name": "revenue", "type": "numeric"},
                        {"name": "cost", "type": "numeric"}
                    ]
                }
            }))
            .unwrap()
        } else {
            ExecutorResponse::ok(QueryResult::default())
        };
        response.into_result()
    }
}

#[tokio::test]
async fn test_stored_definition_end_to_end() {
    let store = MemoryDefinitionStore::new();
    store.save(QueryDefinition::from_yaml(YAML).unwrap()).unwrap();

    let definition = store.resolve("revenue").unwrap();
    let panel = Panel::new(Arc::new(Warehouse), Arc::new(ProcessorRegistry::with_builtins()));

    let state = panel
        .refresh(&definition.to_request(), &definition.view, None)
        .await
        .completed()
        .unwrap();

    assert!(state.execution.final_query.unwrap().contains("region = 'emea'"));
    assert_eq!(
        state.view.processed_data,
        Some(json!({
            "labels": ["2024-01", "2024-02"],
            "series": [
                {"name": "revenue", "data": [100.0, 120.0]},
                {"name": "cost", "data": [40.5, 42.0]}
            ]
        }))
    );
}

#[tokio::test]
async fn test_unknown_target_reports_executor_error() {
    let mut definition = QueryDefinition::from_yaml(YAML).unwrap();
    definition.target = "crm".into();

    let panel = Panel::new(Arc::new(Warehouse), Arc::new(ProcessorRegistry::with_builtins()));
    let state = panel
        .refresh(&definition.to_request(), &definition.view, None)
        .await
        .completed()
        .unwrap();

    assert_eq!(state.error().as_deref(), Some("no such data source: crm"));
    assert_eq!(state.view.lifecycle, Lifecycle::Init);
}
