use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use workbench_anonymization_config::config_structs::column_mapping_struct::{
    ColumnMapping, ColumnRole,
};
use workbench_anonymization_config::config_structs::configuration_struct::ConfigurationPayload;
use workbench_anonymization_config::config_structs::global_params_struct::GlobalParameters;
use workbench_anonymization_config::config_structs::technique_struct::{
    TechniqueAssignment, TechniqueParameters,
};
use workbench_app_settings::settings_structs::AppSettings;

use crate::anonymization_engine::{AnonymizationEngine, ProcessRequest};
use crate::engine_error::EngineError;
use crate::http_engine_client::HttpEngineClient;

struct CannedResponse {
    status_line: &'static str,
    body: String,
}

impl CannedResponse {
    fn new(status_line: &'static str, body: serde_json::Value) -> Self {
        Self {
            status_line,
            body: body.to_string(),
        }
    }
}

/// Serves the canned responses in order, one connection each, and hands back
/// the raw requests it received.
async fn serve(responses: Vec<CannedResponse>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/api", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for response in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut stream).await);

            let raw = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                response.status_line,
                response.body.len(),
                response.body
            );
            stream.write_all(raw.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        }
        requests
    });

    (base_url, handle)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let read = stream.read(&mut chunk).await.unwrap();
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);

        if let Some(header_end) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buffer[..header_end]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buffer.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buffer).into_owned()
}

fn client_for(base_url: &str) -> HttpEngineClient {
    let settings = AppSettings::default().with_base_url_override(Some(base_url.to_string()));
    HttpEngineClient::new(&settings).unwrap()
}

fn scenario_payload() -> ConfigurationPayload {
    let mut global_params = GlobalParameters::default();
    global_params.set_k(3).unwrap();

    ConfigurationPayload::builder()
        .dataset_id("ds-1")
        .name("Config for payroll")
        .column_mappings(vec![
            ColumnMapping::new("id", ColumnRole::Identifier),
            ColumnMapping::new("age", ColumnRole::QuasiIdentifier),
            ColumnMapping::new("zip", ColumnRole::QuasiIdentifier),
            ColumnMapping::new("salary", ColumnRole::Sensitive),
        ])
        .techniques(vec![
            TechniqueAssignment::new("age", TechniqueParameters::Generalization { bins: 5 }),
            TechniqueAssignment::new("zip", TechniqueParameters::Generalization { bins: 3 }),
        ])
        .global_params(global_params)
        .build()
}

#[tokio::test]
async fn test_persist_then_process() {
    let (base_url, server) = serve(vec![
        CannedResponse::new(
            "200 OK",
            json!({"id": "cfg-1", "dataset_id": "ds-1", "name": "Config for payroll"}),
        ),
        CannedResponse::new(
            "200 OK",
            json!({"id": "res-1", "dataset_id": "ds-1", "config_id": "cfg-1", "status": "completed"}),
        ),
    ])
    .await;
    let client = client_for(&base_url);

    let persisted = client.create_config(&scenario_payload()).await.unwrap();
    let result = client
        .process(
            &ProcessRequest::builder()
                .dataset_id("ds-1")
                .config_id(persisted.id.as_str())
                .build(),
        )
        .await
        .unwrap();

    assert_eq!(persisted.id, "cfg-1");
    assert_eq!(result.id, "res-1");

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("POST /api/configs "));
    assert!(requests[0].contains(r#""column_mappings":[{"column":"id","type":"identifier"}"#));
    assert!(requests[0].contains(r#""global_params":{"k":3,"l":2,"t":0.2,"epsilon":1.0}"#));
    assert!(requests[1].starts_with("POST /api/process "));
    assert!(requests[1].contains(r#"{"dataset_id":"ds-1","config_id":"cfg-1"}"#));
}

#[tokio::test]
async fn test_process_rejection_uses_engine_detail() {
    let (base_url, _server) = serve(vec![CannedResponse::new(
        "500 Internal Server Error",
        json!({"detail": "k too large for dataset size"}),
    )])
    .await;
    let client = client_for(&base_url);

    let error = client
        .process(
            &ProcessRequest::builder()
                .dataset_id("ds-1")
                .config_id("cfg-1")
                .build(),
        )
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "k too large for dataset size");
    assert!(matches!(error, EngineError::Rejected { status: 500, .. }));
}

#[tokio::test]
async fn test_unreachable_engine_names_base_url() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/api", listener.local_addr().unwrap());
    drop(listener);
    let client = client_for(&base_url);

    let error = client.list_datasets().await.unwrap_err();

    assert!(error.is_unreachable());
    assert_eq!(
        error.to_string(),
        format!("Cannot reach the processing engine at {base_url}. Check that the backend is running.")
    );
}

#[tokio::test]
async fn test_results_filter_by_dataset() {
    let (base_url, server) = serve(vec![CannedResponse::new("200 OK", json!([]))]).await;
    let client = client_for(&base_url);

    let results = client.list_results(Some("ds-1")).await.unwrap();

    assert!(results.is_empty());
    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("GET /api/results?dataset_id=ds-1 "));
}

#[tokio::test]
async fn test_ids_stay_inside_their_path_segment() {
    let dataset = json!({
        "id": "../stats",
        "name": "odd",
        "column_names": ["id"],
        "data": [],
        "row_count": 0
    });
    let (base_url, server) = serve(vec![CannedResponse::new("200 OK", dataset)]).await;
    let client = client_for(&base_url);

    let dataset = client.get_dataset("../stats").await.unwrap();
    assert_eq!(dataset.id, "../stats");

    let error = client.get_result("..").await.unwrap_err();
    assert!(matches!(error, EngineError::Unexpected { .. }));

    let requests = server.await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("GET /api/datasets/..%2Fstats "));
}

#[tokio::test]
async fn test_stats_and_datasets_decode() {
    let (base_url, _server) = serve(vec![
        CannedResponse::new(
            "200 OK",
            json!({
                "total_datasets": 2,
                "total_configs": 5,
                "total_results": 3,
                "total_rows_processed": 300,
                "avg_processing_time_ms": 41.5
            }),
        ),
        CannedResponse::new(
            "200 OK",
            json!([{
                "id": 7,
                "name": "payroll",
                "column_names": ["id", "age"],
                "data": [{"id": 1, "age": 34}],
                "row_count": 1
            }]),
        ),
    ])
    .await;
    let client = client_for(&base_url);

    let stats = client.stats().await.unwrap();
    assert_eq!(stats.total_configs, 5);
    assert_eq!(stats.avg_processing_time_ms, 41.5);

    let datasets = client.list_datasets().await.unwrap();
    assert_eq!(datasets[0].id, "7");
    assert_eq!(datasets[0].column_names, vec!["id".to_string(), "age".to_string()]);
    assert_eq!(datasets[0].rows(), 1);
}

#[tokio::test]
async fn test_undecodable_success_body_is_unexpected() {
    let (base_url, _server) = serve(vec![CannedResponse {
        status_line: "200 OK",
        body: "definitely not json".to_string(),
    }])
    .await;
    let client = client_for(&base_url);

    let error = client.stats().await.unwrap_err();

    assert!(matches!(error, EngineError::Unexpected { .. }));
    assert!(error.to_string().starts_with("An unexpected error occurred"));
}
