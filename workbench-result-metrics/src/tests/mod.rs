use std::fs;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;

use crate::result_metrics_impl::{BeforeAfter, TargetVsAchieved};
use crate::result_structs::processing_result_struct::ProcessingResult;

fn engine_result() -> ProcessingResult {
    let rows: Vec<_> = (0..45)
        .map(|index| json!({"age": format!("({}, {}]", index, index + 10), "zip": "*"}))
        .collect();

    serde_json::from_value(json!({
        "id": "res-9",
        "dataset_id": "ds-1",
        "config_id": 17,
        "metrics": {
            "k_anonymity": 3,
            "l_diversity": 2.0,
            "information_loss_percentage": 37.5,
            "original_rows": 45,
            "anonymized_rows": 45,
            "original_columns": 4,
            "anonymized_columns": 3,
            "quasi_identifiers": ["age", "zip"],
            "sensitive_attributes": ["salary"]
        },
        "technique_details": {
            "identifier_id": {
                "technique": "Identifier suppression",
                "changes": ["Column 'id' was removed"],
                "explanation": "Direct identifiers are removed entirely."
            },
            "generalization_age": {
                "technique": "Generalization",
                "column": "age",
                "params": {"bins": 5, "levels": 5},
                "changes": ["Example: 34 -> (30, 40]"],
                "explanation": "Exact values were replaced by ranges."
            },
            "k_anonymity": {
                "technique": "K-Anonymity",
                "target_k": 3,
                "achieved_k": 3,
                "quasi_identifiers": ["age", "zip"],
                "changes": [],
                "explanation": "Records were grouped."
            },
            "l_diversity": {
                "technique": "L-Diversity",
                "target_l": 2,
                "achieved_l": 1.5,
                "sensitive_attribute": "salary",
                "explanation": "Groups were checked for diversity."
            }
        },
        "anonymized_data": rows,
        "status": "completed",
        "processing_time_ms": 1530,
        "created_at": "2026-10-01T10:00:00"
    }))
    .unwrap()
}

#[test]
fn test_metric_accessors() {
    let result = engine_result();

    assert_eq!(result.config_id, "17");
    assert_eq!(result.achieved_k(), 3);
    assert_eq!(result.achieved_l(), 2.0);
    assert_eq!(result.information_loss_percentage(), 37.5);
    assert_eq!(
        result.row_counts(),
        BeforeAfter {
            original: 45,
            anonymized: 45
        }
    );
    assert_eq!(
        result.column_counts(),
        BeforeAfter {
            original: 4,
            anonymized: 3
        }
    );
    assert_eq!(result.quasi_identifiers(), &["age".to_string(), "zip".to_string()]);
    assert_eq!(result.sensitive_attributes(), &["salary".to_string()]);
}

#[test]
fn test_explanations_keep_engine_order() {
    let result = engine_result();
    let explanations = result.explanations();

    let keys: Vec<&str> = explanations.iter().map(|entry| entry.key).collect();
    assert_eq!(
        keys,
        vec!["identifier_id", "generalization_age", "k_anonymity", "l_diversity"]
    );

    assert_eq!(explanations[0].column, None);
    assert_eq!(explanations[0].target, None);
    assert_eq!(explanations[1].column, Some("age"));
    assert_eq!(explanations[1].params, Some(&json!({"bins": 5, "levels": 5})));
    assert_eq!(
        explanations[2].target,
        Some(TargetVsAchieved::K {
            target: 3,
            achieved: 3
        })
    );
    assert_eq!(
        explanations[3].target,
        Some(TargetVsAchieved::L {
            target: 2,
            achieved: 1.5
        })
    );
    assert!(explanations[3].changes.is_empty());
}

#[test]
fn test_processing_time() {
    let mut result = engine_result();
    assert_eq!(result.processing_time(), Duration::from_millis(1530));
    assert_eq!(result.processing_time_label(), "1.5s");

    result.processing_time_ms = 250;
    assert_eq!(result.processing_time_label(), "250ms");
}

#[test]
fn test_rows_pagination() {
    let result = engine_result();

    assert_eq!(result.page_count(), 3);
    assert_eq!(result.rows_page(1).len(), 20);
    assert_eq!(result.rows_page(3).len(), 5);
    assert!(result.rows_page(0).is_empty());
    assert!(result.rows_page(4).is_empty());
    assert_eq!(result.rows_page(2)[0]["age"], json!("(20, 30]"));
}

#[test]
fn test_missing_sections_default() {
    let result: ProcessingResult =
        serde_json::from_value(json!({"id": "r", "dataset_id": "d", "config_id": "c"})).unwrap();

    assert_eq!(result.achieved_k(), 0);
    assert!(result.explanations().is_empty());
    assert_eq!(result.page_count(), 0);
}

#[test]
fn test_export_anonymized_rows() {
    let result = engine_result();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(result.default_export_file_name());

    result.export_anonymized_rows(&path).unwrap();

    let exported: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(exported.as_array().unwrap().len(), 45);
    assert!(path.ends_with("anonymized_data_res-9.json"));
}
