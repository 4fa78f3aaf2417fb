//! Workflow graph model tests

use serde_json::json;
use velo_studio::errors::BuilderError;
use velo_studio::generator::import::{import_generated, INVALID_FORMAT_MESSAGE};
use velo_studio::generator::parse;
use velo_studio::models::workflow::WorkflowGraph;

#[test]
fn test_json_round_trip() {
    let mut graph = parse("razorpay payment to whatsapp and airtable");
    graph.id = Some("17".to_string());
    graph.nodes[1].credentials = Some(
        json!({ "httpHeaderAuth": { "id": "3", "name": "WhatsApp" } })
            .as_object()
            .cloned()
            .unwrap(),
    );

    let text = graph.to_json_pretty().unwrap();
    let restored = WorkflowGraph::from_json_str(&text).unwrap();
    assert_eq!(restored, graph);
}

#[test]
fn test_wire_field_names() {
    let value = serde_json::to_value(parse("typeform")).unwrap();
    let node = &value["nodes"][0];
    assert_eq!(node["type"], "n8n-nodes-base.typeformTrigger");
    assert_eq!(node["typeVersion"], 1);
    assert!(value.get("id").is_none());
    assert_eq!(value["active"], false);
}

#[test]
fn test_import_strips_code_fence() {
    let text = "```json\n{\"name\": \"Fenced\", \"nodes\": [], \"connections\": {}}\n```";
    let graph = import_generated(text).unwrap().graph;
    assert_eq!(graph.name, "Fenced");
    assert!(graph.nodes.is_empty());
}

#[test]
fn test_import_defaults_name() {
    let graph = import_generated(r#"{"nodes": []}"#).unwrap().graph;
    assert!(graph.name.starts_with("Generated Workflow "));

    let graph = import_generated(r#"{"name": "", "nodes": []}"#).unwrap().graph;
    assert!(graph.name.starts_with("Generated Workflow "));
}

#[test]
fn test_import_rejects_prose() {
    for text in ["Sure! Here is your workflow.", "```json\n{ broken\n```"] {
        match import_generated(text) {
            Err(BuilderError::InvalidFormat(message)) => {
                assert_eq!(message, INVALID_FORMAT_MESSAGE)
            }
            other => panic!("expected InvalidFormat for {text:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_import_reports_json_that_is_not_a_graph() {
    for text in ["[1, 2, 3]", "{\"name\": \"no nodes\"}"] {
        let imported = import_generated(text).unwrap();
        assert!(!imported.report.valid);
        assert_eq!(imported.report.errors, ["Workflow must have nodes array"]);
        assert!(imported.graph.nodes.is_empty());
    }
}

#[test]
fn test_import_keeps_incomplete_nodes() {
    let imported = import_generated(
        r#"{"name": "Loose", "nodes": [
            {"name": "Hook", "type": "n8n-nodes-base.webhookTrigger", "position": [10, 20, 30]},
            "not a node"
        ]}"#,
    )
    .unwrap();

    assert_eq!(
        imported.report.errors,
        [
            "Node 0: missing id",
            "Node 0: missing typeVersion",
            "Node 0: position must be an [x, y] pair",
            "Node 1: missing id",
            "Node 1: missing name",
            "Node 1: missing type",
            "Node 1: missing typeVersion",
            "Node 1: position must be an [x, y] pair",
        ]
    );
    assert_eq!(imported.graph.nodes.len(), 1);
    assert_eq!(imported.graph.nodes[0].position, [10.0, 20.0]);
    assert!(imported.graph.nodes[0].type_version.is_none());

    // Typed graph keeps the gaps visible to later validation
    assert!(!imported.graph.validate().valid);
}

#[test]
fn test_fractional_type_version_survives() {
    let graph = import_generated(
        r#"{"name": "v", "nodes": [{"id": "a", "name": "A", "type": "n8n-nodes-base.webhook",
            "typeVersion": 1.1, "position": [0, 0]}]}"#,
    )
    .unwrap()
    .graph;
    assert_eq!(
        graph.nodes[0].type_version.as_ref().and_then(|v| v.as_f64()),
        Some(1.1)
    );
}
