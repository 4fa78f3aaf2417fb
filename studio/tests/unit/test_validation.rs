//! Graph validator tests

use serde_json::json;
use velo_studio::validation::validate;

fn minimal() -> serde_json::Value {
    json!({
        "name": "Minimal",
        "nodes": [{
            "id": "trigger",
            "name": "Manual Trigger",
            "type": "n8n-nodes-base.manualTrigger",
            "typeVersion": 1,
            "position": [100, 200],
            "parameters": {}
        }],
        "connections": {}
    })
}

#[test]
fn test_accepts_minimal_graph() {
    let report = validate(&minimal());
    assert!(report.valid);
    assert!(report.errors.is_empty());
}

#[test]
fn test_missing_nodes_short_circuits() {
    let report = validate(&json!({ "name": "" }));
    assert!(!report.valid);
    assert_eq!(report.errors, ["Workflow must have nodes array"]);

    let report = validate(&json!({ "name": "x", "nodes": {} }));
    assert_eq!(report.errors, ["Workflow must have nodes array"]);
}

#[test]
fn test_rejects_empty_nodes() {
    let report = validate(&json!({ "name": "Empty", "nodes": [] }));
    assert!(!report.valid);
    assert!(report.errors.iter().any(|e| e.contains("at least one node")));
    assert!(report.errors.iter().any(|e| e.contains("trigger")));
}

#[test]
fn test_rejects_graph_without_trigger() {
    let mut graph = minimal();
    graph["nodes"][0]["type"] = json!("n8n-nodes-base.gmail");
    let report = validate(&graph);
    assert!(!report.valid);
    assert_eq!(report.errors, ["Workflow must have at least one trigger node"]);
}

#[test]
fn test_rejects_missing_name() {
    let mut graph = minimal();
    graph["name"] = json!("");
    let report = validate(&graph);
    assert_eq!(report.errors, ["Workflow must have a name"]);

    graph["name"] = json!("  ");
    assert!(validate(&graph).valid);
}

#[test]
fn test_empty_node_id_is_missing() {
    let mut graph = minimal();
    graph["nodes"][0]["id"] = json!("");
    let report = validate(&graph);
    assert_eq!(report.errors, ["Node 0: missing id"]);
}

#[test]
fn test_reports_every_node_problem() {
    let graph = json!({
        "name": "Broken",
        "nodes": [
            { "id": "a", "type": "n8n-nodes-base.webhookTrigger", "position": [0, 0] },
            { "id": "b", "name": "B", "type": "x", "typeVersion": 1, "position": [0] }
        ]
    });
    let report = validate(&graph);
    assert!(!report.valid);
    assert_eq!(
        report.errors,
        [
            "Node 0: missing name",
            "Node 0: missing typeVersion",
            "Node 1: position must be an [x, y] pair",
        ]
    );
}

#[test]
fn test_dangling_connections_are_warnings() {
    let mut graph = minimal();
    graph["connections"] = json!({
        "Manual Trigger": { "main": [[{ "node": "ghost", "type": "main", "index": 0 }]] },
        "nobody": { "main": [[]] }
    });
    let report = validate(&graph);
    assert!(report.valid);
    assert_eq!(report.warnings.len(), 2);
    assert!(report.warnings.iter().any(|w| w.contains("ghost")));
    assert!(report.warnings.iter().any(|w| w.contains("nobody")));
}
