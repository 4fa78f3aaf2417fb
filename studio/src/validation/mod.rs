//! Workflow graph validation
//!
//! Rules run against the JSON form of a graph so that untyped model output can
//! be checked before it is deserialized.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::workflow::is_trigger_type;

/// Fields every node must carry
const REQUIRED_NODE_FIELDS: [&str; 4] = ["id", "name", "type", "typeVersion"];

/// Validation outcome
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,

    /// Findings that do not block saving (e.g., dangling connections)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Report with the given errors; valid only when there are none
    pub fn failed(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings: Vec::new(),
        }
    }
}

/// Validate a workflow graph in JSON form.
///
/// A missing `nodes` array stops validation immediately. Every other rule is
/// checked independently and contributes its own error.
pub fn validate(workflow: &Value) -> ValidationReport {
    let Some(nodes) = workflow.get("nodes").and_then(Value::as_array) else {
        return ValidationReport::failed(vec!["Workflow must have nodes array".to_string()]);
    };

    let mut errors = Vec::new();

    let has_name = workflow
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(|name| !name.is_empty());
    if !has_name {
        errors.push("Workflow must have a name".to_string());
    }

    if nodes.is_empty() {
        errors.push("Workflow must have at least one node".to_string());
    }

    let has_trigger = nodes.iter().any(|node| {
        node.get("type")
            .and_then(Value::as_str)
            .is_some_and(is_trigger_type)
    });
    if !has_trigger {
        errors.push("Workflow must have at least one trigger node".to_string());
    }

    for (i, node) in nodes.iter().enumerate() {
        for field in REQUIRED_NODE_FIELDS {
            if is_missing(node.get(field)) {
                errors.push(format!("Node {}: missing {}", i, field));
            }
        }
        if !is_position(node.get("position")) {
            errors.push(format!("Node {}: position must be an [x, y] pair", i));
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        warnings: dangling_connections(workflow, nodes),
    }
}

/// Absent, null and empty-string fields count as missing
fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn is_position(value: Option<&Value>) -> bool {
    match value.and_then(Value::as_array) {
        Some(pair) => pair.len() == 2 && pair.iter().all(Value::is_number),
        None => false,
    }
}

/// Connection endpoints that name no node, by ID or by name
fn dangling_connections(workflow: &Value, nodes: &[Value]) -> Vec<String> {
    let Some(connections) = workflow.get("connections").and_then(Value::as_object) else {
        return Vec::new();
    };

    let known: HashSet<&str> = nodes
        .iter()
        .flat_map(|node| {
            ["id", "name"]
                .into_iter()
                .filter_map(|field| node.get(field).and_then(Value::as_str))
        })
        .collect();

    let mut warnings = Vec::new();
    for (source, channels) in connections {
        if !known.contains(source.as_str()) {
            warnings.push(format!("Connection source '{}' matches no node", source));
        }
        let targets = channels
            .as_object()
            .into_iter()
            .flat_map(|channels| channels.values())
            .filter_map(Value::as_array)
            .flatten()
            .filter_map(Value::as_array)
            .flatten()
            .filter_map(|conn| conn.get("node").and_then(Value::as_str));
        for target in targets {
            if !known.contains(target) {
                warnings.push(format!(
                    "Connection '{}' -> '{}' targets no node",
                    source, target
                ));
            }
        }
    }
    warnings
}
