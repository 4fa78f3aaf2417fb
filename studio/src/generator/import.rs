//! Import of language-model output as a workflow graph

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::BuilderError;
use crate::models::workflow::{Connections, Node, WorkflowGraph};
use crate::utils::{strip_code_fence, unix_millis};
use crate::validation::{validate, ValidationReport};

/// Message reported for unparseable model output
pub const INVALID_FORMAT_MESSAGE: &str = "Invalid JSON format received from AI";

/// A graph read from model output, with the report for the JSON as received
#[derive(Debug, Clone, Serialize)]
pub struct ImportedGraph {
    pub graph: WorkflowGraph,
    pub report: ValidationReport,
}

/// Parse a graph out of model output.
///
/// A surrounding code fence is removed and a missing or empty name is replaced
/// with a timestamped placeholder. Only text that is not JSON is rejected;
/// structural problems end up in the report.
pub fn import_generated(text: &str) -> Result<ImportedGraph, BuilderError> {
    let body = strip_code_fence(text);

    let mut value: Value = serde_json::from_str(body).map_err(|e| {
        debug!("Model output is not JSON: {}", e);
        BuilderError::InvalidFormat(INVALID_FORMAT_MESSAGE.to_string())
    })?;

    if let Value::Object(map) = &mut value {
        let has_name = map
            .get("name")
            .and_then(Value::as_str)
            .is_some_and(|name| !name.is_empty());
        if !has_name {
            map.insert(
                "name".to_string(),
                Value::String(placeholder_name(unix_millis())),
            );
        }
    }

    let report = validate(&value);
    let graph = to_graph(value);
    Ok(ImportedGraph { graph, report })
}

/// Best-effort typed view of a JSON graph.
///
/// Fields of the wrong shape are left at their defaults.
fn to_graph(value: Value) -> WorkflowGraph {
    match serde_json::from_value::<WorkflowGraph>(value.clone()) {
        Ok(graph) => graph,
        Err(e) => {
            debug!("Reading model output field by field: {}", e);
            let name = value
                .get("name")
                .and_then(Value::as_str)
                .map_or_else(|| placeholder_name(unix_millis()), str::to_string);
            let mut graph = WorkflowGraph::new(name);
            graph.nodes = value
                .get("nodes")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .filter_map(|node| serde_json::from_value::<Node>(node.clone()).ok())
                .collect();
            graph.connections = value
                .get("connections")
                .and_then(|c| serde_json::from_value::<Connections>(c.clone()).ok())
                .unwrap_or_default();
            graph
        }
    }
}

/// Placeholder name for a graph generated at `millis`
pub fn placeholder_name(millis: i64) -> String {
    format!("Generated Workflow {}", millis)
}
