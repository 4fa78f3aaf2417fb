//! Editing operations on a drafted workflow graph

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::errors::BuilderError;
use crate::models::workflow::WorkflowGraph;

/// One edit, as sent by the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    Rename { name: String },
    AddNode,
    RemoveNode { index: usize },
    DuplicateNode { index: usize },
    UpdateNode {
        index: usize,
        field: String,
        value: Value,
    },
}

/// Apply `ops` to `graph` in order, stopping at the first failure
pub fn apply_edits(graph: &mut WorkflowGraph, ops: &[EditOp]) -> Result<(), BuilderError> {
    for op in ops {
        apply_edit(graph, op.clone())?;
    }
    Ok(())
}

pub fn apply_edit(graph: &mut WorkflowGraph, op: EditOp) -> Result<(), BuilderError> {
    debug!("Applying {:?} to '{}'", op, graph.name);
    match op {
        EditOp::Rename { name } => graph.rename(name),
        EditOp::AddNode => {
            graph.add_node();
        }
        EditOp::RemoveNode { index } => {
            graph.remove_node(index)?;
        }
        EditOp::DuplicateNode { index } => {
            graph.duplicate_node(index)?;
        }
        EditOp::UpdateNode {
            index,
            field,
            value,
        } => {
            graph.update_node(index, &field, value)?;
        }
    }
    Ok(())
}
