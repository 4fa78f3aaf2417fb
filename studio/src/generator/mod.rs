//! Prompt-to-workflow generation
//!
//! [`parse`] turns a free-text prompt into a workflow graph using the keyword
//! tables in [`rules`]. [`import_generated`] reads a graph back out of
//! language-model output.

pub mod import;
pub mod rules;

pub use import::{import_generated, ImportedGraph};

use tracing::debug;

use crate::models::workflow::WorkflowGraph;
use rules::{ACTION_RULES, GENERATED_TAGS, NAME_RULES, TRIGGER_RULES};

/// Horizontal spacing between consecutive nodes
const NODE_SPACING: f64 = 200.0;

/// Layout position for the node at `index`
pub fn layout_position(index: usize) -> [f64; 2] {
    [100.0 + NODE_SPACING * index as f64, 200.0]
}

/// Build a workflow graph from a natural-language prompt.
///
/// Matching is case-insensitive substring search. Exactly one trigger is
/// always produced; actions are appended in table order and chained behind it.
pub fn parse(prompt: &str) -> WorkflowGraph {
    let lower = prompt.to_lowercase();

    let mut graph = WorkflowGraph::new(derive_name(&lower));

    let trigger = TRIGGER_RULES
        .iter()
        .find(|rule| rule.matches(&lower))
        .unwrap_or(&rules::MANUAL_TRIGGER);
    graph.nodes.push((trigger.build)("trigger", layout_position(0)));

    for rule in ACTION_RULES.iter().filter(|rule| rule.matches(&lower)) {
        let id = format!("action_{}", graph.nodes.len());
        let position = layout_position(graph.nodes.len());
        graph.nodes.push((rule.build)(&id, position));
    }

    graph.chain_nodes();
    graph.tags = GENERATED_TAGS.iter().map(|t| t.to_string()).collect();

    debug!(
        "Parsed prompt into '{}' with {} nodes",
        graph.name,
        graph.nodes.len()
    );
    graph
}

/// Pick a canned title; the first matching rule wins
fn derive_name(lower_prompt: &str) -> String {
    NAME_RULES
        .iter()
        .find(|(predicate, _)| predicate(lower_prompt))
        .map(|(_, name)| *name)
        .unwrap_or(rules::DEFAULT_NAME)
        .to_string()
}
