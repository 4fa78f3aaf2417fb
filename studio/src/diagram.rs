//! Mermaid projection of a workflow graph

use std::fmt::Write;

use crate::models::workflow::WorkflowGraph;
use crate::utils::underscore_whitespace;

const DEFAULT_EMOJI: &str = "📦";

const CLASS_DEFS: &str = "
  classDef default fill:#1f2937,stroke:#8b5cf6,stroke-width:2px,color:#ffffff
  classDef trigger fill:#059669,stroke:#10b981,stroke-width:2px,color:#ffffff
  classDef action fill:#0369a1,stroke:#0ea5e9,stroke-width:2px,color:#ffffff
";

/// Glyph for a node type's trailing segment
pub fn node_emoji(type_suffix: &str) -> &'static str {
    match type_suffix {
        "manualTrigger" => "▶️",
        "webhook" => "🔗",
        "httpRequest" => "🌐",
        "gmail" => "📧",
        "slack" => "💬",
        "airtable" => "📊",
        "typeform" => "📝",
        "set" => "⚙️",
        "if" => "🔀",
        "function" => "⚡",
        _ => DEFAULT_EMOJI,
    }
}

/// Render the graph as Mermaid `graph TD` text, or an empty string when the
/// graph has no nodes.
///
/// Diagram identifiers come from node names, so two nodes sharing a name are
/// drawn as one.
pub fn to_mermaid(graph: &WorkflowGraph) -> String {
    if graph.nodes.is_empty() {
        return String::new();
    }

    let mut out = String::from("graph TD\n");

    for node in &graph.nodes {
        let _ = writeln!(
            out,
            "  {}[\"{} {}\"]",
            underscore_whitespace(&node.name),
            node_emoji(node.type_suffix()),
            node.name
        );
    }

    let diagram_id = |endpoint: &str| {
        let name = graph
            .resolve(endpoint)
            .map(|node| node.name.as_str())
            .unwrap_or(endpoint);
        underscore_whitespace(name)
    };

    for edge in graph.connections.edges() {
        let _ = writeln!(
            out,
            "  {} --> {}",
            diagram_id(&edge.source),
            diagram_id(&edge.target)
        );
    }

    out.push_str(CLASS_DEFS);
    out
}
