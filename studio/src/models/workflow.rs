//! Workflow graph models
//!
//! These mirror the JSON shape accepted by the n8n public API, so a graph can
//! be exported, handed to the platform, and read back without translation.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use crate::errors::BuilderError;
use crate::utils::unix_millis;
use crate::validation::{validate, ValidationReport};

/// Channel used for ordinary data flow between nodes
pub const MAIN_CHANNEL: &str = "main";

/// Type given to nodes added from the editor
pub const NEW_NODE_TYPE: &str = "n8n-nodes-base.httpRequest";

/// A workflow graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowGraph {
    /// Platform-assigned workflow ID
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "de_opt_id")]
    pub id: Option<String>,

    /// Workflow name
    #[serde(default)]
    pub name: String,

    /// Nodes in insertion order
    #[serde(default, deserialize_with = "de_nodes")]
    pub nodes: Vec<Node>,

    /// Outgoing connections keyed by source node
    #[serde(default)]
    pub connections: Connections,

    /// Whether the workflow is live on the platform
    #[serde(default)]
    pub active: bool,

    /// Free-text labels
    #[serde(default, deserialize_with = "de_tags")]
    pub tags: BTreeSet<String>,

    /// Platform workflow settings
    #[serde(default)]
    pub settings: Map<String, Value>,
}

impl WorkflowGraph {
    /// Create an empty, inactive graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            nodes: Vec::new(),
            connections: Connections::default(),
            active: false,
            tags: BTreeSet::new(),
            settings: Map::new(),
        }
    }

    /// Find a node by ID
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find a node that a connection endpoint refers to, by ID first and then by name
    pub fn resolve(&self, endpoint: &str) -> Option<&Node> {
        self.node(endpoint)
            .or_else(|| self.nodes.iter().find(|n| n.name == endpoint))
    }

    /// Connect every node to the next one in insertion order
    pub fn chain_nodes(&mut self) {
        let ids: Vec<String> = self.nodes.iter().map(|n| n.id.clone()).collect();
        for pair in ids.windows(2) {
            self.connections.connect(&pair[0], &pair[1]);
        }
    }

    /// Node at `index`, or `NotFound`
    pub fn node_at(&self, index: usize) -> Result<&Node, BuilderError> {
        self.nodes
            .get(index)
            .ok_or_else(|| BuilderError::NotFound(format!("Node {}", index)))
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Append a blank HTTP request node to the right of the existing ones
    pub fn add_node(&mut self) -> &Node {
        let id = self.unique_node_id(format!("node_{}", unix_millis()));
        let x = 400.0 + 200.0 * self.nodes.len() as f64;
        let mut node = Node::new(id, "New Node", NEW_NODE_TYPE, [x, 200.0]);
        node.credentials = Some(Map::new());
        self.push_node(node)
    }

    /// Append a copy of the node at `index`, offset down and to the right
    pub fn duplicate_node(&mut self, index: usize) -> Result<&Node, BuilderError> {
        let source = self.node_at(index)?.clone();
        let id = self.unique_node_id(format!("{}_copy_{}", source.id, unix_millis()));
        let copy = Node {
            id,
            name: format!("{} (Copy)", source.name),
            position: [source.position[0] + 100.0, source.position[1] + 100.0],
            ..source
        };
        Ok(self.push_node(copy))
    }

    /// Remove the node at `index` together with the connections that
    /// referred to it
    pub fn remove_node(&mut self, index: usize) -> Result<Node, BuilderError> {
        self.node_at(index)?;
        let removed = self.nodes.remove(index);

        for endpoint in [&removed.id, &removed.name] {
            if !endpoint.is_empty() && self.resolve(endpoint).is_none() {
                self.connections.disconnect(endpoint);
            }
        }
        Ok(removed)
    }

    /// Set one JSON field of the node at `index` (e.g., "name", "type",
    /// "parameters")
    pub fn update_node(
        &mut self,
        index: usize,
        field: &str,
        value: Value,
    ) -> Result<&Node, BuilderError> {
        let mut fields = serde_json::to_value(self.node_at(index)?)?;
        if let Value::Object(map) = &mut fields {
            map.insert(field.to_string(), value);
        }
        self.nodes[index] = serde_json::from_value(fields)?;
        Ok(&self.nodes[index])
    }

    fn push_node(&mut self, node: Node) -> &Node {
        self.nodes.push(node);
        &self.nodes[self.nodes.len() - 1]
    }

    fn unique_node_id(&self, base: String) -> String {
        if self.node(&base).is_none() {
            return base;
        }
        let mut n = 2;
        loop {
            let id = format!("{}_{}", base, n);
            if self.node(&id).is_none() {
                return id;
            }
            n += 1;
        }
    }

    /// Check the graph's structural rules
    pub fn validate(&self) -> ValidationReport {
        match serde_json::to_value(self) {
            Ok(value) => validate(&value),
            Err(e) => ValidationReport::failed(vec![e.to_string()]),
        }
    }

    /// Parse a graph from its JSON text form
    pub fn from_json_str(text: &str) -> Result<Self, BuilderError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Export the graph as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String, BuilderError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A node in the workflow graph.
///
/// Deserialization is lenient so that incomplete model output still loads;
/// missing identity fields come back empty and are reported by [`validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node ID, unique within the graph
    #[serde(default)]
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Namespaced node type (e.g., "n8n-nodes-base.httpRequest")
    #[serde(default, rename = "type")]
    pub node_type: String,

    /// Parameter schema version
    #[serde(default, rename = "typeVersion", skip_serializing_if = "Option::is_none")]
    pub type_version: Option<Number>,

    /// Layout coordinates
    #[serde(default, deserialize_with = "de_position")]
    pub position: [f64; 2],

    /// Type-specific parameters
    #[serde(default)]
    pub parameters: Map<String, Value>,

    /// References to externally stored credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Map<String, Value>>,
}

impl Node {
    /// Create a version-1 node with no parameters
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        node_type: impl Into<String>,
        position: [f64; 2],
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type: node_type.into(),
            type_version: Some(Number::from(1)),
            position,
            parameters: Map::new(),
            credentials: None,
        }
    }

    /// Replace the node parameters with the entries of a JSON object
    pub fn with_parameters(mut self, parameters: Value) -> Self {
        if let Value::Object(map) = parameters {
            self.parameters = map;
        }
        self
    }

    /// Last segment of the node type ("n8n-nodes-base.gmail" -> "gmail")
    pub fn type_suffix(&self) -> &str {
        self.node_type.rsplit('.').next().unwrap_or(&self.node_type)
    }

    /// Whether this node is an entry point
    pub fn is_trigger(&self) -> bool {
        is_trigger_type(&self.node_type)
    }
}

/// Whether a node type names a trigger.
///
/// Both spellings are checked so that "Trigger" suffixes and lower-case
/// "trigger" identifiers are accepted alike.
pub fn is_trigger_type(node_type: &str) -> bool {
    node_type.contains("trigger") || node_type.contains("Trigger")
}

/// A single outgoing edge as stored on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Target node
    pub node: String,

    /// Channel identifier, conventionally "main"
    #[serde(rename = "type")]
    pub channel: String,

    /// Input slot on the target
    pub index: u32,
}

/// A flattened directed edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub channel: String,
    /// Output slot on the source
    pub output: usize,
    /// Input slot on the target
    pub index: u32,
}

/// Channel name -> output slots -> edges
pub type NodeConnections = BTreeMap<String, Vec<Vec<Connection>>>;

/// Connections keyed by source node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Connections(pub BTreeMap<String, NodeConnections>);

impl Connections {
    /// Add a "main" edge from output 0 of `source` to input 0 of `target`
    pub fn connect(&mut self, source: &str, target: &str) {
        let outputs = self
            .0
            .entry(source.to_string())
            .or_default()
            .entry(MAIN_CHANNEL.to_string())
            .or_default();
        if outputs.is_empty() {
            outputs.push(Vec::new());
        }
        outputs[0].push(Connection {
            node: target.to_string(),
            channel: MAIN_CHANNEL.to_string(),
            index: 0,
        });
    }

    /// Drop every edge from or to `endpoint`
    pub fn disconnect(&mut self, endpoint: &str) {
        self.0.remove(endpoint);
        for outputs in self.0.values_mut().flat_map(|channels| channels.values_mut()) {
            for targets in outputs.iter_mut() {
                targets.retain(|conn| conn.node != endpoint);
            }
        }
    }

    /// All edges, ordered by source, channel, output slot and insertion
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = Vec::new();
        for (source, channels) in &self.0 {
            for (channel, outputs) in channels {
                for (output, targets) in outputs.iter().enumerate() {
                    for conn in targets {
                        edges.push(Edge {
                            source: source.clone(),
                            target: conn.node.clone(),
                            channel: channel.clone(),
                            output,
                            index: conn.index,
                        });
                    }
                }
            }
        }
        edges
    }

    /// Number of edges
    pub fn len(&self) -> usize {
        self.edges().len()
    }

    /// Whether there are no edges
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn de_nodes<'de, D>(deserializer: D) -> Result<Vec<Node>, D::Error>
where
    D: Deserializer<'de>,
{
    // Entries that are not node objects are dropped; validation reports them
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect())
}

fn de_position<'de, D>(deserializer: D) -> Result<[f64; 2], D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let coords: Vec<f64> = value
        .as_ref()
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_f64).collect())
        .unwrap_or_default();
    Ok(match coords.as_slice() {
        [x, y, ..] => [*x, *y],
        _ => [0.0, 0.0],
    })
}

fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    // The platform has used both string and numeric IDs
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn de_tags<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tag {
        Name(String),
        Object { name: String },
    }

    let tags = Option::<Vec<Tag>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(tags
        .into_iter()
        .map(|tag| match tag {
            Tag::Name(name) | Tag::Object { name } => name,
        })
        .collect())
}
