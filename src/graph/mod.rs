//! The canonical in-memory graph the traversal engine walks.
//!
//! Nodes live in an id-indexed arena; links are plain (id, slot) pairs, so
//! cyclic and shared references need no object graph. The arena is built once
//! per metadata payload, is immutable during resolution, and is discarded
//! after the flat parameter record is produced.

mod builder;

pub use builder::GraphBuilder;

use ahash::AHashMap;

/// Node identifier, unique within one graph. The execution payload keys nodes
/// by decimal strings while the UI payload uses numbers; both normalize to
/// the string form.
pub type NodeId = String;

/// A directed reference from a consumer's input to a producer's output slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    pub node: NodeId,
    pub slot: u32,
}

/// An input is either a literal baked into the serialization or a link to an
/// upstream producer.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Literal(serde_json::Value),
    Link(Link),
}

impl InputValue {
    pub fn as_link(&self) -> Option<&Link> {
        match self {
            InputValue::Link(link) => Some(link),
            InputValue::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&serde_json::Value> {
        match self {
            InputValue::Literal(value) => Some(value),
            InputValue::Link(_) => None,
        }
    }
}

/// Execution mode flags carried by the UI payload. Anything other than
/// active is a dead end for traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeMode {
    #[default]
    Active,
    Muted,
    Bypassed,
}

impl NodeMode {
    /// Mode flags as serialized by the workflow format: 2 mutes, 4 bypasses,
    /// everything else runs.
    pub fn from_flag(flag: i64) -> NodeMode {
        match flag {
            2 => NodeMode::Muted,
            4 => NodeMode::Bypassed,
            _ => NodeMode::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, NodeMode::Active)
    }
}

/// One merged node record: execution data supplies type and connectivity,
/// UI data supplies the widget array and mode.
#[derive(Debug, Clone, Default)]
pub struct GraphNode {
    pub id: NodeId,
    pub class_type: String,
    pub inputs: AHashMap<String, InputValue>,
    pub widgets: Vec<serde_json::Value>,
    pub mode: NodeMode,
    pub title: Option<String>,
}

impl GraphNode {
    /// Looks up an input by name; absent inputs are ordinary dead ends.
    pub fn input(&self, name: &str) -> Option<&InputValue> {
        self.inputs.get(name)
    }

    pub fn widget(&self, index: usize) -> Option<&serde_json::Value> {
        self.widgets.get(index)
    }
}

/// The id-indexed node arena.
#[derive(Debug, Clone, Default)]
pub struct WorkflowGraph {
    nodes: AHashMap<NodeId, GraphNode>,
}

impl WorkflowGraph {
    pub(crate) fn new(nodes: AHashMap<NodeId, GraphNode>) -> Self {
        Self { nodes }
    }

    pub fn get(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates nodes in numeric-then-lexicographic id order so that every
    /// scan over the graph is deterministic.
    pub fn iter_ordered(&self) -> impl Iterator<Item = &GraphNode> {
        let mut ids: Vec<&NodeId> = self.nodes.keys().collect();
        ids.sort_by(|a, b| match (a.parse::<u64>(), b.parse::<u64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => a.cmp(b),
        });
        ids.into_iter().map(|id| &self.nodes[id])
    }
}
