use super::{GraphNode, InputValue, Link, NodeId, NodeMode, WorkflowGraph};
use ahash::AHashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

/// One node as serialized by the UI payload.
#[derive(Debug, Deserialize)]
struct UiNode {
    id: serde_json::Value,
    #[serde(rename = "type")]
    node_type: Option<String>,
    #[serde(default)]
    widgets_values: Option<serde_json::Value>,
    #[serde(default)]
    mode: Option<i64>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    inputs: Option<Vec<UiInputSlot>>,
}

/// Named input slot on a UI node, referencing an entry in the link table.
#[derive(Debug, Deserialize)]
struct UiInputSlot {
    name: String,
    #[serde(default)]
    link: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct UiWorkflow {
    #[serde(default)]
    nodes: Vec<UiNode>,
    /// Link table rows: `[link_id, src_node, src_slot, dst_node, dst_slot, type]`.
    #[serde(default)]
    links: Vec<serde_json::Value>,
}

/// One node as serialized by the execution payload.
#[derive(Debug, Deserialize)]
struct PromptNode {
    #[serde(default)]
    class_type: Option<String>,
    #[serde(default)]
    inputs: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, rename = "_meta")]
    meta: Option<PromptMeta>,
}

#[derive(Debug, Deserialize)]
struct PromptMeta {
    #[serde(default)]
    title: Option<String>,
}

/// Bare `NaN` / `Infinity` tokens in value position, as emitted by some
/// workflow serializers. Rewritten to `null` before the parse retry.
static BAD_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([:,\[]\s*)(?:NaN|-?Infinity)").expect("bad-token pattern"));

/// Merges the optional UI ("workflow") and execution ("prompt") payloads into
/// one canonical [`WorkflowGraph`].
///
/// Execution data is authoritative for node type and connectivity; UI data
/// supplies widget arrays, mode flags, and titles. A node present in only one
/// source is synthesized with defaults from the other. Persistent parse
/// failures yield an empty graph, never an error.
pub struct GraphBuilder;

impl GraphBuilder {
    pub fn build(workflow_json: Option<&str>, prompt_json: Option<&str>) -> WorkflowGraph {
        let prompt: Option<AHashMap<String, PromptNode>> =
            prompt_json.and_then(|text| parse_lenient(text, "prompt"));
        let workflow: Option<UiWorkflow> =
            workflow_json.and_then(|text| parse_lenient(text, "workflow"));

        let mut nodes: AHashMap<NodeId, GraphNode> = AHashMap::new();

        if let Some(prompt) = prompt {
            for (id, entry) in prompt {
                let inputs = entry
                    .inputs
                    .map(|map| {
                        map.into_iter()
                            .map(|(name, value)| (name, classify_input(value)))
                            .collect()
                    })
                    .unwrap_or_default();
                nodes.insert(
                    id.clone(),
                    GraphNode {
                        id: id.clone(),
                        class_type: entry.class_type.unwrap_or_default(),
                        inputs,
                        widgets: Vec::new(),
                        mode: NodeMode::Active,
                        title: entry.meta.and_then(|m| m.title),
                    },
                );
            }
        }

        if let Some(workflow) = workflow {
            overlay_workflow(&mut nodes, workflow);
        }

        debug!(nodes = nodes.len(), "workflow graph built");
        WorkflowGraph::new(nodes)
    }
}

/// Parses one payload, retrying once after sentinel-token sanitization.
fn parse_lenient<T: serde::de::DeserializeOwned>(text: &str, which: &str) -> Option<T> {
    match serde_json::from_str(text) {
        Ok(parsed) => Some(parsed),
        Err(first) => {
            let sanitized = BAD_TOKEN.replace_all(text, "${1}null");
            match serde_json::from_str(&sanitized) {
                Ok(parsed) => {
                    debug!(payload = which, "payload parsed after token sanitization");
                    Some(parsed)
                }
                Err(_) => {
                    warn!(payload = which, error = %first, "unparseable payload, proceeding with empty graph");
                    None
                }
            }
        }
    }
}

/// An execution-payload input is a link when serialized as `[node_id, slot]`.
fn classify_input(value: serde_json::Value) -> InputValue {
    if let serde_json::Value::Array(items) = &value {
        if items.len() == 2 {
            let node = match &items[0] {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) => n.as_u64().map(|n| n.to_string()),
                _ => None,
            };
            let slot = items[1].as_u64().map(|s| s as u32);
            if let (Some(node), Some(slot)) = (node, slot) {
                return InputValue::Link(Link { node, slot });
            }
        }
    }
    InputValue::Literal(value)
}

fn overlay_workflow(nodes: &mut AHashMap<NodeId, GraphNode>, workflow: UiWorkflow) {
    // Link table: link_id -> (source node, source slot).
    let mut link_table: AHashMap<i64, Link> = AHashMap::new();
    for row in &workflow.links {
        if let Some(items) = row.as_array() {
            if items.len() >= 3 {
                if let (Some(link_id), Some(src), Some(slot)) =
                    (items[0].as_i64(), items[1].as_u64(), items[2].as_u64())
                {
                    link_table.insert(
                        link_id,
                        Link {
                            node: src.to_string(),
                            slot: slot as u32,
                        },
                    );
                }
            }
        }
    }

    for ui_node in workflow.nodes {
        let id = match normalize_id(&ui_node.id) {
            Some(id) => id,
            None => continue,
        };

        let node = nodes.entry(id.clone()).or_insert_with(|| GraphNode {
            id: id.clone(),
            class_type: ui_node.node_type.clone().unwrap_or_default(),
            ..GraphNode::default()
        });

        node.widgets = widget_array(ui_node.widgets_values);
        node.mode = NodeMode::from_flag(ui_node.mode.unwrap_or(0));
        if node.title.is_none() {
            node.title = ui_node.title;
        }
        if node.class_type.is_empty() {
            node.class_type = ui_node.node_type.unwrap_or_default();
        }

        // Connectivity recovery for nodes the execution payload did not
        // cover. Execution inputs stay authoritative when present.
        if let Some(slots) = ui_node.inputs {
            for slot in slots {
                if node.inputs.contains_key(&slot.name) {
                    continue;
                }
                if let Some(link) = slot.link.and_then(|id| link_table.get(&id)) {
                    node.inputs
                        .insert(slot.name, InputValue::Link(link.clone()));
                }
            }
        }
    }
}

fn normalize_id(raw: &serde_json::Value) -> Option<NodeId> {
    match raw {
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Widget values usually serialize as a flat array; a handful of custom nodes
/// emit an index-keyed object instead.
fn widget_array(raw: Option<serde_json::Value>) -> Vec<serde_json::Value> {
    match raw {
        Some(serde_json::Value::Array(items)) => items,
        Some(serde_json::Value::Object(map)) => {
            let mut entries: Vec<(usize, serde_json::Value)> = map
                .into_iter()
                .filter_map(|(key, value)| key.parse().ok().map(|idx| (idx, value)))
                .collect();
            entries.sort_by_key(|(idx, _)| *idx);
            entries.into_iter().map(|(_, value)| value).collect()
        }
        _ => Vec::new(),
    }
}
