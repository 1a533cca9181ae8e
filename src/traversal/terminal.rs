use crate::graph::{GraphNode, InputValue, WorkflowGraph};
use crate::registry::{PortType, Registry, TerminalKind};
use ahash::AHashSet;
use itertools::Itertools;
use tracing::debug;

/// Chooses the node traversal starts from: the node representing the final
/// produced image.
///
/// Priority: explicit save sink, then preview sink, then the sole sampling
/// node, then the sampling node whose output is not consumed as another
/// sampler's latent input (the last stage of a chained pipeline), then the
/// last sampling node in stable id order. Workflows routinely chain
/// base/refine/upscale stages; parameters must reflect the stage that
/// produced the saved pixels, not an intermediate draft.
pub fn select_terminal<'g>(graph: &'g WorkflowGraph, registry: &Registry) -> Option<&'g GraphNode> {
    let mut save: Option<&GraphNode> = None;
    let mut preview: Option<&GraphNode> = None;
    let mut samplers: Vec<&GraphNode> = Vec::new();

    for node in graph.iter_ordered() {
        if !node.mode.is_active() {
            continue;
        }
        let Some(def) = registry.get(&node.class_type) else {
            continue;
        };
        match def.terminal {
            Some(TerminalKind::Save) => save = save.or(Some(node)),
            Some(TerminalKind::Preview) => preview = preview.or(Some(node)),
            Some(TerminalKind::Sampler) => samplers.push(node),
            None => {}
        }
    }

    if let Some(node) = save.or(preview) {
        debug!(node = %node.id, class = %node.class_type, "terminal from sink node");
        return Some(node);
    }

    match samplers.iter().exactly_one() {
        Ok(only) => {
            debug!(node = %only.id, "terminal from sole sampling node");
            Some(*only)
        }
        Err(_) if samplers.is_empty() => None,
        Err(_) => Some(last_stage(&samplers, registry)),
    }
}

/// Among several sampling nodes, prefers one that no other sampler consumes
/// on a latent input. Tie-breaking is a heuristic over observed workflows,
/// not a format guarantee, so the stable-order fallback keeps it
/// reproducible.
fn last_stage<'g>(samplers: &[&'g GraphNode], registry: &Registry) -> &'g GraphNode {
    let mut consumed: AHashSet<&str> = AHashSet::new();
    for sampler in samplers {
        let Some(def) = registry.get(&sampler.class_type) else {
            continue;
        };
        for (name, value) in &sampler.inputs {
            let latent = def
                .port_type(name)
                .map(|ty| ty == PortType::Latent)
                .unwrap_or(false);
            if !latent {
                continue;
            }
            if let InputValue::Link(link) = value {
                consumed.insert(link.node.as_str());
            }
        }
    }

    samplers
        .iter()
        .rev()
        .find(|sampler| !consumed.contains(sampler.id.as_str()))
        .copied()
        .unwrap_or_else(|| {
            debug!("all sampling nodes consumed downstream, using last in id order");
            samplers[samplers.len() - 1]
        })
}
