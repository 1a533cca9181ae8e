//! Named custom extractors.
//!
//! These cover the extraction logic the declarative rule kinds cannot
//! express: text concatenation across several traced inputs and
//! variable-length LoRA stacks. Each is a named `fn` item so the registry
//! stays inspectable and the functions stay individually testable.

use super::CustomExtractor;
use crate::graph::GraphNode;
use crate::params::ParamValue;
use crate::traversal::{Resolver, TraversalState};
use itertools::Itertools;

/// SDXL dual-prompt encoders: the G and L text tracks are resolved
/// independently and joined, collapsing the common case where both carry
/// the same text.
pub const SDXL_TEXT: CustomExtractor = CustomExtractor {
    name: "sdxl_text",
    run: sdxl_text,
};

fn sdxl_text(
    resolver: &Resolver<'_>,
    node: &GraphNode,
    state: &mut TraversalState,
) -> Option<ParamValue> {
    let joined = ["text_g", "text_l"]
        .iter()
        .filter_map(|field| resolver.field_value(node, field, state))
        .filter_map(|value| value.as_text().map(|t| t.trim().to_string()))
        .filter(|t| !t.is_empty())
        .unique()
        .join("\n");
    if joined.is_empty() {
        None
    } else {
        Some(ParamValue::Text(joined))
    }
}

/// Combine/concat nodes: every conditioning input contributes prompt text,
/// joined in declared port order.
pub const JOINED_TEXT: CustomExtractor = CustomExtractor {
    name: "joined_text",
    run: joined_text,
};

fn joined_text(
    resolver: &Resolver<'_>,
    node: &GraphNode,
    state: &mut TraversalState,
) -> Option<ParamValue> {
    let def = resolver.definition(node)?;
    let joined = def
        .inputs
        .iter()
        .filter(|port| port.ty == super::PortType::Conditioning)
        .filter_map(|port| resolver.field_value(node, port.name, state))
        .filter_map(|value| value.as_text().map(|t| t.trim().to_string()))
        .filter(|t| !t.is_empty())
        .unique()
        .join(", ");
    if joined.is_empty() {
        None
    } else {
        Some(ParamValue::Text(joined))
    }
}

/// Fixed-width LoRA stack nodes: three (switch, name, model weight, clip
/// weight) groups, with an optional upstream stack chained on `lora_stack`.
pub const LORA_STACK: CustomExtractor = CustomExtractor {
    name: "lora_stack",
    run: lora_stack,
};

fn lora_stack(
    resolver: &Resolver<'_>,
    node: &GraphNode,
    state: &mut TraversalState,
) -> Option<ParamValue> {
    // The accumulator is appended downstream-first and reversed once the
    // search finishes, so slots are visited 3..1 and the chained upstream
    // stack last; application order (upstream stack, then slot 1..3) comes
    // out right after the reversal.
    for slot in (1..=3).rev() {
        let enabled = resolver
            .field_value(node, &format!("switch_{slot}"), state)
            .and_then(|v| v.as_text().map(|t| t.eq_ignore_ascii_case("on")))
            .unwrap_or(false);
        if !enabled {
            continue;
        }
        if let Some(name) = resolver
            .field_value(node, &format!("lora_name_{slot}"), state)
            .and_then(|v| v.as_text().map(str::to_string))
        {
            if name != "None" && !name.is_empty() {
                state.push_found(name);
            }
        }
    }
    resolver.trace_named(node, "lora_stack", state);
    None
}

/// Keyed LoRA loaders: each entry is a `lora_N` object carrying an `on`
/// flag and the lora name, serialized either as inputs or as widgets.
pub const KEYED_LORAS: CustomExtractor = CustomExtractor {
    name: "keyed_loras",
    run: keyed_loras,
};

fn keyed_loras(
    _resolver: &Resolver<'_>,
    node: &GraphNode,
    state: &mut TraversalState,
) -> Option<ParamValue> {
    let mut keys: Vec<&String> = node
        .inputs
        .keys()
        .filter(|key| key.starts_with("lora_"))
        .collect();
    keys.sort_by_key(|key| {
        key.rsplit('_')
            .next()
            .and_then(|n| n.parse::<u32>().ok())
            .unwrap_or(u32::MAX)
    });

    let entries = keys
        .into_iter()
        .filter_map(|key| node.input(key).and_then(|v| v.as_literal()))
        .chain(node.widgets.iter().filter(|w| w.is_object()));

    let names: Vec<String> = entries
        .filter(|entry| entry.get("on").and_then(|v| v.as_bool()).unwrap_or(false))
        .filter_map(|entry| entry.get("lora").and_then(|v| v.as_str()))
        .filter(|name| !name.is_empty() && *name != "None")
        .map(str::to_string)
        .collect();

    // Downstream-first append order, same as the stack extractor.
    for name in names.into_iter().rev() {
        state.push_found(name);
    }
    None
}
