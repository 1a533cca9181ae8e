//! The end-to-end extraction pipeline: build the graph, pick the terminal,
//! resolve every logical parameter, then merge the string-fallback results.

use crate::error::ExtractError;
use crate::fallback::{merge_fallback, parse_parameter_block};
use crate::graph::GraphBuilder;
use crate::params::{GenerationParams, LogicalParam, ParamValue};
use crate::registry::Registry;
use crate::traversal::{Resolver, select_terminal};
use tracing::{debug, warn};

/// The raw metadata an image-metadata chunk reader hands over. This engine
/// never touches image bytes; an external dispatcher decides whether these
/// payloads belong to it at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataPayload<'a> {
    /// UI-authored node data ("workflow").
    pub workflow_json: Option<&'a str>,
    /// Execution-time node data ("prompt").
    pub prompt_json: Option<&'a str>,
    /// Companion human-readable parameter block, when present.
    pub parameter_block: Option<&'a str>,
}

/// Resolves generation parameters from node-graph metadata payloads.
///
/// The extractor owns only the read-only node registry; every extraction
/// builds its own graph and traversal state, so one extractor may serve
/// parallel callers freely.
#[derive(Debug, Clone, Default)]
pub struct MetadataExtractor {
    registry: Registry,
}

impl MetadataExtractor {
    pub fn new() -> Self {
        Self {
            registry: Registry::builtin(),
        }
    }

    pub fn with_registry(registry: Registry) -> Self {
        Self { registry }
    }

    /// Extracts a fully-defaulted parameter record from one metadata
    /// payload.
    ///
    /// Data-quality problems degrade to absent fields; the only error is a
    /// payload carrying no graph structure at all.
    pub fn extract(&self, payload: &MetadataPayload<'_>) -> Result<GenerationParams, ExtractError> {
        if payload.workflow_json.is_none() && payload.prompt_json.is_none() {
            return Err(ExtractError::EmptyPayload);
        }

        let graph = GraphBuilder::build(payload.workflow_json, payload.prompt_json);

        let mut record = GenerationParams::default();
        let mut terminal_found = false;

        if let Some(terminal) = select_terminal(&graph, &self.registry) {
            terminal_found = true;
            debug!(
                terminal = %terminal.id,
                class = %terminal.class_type,
                "resolving parameters from terminal node"
            );
            let resolver = Resolver::new(&graph, &self.registry);
            let resolved = resolver.resolve_all(&terminal.id, &LogicalParam::ALL);
            apply_resolved(&mut record, resolved);
        } else {
            warn!(
                nodes = graph.len(),
                "no terminal node found, relying on string fallback"
            );
        }

        if let Some(block) = payload.parameter_block {
            merge_fallback(&mut record, &parse_parameter_block(block));
        } else if !terminal_found {
            // With no anchor and no companion block, the serialized graph
            // itself is scanned as unstructured text. Only keyed values may
            // substitute; the blob as a whole is not a prompt.
            if let Some(raw) = payload.prompt_json.or(payload.workflow_json) {
                let mut scavenged = parse_parameter_block(raw);
                scavenged.prompt = None;
                scavenged.negative_prompt = None;
                merge_fallback(&mut record, &scavenged);
            }
        }

        Ok(record)
    }
}

fn apply_resolved(
    record: &mut GenerationParams,
    resolved: Vec<(LogicalParam, Option<ParamValue>)>,
) {
    for (param, value) in resolved {
        let Some(value) = value else { continue };
        match param {
            LogicalParam::Prompt => record.prompt = text_of(&value),
            LogicalParam::NegativePrompt => record.negative_prompt = text_of(&value),
            LogicalParam::Seed => {
                record.seed = value.as_number().map(|n| n as i64).unwrap_or_default();
            }
            LogicalParam::Steps => {
                record.steps = value.as_number().map(|n| n as u32).unwrap_or_default();
            }
            LogicalParam::Cfg => record.cfg = value.as_number().unwrap_or_default(),
            LogicalParam::SamplerName => record.sampler_name = text_of(&value),
            LogicalParam::Scheduler => record.scheduler = text_of(&value),
            LogicalParam::Lora => {
                if let ParamValue::List(items) = value {
                    record.loras = items;
                }
            }
            LogicalParam::Vae => record.vae = text_of(&value),
            LogicalParam::Denoise => record.denoise = value.as_number().unwrap_or_default(),
            LogicalParam::Model => {
                let model = text_of(&value);
                if !model.is_empty() {
                    record.model = model;
                }
            }
            LogicalParam::Width => {
                record.width = value.as_number().map(|n| n as u32).unwrap_or_default();
            }
            LogicalParam::Height => {
                record.height = value.as_number().map(|n| n as u32).unwrap_or_default();
            }
        }
    }
}

fn text_of(value: &ParamValue) -> String {
    match value {
        ParamValue::Text(text) => text.clone(),
        ParamValue::Number(n) => {
            if n.fract() == 0.0 {
                format!("{}", *n as i64)
            } else {
                n.to_string()
            }
        }
        ParamValue::List(items) => items.join(", "),
    }
}
