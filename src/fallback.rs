//! The secondary, regex-based extractor over the companion parameter block.
//!
//! The block format is prompt text, an optional `Negative prompt:` section,
//! and a trailing `Key: value, Key: value` line. Graph traversal gaps
//! (unregistered node types, missing terminals) are tolerated by merging the
//! two result sets: per parameter, the graph result wins unless it is absent,
//! empty, or numeric zero.

use crate::params::GenerationParams;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;

static STEPS: Lazy<Regex> = Lazy::new(|| Regex::new(r"Steps:\s*(\d+)").expect("steps pattern"));
static SAMPLER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Sampler:\s*([^,\n]+)").expect("sampler pattern"));
static SCHEDULER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Schedule type:\s*([^,\n]+)").expect("scheduler pattern"));
static CFG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"CFG scale:\s*([\d.]+)").expect("cfg pattern"));
static SEED: Lazy<Regex> = Lazy::new(|| Regex::new(r"Seed:\s*(\d+)").expect("seed pattern"));
static SIZE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Size:\s*(\d+)\s*x\s*(\d+)").expect("size pattern"));
static MODEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Model:\s*([^,\n]+)").expect("model pattern"));
static VAE: Lazy<Regex> = Lazy::new(|| Regex::new(r"VAE:\s*([^,\n]+)").expect("vae pattern"));
static DENOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Denoising strength:\s*([\d.]+)").expect("denoise pattern"));
/// `<lora:name:weight>` tags embedded in prompt text.
static LORA_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<lora:([^:>]+)(?::[^>]*)?>").expect("lora tag pattern"));
/// Start of the key-value line, anchored to a line start so prompt text
/// mentioning "Steps:" mid-sentence does not truncate the prompt.
static PARAMS_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^Steps:\s*\d+").expect("params start pattern"));

/// Parameters recovered from the textual block. All optional: the merge step
/// decides what substitutes into the final record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FallbackParams {
    pub prompt: Option<String>,
    pub negative_prompt: Option<String>,
    pub seed: Option<i64>,
    pub steps: Option<u32>,
    pub cfg: Option<f64>,
    pub model: Option<String>,
    pub sampler_name: Option<String>,
    pub scheduler: Option<String>,
    pub loras: Vec<String>,
    pub vae: Option<String>,
    pub denoise: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Parses one parameter block.
pub fn parse_parameter_block(text: &str) -> FallbackParams {
    let mut params = FallbackParams::default();

    let (prompt_section, tail) = match text.split_once("Negative prompt:") {
        Some((head, tail)) => (head, Some(tail)),
        None => (text, None),
    };

    match tail {
        Some(tail) => {
            params.prompt = non_empty(prompt_section);
            params.negative_prompt = match PARAMS_START.find(tail) {
                Some(m) => non_empty(&tail[..m.start()]),
                None => non_empty(tail),
            };
        }
        None => {
            // No negative section: the key-value line may trail the prompt
            // text directly.
            params.prompt = match PARAMS_START.find(prompt_section) {
                Some(m) => non_empty(&prompt_section[..m.start()]),
                None => non_empty(prompt_section),
            };
        }
    }

    params.steps = capture(&STEPS, text).and_then(|s| s.parse().ok());
    params.sampler_name = capture(&SAMPLER, text);
    params.scheduler = capture(&SCHEDULER, text);
    params.cfg = capture(&CFG, text).and_then(|s| s.parse().ok());
    params.seed = capture(&SEED, text).and_then(|s| s.parse().ok());
    params.model = capture(&MODEL, text);
    params.vae = capture(&VAE, text);
    params.denoise = capture(&DENOISE, text).and_then(|s| s.parse().ok());
    if let Some(caps) = SIZE.captures(text) {
        params.width = caps[1].parse().ok();
        params.height = caps[2].parse().ok();
    }
    params.loras = LORA_TAG
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .unique()
        .collect();

    params
}

/// Merges fallback results into a graph-derived record. The graph value wins
/// unless it is the per-type "nothing resolved" default.
pub fn merge_fallback(record: &mut GenerationParams, fallback: &FallbackParams) {
    if record.prompt.is_empty() {
        if let Some(prompt) = &fallback.prompt {
            record.prompt = prompt.clone();
        }
    }
    if record.negative_prompt.is_empty() {
        if let Some(negative) = &fallback.negative_prompt {
            record.negative_prompt = negative.clone();
        }
    }
    if record.seed == 0 {
        if let Some(seed) = fallback.seed {
            record.seed = seed;
        }
    }
    if record.steps == 0 {
        if let Some(steps) = fallback.steps {
            record.steps = steps;
        }
    }
    if record.cfg == 0.0 {
        if let Some(cfg) = fallback.cfg {
            record.cfg = cfg;
        }
    }
    if record.model_is_unset() {
        if let Some(model) = &fallback.model {
            record.model = model.clone();
        }
    }
    if record.sampler_name.is_empty() {
        if let Some(sampler) = &fallback.sampler_name {
            record.sampler_name = sampler.clone();
        }
    }
    if record.scheduler.is_empty() {
        if let Some(scheduler) = &fallback.scheduler {
            record.scheduler = scheduler.clone();
        }
    }
    if record.loras.is_empty() && !fallback.loras.is_empty() {
        record.loras = fallback.loras.clone();
    }
    if record.vae.is_empty() {
        if let Some(vae) = &fallback.vae {
            record.vae = vae.clone();
        }
    }
    if record.denoise == 0.0 {
        if let Some(denoise) = fallback.denoise {
            record.denoise = denoise;
        }
    }
    if record.width == 0 {
        if let Some(width) = fallback.width {
            record.width = width;
        }
    }
    if record.height == 0 {
        if let Some(height) = fallback.height {
            record.height = height;
        }
    }
}

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|s| !s.is_empty())
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
