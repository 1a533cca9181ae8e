use crate::registry::PortType;
use serde::{Deserialize, Serialize};

/// A generator-agnostic output field the engine knows how to resolve,
/// independent of which node type ultimately supplies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalParam {
    Prompt,
    NegativePrompt,
    Seed,
    Steps,
    Cfg,
    SamplerName,
    Scheduler,
    Lora,
    Vae,
    Denoise,
    Model,
    Width,
    Height,
}

impl LogicalParam {
    /// Every parameter the engine resolves, in output-record order.
    pub const ALL: [LogicalParam; 13] = [
        LogicalParam::Prompt,
        LogicalParam::NegativePrompt,
        LogicalParam::Seed,
        LogicalParam::Steps,
        LogicalParam::Cfg,
        LogicalParam::SamplerName,
        LogicalParam::Scheduler,
        LogicalParam::Lora,
        LogicalParam::Vae,
        LogicalParam::Denoise,
        LogicalParam::Model,
        LogicalParam::Width,
        LogicalParam::Height,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            LogicalParam::Prompt => "prompt",
            LogicalParam::NegativePrompt => "negativePrompt",
            LogicalParam::Seed => "seed",
            LogicalParam::Steps => "steps",
            LogicalParam::Cfg => "cfg",
            LogicalParam::SamplerName => "sampler_name",
            LogicalParam::Scheduler => "scheduler",
            LogicalParam::Lora => "lora",
            LogicalParam::Vae => "vae",
            LogicalParam::Denoise => "denoise",
            LogicalParam::Model => "model",
            LogicalParam::Width => "width",
            LogicalParam::Height => "height",
        }
    }

    /// The port type a backward search for this parameter expects to travel
    /// along. Used to pick between the inputs of a multi-input transform node.
    pub fn expected_port(&self) -> PortType {
        match self {
            LogicalParam::Prompt | LogicalParam::NegativePrompt => PortType::Conditioning,
            LogicalParam::Model | LogicalParam::Lora => PortType::Model,
            LogicalParam::Vae => PortType::Vae,
            LogicalParam::Width | LogicalParam::Height => PortType::Latent,
            // Sampler configuration lives on the latent/image chain between
            // the terminal sink and the sampling stage.
            LogicalParam::Seed
            | LogicalParam::Steps
            | LogicalParam::Cfg
            | LogicalParam::SamplerName
            | LogicalParam::Scheduler
            | LogicalParam::Denoise => PortType::Latent,
        }
    }

    /// Multi-valued parameters accumulate across every contributing node on
    /// the chain instead of stopping at the first hit.
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, LogicalParam::Lora)
    }
}

impl std::fmt::Display for LogicalParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A value produced by one resolution path.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Number(f64),
    List(Vec<String>),
}

impl ParamValue {
    /// Converts an untrusted JSON literal into a resolvable value.
    /// Booleans, objects and arrays do not carry parameter data.
    pub fn from_json(value: &serde_json::Value) -> Option<ParamValue> {
        match value {
            serde_json::Value::String(s) => Some(ParamValue::Text(s.clone())),
            serde_json::Value::Number(n) => n.as_f64().map(ParamValue::Number),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            // Widget arrays routinely store numbers as strings.
            ParamValue::Text(s) => s.trim().parse().ok(),
            ParamValue::List(_) => None,
        }
    }
}

/// The flat record handed to downstream consumers. Every field is always
/// present with an explicit per-type default; `None` never escapes the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub prompt: String,
    #[serde(rename = "negativePrompt")]
    pub negative_prompt: String,
    pub seed: i64,
    pub steps: u32,
    pub cfg: f64,
    pub model: String,
    pub sampler_name: String,
    pub scheduler: String,
    #[serde(rename = "lora")]
    pub loras: Vec<String>,
    pub vae: String,
    pub denoise: f64,
    pub width: u32,
    pub height: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            negative_prompt: String::new(),
            seed: 0,
            steps: 0,
            cfg: 0.0,
            model: "Unknown".to_string(),
            sampler_name: String::new(),
            scheduler: String::new(),
            loras: Vec::new(),
            vae: String::new(),
            denoise: 0.0,
            width: 0,
            height: 0,
        }
    }
}

impl GenerationParams {
    /// True when the model field still carries its "nothing resolved"
    /// sentinel, which is the condition under which a fallback value may
    /// substitute.
    pub(crate) fn model_is_unset(&self) -> bool {
        self.model.is_empty() || self.model == "Unknown"
    }
}
