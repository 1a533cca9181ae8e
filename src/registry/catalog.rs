//! The built-in node catalog.
//!
//! Entries are pure data. The widget orderings mirror the real serialization
//! order of each node type, including unlabeled placeholder slots such as
//! `control_after_generate`; dropping one would shift every later field.

use super::extractors;
use super::{NodeDefinition, ParamRule, PortDef, PortType, Role, RoutingRule, TerminalKind};
use crate::params::LogicalParam as P;
use ParamRule::{Custom, Input, Trace, Widget};
use PortType as T;
use Role::{PassThrough, Routing, Sink, Source, Transform};

const fn port(name: &'static str, ty: PortType) -> PortDef {
    PortDef { name, ty }
}

const BASE: NodeDefinition = NodeDefinition {
    class_type: "",
    category: "",
    roles: &[],
    inputs: &[],
    widget_order: &[],
    params: &[],
    pass_through: &[],
    routing: None,
    terminal: None,
};

pub(super) static CATALOG: &[NodeDefinition] = &[
    // ── Sampling ─────────────────────────────────────────────────────────
    NodeDefinition {
        class_type: "KSampler",
        category: "sampling",
        roles: &[Transform, Sink],
        inputs: &[
            port("model", T::Model),
            port("positive", T::Conditioning),
            port("negative", T::Conditioning),
            port("latent_image", T::Latent),
        ],
        widget_order: &[
            "seed",
            "control_after_generate",
            "steps",
            "cfg",
            "sampler_name",
            "scheduler",
            "denoise",
        ],
        params: &[
            (P::Prompt, Trace("positive")),
            (P::NegativePrompt, Trace("negative")),
            (P::Seed, Widget("seed")),
            (P::Steps, Widget("steps")),
            (P::Cfg, Widget("cfg")),
            (P::SamplerName, Widget("sampler_name")),
            (P::Scheduler, Widget("scheduler")),
            (P::Denoise, Widget("denoise")),
            (P::Model, Trace("model")),
            (P::Lora, Trace("model")),
            (P::Width, Trace("latent_image")),
            (P::Height, Trace("latent_image")),
        ],
        terminal: Some(TerminalKind::Sampler),
        ..BASE
    },
    NodeDefinition {
        class_type: "KSamplerAdvanced",
        category: "sampling",
        roles: &[Transform, Sink],
        inputs: &[
            port("model", T::Model),
            port("positive", T::Conditioning),
            port("negative", T::Conditioning),
            port("latent_image", T::Latent),
        ],
        widget_order: &[
            "add_noise",
            "noise_seed",
            "control_after_generate",
            "steps",
            "cfg",
            "sampler_name",
            "scheduler",
            "start_at_step",
            "end_at_step",
            "return_with_leftover_noise",
        ],
        params: &[
            (P::Prompt, Trace("positive")),
            (P::NegativePrompt, Trace("negative")),
            (P::Seed, Widget("noise_seed")),
            (P::Steps, Widget("steps")),
            (P::Cfg, Widget("cfg")),
            (P::SamplerName, Widget("sampler_name")),
            (P::Scheduler, Widget("scheduler")),
            (P::Model, Trace("model")),
            (P::Lora, Trace("model")),
            (P::Width, Trace("latent_image")),
            (P::Height, Trace("latent_image")),
        ],
        terminal: Some(TerminalKind::Sampler),
        ..BASE
    },
    NodeDefinition {
        class_type: "SamplerCustomAdvanced",
        category: "sampling",
        roles: &[Transform, Sink],
        inputs: &[
            port("noise", T::Any),
            port("guider", T::Any),
            port("sampler", T::Any),
            port("sigmas", T::Any),
            port("latent_image", T::Latent),
        ],
        params: &[
            (P::Prompt, Trace("guider")),
            (P::Cfg, Trace("guider")),
            (P::Model, Trace("guider")),
            (P::Lora, Trace("guider")),
            (P::Seed, Trace("noise")),
            (P::SamplerName, Trace("sampler")),
            (P::Steps, Trace("sigmas")),
            (P::Scheduler, Trace("sigmas")),
            (P::Denoise, Trace("sigmas")),
            (P::Width, Trace("latent_image")),
            (P::Height, Trace("latent_image")),
        ],
        terminal: Some(TerminalKind::Sampler),
        ..BASE
    },
    NodeDefinition {
        class_type: "RandomNoise",
        category: "sampling",
        roles: &[Source],
        widget_order: &["noise_seed", "control_after_generate"],
        params: &[(P::Seed, Widget("noise_seed"))],
        ..BASE
    },
    NodeDefinition {
        class_type: "KSamplerSelect",
        category: "sampling",
        roles: &[Source],
        widget_order: &["sampler_name"],
        params: &[(P::SamplerName, Widget("sampler_name"))],
        ..BASE
    },
    NodeDefinition {
        class_type: "BasicScheduler",
        category: "sampling",
        roles: &[Source, Transform],
        inputs: &[port("model", T::Model)],
        widget_order: &["scheduler", "steps", "denoise"],
        params: &[
            (P::Scheduler, Widget("scheduler")),
            (P::Steps, Widget("steps")),
            (P::Denoise, Widget("denoise")),
        ],
        ..BASE
    },
    NodeDefinition {
        class_type: "BasicGuider",
        category: "sampling",
        roles: &[Transform],
        inputs: &[port("model", T::Model), port("conditioning", T::Conditioning)],
        params: &[
            (P::Prompt, Trace("conditioning")),
            (P::Cfg, Trace("conditioning")),
            (P::Model, Trace("model")),
            (P::Lora, Trace("model")),
        ],
        ..BASE
    },
    NodeDefinition {
        class_type: "UltimateSDUpscale",
        category: "upscaling",
        roles: &[Transform, Sink],
        inputs: &[
            port("image", T::Image),
            port("model", T::Model),
            port("positive", T::Conditioning),
            port("negative", T::Conditioning),
            port("vae", T::Vae),
            port("upscale_model", T::Any),
        ],
        widget_order: &[
            "upscale_by",
            "seed",
            "control_after_generate",
            "steps",
            "cfg",
            "sampler_name",
            "scheduler",
            "denoise",
        ],
        params: &[
            (P::Prompt, Trace("positive")),
            (P::NegativePrompt, Trace("negative")),
            (P::Seed, Widget("seed")),
            (P::Steps, Widget("steps")),
            (P::Cfg, Widget("cfg")),
            (P::SamplerName, Widget("sampler_name")),
            (P::Scheduler, Widget("scheduler")),
            (P::Denoise, Widget("denoise")),
            (P::Model, Trace("model")),
            (P::Lora, Trace("model")),
            (P::Vae, Trace("vae")),
        ],
        pass_through: &["image"],
        terminal: Some(TerminalKind::Sampler),
        ..BASE
    },
    // ── Conditioning ─────────────────────────────────────────────────────
    NodeDefinition {
        class_type: "CLIPTextEncode",
        category: "conditioning",
        roles: &[Source, Transform],
        inputs: &[port("clip", T::Clip), port("text", T::Text)],
        widget_order: &["text"],
        params: &[
            (P::Prompt, Widget("text")),
            (P::NegativePrompt, Widget("text")),
        ],
        ..BASE
    },
    NodeDefinition {
        class_type: "CLIPTextEncodeSDXL",
        category: "conditioning",
        roles: &[Source, Transform],
        inputs: &[port("clip", T::Clip)],
        widget_order: &[
            "width",
            "height",
            "crop_w",
            "crop_h",
            "target_width",
            "target_height",
            "text_g",
            "text_l",
        ],
        params: &[
            (P::Prompt, Custom(extractors::SDXL_TEXT)),
            (P::NegativePrompt, Custom(extractors::SDXL_TEXT)),
        ],
        ..BASE
    },
    NodeDefinition {
        class_type: "CLIPTextEncodeSDXLRefiner",
        category: "conditioning",
        roles: &[Source, Transform],
        inputs: &[port("clip", T::Clip)],
        widget_order: &["ascore", "width", "height", "text"],
        params: &[
            (P::Prompt, Widget("text")),
            (P::NegativePrompt, Widget("text")),
        ],
        ..BASE
    },
    NodeDefinition {
        class_type: "ConditioningCombine",
        category: "conditioning",
        roles: &[Transform],
        inputs: &[
            port("conditioning_1", T::Conditioning),
            port("conditioning_2", T::Conditioning),
        ],
        params: &[
            (P::Prompt, Custom(extractors::JOINED_TEXT)),
            (P::NegativePrompt, Custom(extractors::JOINED_TEXT)),
        ],
        ..BASE
    },
    NodeDefinition {
        class_type: "ConditioningConcat",
        category: "conditioning",
        roles: &[Transform],
        inputs: &[
            port("conditioning_to", T::Conditioning),
            port("conditioning_from", T::Conditioning),
        ],
        params: &[
            (P::Prompt, Custom(extractors::JOINED_TEXT)),
            (P::NegativePrompt, Custom(extractors::JOINED_TEXT)),
        ],
        ..BASE
    },
    NodeDefinition {
        class_type: "ConditioningSetArea",
        category: "conditioning",
        roles: &[PassThrough],
        inputs: &[port("conditioning", T::Conditioning)],
        pass_through: &["conditioning"],
        ..BASE
    },
    NodeDefinition {
        class_type: "FluxGuidance",
        category: "conditioning",
        roles: &[Transform, PassThrough],
        inputs: &[port("conditioning", T::Conditioning)],
        widget_order: &["guidance"],
        params: &[(P::Cfg, Widget("guidance"))],
        pass_through: &["conditioning"],
        ..BASE
    },
    NodeDefinition {
        class_type: "ControlNetApply",
        category: "conditioning",
        roles: &[PassThrough],
        inputs: &[
            port("conditioning", T::Conditioning),
            port("control_net", T::Any),
            port("image", T::Image),
        ],
        pass_through: &["conditioning"],
        ..BASE
    },
    NodeDefinition {
        class_type: "ControlNetApplyAdvanced",
        category: "conditioning",
        roles: &[Transform],
        inputs: &[
            port("positive", T::Conditioning),
            port("negative", T::Conditioning),
            port("control_net", T::Any),
            port("image", T::Image),
        ],
        params: &[
            (P::Prompt, Trace("positive")),
            (P::NegativePrompt, Trace("negative")),
        ],
        ..BASE
    },
    // ── Loaders ──────────────────────────────────────────────────────────
    NodeDefinition {
        class_type: "CheckpointLoaderSimple",
        category: "loaders",
        roles: &[Source],
        widget_order: &["ckpt_name"],
        params: &[(P::Model, Widget("ckpt_name"))],
        ..BASE
    },
    NodeDefinition {
        class_type: "CheckpointLoader",
        category: "loaders",
        roles: &[Source],
        widget_order: &["config_name", "ckpt_name"],
        params: &[(P::Model, Widget("ckpt_name"))],
        ..BASE
    },
    NodeDefinition {
        class_type: "UNETLoader",
        category: "loaders",
        roles: &[Source],
        widget_order: &["unet_name", "weight_dtype"],
        params: &[(P::Model, Widget("unet_name"))],
        ..BASE
    },
    NodeDefinition {
        class_type: "UnetLoaderGGUF",
        category: "loaders",
        roles: &[Source],
        widget_order: &["unet_name"],
        params: &[(P::Model, Widget("unet_name"))],
        ..BASE
    },
    NodeDefinition {
        class_type: "VAELoader",
        category: "loaders",
        roles: &[Source],
        widget_order: &["vae_name"],
        params: &[(P::Vae, Widget("vae_name"))],
        ..BASE
    },
    NodeDefinition {
        class_type: "LoraLoader",
        category: "loaders",
        roles: &[Transform, PassThrough],
        inputs: &[port("model", T::Model), port("clip", T::Clip)],
        widget_order: &["lora_name", "strength_model", "strength_clip"],
        params: &[(P::Lora, Widget("lora_name")), (P::Model, Trace("model"))],
        pass_through: &["model", "clip"],
        ..BASE
    },
    NodeDefinition {
        class_type: "LoraLoaderModelOnly",
        category: "loaders",
        roles: &[Transform, PassThrough],
        inputs: &[port("model", T::Model)],
        widget_order: &["lora_name", "strength_model"],
        params: &[(P::Lora, Widget("lora_name")), (P::Model, Trace("model"))],
        pass_through: &["model"],
        ..BASE
    },
    NodeDefinition {
        class_type: "CR LoRA Stack",
        category: "loaders",
        roles: &[Source, Transform],
        inputs: &[port("lora_stack", T::Any)],
        widget_order: &[
            "switch_1",
            "lora_name_1",
            "model_weight_1",
            "clip_weight_1",
            "switch_2",
            "lora_name_2",
            "model_weight_2",
            "clip_weight_2",
            "switch_3",
            "lora_name_3",
            "model_weight_3",
            "clip_weight_3",
        ],
        params: &[(P::Lora, Custom(extractors::LORA_STACK))],
        ..BASE
    },
    NodeDefinition {
        class_type: "CR Apply LoRA Stack",
        category: "loaders",
        roles: &[Transform, PassThrough],
        inputs: &[
            port("model", T::Model),
            port("clip", T::Clip),
            port("lora_stack", T::Any),
        ],
        params: &[(P::Lora, Trace("lora_stack")), (P::Model, Trace("model"))],
        pass_through: &["model", "clip"],
        ..BASE
    },
    NodeDefinition {
        class_type: "Power Lora Loader (rgthree)",
        category: "loaders",
        roles: &[Transform, PassThrough],
        inputs: &[port("model", T::Model), port("clip", T::Clip)],
        params: &[(P::Lora, Custom(extractors::KEYED_LORAS))],
        pass_through: &["model", "clip"],
        ..BASE
    },
    // Clip loaders carry no resolvable parameter but are registered so
    // searches crossing them stay quiet dead ends.
    NodeDefinition {
        class_type: "CLIPLoader",
        category: "loaders",
        roles: &[Source],
        widget_order: &["clip_name", "type"],
        ..BASE
    },
    NodeDefinition {
        class_type: "DualCLIPLoader",
        category: "loaders",
        roles: &[Source],
        widget_order: &["clip_name1", "clip_name2", "type"],
        ..BASE
    },
    NodeDefinition {
        class_type: "CLIPSetLastLayer",
        category: "loaders",
        roles: &[PassThrough],
        inputs: &[port("clip", T::Clip)],
        widget_order: &["stop_at_clip_layer"],
        pass_through: &["clip"],
        ..BASE
    },
    // ── Model patches ────────────────────────────────────────────────────
    NodeDefinition {
        class_type: "ModelSamplingDiscrete",
        category: "model_patches",
        roles: &[PassThrough],
        inputs: &[port("model", T::Model)],
        pass_through: &["model"],
        ..BASE
    },
    NodeDefinition {
        class_type: "FreeU_V2",
        category: "model_patches",
        roles: &[PassThrough],
        inputs: &[port("model", T::Model)],
        pass_through: &["model"],
        ..BASE
    },
    // ── Latent ───────────────────────────────────────────────────────────
    NodeDefinition {
        class_type: "EmptyLatentImage",
        category: "latent",
        roles: &[Source],
        widget_order: &["width", "height", "batch_size"],
        params: &[(P::Width, Widget("width")), (P::Height, Widget("height"))],
        ..BASE
    },
    NodeDefinition {
        class_type: "EmptySD3LatentImage",
        category: "latent",
        roles: &[Source],
        widget_order: &["width", "height", "batch_size"],
        params: &[(P::Width, Widget("width")), (P::Height, Widget("height"))],
        ..BASE
    },
    NodeDefinition {
        class_type: "LatentUpscale",
        category: "latent",
        roles: &[Transform, PassThrough],
        inputs: &[port("samples", T::Latent)],
        widget_order: &["upscale_method", "width", "height", "crop"],
        // Upscaled dimensions are the produced dimensions, so they resolve
        // here before the search reaches the original latent source.
        params: &[(P::Width, Widget("width")), (P::Height, Widget("height"))],
        pass_through: &["samples"],
        ..BASE
    },
    NodeDefinition {
        class_type: "LatentUpscaleBy",
        category: "latent",
        roles: &[PassThrough],
        inputs: &[port("samples", T::Latent)],
        widget_order: &["upscale_method", "scale_by"],
        pass_through: &["samples"],
        ..BASE
    },
    NodeDefinition {
        class_type: "VAEDecode",
        category: "latent",
        roles: &[Transform, PassThrough],
        inputs: &[port("samples", T::Latent), port("vae", T::Vae)],
        params: &[(P::Vae, Trace("vae"))],
        pass_through: &["samples"],
        ..BASE
    },
    NodeDefinition {
        class_type: "VAEDecodeTiled",
        category: "latent",
        roles: &[Transform, PassThrough],
        inputs: &[port("samples", T::Latent), port("vae", T::Vae)],
        widget_order: &["tile_size"],
        params: &[(P::Vae, Trace("vae"))],
        pass_through: &["samples"],
        ..BASE
    },
    NodeDefinition {
        class_type: "VAEEncode",
        category: "latent",
        roles: &[Transform, PassThrough],
        inputs: &[port("pixels", T::Image), port("vae", T::Vae)],
        params: &[(P::Vae, Trace("vae"))],
        pass_through: &["pixels"],
        ..BASE
    },
    // ── Image ────────────────────────────────────────────────────────────
    NodeDefinition {
        class_type: "SaveImage",
        category: "image",
        roles: &[Sink, PassThrough],
        inputs: &[port("images", T::Image)],
        widget_order: &["filename_prefix"],
        pass_through: &["images"],
        terminal: Some(TerminalKind::Save),
        ..BASE
    },
    NodeDefinition {
        class_type: "Image Save",
        category: "image",
        roles: &[Sink, PassThrough],
        inputs: &[port("images", T::Image)],
        pass_through: &["images"],
        terminal: Some(TerminalKind::Save),
        ..BASE
    },
    NodeDefinition {
        class_type: "PreviewImage",
        category: "image",
        roles: &[Sink, PassThrough],
        inputs: &[port("images", T::Image)],
        pass_through: &["images"],
        terminal: Some(TerminalKind::Preview),
        ..BASE
    },
    NodeDefinition {
        class_type: "ImageUpscaleWithModel",
        category: "image",
        roles: &[Transform, PassThrough],
        inputs: &[port("upscale_model", T::Any), port("image", T::Image)],
        pass_through: &["image"],
        ..BASE
    },
    NodeDefinition {
        class_type: "ImageScale",
        category: "image",
        roles: &[Transform, PassThrough],
        inputs: &[port("image", T::Image)],
        widget_order: &["upscale_method", "width", "height", "crop"],
        params: &[(P::Width, Widget("width")), (P::Height, Widget("height"))],
        pass_through: &["image"],
        ..BASE
    },
    // ── Utility / routing ────────────────────────────────────────────────
    NodeDefinition {
        class_type: "Reroute",
        category: "utils",
        roles: &[PassThrough],
        ..BASE
    },
    NodeDefinition {
        class_type: "Reroute (rgthree)",
        category: "utils",
        roles: &[PassThrough],
        ..BASE
    },
    NodeDefinition {
        class_type: "PrimitiveNode",
        category: "utils",
        roles: &[Source],
        widget_order: &["value", "control_after_generate"],
        params: &[
            (P::Prompt, Widget("value")),
            (P::NegativePrompt, Widget("value")),
            (P::Seed, Widget("value")),
            (P::Steps, Widget("value")),
            (P::Cfg, Widget("value")),
            (P::SamplerName, Widget("value")),
            (P::Scheduler, Widget("value")),
            (P::Denoise, Widget("value")),
            (P::Width, Widget("value")),
            (P::Height, Widget("value")),
        ],
        ..BASE
    },
    NodeDefinition {
        class_type: "Text Multiline",
        category: "utils",
        roles: &[Source],
        widget_order: &["text"],
        params: &[
            (P::Prompt, Widget("text")),
            (P::NegativePrompt, Widget("text")),
        ],
        ..BASE
    },
    NodeDefinition {
        class_type: "ShowText|pysssss",
        category: "utils",
        roles: &[Transform, PassThrough],
        inputs: &[port("text", T::Text)],
        params: &[
            (P::Prompt, Widget("text")),
            (P::NegativePrompt, Widget("text")),
        ],
        pass_through: &["text"],
        ..BASE
    },
    NodeDefinition {
        class_type: "ImpactWildcardEncode",
        category: "impact",
        roles: &[Source, Transform],
        inputs: &[port("model", T::Model), port("clip", T::Clip)],
        // Widget layout varies across pack versions; the populated text is
        // only stable as a named input.
        params: &[
            (P::Prompt, Input("populated_text")),
            (P::NegativePrompt, Input("populated_text")),
        ],
        ..BASE
    },
    NodeDefinition {
        class_type: "ImpactSwitch",
        category: "impact",
        roles: &[Routing],
        widget_order: &["select", "sel_mode"],
        routing: Some(RoutingRule {
            control: "select",
            prefix: "input",
        }),
        ..BASE
    },
    NodeDefinition {
        class_type: "CR Image Input Switch",
        category: "utils",
        roles: &[Routing],
        widget_order: &["Input"],
        routing: Some(RoutingRule {
            control: "Input",
            prefix: "image",
        }),
        ..BASE
    },
];
