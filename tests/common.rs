//! Common test utilities: canned metadata payloads and extraction helpers.
use kaidoku::prelude::*;

/// Initializes a test-writer tracing subscriber so traversal logs show up
/// under `--nocapture`. Safe to call from every test.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Runs a full extraction over an execution-format payload.
#[allow(dead_code)]
pub fn extract_prompt(prompt_json: &str) -> GenerationParams {
    MetadataExtractor::new()
        .extract(&MetadataPayload {
            prompt_json: Some(prompt_json),
            ..MetadataPayload::default()
        })
        .expect("extraction should succeed")
}

/// Runs a full extraction over a UI-format payload.
#[allow(dead_code)]
pub fn extract_workflow(workflow_json: &str) -> GenerationParams {
    MetadataExtractor::new()
        .extract(&MetadataPayload {
            workflow_json: Some(workflow_json),
            ..MetadataPayload::default()
        })
        .expect("extraction should succeed")
}

/// A complete single-stage txt2img pipeline in execution ("prompt") format:
/// checkpoint -> dual text encode -> KSampler -> VAEDecode -> SaveImage.
#[allow(dead_code)]
pub fn simple_prompt_json() -> &'static str {
    r#"{
        "1": {"class_type": "CheckpointLoaderSimple",
              "inputs": {"ckpt_name": "sd_xl_base_1.0.safetensors"}},
        "2": {"class_type": "CLIPTextEncode",
              "inputs": {"text": "a cat sitting on a windowsill", "clip": ["1", 1]}},
        "3": {"class_type": "CLIPTextEncode",
              "inputs": {"text": "blurry, lowres", "clip": ["1", 1]}},
        "4": {"class_type": "EmptyLatentImage",
              "inputs": {"width": 1024, "height": 768, "batch_size": 1}},
        "5": {"class_type": "KSampler",
              "inputs": {"model": ["1", 0], "positive": ["2", 0], "negative": ["3", 0],
                         "latent_image": ["4", 0], "seed": 123, "steps": 20, "cfg": 7.0,
                         "sampler_name": "euler", "scheduler": "normal", "denoise": 1.0}},
        "6": {"class_type": "VAEDecode",
              "inputs": {"samples": ["5", 0], "vae": ["1", 2]}},
        "7": {"class_type": "SaveImage",
              "inputs": {"images": ["6", 0], "filename_prefix": "output"}}
    }"#
}

/// The same pipeline with two chained LoRA loaders between the checkpoint
/// and the sampler. Application order: style_a first, then style_b.
#[allow(dead_code)]
pub fn lora_chain_prompt_json() -> &'static str {
    r#"{
        "1": {"class_type": "CheckpointLoaderSimple",
              "inputs": {"ckpt_name": "dreamshaper_8.safetensors"}},
        "2": {"class_type": "LoraLoader",
              "inputs": {"lora_name": "style_a.safetensors", "strength_model": 0.8,
                         "strength_clip": 0.8, "model": ["1", 0], "clip": ["1", 1]}},
        "3": {"class_type": "LoraLoader",
              "inputs": {"lora_name": "style_b.safetensors", "strength_model": 0.6,
                         "strength_clip": 0.6, "model": ["2", 0], "clip": ["2", 1]}},
        "4": {"class_type": "CLIPTextEncode",
              "inputs": {"text": "a lighthouse at dusk", "clip": ["3", 1]}},
        "5": {"class_type": "CLIPTextEncode",
              "inputs": {"text": "watermark", "clip": ["3", 1]}},
        "6": {"class_type": "EmptyLatentImage",
              "inputs": {"width": 512, "height": 512, "batch_size": 1}},
        "7": {"class_type": "KSampler",
              "inputs": {"model": ["3", 0], "positive": ["4", 0], "negative": ["5", 0],
                         "latent_image": ["6", 0], "seed": 42, "steps": 25, "cfg": 6.5,
                         "sampler_name": "dpmpp_2m", "scheduler": "karras", "denoise": 1.0}},
        "8": {"class_type": "VAEDecode",
              "inputs": {"samples": ["7", 0], "vae": ["1", 2]}},
        "9": {"class_type": "SaveImage",
              "inputs": {"images": ["8", 0]}}
    }"#
}

/// A deliberately cyclic reroute pair feeding the sink. Traversal must
/// dead-end instead of recursing forever.
#[allow(dead_code)]
pub fn cyclic_prompt_json() -> &'static str {
    r#"{
        "1": {"class_type": "Reroute", "inputs": {"input": ["2", 0]}},
        "2": {"class_type": "Reroute", "inputs": {"input": ["1", 0]}},
        "3": {"class_type": "SaveImage", "inputs": {"images": ["1", 0]}}
    }"#
}

/// Two prompt branches behind an index switch selecting branch two.
#[allow(dead_code)]
pub fn routing_prompt_json() -> &'static str {
    r#"{
        "1": {"class_type": "CLIPTextEncode", "inputs": {"text": "from branch one"}},
        "2": {"class_type": "CLIPTextEncode", "inputs": {"text": "from branch two"}},
        "3": {"class_type": "ImpactSwitch",
              "inputs": {"select": 2, "sel_mode": false,
                         "input1": ["1", 0], "input2": ["2", 0]}},
        "4": {"class_type": "KSampler",
              "inputs": {"positive": ["3", 0], "seed": 9, "steps": 10, "cfg": 5.0,
                         "sampler_name": "euler", "scheduler": "normal", "denoise": 1.0}},
        "5": {"class_type": "SaveImage", "inputs": {"images": ["4", 0]}}
    }"#
}

/// The single-stage pipeline in UI ("workflow") format: widget arrays plus
/// a link table, no execution inputs at all.
#[allow(dead_code)]
pub fn simple_workflow_json() -> &'static str {
    r#"{
        "nodes": [
            {"id": 1, "type": "CheckpointLoaderSimple",
             "widgets_values": ["dreamshaper_8.safetensors"]},
            {"id": 2, "type": "CLIPTextEncode", "widgets_values": ["a forest path"],
             "inputs": [{"name": "clip", "link": 1}]},
            {"id": 3, "type": "CLIPTextEncode", "widgets_values": ["ugly"],
             "inputs": [{"name": "clip", "link": 2}]},
            {"id": 4, "type": "EmptyLatentImage", "widgets_values": [512, 768, 1]},
            {"id": 5, "type": "KSampler",
             "widgets_values": [42, "randomize", 30, 8.0, "dpmpp_2m", "karras", 1.0],
             "inputs": [{"name": "model", "link": 3}, {"name": "positive", "link": 4},
                        {"name": "negative", "link": 5}, {"name": "latent_image", "link": 6}]},
            {"id": 6, "type": "VAEDecode",
             "inputs": [{"name": "samples", "link": 7}, {"name": "vae", "link": 8}]},
            {"id": 7, "type": "SaveImage", "widgets_values": ["output"],
             "inputs": [{"name": "images", "link": 9}]}
        ],
        "links": [
            [1, 1, 1, 2, 0, "CLIP"],
            [2, 1, 1, 3, 0, "CLIP"],
            [3, 1, 0, 5, 0, "MODEL"],
            [4, 2, 0, 5, 1, "CONDITIONING"],
            [5, 3, 0, 5, 2, "CONDITIONING"],
            [6, 4, 0, 5, 3, "LATENT"],
            [7, 5, 0, 6, 0, "LATENT"],
            [8, 1, 2, 6, 1, "VAE"],
            [9, 6, 0, 7, 0, "IMAGE"]
        ]
    }"#
}

/// A textual parameter block in the classic "prompt / Negative prompt: /
/// key-value line" layout.
#[allow(dead_code)]
pub fn parameter_block() -> &'static str {
    "a majestic castle on a hill, <lora:fantasyDetail:0.7>\n\
     Negative prompt: blurry, lowres, bad anatomy\n\
     Steps: 28, Sampler: DPM++ 2M, Schedule type: Karras, CFG scale: 6.5, \
     Seed: 3812094821, Size: 832x1216, Model: juggernautXL_v9, \
     VAE: sdxl_vae.safetensors, Denoising strength: 0.4"
}
