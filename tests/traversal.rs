//! Tests for the backward resolver: rule application, pass-through
//! continuation, routing, cycles, and multi-value accumulation.
mod common;
use common::*;
use kaidoku::prelude::*;

#[test]
fn test_resolve_through_decode_and_sink() {
    init_tracing();
    let graph = GraphBuilder::build(None, Some(simple_prompt_json()));
    let registry = Registry::builtin();
    let resolver = Resolver::new(&graph, &registry);

    // Searches start at the sink and cross the decode boundary.
    assert_eq!(
        resolver.resolve("7", LogicalParam::Prompt),
        Some(ParamValue::Text("a cat sitting on a windowsill".to_string()))
    );
    assert_eq!(
        resolver.resolve("7", LogicalParam::NegativePrompt),
        Some(ParamValue::Text("blurry, lowres".to_string()))
    );
    assert_eq!(
        resolver.resolve("7", LogicalParam::Seed),
        Some(ParamValue::Number(123.0))
    );
    assert_eq!(
        resolver.resolve("7", LogicalParam::Width),
        Some(ParamValue::Number(1024.0))
    );
    assert_eq!(
        resolver.resolve("7", LogicalParam::Model),
        Some(ParamValue::Text("sd_xl_base_1.0.safetensors".to_string()))
    );
}

#[test]
fn test_widget_and_input_forms_resolve_identically() {
    let registry = Registry::builtin();

    let from_prompt = GraphBuilder::build(None, Some(simple_prompt_json()));
    let from_workflow = GraphBuilder::build(Some(simple_workflow_json()), None);

    let a = Resolver::new(&from_prompt, &registry);
    let b = Resolver::new(&from_workflow, &registry);

    // Same value kind whether the payload stores fields as literal inputs
    // (execution format) or as positional widgets (UI format).
    assert_eq!(
        a.resolve("5", LogicalParam::SamplerName),
        Some(ParamValue::Text("euler".to_string()))
    );
    assert_eq!(
        b.resolve("5", LogicalParam::SamplerName),
        Some(ParamValue::Text("dpmpp_2m".to_string()))
    );
    assert_eq!(b.resolve("5", LogicalParam::Seed), Some(ParamValue::Number(42.0)));
    assert_eq!(b.resolve("5", LogicalParam::Steps), Some(ParamValue::Number(30.0)));
}

#[test]
fn test_cycle_terminates_as_dead_end() {
    init_tracing();
    let graph = GraphBuilder::build(None, Some(cyclic_prompt_json()));
    let registry = Registry::builtin();
    let resolver = Resolver::new(&graph, &registry);

    for param in LogicalParam::ALL {
        assert_eq!(resolver.resolve("3", param), None);
    }
}

#[test]
fn test_routing_follows_only_selected_branch() {
    let graph = GraphBuilder::build(None, Some(routing_prompt_json()));
    let registry = Registry::builtin();
    let resolver = Resolver::new(&graph, &registry);

    assert_eq!(
        resolver.resolve("5", LogicalParam::Prompt),
        Some(ParamValue::Text("from branch two".to_string()))
    );
}

#[test]
fn test_lora_chain_reports_application_order() {
    let graph = GraphBuilder::build(None, Some(lora_chain_prompt_json()));
    let registry = Registry::builtin();
    let resolver = Resolver::new(&graph, &registry);

    // Nearest-checkpoint loader first, duplicate-free.
    assert_eq!(
        resolver.resolve("9", LogicalParam::Lora),
        Some(ParamValue::List(vec![
            "style_a.safetensors".to_string(),
            "style_b.safetensors".to_string()
        ]))
    );
    // The model search skips the loaders through to the checkpoint.
    assert_eq!(
        resolver.resolve("9", LogicalParam::Model),
        Some(ParamValue::Text("dreamshaper_8.safetensors".to_string()))
    );
}

#[test]
fn test_fixed_width_lora_stack() {
    let prompt = r#"{
        "1": {"class_type": "CheckpointLoaderSimple",
              "inputs": {"ckpt_name": "base.safetensors"}},
        "2": {"class_type": "CR LoRA Stack",
              "inputs": {"switch_1": "On", "lora_name_1": "detail.safetensors",
                         "model_weight_1": 1.0, "clip_weight_1": 1.0,
                         "switch_2": "Off", "lora_name_2": "unused.safetensors",
                         "model_weight_2": 1.0, "clip_weight_2": 1.0,
                         "switch_3": "On", "lora_name_3": "style.safetensors",
                         "model_weight_3": 0.5, "clip_weight_3": 0.5}},
        "3": {"class_type": "CR Apply LoRA Stack",
              "inputs": {"model": ["1", 0], "clip": ["1", 1], "lora_stack": ["2", 0]}},
        "4": {"class_type": "KSampler",
              "inputs": {"model": ["3", 0], "seed": 5, "steps": 12, "cfg": 7.0,
                         "sampler_name": "euler", "scheduler": "normal", "denoise": 1.0}}
    }"#;
    let graph = GraphBuilder::build(None, Some(prompt));
    let registry = Registry::builtin();
    let resolver = Resolver::new(&graph, &registry);

    // Disabled slot skipped, enabled slots in slot order.
    assert_eq!(
        resolver.resolve("4", LogicalParam::Lora),
        Some(ParamValue::List(vec![
            "detail.safetensors".to_string(),
            "style.safetensors".to_string()
        ]))
    );
}

#[test]
fn test_keyed_lora_loader() {
    let prompt = r#"{
        "1": {"class_type": "CheckpointLoaderSimple",
              "inputs": {"ckpt_name": "base.safetensors"}},
        "2": {"class_type": "Power Lora Loader (rgthree)",
              "inputs": {"model": ["1", 0], "clip": ["1", 1],
                         "lora_1": {"on": true, "lora": "foo.safetensors", "strength": 0.8},
                         "lora_2": {"on": false, "lora": "bar.safetensors", "strength": 1.0},
                         "lora_3": {"on": true, "lora": "baz.safetensors", "strength": 0.5}}},
        "3": {"class_type": "KSampler",
              "inputs": {"model": ["2", 0], "seed": 5, "steps": 12, "cfg": 7.0,
                         "sampler_name": "euler", "scheduler": "normal", "denoise": 1.0}}
    }"#;
    let graph = GraphBuilder::build(None, Some(prompt));
    let registry = Registry::builtin();
    let resolver = Resolver::new(&graph, &registry);

    assert_eq!(
        resolver.resolve("3", LogicalParam::Lora),
        Some(ParamValue::List(vec![
            "foo.safetensors".to_string(),
            "baz.safetensors".to_string()
        ]))
    );
}

#[test]
fn test_sdxl_dual_text_deduplicates() {
    let prompt = r#"{
        "1": {"class_type": "CLIPTextEncodeSDXL",
              "inputs": {"width": 1024, "height": 1024, "crop_w": 0, "crop_h": 0,
                         "target_width": 1024, "target_height": 1024,
                         "text_g": "a castle", "text_l": "a castle"}},
        "2": {"class_type": "CLIPTextEncodeSDXL",
              "inputs": {"width": 1024, "height": 1024, "crop_w": 0, "crop_h": 0,
                         "target_width": 1024, "target_height": 1024,
                         "text_g": "global text", "text_l": "local text"}},
        "3": {"class_type": "KSampler",
              "inputs": {"positive": ["1", 0], "negative": ["2", 0], "seed": 1,
                         "steps": 10, "cfg": 5.0, "sampler_name": "euler",
                         "scheduler": "normal", "denoise": 1.0}},
        "4": {"class_type": "SaveImage", "inputs": {"images": ["3", 0]}}
    }"#;
    let graph = GraphBuilder::build(None, Some(prompt));
    let registry = Registry::builtin();
    let resolver = Resolver::new(&graph, &registry);

    assert_eq!(
        resolver.resolve("4", LogicalParam::Prompt),
        Some(ParamValue::Text("a castle".to_string()))
    );
    assert_eq!(
        resolver.resolve("4", LogicalParam::NegativePrompt),
        Some(ParamValue::Text("global text\nlocal text".to_string()))
    );
}

#[test]
fn test_muted_branch_is_dead_end() {
    // The positive encoder is muted in the UI payload; its text must not
    // resolve, and the search must not drift into the negative branch.
    let prompt = r#"{
        "2": {"class_type": "CLIPTextEncode", "inputs": {"text": "wanted"}},
        "3": {"class_type": "CLIPTextEncode", "inputs": {"text": "unwanted"}},
        "5": {"class_type": "KSampler",
              "inputs": {"positive": ["2", 0], "negative": ["3", 0], "seed": 1,
                         "steps": 10, "cfg": 5.0, "sampler_name": "euler",
                         "scheduler": "normal", "denoise": 1.0}},
        "7": {"class_type": "SaveImage", "inputs": {"images": ["5", 0]}}
    }"#;
    let workflow = r#"{
        "nodes": [{"id": 2, "type": "CLIPTextEncode", "mode": 2,
                   "widgets_values": ["wanted"]}],
        "links": []
    }"#;
    let graph = GraphBuilder::build(Some(workflow), Some(prompt));
    let registry = Registry::builtin();
    let resolver = Resolver::new(&graph, &registry);

    assert_eq!(resolver.resolve("7", LogicalParam::Prompt), None);
    assert_eq!(
        resolver.resolve("7", LogicalParam::NegativePrompt),
        Some(ParamValue::Text("unwanted".to_string()))
    );
}

#[test]
fn test_unknown_node_type_is_dead_end_not_error() {
    let prompt = r#"{
        "1": {"class_type": "SomeCustomMystery", "inputs": {"text": "hidden"}},
        "2": {"class_type": "KSampler",
              "inputs": {"positive": ["1", 0], "seed": 77, "steps": 10, "cfg": 5.0,
                         "sampler_name": "euler", "scheduler": "normal", "denoise": 1.0}},
        "3": {"class_type": "SaveImage", "inputs": {"images": ["2", 0]}}
    }"#;
    let graph = GraphBuilder::build(None, Some(prompt));
    let registry = Registry::builtin();
    let resolver = Resolver::new(&graph, &registry);

    assert_eq!(resolver.resolve("3", LogicalParam::Prompt), None);
    // Siblings of the dead branch still resolve.
    assert_eq!(
        resolver.resolve("3", LogicalParam::Seed),
        Some(ParamValue::Number(77.0))
    );
}

#[test]
fn test_terminal_prefers_save_over_preview() {
    let prompt = r#"{
        "1": {"class_type": "KSampler",
              "inputs": {"seed": 111, "steps": 10, "cfg": 5.0,
                         "sampler_name": "euler", "scheduler": "normal", "denoise": 1.0}},
        "2": {"class_type": "KSampler",
              "inputs": {"seed": 222, "steps": 10, "cfg": 5.0,
                         "sampler_name": "euler", "scheduler": "normal", "denoise": 1.0}},
        "3": {"class_type": "PreviewImage", "inputs": {"images": ["2", 0]}},
        "4": {"class_type": "SaveImage", "inputs": {"images": ["1", 0]}}
    }"#;
    let graph = GraphBuilder::build(None, Some(prompt));
    let registry = Registry::builtin();

    let terminal = select_terminal(&graph, &registry).expect("terminal found");
    assert_eq!(terminal.class_type, "SaveImage");
    assert_eq!(terminal.id, "4");
}

#[test]
fn test_terminal_falls_back_to_sole_sampler() {
    let prompt = r#"{
        "1": {"class_type": "CLIPTextEncode", "inputs": {"text": "headless"}},
        "2": {"class_type": "KSampler",
              "inputs": {"positive": ["1", 0], "seed": 321, "steps": 10, "cfg": 5.0,
                         "sampler_name": "euler", "scheduler": "normal", "denoise": 1.0}}
    }"#;
    let graph = GraphBuilder::build(None, Some(prompt));
    let registry = Registry::builtin();

    let terminal = select_terminal(&graph, &registry).expect("terminal found");
    assert_eq!(terminal.id, "2");
}

#[test]
fn test_terminal_picks_last_stage_of_sampler_chain() {
    // Base feeds the refiner's latent input; the refiner produced the final
    // pixels, so its parameters win.
    let prompt = r#"{
        "4": {"class_type": "KSampler",
              "inputs": {"seed": 111, "steps": 20, "cfg": 7.0,
                         "sampler_name": "euler", "scheduler": "normal", "denoise": 1.0}},
        "5": {"class_type": "KSampler",
              "inputs": {"latent_image": ["4", 0], "seed": 222, "steps": 8, "cfg": 4.0,
                         "sampler_name": "euler", "scheduler": "normal", "denoise": 0.3}}
    }"#;
    let graph = GraphBuilder::build(None, Some(prompt));
    let registry = Registry::builtin();

    let terminal = select_terminal(&graph, &registry).expect("terminal found");
    assert_eq!(terminal.id, "5");
}

#[test]
fn test_no_terminal_in_unrecognized_graph() {
    let prompt = r#"{
        "1": {"class_type": "MysteryNodeA", "inputs": {}},
        "2": {"class_type": "MysteryNodeB", "inputs": {"x": ["1", 0]}}
    }"#;
    let graph = GraphBuilder::build(None, Some(prompt));
    let registry = Registry::builtin();
    assert!(select_terminal(&graph, &registry).is_none());
}
