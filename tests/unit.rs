//! Unit tests for the graph model primitives and the registry surface.
use kaidoku::prelude::*;

#[test]
fn test_mode_flags() {
    assert_eq!(NodeMode::from_flag(0), NodeMode::Active);
    assert_eq!(NodeMode::from_flag(1), NodeMode::Active);
    assert_eq!(NodeMode::from_flag(2), NodeMode::Muted);
    assert_eq!(NodeMode::from_flag(4), NodeMode::Bypassed);
    assert_eq!(NodeMode::from_flag(99), NodeMode::Active);
    assert!(NodeMode::Active.is_active());
    assert!(!NodeMode::Muted.is_active());
    assert!(!NodeMode::Bypassed.is_active());
}

#[test]
fn test_port_compatibility() {
    assert!(PortType::Model.accepts(PortType::Model));
    assert!(!PortType::Model.accepts(PortType::Conditioning));
    // The pixel chain crosses a decode boundary, so latent and image ports
    // carry each other's searches.
    assert!(PortType::Latent.accepts(PortType::Image));
    assert!(PortType::Image.accepts(PortType::Latent));
    assert!(PortType::Any.accepts(PortType::Vae));
    assert!(PortType::Clip.accepts(PortType::Any));
}

#[test]
fn test_param_value_coercion() {
    let text = ParamValue::from_json(&serde_json::json!("euler")).unwrap();
    assert_eq!(text.as_text(), Some("euler"));

    let number = ParamValue::from_json(&serde_json::json!(7.5)).unwrap();
    assert_eq!(number.as_number(), Some(7.5));

    // Widget arrays routinely carry numbers as strings.
    assert_eq!(ParamValue::Text("20".to_string()).as_number(), Some(20.0));
    assert_eq!(ParamValue::Text("euler".to_string()).as_number(), None);

    // Booleans and structured values carry no parameter data.
    assert!(ParamValue::from_json(&serde_json::json!(true)).is_none());
    assert!(ParamValue::from_json(&serde_json::json!([1, 2])).is_none());
    assert!(ParamValue::from_json(&serde_json::Value::Null).is_none());
}

#[test]
fn test_registry_lookup() {
    let registry = Registry::builtin();
    assert!(!registry.is_empty());

    let sampler = registry.get("KSampler").expect("KSampler is built in");
    assert!(sampler.has_role(Role::Transform));
    assert_eq!(sampler.widget_index("seed"), Some(0));
    // The placeholder slot keeps later widget positions honest.
    assert_eq!(sampler.widget_index("steps"), Some(2));
    assert_eq!(sampler.port_type("positive"), Some(PortType::Conditioning));
    assert_eq!(sampler.terminal, Some(TerminalKind::Sampler));

    assert!(registry.get("TotallyUnknownNode").is_none());
}

#[test]
fn test_default_record() {
    let record = GenerationParams::default();
    assert_eq!(record.prompt, "");
    assert_eq!(record.seed, 0);
    assert_eq!(record.model, "Unknown");
    assert!(record.loras.is_empty());
}

#[test]
fn test_record_serialization_keys() {
    let record = GenerationParams::default();
    let json = serde_json::to_value(&record).unwrap();
    // Renamed fields keep the external key set stable.
    assert!(json.get("negativePrompt").is_some());
    assert!(json.get("lora").is_some());
    assert!(json.get("sampler_name").is_some());
    assert!(json.get("negative_prompt").is_none());
}
