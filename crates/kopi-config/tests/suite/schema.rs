use kopi_config::json_schema;
use serde_json::json;

#[test]
fn schema_rejects_unknown_top_level_keys() {
    let value = serde_json::to_value(json_schema()).expect("schema serializes");
    assert_eq!(value.pointer("/additionalProperties"), Some(&json!(false)));
    for section in ["resolution", "eval", "logging"] {
        assert!(
            value.pointer(&format!("/properties/{section}")).is_some(),
            "missing section {section}"
        );
    }
}

#[test]
fn schema_describes_call_depth_bounds() {
    let value = serde_json::to_value(json_schema()).expect("schema serializes");
    let depth = value
        .pointer("/definitions/EvalConfig/properties/max_call_depth")
        .expect("max_call_depth schema property exists");
    assert_eq!(depth.get("minimum").and_then(|v| v.as_f64()), Some(1.0));
    assert_eq!(depth.get("default"), Some(&json!(512)));
}
