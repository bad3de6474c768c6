//! Block validation: item counts, deprecation, and recursion into nested
//! attributes and blocks.

mod common;

use std::sync::Arc;

use pfw_core::{Diagnostic, ListValue, ObjectValue, Path, SetValue, Type, Value};
use pfw_schema::{
    attribute_validator_fn, block_validate, validator_fn, Attribute, Block, BlockValidators,
    KindValidators, Schema, ValidateAttributeRequest,
};
use serde_json::json;

use common::{
    config_from_json, config_with, failing_string, paths, summaries, unknown_at, warning_legacy,
};

fn validate_block(schema: Schema, config: &pfw_schema::Config) -> pfw_core::Diagnostics {
    let block = schema.block("test").expect("test block").clone();
    block_validate(&block, &ValidateAttributeRequest::new(config, Path::root("test")))
}

fn rule_block() -> Block {
    Block::list().with_attribute("action", Attribute::new(Type::String).optional())
}

#[test]
fn test_min_items_with_zero_known_elements() {
    let schema = Schema::new().with_block("test", rule_block().min_items(1));
    let config = config_from_json(schema.clone(), json!({"test": []}));
    let diags = validate_block(schema, &config);
    assert_eq!(
        diags.as_slice(),
        &[Diagnostic::attribute_error(
            Path::root("test"),
            "Missing Block Configuration",
            "The configuration should declare a minimum of 1 block, however 0 blocks were configured.",
        )]
    );
}

#[test]
fn test_min_items_with_unknown_block_is_silent() {
    let schema = Schema::new().with_block("test", rule_block().min_items(1));
    let unknown = unknown_at(&schema, "test");
    let config = config_with(schema.clone(), [("test", unknown)]);
    assert!(validate_block(schema, &config).is_empty());
}

#[test]
fn test_min_items_with_null_block() {
    let schema = Schema::new().with_block("test", Block::set().min_items(2));
    let config = config_from_json(schema.clone(), json!({}));
    let diags = validate_block(schema, &config);
    assert_eq!(
        diags.as_slice()[0].detail(),
        "The configuration should declare a minimum of 2 blocks, however 0 blocks were configured."
    );
}

#[test]
fn test_max_items_exceeded() {
    let schema = Schema::new().with_block("test", rule_block().max_items(1));
    let config = config_from_json(
        schema.clone(),
        json!({"test": [{"action": "allow"}, {"action": "deny"}]}),
    );
    let diags = validate_block(schema, &config);
    assert_eq!(
        diags.as_slice(),
        &[Diagnostic::attribute_error(
            Path::root("test"),
            "Extra Block Configuration",
            "The configuration should declare a maximum of 1 block, however 2 blocks were configured.",
        )]
    );
}

#[test]
fn test_within_limits_is_clean() {
    let schema = Schema::new().with_block("test", rule_block().min_items(1).max_items(2));
    let config = config_from_json(schema.clone(), json!({"test": [{"action": "allow"}]}));
    assert!(validate_block(schema, &config).is_empty());
}

#[test]
fn test_children_validated_before_item_counts() {
    let block = Block::list()
        .with_attribute(
            "action",
            Attribute::new(Type::String)
                .required()
                .with_validators(KindValidators::String(vec![failing_string("Bad Action")])),
        )
        .max_items(1);
    let schema = Schema::new().with_block("test", block);
    let config = config_from_json(
        schema.clone(),
        json!({"test": [{"action": "a"}, {}]}),
    );
    let diags = validate_block(schema, &config);
    assert_eq!(
        summaries(&diags),
        vec![
            "Bad Action",
            "Missing Configuration for Required Attribute",
            "Bad Action",
            "Extra Block Configuration"
        ]
    );
    assert_eq!(
        paths(&diags),
        vec!["test[0].action", "test[1].action", "test[1].action", "test"]
    );
}

#[test]
fn test_nested_blocks_recurse() {
    let inner = Block::list()
        .with_attribute("port", Attribute::new(Type::Int64).required())
        .min_items(1);
    let outer = Block::list()
        .with_attribute("name", Attribute::new(Type::String).optional())
        .with_block("inner", inner);
    let schema = Schema::new().with_block("test", outer);
    let config = config_from_json(
        schema.clone(),
        json!({"test": [{"name": "a", "inner": [{"port": 1}, {}]}, {"name": "b", "inner": []}]}),
    );
    let diags = validate_block(schema, &config);
    assert_eq!(
        paths(&diags),
        vec!["test[0].inner[1].port", "test[1].inner"],
        "{diags}"
    );
    assert_eq!(
        summaries(&diags),
        vec![
            "Missing Configuration for Required Attribute",
            "Missing Block Configuration"
        ]
    );
}

#[test]
fn test_set_block_children_addressed_by_value() {
    let block = Block::set().with_attribute(
        "action",
        Attribute::new(Type::String)
            .optional()
            .with_validators(KindValidators::String(vec![failing_string("Checked")])),
    );
    let schema = Schema::new().with_block("test", block);
    let config = config_from_json(schema.clone(), json!({"test": [{"action": "allow"}]}));
    let diags = validate_block(schema, &config);
    assert_eq!(paths(&diags), vec![r#"test[Value({"action":"allow"})].action"#]);
}

#[test]
fn test_deprecated_block_known_value_warns() {
    let schema = Schema::new().with_block("test", rule_block().deprecated("Use rules instead."));
    let config = config_from_json(schema.clone(), json!({"test": [{"action": "allow"}]}));
    let diags = validate_block(schema, &config);
    assert_eq!(
        diags.as_slice(),
        &[Diagnostic::attribute_warning(
            Path::root("test"),
            "Block Deprecated",
            "Use rules instead.",
        )]
    );
}

#[test]
fn test_deprecated_block_unknown_value_still_warns() {
    let schema = Schema::new().with_block("test", rule_block().deprecated("Use rules instead."));
    let unknown = unknown_at(&schema, "test");
    let config = config_with(schema.clone(), [("test", unknown)]);
    let diags = validate_block(schema, &config);
    assert_eq!(summaries(&diags), vec!["Block Deprecated"]);
}

#[test]
fn test_deprecated_block_null_value_is_silent() {
    let schema = Schema::new().with_block("test", rule_block().deprecated("Use rules instead."));
    let config = config_from_json(schema.clone(), json!({}));
    assert!(validate_block(schema, &config).is_empty());
}

#[test]
fn test_legacy_validators_see_whole_block() {
    let counts = attribute_validator_fn("counts elements", |req, resp| {
        if let Some(Value::List(list)) = &req.config_value {
            resp.diagnostics.add_attribute_warning(
                req.path.clone(),
                "Counted",
                format!("{} elements", list.len()),
            );
        }
    });
    let schema = Schema::new().with_block(
        "test",
        rule_block()
            .with_legacy_validator(Arc::new(counts))
            .with_legacy_validator(warning_legacy("Second")),
    );
    let config = config_from_json(schema.clone(), json!({"test": [{}, {}, {}]}));
    let diags = validate_block(schema, &config);
    assert_eq!(summaries(&diags), vec!["Counted", "Second"]);
    assert_eq!(diags.as_slice()[0].detail(), "3 elements");
}

#[test]
fn test_object_validators_run_per_element() {
    let needs_action = validator_fn::<ObjectValue, _>("action required unless null", |req, resp| {
        let missing = req
            .config_value
            .get("action")
            .map_or(true, Value::is_null);
        if missing {
            resp.diagnostics.add_attribute_error(
                req.path.clone(),
                "Incomplete Rule",
                "every rule needs an action",
            );
        }
    });
    let schema = Schema::new().with_block(
        "test",
        rule_block().with_object_validator(Arc::new(needs_action)),
    );
    let config = config_from_json(
        schema.clone(),
        json!({"test": [{"action": "allow"}, {}]}),
    );
    let diags = validate_block(schema, &config);
    assert_eq!(paths(&diags), vec!["test[1]"]);
    assert_eq!(summaries(&diags), vec!["Incomplete Rule"]);
}

#[test]
fn test_list_validators_see_whole_block_before_elements() {
    let at_most_one = validator_fn::<ListValue, _>("at most one rule", |req, resp| {
        if req.config_value.len() > 1 {
            resp.diagnostics.add_attribute_error(
                req.path.clone(),
                "Too Many Rules",
                format!("got {}", req.config_value.len()),
            );
        }
    });
    let block = Block::list()
        .with_attribute(
            "action",
            Attribute::new(Type::String)
                .optional()
                .with_validators(KindValidators::String(vec![failing_string("Bad Action")])),
        )
        .with_legacy_validator(warning_legacy("Legacy"))
        .with_validators(BlockValidators::List(vec![Arc::new(at_most_one)]));
    let schema = Schema::new().with_block("test", block);
    let config = config_from_json(
        schema.clone(),
        json!({"test": [{"action": "allow"}, {"action": "deny"}]}),
    );
    let diags = validate_block(schema, &config);
    assert_eq!(
        summaries(&diags),
        vec!["Legacy", "Too Many Rules", "Bad Action", "Bad Action"]
    );
    assert_eq!(
        paths(&diags),
        vec!["test", "test", "test[0].action", "test[1].action"]
    );
    assert_eq!(diags.as_slice()[1].detail(), "got 2");
}

#[test]
fn test_list_validators_see_null_block() {
    let sees_null = validator_fn::<ListValue, _>("reports null", |req, resp| {
        if req.config_value.is_null() {
            resp.diagnostics
                .add_attribute_warning(req.path.clone(), "Null Rules", "");
        }
    });
    let schema = Schema::new().with_block(
        "test",
        rule_block().with_validators(BlockValidators::List(vec![Arc::new(sees_null)])),
    );
    let config = config_from_json(schema.clone(), json!({}));
    assert_eq!(summaries(&validate_block(schema, &config)), vec!["Null Rules"]);
}

#[test]
fn test_set_validators_run_on_set_block() {
    let counts = validator_fn::<SetValue, _>("counts set elements", |req, resp| {
        resp.diagnostics.add_attribute_warning(
            req.path.clone(),
            "Counted",
            format!("{} elements", req.config_value.len()),
        );
    });
    let block = Block::set()
        .with_attribute("action", Attribute::new(Type::String).optional())
        .with_validators(BlockValidators::Set(vec![Arc::new(counts)]));
    let schema = Schema::new().with_block("test", block);
    let config = config_from_json(
        schema.clone(),
        json!({"test": [{"action": "allow"}, {"action": "deny"}, {}]}),
    );
    let diags = validate_block(schema, &config);
    assert_eq!(
        diags.as_slice(),
        &[Diagnostic::attribute_warning(
            Path::root("test"),
            "Counted",
            "3 elements",
        )]
    );
}

#[test]
fn test_kind_mismatch_for_block_validators_keeps_walking() {
    let never = validator_fn::<ObjectValue, _>("never reached", |req, resp| {
        resp.diagnostics
            .add_attribute_error(req.path.clone(), "Never", "");
    });
    let block = Block::list()
        .with_attribute(
            "action",
            Attribute::new(Type::String)
                .optional()
                .with_validators(KindValidators::String(vec![failing_string("Bad Action")])),
        )
        .with_validators(BlockValidators::Object(vec![Arc::new(never)]));
    let schema = Schema::new().with_block("test", block);
    let config = config_from_json(schema.clone(), json!({"test": [{"action": "allow"}]}));
    let diags = validate_block(schema, &config);
    assert_eq!(
        summaries(&diags),
        vec!["Invalid Object Attribute Validator Value Type", "Bad Action"]
    );
    assert!(diags.as_slice()[0]
        .detail()
        .ends_with("Incoming Value Type: ListValue"));
}
