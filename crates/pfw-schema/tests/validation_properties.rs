//! Property tests: validation is deterministic and walks list elements in
//! index order.

mod common;

use pfw_core::Type;
use pfw_schema::{schema_validate, Attribute, KindValidators, NestingMode, Schema};
use proptest::prelude::*;
use serde_json::json;

use common::{config_from_json, failing_string, init_tracing, paths};

// The note validator fails for every element, null notes included.

fn rules_schema() -> Schema {
    let rules = Attribute::nested(
        NestingMode::List,
        [
            ("name", Attribute::new(Type::String).required()),
            (
                "note",
                Attribute::new(Type::String)
                    .optional()
                    .with_validators(KindValidators::String(vec![failing_string("Bad Note")])),
            ),
        ],
    )
    .optional();
    Schema::new()
        .with_attribute("rules", rules)
        .with_attribute("region", Attribute::new(Type::String).required())
}

fn rule_json(name: &Option<String>, note: &Option<String>) -> serde_json::Value {
    json!({"name": name, "note": note})
}

proptest! {
    #[test]
    fn validation_is_deterministic(
        rules in prop::collection::vec(
            (prop::option::of("[a-z]{1,6}"), prop::option::of("[a-z]{1,6}")),
            0..8,
        ),
        region in prop::option::of("[a-z]{2,4}"),
    ) {
        init_tracing();
        let schema = rules_schema();
        let elements: Vec<_> = rules.iter().map(|(n, o)| rule_json(n, o)).collect();
        let config = config_from_json(
            schema.clone(),
            json!({"rules": elements, "region": region}),
        );

        let first = schema_validate(&schema, &config);
        let second = schema_validate(&schema, &config);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );

        let expected_errors = rules
            .iter()
            .map(|(n, _)| usize::from(n.is_none()))
            .sum::<usize>()
            + rules.len()
            + usize::from(region.is_none());
        prop_assert_eq!(first.error_count(), expected_errors);
    }

    #[test]
    fn list_paths_ascend(names in prop::collection::vec(prop::option::of("[a-z]{1,6}"), 1..10)) {
        let schema = rules_schema();
        let elements: Vec<_> = names.iter().map(|n| rule_json(n, &None)).collect();
        let config = config_from_json(
            schema.clone(),
            json!({"rules": elements, "region": "eu"}),
        );

        let diags = schema_validate(&schema, &config);
        let missing: Vec<String> = paths(&diags)
            .into_iter()
            .filter(|p| p.ends_with(".name"))
            .collect();
        let expected: Vec<String> = names
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_none())
            .map(|(i, _)| format!("rules[{i}].name"))
            .collect();
        prop_assert_eq!(missing, expected);
    }
}
