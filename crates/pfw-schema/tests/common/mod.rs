//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use pfw_core::{Diagnostic, Diagnostics, ObjectValue, Path, StringValue, Type, Value};
use pfw_schema::{
    attribute_validator_fn, validator_fn, AttributeValidator, Config, Schema, StringValidator,
};

/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn config_from_json(schema: Schema, json: serde_json::Value) -> Config {
    Config::from_json(Arc::new(schema), &json).expect("configuration matches schema")
}

/// A configuration where every top-level value is null except `values`.
pub fn config_with<'a>(schema: Schema, values: impl IntoIterator<Item = (&'a str, Value)>) -> Config {
    let schema = Arc::new(schema);
    let Type::Object(types) = schema.schema_type() else {
        panic!("schema type is an object");
    };
    let mut attributes: BTreeMap<String, Value> = types
        .iter()
        .map(|(name, ty)| (name.clone(), ty.null_value()))
        .collect();
    for (name, value) in values {
        attributes.insert(name.to_string(), value);
    }
    let raw = ObjectValue::new(types, attributes).expect("values match schema");
    Config::new(schema, Value::Object(raw))
}

/// Unknown value of the top-level attribute or block `name`.
pub fn unknown_at(schema: &Schema, name: &str) -> Value {
    schema
        .type_at_path(&Path::root(name))
        .expect("name is in schema")
        .unknown_value()
}

pub fn string(s: &str) -> Value {
    Value::String(StringValue::new(s))
}

/// String validator that always adds one error with `summary`.
pub fn failing_string(summary: &'static str) -> Arc<StringValidator> {
    Arc::new(validator_fn::<StringValue, _>(
        format!("always fails with {summary}"),
        move |req, resp| {
            resp.diagnostics.add_attribute_error(
                req.path.clone(),
                summary,
                format!("{summary} detail"),
            );
        },
    ))
}

/// Legacy validator that always adds one warning with `summary`.
pub fn warning_legacy(summary: &'static str) -> Arc<dyn AttributeValidator> {
    Arc::new(attribute_validator_fn(
        format!("always warns with {summary}"),
        move |req, resp| {
            resp.diagnostics
                .add_attribute_warning(req.path.clone(), summary, "legacy");
        },
    ))
}

pub fn summaries(diags: &Diagnostics) -> Vec<&str> {
    diags.iter().map(Diagnostic::summary).collect()
}

pub fn paths(diags: &Diagnostics) -> Vec<String> {
    diags
        .iter()
        .map(|d| d.path().map(ToString::to_string).unwrap_or_default())
        .collect()
}
