//! # Validation Engine
//!
//! Recursive walk over schema nodes. Each entry point validates one node
//! and its subtree and returns the diagnostics produced, in walk order.
//! Parents merge child results with `Diagnostics::append`, which keeps
//! order and drops exact duplicates; nothing is shared or mutated across
//! calls.
//!
//! ## Order Within a Node
//!
//! For an attribute: definition checks, value lookup, presence rules,
//! legacy validators, per-kind validators, nested attributes, deprecation.
//! For a block: value lookup, legacy validators, block validators, element
//! objects and their children, item counts, deprecation.
//!
//! Lists are walked by ascending index, maps by ascending key, sets in
//! element order, and children of a node by ascending name.

mod attribute;
mod block;
mod kinds;
mod nested;

use std::sync::Arc;

use pfw_core::{Diagnostics, Path, Value};
use tracing::debug;

use crate::config::{Config, ConfigAccessor};
use crate::schema::Schema;
use crate::validator::{AttributeValidator, ValidateAttributeRequest, ValidateAttributeResponse};

pub use attribute::attribute_validate;
pub use block::block_validate;
pub use nested::nested_attribute_validate;

/// Validate every top-level attribute and block of `schema` against
/// `config`: attributes first, then blocks, each in name order.
pub fn schema_validate(schema: &Schema, config: &Config) -> Diagnostics {
    let mut diags = Diagnostics::new();
    for (name, attribute) in schema.attributes() {
        let request = ValidateAttributeRequest::new(config, Path::root(name.as_str()));
        diags.append(attribute_validate(attribute, &request));
    }
    for (name, block) in schema.blocks() {
        let request = ValidateAttributeRequest::new(config, Path::root(name.as_str()));
        diags.append(block_validate(block, &request));
    }
    debug!(
        errors = diags.error_count(),
        warnings = diags.warning_count(),
        "validated configuration"
    );
    diags
}

/// The request's pre-resolved value, or the value looked up in its config.
fn resolve_value(request: &ValidateAttributeRequest<'_>) -> (Option<Value>, Diagnostics) {
    match &request.config_value {
        Some(value) => (Some(value.clone()), Diagnostics::new()),
        None => request.config.value_at_path(&request.path),
    }
}

fn run_legacy_validators(
    validators: &[Arc<dyn AttributeValidator>],
    request: &ValidateAttributeRequest<'_>,
) -> Diagnostics {
    let mut diags = Diagnostics::new();
    for validator in validators {
        let mut response = ValidateAttributeResponse::default();
        let description = validator.description();
        debug!(
            kind = "Attribute",
            description = %description,
            path = %request.path,
            "calling provider defined validator"
        );
        validator.validate(request, &mut response);
        debug!(
            kind = "Attribute",
            description = %description,
            path = %request.path,
            "called provider defined validator"
        );
        diags.append(response.diagnostics);
    }
    diags
}
