//! Per-kind dispatch: convert the dynamic value to the canonical kind and
//! run that kind's validators.

use std::sync::Arc;

use pfw_core::{Diagnostics, ObjectValue, Path, PathExpression, Valuable, Value};
use tracing::debug;

use crate::config::Config;
use crate::validator::{
    BlockValidators, KindValidators, ObjectValidator, ValidateAttributeRequest, Validator,
    ValidatorRequest, ValidatorResponse,
};

pub(super) fn validate_kinds(
    validators: &KindValidators,
    request: &ValidateAttributeRequest<'_>,
    value: &Value,
) -> Diagnostics {
    match validators {
        KindValidators::Bool(v) => validate_kind(v, request, value),
        KindValidators::Float64(v) => validate_kind(v, request, value),
        KindValidators::Int64(v) => validate_kind(v, request, value),
        KindValidators::List(v) => validate_kind(v, request, value),
        KindValidators::Map(v) => validate_kind(v, request, value),
        KindValidators::Number(v) => validate_kind(v, request, value),
        KindValidators::Object(v) => validate_kind(v, request, value),
        KindValidators::Set(v) => validate_kind(v, request, value),
        KindValidators::String(v) => validate_kind(v, request, value),
    }
}

pub(super) fn validate_block_kinds(
    validators: &BlockValidators,
    request: &ValidateAttributeRequest<'_>,
    value: &Value,
) -> Diagnostics {
    match validators {
        BlockValidators::List(v) => validate_kind(v, request, value),
        BlockValidators::Object(v) => validate_kind(v, request, value),
        BlockValidators::Set(v) => validate_kind(v, request, value),
    }
}

fn validate_kind<V: Valuable>(
    validators: &[Arc<dyn Validator<V>>],
    request: &ValidateAttributeRequest<'_>,
    value: &Value,
) -> Diagnostics {
    let mut diags = Diagnostics::new();

    let Some((config_value, conversion)) = V::from_valuable(value) else {
        diags.add_attribute_error(
            request.path.clone(),
            format!("Invalid {} Attribute Validator Value Type", V::KIND),
            format!(
                "An unexpected value type was encountered while attempting to perform {kind} attribute validation. \
                 The value type must implement the {kind}Valuable capability. \
                 Please report this to the provider developers.\n\n\
                 Incoming Value Type: {type_name}",
                kind = V::KIND,
                type_name = value.type_name(),
            ),
        );
        return diags;
    };

    let failed = conversion.has_error();
    diags.append(conversion);
    if failed {
        return diags;
    }

    let validator_request = ValidatorRequest {
        config: request.config,
        config_value,
        path: request.path.clone(),
        path_expression: request.path_expression.clone(),
    };
    diags.append(run_validators(validators, &validator_request));
    diags
}

/// Run `validators` in order, each with a fresh response.
pub(super) fn run_validators<V: Valuable>(
    validators: &[Arc<dyn Validator<V>>],
    request: &ValidatorRequest<'_, V>,
) -> Diagnostics {
    let mut diags = Diagnostics::new();
    for validator in validators {
        let mut response = ValidatorResponse::default();
        let description = validator.description();
        debug!(
            kind = V::KIND,
            description = %description,
            path = %request.path,
            "calling provider defined validator"
        );
        validator.validate(request, &mut response);
        debug!(
            kind = V::KIND,
            description = %description,
            path = %request.path,
            "called provider defined validator"
        );
        diags.append(response.diagnostics);
    }
    diags
}

/// Run nested-object validators against one element object. Lookup
/// errors for the element stop the validators from running.
pub(super) fn validate_element_object(
    validators: &[Arc<ObjectValidator>],
    config: &Config,
    path: &Path,
    path_expression: &PathExpression,
    (object, lookup): (ObjectValue, Diagnostics),
) -> Diagnostics {
    let mut diags = Diagnostics::new();
    let failed = lookup.has_error();
    diags.append(lookup);
    if failed {
        return diags;
    }
    let request = ValidatorRequest {
        config,
        config_value: object,
        path: path.clone(),
        path_expression: path_expression.clone(),
    };
    diags.append(run_validators(validators, &request));
    diags
}
