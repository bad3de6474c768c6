use pfw_core::Diagnostics;
use tracing::debug_span;

use super::kinds::validate_kinds;
use super::nested::nested_attribute_validate;
use super::{resolve_value, run_legacy_validators};
use crate::schema::{Attribute, NestingMode};
use crate::validator::ValidateAttributeRequest;

const INVALID_DEFINITION: &str = "Invalid Attribute Definition";

fn definition_error(attribute: &Attribute) -> Option<&'static str> {
    if attribute.declared_type().is_none() && attribute.nested_attributes().is_empty() {
        return Some(
            "Attribute must define either Attributes or Type. \
             This is always a problem with the provider and should be reported to the provider developer.",
        );
    }
    if !attribute.nested_attributes().is_empty()
        && attribute.nesting_mode() == NestingMode::Unknown
    {
        return Some(
            "Attribute cannot define both Attributes and Type. \
             This is always a problem with the provider and should be reported to the provider developer.",
        );
    }
    if !attribute.is_required() && !attribute.is_optional() && !attribute.is_computed() {
        return Some(
            "Attribute missing Required, Optional, or Computed definition. \
             This is always a problem with the provider and should be reported to the provider developer.",
        );
    }
    None
}

/// Validate one attribute and everything nested below it.
///
/// A broken attribute definition yields a single error and nothing else.
/// Otherwise the value at `request.path` is checked against the presence
/// rules, handed to the attribute's validators, walked for nested
/// attributes, and finally checked for deprecation.
pub fn attribute_validate(attribute: &Attribute, request: &ValidateAttributeRequest<'_>) -> Diagnostics {
    let span = debug_span!("attribute_validate", path = %request.path);
    let _guard = span.enter();

    let mut diags = Diagnostics::new();

    if let Some(detail) = definition_error(attribute) {
        diags.add_attribute_error(request.path.clone(), INVALID_DEFINITION, detail);
        return diags;
    }

    let (value, lookup) = resolve_value(request);
    let failed = lookup.has_error();
    diags.append(lookup);
    let Some(value) = value.filter(|_| !failed) else {
        return diags;
    };

    // Unknown is not null here.
    if attribute.is_computed() && !attribute.is_optional() && !value.is_null() {
        diags.add_attribute_error(
            request.path.clone(),
            "Invalid Configuration for Read-Only Attribute",
            "Cannot set value for this attribute as the provider has marked it as read-only. \
             Remove the configuration line setting the value.\n\n\
             Refer to the provider documentation or contact the provider developers \
             for additional information about configurable and read-only attributes that are supported.",
        );
    }

    if attribute.is_required() && value.is_null() {
        diags.add_attribute_error(
            request.path.clone(),
            "Missing Configuration for Required Attribute",
            format!(
                "Must set a configuration value for the {} attribute as the provider has marked it as required.\n\n\
                 Refer to the provider documentation or contact the provider developers \
                 for additional information about configurable attributes that are required.",
                request.path
            ),
        );
    }

    let request = request.clone().with_config_value(value.clone());

    diags.append(run_legacy_validators(attribute.legacy_validators(), &request));

    if let Some(validators) = attribute.validators() {
        diags.append(validate_kinds(validators, &request, &value));
    }

    diags.append(nested_attribute_validate(attribute, &request));

    if let Some(message) = attribute.deprecation_message() {
        if !value.is_null() && !value.is_unknown() {
            diags.add_attribute_warning(request.path.clone(), "Attribute Deprecated", message);
        }
    }

    diags
}
