use pfw_core::{Diagnostic, Diagnostics, Path, PathExpression, Type};
use tracing::debug_span;

use super::attribute::attribute_validate;
use super::kinds::{validate_block_kinds, validate_element_object};
use super::{resolve_value, run_legacy_validators};
use crate::coerce::{coerce_list_value, coerce_set_value, list_elem_object, set_elem_object, Walk};
use crate::schema::{Block, BlockNestingMode};
use crate::validator::ValidateAttributeRequest;

fn blocks_phrase(count: u64) -> String {
    if count == 1 {
        "1 block".to_string()
    } else {
        format!("{count} blocks")
    }
}

fn max_items_diagnostic(path: &Path, max_items: u64, elements: usize) -> Diagnostic {
    Diagnostic::attribute_error(
        path.clone(),
        "Extra Block Configuration",
        format!(
            "The configuration should declare a maximum of {}, however {elements} blocks were configured.",
            blocks_phrase(max_items)
        ),
    )
}

fn min_items_diagnostic(path: &Path, min_items: u64, elements: usize) -> Diagnostic {
    let configured = if elements == 1 {
        "1 block was".to_string()
    } else {
        format!("{elements} blocks were")
    };
    Diagnostic::attribute_error(
        path.clone(),
        "Missing Block Configuration",
        format!(
            "The configuration should declare a minimum of {}, however {configured} configured.",
            blocks_phrase(min_items)
        ),
    )
}

fn validate_block_children(
    block: &Block,
    request: &ValidateAttributeRequest<'_>,
    path: &Path,
    path_expression: &PathExpression,
) -> Diagnostics {
    let mut diags = Diagnostics::new();
    for (name, attribute) in block.attributes() {
        let child = request.child(path.at_name(name.as_str()), path_expression.at_name(name.as_str()));
        diags.append(attribute_validate(attribute, &child));
    }
    for (name, nested) in block.blocks() {
        let child = request.child(path.at_name(name.as_str()), path_expression.at_name(name.as_str()));
        diags.append(block_validate(nested, &child));
    }
    diags
}

/// Validate one block, its element objects, and everything nested in
/// them, then check the item-count limits and deprecation.
pub fn block_validate(block: &Block, request: &ValidateAttributeRequest<'_>) -> Diagnostics {
    let span = debug_span!("block_validate", path = %request.path);
    let _guard = span.enter();

    let mut diags = Diagnostics::new();

    let (value, lookup) = resolve_value(request);
    let failed = lookup.has_error();
    diags.append(lookup);
    let Some(value) = value.filter(|_| !failed) else {
        return diags;
    };

    let request = request.clone().with_config_value(value.clone());
    diags.append(run_legacy_validators(block.legacy_validators(), &request));
    if let Some(validators) = block.validators() {
        diags.append(validate_block_kinds(validators, &request, &value));
    }

    let element_type = Type::Object(block.object_types());
    let object_validators = block.object_validators();
    let path = &request.path;
    let expression = &request.path_expression;

    let (count, unknown) = match block.nesting_mode() {
        BlockNestingMode::List => {
            let (list, conversion) = coerce_list_value(Walk::Block, path, &value, &element_type);
            let failed = conversion.has_error();
            diags.append(conversion);
            if failed {
                return diags;
            }
            for index in 0..list.len() {
                let element_path = path.at_list_index(index);
                let element_expression = expression.at_list_index(index);
                if !object_validators.is_empty() {
                    diags.append(validate_element_object(
                        object_validators,
                        request.config,
                        &element_path,
                        &element_expression,
                        list_elem_object(Walk::Block, &element_path, &list, index),
                    ));
                }
                diags.append(validate_block_children(
                    block,
                    &request,
                    &element_path,
                    &element_expression,
                ));
            }
            (list.len(), list.is_unknown())
        }
        BlockNestingMode::Set => {
            let (set, conversion) = coerce_set_value(Walk::Block, path, &value, &element_type);
            let failed = conversion.has_error();
            diags.append(conversion);
            if failed {
                return diags;
            }
            for element in set.elements() {
                let element_path = path.at_set_value(element.clone());
                let element_expression = expression.at_set_value(element.clone());
                if !object_validators.is_empty() {
                    diags.append(validate_element_object(
                        object_validators,
                        request.config,
                        &element_path,
                        &element_expression,
                        set_elem_object(Walk::Block, &element_path, &set, element),
                    ));
                }
                diags.append(validate_block_children(
                    block,
                    &request,
                    &element_path,
                    &element_expression,
                ));
            }
            (set.len(), set.is_unknown())
        }
    };

    let max_items = block.max_items_limit();
    if max_items > 0 && count as u64 > max_items {
        diags.push(max_items_diagnostic(path, max_items, count));
    }

    // An unknown container may still resolve to enough elements.
    let min_items = block.min_items_limit();
    if min_items > 0 && (count as u64) < min_items && !unknown {
        diags.push(min_items_diagnostic(path, min_items, count));
    }

    // Unlike attributes, an unknown block value still warns.
    if let Some(message) = block.deprecation_message() {
        if !value.to_wire().is_null() {
            diags.add_attribute_warning(path.clone(), "Block Deprecated", message);
        }
    }

    diags
}
