use std::collections::BTreeMap;

use pfw_core::{Diagnostics, Path, PathExpression, Type};

use super::attribute::attribute_validate;
use super::kinds::validate_element_object;
use super::resolve_value;
use crate::coerce::{
    coerce_list_value, coerce_map_value, coerce_object_value, coerce_set_value, list_elem_object,
    map_elem_object, set_elem_object, Walk,
};
use crate::schema::{Attribute, NestingMode};
use crate::validator::ValidateAttributeRequest;

fn validate_children(
    attributes: &BTreeMap<String, Attribute>,
    request: &ValidateAttributeRequest<'_>,
    path: &Path,
    path_expression: &PathExpression,
) -> Diagnostics {
    let mut diags = Diagnostics::new();
    for (name, attribute) in attributes {
        let child = request.child(path.at_name(name.as_str()), path_expression.at_name(name.as_str()));
        diags.append(attribute_validate(attribute, &child));
    }
    diags
}

/// Walk the nested attributes of `attribute`, validating every child
/// attribute of every element object.
///
/// Returns nothing for an attribute without nested attributes. A
/// container value of the wrong kind yields one error and stops the walk
/// of this attribute.
pub fn nested_attribute_validate(
    attribute: &Attribute,
    request: &ValidateAttributeRequest<'_>,
) -> Diagnostics {
    let mut diags = Diagnostics::new();
    let nested = attribute.nested_attributes();
    if nested.is_empty() {
        return diags;
    }

    let mode = attribute.nesting_mode();
    if mode == NestingMode::Unknown {
        diags.add_attribute_error(
            request.path.clone(),
            "Attribute Validation Error",
            format!(
                "Attribute validation cannot walk schema. Report this to the provider developer:\n\n\
                 unknown attribute validation nesting mode ({mode}) at path: {}",
                request.path
            ),
        );
        return diags;
    }

    let (value, lookup) = resolve_value(request);
    let failed = lookup.has_error();
    diags.append(lookup);
    let Some(value) = value.filter(|_| !failed) else {
        return diags;
    };

    let object_types = attribute.nested_object_types();
    let element_type = Type::Object(object_types.clone());
    let object_validators = attribute.object_validators();
    let path = &request.path;
    let expression = &request.path_expression;

    match mode {
        NestingMode::List => {
            let (list, conversion) = coerce_list_value(Walk::Attribute, path, &value, &element_type);
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
                        list_elem_object(Walk::Attribute, &element_path, &list, index),
                    ));
                }
                diags.append(validate_children(nested, request, &element_path, &element_expression));
            }
        }
        NestingMode::Set => {
            let (set, conversion) = coerce_set_value(Walk::Attribute, path, &value, &element_type);
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
                        set_elem_object(Walk::Attribute, &element_path, &set, element),
                    ));
                }
                diags.append(validate_children(nested, request, &element_path, &element_expression));
            }
        }
        NestingMode::Map => {
            let (map, conversion) = coerce_map_value(Walk::Attribute, path, &value, &element_type);
            let failed = conversion.has_error();
            diags.append(conversion);
            if failed {
                return diags;
            }
            for key in map.keys() {
                let element_path = path.at_map_key(key);
                let element_expression = expression.at_map_key(key);
                if !object_validators.is_empty() {
                    diags.append(validate_element_object(
                        object_validators,
                        request.config,
                        &element_path,
                        &element_expression,
                        map_elem_object(Walk::Attribute, &element_path, &map, key),
                    ));
                }
                diags.append(validate_children(nested, request, &element_path, &element_expression));
            }
        }
        NestingMode::Single => {
            let (object, conversion) = coerce_object_value(Walk::Attribute, path, &value, &object_types);
            let failed = conversion.has_error();
            diags.append(conversion);
            if failed || object.is_null() || object.is_unknown() {
                return diags;
            }
            if !object_validators.is_empty() {
                diags.append(validate_element_object(
                    object_validators,
                    request.config,
                    path,
                    expression,
                    (object, Diagnostics::new()),
                ));
            }
            diags.append(validate_children(nested, request, path, expression));
        }
        NestingMode::Unknown => {}
    }

    diags
}
