//! # Value Coercion Helpers
//!
//! Kind assertions for container values met while walking nested
//! attributes and blocks, and element lookups that always produce an
//! object of the right shape.
//!
//! A failed assertion yields a null placeholder of the expected kind and
//! one walk-error diagnostic at the path being walked; callers treat that
//! as fatal for the node.

use std::collections::BTreeMap;

use pfw_core::{
    Diagnostic, Diagnostics, ListValue, MapValue, ObjectValue, Path, SetValue, Type, Valuable,
    Value,
};

/// Which part of the schema is being walked; selects diagnostic wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Attribute,
    Block,
}

impl Walk {
    pub fn title(self) -> &'static str {
        match self {
            Walk::Attribute => "Attribute",
            Walk::Block => "Block",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Walk::Attribute => "attribute",
            Walk::Block => "block",
        }
    }
}

/// Error for a value that lacks the `V`-valuable capability the walk needs.
pub fn walk_error<V: Valuable>(walk: Walk, path: &Path, value: &Value) -> Diagnostic {
    Diagnostic::attribute_error(
        path.clone(),
        format!("{} Validation Error Invalid Value Type", walk.title()),
        format!(
            "A value implementing the {}Valuable capability is expected here. \
             Report this to the provider developer:\n\n\
             unknown {} value type ({}) at path: {}",
            V::KIND,
            walk.noun(),
            value.type_name(),
            path
        ),
    )
}

fn coerce<V: Valuable>(
    walk: Walk,
    path: &Path,
    value: &Value,
    placeholder: impl FnOnce() -> V,
) -> (V, Diagnostics) {
    match V::from_valuable(value) {
        Some(converted) => converted,
        None => (
            placeholder(),
            Diagnostics::from(walk_error::<V>(walk, path, value)),
        ),
    }
}

pub fn coerce_list_value(
    walk: Walk,
    path: &Path,
    value: &Value,
    element_type: &Type,
) -> (ListValue, Diagnostics) {
    coerce(walk, path, value, || ListValue::null(element_type.clone()))
}

pub fn coerce_set_value(
    walk: Walk,
    path: &Path,
    value: &Value,
    element_type: &Type,
) -> (SetValue, Diagnostics) {
    coerce(walk, path, value, || SetValue::null(element_type.clone()))
}

pub fn coerce_map_value(
    walk: Walk,
    path: &Path,
    value: &Value,
    element_type: &Type,
) -> (MapValue, Diagnostics) {
    coerce(walk, path, value, || MapValue::null(element_type.clone()))
}

pub fn coerce_object_value(
    walk: Walk,
    path: &Path,
    value: &Value,
    attribute_types: &BTreeMap<String, Type>,
) -> (ObjectValue, Diagnostics) {
    coerce(walk, path, value, || ObjectValue::null(attribute_types.clone()))
}

fn element_attribute_types(element_type: &Type) -> BTreeMap<String, Type> {
    match element_type.canonical() {
        Type::Object(attribute_types) => attribute_types,
        _ => BTreeMap::new(),
    }
}

fn placeholder_object(
    walk: Walk,
    path: &Path,
    element_type: &Type,
    unknown: bool,
) -> (ObjectValue, Diagnostics) {
    let element = if unknown {
        element_type.unknown_value()
    } else {
        element_type.null_value()
    };
    coerce_object_value(walk, path, &element, &element_attribute_types(element_type))
}

/// Element `index` of `list` as an object. A null list or a missing
/// index gives a null object; an unknown list gives an unknown object.
pub fn list_elem_object(
    walk: Walk,
    path: &Path,
    list: &ListValue,
    index: usize,
) -> (ObjectValue, Diagnostics) {
    let element_type = list.element_type();
    if list.is_unknown() {
        return placeholder_object(walk, path, element_type, true);
    }
    match list.elements().get(index) {
        Some(element) => {
            coerce_object_value(walk, path, element, &element_attribute_types(element_type))
        }
        None => placeholder_object(walk, path, element_type, false),
    }
}

/// The element of `set` equal to `element`, as an object.
pub fn set_elem_object(
    walk: Walk,
    path: &Path,
    set: &SetValue,
    element: &Value,
) -> (ObjectValue, Diagnostics) {
    let element_type = set.element_type();
    if set.is_unknown() {
        return placeholder_object(walk, path, element_type, true);
    }
    match set.elements().iter().find(|e| *e == element) {
        Some(found) => coerce_object_value(walk, path, found, &element_attribute_types(element_type)),
        None => placeholder_object(walk, path, element_type, false),
    }
}

/// Element `key` of `map` as an object.
pub fn map_elem_object(
    walk: Walk,
    path: &Path,
    map: &MapValue,
    key: &str,
) -> (ObjectValue, Diagnostics) {
    let element_type = map.element_type();
    if map.is_unknown() {
        return placeholder_object(walk, path, element_type, true);
    }
    match map.get(key) {
        Some(element) => {
            coerce_object_value(walk, path, element, &element_attribute_types(element_type))
        }
        None => placeholder_object(walk, path, element_type, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pfw_core::{BoolValue, StringValue};

    fn object_type() -> Type {
        Type::object([("name", Type::String)])
    }

    fn object(name: &str) -> Value {
        let Type::Object(types) = object_type() else {
            unreachable!()
        };
        Value::Object(
            ObjectValue::new(
                types,
                BTreeMap::from([("name".to_string(), Value::String(StringValue::new(name)))]),
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_coerce_list_value_mismatch() {
        let path = Path::root("list");
        let (list, diags) = coerce_list_value(
            Walk::Attribute,
            &path,
            &Value::Bool(BoolValue::new(true)),
            &object_type(),
        );
        assert!(list.is_null());
        assert_eq!(list.element_type(), &object_type());
        let d = &diags.as_slice()[0];
        assert_eq!(d.summary(), "Attribute Validation Error Invalid Value Type");
        assert_eq!(
            d.detail(),
            "A value implementing the ListValuable capability is expected here. \
             Report this to the provider developer:\n\n\
             unknown attribute value type (BoolValue) at path: list"
        );
        assert_eq!(d.path(), Some(&path));
    }

    #[test]
    fn test_coerce_set_value_block_wording() {
        let (_, diags) = coerce_set_value(
            Walk::Block,
            &Path::root("b"),
            &Value::String(StringValue::new("x")),
            &object_type(),
        );
        assert_eq!(
            diags.as_slice()[0].summary(),
            "Block Validation Error Invalid Value Type"
        );
    }

    #[test]
    fn test_list_elem_object_known_and_missing() {
        let list = ListValue::new(object_type(), vec![object("a")]).unwrap();
        let path = Path::root("list").at_list_index(0);

        let (found, diags) = list_elem_object(Walk::Attribute, &path, &list, 0);
        assert!(diags.is_empty());
        assert_eq!(found.get("name"), Some(&Value::String(StringValue::new("a"))));

        let (missing, diags) = list_elem_object(Walk::Attribute, &path, &list, 4);
        assert!(diags.is_empty());
        assert!(missing.is_null());
    }

    #[test]
    fn test_elem_object_from_unknown_container() {
        let path = Path::root("m").at_map_key("k");
        let (value, diags) =
            map_elem_object(Walk::Attribute, &path, &MapValue::unknown(object_type()), "k");
        assert!(diags.is_empty());
        assert!(value.is_unknown());
    }

    #[test]
    fn test_set_elem_object_by_value() {
        let set = SetValue::new(object_type(), vec![object("a"), object("b")]).unwrap();
        let path = Path::root("s");
        let (value, _) = set_elem_object(Walk::Block, &path, &set, &object("b"));
        assert_eq!(value.get("name"), Some(&Value::String(StringValue::new("b"))));
        let (value, _) = set_elem_object(Walk::Block, &path, &set, &object("c"));
        assert!(value.is_null());
    }

    #[test]
    fn test_elem_object_non_object_element() {
        let list = ListValue::new(Type::String, vec![Value::String(StringValue::new("x"))]).unwrap();
        let (value, diags) = list_elem_object(Walk::Attribute, &Path::root("l"), &list, 0);
        assert!(value.is_null());
        assert!(diags.has_error());
    }
}
