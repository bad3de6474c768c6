//! # Value Types
//!
//! [`Type`] describes the shape of a value: a scalar kind, a collection with
//! an element type, an object with named attribute types, or a custom type
//! layered over one of those.
//!
//! Types serve two purposes in validation:
//!
//! - Synthesizing kind-correct placeholders. When a path walks through a
//!   null or unknown ancestor, or names an absent element, the result is a
//!   null or unknown value of the type found at that path.
//! - Converting wire values into the representation the schema declares
//!   ([`Type::value_from_wire`]), which is where custom types take over.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ValueError;
use crate::path::PathStep;
use crate::value::{
    BoolValue, Float64Value, Int64Value, ListValue, MapValue, NumberValue, ObjectValue, SetValue,
    StringValue, Value,
};

/// A provider-defined type layered over a canonical wire type.
pub trait CustomType: fmt::Debug + Send + Sync {
    /// Name used when rendering the type and comparing custom types.
    fn name(&self) -> &str;

    /// The canonical type the custom type is carried as on the wire.
    fn underlying(&self) -> Type;

    /// Wrap a canonical wire value (of the underlying type) into the
    /// custom value representation.
    fn value_from_wire(&self, wire: Value) -> Result<Value, ValueError>;
}

/// Shape of a value.
#[derive(Debug, Clone)]
pub enum Type {
    Bool,
    Float64,
    Int64,
    Number,
    String,
    List(Box<Type>),
    Set(Box<Type>),
    Map(Box<Type>),
    Object(BTreeMap<String, Type>),
    Custom(Arc<dyn CustomType>),
}

impl Type {
    pub fn list_of(element: Type) -> Self {
        Type::List(Box::new(element))
    }

    pub fn set_of(element: Type) -> Self {
        Type::Set(Box::new(element))
    }

    pub fn map_of(element: Type) -> Self {
        Type::Map(Box::new(element))
    }

    /// An object type from `(name, type)` pairs.
    pub fn object<I, K>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, Type)>,
        K: Into<String>,
    {
        Type::Object(
            attributes
                .into_iter()
                .map(|(name, ty)| (name.into(), ty))
                .collect(),
        )
    }

    /// The type values of this type travel as on the wire: custom types
    /// are replaced by their underlying type at every depth.
    pub fn wire_type(&self) -> Type {
        match self {
            Type::List(element) => Type::list_of(element.wire_type()),
            Type::Set(element) => Type::set_of(element.wire_type()),
            Type::Map(element) => Type::map_of(element.wire_type()),
            Type::Object(attributes) => Type::Object(wire_attributes(attributes)),
            Type::Custom(custom) => custom.underlying().wire_type(),
            other => other.clone(),
        }
    }

    /// Strips custom layers from the outermost type only. Element and
    /// attribute types keep their declared form.
    pub fn canonical(&self) -> Type {
        match self {
            Type::Custom(custom) => custom.underlying().canonical(),
            other => other.clone(),
        }
    }

    /// Wire-level null of this type.
    pub fn null_value(&self) -> Value {
        match self {
            Type::Bool => Value::Bool(BoolValue::null()),
            Type::Float64 => Value::Float64(Float64Value::null()),
            Type::Int64 => Value::Int64(Int64Value::null()),
            Type::Number => Value::Number(NumberValue::null()),
            Type::String => Value::String(StringValue::null()),
            Type::List(element) => Value::List(ListValue::null(element.wire_type())),
            Type::Set(element) => Value::Set(SetValue::null(element.wire_type())),
            Type::Map(element) => Value::Map(MapValue::null(element.wire_type())),
            Type::Object(attributes) => {
                Value::Object(ObjectValue::null(wire_attributes(attributes)))
            }
            Type::Custom(custom) => custom.underlying().null_value(),
        }
    }

    /// Wire-level unknown of this type.
    pub fn unknown_value(&self) -> Value {
        match self {
            Type::Bool => Value::Bool(BoolValue::unknown()),
            Type::Float64 => Value::Float64(Float64Value::unknown()),
            Type::Int64 => Value::Int64(Int64Value::unknown()),
            Type::Number => Value::Number(NumberValue::unknown()),
            Type::String => Value::String(StringValue::unknown()),
            Type::List(element) => Value::List(ListValue::unknown(element.wire_type())),
            Type::Set(element) => Value::Set(SetValue::unknown(element.wire_type())),
            Type::Map(element) => Value::Map(MapValue::unknown(element.wire_type())),
            Type::Object(attributes) => {
                Value::Object(ObjectValue::unknown(wire_attributes(attributes)))
            }
            Type::Custom(custom) => custom.underlying().unknown_value(),
        }
    }

    /// Returns true if `value` has exactly this type.
    pub fn accepts(&self, value: &Value) -> bool {
        value.type_of() == *self
    }

    /// Convert a canonical wire value into this type's representation.
    ///
    /// Canonical types accept a wire value of the same type unchanged.
    /// Custom types check the underlying type and then delegate to
    /// [`CustomType::value_from_wire`].
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::TypeMismatch`] if the wire value does not have
    /// the wire type, or whatever the custom type reports.
    pub fn value_from_wire(&self, wire: Value) -> Result<Value, ValueError> {
        let wire_type = self.wire_type();
        if !wire_type.accepts(&wire) {
            return Err(ValueError::TypeMismatch {
                expected: self.to_string(),
                found: format!("{}<{}>", wire.type_of(), wire),
            });
        }
        match self {
            Type::Custom(custom) => custom.value_from_wire(wire),
            _ => Ok(wire),
        }
    }

    /// Element type of a list, set, or map (through custom types).
    pub fn element_type(&self) -> Option<Type> {
        match self.canonical() {
            Type::List(element) | Type::Set(element) | Type::Map(element) => Some(*element),
            _ => None,
        }
    }

    /// Attribute type of an object (through custom types).
    pub fn attribute_type(&self, name: &str) -> Option<Type> {
        match self.canonical() {
            Type::Object(mut attributes) => attributes.remove(name),
            _ => None,
        }
    }

    /// The type reached by applying `step` to a value of this type, if the
    /// step is applicable.
    pub fn at_step(&self, step: &PathStep) -> Option<Type> {
        match (self.canonical(), step) {
            (Type::Object(mut attributes), PathStep::AttributeName(name)) => {
                attributes.remove(name)
            }
            (Type::List(element), PathStep::ElementKeyInt(_))
            | (Type::Set(element), PathStep::ElementKeyValue(_))
            | (Type::Map(element), PathStep::ElementKeyString(_)) => Some(*element),
            _ => None,
        }
    }
}

fn wire_attributes(attributes: &BTreeMap<String, Type>) -> BTreeMap<String, Type> {
    attributes
        .iter()
        .map(|(name, ty)| (name.clone(), ty.wire_type()))
        .collect()
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Bool, Type::Bool)
            | (Type::Float64, Type::Float64)
            | (Type::Int64, Type::Int64)
            | (Type::Number, Type::Number)
            | (Type::String, Type::String) => true,
            (Type::List(a), Type::List(b))
            | (Type::Set(a), Type::Set(b))
            | (Type::Map(a), Type::Map(b)) => a == b,
            (Type::Object(a), Type::Object(b)) => a == b,
            (Type::Custom(a), Type::Custom(b)) => a.name() == b.name(),
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => f.write_str("Bool"),
            Type::Float64 => f.write_str("Float64"),
            Type::Int64 => f.write_str("Int64"),
            Type::Number => f.write_str("Number"),
            Type::String => f.write_str("String"),
            Type::List(element) => write!(f, "List[{element}]"),
            Type::Set(element) => write!(f, "Set[{element}]"),
            Type::Map(element) => write!(f, "Map[{element}]"),
            Type::Object(attributes) => {
                f.write_str("Object{")?;
                for (i, (name, ty)) in attributes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {ty}")?;
                }
                f.write_str("}")
            }
            Type::Custom(custom) => f.write_str(custom.name()),
        }
    }
}
