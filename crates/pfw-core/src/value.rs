//! # Dynamic and Per-Kind Values
//!
//! [`Value`] is the dynamic value handed out by the configuration accessor.
//! It is one of the canonical per-kind values, or a provider-defined
//! [`CustomValue`] layered over one.
//!
//! Every canonical value is in exactly one [`ValueState`]: null, unknown
//! (not yet resolvable, e.g. depends on another resource), or known.
//!
//! ## Kind Capabilities
//!
//! Kind-specific validators consume canonical values. A dynamic value can
//! feed a validator of kind K when it is "K-valuable": either it already is
//! the canonical K value, or it is a custom value whose `to_<kind>_value`
//! conversion is provided. [`Valuable::from_valuable`] performs that check
//! and conversion in one step, returning `None` when the capability is
//! missing.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::diag::Diagnostics;
use crate::error::ValueError;
use crate::types::{CustomType, Type};

/// Null, unknown, or known content.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueState<T> {
    Null,
    Unknown,
    Known(T),
}

impl<T> ValueState<T> {
    pub fn is_null(&self) -> bool {
        matches!(self, ValueState::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ValueState::Unknown)
    }

    /// The known content, if any.
    pub fn known(&self) -> Option<&T> {
        match self {
            ValueState::Known(value) => Some(value),
            _ => None,
        }
    }
}

// ─── Scalars ─────────────────────────────────────────────────────────

macro_rules! scalar_value {
    ($(#[$meta:meta])* $name:ident, $inner:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name(ValueState<$inner>);

        impl $name {
            /// A known value.
            pub fn new(value: impl Into<$inner>) -> Self {
                Self(ValueState::Known(value.into()))
            }

            pub fn null() -> Self {
                Self(ValueState::Null)
            }

            pub fn unknown() -> Self {
                Self(ValueState::Unknown)
            }

            pub fn is_null(&self) -> bool {
                self.0.is_null()
            }

            pub fn is_unknown(&self) -> bool {
                self.0.is_unknown()
            }

            /// The known content, or `None` when null or unknown.
            pub fn value(&self) -> Option<&$inner> {
                self.0.known()
            }

            pub fn state(&self) -> &ValueState<$inner> {
                &self.0
            }
        }
    };
}

scalar_value!(
    /// Canonical boolean value.
    BoolValue,
    bool
);
scalar_value!(
    /// Canonical 64-bit float value.
    Float64Value,
    f64
);
scalar_value!(
    /// Canonical 64-bit integer value.
    Int64Value,
    i64
);
scalar_value!(
    /// Canonical arbitrary number value, carried as a JSON number.
    NumberValue,
    serde_json::Number
);
scalar_value!(
    /// Canonical string value.
    StringValue,
    String
);

// ─── Collections ─────────────────────────────────────────────────────

fn check_element(element_type: &Type, value: &Value) -> Result<(), ValueError> {
    if element_type.accepts(value) {
        Ok(())
    } else {
        Err(ValueError::TypeMismatch {
            expected: element_type.to_string(),
            found: format!("{}<{}>", value.type_of(), value),
        })
    }
}

/// Canonical ordered list value.
#[derive(Debug, Clone, PartialEq)]
pub struct ListValue {
    element_type: Type,
    state: ValueState<Vec<Value>>,
}

impl ListValue {
    /// A known list.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::TypeMismatch`] if any element does not have
    /// `element_type`.
    pub fn new(element_type: Type, elements: Vec<Value>) -> Result<Self, ValueError> {
        for element in &elements {
            check_element(&element_type, element)?;
        }
        Ok(Self {
            element_type,
            state: ValueState::Known(elements),
        })
    }

    pub fn null(element_type: Type) -> Self {
        Self {
            element_type,
            state: ValueState::Null,
        }
    }

    pub fn unknown(element_type: Type) -> Self {
        Self {
            element_type,
            state: ValueState::Unknown,
        }
    }

    pub fn element_type(&self) -> &Type {
        &self.element_type
    }

    /// Elements of a known list; empty when null or unknown.
    pub fn elements(&self) -> &[Value] {
        self.state.known().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.elements().len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements().is_empty()
    }

    pub fn is_null(&self) -> bool {
        self.state.is_null()
    }

    pub fn is_unknown(&self) -> bool {
        self.state.is_unknown()
    }
}

/// Canonical set value. Elements are unique by value equality and kept
/// in the order they were supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct SetValue {
    element_type: Type,
    state: ValueState<Vec<Value>>,
}

impl SetValue {
    /// A known set.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::TypeMismatch`] for an element of the wrong type
    /// and [`ValueError::DuplicateSetElement`] for value-equal elements.
    pub fn new(element_type: Type, elements: Vec<Value>) -> Result<Self, ValueError> {
        for (i, element) in elements.iter().enumerate() {
            check_element(&element_type, element)?;
            if elements[..i].contains(element) {
                return Err(ValueError::DuplicateSetElement(element.to_string()));
            }
        }
        Ok(Self {
            element_type,
            state: ValueState::Known(elements),
        })
    }

    pub fn null(element_type: Type) -> Self {
        Self {
            element_type,
            state: ValueState::Null,
        }
    }

    pub fn unknown(element_type: Type) -> Self {
        Self {
            element_type,
            state: ValueState::Unknown,
        }
    }

    pub fn element_type(&self) -> &Type {
        &self.element_type
    }

    /// Elements of a known set; empty when null or unknown.
    pub fn elements(&self) -> &[Value] {
        self.state.known().map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns true if a known set holds an element equal to `value`.
    pub fn contains(&self, value: &Value) -> bool {
        self.elements().contains(value)
    }

    pub fn len(&self) -> usize {
        self.elements().len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements().is_empty()
    }

    pub fn is_null(&self) -> bool {
        self.state.is_null()
    }

    pub fn is_unknown(&self) -> bool {
        self.state.is_unknown()
    }
}

/// Canonical map value with string keys, iterated in key order.
#[derive(Debug, Clone, PartialEq)]
pub struct MapValue {
    element_type: Type,
    state: ValueState<BTreeMap<String, Value>>,
}

impl MapValue {
    /// A known map.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::TypeMismatch`] if any element does not have
    /// `element_type`.
    pub fn new(element_type: Type, elements: BTreeMap<String, Value>) -> Result<Self, ValueError> {
        for element in elements.values() {
            check_element(&element_type, element)?;
        }
        Ok(Self {
            element_type,
            state: ValueState::Known(elements),
        })
    }

    pub fn null(element_type: Type) -> Self {
        Self {
            element_type,
            state: ValueState::Null,
        }
    }

    pub fn unknown(element_type: Type) -> Self {
        Self {
            element_type,
            state: ValueState::Unknown,
        }
    }

    pub fn element_type(&self) -> &Type {
        &self.element_type
    }

    /// Elements of a known map, or `None` when null or unknown.
    pub fn elements(&self) -> Option<&BTreeMap<String, Value>> {
        self.state.known()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.elements().and_then(|elements| elements.get(key))
    }

    /// Keys of a known map in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.elements()
            .into_iter()
            .flat_map(|elements| elements.keys().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.elements().map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_null(&self) -> bool {
        self.state.is_null()
    }

    pub fn is_unknown(&self) -> bool {
        self.state.is_unknown()
    }
}

/// Canonical object value: a fixed set of named, typed attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectValue {
    attribute_types: BTreeMap<String, Type>,
    state: ValueState<BTreeMap<String, Value>>,
}

impl ObjectValue {
    /// A known object. Every declared attribute must be present (null is
    /// fine) and no undeclared attribute may appear.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::MissingAttribute`],
    /// [`ValueError::UnexpectedAttribute`], or [`ValueError::TypeMismatch`].
    pub fn new(
        attribute_types: BTreeMap<String, Type>,
        attributes: BTreeMap<String, Value>,
    ) -> Result<Self, ValueError> {
        if let Some(name) = attributes
            .keys()
            .find(|name| !attribute_types.contains_key(*name))
        {
            return Err(ValueError::UnexpectedAttribute(name.clone()));
        }
        for (name, ty) in &attribute_types {
            let value = attributes
                .get(name)
                .ok_or_else(|| ValueError::MissingAttribute(name.clone()))?;
            check_element(ty, value)?;
        }
        Ok(Self {
            attribute_types,
            state: ValueState::Known(attributes),
        })
    }

    pub fn null(attribute_types: BTreeMap<String, Type>) -> Self {
        Self {
            attribute_types,
            state: ValueState::Null,
        }
    }

    pub fn unknown(attribute_types: BTreeMap<String, Type>) -> Self {
        Self {
            attribute_types,
            state: ValueState::Unknown,
        }
    }

    pub fn attribute_types(&self) -> &BTreeMap<String, Type> {
        &self.attribute_types
    }

    /// Attributes of a known object, or `None` when null or unknown.
    pub fn attributes(&self) -> Option<&BTreeMap<String, Value>> {
        self.state.known()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes().and_then(|attributes| attributes.get(name))
    }

    pub fn is_null(&self) -> bool {
        self.state.is_null()
    }

    pub fn is_unknown(&self) -> bool {
        self.state.is_unknown()
    }
}

// ─── Custom Values ───────────────────────────────────────────────────

/// A provider-defined value representation.
///
/// The `to_<kind>_value` methods declare the kind capabilities of the
/// custom value. Each returns `None` by default, meaning the value cannot
/// feed validators of that kind; an implementation returns the canonical
/// value plus any conversion diagnostics.
pub trait CustomValue: fmt::Debug + Send + Sync {
    /// Runtime representation name, shown in type-mismatch diagnostics.
    fn type_name(&self) -> &str;

    fn custom_type(&self) -> Arc<dyn CustomType>;

    /// The canonical wire form of this value.
    fn to_wire(&self) -> Value;

    fn to_bool_value(&self) -> Option<(BoolValue, Diagnostics)> {
        None
    }

    fn to_float64_value(&self) -> Option<(Float64Value, Diagnostics)> {
        None
    }

    fn to_int64_value(&self) -> Option<(Int64Value, Diagnostics)> {
        None
    }

    fn to_number_value(&self) -> Option<(NumberValue, Diagnostics)> {
        None
    }

    fn to_string_value(&self) -> Option<(StringValue, Diagnostics)> {
        None
    }

    fn to_list_value(&self) -> Option<(ListValue, Diagnostics)> {
        None
    }

    fn to_set_value(&self) -> Option<(SetValue, Diagnostics)> {
        None
    }

    fn to_map_value(&self) -> Option<(MapValue, Diagnostics)> {
        None
    }

    fn to_object_value(&self) -> Option<(ObjectValue, Diagnostics)> {
        None
    }
}

// ─── Dynamic Value ───────────────────────────────────────────────────

/// A dynamic configuration value.
#[derive(Debug, Clone)]
pub enum Value {
    Bool(BoolValue),
    Float64(Float64Value),
    Int64(Int64Value),
    Number(NumberValue),
    String(StringValue),
    List(ListValue),
    Set(SetValue),
    Map(MapValue),
    Object(ObjectValue),
    Custom(Arc<dyn CustomValue>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        match self {
            Value::Bool(v) => v.is_null(),
            Value::Float64(v) => v.is_null(),
            Value::Int64(v) => v.is_null(),
            Value::Number(v) => v.is_null(),
            Value::String(v) => v.is_null(),
            Value::List(v) => v.is_null(),
            Value::Set(v) => v.is_null(),
            Value::Map(v) => v.is_null(),
            Value::Object(v) => v.is_null(),
            Value::Custom(v) => v.to_wire().is_null(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        match self {
            Value::Bool(v) => v.is_unknown(),
            Value::Float64(v) => v.is_unknown(),
            Value::Int64(v) => v.is_unknown(),
            Value::Number(v) => v.is_unknown(),
            Value::String(v) => v.is_unknown(),
            Value::List(v) => v.is_unknown(),
            Value::Set(v) => v.is_unknown(),
            Value::Map(v) => v.is_unknown(),
            Value::Object(v) => v.is_unknown(),
            Value::Custom(v) => v.to_wire().is_unknown(),
        }
    }

    pub fn type_of(&self) -> Type {
        match self {
            Value::Bool(_) => Type::Bool,
            Value::Float64(_) => Type::Float64,
            Value::Int64(_) => Type::Int64,
            Value::Number(_) => Type::Number,
            Value::String(_) => Type::String,
            Value::List(v) => Type::List(Box::new(v.element_type().clone())),
            Value::Set(v) => Type::Set(Box::new(v.element_type().clone())),
            Value::Map(v) => Type::Map(Box::new(v.element_type().clone())),
            Value::Object(v) => Type::Object(v.attribute_types().clone()),
            Value::Custom(v) => Type::Custom(v.custom_type()),
        }
    }

    /// Name of the runtime representation, for diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Bool(_) => "BoolValue",
            Value::Float64(_) => "Float64Value",
            Value::Int64(_) => "Int64Value",
            Value::Number(_) => "NumberValue",
            Value::String(_) => "StringValue",
            Value::List(_) => "ListValue",
            Value::Set(_) => "SetValue",
            Value::Map(_) => "MapValue",
            Value::Object(_) => "ObjectValue",
            Value::Custom(v) => v.type_name(),
        }
    }

    /// The canonical wire form; custom values unwrap, others are cloned.
    pub fn to_wire(&self) -> Value {
        match self {
            Value::Custom(v) => v.to_wire(),
            other => other.clone(),
        }
    }

    /// Read a JSON document as a known wire value of type `ty`.
    ///
    /// JSON `null` becomes a typed null at any depth. Object attributes
    /// absent from the document are null. Custom types are read as their
    /// underlying wire type.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Json`] when the JSON kind does not fit `ty`,
    /// [`ValueError::UnexpectedAttribute`] for undeclared object keys, and
    /// [`ValueError::DuplicateSetElement`] when an array read as a set
    /// holds equal elements. Configuration documents never carry duplicate
    /// set elements, so they are rejected rather than merged.
    pub fn from_json(json: &serde_json::Value, ty: &Type) -> Result<Value, ValueError> {
        use serde_json::Value as Json;

        let ty = ty.wire_type();
        if json.is_null() {
            return Ok(ty.null_value());
        }
        let mismatch = || ValueError::Json {
            expected: ty.to_string(),
            found: json_kind(json).to_string(),
        };
        match (&ty, json) {
            (Type::Bool, Json::Bool(b)) => Ok(Value::Bool(BoolValue::new(*b))),
            (Type::Float64, Json::Number(n)) => n
                .as_f64()
                .map(|f| Value::Float64(Float64Value::new(f)))
                .ok_or_else(mismatch),
            (Type::Int64, Json::Number(n)) => n
                .as_i64()
                .map(|i| Value::Int64(Int64Value::new(i)))
                .ok_or_else(mismatch),
            (Type::Number, Json::Number(n)) => Ok(Value::Number(NumberValue::new(n.clone()))),
            (Type::String, Json::String(s)) => Ok(Value::String(StringValue::new(s.as_str()))),
            (Type::List(element), Json::Array(items)) => {
                let elements = read_json_items(items, element)?;
                ListValue::new((**element).clone(), elements).map(Value::List)
            }
            (Type::Set(element), Json::Array(items)) => {
                let elements = read_json_items(items, element)?;
                SetValue::new((**element).clone(), elements).map(Value::Set)
            }
            (Type::Map(element), Json::Object(entries)) => {
                let elements = entries
                    .iter()
                    .map(|(key, item)| Ok((key.clone(), Value::from_json(item, element)?)))
                    .collect::<Result<BTreeMap<_, _>, ValueError>>()?;
                MapValue::new((**element).clone(), elements).map(Value::Map)
            }
            (Type::Object(attribute_types), Json::Object(entries)) => {
                if let Some(key) = entries.keys().find(|k| !attribute_types.contains_key(*k)) {
                    return Err(ValueError::UnexpectedAttribute(key.clone()));
                }
                let attributes = attribute_types
                    .iter()
                    .map(|(name, attribute_type)| {
                        let value = match entries.get(name) {
                            Some(item) => Value::from_json(item, attribute_type)?,
                            None => attribute_type.null_value(),
                        };
                        Ok((name.clone(), value))
                    })
                    .collect::<Result<BTreeMap<_, _>, ValueError>>()?;
                ObjectValue::new(attribute_types.clone(), attributes).map(Value::Object)
            }
            _ => Err(mismatch()),
        }
    }
}

fn read_json_items(items: &[serde_json::Value], element: &Type) -> Result<Vec<Value>, ValueError> {
    items
        .iter()
        .map(|item| Value::from_json(item, element))
        .collect()
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Float64(a), Value::Float64(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Custom(a), Value::Custom(b)) => {
                a.custom_type().name() == b.custom_type().name() && a.to_wire() == b.to_wire()
            }
            _ => false,
        }
    }
}

fn fmt_state<T>(
    f: &mut fmt::Formatter<'_>,
    state: &ValueState<T>,
    known: impl FnOnce(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    match state {
        ValueState::Null => f.write_str("<null>"),
        ValueState::Unknown => f.write_str("<unknown>"),
        ValueState::Known(value) => known(f, value),
    }
}

fn fmt_elements(f: &mut fmt::Formatter<'_>, elements: &[Value]) -> fmt::Result {
    f.write_str("[")?;
    for (i, element) in elements.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{element}")?;
    }
    f.write_str("]")
}

fn fmt_entries(f: &mut fmt::Formatter<'_>, entries: &BTreeMap<String, Value>) -> fmt::Result {
    f.write_str("{")?;
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{key:?}:{value}")?;
    }
    f.write_str("}")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => fmt_state(f, v.state(), |f, b| write!(f, "{b}")),
            Value::Float64(v) => fmt_state(f, v.state(), |f, n| write!(f, "{n}")),
            Value::Int64(v) => fmt_state(f, v.state(), |f, n| write!(f, "{n}")),
            Value::Number(v) => fmt_state(f, v.state(), |f, n| write!(f, "{n}")),
            Value::String(v) => fmt_state(f, v.state(), |f, s| write!(f, "{s:?}")),
            Value::List(v) => fmt_state(f, &v.state, |f, e| fmt_elements(f, e)),
            Value::Set(v) => fmt_state(f, &v.state, |f, e| fmt_elements(f, e)),
            Value::Map(v) => fmt_state(f, &v.state, |f, e| fmt_entries(f, e)),
            Value::Object(v) => fmt_state(f, &v.state, |f, e| fmt_entries(f, e)),
            Value::Custom(v) => write!(f, "{}", v.to_wire()),
        }
    }
}

// ─── Kind Capabilities ───────────────────────────────────────────────

/// A canonical per-kind value that dynamic values may be converted to.
pub trait Valuable: Sized + Clone + fmt::Debug + Send + Sync + 'static {
    /// Kind name used in diagnostics and logs, e.g. `"Bool"`.
    const KIND: &'static str;

    /// Convert `value` to this kind. `None` means the value lacks the
    /// capability; `Some` carries the converted value and any diagnostics
    /// the conversion produced.
    fn from_valuable(value: &Value) -> Option<(Self, Diagnostics)>;

    fn is_null(&self) -> bool;

    fn is_unknown(&self) -> bool;
}

macro_rules! valuable {
    ($ty:ident, $kind:literal, $variant:ident, $convert:ident) => {
        impl Valuable for $ty {
            const KIND: &'static str = $kind;

            fn from_valuable(value: &Value) -> Option<(Self, Diagnostics)> {
                match value {
                    Value::$variant(v) => Some((v.clone(), Diagnostics::new())),
                    Value::Custom(custom) => custom.$convert(),
                    _ => None,
                }
            }

            fn is_null(&self) -> bool {
                $ty::is_null(self)
            }

            fn is_unknown(&self) -> bool {
                $ty::is_unknown(self)
            }
        }
    };
}

valuable!(BoolValue, "Bool", Bool, to_bool_value);
valuable!(Float64Value, "Float64", Float64, to_float64_value);
valuable!(Int64Value, "Int64", Int64, to_int64_value);
valuable!(NumberValue, "Number", Number, to_number_value);
valuable!(StringValue, "String", String, to_string_value);
valuable!(ListValue, "List", List, to_list_value);
valuable!(SetValue, "Set", Set, to_set_value);
valuable!(MapValue, "Map", Map, to_map_value);
valuable!(ObjectValue, "Object", Object, to_object_value);
