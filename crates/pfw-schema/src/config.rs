//! # Configuration Snapshot
//!
//! A [`Config`] pairs a schema with the raw wire value of one
//! configuration. The engine reads it through [`ConfigAccessor`], which
//! resolves the value at a path and converts it into the representation
//! the schema declares for that path.
//!
//! ## Lookup Rules
//!
//! - A path the schema does not describe is a provider bug: "Data Read
//!   Error", no value.
//! - Walking through a null ancestor yields a null of the target type;
//!   through an unknown ancestor, an unknown of the target type.
//! - An absent list index, map key, set element, or object attribute
//!   yields a null of the target type.
//! - A wire value the declared (possibly custom) type rejects is a
//!   "Configuration Read Error", no value.

use std::sync::Arc;

use pfw_core::{Diagnostics, Path, PathStep, Value, ValueError};

use crate::schema::Schema;

/// Resolves configuration values by path.
pub trait ConfigAccessor {
    /// The value at `path`, or `None` together with an error diagnostic
    /// when it cannot be produced.
    fn value_at_path(&self, path: &Path) -> (Option<Value>, Diagnostics);
}

/// An immutable configuration snapshot governed by a schema.
#[derive(Debug, Clone)]
pub struct Config {
    schema: Arc<Schema>,
    raw: Value,
}

impl Config {
    /// A snapshot over a root wire value of the schema's object type.
    pub fn new(schema: Arc<Schema>, raw: Value) -> Self {
        Self { schema, raw }
    }

    /// Read a JSON document as the root value of `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError`] when the document does not fit the schema
    /// type.
    pub fn from_json(schema: Arc<Schema>, json: &serde_json::Value) -> Result<Self, ValueError> {
        let raw = Value::from_json(json, &schema.schema_type())?;
        Ok(Self::new(schema, raw))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

fn child_value(parent: &Value, step: &PathStep) -> Option<Value> {
    match (parent.to_wire(), step) {
        (Value::Object(object), PathStep::AttributeName(name)) => object.get(name).cloned(),
        (Value::List(list), PathStep::ElementKeyInt(index)) => list.elements().get(*index).cloned(),
        (Value::Map(map), PathStep::ElementKeyString(key)) => map.get(key).cloned(),
        (Value::Set(set), PathStep::ElementKeyValue(wanted)) => {
            let wanted = wanted.to_wire();
            set.elements().iter().find(|element| **element == wanted).cloned()
        }
        _ => None,
    }
}

impl ConfigAccessor for Config {
    fn value_at_path(&self, path: &Path) -> (Option<Value>, Diagnostics) {
        let mut diags = Diagnostics::new();

        let declared = match self.schema.type_at_path(path) {
            Ok(ty) => ty,
            Err(err) => {
                diags.add_attribute_error(
                    path.clone(),
                    "Data Read Error",
                    format!(
                        "An unexpected error was encountered trying to retrieve type information at a given path. \
                         This is always an error in the provider. Please report the following to the provider developer:\n\n\
                         Error: {err}"
                    ),
                );
                return (None, diags);
            }
        };

        let mut current = self.raw.clone();
        let mut current_type = self.schema.schema_type();
        for step in path.steps() {
            let Some(step_type) = current_type.at_step(step) else {
                break;
            };
            current = if current.is_null() {
                step_type.null_value()
            } else if current.is_unknown() {
                step_type.unknown_value()
            } else {
                child_value(&current, step).unwrap_or_else(|| step_type.null_value())
            };
            current_type = step_type;
        }

        match declared.value_from_wire(current) {
            Ok(value) => (Some(value), diags),
            Err(err) => {
                diags.add_attribute_error(
                    path.clone(),
                    "Configuration Read Error",
                    format!(
                        "An unexpected error was encountered trying to convert an attribute value from the configuration. \
                         This is always an error in the provider. Please report the following to the provider developer:\n\n\
                         Error: {err}"
                    ),
                );
                (None, diags)
            }
        }
    }
}
