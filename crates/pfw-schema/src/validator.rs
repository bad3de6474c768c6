//! # Validator Extension Points
//!
//! Providers plug validation logic into attributes in two ways:
//!
//! - **Per-kind validators.** A [`Validator<V>`] receives the attribute's
//!   value already converted to the canonical kind `V` (e.g.
//!   [`StringValue`]). An attribute carries at most one kind of these, held
//!   in the closed [`KindValidators`] table.
//! - **Legacy validators.** An [`AttributeValidator`] receives the dynamic
//!   value untouched. They run in addition to per-kind validators, so both
//!   may report on the same attribute.
//!
//! Every validator gets its own empty response. Validators can only add
//! diagnostics; they never see or remove each other's output.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use pfw_core::{
    BoolValue, Diagnostics, Float64Value, Int64Value, ListValue, MapValue, NumberValue,
    ObjectValue, Path, PathExpression, SetValue, StringValue, Value,
};

use crate::config::Config;

// ─── Per-Kind Validators ─────────────────────────────────────────────

/// Input to a per-kind validator.
#[derive(Debug, Clone)]
pub struct ValidatorRequest<'a, V> {
    /// The whole configuration, for validators that inspect siblings.
    pub config: &'a Config,
    /// The attribute value converted to the validator's kind.
    pub config_value: V,
    pub path: Path,
    pub path_expression: PathExpression,
}

/// Output of a validator: diagnostics only.
#[derive(Debug, Clone, Default)]
pub struct ValidatorResponse {
    pub diagnostics: Diagnostics,
}

/// Validation logic for values of kind `V`.
pub trait Validator<V>: Send + Sync {
    /// Plain-text description, used in logs and documentation.
    fn description(&self) -> String;

    /// Markdown description; defaults to the plain one.
    fn markdown_description(&self) -> String {
        self.description()
    }

    fn validate(&self, request: &ValidatorRequest<'_, V>, response: &mut ValidatorResponse);
}

pub type BoolValidator = dyn Validator<BoolValue>;
pub type Float64Validator = dyn Validator<Float64Value>;
pub type Int64Validator = dyn Validator<Int64Value>;
pub type NumberValidator = dyn Validator<NumberValue>;
pub type StringValidator = dyn Validator<StringValue>;
pub type ListValidator = dyn Validator<ListValue>;
pub type SetValidator = dyn Validator<SetValue>;
pub type MapValidator = dyn Validator<MapValue>;
pub type ObjectValidator = dyn Validator<ObjectValue>;

/// The per-kind validators of one attribute. Exactly one kind applies;
/// validators run in list order.
#[derive(Clone)]
pub enum KindValidators {
    Bool(Vec<Arc<BoolValidator>>),
    Float64(Vec<Arc<Float64Validator>>),
    Int64(Vec<Arc<Int64Validator>>),
    List(Vec<Arc<ListValidator>>),
    Map(Vec<Arc<MapValidator>>),
    Number(Vec<Arc<NumberValidator>>),
    Object(Vec<Arc<ObjectValidator>>),
    Set(Vec<Arc<SetValidator>>),
    String(Vec<Arc<StringValidator>>),
}

impl KindValidators {
    /// Name of the kind, e.g. `"String"`.
    pub fn kind(&self) -> &'static str {
        match self {
            KindValidators::Bool(_) => "Bool",
            KindValidators::Float64(_) => "Float64",
            KindValidators::Int64(_) => "Int64",
            KindValidators::List(_) => "List",
            KindValidators::Map(_) => "Map",
            KindValidators::Number(_) => "Number",
            KindValidators::Object(_) => "Object",
            KindValidators::Set(_) => "Set",
            KindValidators::String(_) => "String",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            KindValidators::Bool(v) => v.len(),
            KindValidators::Float64(v) => v.len(),
            KindValidators::Int64(v) => v.len(),
            KindValidators::List(v) => v.len(),
            KindValidators::Map(v) => v.len(),
            KindValidators::Number(v) => v.len(),
            KindValidators::Object(v) => v.len(),
            KindValidators::Set(v) => v.len(),
            KindValidators::String(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for KindValidators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(self.kind()).field(&self.len()).finish()
    }
}

/// Validators run against the whole value of a block. Blocks are lists
/// or sets of objects, so only these three kinds apply.
#[derive(Clone)]
pub enum BlockValidators {
    List(Vec<Arc<ListValidator>>),
    Object(Vec<Arc<ObjectValidator>>),
    Set(Vec<Arc<SetValidator>>),
}

impl BlockValidators {
    pub fn kind(&self) -> &'static str {
        match self {
            BlockValidators::List(_) => "List",
            BlockValidators::Object(_) => "Object",
            BlockValidators::Set(_) => "Set",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            BlockValidators::List(v) => v.len(),
            BlockValidators::Object(v) => v.len(),
            BlockValidators::Set(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for BlockValidators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(self.kind()).field(&self.len()).finish()
    }
}

/// A [`Validator`] backed by a closure. See [`validator_fn`].
pub struct FnValidator<V, F> {
    description: String,
    f: F,
    _kind: PhantomData<fn(V)>,
}

impl<V, F> Validator<V> for FnValidator<V, F>
where
    F: Fn(&ValidatorRequest<'_, V>, &mut ValidatorResponse) + Send + Sync,
{
    fn description(&self) -> String {
        self.description.clone()
    }

    fn validate(&self, request: &ValidatorRequest<'_, V>, response: &mut ValidatorResponse) {
        (self.f)(request, response);
    }
}

/// Build a validator from a description and a closure.
///
/// ```
/// use std::sync::Arc;
/// use pfw_core::StringValue;
/// use pfw_schema::{validator_fn, KindValidators};
///
/// let not_empty = validator_fn::<StringValue, _>("value must not be empty", |req, resp| {
///     if req.config_value.value().is_some_and(|s| s.is_empty()) {
///         resp.diagnostics.add_attribute_error(
///             req.path.clone(),
///             "Invalid Attribute Value",
///             "value must not be empty",
///         );
///     }
/// });
/// let validators = KindValidators::String(vec![Arc::new(not_empty)]);
/// assert_eq!(validators.kind(), "String");
/// ```
pub fn validator_fn<V, F>(description: impl Into<String>, f: F) -> FnValidator<V, F>
where
    F: Fn(&ValidatorRequest<'_, V>, &mut ValidatorResponse) + Send + Sync,
{
    FnValidator {
        description: description.into(),
        f,
        _kind: PhantomData,
    }
}

// ─── Legacy Validators ───────────────────────────────────────────────

/// Request shared by the engine entry points and legacy validators.
#[derive(Debug, Clone)]
pub struct ValidateAttributeRequest<'a> {
    pub path: Path,
    pub path_expression: PathExpression,
    pub config: &'a Config,
    /// Value at `path`. When `None` the engine resolves it from `config`.
    pub config_value: Option<Value>,
}

impl<'a> ValidateAttributeRequest<'a> {
    /// A request for `path` whose expression is the path itself.
    pub fn new(config: &'a Config, path: Path) -> Self {
        Self {
            path_expression: path.expression(),
            path,
            config,
            config_value: None,
        }
    }

    /// A request for a child position; the value is left unresolved.
    pub fn child(&self, path: Path, path_expression: PathExpression) -> Self {
        Self {
            path,
            path_expression,
            config: self.config,
            config_value: None,
        }
    }

    pub fn with_config_value(mut self, value: Value) -> Self {
        self.config_value = Some(value);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidateAttributeResponse {
    pub diagnostics: Diagnostics,
}

/// Untyped validator receiving the raw dynamic value.
pub trait AttributeValidator: Send + Sync {
    fn description(&self) -> String;

    fn markdown_description(&self) -> String {
        self.description()
    }

    fn validate(
        &self,
        request: &ValidateAttributeRequest<'_>,
        response: &mut ValidateAttributeResponse,
    );
}

/// An [`AttributeValidator`] backed by a closure.
pub struct FnAttributeValidator<F> {
    description: String,
    f: F,
}

impl<F> AttributeValidator for FnAttributeValidator<F>
where
    F: Fn(&ValidateAttributeRequest<'_>, &mut ValidateAttributeResponse) + Send + Sync,
{
    fn description(&self) -> String {
        self.description.clone()
    }

    fn validate(
        &self,
        request: &ValidateAttributeRequest<'_>,
        response: &mut ValidateAttributeResponse,
    ) {
        (self.f)(request, response);
    }
}

pub fn attribute_validator_fn<F>(description: impl Into<String>, f: F) -> FnAttributeValidator<F>
where
    F: Fn(&ValidateAttributeRequest<'_>, &mut ValidateAttributeResponse) + Send + Sync,
{
    FnAttributeValidator {
        description: description.into(),
        f,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;

    #[test]
    fn test_kind_validators_kind_and_len() {
        let v = validator_fn::<BoolValue, _>("noop", |_, _| {});
        let validators = KindValidators::Bool(vec![Arc::new(v)]);
        assert_eq!(validators.kind(), "Bool");
        assert_eq!(validators.len(), 1);
        assert_eq!(format!("{validators:?}"), "Bool(1)");
        assert!(KindValidators::Map(Vec::new()).is_empty());
    }

    #[test]
    fn test_block_validators_kind_and_len() {
        let v = validator_fn::<SetValue, _>("noop", |_, _| {});
        let validators = BlockValidators::Set(vec![Arc::new(v)]);
        assert_eq!(validators.kind(), "Set");
        assert_eq!(format!("{validators:?}"), "Set(1)");
        assert!(BlockValidators::Object(Vec::new()).is_empty());
    }

    #[test]
    fn test_validator_fn_runs_closure() {
        let config = Config::from_json(Arc::new(Schema::new()), &serde_json::json!({}))
            .expect("empty config");
        let v = validator_fn::<StringValue, _>("always fails", |req, resp| {
            resp.diagnostics
                .add_attribute_error(req.path.clone(), "Failed", "always");
        });
        let request = ValidatorRequest {
            config: &config,
            config_value: StringValue::new("x"),
            path: Path::root("name"),
            path_expression: PathExpression::root("name"),
        };
        let mut response = ValidatorResponse::default();
        v.validate(&request, &mut response);
        assert_eq!(response.diagnostics.error_count(), 1);
        assert_eq!(v.description(), "always fails");
        assert_eq!(v.markdown_description(), "always fails");
    }

    #[test]
    fn test_request_child_drops_value() {
        let config = Config::from_json(Arc::new(Schema::new()), &serde_json::json!({}))
            .expect("empty config");
        let request = ValidateAttributeRequest::new(&config, Path::root("a"))
            .with_config_value(Value::Bool(BoolValue::new(true)));
        let child = request.child(
            request.path.at_name("b"),
            request.path_expression.at_name("b"),
        );
        assert!(child.config_value.is_none());
        assert_eq!(child.path.to_string(), "a.b");
    }
}
