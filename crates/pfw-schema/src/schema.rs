//! # Schema Nodes
//!
//! An [`Attribute`] is either a typed configuration field or a container
//! of nested attributes; a [`Block`] is the older container form that
//! only nests as a list or set and carries item-count limits. A
//! [`Schema`] is the root: named top-level attributes and blocks.
//!
//! Children are kept in sorted maps, so every walk over a schema visits
//! names in the same order.
//!
//! Nodes are assembled with builder methods:
//!
//! ```
//! use pfw_core::Type;
//! use pfw_schema::{Attribute, Block, NestingMode, Schema};
//!
//! let schema = Schema::new()
//!     .with_attribute("name", Attribute::new(Type::String).required())
//!     .with_attribute(
//!         "ports",
//!         Attribute::nested(
//!             NestingMode::List,
//!             [("number", Attribute::new(Type::Int64).required())],
//!         )
//!         .optional(),
//!     )
//!     .with_block(
//!         "rule",
//!         Block::list()
//!             .with_attribute("action", Attribute::new(Type::String).optional())
//!             .max_items(2),
//!     );
//! assert!(schema.attribute("name").is_some());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use pfw_core::{Path, PathError, PathStep, Type};

use crate::validator::{AttributeValidator, BlockValidators, KindValidators, ObjectValidator};

/// How a nested attribute container maps onto the configuration value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NestingMode {
    /// No nesting declared.
    #[default]
    Unknown,
    /// One object.
    Single,
    /// List of objects, addressed by index.
    List,
    /// Set of objects, addressed by element value.
    Set,
    /// Map of objects, addressed by key.
    Map,
}

impl fmt::Display for NestingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NestingMode::Unknown => "Unknown",
            NestingMode::Single => "Single",
            NestingMode::List => "List",
            NestingMode::Set => "Set",
            NestingMode::Map => "Map",
        };
        f.write_str(name)
    }
}

/// How a block maps onto the configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockNestingMode {
    List,
    Set,
}

fn object_types(attributes: &BTreeMap<String, Attribute>) -> BTreeMap<String, Type> {
    attributes
        .iter()
        .filter_map(|(name, attribute)| attribute.attribute_type().map(|ty| (name.clone(), ty)))
        .collect()
}

// ─── Attribute ───────────────────────────────────────────────────────

/// A schema attribute.
#[derive(Clone, Default)]
pub struct Attribute {
    ty: Option<Type>,
    nested: BTreeMap<String, Attribute>,
    nesting_mode: NestingMode,
    required: bool,
    optional: bool,
    computed: bool,
    deprecation_message: Option<String>,
    validators: Option<KindValidators>,
    legacy_validators: Vec<Arc<dyn AttributeValidator>>,
    object_validators: Vec<Arc<ObjectValidator>>,
}

impl Attribute {
    /// A typed attribute.
    pub fn new(ty: Type) -> Self {
        Self {
            ty: Some(ty),
            ..Self::default()
        }
    }

    /// A container of nested attributes.
    pub fn nested<I, K>(nesting_mode: NestingMode, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, Attribute)>,
        K: Into<String>,
    {
        Self {
            nested: attributes
                .into_iter()
                .map(|(name, attribute)| (name.into(), attribute))
                .collect(),
            nesting_mode,
            ..Self::default()
        }
    }

    /// Add a nested attribute, leaving the nesting mode unchanged.
    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.nested.insert(name.into(), attribute);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn deprecated(mut self, message: impl Into<String>) -> Self {
        self.deprecation_message = Some(message.into());
        self
    }

    /// Set the per-kind validators. An attribute has at most one kind, so
    /// this replaces any previously set list.
    pub fn with_validators(mut self, validators: KindValidators) -> Self {
        self.validators = Some(validators);
        self
    }

    pub fn with_legacy_validator(mut self, validator: Arc<dyn AttributeValidator>) -> Self {
        self.legacy_validators.push(validator);
        self
    }

    /// Add a validator run against every nested object of this attribute.
    pub fn with_object_validator(mut self, validator: Arc<ObjectValidator>) -> Self {
        self.object_validators.push(validator);
        self
    }

    /// The declared type, ignoring nested attributes.
    pub fn declared_type(&self) -> Option<&Type> {
        self.ty.as_ref()
    }

    /// Value type of this attribute. For nested attributes the type is
    /// derived from the children and the nesting mode.
    pub fn attribute_type(&self) -> Option<Type> {
        if self.nested.is_empty() {
            return self.ty.clone();
        }
        let object = Type::Object(object_types(&self.nested));
        match self.nesting_mode {
            NestingMode::Unknown => self.ty.clone(),
            NestingMode::Single => Some(object),
            NestingMode::List => Some(Type::list_of(object)),
            NestingMode::Set => Some(Type::set_of(object)),
            NestingMode::Map => Some(Type::map_of(object)),
        }
    }

    /// Attribute types of one nested object.
    pub fn nested_object_types(&self) -> BTreeMap<String, Type> {
        object_types(&self.nested)
    }

    pub fn nested_attributes(&self) -> &BTreeMap<String, Attribute> {
        &self.nested
    }

    pub fn nesting_mode(&self) -> NestingMode {
        self.nesting_mode
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn is_computed(&self) -> bool {
        self.computed
    }

    pub fn deprecation_message(&self) -> Option<&str> {
        self.deprecation_message.as_deref()
    }

    pub fn validators(&self) -> Option<&KindValidators> {
        self.validators.as_ref()
    }

    pub fn legacy_validators(&self) -> &[Arc<dyn AttributeValidator>] {
        &self.legacy_validators
    }

    pub fn object_validators(&self) -> &[Arc<ObjectValidator>] {
        &self.object_validators
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("ty", &self.ty)
            .field("nesting_mode", &self.nesting_mode)
            .field("nested", &self.nested)
            .field("required", &self.required)
            .field("optional", &self.optional)
            .field("computed", &self.computed)
            .field("deprecation_message", &self.deprecation_message)
            .field("validators", &self.validators)
            .field("legacy_validators", &self.legacy_validators.len())
            .field("object_validators", &self.object_validators.len())
            .finish()
    }
}

// ─── Block ───────────────────────────────────────────────────────────

/// A schema block: a list or set of objects built from nested attributes
/// and nested blocks.
#[derive(Clone)]
pub struct Block {
    nesting_mode: BlockNestingMode,
    attributes: BTreeMap<String, Attribute>,
    blocks: BTreeMap<String, Block>,
    min_items: u64,
    max_items: u64,
    deprecation_message: Option<String>,
    validators: Option<BlockValidators>,
    legacy_validators: Vec<Arc<dyn AttributeValidator>>,
    object_validators: Vec<Arc<ObjectValidator>>,
}

impl Block {
    fn with_mode(nesting_mode: BlockNestingMode) -> Self {
        Self {
            nesting_mode,
            attributes: BTreeMap::new(),
            blocks: BTreeMap::new(),
            min_items: 0,
            max_items: 0,
            deprecation_message: None,
            validators: None,
            legacy_validators: Vec::new(),
            object_validators: Vec::new(),
        }
    }

    pub fn list() -> Self {
        Self::with_mode(BlockNestingMode::List)
    }

    pub fn set() -> Self {
        Self::with_mode(BlockNestingMode::Set)
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    pub fn with_block(mut self, name: impl Into<String>, block: Block) -> Self {
        self.blocks.insert(name.into(), block);
        self
    }

    /// Minimum number of elements; 0 disables the check.
    pub fn min_items(mut self, min_items: u64) -> Self {
        self.min_items = min_items;
        self
    }

    /// Maximum number of elements; 0 disables the check.
    pub fn max_items(mut self, max_items: u64) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn deprecated(mut self, message: impl Into<String>) -> Self {
        self.deprecation_message = Some(message.into());
        self
    }

    /// Set the validators run against the whole block value, replacing any
    /// previously set list.
    pub fn with_validators(mut self, validators: BlockValidators) -> Self {
        self.validators = Some(validators);
        self
    }

    pub fn with_legacy_validator(mut self, validator: Arc<dyn AttributeValidator>) -> Self {
        self.legacy_validators.push(validator);
        self
    }

    /// Add a validator run against every element object of this block.
    pub fn with_object_validator(mut self, validator: Arc<ObjectValidator>) -> Self {
        self.object_validators.push(validator);
        self
    }

    pub fn nesting_mode(&self) -> BlockNestingMode {
        self.nesting_mode
    }

    pub fn attributes(&self) -> &BTreeMap<String, Attribute> {
        &self.attributes
    }

    pub fn blocks(&self) -> &BTreeMap<String, Block> {
        &self.blocks
    }

    pub fn min_items_limit(&self) -> u64 {
        self.min_items
    }

    pub fn max_items_limit(&self) -> u64 {
        self.max_items
    }

    pub fn deprecation_message(&self) -> Option<&str> {
        self.deprecation_message.as_deref()
    }

    pub fn validators(&self) -> Option<&BlockValidators> {
        self.validators.as_ref()
    }

    pub fn legacy_validators(&self) -> &[Arc<dyn AttributeValidator>] {
        &self.legacy_validators
    }

    pub fn object_validators(&self) -> &[Arc<ObjectValidator>] {
        &self.object_validators
    }

    /// Attribute types of one element object: nested attributes and
    /// nested blocks together.
    pub fn object_types(&self) -> BTreeMap<String, Type> {
        let mut types = object_types(&self.attributes);
        types.extend(
            self.blocks
                .iter()
                .map(|(name, block)| (name.clone(), block.block_type())),
        );
        types
    }

    /// Value type of the block: a list or set of its element object.
    pub fn block_type(&self) -> Type {
        let object = Type::Object(self.object_types());
        match self.nesting_mode {
            BlockNestingMode::List => Type::list_of(object),
            BlockNestingMode::Set => Type::set_of(object),
        }
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("nesting_mode", &self.nesting_mode)
            .field("attributes", &self.attributes)
            .field("blocks", &self.blocks)
            .field("min_items", &self.min_items)
            .field("max_items", &self.max_items)
            .field("deprecation_message", &self.deprecation_message)
            .field("validators", &self.validators)
            .field("legacy_validators", &self.legacy_validators.len())
            .field("object_validators", &self.object_validators.len())
            .finish()
    }
}

// ─── Schema ──────────────────────────────────────────────────────────

/// Root of a provider, resource, or data source schema.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    attributes: BTreeMap<String, Attribute>,
    blocks: BTreeMap<String, Block>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    pub fn with_block(mut self, name: impl Into<String>, block: Block) -> Self {
        self.blocks.insert(name.into(), block);
        self
    }

    pub fn attributes(&self) -> &BTreeMap<String, Attribute> {
        &self.attributes
    }

    pub fn blocks(&self) -> &BTreeMap<String, Block> {
        &self.blocks
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn block(&self, name: &str) -> Option<&Block> {
        self.blocks.get(name)
    }

    /// Object type of a whole configuration governed by this schema.
    pub fn schema_type(&self) -> Type {
        let mut types = object_types(&self.attributes);
        types.extend(
            self.blocks
                .iter()
                .map(|(name, block)| (name.clone(), block.block_type())),
        );
        Type::Object(types)
    }

    /// Declared type of the value at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::AttributeNotFound`] when the first step names
    /// no attribute or block, and [`PathError::StepNotApplicable`] when a
    /// later step does not fit the type reached so far.
    pub fn type_at_path(&self, path: &Path) -> Result<Type, PathError> {
        let Some((first, rest)) = path.steps().split_first() else {
            return Ok(self.schema_type());
        };
        let mut ty = match first {
            PathStep::AttributeName(name) => self
                .attributes
                .get(name)
                .and_then(Attribute::attribute_type)
                .or_else(|| self.blocks.get(name).map(Block::block_type))
                .ok_or_else(|| PathError::AttributeNotFound {
                    step: first.to_string(),
                    name: name.clone(),
                })?,
            other => {
                return Err(PathError::StepNotApplicable {
                    step: other.to_string(),
                    type_name: "schema".to_string(),
                })
            }
        };
        for step in rest {
            ty = ty.at_step(step).ok_or_else(|| PathError::StepNotApplicable {
                step: step.to_string(),
                type_name: ty.to_string(),
            })?;
        }
        Ok(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested_list() -> Attribute {
        Attribute::nested(
            NestingMode::List,
            [
                ("name", Attribute::new(Type::String).required()),
                ("port", Attribute::new(Type::Int64).optional()),
            ],
        )
        .optional()
    }

    #[test]
    fn test_nested_attribute_type_follows_mode() {
        let object = Type::object([("name", Type::String), ("port", Type::Int64)]);
        assert_eq!(nested_list().attribute_type(), Some(Type::list_of(object.clone())));

        let single = Attribute::nested(
            NestingMode::Single,
            [
                ("name", Attribute::new(Type::String)),
                ("port", Attribute::new(Type::Int64)),
            ],
        );
        assert_eq!(single.attribute_type(), Some(object));
    }

    #[test]
    fn test_attribute_without_type_has_none() {
        assert_eq!(Attribute::default().attribute_type(), None);
    }

    #[test]
    fn test_block_type_includes_nested_blocks() {
        let block = Block::set()
            .with_attribute("a", Attribute::new(Type::Bool).optional())
            .with_block("inner", Block::list());
        assert_eq!(
            block.block_type(),
            Type::set_of(Type::object([
                ("a", Type::Bool),
                ("inner", Type::list_of(Type::object(Vec::<(String, Type)>::new()))),
            ]))
        );
    }

    #[test]
    fn test_block_item_limits() {
        let block = Block::list().min_items(1).max_items(3);
        assert_eq!(block.min_items_limit(), 1);
        assert_eq!(block.max_items_limit(), 3);
        assert_eq!(Block::set().max_items_limit(), 0);
        assert!(block.validators().is_none());
    }

    #[test]
    fn test_type_at_path_walks_nested() {
        let schema = Schema::new().with_attribute("servers", nested_list());
        let path = Path::root("servers").at_list_index(3).at_name("port");
        assert_eq!(schema.type_at_path(&path), Ok(Type::Int64));
    }

    #[test]
    fn test_type_at_path_missing_attribute() {
        let schema = Schema::new().with_attribute("name", Attribute::new(Type::String));
        let err = schema.type_at_path(&Path::root("other")).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"AttributeName("other") still remains in the path: could not find attribute or block "other" in schema"#
        );
    }

    #[test]
    fn test_type_at_path_inapplicable_step() {
        let schema = Schema::new().with_attribute("name", Attribute::new(Type::String));
        let err = schema
            .type_at_path(&Path::root("name").at_list_index(0))
            .unwrap_err();
        assert!(matches!(err, PathError::StepNotApplicable { .. }));
    }

    #[test]
    fn test_schema_type_sorted() {
        let schema = Schema::new()
            .with_block("z_block", Block::list())
            .with_attribute("a", Attribute::new(Type::Bool));
        let Type::Object(types) = schema.schema_type() else {
            panic!("schema type is an object");
        };
        let names: Vec<&String> = types.keys().collect();
        assert_eq!(names, vec!["a", "z_block"]);
    }
}
