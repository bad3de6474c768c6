//! # Attribute Paths and Path Expressions
//!
//! A [`Path`] identifies exactly one location in a configuration value
//! tree. A [`PathExpression`] describes a class of locations and may use
//! wildcards; validators receive both so they can address siblings
//! relative to the pattern that selected them.
//!
//! ## String Form
//!
//! ```text
//! name            attribute
//! name.child      nested attribute
//! list[0]         list index
//! map["key"]      map key
//! set[Value("x")] set element, addressed by the element value
//! ```
//!
//! Set elements have no position. A set step carries the element value
//! itself, and path equality is value equality of every step.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::value::Value;

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq)]
pub enum PathStep {
    /// Attribute (or block) name within an object.
    AttributeName(String),
    /// Position within a list.
    ElementKeyInt(usize),
    /// Key within a map.
    ElementKeyString(String),
    /// Element of a set, identified by its value.
    ElementKeyValue(Value),
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::AttributeName(name) => write!(f, "AttributeName({name:?})"),
            PathStep::ElementKeyInt(index) => write!(f, "ElementKeyInt({index})"),
            PathStep::ElementKeyString(key) => write!(f, "ElementKeyString({key:?})"),
            PathStep::ElementKeyValue(value) => write!(f, "ElementKeyValue({value})"),
        }
    }
}

/// Immutable location within a configuration value tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    /// The path with no steps: the root of the value.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A path starting at the top-level attribute `name`.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            steps: vec![PathStep::AttributeName(name.into())],
        }
    }

    fn with_step(&self, step: PathStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }

    pub fn at_name(&self, name: impl Into<String>) -> Self {
        self.with_step(PathStep::AttributeName(name.into()))
    }

    pub fn at_list_index(&self, index: usize) -> Self {
        self.with_step(PathStep::ElementKeyInt(index))
    }

    pub fn at_map_key(&self, key: impl Into<String>) -> Self {
        self.with_step(PathStep::ElementKeyString(key.into()))
    }

    pub fn at_set_value(&self, value: Value) -> Self {
        self.with_step(PathStep::ElementKeyValue(value))
    }

    /// The path without its last step, or `None` for the empty path.
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.steps.split_last()?;
        Some(Self {
            steps: rest.to_vec(),
        })
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn last_step(&self) -> Option<&PathStep> {
        self.steps.last()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The exact (wildcard-free) expression for this path.
    pub fn expression(&self) -> PathExpression {
        PathExpression::from(self)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                PathStep::AttributeName(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                PathStep::ElementKeyInt(index) => write!(f, "[{index}]")?,
                PathStep::ElementKeyString(key) => write!(f, "[{key:?}]")?,
                PathStep::ElementKeyValue(value) => write!(f, "[Value({value})]")?,
            }
        }
        Ok(())
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ─── Expressions ─────────────────────────────────────────────────────

/// One step of a [`PathExpression`]; `Any*` variants are wildcards.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionStep {
    AttributeName(String),
    AnyAttributeName,
    ElementKeyInt(usize),
    AnyElementKeyInt,
    ElementKeyString(String),
    AnyElementKeyString,
    ElementKeyValue(Value),
    AnyElementKeyValue,
}

impl ExpressionStep {
    /// Returns true if this expression step selects the given path step.
    pub fn matches(&self, step: &PathStep) -> bool {
        match (self, step) {
            (ExpressionStep::AttributeName(want), PathStep::AttributeName(got)) => want == got,
            (ExpressionStep::AnyAttributeName, PathStep::AttributeName(_)) => true,
            (ExpressionStep::ElementKeyInt(want), PathStep::ElementKeyInt(got)) => want == got,
            (ExpressionStep::AnyElementKeyInt, PathStep::ElementKeyInt(_)) => true,
            (ExpressionStep::ElementKeyString(want), PathStep::ElementKeyString(got)) => {
                want == got
            }
            (ExpressionStep::AnyElementKeyString, PathStep::ElementKeyString(_)) => true,
            (ExpressionStep::ElementKeyValue(want), PathStep::ElementKeyValue(got)) => want == got,
            (ExpressionStep::AnyElementKeyValue, PathStep::ElementKeyValue(_)) => true,
            _ => false,
        }
    }
}

impl From<&PathStep> for ExpressionStep {
    fn from(step: &PathStep) -> Self {
        match step {
            PathStep::AttributeName(name) => ExpressionStep::AttributeName(name.clone()),
            PathStep::ElementKeyInt(index) => ExpressionStep::ElementKeyInt(*index),
            PathStep::ElementKeyString(key) => ExpressionStep::ElementKeyString(key.clone()),
            PathStep::ElementKeyValue(value) => ExpressionStep::ElementKeyValue(value.clone()),
        }
    }
}

/// Pattern over paths. An expression without wildcards selects exactly
/// the path it was built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathExpression {
    steps: Vec<ExpressionStep>,
}

impl PathExpression {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn root(name: impl Into<String>) -> Self {
        Self {
            steps: vec![ExpressionStep::AttributeName(name.into())],
        }
    }

    fn with_step(&self, step: ExpressionStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }

    pub fn at_name(&self, name: impl Into<String>) -> Self {
        self.with_step(ExpressionStep::AttributeName(name.into()))
    }

    pub fn at_any_name(&self) -> Self {
        self.with_step(ExpressionStep::AnyAttributeName)
    }

    pub fn at_list_index(&self, index: usize) -> Self {
        self.with_step(ExpressionStep::ElementKeyInt(index))
    }

    pub fn at_any_list_index(&self) -> Self {
        self.with_step(ExpressionStep::AnyElementKeyInt)
    }

    pub fn at_map_key(&self, key: impl Into<String>) -> Self {
        self.with_step(ExpressionStep::ElementKeyString(key.into()))
    }

    pub fn at_any_map_key(&self) -> Self {
        self.with_step(ExpressionStep::AnyElementKeyString)
    }

    pub fn at_set_value(&self, value: Value) -> Self {
        self.with_step(ExpressionStep::ElementKeyValue(value))
    }

    pub fn at_any_set_value(&self) -> Self {
        self.with_step(ExpressionStep::AnyElementKeyValue)
    }

    pub fn steps(&self) -> &[ExpressionStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns true if `path` has the same number of steps and every step
    /// is selected by the corresponding expression step.
    pub fn matches(&self, path: &Path) -> bool {
        self.steps.len() == path.steps().len()
            && self
                .steps
                .iter()
                .zip(path.steps())
                .all(|(expression, step)| expression.matches(step))
    }
}

impl From<&Path> for PathExpression {
    fn from(path: &Path) -> Self {
        Self {
            steps: path.steps().iter().map(ExpressionStep::from).collect(),
        }
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                ExpressionStep::AttributeName(_) | ExpressionStep::AnyAttributeName if i > 0 => {
                    f.write_str(".")?;
                }
                _ => {}
            }
            match step {
                ExpressionStep::AttributeName(name) => f.write_str(name)?,
                ExpressionStep::AnyAttributeName => f.write_str("*")?,
                ExpressionStep::ElementKeyInt(index) => write!(f, "[{index}]")?,
                ExpressionStep::ElementKeyString(key) => write!(f, "[{key:?}]")?,
                ExpressionStep::ElementKeyValue(value) => write!(f, "[Value({value})]")?,
                ExpressionStep::AnyElementKeyInt
                | ExpressionStep::AnyElementKeyString
                | ExpressionStep::AnyElementKeyValue => f.write_str("[*]")?,
            }
        }
        Ok(())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Step {
        Name(String),
        Index(usize),
        Key(String),
    }

    fn steps() -> impl Strategy<Value = Vec<Step>> {
        let step = prop_oneof![
            "[a-z_]{1,12}".prop_map(Step::Name),
            (0usize..64).prop_map(Step::Index),
            "[a-zA-Z0-9-]{0,12}".prop_map(Step::Key),
        ];
        prop::collection::vec(step, 0..8)
    }

    fn build(root: &str, steps: &[Step]) -> Path {
        steps.iter().fold(Path::root(root), |path, step| match step {
            Step::Name(name) => path.at_name(name.as_str()),
            Step::Index(index) => path.at_list_index(*index),
            Step::Key(key) => path.at_map_key(key.as_str()),
        })
    }

    proptest! {
        /// A path's own expression always selects it.
        #[test]
        fn expression_matches_own_path(root in "[a-z]{1,8}", steps in steps()) {
            let path = build(&root, &steps);
            prop_assert!(path.expression().matches(&path));
        }

        /// Path and exact expression render identically.
        #[test]
        fn expression_display_matches_path(root in "[a-z]{1,8}", steps in steps()) {
            let path = build(&root, &steps);
            prop_assert_eq!(path.to_string(), path.expression().to_string());
        }

        /// Building a child never changes the parent.
        #[test]
        fn parent_of_child_is_original(root in "[a-z]{1,8}", steps in steps(), name in "[a-z]{1,8}") {
            let path = build(&root, &steps);
            prop_assert_eq!(path.at_name(name.as_str()).parent(), Some(path));
        }
    }
}
