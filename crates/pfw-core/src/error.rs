//! # Error Types
//!
//! `thiserror`-derived errors for the two places where this crate returns
//! `Result` instead of diagnostics:
//!
//! - Value construction and wire conversion ([`ValueError`]).
//! - Resolving a path against a schema type tree ([`PathError`]).
//!
//! Both indicate a problem in provider code or in the data-access layer,
//! never in the end user's configuration. Callers in the validation engine
//! turn them into error diagnostics with the `Display` text as detail.

use thiserror::Error;

/// Error while constructing or converting a value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    /// A value did not have the type its container or target requires.
    #[error("can't use {found} as value of {expected}")]
    TypeMismatch {
        /// Type the value was expected to have.
        expected: String,
        /// Type (and rendering) of the offending value.
        found: String,
    },

    /// A set was constructed with two value-equal elements.
    #[error("duplicate set element {0}")]
    DuplicateSetElement(String),

    /// An object value is missing an attribute its type declares.
    #[error("object is missing attribute {0:?}")]
    MissingAttribute(String),

    /// An object value carries an attribute its type does not declare.
    #[error("object has unexpected attribute {0:?}")]
    UnexpectedAttribute(String),

    /// A JSON document could not be read as the requested type.
    #[error("cannot read JSON {found} as {expected}")]
    Json {
        /// Type the JSON was read as.
        expected: String,
        /// Kind of JSON value encountered.
        found: String,
    },

    /// A custom type rejected a wire value.
    #[error("{0}")]
    Custom(String),
}

/// Error while walking a type tree along a path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The first step names an attribute or block the schema does not have.
    #[error("{step} still remains in the path: could not find attribute or block {name:?} in schema")]
    AttributeNotFound {
        /// Rendering of the unresolved step.
        step: String,
        /// The missing attribute or block name.
        name: String,
    },

    /// A step cannot be applied to the type reached so far.
    #[error("{step} still remains in the path: step cannot be applied to {type_name}")]
    StepNotApplicable {
        /// Rendering of the unresolved step.
        step: String,
        /// Type reached before the step.
        type_name: String,
    },
}
