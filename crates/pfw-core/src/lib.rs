//! # pfw-core — Foundational Types for Provider Schema Validation
//!
//! This crate defines the primitives every other `pfw-*` crate speaks in:
//! diagnostics, attribute paths, and the dynamic value model that bridges
//! the wire representation of a configuration with the strongly typed
//! per-kind values validators consume.
//!
//! ## Key Design Principles
//!
//! 1. **Three-state values.** Every value is null, unknown (not yet
//!    resolvable), or known. Validators and the engine must handle all
//!    three; there is no "zero value" shortcut.
//!
//! 2. **Closed kind set, open representation.** The canonical kinds (bool,
//!    float64, int64, number, string, list, set, map, object) form a closed
//!    enum. Custom value types plug in through [`value::CustomValue`] and
//!    declare, per kind, whether they can be converted to the canonical
//!    value. That conversion capability is what [`value::Valuable`] checks.
//!
//! 3. **Diagnostics, not errors, for configuration problems.** A
//!    [`Diagnostics`] collection is ordered, append-only and free of
//!    duplicates. `Result` and the
//!    [`error`] types are reserved for value construction and schema lookups.
//!
//! 4. **Paths are values.** [`Path`] is immutable; every `at_*` builder
//!    returns a new path. Set elements are addressed by the element value
//!    itself, so two paths are equal when their steps are value-equal.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `pfw-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod diag;
pub mod error;
pub mod path;
pub mod types;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use diag::{Diagnostic, Diagnostics, Severity};
pub use error::{PathError, ValueError};
pub use path::{ExpressionStep, Path, PathExpression, PathStep};
pub use types::{CustomType, Type};
pub use value::{
    BoolValue, CustomValue, Float64Value, Int64Value, ListValue, MapValue, NumberValue,
    ObjectValue, SetValue, StringValue, Valuable, Value, ValueState,
};
