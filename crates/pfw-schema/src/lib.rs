//! # pfw-schema — Schema Validation Engine
//!
//! Decides whether a practitioner's configuration is acceptable for a
//! provider schema before any planning or applying happens.
//!
//! ## Architecture
//!
//! - [`schema`]: attribute and block nodes plus the root [`Schema`]. Nodes
//!   are built once by the provider and only read afterwards.
//! - [`validator`]: the extension points. Each attribute carries at most
//!   one per-kind validator list ([`KindValidators`]) and any number of
//!   legacy untyped [`AttributeValidator`]s.
//! - [`config`]: the configuration snapshot and the [`ConfigAccessor`]
//!   that resolves the value at a path.
//! - [`coerce`]: container kind assertions and element lookups used while
//!   walking nested attributes and blocks.
//! - [`validate`]: the recursive tree walk. [`attribute_validate`],
//!   [`nested_attribute_validate`], [`block_validate`], and
//!   [`schema_validate`] each return the diagnostics of their subtree.
//!
//! ## Error Model
//!
//! Problems in the provider's schema definition are fatal for the node
//! they occur on: one error is emitted and checks for that node stop.
//! Problems in the configuration are recoverable and the walk continues,
//! so one pass reports everything. Both kinds surface as diagnostics; the
//! engine never returns `Err` and never panics.
//!
//! ## Concurrency
//!
//! The engine holds no state between calls. Schema and configuration are
//! shared read-only, so independent top-level calls can run on separate
//! threads.
//!
//! ## Crate Policy
//!
//! - Depends only on `pfw-core` internally.
//! - No `unsafe` code.
//! - No global subscriber: the library emits `tracing` events and leaves
//!   collection to the embedding server.

pub mod coerce;
pub mod config;
pub mod schema;
pub mod validate;
pub mod validator;

pub use config::{Config, ConfigAccessor};
pub use schema::{Attribute, Block, BlockNestingMode, NestingMode, Schema};
pub use validate::{attribute_validate, block_validate, nested_attribute_validate, schema_validate};
pub use validator::{
    attribute_validator_fn, validator_fn, AttributeValidator, BlockValidators, BoolValidator,
    Float64Validator, Int64Validator, KindValidators, ListValidator, MapValidator,
    NumberValidator, ObjectValidator, SetValidator, StringValidator, ValidateAttributeRequest,
    ValidateAttributeResponse, Validator, ValidatorRequest, ValidatorResponse,
};
