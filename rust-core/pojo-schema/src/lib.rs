// SPDX-License-Identifier: PMPL-1.0-or-later
//! POJO Schema
//!
//! Database definitions for POJO tag lines and the value normalizer shared by
//! the parser, history store and suggestion engine.
//!
//! # Modules
//!
//! - [`config`] -- The serde settings document supplied by the host.
//! - [`schema`] -- Validated definitions: `DatabaseSchema`, `FieldSpec`,
//!   `FieldPolicy`.
//! - [`registry`] -- Case-insensitive lookup of definitions by name.
//! - [`normalize`] -- Canonical capitalization of stored values.
//! - [`error`] -- The `SchemaError` enum.

pub mod config;
pub mod error;
pub mod normalize;
pub mod registry;
pub mod schema;

pub use config::{AllowedKind, DatabaseConfig, FieldConfig, PojoSettings};
pub use error::SchemaError;
pub use normalize::{eq_ignore_case, normalize, normalize_all};
pub use registry::SchemaRegistry;
pub use schema::{
    AllowedValues, DatabaseSchema, FieldPolicy, FieldSpec, ALL_TYPES_KEY, DESCRIPTION_FIELD,
};
