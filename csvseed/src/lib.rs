//! # csvseed - CSV/TSV fixtures as ordered insert operations
//!
//! csvseed reads a delimited resource and turns every data row into an
//! [`InsertOperation`] for a target table, ready to hand to whatever
//! applies them to a test database.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Resource   │────▶│   Parser    │────▶│ Row Mapper  │────▶│   Inserts   │
//! │  (locator)  │     │ (csv, lazy) │     │ (overrides) │     │  (ordered)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use csvseed::generator::sequence;
//! use csvseed::Import;
//!
//! // `table_1.csv` is looked up under `CSVSEED_RESOURCE_ROOT` (default: `resources`).
//! let operations = Import::csv("table_1.csv")?
//!     .into("table_1")?
//!     .with_generated_value("a", sequence())
//!     .with_null_token("\\N")
//!     .build()?;
//!
//! println!("{}", csvseed::to_json(&operations).unwrap());
//! # Ok::<(), csvseed::ImportError>(())
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`config`] - Defaults and environment configuration
//! - [`resource`] - Resource location and charset decoding
//! - [`parser`] - Delimited text parsing
//! - [`mapper`] - Header/row binding and overrides
//! - [`generator`] - Value generators
//! - [`import`] - The import builders
//! - [`operation`] - Insert operations

// Core modules
pub mod config;
pub mod error;
pub mod value;

// Input
pub mod parser;
pub mod resource;

// Mapping
pub mod generator;
pub mod mapper;

// Output
pub mod import;
pub mod operation;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConfigError, ImportError, ImportResult, ParseError};

// =============================================================================
// Re-exports - Builders
// =============================================================================

pub use import::{Bound, Import, ImportBuilder, Unbound};

// =============================================================================
// Re-exports - Values and operations
// =============================================================================

pub use generator::ValueGenerator;
pub use operation::{to_json, InsertOperation};
pub use value::Value;

// =============================================================================
// Re-exports - Resources
// =============================================================================

pub use resource::{Charset, DirectoryLocator, EmbeddedLocator, Resource, ResourceLocator};
