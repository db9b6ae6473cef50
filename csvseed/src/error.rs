//! Error types for the import pipeline.
//!
//! - [`ParseError`] - malformed delimited content
//! - [`ConfigError`] - builder configuration that cannot be applied
//! - [`ImportError`] - everything `Import` and `build()` can return
//!
//! Lower-level errors convert into [`ImportError`] via `From`, so `?`
//! works across module boundaries without losing the original variant.

use thiserror::Error;

// =============================================================================
// Parse Errors
// =============================================================================

/// Errors raised while decoding or tokenizing a resource.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A quoted field was still open when the input ended.
    #[error("Unterminated quoted field starting on line {line}")]
    UnterminatedQuote { line: u64 },

    /// The resource has no header record and no explicit header was given.
    #[error("Resource is empty: no header record found")]
    MissingHeader,

    /// The bytes are not valid in the configured charset.
    #[error("Resource is not valid {encoding}")]
    Decode { encoding: String },

    /// Error reported by the underlying CSV reader.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors in builder configuration, reported when `build()` freezes it.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Delimiter or quote character that the reader cannot use.
    #[error("Invalid dialect: {0}")]
    InvalidDialect(String),

    /// Charset label not known to the WHATWG encoding registry.
    #[error("Unknown charset: {0}")]
    UnknownCharset(String),
}

// =============================================================================
// Import Errors (top-level)
// =============================================================================

/// Top-level error returned by [`crate::Import`] and the builders.
///
/// Variants are kept distinct so that callers can tell a missing resource
/// from malformed content from incomplete configuration.
#[derive(Debug, Error)]
pub enum ImportError {
    /// No resource exists at the path under the locator's root.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// The path is not a relative, `/`-separated resource path.
    #[error("Invalid resource path '{path}': {reason}")]
    InvalidResourcePath { path: String, reason: String },

    /// The resource exists but could not be read.
    #[error("Failed to read resource '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The resource content is malformed.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A data row does not have as many fields as the header.
    #[error("Row {row} (line {line}) has {found} fields, expected {expected}")]
    RowShape {
        row: usize,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// No table could be bound to the import.
    #[error("No target table for resource '{0}'")]
    MissingTargetTable(String),

    /// The header names the same column twice.
    #[error("Duplicate header column '{0}'")]
    DuplicateHeader(String),

    /// The builder configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;
