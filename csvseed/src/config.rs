//! Defaults and environment configuration.
//!
//! The resource root used by [`crate::Import::csv`] and
//! [`crate::Import::tsv`] comes from `CSVSEED_RESOURCE_ROOT` (a `.env` file
//! is honored), or `resources` relative to the working directory.

use once_cell::sync::Lazy;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable naming the resource root directory.
pub const RESOURCE_ROOT_ENV: &str = "CSVSEED_RESOURCE_ROOT";

/// Resource root used when the environment does not name one.
pub const DEFAULT_RESOURCE_ROOT: &str = "resources";

/// Delimiter for `Import::csv`.
pub const CSV_DELIMITER: char = ',';

/// Delimiter for `Import::tsv`.
pub const TSV_DELIMITER: char = '\t';

/// Default quotation mark.
pub const DEFAULT_QUOTE: char = '"';

/// The `.env` file loaded on first use, if one was found.
static DOTENV: Lazy<Option<PathBuf>> = Lazy::new(|| dotenvy::dotenv().ok());

/// Load `.env` into the process environment. Only the first call reads it.
pub fn load_dotenv() -> Option<&'static PathBuf> {
    DOTENV.as_ref()
}

/// Resolve the resource root from the environment.
pub fn resource_root() -> PathBuf {
    load_dotenv();
    resource_root_from(env::var_os(RESOURCE_ROOT_ENV))
}

fn resource_root_from(value: Option<OsString>) -> PathBuf {
    value
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RESOURCE_ROOT))
}
