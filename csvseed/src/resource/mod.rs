//! Resource location: resolve a relative `/`-separated path to readable bytes.
//!
//! Two roots are provided:
//!
//! - [`DirectoryLocator`] - a directory on disk (the default, see [`crate::config`])
//! - [`EmbeddedLocator`] - assets compiled into the binary with `include_bytes!`
//!
//! Locating only checks that the resource exists. Bytes are read later by
//! [`Resource::read_bytes`], which opens and closes its own handle, so every
//! `build()` sees a fresh stream.

pub mod charset;

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config;
use crate::error::{ImportError, ImportResult};

pub use charset::Charset;

/// Resolves resource paths against some root.
pub trait ResourceLocator: fmt::Debug {
    /// Find the resource at `path`.
    ///
    /// Fails with [`ImportError::ResourceNotFound`] if nothing exists there.
    fn locate(&self, path: &str) -> ImportResult<Resource>;
}

// =============================================================================
// Resource
// =============================================================================

/// A located resource. Cheap to clone; holds no open handle.
#[derive(Debug, Clone)]
pub struct Resource {
    path: String,
    origin: Origin,
}

#[derive(Debug, Clone)]
enum Origin {
    File(PathBuf),
    Embedded(&'static [u8]),
}

impl Resource {
    /// The path the resource was located with.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// File name without its last extension: `data/table_1.csv` -> `table_1`.
    pub fn file_stem(&self) -> Option<&str> {
        let name = self.path.rsplit('/').next()?;
        let stem = match name.rfind('.') {
            Some(0) | None => name,
            Some(dot) => &name[..dot],
        };
        (!stem.is_empty()).then_some(stem)
    }

    /// Open a new read handle.
    pub fn open(&self) -> ImportResult<Box<dyn Read + '_>> {
        match &self.origin {
            Origin::File(file) => {
                let handle = File::open(file).map_err(|source| self.io_error(source))?;
                Ok(Box::new(handle))
            }
            Origin::Embedded(bytes) => Ok(Box::new(Cursor::new(*bytes))),
        }
    }

    /// Read the whole resource; the handle is closed before returning.
    pub fn read_bytes(&self) -> ImportResult<Vec<u8>> {
        let mut reader = self.open()?;
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|source| self.io_error(source))?;
        debug!(path = %self.path, bytes = bytes.len(), "read resource");
        Ok(bytes)
    }

    fn io_error(&self, source: std::io::Error) -> ImportError {
        ImportError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Split a resource path into its segments, rejecting anything that is not
/// a plain relative path.
fn segments(path: &str) -> ImportResult<Vec<&str>> {
    let invalid = |reason: &str| ImportError::InvalidResourcePath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    if path.is_empty() {
        return Err(invalid("path is empty"));
    }
    if path.starts_with('/') {
        return Err(invalid("absolute paths are not supported"));
    }
    if path.contains('\\') {
        return Err(invalid("segments must be separated by '/'"));
    }

    let parts: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    if parts.iter().any(|s| *s == "..") {
        return Err(invalid("'..' segments are not supported"));
    }
    if parts.is_empty() {
        return Err(invalid("path names no resource"));
    }
    Ok(parts)
}

// =============================================================================
// Directory Locator
// =============================================================================

/// Resolves resources under a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryLocator {
    root: PathBuf,
}

impl DirectoryLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Use the root configured in the environment, see [`config::resource_root`].
    pub fn from_env() -> Self {
        Self::new(config::resource_root())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceLocator for DirectoryLocator {
    fn locate(&self, path: &str) -> ImportResult<Resource> {
        let file = segments(path)?
            .into_iter()
            .fold(self.root.clone(), |acc, segment| acc.join(segment));

        if !file.is_file() {
            debug!(root = %self.root.display(), path, "resource not found");
            return Err(ImportError::ResourceNotFound(path.to_string()));
        }

        debug!(file = %file.display(), "located resource");
        Ok(Resource {
            path: path.to_string(),
            origin: Origin::File(file),
        })
    }
}

// =============================================================================
// Embedded Locator
// =============================================================================

/// Resolves resources registered in memory, typically via `include_bytes!`.
///
/// ```rust
/// use csvseed::resource::{EmbeddedLocator, ResourceLocator};
///
/// let assets = EmbeddedLocator::new().with_resource("users.csv", b"id,name\n1,ann\n");
/// assert!(assets.locate("users.csv").is_ok());
/// assert!(assets.locate("orders.csv").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EmbeddedLocator {
    resources: HashMap<String, &'static [u8]>,
}

impl EmbeddedLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `path`, replacing any previous entry.
    pub fn with_resource(mut self, path: impl Into<String>, bytes: &'static [u8]) -> Self {
        self.resources.insert(path.into(), bytes);
        self
    }
}

impl ResourceLocator for EmbeddedLocator {
    fn locate(&self, path: &str) -> ImportResult<Resource> {
        let key = segments(path)?.join("/");
        let bytes = self
            .resources
            .get(&key)
            .copied()
            .ok_or_else(|| ImportError::ResourceNotFound(path.to_string()))?;

        Ok(Resource {
            path: path.to_string(),
            origin: Origin::Embedded(bytes),
        })
    }
}
