//! Two-stage import builder.
//!
//! ```text
//! Import::csv(path) ──▶ ImportBuilder<Unbound> ──into(table)──▶ ImportBuilder<Bound> ──build()──▶ Vec<InsertOperation>
//!        │                     with_*(...)                            with_*(...)
//!        └─ resource located here
//! ```
//!
//! Configuration may be given before and after `into`; both are kept.
//! Only a bound builder has `build()`, so forgetting the table does not
//! compile.
//!
//! # Example
//!
//! ```rust
//! use csvseed::generator::sequence;
//! use csvseed::resource::EmbeddedLocator;
//! use csvseed::{Import, Value};
//!
//! let assets = EmbeddedLocator::new().with_resource("table_1.csv", b"a,b\n10,100\n20,200\n");
//! let operations = Import::csv_in(&assets, "table_1.csv")?
//!     .into("table_1")?
//!     .with_generated_value("a", sequence())
//!     .build()?;
//!
//! assert_eq!(operations.len(), 2);
//! assert_eq!(operations[1].get("a"), Some(&Value::Integer(2)));
//! assert_eq!(operations[1].get("b"), Some(&Value::from("200")));
//! # Ok::<(), csvseed::ImportError>(())
//! ```

mod settings;

use std::sync::Arc;

use encoding_rs::Encoding;
use tracing::{debug, info};

use crate::config::{CSV_DELIMITER, TSV_DELIMITER};
use crate::error::{ImportError, ImportResult};
use crate::generator::ValueGenerator;
use crate::mapper::{Override, RowMapper};
use crate::operation::InsertOperation;
use crate::parser;
use crate::resource::{Charset, DirectoryLocator, Resource, ResourceLocator};
use crate::value::Value;

use settings::ImportSettings;

/// Entry points for building imports.
pub struct Import;

impl Import {
    /// Start a comma-delimited import of `path` under the default resource root.
    ///
    /// Fails with [`ImportError::ResourceNotFound`] if the resource is absent.
    pub fn csv(path: &str) -> ImportResult<ImportBuilder<Unbound>> {
        Self::csv_in(&DirectoryLocator::from_env(), path)
    }

    /// Start a tab-delimited import of `path` under the default resource root.
    pub fn tsv(path: &str) -> ImportResult<ImportBuilder<Unbound>> {
        Self::tsv_in(&DirectoryLocator::from_env(), path)
    }

    /// Like [`Import::csv`], resolving `path` with `locator`.
    pub fn csv_in(locator: &dyn ResourceLocator, path: &str) -> ImportResult<ImportBuilder<Unbound>> {
        ImportBuilder::locate(locator, path, CSV_DELIMITER)
    }

    /// Like [`Import::tsv`], resolving `path` with `locator`.
    pub fn tsv_in(locator: &dyn ResourceLocator, path: &str) -> ImportResult<ImportBuilder<Unbound>> {
        ImportBuilder::locate(locator, path, TSV_DELIMITER)
    }
}

/// Builder stage before a table is bound.
#[derive(Debug, Clone)]
pub struct Unbound;

/// Builder stage with a target table.
#[derive(Debug, Clone)]
pub struct Bound {
    table: Arc<str>,
}

/// Import configuration for one resource.
#[derive(Debug, Clone)]
pub struct ImportBuilder<S> {
    resource: Resource,
    settings: ImportSettings,
    stage: S,
}

// =============================================================================
// Configuration (both stages)
// =============================================================================

impl<S> ImportBuilder<S> {
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Field delimiter. Must be a single-byte ASCII character other than the
    /// quote and line terminators; checked by `build()`.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.settings.delimiter = delimiter;
        self
    }

    /// Quotation mark, `"` by default.
    pub fn with_quote_char(mut self, quote: char) -> Self {
        self.settings.quote = quote;
        self
    }

    /// Fields equal to `token` become [`Value::Null`].
    ///
    /// By default no token is set and empty fields stay empty strings.
    pub fn with_null_token(mut self, token: impl Into<String>) -> Self {
        self.settings.null_token = Some(token.into());
        self
    }

    /// Use `value` for `column` on every row.
    pub fn with_default_value(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings
            .set_override(column.into(), Override::Default(value.into()));
        self
    }

    /// Take `column` from `generator`, one value per row.
    pub fn with_generated_value(
        mut self,
        column: impl Into<String>,
        generator: impl ValueGenerator + 'static,
    ) -> Self {
        self.settings
            .set_override(column.into(), Override::Generated(Box::new(generator)));
        self
    }

    /// Charset by WHATWG label, e.g. `"Shift_JIS"`. UTF-8 by default.
    ///
    /// Unknown labels are reported by `build()`.
    pub fn with_charset(mut self, label: impl Into<String>) -> Self {
        self.settings.charset = Charset::Label(label.into());
        self
    }

    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.settings.set_encoding(encoding);
        self
    }

    /// Guess the charset from the resource bytes.
    pub fn with_detected_charset(mut self) -> Self {
        self.settings.charset = Charset::Detect;
        self
    }

    /// Use these column names instead of a header record. The first record
    /// of the resource is then data.
    pub fn with_header<I, T>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.settings.header = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    fn with_stage<T>(self, stage: T) -> ImportBuilder<T> {
        ImportBuilder {
            resource: self.resource,
            settings: self.settings,
            stage,
        }
    }
}

// =============================================================================
// Stage 1: unbound
// =============================================================================

impl ImportBuilder<Unbound> {
    fn locate(locator: &dyn ResourceLocator, path: &str, delimiter: char) -> ImportResult<Self> {
        let resource = locator.locate(path)?;
        debug!(path, ?delimiter, "import started");
        Ok(Self {
            resource,
            settings: ImportSettings::with_delimiter(delimiter),
            stage: Unbound,
        })
    }

    /// Bind the target table. Configuration made so far is kept.
    ///
    /// A blank name is [`ImportError::MissingTargetTable`].
    pub fn into(self, table: impl Into<String>) -> ImportResult<ImportBuilder<Bound>> {
        let table = table.into();
        if table.trim().is_empty() {
            return Err(ImportError::MissingTargetTable(self.resource.path().to_string()));
        }
        Ok(self.with_stage(Bound {
            table: Arc::from(table),
        }))
    }

    /// Bind the table named after the resource file: `data/users.csv` -> `users`.
    pub fn into_default_table(self) -> ImportResult<ImportBuilder<Bound>> {
        let table = self
            .resource
            .file_stem()
            .map(str::to_string)
            .ok_or_else(|| ImportError::MissingTargetTable(self.resource.path().to_string()))?;
        self.into(table)
    }
}

// =============================================================================
// Stage 2: bound
// =============================================================================

impl ImportBuilder<Bound> {
    pub fn table(&self) -> &str {
        &self.stage.table
    }

    /// Read, parse, and map the resource into insert operations, one per
    /// data row, in resource order.
    ///
    /// Each call reopens the resource and starts generators from their
    /// configured state, so repeated calls give equal results. Any error
    /// aborts the whole build.
    pub fn build(&self) -> ImportResult<Vec<InsertOperation>> {
        let dialect = self.settings.dialect()?;
        let bytes = self.resource.read_bytes()?;
        let text = self.settings.charset.decode(&bytes)?;
        drop(bytes);

        let (header, records) =
            parser::parse_with_header(&text, dialect, self.settings.header.as_deref())?;
        let mut mapper = RowMapper::new(
            header,
            &self.settings.overrides,
            self.settings.null_token.clone(),
        )?;

        let operations = records
            .map(|record| -> ImportResult<InsertOperation> {
                let binding = mapper.bind(record?)?;
                Ok(binding.into_operation(Arc::clone(&self.stage.table)))
            })
            .collect::<ImportResult<Vec<_>>>()?;

        info!(
            resource = self.resource.path(),
            table = %self.stage.table,
            rows = operations.len(),
            "built insert operations"
        );
        Ok(operations)
    }
}
