//! Configuration collected by the import builders.

use encoding_rs::Encoding;

use crate::config::DEFAULT_QUOTE;
use crate::error::ImportResult;
use crate::mapper::Override;
use crate::parser::Dialect;
use crate::resource::Charset;

/// Everything the builder knows besides the resource and the table.
#[derive(Debug, Clone)]
pub(crate) struct ImportSettings {
    pub delimiter: char,
    pub quote: char,
    pub null_token: Option<String>,
    pub charset: Charset,
    pub header: Option<Vec<String>>,
    /// One entry per column, in registration order.
    pub overrides: Vec<(String, Override)>,
}

impl ImportSettings {
    pub fn with_delimiter(delimiter: char) -> Self {
        Self {
            delimiter,
            quote: DEFAULT_QUOTE,
            null_token: None,
            charset: Charset::default(),
            header: None,
            overrides: Vec::new(),
        }
    }

    /// Register an override. A later override for the same column replaces
    /// the earlier one but keeps its position.
    pub fn set_override(&mut self, column: String, value: Override) {
        match self.overrides.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = value,
            None => self.overrides.push((column, value)),
        }
    }

    pub fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.charset = Charset::Encoding(encoding);
    }

    /// Validate the parts that can only be checked once configuration is done.
    pub fn dialect(&self) -> ImportResult<Dialect> {
        Ok(Dialect::new(self.delimiter, self.quote)?)
    }
}
