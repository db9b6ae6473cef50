//! Delimited text parser.
//!
//! Splits decoded text into records with RFC 4180 quoting: a quoted field
//! may contain the delimiter, line breaks, and doubled quotes standing for a
//! literal quote. Nothing is trimmed. Completely empty lines are skipped.
//!
//! [`parse`] returns a lazy, single-pass iterator; to read the same text
//! again, call [`parse`] again.
//!
//! # Example
//!
//! ```rust
//! use csvseed::parser::{parse_with_header, Dialect};
//!
//! let text = "a,b\n10,\"1,000\"\n";
//! let (header, mut rows) = parse_with_header(text, Dialect::default(), None).unwrap();
//!
//! assert_eq!(header, vec!["a", "b"]);
//! assert_eq!(rows.next().unwrap().unwrap().fields, vec!["10", "1,000"]);
//! assert!(rows.next().is_none());
//! ```

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::config::{CSV_DELIMITER, DEFAULT_QUOTE};
use crate::error::{ConfigError, ParseError, ParseResult};

/// Delimiter and quote characters of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    delimiter: u8,
    quote: u8,
}

impl Dialect {
    /// Both characters must be single-byte ASCII, distinct, and not a line
    /// terminator.
    pub fn new(delimiter: char, quote: char) -> Result<Self, ConfigError> {
        let delimiter = ascii_byte("delimiter", delimiter)?;
        let quote = ascii_byte("quote", quote)?;
        if delimiter == quote {
            return Err(ConfigError::InvalidDialect(format!(
                "delimiter and quote are both {:?}",
                char::from(delimiter)
            )));
        }
        Ok(Self { delimiter, quote })
    }

    pub fn delimiter(&self) -> char {
        char::from(self.delimiter)
    }

    pub fn quote(&self) -> char {
        char::from(self.quote)
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: CSV_DELIMITER as u8,
            quote: DEFAULT_QUOTE as u8,
        }
    }
}

fn ascii_byte(role: &str, c: char) -> Result<u8, ConfigError> {
    if !c.is_ascii() {
        return Err(ConfigError::InvalidDialect(format!(
            "{role} {c:?} is not an ASCII character"
        )));
    }
    if c == '\n' || c == '\r' {
        return Err(ConfigError::InvalidDialect(format!(
            "{role} cannot be a line terminator"
        )));
    }
    Ok(c as u8)
}

/// One record as read from the resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line on which the record starts.
    pub line: u64,
    pub fields: Vec<String>,
}

/// Lazy iterator over the records of a text.
///
/// Yields at most one error; the iterator is exhausted afterwards.
pub struct Records<'a> {
    reader: csv::Reader<&'a [u8]>,
    input: &'a [u8],
    dialect: Dialect,
    record: StringRecord,
    /// Line breaks counted up to `scanned`.
    line: u64,
    scanned: usize,
    failed: bool,
}

/// Parse `text` into records, header included.
pub fn parse(text: &str, dialect: Dialect) -> Records<'_> {
    let reader = ReaderBuilder::new()
        .delimiter(dialect.delimiter)
        .quote(dialect.quote)
        .double_quote(true)
        .escape(None)
        .comment(None)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(text.as_bytes());

    Records {
        reader,
        input: text.as_bytes(),
        dialect,
        record: StringRecord::new(),
        line: 1,
        scanned: 0,
        failed: false,
    }
}

/// Parse `text` and split off its header.
///
/// With an explicit `header`, every record is data. Otherwise the first
/// record is the header and a text without records is
/// [`ParseError::MissingHeader`].
pub fn parse_with_header<'a>(
    text: &'a str,
    dialect: Dialect,
    header: Option<&[String]>,
) -> ParseResult<(Vec<String>, Records<'a>)> {
    let mut records = parse(text, dialect);
    let header = match header {
        Some(explicit) => explicit.to_vec(),
        None => records.next().ok_or(ParseError::MissingHeader)??.fields,
    };
    debug!(columns = header.len(), "parsed header");
    Ok((header, records))
}

impl Iterator for Records<'_> {
    type Item = ParseResult<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => {
                let start = self
                    .record
                    .position()
                    .map_or(0, |p| p.byte() as usize);
                let end = (self.reader.position().byte() as usize).min(self.input.len());
                let start = start.min(end);

                // The recorded position can sit before skipped line breaks.
                let skipped = self.input[start..end]
                    .iter()
                    .take_while(|b| **b == b'\n' || **b == b'\r')
                    .count();
                let line = self.line_at(start + skipped);
                let raw = &self.input[start + skipped..end];

                // The reader accepts end of input inside quotes; we do not.
                if ends_inside_quotes(raw, self.dialect) {
                    self.failed = true;
                    return Some(Err(ParseError::UnterminatedQuote { line }));
                }

                Some(Ok(RawRecord {
                    line,
                    fields: self.record.iter().map(str::to_string).collect(),
                }))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e.into()))
            }
        }
    }
}

impl Records<'_> {
    /// 1-based line of byte `offset`. LF, CRLF and a lone CR each end a
    /// line. Offsets must not decrease between calls.
    fn line_at(&mut self, offset: usize) -> u64 {
        let offset = offset.max(self.scanned);
        for i in self.scanned..offset {
            let is_break = match self.input[i] {
                b'\n' => true,
                b'\r' => self.input.get(i + 1) != Some(&b'\n'),
                _ => false,
            };
            if is_break {
                self.line += 1;
            }
        }
        self.scanned = offset;
        self.line
    }
}

/// Replay the quoting rules over the raw bytes of one record and report
/// whether a quoted field is still open at the end.
fn ends_inside_quotes(raw: &[u8], dialect: Dialect) -> bool {
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut bytes = raw.iter().peekable();

    while let Some(&b) = bytes.next() {
        if in_quotes {
            if b == dialect.quote {
                if bytes.peek() == Some(&&dialect.quote) {
                    bytes.next();
                } else {
                    in_quotes = false;
                }
            }
            at_field_start = false;
        } else if b == dialect.quote && at_field_start {
            in_quotes = true;
            at_field_start = false;
        } else {
            at_field_start = b == dialect.delimiter || b == b'\n' || b == b'\r';
        }
    }

    in_quotes
}
