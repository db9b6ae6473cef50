//! Row mapper: binds parsed records to columns and applies overrides.
//!
//! The output column layout is fixed when the mapper is created: header
//! columns in header order, then override-only columns in the order they
//! were registered. An override on a header column keeps the header
//! position and replaces the parsed value.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{ImportError, ImportResult};
use crate::generator::ValueGenerator;
use crate::operation::InsertOperation;
use crate::parser::RawRecord;
use crate::value::Value;

/// Value substituted for a column on every row.
#[derive(Debug, Clone)]
pub enum Override {
    /// The same value on every row.
    Default(Value),
    /// A generator invoked once per row, in row order.
    Generated(Box<dyn ValueGenerator>),
}

/// Where a column's value comes from.
#[derive(Debug)]
enum Slot {
    Parsed(usize),
    Default(Value),
    Generated(Box<dyn ValueGenerator>),
}

impl From<&Override> for Slot {
    fn from(o: &Override) -> Self {
        match o {
            Override::Default(value) => Slot::Default(value.clone()),
            // Fresh copy so the configured prototype never advances.
            Override::Generated(generator) => Slot::Generated(generator.box_clone()),
        }
    }
}

/// The resolved values of one data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowBinding {
    /// 1-based data row index, header excluded.
    pub row: usize,
    /// Line on which the row starts in the resource.
    pub line: u64,
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl RowBinding {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.values.get(idx)
    }

    pub fn into_operation(self, table: Arc<str>) -> InsertOperation {
        InsertOperation::new(table, self.columns, self.values)
    }
}

/// Binds data rows to a header, one row at a time.
#[derive(Debug)]
pub struct RowMapper {
    columns: Arc<[String]>,
    header_len: usize,
    slots: Vec<Slot>,
    null_token: Option<String>,
    rows_bound: usize,
}

impl RowMapper {
    /// Create a mapper for `header`.
    ///
    /// `overrides` must hold at most one entry per column. Fails with
    /// [`ImportError::DuplicateHeader`] if a header name repeats.
    pub fn new(
        header: Vec<String>,
        overrides: &[(String, Override)],
        null_token: Option<String>,
    ) -> ImportResult<Self> {
        let mut seen = HashSet::with_capacity(header.len());
        for name in &header {
            if !seen.insert(name.as_str()) {
                return Err(ImportError::DuplicateHeader(name.clone()));
            }
        }

        let header_len = header.len();
        let mut columns = header;
        let mut slots: Vec<Slot> = (0..header_len).map(Slot::Parsed).collect();

        for (column, value) in overrides {
            match columns.iter().position(|c| c == column) {
                Some(idx) => slots[idx] = Slot::from(value),
                None => {
                    columns.push(column.clone());
                    slots.push(Slot::from(value));
                }
            }
        }

        Ok(Self {
            columns: columns.into(),
            header_len,
            slots,
            null_token,
            rows_bound: 0,
        })
    }

    /// Output columns, header first.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Bind the next data row.
    ///
    /// Rows must be passed in resource order: the row index used in
    /// [`ImportError::RowShape`] and the generator state both advance per call.
    pub fn bind(&mut self, record: RawRecord) -> ImportResult<RowBinding> {
        self.rows_bound += 1;
        let row = self.rows_bound;

        if record.fields.len() != self.header_len {
            return Err(ImportError::RowShape {
                row,
                line: record.line,
                expected: self.header_len,
                found: record.fields.len(),
            });
        }

        let mut fields: Vec<Option<String>> = record.fields.into_iter().map(Some).collect();
        let values = self
            .slots
            .iter_mut()
            .map(|slot| match slot {
                Slot::Parsed(idx) => {
                    let field = fields[*idx].take().unwrap_or_default();
                    match &self.null_token {
                        Some(token) if *token == field => Value::Null,
                        _ => Value::Text(field),
                    }
                }
                Slot::Default(value) => value.clone(),
                Slot::Generated(generator) => generator.next_value(),
            })
            .collect();

        Ok(RowBinding {
            row,
            line: record.line,
            columns: Arc::clone(&self.columns),
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{sequence, string_sequence};

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn record(line: u64, fields: &[&str]) -> RawRecord {
        RawRecord {
            line,
            fields: fields.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_plain_binding() {
        let mut mapper = RowMapper::new(header(&["a", "b"]), &[], None).unwrap();
        let binding = mapper.bind(record(2, &["10", "100"])).unwrap();

        assert_eq!(binding.row, 1);
        assert_eq!(binding.columns(), ["a", "b"]);
        assert_eq!(binding.values(), [Value::from("10"), Value::from("100")]);
    }

    #[test]
    fn test_generator_wins_over_parsed_value() {
        let overrides = vec![("a".to_string(), Override::Generated(Box::new(sequence())))];
        let mut mapper = RowMapper::new(header(&["a", "b"]), &overrides, None).unwrap();

        let first = mapper.bind(record(2, &["10", "100"])).unwrap();
        let second = mapper.bind(record(3, &["20", "200"])).unwrap();

        assert_eq!(first.get("a"), Some(&Value::Integer(1)));
        assert_eq!(first.get("b"), Some(&Value::from("100")));
        assert_eq!(second.get("a"), Some(&Value::Integer(2)));
        assert_eq!(second.get("b"), Some(&Value::from("200")));
    }

    #[test]
    fn test_override_only_columns_are_appended() {
        let overrides = vec![
            ("g".to_string(), Override::Default(Value::from("G"))),
            ("i".to_string(), Override::Default(Value::Null)),
            ("k".to_string(), Override::Generated(Box::new(string_sequence("K-")))),
        ];
        let mut mapper = RowMapper::new(header(&["a", "b"]), &overrides, None).unwrap();
        assert_eq!(mapper.columns(), ["a", "b", "g", "i", "k"]);

        let binding = mapper.bind(record(2, &["1", "2"])).unwrap();
        assert_eq!(
            binding.values(),
            [
                Value::from("1"),
                Value::from("2"),
                Value::from("G"),
                Value::Null,
                Value::from("K-1"),
            ]
        );
    }

    #[test]
    fn test_prototype_is_not_advanced() {
        let overrides = vec![("a".to_string(), Override::Generated(Box::new(sequence())))];

        for _ in 0..2 {
            let mut mapper = RowMapper::new(header(&["a"]), &overrides, None).unwrap();
            let binding = mapper.bind(record(2, &["x"])).unwrap();
            assert_eq!(binding.get("a"), Some(&Value::Integer(1)));
        }
    }

    #[test]
    fn test_null_token() {
        let mut mapper =
            RowMapper::new(header(&["a", "b", "c"]), &[], Some("\\N".to_string())).unwrap();
        let binding = mapper.bind(record(1, &["\\N", "", "N"])).unwrap();

        assert_eq!(binding.values(), [Value::Null, Value::from(""), Value::from("N")]);
    }

    #[test]
    fn test_empty_string_stays_text_without_token() {
        let mut mapper = RowMapper::new(header(&["a"]), &[], None).unwrap();
        let binding = mapper.bind(record(2, &[""])).unwrap();

        assert_eq!(binding.get("a"), Some(&Value::from("")));
    }

    #[test]
    fn test_row_shape_error() {
        let mut mapper = RowMapper::new(header(&["a", "b"]), &[], None).unwrap();
        mapper.bind(record(2, &["10", "100"])).unwrap();

        let err = mapper.bind(record(3, &["20"])).unwrap_err();
        assert!(matches!(
            err,
            ImportError::RowShape { row: 2, line: 3, expected: 2, found: 1 }
        ));
    }

    #[test]
    fn test_duplicate_header() {
        let err = RowMapper::new(header(&["a", "b", "a"]), &[], None).unwrap_err();
        assert!(matches!(err, ImportError::DuplicateHeader(ref c) if c == "a"));
    }

    #[test]
    fn test_columns_are_case_sensitive() {
        let overrides = vec![("A".to_string(), Override::Default(Value::from(1)))];
        let mut mapper = RowMapper::new(header(&["a"]), &overrides, None).unwrap();
        let binding = mapper.bind(record(2, &["x"])).unwrap();

        assert_eq!(binding.get("a"), Some(&Value::from("x")));
        assert_eq!(binding.get("A"), Some(&Value::Integer(1)));
    }
}
