//! Stateful value providers used as column overrides.
//!
//! A generator registered with
//! [`ImportBuilder::with_generated_value`](crate::ImportBuilder::with_generated_value)
//! is a *prototype*: every `build()` clones it and advances the clone once
//! per data row, so building twice yields the same values.
//!
//! # Example
//!
//! ```rust
//! use csvseed::generator::{self, ValueGenerator};
//! use csvseed::Value;
//!
//! let mut ids = generator::string_sequence("G-").with_left_padding(3);
//! assert_eq!(ids.next_value(), Value::from("G-001"));
//! assert_eq!(ids.next_value(), Value::from("G-002"));
//! ```

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::fmt;

use crate::value::Value;

/// Produces one value per data row.
pub trait ValueGenerator: fmt::Debug + Send {
    /// Return the value for the next row and advance.
    fn next_value(&mut self) -> Value;

    /// Clone this generator, including its current state.
    fn box_clone(&self) -> Box<dyn ValueGenerator>;
}

impl Clone for Box<dyn ValueGenerator> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

// =============================================================================
// Integer Sequence
// =============================================================================

/// Integer sequence, starting at 1 and incrementing by 1 by default.
#[derive(Debug, Clone)]
pub struct Sequence {
    next: i64,
    increment: i64,
}

/// Create a sequence yielding `1, 2, 3, ...`.
pub fn sequence() -> Sequence {
    Sequence {
        next: 1,
        increment: 1,
    }
}

impl Sequence {
    pub fn starting_at(mut self, start: i64) -> Self {
        self.next = start;
        self
    }

    pub fn incrementing_by(mut self, increment: i64) -> Self {
        self.increment = increment;
        self
    }

    /// Return the current number and step forward, saturating at the `i64` range.
    fn advance(&mut self) -> i64 {
        let value = self.next;
        self.next = value.saturating_add(self.increment);
        value
    }
}

impl ValueGenerator for Sequence {
    fn next_value(&mut self) -> Value {
        Value::Integer(self.advance())
    }

    fn box_clone(&self) -> Box<dyn ValueGenerator> {
        Box::new(self.clone())
    }
}

// =============================================================================
// String Sequence
// =============================================================================

/// Prefixed string sequence such as `"G-1", "G-2"`.
#[derive(Debug, Clone)]
pub struct StringSequence {
    prefix: String,
    numbers: Sequence,
    padding: usize,
}

/// Create a sequence yielding `prefix1, prefix2, ...`.
pub fn string_sequence(prefix: impl Into<String>) -> StringSequence {
    StringSequence {
        prefix: prefix.into(),
        numbers: sequence(),
        padding: 0,
    }
}

impl StringSequence {
    pub fn starting_at(mut self, start: i64) -> Self {
        self.numbers = self.numbers.starting_at(start);
        self
    }

    pub fn incrementing_by(mut self, increment: i64) -> Self {
        self.numbers = self.numbers.incrementing_by(increment);
        self
    }

    /// Left-pad the number with zeros to `width` digits.
    pub fn with_left_padding(mut self, width: usize) -> Self {
        self.padding = width;
        self
    }
}

impl ValueGenerator for StringSequence {
    fn next_value(&mut self) -> Value {
        let n = self.numbers.advance();
        Value::Text(format!("{}{:0width$}", self.prefix, n, width = self.padding))
    }

    fn box_clone(&self) -> Box<dyn ValueGenerator> {
        Box::new(self.clone())
    }
}

// =============================================================================
// Date Sequence
// =============================================================================

/// Timestamp sequence, starting at 2000-01-01T00:00:00 and stepping one day.
#[derive(Debug, Clone)]
pub struct DateSequence {
    next: NaiveDateTime,
    step: Duration,
}

/// Create a sequence of timestamps one day apart.
pub fn date_sequence() -> DateSequence {
    DateSequence {
        next: NaiveDate::from_ymd_opt(2000, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default(),
        step: Duration::days(1),
    }
}

impl DateSequence {
    pub fn starting_at(mut self, start: NaiveDateTime) -> Self {
        self.next = start;
        self
    }

    pub fn incrementing_by(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }
}

impl ValueGenerator for DateSequence {
    fn next_value(&mut self) -> Value {
        let value = self.next;
        // Saturate at the representable range rather than wrapping.
        self.next = value.checked_add_signed(self.step).unwrap_or(value);
        Value::DateTime(value)
    }

    fn box_clone(&self) -> Box<dyn ValueGenerator> {
        Box::new(self.clone())
    }
}

// =============================================================================
// Constant
// =============================================================================

/// Yields the same value on every row.
#[derive(Debug, Clone)]
pub struct Constant(Value);

pub fn constant(value: impl Into<Value>) -> Constant {
    Constant(value.into())
}

impl ValueGenerator for Constant {
    fn next_value(&mut self) -> Value {
        self.0.clone()
    }

    fn box_clone(&self) -> Box<dyn ValueGenerator> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn take(generator: &mut dyn ValueGenerator, n: usize) -> Vec<Value> {
        (0..n).map(|_| generator.next_value()).collect()
    }

    #[test]
    fn test_sequence_defaults() {
        let mut seq = sequence();
        assert_eq!(take(&mut seq, 3), vec![Value::from(1), Value::from(2), Value::from(3)]);
    }

    #[test]
    fn test_sequence_custom_start_and_step() {
        let mut seq = sequence().starting_at(100).incrementing_by(10);
        assert_eq!(take(&mut seq, 3), vec![Value::from(100), Value::from(110), Value::from(120)]);
    }

    #[test]
    fn test_sequence_saturates() {
        let mut seq = sequence().starting_at(i64::MAX);
        assert_eq!(take(&mut seq, 2), vec![Value::Integer(i64::MAX), Value::Integer(i64::MAX)]);

        let mut down = sequence().starting_at(i64::MIN + 1).incrementing_by(-5);
        assert_eq!(take(&mut down, 2), vec![Value::Integer(i64::MIN + 1), Value::Integer(i64::MIN)]);

        let mut ids = string_sequence("G-").starting_at(i64::MAX);
        assert_eq!(
            take(&mut ids, 2),
            vec![
                Value::Text(format!("G-{}", i64::MAX)),
                Value::Text(format!("G-{}", i64::MAX)),
            ]
        );
    }

    #[test]
    fn test_string_sequence() {
        let mut seq = string_sequence("G-");
        assert_eq!(take(&mut seq, 2), vec![Value::from("G-1"), Value::from("G-2")]);

        let mut padded = string_sequence("ID").starting_at(9).with_left_padding(3);
        assert_eq!(take(&mut padded, 2), vec![Value::from("ID009"), Value::from("ID010")]);
    }

    #[test]
    fn test_date_sequence() {
        let mut seq = date_sequence().incrementing_by(Duration::hours(12));
        let values = take(&mut seq, 3);
        assert_eq!(values[0].to_string(), "2000-01-01 00:00:00");
        assert_eq!(values[1].to_string(), "2000-01-01 12:00:00");
        assert_eq!(values[2].to_string(), "2000-01-02 00:00:00");
    }

    #[test]
    fn test_box_clone_keeps_state_independent() {
        let mut prototype: Box<dyn ValueGenerator> = Box::new(sequence());
        prototype.next_value();

        let mut first = prototype.clone();
        let mut second = prototype.clone();
        assert_eq!(first.next_value(), Value::Integer(2));
        assert_eq!(first.next_value(), Value::Integer(3));
        assert_eq!(second.next_value(), Value::Integer(2));
    }

    #[test]
    fn test_constant() {
        let mut c = constant(None::<i64>);
        assert_eq!(take(&mut c, 2), vec![Value::Null, Value::Null]);
    }
}
