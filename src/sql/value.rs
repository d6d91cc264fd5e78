//! `Value` — the tagged scalar carried by literals and parameters.
//!
//! A `Value` knows its own semantic type; the renderer formats each variant
//! per dialect rules when inlining, or hands it untouched to the parameter
//! vector when building a parameterised statement.

use super::dialect::Dialect;

/// A scalar value: either `NULL` or one of the supported literal kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Date(NaiveDateValue),
    Time(NaiveTimeValue),
    DateTime {
        date: NaiveDateValue,
        time: NaiveTimeValue,
        /// Offset in minutes from UTC, when the value carries a timezone.
        tz_offset_minutes: Option<i32>,
    },
}

/// A plain calendar date, stored as components to avoid a hard dependency on
/// a date/time crate this builder never needs beyond formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NaiveDateValue {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

/// A plain time-of-day, stored as components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NaiveTimeValue {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl NaiveDateValue {
    pub fn new(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    fn format(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl NaiveTimeValue {
    pub fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour,
            minute,
            second,
        }
    }

    fn format(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Format this value as an inline SQL literal for the given dialect, per
    /// the value-formatting table.
    pub fn format_inline(&self, dialect: Dialect) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => match dialect {
                Dialect::Postgres | Dialect::Mysql => {
                    if *b {
                        "TRUE".to_string()
                    } else {
                        "FALSE".to_string()
                    }
                }
                Dialect::Sqlite => {
                    if *b {
                        "1".to_string()
                    } else {
                        "0".to_string()
                    }
                }
            },
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::String(s) => quote_string(s),
            Value::Date(d) => format!("'{}'", d.format()),
            Value::Time(t) => format!("'{}'", t.format()),
            Value::DateTime {
                date,
                time,
                tz_offset_minutes,
            } => match tz_offset_minutes {
                None => format!("'{} {}'", date.format(), time.format()),
                Some(offset) => {
                    let sign = if *offset < 0 { '-' } else { '+' };
                    let abs = offset.unsigned_abs();
                    format!(
                        "'{} {} {}{:02}:{:02}'",
                        date.format(),
                        time.format(),
                        sign,
                        abs / 60,
                        abs % 60
                    )
                }
            },
        }
    }
}

/// Single-quote a string literal, doubling embedded single quotes.
fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Format a float with a decimal point, preserving a trailing zero
/// (`3.5`, `1.5`, not `3.5000000001` or `3`).
fn format_float(f: f64) -> String {
    if f.is_nan() || f.is_infinite() {
        panic!("cannot format non-finite float {f} as a SQL literal");
    }
    let mut buf = ryu::Buffer::new();
    let formatted = buf.format_finite(f);
    if formatted.contains('.') || formatted.contains('e') || formatted.contains('E') {
        formatted.to_string()
    } else {
        format!("{formatted}.0")
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_bool_per_dialect() {
        assert_eq!(Value::Bool(true).format_inline(Dialect::Postgres), "TRUE");
        assert_eq!(Value::Bool(true).format_inline(Dialect::Mysql), "TRUE");
        assert_eq!(Value::Bool(true).format_inline(Dialect::Sqlite), "1");
        assert_eq!(Value::Bool(false).format_inline(Dialect::Sqlite), "0");
    }

    #[test]
    fn formats_float_with_trailing_zero() {
        assert_eq!(Value::Float(3.5).format_inline(Dialect::Postgres), "3.5");
        assert_eq!(Value::Float(1.5).format_inline(Dialect::Postgres), "1.5");
        assert_eq!(Value::Float(2.0).format_inline(Dialect::Postgres), "2.0");
    }

    #[test]
    fn quotes_embedded_single_quote() {
        assert_eq!(
            Value::String("O'Brien".into()).format_inline(Dialect::Postgres),
            "'O''Brien'"
        );
    }

    #[test]
    fn formats_date_time_literals() {
        assert_eq!(
            Value::Date(NaiveDateValue::new(2024, 1, 5)).format_inline(Dialect::Postgres),
            "'2024-01-05'"
        );
        assert_eq!(
            Value::Time(NaiveTimeValue::new(9, 30, 0)).format_inline(Dialect::Postgres),
            "'09:30:00'"
        );
        assert_eq!(
            Value::DateTime {
                date: NaiveDateValue::new(2024, 1, 5),
                time: NaiveTimeValue::new(9, 30, 0),
                tz_offset_minutes: None,
            }
            .format_inline(Dialect::Postgres),
            "'2024-01-05 09:30:00'"
        );
        assert_eq!(
            Value::DateTime {
                date: NaiveDateValue::new(2024, 1, 5),
                time: NaiveTimeValue::new(9, 30, 0),
                tz_offset_minutes: Some(-300),
            }
            .format_inline(Dialect::Postgres),
            "'2024-01-05 09:30:00 -05:00'"
        );
    }
}
