//! Row and Value types for FlatDB
//!
//! This module defines how data values are represented in memory and the
//! textual line format rows take in a row store:
//!
//! ```text
//! index;value;value;...\n
//! ```
//!
//! Integers are decimal, numbers use the shortest round-trip float notation,
//! booleans are the words `True` / `False` and strings are single-quoted.

use std::cmp::Ordering;
use std::fmt;
use std::fmt::Write as _;

use crate::catalog::{FieldType, TableSchema};

/// Field delimiter inside a row line
pub const FIELD_DELIMITER: char = ';';

/// A typed value; its tag always matches the declared column type
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Integer value (64-bit)
    Integer(i64),
    /// Floating point value (64-bit)
    Number(f64),
    /// String value
    String(String),
    /// Boolean value
    Boolean(bool),
}

impl Value {
    /// Get the type of this value
    pub fn field_type(&self) -> FieldType {
        match self {
            Value::Integer(_) => FieldType::Integer,
            Value::Number(_) => FieldType::Number,
            Value::String(_) => FieldType::String,
            Value::Boolean(_) => FieldType::Boolean,
        }
    }

    /// Parse a query literal as the given column type.
    ///
    /// Booleans follow the store rule: exactly `True` is true, anything else
    /// is false.
    pub fn parse_literal(literal: &str, field_type: FieldType) -> Result<Value, String> {
        match field_type {
            FieldType::Integer => literal
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| format!("not an INTEGER ({})", e)),
            FieldType::Number => literal
                .trim()
                .parse::<f64>()
                .map(Value::Number)
                .map_err(|e| format!("not a NUMBER ({})", e)),
            FieldType::Boolean => Ok(Value::Boolean(literal == "True")),
            FieldType::String => {
                if literal.contains([FIELD_DELIMITER, '\n', '\r']) {
                    return Err("strings may not contain ';' or line breaks".to_string());
                }
                Ok(Value::String(literal.to_string()))
            }
        }
    }

    /// Decode one stored field
    fn decode_field(field: &str, field_type: FieldType) -> Result<Value, String> {
        match field_type {
            FieldType::String => {
                let field = field.strip_prefix('\'').unwrap_or(field);
                let field = field.strip_suffix('\'').unwrap_or(field);
                Ok(Value::String(field.to_string()))
            }
            other => Value::parse_literal(field, other),
        }
    }

    /// Append the stored form of this value
    fn encode_into(&self, out: &mut String) {
        // Writing into a String cannot fail
        let _ = match self {
            Value::Integer(i) => write!(out, "{}", i),
            Value::Number(n) => write!(out, "{}", n),
            Value::String(s) => write!(out, "'{}'", s),
            Value::Boolean(b) => write!(out, "{}", if *b { "True" } else { "False" }),
        };
    }

    /// Try to get the integer payload
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get the string payload
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Compare two values of the same type
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            _ => None, // Incompatible types
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Boolean(b) => write!(f, "{}", if *b { "True" } else { "False" }),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
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

/// A row in a table
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Ordinal assigned when the row was inserted
    index: u64,
    /// Values in column order
    values: Vec<Value>,
}

impl Row {
    /// Create a new row from values
    pub fn new(index: u64, values: Vec<Value>) -> Self {
        Self { index, values }
    }

    /// Get the row index
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Get a value by position
    pub fn get(&self, position: usize) -> Option<&Value> {
        self.values.get(position)
    }

    /// Set a value by position
    pub fn set(&mut self, position: usize, value: Value) {
        if position < self.values.len() {
            self.values[position] = value;
        }
    }

    /// Get all values
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Get number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if row is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check that the row has one value per column, each of the column's type
    pub fn conforms_to(&self, schema: &TableSchema) -> bool {
        self.values.len() == schema.column_count()
            && self
                .values
                .iter()
                .zip(schema.columns())
                .all(|(value, col)| value.field_type() == col.field_type)
    }

    /// Encode the row as one newline-terminated store line
    pub fn encode(&self) -> String {
        let mut line = self.index.to_string();
        for value in &self.values {
            line.push(FIELD_DELIMITER);
            value.encode_into(&mut line);
        }
        line.push('\n');
        line
    }

    /// Decode one store line against a schema.
    ///
    /// The line must hold exactly `column_count + 1` fields. A trailing
    /// delimiter before the line end is accepted.
    pub fn decode(line: &str, schema: &TableSchema) -> Result<Row, String> {
        let line = line.trim_end_matches(['\n', '\r']);
        let line = line.strip_suffix(FIELD_DELIMITER).unwrap_or(line);

        let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        if fields.len() != schema.column_count() + 1 {
            return Err(format!(
                "expected {} fields, found {}",
                schema.column_count() + 1,
                fields.len()
            ));
        }

        let index = fields[0]
            .trim()
            .parse::<u64>()
            .map_err(|e| format!("invalid row index '{}' ({})", fields[0], e))?;

        let values = fields[1..]
            .iter()
            .zip(schema.columns())
            .map(|(field, col)| {
                Value::decode_field(field, col.field_type)
                    .map_err(|e| format!("column '{}': {}", col.name, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Row::new(index, values))
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
