//! Schema definitions for FlatDB
//!
//! This module defines table schemas and column metadata.

use super::types::FieldType;
use crate::error::{Error, Result};

/// Longest table or column name, in bytes
pub const MAX_NAME_LEN: usize = 127;

/// Column definition in a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Data type
    pub field_type: FieldType,
}

impl Column {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Table schema: a name plus ordered columns, immutable once created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    /// Table name
    name: String,
    /// Ordered list of columns, also the on-disk field order
    columns: Vec<Column>,
}

impl TableSchema {
    /// Create a new schema with no columns
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Create a schema from a list of columns
    pub fn from_columns(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Add a column to the schema, rejecting duplicate names
    pub fn add_column(&mut self, column: Column) -> Result<()> {
        if self.has_column(&column.name) {
            return Err(Error::ColumnAlreadyExists(column.name, self.name.clone()));
        }
        self.columns.push(column);
        Ok(())
    }

    /// Get the table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get column position by name (linear scan)
    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get all columns
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Check if column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.get_column_index(name).is_some()
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Check a column name against the catalog's name rules
pub fn validate_column_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidName(name.to_string()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(Error::NameTooLong(name.to_string(), MAX_NAME_LEN));
    }
    Ok(())
}

/// Check a table name; it also names the row-store file.
pub fn validate_table_name(name: &str) -> Result<()> {
    validate_column_name(name)?;

    let reserved = name.starts_with("__") || name == "." || name == "..";
    let bad_char = name.chars().any(|c| matches!(c, '/' | '\\' | '\0'));
    if reserved || bad_char {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_creation() {
        let mut schema = TableSchema::new("users");
        schema
            .add_column(Column::new("id", FieldType::Integer))
            .unwrap();
        schema
            .add_column(Column::new("name", FieldType::String))
            .unwrap();

        assert_eq!(schema.name(), "users");
        assert_eq!(schema.column_count(), 2);
        assert_eq!(schema.get_column_index("name"), Some(1));
        assert!(schema.has_column("id"));
        assert!(!schema.has_column("unknown"));
        assert_eq!(schema.column_names(), vec!["id", "name"]);
    }

    #[test]
    fn test_duplicate_column() {
        let mut schema = TableSchema::new("t");
        schema.add_column(Column::new("a", FieldType::Integer)).unwrap();

        let result = schema.add_column(Column::new("a", FieldType::String));
        assert!(matches!(result, Err(Error::ColumnAlreadyExists(_, _))));
    }

    #[test]
    fn test_name_rules() {
        assert!(validate_table_name("users").is_ok());
        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("../etc").is_err());
        assert!(validate_table_name("__tables_data.dat").is_err());
        assert!(matches!(
            validate_table_name(&"x".repeat(128)),
            Err(Error::NameTooLong(_, 127))
        ));
        assert!(validate_column_name(&"x".repeat(127)).is_ok());
    }
}
