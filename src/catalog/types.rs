//! Data types for FlatDB
//!
//! This module defines the closed set of column types supported by the
//! data manager.

use std::fmt;

/// Column data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// 64-bit signed integer
    Integer,
    /// Double-precision floating point
    Number,
    /// Owned text, stored single-quoted
    String,
    /// True / False
    Boolean,
}

impl FieldType {
    /// Tag byte used in catalog records
    pub fn tag(&self) -> u8 {
        match self {
            FieldType::Integer => 0,
            FieldType::Number => 1,
            FieldType::String => 2,
            FieldType::Boolean => 3,
        }
    }

    /// Resolve a catalog tag byte
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(FieldType::Integer),
            1 => Some(FieldType::Number),
            2 => Some(FieldType::String),
            3 => Some(FieldType::Boolean),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Integer => write!(f, "INTEGER"),
            FieldType::Number => write!(f, "NUMBER"),
            FieldType::String => write!(f, "STRING"),
            FieldType::Boolean => write!(f, "BOOLEAN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        for ty in [
            FieldType::Integer,
            FieldType::Number,
            FieldType::String,
            FieldType::Boolean,
        ] {
            assert_eq!(FieldType::from_tag(ty.tag()), Some(ty));
        }
        assert_eq!(FieldType::from_tag(9), None);
    }

    #[test]
    fn test_display_matches_type_names() {
        assert_eq!(FieldType::Number.to_string(), "NUMBER");
    }
}
