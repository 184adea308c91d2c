//! Operators and keyword tables
//!
//! This module defines the comparison/assignment operators that can appear
//! between a clause keyword and its value, and the statically sorted name
//! tables used to classify command words and type names.

use std::fmt;

use crate::catalog::FieldType;

/// Operator joining a clause keyword to its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// =
    Equal,
    /// <> or !=
    NotEqual,
    /// >
    GreaterThan,
    /// <
    LessThan,
    /// >=
    GreaterOrEqual,
    /// <=
    LessOrEqual,
    /// : or no punctuation at all
    Assign,
    /// Unrecognized punctuation
    Invalid,
}

impl Operator {
    /// Check if a character starts an operator
    pub fn is_operator_char(ch: char) -> bool {
        matches!(ch, ':' | '<' | '>' | '!' | '=')
    }

    /// Resolve an operator from its first character and a one-character lookahead.
    ///
    /// Returns the operator and the number of characters it occupies.
    pub fn resolve(ch: char, next: Option<char>) -> (Operator, usize) {
        match (ch, next) {
            ('>', Some('=')) => (Operator::GreaterOrEqual, 2),
            ('>', _) => (Operator::GreaterThan, 1),
            ('<', Some('=')) => (Operator::LessOrEqual, 2),
            ('<', Some('>')) => (Operator::NotEqual, 2),
            ('<', _) => (Operator::LessThan, 1),
            ('!', Some('=')) => (Operator::NotEqual, 2),
            ('!', _) => (Operator::Invalid, 1),
            ('=', _) => (Operator::Equal, 1),
            _ => (Operator::Assign, 1),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Equal => write!(f, "="),
            Operator::NotEqual => write!(f, "<>"),
            Operator::GreaterThan => write!(f, ">"),
            Operator::LessThan => write!(f, "<"),
            Operator::GreaterOrEqual => write!(f, ">="),
            Operator::LessOrEqual => write!(f, "<="),
            Operator::Assign => write!(f, ":"),
            Operator::Invalid => write!(f, "?"),
        }
    }
}

/// Kind of query named by the first clause keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Create,
    Select,
    Insert,
    Update,
    Delete,
}

/// Command words, sorted for binary search
static QUERY_KINDS: [(&str, QueryKind); 5] = [
    ("DATASET", QueryKind::Create),
    ("DELETE", QueryKind::Delete),
    ("INSERT_INTO", QueryKind::Insert),
    ("SELECT", QueryKind::Select),
    ("UPDATE", QueryKind::Update),
];

/// Type names, sorted for binary search
static FIELD_TYPES: [(&str, FieldType); 4] = [
    ("BOOLEAN", FieldType::Boolean),
    ("INTEGER", FieldType::Integer),
    ("NUMBER", FieldType::Number),
    ("STRING", FieldType::String),
];

fn find_in_map<T: Copy>(map: &[(&str, T)], word: &str) -> Option<T> {
    map.binary_search_by(|(name, _)| (*name).cmp(word))
        .ok()
        .map(|idx| map[idx].1)
}

/// Classify a command word (case-sensitive)
pub fn classify_command(word: &str) -> Option<QueryKind> {
    find_in_map(&QUERY_KINDS, word)
}

/// Classify a type name (case-sensitive)
pub fn classify_type(word: &str) -> Option<FieldType> {
    find_in_map(&FIELD_TYPES, word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_sorted() {
        assert!(QUERY_KINDS.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(FIELD_TYPES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_classify_command() {
        assert_eq!(classify_command("DATASET"), Some(QueryKind::Create));
        assert_eq!(classify_command("SELECT"), Some(QueryKind::Select));
        assert_eq!(classify_command("INSERT_INTO"), Some(QueryKind::Insert));
        assert_eq!(classify_command("UPDATE"), Some(QueryKind::Update));
        assert_eq!(classify_command("DELETE"), Some(QueryKind::Delete));
        assert_eq!(classify_command("select"), None);
        assert_eq!(classify_command("DROP"), None);
    }

    #[test]
    fn test_classify_type() {
        assert_eq!(classify_type("INTEGER"), Some(FieldType::Integer));
        assert_eq!(classify_type("NUMBER"), Some(FieldType::Number));
        assert_eq!(classify_type("STRING"), Some(FieldType::String));
        assert_eq!(classify_type("BOOLEAN"), Some(FieldType::Boolean));
        assert_eq!(classify_type("Integer"), None);
    }

    #[test]
    fn test_resolve_operators() {
        assert_eq!(Operator::resolve('>', Some('=')), (Operator::GreaterOrEqual, 2));
        assert_eq!(Operator::resolve('>', Some('1')), (Operator::GreaterThan, 1));
        assert_eq!(Operator::resolve('<', Some('=')), (Operator::LessOrEqual, 2));
        assert_eq!(Operator::resolve('<', Some('>')), (Operator::NotEqual, 2));
        assert_eq!(Operator::resolve('<', None), (Operator::LessThan, 1));
        assert_eq!(Operator::resolve('!', Some('=')), (Operator::NotEqual, 2));
        assert_eq!(Operator::resolve('!', Some('x')), (Operator::Invalid, 1));
        assert_eq!(Operator::resolve('=', Some('=')), (Operator::Equal, 1));
        assert_eq!(Operator::resolve(':', None), (Operator::Assign, 1));
    }
}
