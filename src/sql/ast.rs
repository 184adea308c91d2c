//! Clause representation
//!
//! A query is a flat, ordered chain of `keyword <op> value` clauses. The
//! first clause carries the command word and the table name; the rest are
//! column definitions, predicates or assignments depending on the command.

use std::fmt;

use super::token::Operator;

/// One parsed `{keyword, operator, value}` unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub keyword: String,
    pub operator: Operator,
    pub value: String,
}

impl Clause {
    pub fn new(keyword: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            operator,
            value: value.into(),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.keyword, self.operator, self.value)
    }
}

/// Ordered, non-empty sequence of clauses for one query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseChain {
    clauses: Vec<Clause>,
}

impl ClauseChain {
    /// Build a chain, returning `None` when there are no clauses
    pub fn new(clauses: Vec<Clause>) -> Option<Self> {
        if clauses.is_empty() {
            None
        } else {
            Some(Self { clauses })
        }
    }

    /// The command clause (command word + table name)
    pub fn head(&self) -> &Clause {
        &self.clauses[0]
    }

    /// Command word of the query
    pub fn command(&self) -> &str {
        &self.head().keyword
    }

    /// Table name the query targets
    pub fn table_name(&self) -> &str {
        &self.head().value
    }

    /// Every clause after the command clause
    pub fn tail(&self) -> &[Clause] {
        &self.clauses[1..]
    }

    /// All clauses in input order
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl IntoIterator for ClauseChain {
    type Item = Clause;
    type IntoIter = std::vec::IntoIter<Clause>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.into_iter()
    }
}
