//! Query execution module
//!
//! This module contains the predicate evaluator and the execution engine.

pub mod executor;
pub mod predicate;

pub use executor::{format_row, ExecutionEngine, QueryResult};
pub use predicate::{matches, validate_clauses, Filter};
