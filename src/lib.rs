//! FlatDB - A minimal single-user SQL-like data manager
//!
//! This library provides the core components of the data manager:
//! - Query tokenizing into a clause chain and command/type classification
//! - Schema catalog of fixed-size binary records
//! - Flat-file row stores with a textual row codec
//! - Predicate evaluation and the query execution engine

pub mod catalog;
pub mod config;
pub mod error;
pub mod executor;
pub mod sql;
pub mod storage;

pub use config::Config;
pub use error::{Error, ErrorCategory, Result};
pub use executor::{ExecutionEngine, QueryResult};
