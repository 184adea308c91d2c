//! Storage module
//!
//! This module contains the row codec and the per-table row store.

pub mod table;
pub mod tuple;

pub use table::{RowIter, RowStore};
pub use tuple::{Row, Value};
