//! Query language module
//!
//! This module contains the tokenizer, the clause representation and the
//! command/type classifier.

pub mod ast;
pub mod lexer;
pub mod token;

pub use ast::{Clause, ClauseChain};
pub use lexer::{tokenize, Lexer};
pub use token::{classify_command, classify_type, Operator, QueryKind};
