//! Query Lexer (Tokenizer)
//!
//! This module converts one query line into an ordered chain of clauses.
//!
//! The scanner has two states. While scanning a token it accumulates a
//! keyword and waits for an operator; once the operator is seen it switches
//! to scanning a value, which ends at unquoted whitespace or end of input.
//! A keyword followed by whitespace and no operator (the `SELECT users`
//! head of every query) takes the default `Assign` operator.

use std::mem;

use super::ast::{Clause, ClauseChain};
use super::token::Operator;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Accumulating a keyword, an operator is expected next
    ScanningToken,
    /// Accumulating a value, whitespace or end of input delimits it
    ScanningValue,
}

/// Query Lexer
pub struct Lexer {
    /// Input characters
    input: Vec<char>,
    /// Current position in input
    position: usize,
}

impl Lexer {
    /// Create a new lexer for the given input
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Tokenize the entire input into a clause chain
    pub fn tokenize(&mut self) -> Result<ClauseChain> {
        let mut clauses = Vec::new();
        let mut state = ScanState::ScanningToken;
        let mut buffer = String::new();
        let mut keyword = String::new();
        let mut operator = Operator::Assign;

        while !self.is_at_end() {
            let ch = self.current_char();

            if Operator::is_operator_char(ch) {
                let start = self.position;
                let (op, width) = Operator::resolve(ch, self.peek_char());

                if state == ScanState::ScanningValue || buffer.trim().is_empty() {
                    return Err(Error::UnexpectedOperator(ch, start));
                }
                if op == Operator::Invalid {
                    return Err(Error::InvalidOperatorToken(ch, start));
                }

                keyword = buffer.trim().to_string();
                buffer.clear();
                operator = op;
                state = ScanState::ScanningValue;

                self.position += width;
                self.skip_whitespace();
                continue;
            }

            match ch {
                '\'' => {
                    if state != ScanState::ScanningValue {
                        return Err(Error::UnexpectedQuote(self.position));
                    }
                    self.read_quoted(&mut buffer)?;
                    continue;
                }
                c if c.is_whitespace() => match state {
                    ScanState::ScanningValue => {
                        clauses.push(Clause::new(
                            mem::take(&mut keyword),
                            operator,
                            mem::take(&mut buffer),
                        ));
                        operator = Operator::Assign;
                        state = ScanState::ScanningToken;
                    }
                    ScanState::ScanningToken if buffer.is_empty() => {}
                    ScanState::ScanningToken => match self.next_non_whitespace() {
                        // trailing whitespace, the pending keyword is reported below
                        None => {}
                        Some(next) if Operator::is_operator_char(next) => buffer.push(c),
                        Some(_) => {
                            keyword = buffer.trim().to_string();
                            buffer.clear();
                            operator = Operator::Assign;
                            state = ScanState::ScanningValue;

                            self.skip_whitespace();
                            continue;
                        }
                    },
                },
                c => buffer.push(c),
            }

            self.advance();
        }

        match state {
            ScanState::ScanningValue => clauses.push(Clause::new(keyword, operator, buffer)),
            ScanState::ScanningToken if !buffer.trim().is_empty() => {
                return Err(Error::MissingValue(buffer.trim().to_string()));
            }
            ScanState::ScanningToken => {}
        }

        ClauseChain::new(clauses).ok_or(Error::EmptyQuery)
    }

    /// Check if we've reached the end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get the current character
    fn current_char(&self) -> char {
        self.input[self.position]
    }

    /// Peek at the next character
    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    /// Advance to the next character
    fn advance(&mut self) {
        self.position += 1;
    }

    /// Skip whitespace characters
    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    /// First non-whitespace character after the current position
    fn next_non_whitespace(&self) -> Option<char> {
        self.input[self.position..]
            .iter()
            .copied()
            .find(|c| !c.is_whitespace())
    }

    /// Read a single-quoted literal into `buffer`, consuming both quotes
    fn read_quoted(&mut self, buffer: &mut String) -> Result<()> {
        let start_pos = self.position;
        self.advance(); // skip opening quote

        while !self.is_at_end() {
            let ch = self.current_char();

            if ch == '\'' {
                // Check for escaped quote ''
                if self.peek_char() == Some('\'') {
                    buffer.push('\'');
                    self.advance();
                    self.advance();
                } else {
                    self.advance(); // skip closing quote
                    return Ok(());
                }
            } else {
                buffer.push(ch);
                self.advance();
            }
        }

        Err(Error::UnterminatedString(start_pos))
    }
}

/// Tokenize a query line into a clause chain
pub fn tokenize(query: &str) -> Result<ClauseChain> {
    Lexer::new(query).tokenize()
}
