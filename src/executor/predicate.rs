//! Row filtering
//!
//! Predicate clauses are compiled once against the table schema, resolving
//! each column to its position and parsing each literal to the column type,
//! and then applied to every row. Terms are joined with AND; there is no OR
//! and no grouping. Comparisons read `stored <op> literal`.

use std::cmp::Ordering;

use tracing::warn;

use crate::catalog::TableSchema;
use crate::error::{Error, Result};
use crate::sql::{Clause, Operator};
use crate::storage::{Row, Value};

/// One compiled predicate term
#[derive(Debug, Clone, PartialEq)]
struct Condition {
    position: usize,
    operator: Operator,
    literal: Value,
}

impl Condition {
    fn matches(&self, row: &Row) -> bool {
        let ordering = match row.get(self.position).and_then(|v| v.compare(&self.literal)) {
            Some(ordering) => ordering,
            // NaN or a value of the wrong type never matches
            None => return false,
        };
        // Booleans only compare for equality, whatever the operator
        if matches!(self.literal, Value::Boolean(_)) {
            return ordering == Ordering::Equal;
        }
        apply_operator(self.operator, ordering)
    }
}

fn apply_operator(operator: Operator, ordering: Ordering) -> bool {
    match operator {
        Operator::Equal | Operator::Assign => ordering == Ordering::Equal,
        Operator::NotEqual => ordering != Ordering::Equal,
        Operator::GreaterThan => ordering == Ordering::Greater,
        Operator::LessThan => ordering == Ordering::Less,
        Operator::GreaterOrEqual => ordering != Ordering::Less,
        Operator::LessOrEqual => ordering != Ordering::Greater,
        Operator::Invalid => false,
    }
}

/// Parse a clause literal as the type of the column at `position`
pub fn parse_clause_value(clause: &Clause, schema: &TableSchema, position: usize) -> Result<Value> {
    let column = &schema.columns()[position];
    Value::parse_literal(&clause.value, column.field_type).map_err(|reason| Error::InvalidLiteral {
        column: column.name.clone(),
        value: clause.value.clone(),
        reason,
    })
}

/// Conjunction of predicate terms
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    /// Compile predicate clauses against a schema.
    ///
    /// A clause naming a column the schema lacks is skipped. An `Assign`
    /// clause filters as equality.
    pub fn compile<'a>(
        clauses: impl IntoIterator<Item = &'a Clause>,
        schema: &TableSchema,
    ) -> Result<Self> {
        let mut conditions = Vec::new();

        for clause in clauses {
            let position = match schema.get_column_index(&clause.keyword) {
                Some(position) => position,
                None => {
                    warn!(
                        column = %clause.keyword,
                        table = schema.name(),
                        "skipping predicate on unknown column"
                    );
                    continue;
                }
            };
            if clause.operator == Operator::Invalid {
                return Err(Error::InvalidOperator(clause.operator, clause.keyword.clone()));
            }

            conditions.push(Condition {
                position,
                operator: clause.operator,
                literal: parse_clause_value(clause, schema, position)?,
            });
        }

        Ok(Self { conditions })
    }

    /// Check if a row satisfies every term; an empty filter matches all rows
    pub fn matches(&self, row: &Row) -> bool {
        self.conditions.iter().all(|c| c.matches(row))
    }

    /// Number of active terms
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Decide whether `row` satisfies the predicate tail of a query
pub fn matches(tail: &[Clause], schema: &TableSchema, row: &Row) -> Result<bool> {
    Ok(Filter::compile(tail, schema)?.matches(row))
}

/// Check that every clause names a column of the schema. Runs before any
/// mutation so a bad reference aborts the whole operation.
pub fn validate_clauses(clauses: &[Clause], schema: &TableSchema) -> Result<()> {
    match clauses.iter().find(|c| !schema.has_column(&c.keyword)) {
        Some(clause) => Err(Error::ColumnNotFound(
            clause.keyword.clone(),
            schema.name().to_string(),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Column, FieldType};

    fn schema() -> TableSchema {
        TableSchema::from_columns(
            "people",
            vec![
                Column::new("id", FieldType::Integer),
                Column::new("name", FieldType::String),
                Column::new("score", FieldType::Number),
                Column::new("active", FieldType::Boolean),
            ],
        )
    }

    fn person(id: i64, name: &str, score: f64, active: bool) -> Row {
        Row::new(
            id as u64,
            vec![
                Value::Integer(id),
                Value::from(name),
                Value::Number(score),
                Value::Boolean(active),
            ],
        )
    }

    fn check(keyword: &str, operator: Operator, value: &str, row: &Row) -> bool {
        matches(&[Clause::new(keyword, operator, value)], &schema(), row).unwrap()
    }

    #[test]
    fn test_empty_tail_matches_everything() {
        assert!(matches(&[], &schema(), &person(1, "a", 0.0, false)).unwrap());
    }

    #[test]
    fn test_integer_operators() {
        let row = person(20, "a", 0.0, false);

        assert!(check("id", Operator::Equal, "20", &row));
        assert!(!check("id", Operator::NotEqual, "20", &row));
        assert!(check("id", Operator::GreaterThan, "18", &row));
        assert!(!check("id", Operator::LessThan, "18", &row));
        assert!(check("id", Operator::GreaterOrEqual, "20", &row));
        assert!(check("id", Operator::LessOrEqual, "20", &row));
        assert!(check("id", Operator::LessOrEqual, "21", &row));
        assert!(!check("id", Operator::LessOrEqual, "19", &row));
    }

    #[test]
    fn test_number_operators() {
        let row = person(1, "a", 2.5, false);

        assert!(check("score", Operator::GreaterThan, "2.4", &row));
        assert!(!check("score", Operator::GreaterThan, "2.6", &row));
        assert!(check("score", Operator::LessOrEqual, "2.5", &row));
        assert!(check("score", Operator::Equal, "2.5", &row));
    }

    #[test]
    fn test_string_operators() {
        let row = person(1, "Bob", 0.0, false);

        assert!(check("name", Operator::Equal, "Bob", &row));
        assert!(check("name", Operator::Assign, "Bob", &row));
        assert!(check("name", Operator::GreaterThan, "Alice", &row));
        assert!(check("name", Operator::LessThan, "Carol", &row));
        assert!(!check("name", Operator::NotEqual, "Bob", &row));
    }

    #[test]
    fn test_boolean_operators_compare_equality() {
        let row = person(1, "a", 0.0, true);

        assert!(check("active", Operator::Equal, "True", &row));
        assert!(!check("active", Operator::Equal, "False", &row));
        assert!(check("active", Operator::NotEqual, "True", &row));
        assert!(!check("active", Operator::NotEqual, "False", &row));
        assert!(check("active", Operator::GreaterOrEqual, "True", &row));
        assert!(!check("active", Operator::GreaterThan, "False", &row));
        assert!(!check("active", Operator::LessThan, "False", &row));
    }

    #[test]
    fn test_conjunction() {
        let clauses = vec![
            Clause::new("id", Operator::GreaterOrEqual, "18"),
            Clause::new("name", Operator::Equal, "Bob"),
        ];
        let filter = Filter::compile(&clauses, &schema()).unwrap();

        assert!(filter.matches(&person(20, "Bob", 0.0, false)));
        assert!(!filter.matches(&person(15, "Bob", 0.0, false)));
        assert!(!filter.matches(&person(20, "Eve", 0.0, false)));
    }

    #[test]
    fn test_unknown_column_is_skipped() {
        let clauses = vec![Clause::new("nope", Operator::Equal, "1")];
        let filter = Filter::compile(&clauses, &schema()).unwrap();

        assert!(filter.is_empty());
        assert!(filter.matches(&person(1, "a", 0.0, false)));
    }

    #[test]
    fn test_bad_literal() {
        let clauses = vec![Clause::new("id", Operator::Equal, "abc")];
        let result = Filter::compile(&clauses, &schema());

        assert!(matches!(result, Err(Error::InvalidLiteral { .. })));
    }

    #[test]
    fn test_validate_clauses() {
        let ok = vec![Clause::new("id", Operator::Equal, "1")];
        assert!(validate_clauses(&ok, &schema()).is_ok());

        let unknown = vec![Clause::new("age", Operator::Equal, "1")];
        assert!(matches!(
            validate_clauses(&unknown, &schema()),
            Err(Error::ColumnNotFound(c, t)) if c == "age" && t == "people"
        ));
    }
}
