//! Query Executor for FlatDB
//!
//! This module runs one query line end to end: tokenize, classify the
//! command word, look the table up in the catalog and dispatch to the
//! matching handler. The engine keeps no state between queries apart from
//! the files in the data directory.

use std::io::{self, Write};

use tracing::{debug, info, warn};

use super::predicate::{parse_clause_value, validate_clauses, Filter};
use crate::catalog::schema::{validate_column_name, validate_table_name};
use crate::catalog::{Catalog, Column, TableSchema};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::sql::{classify_command, classify_type, tokenize, ClauseChain, Operator, QueryKind};
use crate::storage::{Row, RowStore, Value};

/// Query result
#[derive(Debug)]
pub struct QueryResult {
    /// Column names (SELECT only)
    pub columns: Vec<String>,
    /// Result rows (SELECT only)
    pub rows: Vec<Row>,
    /// Number of affected rows (for INSERT/UPDATE/DELETE)
    pub affected_rows: usize,
    /// Message
    pub message: Option<String>,
}

impl QueryResult {
    /// Create a new empty result
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            affected_rows: 0,
            message: None,
        }
    }

    /// Create a result with a message
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::empty()
        }
    }

    /// Create a result with affected rows count
    pub fn with_affected_rows(count: usize, message: impl Into<String>) -> Self {
        Self {
            affected_rows: count,
            message: Some(message.into()),
            ..Self::empty()
        }
    }

    /// Create a result carrying selected rows
    pub fn with_rows(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows,
            ..Self::empty()
        }
    }

    /// Write every row to `out`, one line per row
    pub fn write_rows(&self, out: &mut impl Write) -> io::Result<()> {
        for row in &self.rows {
            writeln!(out, "{}", format_row(row))?;
        }
        Ok(())
    }
}

/// Render a row as fixed-width cells: numbers right-aligned, text left-aligned
pub fn format_row(row: &Row) -> String {
    row.values()
        .iter()
        .map(|value| match value {
            Value::Integer(_) | Value::Number(_) => format!("{:>10}|\t", value.to_string()),
            Value::String(_) | Value::Boolean(_) => format!("{:<10}|\t", value.to_string()),
        })
        .collect()
}

/// Execution Engine
#[derive(Debug)]
pub struct ExecutionEngine {
    /// Engine configuration
    config: Config,
    /// Schema catalog
    catalog: Catalog,
}

impl ExecutionEngine {
    /// Create a new execution engine, creating the data directory if needed
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        if !config.data_dir.exists() {
            std::fs::create_dir_all(&config.data_dir)?;
        }

        let catalog = Catalog::new(config.catalog_path());
        Ok(Self { config, catalog })
    }

    /// Get the schema catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Get the engine configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute one query line
    pub fn execute(&self, query: &str) -> Result<QueryResult> {
        let chain = tokenize(query)?;
        debug!(
            command = chain.command(),
            table = chain.table_name(),
            clauses = chain.len(),
            "parsed query"
        );

        let kind = match classify_command(chain.command()) {
            Some(kind) => kind,
            None => {
                warn!(command = chain.command(), "ignoring unknown command");
                return Ok(QueryResult::empty());
            }
        };

        match kind {
            QueryKind::Create => self.execute_create(&chain),
            QueryKind::Select => self.execute_select(&chain),
            QueryKind::Insert => self.execute_insert(&chain),
            QueryKind::Update => self.execute_update(&chain),
            QueryKind::Delete => self.execute_delete(&chain),
        }
    }

    /// Open the row store of an existing table
    fn open_table(&self, table_name: &str) -> Result<RowStore> {
        let schema = self
            .catalog
            .find_schema(table_name)?
            .ok_or_else(|| Error::TableNotFound(table_name.to_string()))?;

        Ok(RowStore::new(
            &self.config.data_dir,
            schema,
            self.config.temp_prefix.clone(),
        ))
    }

    fn execute_create(&self, chain: &ClauseChain) -> Result<QueryResult> {
        let table_name = chain.table_name();
        validate_table_name(table_name)?;
        // The row store would collide with an engine file
        if table_name == self.config.catalog_file
            || table_name.starts_with(&self.config.temp_prefix)
        {
            return Err(Error::InvalidName(table_name.to_string()));
        }

        // Check if table already exists
        if self.catalog.table_exists(table_name)? {
            return Err(Error::TableAlreadyExists(table_name.to_string()));
        }
        if chain.tail().len() > self.config.max_columns {
            return Err(Error::TooManyColumns(
                table_name.to_string(),
                self.config.max_columns,
            ));
        }

        // Build schema
        let mut schema = TableSchema::new(table_name);
        for clause in chain.tail() {
            if clause.operator != Operator::Assign {
                return Err(Error::InvalidOperator(clause.operator, clause.keyword.clone()));
            }
            validate_column_name(&clause.keyword)?;

            let field_type = classify_type(&clause.value)
                .ok_or_else(|| Error::UnknownType(clause.value.clone(), clause.keyword.clone()))?;
            schema.add_column(Column::new(clause.keyword.clone(), field_type))?;
        }

        self.catalog.append_schema(&schema)?;
        info!(
            table = table_name,
            columns = schema.column_count(),
            "table created"
        );

        Ok(QueryResult::with_message(format!(
            "Table '{}' created",
            table_name
        )))
    }

    fn execute_select(&self, chain: &ClauseChain) -> Result<QueryResult> {
        let store = self.open_table(chain.table_name())?;
        let filter = Filter::compile(chain.tail(), store.schema())?;

        let mut rows = Vec::new();
        for row in store.scan()? {
            let row = row?;
            if filter.matches(&row) {
                rows.push(row);
            }
        }

        let columns = store
            .schema()
            .column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        Ok(QueryResult::with_rows(columns, rows))
    }

    fn execute_insert(&self, chain: &ClauseChain) -> Result<QueryResult> {
        let store = self.open_table(chain.table_name())?;
        let schema = store.schema();
        let clauses = chain.tail();

        for clause in clauses {
            if !matches!(clause.operator, Operator::Assign | Operator::Equal) {
                return Err(Error::InvalidOperator(clause.operator, clause.keyword.clone()));
            }
        }
        validate_clauses(clauses, schema)?;

        if clauses.len() > schema.column_count() || clauses.len() > self.config.max_columns {
            return Err(Error::TooManyFields(schema.name().to_string()));
        }
        if clauses.len() < schema.column_count() {
            return Err(Error::MissingValues {
                table: schema.name().to_string(),
                expected: schema.column_count(),
                found: clauses.len(),
            });
        }

        // Values bind to columns by position, in clause order
        let values = clauses
            .iter()
            .enumerate()
            .map(|(position, clause)| parse_clause_value(clause, schema, position))
            .collect::<Result<Vec<_>>>()?;

        let index = store.row_count()? as u64;
        store.append(&Row::new(index, values))?;

        Ok(QueryResult::with_affected_rows(1, "1 row(s) inserted"))
    }

    fn execute_update(&self, chain: &ClauseChain) -> Result<QueryResult> {
        let store = self.open_table(chain.table_name())?;
        let schema = store.schema();
        validate_clauses(chain.tail(), schema)?;

        let (assign_clauses, predicates): (Vec<_>, Vec<_>) = chain
            .tail()
            .iter()
            .partition(|c| c.operator == Operator::Assign);

        let mut assignments = Vec::with_capacity(assign_clauses.len());
        for clause in assign_clauses {
            let position = schema
                .get_column_index(&clause.keyword)
                .ok_or_else(|| Error::ColumnNotFound(clause.keyword.clone(), schema.name().to_string()))?;
            assignments.push((position, parse_clause_value(clause, schema, position)?));
        }
        let filter = Filter::compile(predicates, schema)?;

        let mut updated = 0;
        store.rewrite(|mut row| {
            if filter.matches(&row) {
                for (position, value) in &assignments {
                    row.set(*position, value.clone());
                }
                updated += 1;
            }
            Ok(Some(row))
        })?;

        Ok(QueryResult::with_affected_rows(
            updated,
            format!("{} row(s) updated", updated),
        ))
    }

    fn execute_delete(&self, chain: &ClauseChain) -> Result<QueryResult> {
        let store = self.open_table(chain.table_name())?;
        validate_clauses(chain.tail(), store.schema())?;
        let filter = Filter::compile(chain.tail(), store.schema())?;

        let mut deleted = 0;
        store.rewrite(|row| {
            if filter.matches(&row) {
                deleted += 1;
                Ok(None)
            } else {
                Ok(Some(row))
            }
        })?;

        Ok(QueryResult::with_affected_rows(
            deleted,
            format!("{} row(s) deleted", deleted),
        ))
    }
}
