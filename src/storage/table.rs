//! Row store for FlatDB
//!
//! Each table's rows live in one text file named after the table, one
//! encoded row per line. Inserts append; updates and deletes rebuild the
//! whole file in a temporary file next to it and swap it in with a single
//! rename, so readers only ever see the old or the new content.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::Builder;
use tracing::{debug, info};

use super::tuple::Row;
use crate::catalog::TableSchema;
use crate::error::{Error, Result};

/// The persisted rows of one table
#[derive(Debug, Clone)]
pub struct RowStore {
    /// Table schema
    schema: TableSchema,
    /// Row store file path
    path: PathBuf,
    /// Prefix for replacement files
    temp_prefix: String,
}

impl RowStore {
    /// Open the row store of `schema` inside `data_dir`
    pub fn new(data_dir: &Path, schema: TableSchema, temp_prefix: impl Into<String>) -> Self {
        let path = data_dir.join(schema.name());
        Self {
            schema,
            path,
            temp_prefix: temp_prefix.into(),
        }
    }

    /// Get table name
    pub fn name(&self) -> &str {
        self.schema.name()
    }

    /// Get table schema
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Get the row store file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stream every row in store order. A missing file holds no rows.
    pub fn scan(&self) -> Result<RowIter<'_>> {
        let lines = match File::open(&self.path) {
            Ok(file) => Some(BufReader::new(file).lines()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(Error::IoError(e)),
        };

        Ok(RowIter {
            lines,
            schema: &self.schema,
            line_no: 0,
        })
    }

    /// Load every row into memory
    pub fn load(&self) -> Result<Vec<Row>> {
        self.scan()?.collect()
    }

    /// Count the rows in the store
    pub fn row_count(&self) -> Result<usize> {
        self.scan()?.try_fold(0, |count, row| row.map(|_| count + 1))
    }

    /// Append one row to the end of the store
    pub fn append(&self, row: &Row) -> Result<()> {
        if !row.conforms_to(&self.schema) {
            return Err(Error::Internal(format!(
                "row does not match the schema of '{}'",
                self.name()
            )));
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(row.encode().as_bytes())?;
        file.flush()?;

        debug!(table = self.name(), index = row.index(), "appended row");
        Ok(())
    }

    /// Rebuild the store through `f` and swap the result in atomically.
    ///
    /// `f` sees every row in order and returns the row to keep (possibly
    /// modified) or `None` to drop it. If `f` or any I/O fails, the
    /// replacement file is removed and the store is left untouched.
    /// Returns the number of rows written.
    pub fn rewrite<F>(&self, mut f: F) -> Result<usize>
    where
        F: FnMut(Row) -> Result<Option<Row>>,
    {
        if !self.path.exists() {
            return Ok(0);
        }

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let temp = Builder::new()
            .prefix(&self.temp_prefix)
            .tempfile_in(dir)?;
        debug!(table = self.name(), temp = ?temp.path(), "rewriting row store");

        let mut writer = BufWriter::new(temp);
        let mut written = 0;
        for row in self.scan()? {
            if let Some(row) = f(row?)? {
                if !row.conforms_to(&self.schema) {
                    return Err(Error::Internal(format!(
                        "rewritten row does not match the schema of '{}'",
                        self.name()
                    )));
                }
                writer.write_all(row.encode().as_bytes())?;
                written += 1;
            }
        }

        let temp = writer
            .into_inner()
            .map_err(|e| Error::IoError(e.into_error()))?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path)?;

        info!(table = self.name(), rows = written, "row store replaced");
        Ok(written)
    }
}

/// Streaming iterator over the rows of a store
pub struct RowIter<'a> {
    lines: Option<io::Lines<BufReader<File>>>,
    schema: &'a TableSchema,
    line_no: usize,
}

impl Iterator for RowIter<'_> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let lines = self.lines.as_mut()?;

        loop {
            let line = match lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(Error::IoError(e))),
            };
            self.line_no += 1;

            if line.trim().is_empty() {
                continue;
            }

            return Some(
                Row::decode(&line, self.schema).map_err(|reason| Error::MalformedRow {
                    table: self.schema.name().to_string(),
                    line: self.line_no,
                    reason,
                }),
            );
        }
    }
}
