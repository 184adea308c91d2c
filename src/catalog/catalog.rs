//! System Catalog for FlatDB
//!
//! The catalog is an append-only file of fixed-size binary schema records,
//! one per table. Records are never rewritten or removed; lookup is a
//! linear scan from the start of the file.
//!
//! Record layout (little-endian):
//!
//! ```text
//! name          [u8; 128]   NUL-padded table name
//! column_count  u32
//! columns       128 x { name [u8; 128], type_tag u8 }
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Cursor, Read, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use tracing::debug;

use super::schema::{Column, TableSchema, MAX_NAME_LEN};
use super::types::FieldType;
use crate::error::{Error, Result};

/// Width of every name field, including the NUL terminator
pub const NAME_WIDTH: usize = MAX_NAME_LEN + 1;

/// Column slots in one record
pub const RECORD_COLUMNS: usize = 128;

/// Size in bytes of one catalog record
pub const RECORD_SIZE: usize = NAME_WIDTH + 4 + RECORD_COLUMNS * (NAME_WIDTH + 1);

/// System Catalog - the persisted sequence of table schemas
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Catalog file path
    path: PathBuf,
}

impl Catalog {
    /// Open a catalog backed by the given file; the file is created on first append
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the catalog file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a schema record to the end of the catalog
    pub fn append_schema(&self, schema: &TableSchema) -> Result<()> {
        let record = encode_record(schema)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&record)?;
        file.flush()?;

        debug!(
            table = schema.name(),
            columns = schema.column_count(),
            "appended catalog record"
        );
        Ok(())
    }

    /// Find the first schema with the given name
    pub fn find_schema(&self, name: &str) -> Result<Option<TableSchema>> {
        let mut reader = match self.open_reader()? {
            Some(reader) => reader,
            None => return Ok(None),
        };

        let mut buf = vec![0u8; RECORD_SIZE];
        while read_record(&mut reader, &mut buf)? {
            let schema = decode_record(&buf)?;
            if schema.name() == name {
                return Ok(Some(schema));
            }
        }
        Ok(None)
    }

    /// Check if a table exists
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        Ok(self.find_schema(name)?.is_some())
    }

    /// List every schema in catalog order
    pub fn list_schemas(&self) -> Result<Vec<TableSchema>> {
        let mut reader = match self.open_reader()? {
            Some(reader) => reader,
            None => return Ok(Vec::new()),
        };

        let mut schemas = Vec::new();
        let mut buf = vec![0u8; RECORD_SIZE];
        while read_record(&mut reader, &mut buf)? {
            schemas.push(decode_record(&buf)?);
        }
        Ok(schemas)
    }

    /// Get table schema info as a formatted string (for .schema command)
    pub fn get_table_info(&self, name: &str) -> Result<String> {
        let schema = self
            .find_schema(name)?
            .ok_or_else(|| Error::TableNotFound(name.to_string()))?;

        let mut info = format!("Table: {}\n", schema.name());
        info.push_str("Columns:\n");
        for col in schema.columns() {
            info.push_str(&format!("  {} {}\n", col.name, col.field_type));
        }
        Ok(info)
    }

    fn open_reader(&self) -> Result<Option<BufReader<File>>> {
        match File::open(&self.path) {
            Ok(file) => Ok(Some(BufReader::new(file))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::IoError(e)),
        }
    }
}

/// Read one full record; `false` on clean end of file.
fn read_record(reader: &mut impl Read, buf: &mut [u8]) -> Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::IoError(e)),
        }
    }

    match filled {
        0 => Ok(false),
        n if n == buf.len() => Ok(true),
        n => Err(Error::CorruptCatalog(format!(
            "truncated record ({} of {} bytes)",
            n, RECORD_SIZE
        ))),
    }
}

fn write_name(record: &mut Vec<u8>, name: &str) -> Result<()> {
    let bytes = name.as_bytes();
    if bytes.len() > MAX_NAME_LEN {
        return Err(Error::NameTooLong(name.to_string(), MAX_NAME_LEN));
    }
    record.extend_from_slice(bytes);
    record.resize(record.len() + NAME_WIDTH - bytes.len(), 0);
    Ok(())
}

fn read_name(cursor: &mut Cursor<&[u8]>) -> Result<String> {
    let mut field = [0u8; NAME_WIDTH];
    cursor.read_exact(&mut field)?;

    let end = field.iter().position(|&b| b == 0).unwrap_or(NAME_WIDTH);
    String::from_utf8(field[..end].to_vec())
        .map_err(|e| Error::CorruptCatalog(format!("invalid name: {}", e)))
}

/// Serialize a schema into one fixed-size record
pub fn encode_record(schema: &TableSchema) -> Result<Vec<u8>> {
    if schema.column_count() > RECORD_COLUMNS {
        return Err(Error::TooManyColumns(
            schema.name().to_string(),
            RECORD_COLUMNS,
        ));
    }

    let mut record = Vec::with_capacity(RECORD_SIZE);
    write_name(&mut record, schema.name())?;
    record.write_u32::<LittleEndian>(schema.column_count() as u32)?;

    for col in schema.columns() {
        write_name(&mut record, &col.name)?;
        record.write_u8(col.field_type.tag())?;
    }
    // Unused slots are zero-filled
    record.resize(RECORD_SIZE, 0);

    Ok(record)
}

/// Deserialize one fixed-size record
pub fn decode_record(record: &[u8]) -> Result<TableSchema> {
    if record.len() != RECORD_SIZE {
        return Err(Error::CorruptCatalog(format!(
            "record is {} bytes, expected {}",
            record.len(),
            RECORD_SIZE
        )));
    }

    let mut cursor = Cursor::new(record);
    let name = read_name(&mut cursor)?;
    let count = cursor.read_u32::<LittleEndian>()? as usize;
    if count > RECORD_COLUMNS {
        return Err(Error::CorruptCatalog(format!(
            "table '{}' claims {} columns",
            name, count
        )));
    }

    let mut columns = Vec::with_capacity(count);
    for _ in 0..count {
        let col_name = read_name(&mut cursor)?;
        let tag = cursor.read_u8()?;
        let field_type = FieldType::from_tag(tag).ok_or_else(|| {
            Error::CorruptCatalog(format!("unknown type tag {} for '{}'", tag, col_name))
        })?;
        columns.push(Column::new(col_name, field_type));
    }

    Ok(TableSchema::from_columns(name, columns))
}
