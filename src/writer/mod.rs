pub mod csv_sink;
pub mod schema_gen;
pub mod sqlite;

pub use csv_sink::*;
pub use sqlite::*;

use anyhow::Result;
use std::path::PathBuf;

use crate::normalize::Value;
use crate::schema::TargetSchema;

/// Destination of reconciled rows
pub trait RowSink {
    /// Column list every written row must match
    fn schema(&self) -> &TargetSchema;

    /// Write one row; `row.len()` must equal `schema().len()`
    fn write_row(&mut self, row: &[Value]) -> Result<()>;

    /// Flush pending output and return the number of rows written
    fn finish(&mut self) -> Result<u64>;
}

/// Where a run writes its rows
#[derive(Debug, Clone, PartialEq)]
pub enum SinkTarget {
    Csv { path: PathBuf, mode: CsvMode },
    Sqlite { path: PathBuf, table: String },
}

impl SinkTarget {
    /// Open the sink. `default_schema` is only used when the sink does not exist yet.
    pub fn open(&self, default_schema: TargetSchema) -> Result<Box<dyn RowSink>> {
        Ok(match self {
            SinkTarget::Csv { path, mode } => Box::new(CsvSink::open(path, *mode, default_schema)?),
            SinkTarget::Sqlite { path, table } => {
                Box::new(SqliteSink::open(path, table, default_schema)?)
            }
        })
    }
}

impl std::fmt::Display for SinkTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkTarget::Csv { path, .. } => write!(f, "{}", path.display()),
            SinkTarget::Sqlite { path, table } => write!(f, "{}:{}", path.display(), table),
        }
    }
}
