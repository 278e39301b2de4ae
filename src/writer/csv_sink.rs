use anyhow::{bail, Context, Result};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

use super::RowSink;
use crate::normalize::Value;
use crate::schema::TargetSchema;

/// How a run's rows reach the CSV file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CsvMode {
    /// Keep existing rows and append this run's rows
    #[default]
    Append,
    /// Replace the file with this run's rows once the run finishes
    Snapshot,
}

impl FromStr for CsvMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "append" => Ok(Self::Append),
            "snapshot" => Ok(Self::Snapshot),
            other => Err(format!("Unknown CSV mode: {} (expected append or snapshot)", other)),
        }
    }
}

/// Header of an existing CSV file, or `None` when the file is absent or empty
pub fn read_header(path: &Path) -> Result<Option<TargetSchema>> {
    if !path.exists() {
        return Ok(None);
    }

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV file: {:?}", path))?;
    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header: {:?}", path))?;

    if headers.is_empty() {
        return Ok(None);
    }
    Ok(Some(TargetSchema::new(headers.iter())))
}

pub struct CsvSink {
    writer: csv::Writer<File>,
    schema: TargetSchema,
    /// Temporary file and final destination in snapshot mode
    pending_rename: Option<(PathBuf, PathBuf)>,
    count: u64,
}

impl CsvSink {
    /// Open `path`, reusing its header as the target schema when it exists. A new file is
    /// bootstrapped with `default_schema`.
    pub fn open(path: &Path, mode: CsvMode, default_schema: TargetSchema) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
        }

        let existing = read_header(path)?;
        let bootstrap = existing.is_none();
        let schema = existing.unwrap_or(default_schema);

        let (file, pending_rename, write_header) = match mode {
            CsvMode::Append if bootstrap => {
                info!(path = ?path, columns = schema.len(), "creating CSV file");
                let file = File::create(path)
                    .with_context(|| format!("Failed to create CSV file: {:?}", path))?;
                (file, None, true)
            }
            CsvMode::Append => {
                let file = OpenOptions::new()
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open CSV file for append: {:?}", path))?;
                (file, None, false)
            }
            CsvMode::Snapshot => {
                let tmp = temp_path(path);
                let file = File::create(&tmp)
                    .with_context(|| format!("Failed to create temporary file: {:?}", tmp))?;
                (file, Some((tmp, path.to_path_buf())), true)
            }
        };

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if write_header {
            writer
                .write_record(schema.iter())
                .context("Failed to write CSV header")?;
            writer.flush().context("Failed to flush CSV header")?;
        }

        Ok(Self {
            writer,
            schema,
            pending_rename,
            count: 0,
        })
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

impl RowSink for CsvSink {
    fn schema(&self) -> &TargetSchema {
        &self.schema
    }

    fn write_row(&mut self, row: &[Value]) -> Result<()> {
        if row.len() != self.schema.len() {
            bail!(
                "Row has {} values but the CSV header has {} columns",
                row.len(),
                self.schema.len()
            );
        }

        self.writer
            .write_record(row.iter().map(Value::to_csv_field))
            .context("Failed to write CSV row")?;
        // each row is durable on its own
        self.writer.flush().context("Failed to flush CSV row")?;
        self.count += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<u64> {
        self.writer.flush().context("Failed to flush CSV file")?;

        if let Some((tmp, dest)) = self.pending_rename.take() {
            fs::rename(&tmp, &dest)
                .with_context(|| format!("Failed to move {:?} to {:?}", tmp, dest))?;
        }

        Ok(self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> TargetSchema {
        TargetSchema::new(["Date", "Name", "Level"])
    }

    fn row(name: &str, level: i64) -> Vec<Value> {
        vec![Value::from("19102026"), Value::from(name), Value::Integer(level)]
    }

    #[test]
    fn test_bootstrap_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("stats.csv");

        let mut sink = CsvSink::open(&path, CsvMode::Append, schema()).unwrap();
        sink.write_row(&row("a", 1)).unwrap();
        assert_eq!(sink.finish().unwrap(), 1);

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Date,Name,Level\n19102026,a,1\n");
    }

    #[test]
    fn test_append_reuses_existing_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.csv");
        fs::write(&path, "Name,Date\nold,01012024\n").unwrap();

        let sink = CsvSink::open(&path, CsvMode::Append, schema()).unwrap();
        assert_eq!(sink.schema(), &TargetSchema::new(["Name", "Date"]));
    }

    #[test]
    fn test_append_keeps_previous_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.csv");

        for name in ["a", "b"] {
            let mut sink = CsvSink::open(&path, CsvMode::Append, schema()).unwrap();
            sink.write_row(&row(name, 2)).unwrap();
            sink.finish().unwrap();
        }

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_snapshot_replaces_on_finish() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.csv");
        fs::write(&path, "Date,Name,Level\n01012024,old,1\n").unwrap();

        let mut sink = CsvSink::open(&path, CsvMode::Snapshot, schema()).unwrap();
        sink.write_row(&row("new", 3)).unwrap();
        // untouched until the run finishes
        assert!(fs::read_to_string(&path).unwrap().contains("old"));

        sink.finish().unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Date,Name,Level\n19102026,new,3\n");
        assert!(!dir.path().join("stats.csv.tmp").exists());
    }

    #[test]
    fn test_rejects_rows_of_wrong_arity() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvSink::open(&dir.path().join("s.csv"), CsvMode::Append, schema()).unwrap();
        assert!(sink.write_row(&[Value::ZERO]).is_err());
    }

    #[test]
    fn test_missing_values_are_empty_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.csv");
        let mut sink = CsvSink::open(&path, CsvMode::Append, schema()).unwrap();
        sink.write_row(&[Value::from("d"), Value::Missing, Value::Null]).unwrap();
        sink.finish().unwrap();

        assert!(fs::read_to_string(&path).unwrap().ends_with("d,,\n"));
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("snapshot".parse::<CsvMode>(), Ok(CsvMode::Snapshot));
        assert!("replace".parse::<CsvMode>().is_err());
    }
}
