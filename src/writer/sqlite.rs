use anyhow::{bail, Context, Result};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use tracing::info;

use super::schema_gen::{generate_create_table, generate_indexes, generate_insert};
use super::RowSink;
use crate::normalize::Value;
use crate::schema::TargetSchema;

/// Rows committed per transaction
const BATCH_SIZE: usize = 500;

pub const DEFAULT_TABLE: &str = "wbtsdb";

/// Appends rows to a table of a SQLite database. The table's own column list is the
/// target schema once it exists.
///
/// Rows are inserted as they arrive inside an open transaction that is committed every
/// [`BATCH_SIZE`] rows. Each insert runs under its own savepoint, so a rejected row is
/// rolled back alone and the rows around it are kept.
pub struct SqliteSink {
    conn: Connection,
    schema: TargetSchema,
    insert_sql: String,
    in_transaction: bool,
    pending: u64,
    committed: u64,
}

impl SqliteSink {
    pub fn open(db_path: &Path, table: &str, default_schema: TargetSchema) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database: {:?}", db_path))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        let schema = match table_columns(&conn, table)? {
            Some(schema) => schema,
            None => {
                info!(table, columns = default_schema.len(), "creating table");
                create_table(&conn, table, &default_schema)?;
                default_schema
            }
        };

        let insert_sql = generate_insert(table, &schema);

        Ok(Self {
            conn,
            schema,
            insert_sql,
            in_transaction: false,
            pending: 0,
            committed: 0,
        })
    }

    /// Rows written and committed so far
    pub fn committed(&self) -> u64 {
        self.committed
    }

    fn insert(&self, row: &[Value]) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(&self.insert_sql)?;
        for (idx, value) in row.iter().enumerate() {
            value.bind_to(idx + 1, &mut stmt)?;
        }
        stmt.raw_execute()?;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if !self.in_transaction {
            return Ok(());
        }

        self.conn
            .execute_batch("COMMIT")
            .context("Failed to commit rows")?;
        self.in_transaction = false;
        self.committed += self.pending;
        self.pending = 0;
        Ok(())
    }
}

/// Column names of an existing table, in declaration order
pub fn table_columns(conn: &Connection, table: &str) -> Result<Option<TargetSchema>> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |_| Ok(()),
        )
        .optional()?
        .is_some();

    if !exists {
        return Ok(None);
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
    let columns = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("Failed to read columns of table: {}", table))?;

    Ok(Some(TargetSchema::new(columns)))
}

fn create_table(conn: &Connection, table: &str, schema: &TargetSchema) -> Result<()> {
    if schema.is_empty() {
        bail!("Cannot create table {} without columns", table);
    }

    conn.execute(&generate_create_table(table, schema), [])
        .with_context(|| format!("Failed to create table: {}", table))?;

    for index_sql in generate_indexes(table, schema) {
        conn.execute(&index_sql, [])
            .with_context(|| format!("Failed to create index for: {}", table))?;
    }

    Ok(())
}

impl RowSink for SqliteSink {
    fn schema(&self) -> &TargetSchema {
        &self.schema
    }

    fn write_row(&mut self, row: &[Value]) -> Result<()> {
        if row.len() != self.schema.len() {
            bail!(
                "Row has {} values but the table has {} columns",
                row.len(),
                self.schema.len()
            );
        }

        if !self.in_transaction {
            self.conn.execute_batch("BEGIN")?;
            self.in_transaction = true;
        }

        self.conn.execute_batch("SAVEPOINT row_insert")?;
        if let Err(e) = self.insert(row) {
            self.conn
                .execute_batch("ROLLBACK TO row_insert; RELEASE row_insert")
                .context("Failed to roll back rejected row")?;
            return Err(e.context("Row rejected by the database"));
        }
        self.conn.execute_batch("RELEASE row_insert")?;

        self.pending += 1;
        if self.pending >= BATCH_SIZE as u64 {
            self.commit()?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<u64> {
        self.commit()?;
        self.conn.execute_batch("PRAGMA optimize;")?;
        Ok(self.committed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> TargetSchema {
        TargetSchema::new(["Date", "UserID", "Banned", "deaths_total"])
    }

    #[test]
    fn test_creates_table_and_inserts() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("stats.db");

        let mut sink = SqliteSink::open(&db, DEFAULT_TABLE, schema()).unwrap();
        sink.write_row(&[
            Value::from("19102026"),
            Value::from("u1"),
            Value::Bool(true),
            Value::Integer(12),
        ])
        .unwrap();
        assert_eq!(sink.finish().unwrap(), 1);

        let conn = Connection::open(&db).unwrap();
        let (uid, banned, deaths): (String, i64, i64) = conn
            .query_row("SELECT UserID, Banned, deaths_total FROM wbtsdb", [], |r| {
                Ok((r.get(0)?, r.get(1)?, r.get(2)?))
            })
            .unwrap();
        assert_eq!((uid.as_str(), banned, deaths), ("u1", 1, 12));
    }

    #[test]
    fn test_existing_table_defines_schema() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("stats.db");
        {
            let conn = Connection::open(&db).unwrap();
            conn.execute("CREATE TABLE wbtsdb (UserID TEXT, Level NUMERIC)", []).unwrap();
        }

        let sink = SqliteSink::open(&db, DEFAULT_TABLE, schema()).unwrap();
        assert_eq!(sink.schema(), &TargetSchema::new(["UserID", "Level"]));
    }

    #[test]
    fn test_missing_values_are_null() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("stats.db");

        let mut sink = SqliteSink::open(&db, "t", TargetSchema::new(["Name"])).unwrap();
        sink.write_row(&[Value::Missing]).unwrap();
        sink.finish().unwrap();

        let conn = Connection::open(&db).unwrap();
        let name: Option<String> = conn.query_row("SELECT Name FROM t", [], |r| r.get(0)).unwrap();
        assert_eq!(name, None);
    }

    #[test]
    fn test_batches_are_flushed_on_finish() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("stats.db");

        let mut sink = SqliteSink::open(&db, "t", TargetSchema::new(["n"])).unwrap();
        for i in 0..(BATCH_SIZE as i64 + 7) {
            sink.write_row(&[Value::Integer(i)]).unwrap();
        }
        assert_eq!(sink.committed(), BATCH_SIZE as u64);
        assert_eq!(sink.finish().unwrap(), BATCH_SIZE as u64 + 7);

        let conn = Connection::open(&db).unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM t", [], |r| r.get(0)).unwrap();
        assert_eq!(count, BATCH_SIZE as i64 + 7);
    }

    #[test]
    fn test_rejected_row_does_not_affect_its_batch() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("stats.db");
        {
            let conn = Connection::open(&db).unwrap();
            conn.execute("CREATE TABLE wbtsdb (UserID TEXT, Name TEXT NOT NULL)", [])
                .unwrap();
        }

        let mut sink = SqliteSink::open(&db, DEFAULT_TABLE, schema()).unwrap();
        let mut rejected = Vec::new();
        for i in 0..600 {
            let uid = format!("u{}", i);
            let name = if i == 10 {
                Value::Missing
            } else {
                Value::from(format!("n{}", i))
            };
            if sink.write_row(&[Value::from(uid.as_str()), name]).is_err() {
                rejected.push(uid);
            }
        }

        assert_eq!(rejected, vec!["u10".to_string()]);
        assert_eq!(sink.finish().unwrap(), 599);

        let conn = Connection::open(&db).unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM wbtsdb", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 599);
        let u11: i64 = conn
            .query_row("SELECT COUNT(*) FROM wbtsdb WHERE UserID = 'u11'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(u11, 1);
    }
}
