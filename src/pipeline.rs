//! Batch driver: fetch, normalize, reconcile and write one player at a time.
//!
//! A failing player never stops the batch. Its error is logged with the identifier and
//! collected in the [`BatchReport`]; there is no retry.

use std::collections::{BTreeSet, HashSet};
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::StatsSource;
use crate::normalize::{reconcile, NormalizeError, Normalizer, Record};
use crate::ui::{Outcome, Phase, Ui};
use crate::writer::RowSink;

#[derive(Debug, Error)]
pub enum RecordFailure {
    #[error("fetch failed: {0:#}")]
    Fetch(anyhow::Error),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error("write failed: {0:#}")]
    Write(anyhow::Error),
}

#[derive(Debug, Error)]
#[error("player {uid}: {failure}")]
pub struct RecordError {
    pub uid: String,
    #[source]
    pub failure: RecordFailure,
}

impl RecordError {
    fn new(uid: &str, failure: impl Into<RecordFailure>) -> Self {
        Self {
            uid: uid.to_string(),
            failure: failure.into(),
        }
    }
}

/// Outcome of a whole batch
#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: u64,
    /// Players whose record was null or empty
    pub skipped: u64,
    pub failures: Vec<RecordError>,
    /// Normalized columns the sink schema does not have; their values were dropped
    pub dropped_columns: BTreeSet<String>,
    /// The UI asked to stop before every player was processed
    pub stopped_early: bool,
}

impl BatchReport {
    pub fn processed(&self) -> u64 {
        self.written + self.skipped + self.failures.len() as u64
    }

    pub fn summary(&self) -> String {
        format!(
            "{} written, {} skipped, {} failed",
            self.written,
            self.skipped,
            self.failures.len()
        )
    }
}

/// Fetch, normalize and write a single player. Returns the normalized row when one was
/// written, `None` when the upstream record was empty.
pub fn process_player(
    source: &impl StatsSource,
    normalizer: &Normalizer,
    sink: &mut dyn RowSink,
    uid: &str,
) -> Result<Option<Record>, RecordError> {
    let raw = source
        .fetch_player(uid)
        .map_err(|e| RecordError::new(uid, RecordFailure::Fetch(e)))?;

    let row = match normalizer.normalize(uid, &raw) {
        Ok(Some(row)) => row,
        Ok(None) => return Ok(None),
        Err(e) => return Err(RecordError::new(uid, e)),
    };

    let aligned = reconcile(&row, sink.schema().columns());
    sink.write_row(&aligned)
        .map_err(|e| RecordError::new(uid, RecordFailure::Write(e)))?;

    Ok(Some(row))
}

/// Process `uids` in order, isolating each player's failure
pub fn run_batch(
    source: &impl StatsSource,
    normalizer: &Normalizer,
    sink: &mut dyn RowSink,
    uids: &[String],
    ui: &mut impl Ui,
) -> BatchReport {
    ui.set_phase(Phase::Players);
    ui.set_info(format!("{} players, {} columns", uids.len(), sink.schema().len()));

    let known: HashSet<String> = sink.schema().iter().map(str::to_string).collect();
    let total = uids.len() as u64;
    let mut report = BatchReport::default();

    for (i, uid) in uids.iter().enumerate() {
        if ui.should_stop() {
            warn!(remaining = uids.len() - i, "run stopped before all players were processed");
            ui.warn("Stopped by user");
            report.stopped_early = true;
            break;
        }
        ui.set_progress(i as u64, total, format!("Player {}", uid));

        match process_player(source, normalizer, sink, uid) {
            Ok(Some(row)) => {
                ui.record(Outcome::Written(uid));
                report.written += 1;
                report.dropped_columns.extend(
                    row.keys()
                        .filter(|column| !known.contains(*column))
                        .map(str::to_string),
                );
            }
            Ok(None) => {
                debug!(uid = %uid, "empty player record, skipped");
                ui.record(Outcome::Skipped(uid));
                report.skipped += 1;
            }
            Err(err) => {
                warn!(uid = %err.uid, error = %err.failure, "player failed");
                ui.record(Outcome::Failed(uid));
                ui.warn(err.to_string());
                report.failures.push(err);
            }
        }
    }

    ui.set_progress(report.processed(), total, "Players");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SavedRecords;
    use crate::names::{NameTable, NameTableVersion};
    use crate::normalize::Value;
    use crate::schema::TargetSchema;
    use crate::ui::{SilentUi, Tally};
    use anyhow::Result;
    use serde_json::json;

    /// In-memory sink that can be told to fail
    struct MemorySink {
        schema: TargetSchema,
        rows: Vec<Vec<Value>>,
        fail_on: Option<usize>,
    }

    impl MemorySink {
        fn new(columns: &[&str]) -> Self {
            Self {
                schema: TargetSchema::new(columns.iter().copied()),
                rows: Vec::new(),
                fail_on: None,
            }
        }
    }

    impl RowSink for MemorySink {
        fn schema(&self) -> &TargetSchema {
            &self.schema
        }

        fn write_row(&mut self, row: &[Value]) -> Result<()> {
            if self.fail_on == Some(self.rows.len()) {
                self.fail_on = None;
                anyhow::bail!("disk full");
            }
            self.rows.push(row.to_vec());
            Ok(())
        }

        fn finish(&mut self) -> Result<u64> {
            Ok(self.rows.len() as u64)
        }
    }

    fn source() -> SavedRecords {
        SavedRecords::new(vec![
            ("good".into(), json!({"nick": "a", "level": 3, "deaths": {"p61": 2}})),
            ("empty".into(), json!({})),
            ("broken".into(), json!({"nick": "b", "deaths": {"p61": "x"}})),
            ("late".into(), json!({"nick": "c", "level": 9})),
        ])
    }

    fn uids(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_failures_do_not_stop_the_batch() {
        let names = NameTable::builtin(NameTableVersion::V3);
        let normalizer = Normalizer::new(names, "19102026");
        let mut sink = MemorySink::new(&["UserID", "Level", "deaths_total"]);

        let report = run_batch(
            &source(),
            &normalizer,
            &mut sink,
            &uids(&["good", "empty", "broken", "missing", "late"]),
            &mut SilentUi::new(),
        );

        assert_eq!(report.written, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.processed(), 5);
        assert_eq!(report.failures[0].uid, "broken");
        assert!(matches!(report.failures[0].failure, RecordFailure::Normalize(_)));
        assert!(matches!(report.failures[1].failure, RecordFailure::Fetch(_)));

        assert_eq!(
            sink.rows,
            vec![
                vec![Value::from("good"), Value::Integer(3), Value::Integer(2)],
                vec![Value::from("late"), Value::Integer(9), Value::Integer(0)],
            ]
        );
    }

    #[test]
    fn test_write_failure_is_isolated() {
        let names = NameTable::builtin(NameTableVersion::V3);
        let normalizer = Normalizer::new(names, "19102026");
        let mut sink = MemorySink::new(&["UserID"]);
        sink.fail_on = Some(0);

        let report = run_batch(
            &source(),
            &normalizer,
            &mut sink,
            &uids(&["good", "late"]),
            &mut SilentUi::new(),
        );

        assert_eq!(report.written, 1);
        assert!(matches!(report.failures[0].failure, RecordFailure::Write(_)));
        assert_eq!(sink.rows, vec![vec![Value::from("late")]]);
    }

    #[test]
    fn test_dropped_columns_are_reported() {
        let names = NameTable::builtin(NameTableVersion::V3);
        let normalizer = Normalizer::new(names, "19102026");
        let mut sink = MemorySink::new(&["UserID", "Level"]);

        let report = run_batch(&source(), &normalizer, &mut sink, &uids(&["good"]), &mut SilentUi::new());

        assert!(report.dropped_columns.contains("deaths_p61"));
        assert!(report.dropped_columns.contains("Name"));
        assert!(!report.dropped_columns.contains("Level"));
    }

    /// Collects what the batch reports to its UI
    #[derive(Default)]
    struct TallyUi {
        tally: Tally,
        warnings: Vec<String>,
    }

    impl Ui for TallyUi {
        fn set_phase(&mut self, _phase: Phase) {}
        fn set_info(&mut self, _info: impl Into<String>) {}
        fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
        fn clear_progress(&mut self) {}
        fn log(&mut self, _message: impl Into<String>) {}

        fn warn(&mut self, message: impl Into<String>) {
            self.warnings.push(message.into());
        }

        fn record(&mut self, outcome: Outcome<'_>) {
            self.tally.record(outcome);
        }
    }

    #[test]
    fn test_ui_tally_matches_report() {
        let names = NameTable::builtin(NameTableVersion::V3);
        let normalizer = Normalizer::new(names, "19102026");
        let mut sink = MemorySink::new(&["UserID"]);
        let mut ui = TallyUi::default();

        let report = run_batch(
            &source(),
            &normalizer,
            &mut sink,
            &uids(&["good", "empty", "broken", "late", "missing"]),
            &mut ui,
        );

        assert_eq!(ui.tally.written, report.written);
        assert_eq!(ui.tally.skipped, report.skipped);
        assert_eq!(ui.tally.failed, report.failures.len() as u64);
        assert_eq!(ui.tally.last_failure.as_deref(), Some("missing"));
        assert_eq!(ui.warnings.len(), 2);
        assert!(ui.warnings[0].starts_with("player broken:"));
    }

    #[test]
    fn test_error_message_names_the_player() {
        let names = NameTable::builtin(NameTableVersion::V3);
        let normalizer = Normalizer::new(names, "19102026");
        let mut sink = MemorySink::new(&["UserID"]);

        let err = process_player(&source(), &normalizer, &mut sink, "broken").unwrap_err();
        assert_eq!(
            err.to_string(),
            "player broken: counter deaths.p61 is not numeric (found string)"
        );
    }
}
