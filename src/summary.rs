//! Pull history of a CSV sink: which run dates it holds, and the rows of one player

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value as Json};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

use crate::schema::{DATE_COLUMN, UID_COLUMN};

const NOT_AVAILABLE: &str = "N/A";
const DISPLAY_FORMAT: &str = "%B %d, %Y";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullSummary {
    pub first_pull: String,
    pub last_pull: String,
    pub total_pulls: usize,
}

impl PullSummary {
    pub fn from_dates(dates: &BTreeSet<NaiveDate>) -> Self {
        let show = |date: Option<&NaiveDate>| {
            date.map(|d| d.format(DISPLAY_FORMAT).to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        };

        Self {
            first_pull: show(dates.first()),
            last_pull: show(dates.last()),
            total_pulls: dates.len(),
        }
    }
}

/// Distinct run dates in the `Date` column of a CSV sink. Values that do not parse with
/// `date_format` are ignored.
pub fn pull_dates(path: &Path, date_format: &str) -> Result<BTreeSet<NaiveDate>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {:?}", path))?;

    let date_idx = reader
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .position(|h| h == DATE_COLUMN)
        .with_context(|| format!("{:?} has no {} column", path, DATE_COLUMN))?;

    let mut dates = BTreeSet::new();
    let mut unparsed = 0u64;

    for record in reader.records() {
        let record = record.context("Failed to read CSV row")?;
        match record.get(date_idx).map(|v| NaiveDate::parse_from_str(v.trim(), date_format)) {
            Some(Ok(date)) => {
                dates.insert(date);
            }
            _ => unparsed += 1,
        }
    }

    if unparsed > 0 {
        debug!(unparsed, "rows with unreadable dates ignored");
    }

    Ok(dates)
}

pub fn summarize_csv(path: &Path, date_format: &str) -> Result<PullSummary> {
    Ok(PullSummary::from_dates(&pull_dates(path, date_format)?))
}

/// Columns shown by default when printing a player's history
pub const HISTORY_COLUMNS: &[&str] = &[
    DATE_COLUMN,
    "Name",
    "Squad",
    "Level",
    "XP",
    "kills_per_weapon_total",
    "deaths_total",
];

/// Every stored row of one player, in file order
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerHistory {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl PlayerHistory {
    /// Values of `column` across the rows, or `None` when the file has no such column
    pub fn column(&self, column: &str) -> Option<Vec<&str>> {
        let idx = self.header.iter().position(|h| h == column)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }

    /// Rows as JSON objects keyed by header, in column order
    pub fn to_json(&self) -> Json {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let object: Map<String, Json> = self
                    .header
                    .iter()
                    .zip(row)
                    .map(|(column, value)| (column.clone(), Json::String(value.clone())))
                    .collect();
                Json::Object(object)
            })
            .collect();
        Json::Array(rows)
    }
}

/// Rows of a CSV sink whose `UserID` column equals `uid`
pub fn player_history(path: &Path, uid: &str) -> Result<PlayerHistory> {
    let uid = uid.trim();
    if uid.is_empty() {
        bail!("A player UID is required");
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {:?}", path))?;

    let header: Vec<String> = reader
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(str::to_string)
        .collect();
    let uid_idx = header
        .iter()
        .position(|h| h == UID_COLUMN)
        .with_context(|| format!("{:?} has no {} column", path, UID_COLUMN))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("Failed to read CSV row")?;
        if record.get(uid_idx).map(str::trim) == Some(uid) {
            rows.push(record.iter().map(str::to_string).collect());
        }
    }

    Ok(PlayerHistory { header, rows })
}
