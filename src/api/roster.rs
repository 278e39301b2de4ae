use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::StatsSource;
use crate::ui::{Phase, Ui};

/// Newline-separated file of every player identifier seen so far
pub struct UidCache {
    path: PathBuf,
}

impl UidCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load cached identifiers; a missing file is an empty cache
    pub fn load(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read UID cache: {:?}", self.path))?;
        Ok(merge_uids(Vec::new(), text.lines().map(str::to_string)))
    }

    pub fn save(&self, uids: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create UID cache directory")?;
        }

        let mut text = uids.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        fs::write(&self.path, text)
            .with_context(|| format!("Failed to write UID cache: {:?}", self.path))
    }
}

/// Append `discovered` to `known`, trimming whitespace and dropping blanks and duplicates.
/// First-seen order is kept.
pub fn merge_uids(known: Vec<String>, discovered: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::with_capacity(known.len());

    for uid in known.into_iter().chain(discovered) {
        let uid = uid.trim();
        if uid.is_empty() || seen.contains(uid) {
            continue;
        }
        seen.insert(uid.to_string());
        merged.push(uid.to_string());
    }

    merged
}

/// Enumerate every squad's members and merge them into the cache.
///
/// A failing squad list aborts; a failing member listing only skips that squad.
pub fn collect_roster(source: &impl StatsSource, cache: &UidCache, ui: &mut impl Ui) -> Result<Vec<String>> {
    ui.set_phase(Phase::Roster);

    let known = cache.load()?;
    let squads = source.fetch_squad_list().context("Failed to fetch squad list")?;
    ui.set_info(format!("{} squads, {} cached players", squads.len(), known.len()));
    info!(squads = squads.len(), cached = known.len(), "collecting roster");

    let mut discovered = Vec::new();
    for (i, squad) in squads.iter().enumerate() {
        ui.set_progress(i as u64, squads.len() as u64, format!("Squad {}", squad));

        match source.fetch_squad_members(squad) {
            Ok(members) => discovered.extend(members.into_iter().map(|m| m.uid)),
            Err(e) => {
                warn!(squad = %squad, error = %format!("{:#}", e), "skipping squad");
                ui.warn(format!("Skipped squad {}: {:#}", squad, e));
            }
        }
    }
    ui.clear_progress();

    let uids = merge_uids(known, discovered);
    cache.save(&uids)?;
    ui.log(format!("Roster: {} players", uids.len()));

    Ok(uids)
}
