//! Progress reporting for polling runs
//!
//! - [`UiApp`]: full-screen ratatui view of a run: phase, per-player tally, progress, activity
//! - [`ConsoleUi`]: indicatif progress bar, messages go through `tracing`
//! - [`SilentUi`]: no output, for tests and scripted use

mod components;
mod console;
mod tui;

use std::fmt;

pub use console::ConsoleUi;
pub use tui::UiApp;

/// Stage of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Starting,
    Roster,
    Players,
    Finalizing,
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Starting => "Starting",
            Phase::Roster => "Collecting squad rosters",
            Phase::Players => "Processing players",
            Phase::Finalizing => "Finalizing output",
            Phase::Complete => "Complete",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Progress {
    pub current: u64,
    pub total: u64,
    pub label: String,
}

impl Progress {
    pub fn new(current: u64, total: u64, label: impl Into<String>) -> Self {
        Self {
            current,
            total,
            label: label.into(),
        }
    }

    /// Completed fraction, clamped to `0.0..=1.0`
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.current as f64 / self.total as f64).min(1.0)
        }
    }
}

/// What happened to one player of the batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<'a> {
    Written(&'a str),
    /// Upstream record was null or empty
    Skipped(&'a str),
    Failed(&'a str),
}

/// Running per-player counts of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    pub written: u64,
    pub skipped: u64,
    pub failed: u64,
    pub last_failure: Option<String>,
}

impl Tally {
    pub fn record(&mut self, outcome: Outcome<'_>) {
        match outcome {
            Outcome::Written(_) => self.written += 1,
            Outcome::Skipped(_) => self.skipped += 1,
            Outcome::Failed(uid) => {
                self.failed += 1;
                self.last_failure = Some(uid.to_string());
            }
        }
    }

    pub fn processed(&self) -> u64 {
        self.written + self.skipped + self.failed
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} written, {} skipped, {} failed",
            self.written, self.skipped, self.failed
        )
    }
}

/// Sink for run progress. Only the first five methods are required.
pub trait Ui {
    fn set_phase(&mut self, phase: Phase);
    fn set_info(&mut self, info: impl Into<String>);
    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>);
    fn clear_progress(&mut self);
    fn log(&mut self, message: impl Into<String>);

    /// A problem the run continues past
    fn warn(&mut self, message: impl Into<String>) {
        self.log(message);
    }

    /// Called once per player of a batch
    fn record(&mut self, _outcome: Outcome<'_>) {}

    /// Whether the user asked to stop the run early
    fn should_stop(&mut self) -> bool {
        false
    }
}

#[derive(Default)]
pub struct SilentUi;

impl SilentUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, _phase: Phase) {}
    fn set_info(&mut self, _info: impl Into<String>) {}
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn clear_progress(&mut self) {}
    fn log(&mut self, _message: impl Into<String>) {}
}
