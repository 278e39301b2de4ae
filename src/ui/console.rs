use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use super::{Outcome, Phase, Tally, Ui};

const BAR_TEMPLATE: &str = "{msg:24} {prefix} [{bar:40.cyan/blue}] {pos}/{len} ({eta})";

/// Line-oriented UI: one progress bar at a time, messages logged through `tracing`
#[derive(Default)]
pub struct ConsoleUi {
    bar: Option<ProgressBar>,
    tally: Tally,
}

impl ConsoleUi {
    pub fn new() -> Self {
        Self::default()
    }

    fn bar(&mut self, total: u64) -> &ProgressBar {
        let tally = &self.tally;
        self.bar.get_or_insert_with(|| {
            let bar = ProgressBar::new(total);
            bar.set_prefix(tally.to_string());
            if let Ok(style) = ProgressStyle::default_bar().template(BAR_TEMPLATE) {
                bar.set_style(style.progress_chars("=>-"));
            }
            bar
        })
    }

    fn emit(&self, message: &str) {
        match &self.bar {
            Some(bar) => bar.suspend(|| info!("{}", message)),
            None => info!("{}", message),
        }
    }
}

impl Ui for ConsoleUi {
    fn set_phase(&mut self, phase: Phase) {
        self.emit(&phase.to_string());
    }

    fn set_info(&mut self, info: impl Into<String>) {
        self.emit(&info.into());
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        let bar = self.bar(total);
        bar.set_length(total);
        bar.set_position(current);
        bar.set_message(label.into());
    }

    fn clear_progress(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn log(&mut self, message: impl Into<String>) {
        self.emit(&message.into());
    }

    // Callers already report warnings through `warn!`
    fn warn(&mut self, _message: impl Into<String>) {}

    fn record(&mut self, outcome: Outcome<'_>) {
        self.tally.record(outcome);
        if let Some(bar) = &self.bar {
            bar.set_prefix(self.tally.to_string());
        }
    }
}
