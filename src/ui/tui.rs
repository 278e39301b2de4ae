use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::time::Duration;

use super::components::{Level, RunView};
use super::{Outcome, Phase, Progress, Ui};

/// Full-screen view of a run. `q`, `Esc` or `Ctrl+C` stops after the current player.
pub struct UiApp {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    view: RunView,
    stop_requested: bool,
    active: bool,
}

fn is_stop_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

impl UiApp {
    /// Enter raw mode and the alternate screen
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Ok(Self {
            terminal,
            view: RunView::new(),
            stop_requested: false,
            active: true,
        })
    }

    fn draw(&mut self) {
        let view = &self.view;
        self.terminal.draw(|frame| view.render(frame)).ok();
    }

    /// Show the final summary and wait for a key before leaving the screen
    pub fn finish(mut self, summary: &str) -> Result<()> {
        self.view.set_phase(Phase::Complete);
        self.view.set_progress(None);
        self.view.push_log(Level::Info, summary.to_string());
        self.view.push_log(Level::Info, "Press any key to exit".to_string());
        self.draw();

        loop {
            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        break;
                    }
                }
            }
        }

        self.restore()
    }

    /// Leave the alternate screen without waiting
    pub fn restore(mut self) -> Result<()> {
        self.leave()
    }

    fn leave(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        terminal::disable_raw_mode()?;
        self.terminal.backend_mut().execute(LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Ui for UiApp {
    fn set_phase(&mut self, phase: Phase) {
        self.view.set_phase(phase);
        self.draw();
    }

    fn set_info(&mut self, info: impl Into<String>) {
        self.view.set_info(info.into());
        self.draw();
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        self.view.set_progress(Some(Progress::new(current, total, label)));
        self.draw();
    }

    fn clear_progress(&mut self) {
        self.view.set_progress(None);
        self.draw();
    }

    fn log(&mut self, message: impl Into<String>) {
        self.view.push_log(Level::Info, message.into());
        self.draw();
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.view.push_log(Level::Warn, message.into());
        self.draw();
    }

    fn record(&mut self, outcome: Outcome<'_>) {
        self.view.record(outcome);
        self.draw();
    }

    fn should_stop(&mut self) -> bool {
        while !self.stop_requested && event::poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) if is_stop_key(&key) => {
                    self.stop_requested = true;
                    self.warn("Stopping after the current player");
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
        self.stop_requested
    }
}

impl Drop for UiApp {
    fn drop(&mut self) {
        self.leave().ok();
    }
}
