//! State and rendering of the full-screen run view

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph};
use ratatui::Frame;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use super::{Outcome, Phase, Progress, Tally};

const MAX_LOG_ENTRIES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
}

/// Everything the run view shows. Rendering never mutates it.
pub struct RunView {
    phase: Phase,
    info: String,
    started: Instant,
    progress: Option<Progress>,
    tally: Tally,
    log: VecDeque<(Level, String)>,
}

impl RunView {
    pub fn new() -> Self {
        Self {
            phase: Phase::Starting,
            info: String::new(),
            started: Instant::now(),
            progress: None,
            tally: Tally::default(),
            log: VecDeque::new(),
        }
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn set_info(&mut self, info: String) {
        self.info = info;
    }

    pub fn set_progress(&mut self, progress: Option<Progress>) {
        self.progress = progress;
    }

    pub fn record(&mut self, outcome: Outcome<'_>) {
        self.tally.record(outcome);
    }

    pub fn push_log(&mut self, level: Level, message: String) {
        if self.log.len() == MAX_LOG_ENTRIES {
            self.log.pop_front();
        }
        self.log.push_back((level, message));
    }

    pub fn render(&self, frame: &mut Frame) {
        let [header, tally, gauge, log] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
        ])
        .areas(frame.area());

        self.render_header(frame, header);
        self.render_tally(frame, tally);
        self.render_gauge(frame, gauge);
        self.render_log(frame, log);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let color = match self.phase {
            Phase::Complete => Color::Green,
            _ => Color::Cyan,
        };
        let bold = Style::default().fg(color).add_modifier(Modifier::BOLD);

        let lines = vec![
            Line::from(vec![
                Span::styled(format!(" {} ", self.phase), bold),
                Span::styled(
                    format!("[{}]", format_elapsed(self.started.elapsed())),
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
            Line::from(Span::styled(format!(" {}", self.info), Style::default().fg(Color::Gray))),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" War Brokers stats ")
            .border_style(Style::default().fg(Color::Blue));
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_tally(&self, frame: &mut Frame, area: Rect) {
        let tally = &self.tally;
        let mut spans = vec![
            Span::styled(format!(" {} written ", tally.written), Style::default().fg(Color::Green)),
            Span::styled(format!(" {} skipped ", tally.skipped), Style::default().fg(Color::Gray)),
            Span::styled(
                format!(" {} failed ", tally.failed),
                Style::default().fg(if tally.failed > 0 { Color::Red } else { Color::Gray }),
            ),
        ];
        if let Some(uid) = &tally.last_failure {
            spans.push(Span::styled(
                format!(" last failure: {}", uid),
                Style::default().fg(Color::Red),
            ));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Players ")
            .border_style(Style::default().fg(Color::Blue));
        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }

    fn render_gauge(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::LEFT | Borders::RIGHT)
            .border_style(Style::default().fg(Color::Blue));

        let Some(progress) = &self.progress else {
            frame.render_widget(block, area);
            return;
        };

        let label = if progress.total > 0 {
            format!("{}: {}/{}", progress.label, progress.current, progress.total)
        } else {
            progress.label.clone()
        };
        let gauge = Gauge::default()
            .block(block)
            .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
            .ratio(progress.ratio())
            .label(label);
        frame.render_widget(gauge, area);
    }

    fn render_log(&self, frame: &mut Frame, area: Rect) {
        let visible = area.height.saturating_sub(2) as usize;
        let items: Vec<ListItem> = self
            .log
            .iter()
            .skip(self.log.len().saturating_sub(visible))
            .map(|(level, message)| {
                let style = match level {
                    Level::Info => Style::default().fg(Color::White),
                    Level::Warn => Style::default().fg(Color::Yellow),
                };
                ListItem::new(Span::styled(format!(" {}", message), style))
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Activity ")
            .border_style(Style::default().fg(Color::Blue));
        frame.render_widget(List::new(items).block(block), area);
    }
}

/// `mm:ss`, or `h:mm:ss` past an hour
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let (h, m, s) = (secs / 3600, secs / 60 % 60, secs % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{:02}:{:02}", m, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen(view: &RunView) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| view.render(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_tally_panel_shows_counts_and_last_failure() {
        let mut view = RunView::new();
        view.set_phase(Phase::Players);
        view.record(Outcome::Written("a"));
        view.record(Outcome::Written("b"));
        view.record(Outcome::Failed("5d2ead3c"));

        let text = screen(&view);
        assert!(text.contains("Processing players"));
        assert!(text.contains("2 written"));
        assert!(text.contains("1 failed"));
        assert!(text.contains("last failure: 5d2ead3c"));
    }

    #[test]
    fn test_log_keeps_latest_entries() {
        let mut view = RunView::new();
        for i in 0..250 {
            view.push_log(Level::Info, format!("entry {}", i));
        }
        assert_eq!(view.log.len(), MAX_LOG_ENTRIES);
        assert_eq!(view.log.front().map(|(_, m)| m.as_str()), Some("entry 50"));
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(65)), "01:05");
        assert_eq!(format_elapsed(Duration::from_secs(3725)), "1:02:05");
    }
}
