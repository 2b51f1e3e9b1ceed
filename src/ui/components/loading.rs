use std::time::Duration;

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::app::{LoadingStatus, STATUS_MESSAGES};
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];
const SPINNER_FRAME: Duration = Duration::from_millis(100);

pub struct LoadingView<'a> {
    status: &'a LoadingStatus,
    text: String,
    now: Duration,
    theme: &'a Theme,
}

impl<'a> LoadingView<'a> {
    pub fn new(status: &'a LoadingStatus, text: String, now: Duration, theme: &'a Theme) -> Self {
        Self {
            status,
            text,
            now,
            theme,
        }
    }
}

impl Widget for LoadingView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Length(5),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(inner);

        let failed = matches!(self.status, LoadingStatus::Failed(_));
        let mut lines = Vec::new();
        if failed {
            lines.push(Line::from(Span::styled(
                self.text,
                Style::default()
                    .fg(colors.error())
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Reseting neural link...",
                Style::default().fg(colors.text_muted()),
            )));
        } else {
            let frame = (self.now.as_millis() / SPINNER_FRAME.as_millis()) as usize % SPINNER.len();
            lines.push(Line::from(Span::styled(
                SPINNER[frame],
                Style::default().fg(colors.accent()),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                self.text,
                Style::default()
                    .fg(colors.fg())
                    .add_modifier(Modifier::BOLD),
            )));
        }
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(layout[1], buf);

        let bar_area = Rect {
            x: layout[2].x + layout[2].width / 4,
            width: layout[2].width / 2,
            ..layout[2]
        };
        let stages = STATUS_MESSAGES.len();
        let bar = match self.status {
            LoadingStatus::Cycling(idx) => ProgressBar::new("Stage", idx + 1, stages, self.theme),
            LoadingStatus::Failed(_) => {
                ProgressBar::new("Stage", stages, stages, self.theme).fill(colors.error())
            }
        };
        bar.render(bar_area, buf);
    }
}
