use std::time::Duration;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::plan::render::{CRITICAL_BADGE, TimelineEntry, wrap_text};
use crate::ui::theme::Theme;

const TIME_COL: usize = 10;

pub struct Timeline<'a> {
    entries: &'a [TimelineEntry],
    selected: usize,
    focused: bool,
    since_shown: Duration,
    theme: &'a Theme,
}

impl<'a> Timeline<'a> {
    pub fn new(
        entries: &'a [TimelineEntry],
        selected: usize,
        focused: bool,
        since_shown: Duration,
        theme: &'a Theme,
    ) -> Self {
        Self {
            entries,
            selected,
            focused,
            since_shown,
            theme,
        }
    }

    fn entry_lines(&self, entry: &'a TimelineEntry, width: usize) -> Vec<Line<'a>> {
        let colors = &self.theme.colors;
        let accent = colors.timeline_accent(entry.accent);
        let selected = self.focused && entry.unit_index == self.selected;
        let rail = Span::styled(
            if selected { "\u{2503} " } else { "\u{2502} " },
            Style::default().fg(accent),
        );
        let pad = " ".repeat(TIME_COL);
        let body_width = width.saturating_sub(TIME_COL + 2).max(8);

        let mut title = vec![
            Span::styled(
                format!("{:>w$} ", truncate(&entry.duration, TIME_COL - 1), w = TIME_COL - 1),
                Style::default().fg(colors.text_muted()),
            ),
            rail.clone(),
        ];
        if entry.critical {
            title.push(Span::styled(
                format!(" {CRITICAL_BADGE} "),
                Style::default()
                    .fg(colors.bg())
                    .bg(accent)
                    .add_modifier(Modifier::BOLD),
            ));
            title.push(Span::raw(" "));
        }
        let mut title_style = Style::default().fg(accent).add_modifier(Modifier::BOLD);
        if selected {
            title_style = title_style.add_modifier(Modifier::REVERSED);
        }
        title.push(Span::styled(entry.title.as_str(), title_style));

        let mut lines = vec![Line::from(title)];
        for chunk in wrap_text(&entry.description, body_width) {
            lines.push(Line::from(vec![
                Span::raw(pad.clone()),
                rail.clone(),
                Span::styled(chunk, Style::default().fg(colors.text_dim())),
            ]));
        }
        for row in pack_pills(&entry.subtopics, body_width) {
            let mut pills = vec![Span::raw(pad.clone()), rail.clone()];
            for pill in row {
                pills.push(Span::styled(
                    format!(" {pill} "),
                    Style::default().fg(colors.fg()).bg(colors.header_bg()),
                ));
                pills.push(Span::raw(" "));
            }
            lines.push(Line::from(pills));
        }
        if selected {
            lines.push(Line::from(vec![
                Span::raw(pad.clone()),
                rail.clone(),
                Span::styled(
                    "[Enter] detailed breakdown",
                    Style::default().fg(colors.text_muted()),
                ),
            ]));
        }
        lines.push(Line::from(vec![Span::raw(pad), rail]));
        lines
    }
}

impl Widget for Timeline<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Timeline ")
            .border_style(Style::default().fg(if self.focused {
                colors.border_focused()
            } else {
                colors.border()
            }));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.entries.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                " The generator returned no units.",
                Style::default().fg(colors.text_muted()),
            )))
            .render(inner, buf);
            return;
        }

        let width = inner.width as usize;
        let mut lines: Vec<Line> = Vec::new();
        let mut selected_range = (0, 0);
        for entry in self.entries {
            if !entry.has_entered(self.since_shown) {
                break;
            }
            let start = lines.len();
            lines.extend(self.entry_lines(entry, width));
            if entry.unit_index == self.selected {
                selected_range = (start, lines.len());
            }
        }

        let height = inner.height as usize;
        let scroll = scroll_offset(selected_range, height);
        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .render(inner, buf);
    }
}

/// First visible row so that rows `start..end` fit in a viewport of `height`,
/// preferring to show the top of the range.
fn scroll_offset((start, end): (usize, usize), height: usize) -> usize {
    if height == 0 || end <= height {
        return 0;
    }
    if end - start >= height {
        start
    } else {
        end - height
    }
}

/// Group subtopic pills into rows of at most `width` columns. A pill is drawn
/// as ` name ` followed by a one-column gap; one that cannot fit on an empty
/// row is truncated.
fn pack_pills(subtopics: &[String], width: usize) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut used = 0;
    for sub in subtopics {
        let label = truncate(sub, width.saturating_sub(3).max(1));
        let cost = label.chars().count() + 3;
        match rows.last_mut() {
            Some(row) if used + cost <= width => {
                row.push(label);
                used += cost;
            }
            _ => {
                rows.push(vec![label]);
                used = cost;
            }
        }
    }
    rows
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
        out.push('\u{2026}');
        out
    }
}
