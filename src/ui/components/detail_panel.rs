use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use crate::plan::render::{DetailRow, FIELD_LABEL_WIDTH, UnitDetail};
use crate::ui::layout::right_panel;
use crate::ui::theme::Theme;

/// Dims whatever is below it.
pub struct Overlay<'a> {
    theme: &'a Theme,
}

impl<'a> Overlay<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for Overlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let dim = Style::default()
            .fg(colors.text_muted())
            .bg(colors.overlay_bg())
            .add_modifier(Modifier::DIM);
        buf.set_style(area, dim);
    }
}

/// Sidebar with the full breakdown of one unit. Takes the whole area and
/// docks itself to the right edge.
pub struct DetailSidebar<'a> {
    detail: &'a UnitDetail,
    scroll: u16,
    theme: &'a Theme,
}

impl<'a> DetailSidebar<'a> {
    pub fn new(detail: &'a UnitDetail, theme: &'a Theme) -> Self {
        Self {
            detail,
            scroll: 0,
            theme,
        }
    }

    pub fn scroll(mut self, scroll: u16) -> Self {
        self.scroll = scroll;
        self
    }
}

impl Widget for DetailSidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let panel = right_panel(45, area);

        Clear.render(panel, buf);
        let block = Block::bordered()
            .title(" Unit Detail ")
            .title_bottom(Line::from(Span::styled(
                " [j/k] Scroll  [Esc] Close ",
                Style::default().fg(colors.text_muted()),
            )))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.panel_bg()));
        let inner = block.inner(panel);
        block.render(panel, buf);

        let label = Style::default().fg(colors.text_muted());
        let value = Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD);

        let rows = self.detail.rows(inner.width as usize);
        let max_scroll = rows.len().saturating_sub(inner.height as usize);
        let scroll = (self.scroll as usize).min(max_scroll);

        let lines: Vec<Line> = rows
            .into_iter()
            .skip(scroll)
            .take(inner.height as usize)
            .map(|(kind, text)| match kind {
                DetailRow::Title => Line::from(Span::styled(
                    text,
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                )),
                DetailRow::Blank => Line::from(""),
                DetailRow::Field => {
                    let split = text
                        .char_indices()
                        .nth(FIELD_LABEL_WIDTH)
                        .map_or(text.len(), |(i, _)| i);
                    let (name, val) = text.split_at(split);
                    Line::from(vec![
                        Span::styled(name.to_string(), label),
                        Span::styled(val.to_string(), value),
                    ])
                }
                DetailRow::GuideLabel => Line::from(Span::styled(
                    text,
                    Style::default()
                        .fg(colors.warning())
                        .add_modifier(Modifier::BOLD),
                )),
                DetailRow::Guide => Line::from(Span::styled(text, Style::default().fg(colors.fg()))),
                DetailRow::Plain => {
                    Line::from(Span::styled(text, Style::default().fg(colors.text_dim())))
                }
                DetailRow::SubtopicsLabel => Line::from(Span::styled(text, label)),
                DetailRow::Subtopic => Line::from(vec![
                    Span::styled(" \u{2022} ", Style::default().fg(colors.accent())),
                    Span::styled(text, Style::default().fg(colors.fg())),
                ]),
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
