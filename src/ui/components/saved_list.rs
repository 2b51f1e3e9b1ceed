use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::store::schema::SavedPlanRecord;
use crate::ui::theme::Theme;

pub struct SavedList<'a> {
    plans: &'a [SavedPlanRecord],
    selected: usize,
    focused: bool,
    confirm_delete: Option<usize>,
    theme: &'a Theme,
}

impl<'a> SavedList<'a> {
    pub fn new(
        plans: &'a [SavedPlanRecord],
        selected: usize,
        focused: bool,
        confirm_delete: Option<usize>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            plans,
            selected,
            focused,
            confirm_delete,
            theme,
        }
    }
}

impl Widget for SavedList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" Saved Plans ({}) ", self.plans.len()))
            .border_style(Style::default().fg(if self.focused {
                colors.border_focused()
            } else {
                colors.border()
            }));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.plans.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                " No saved plans yet.",
                Style::default().fg(colors.text_muted()),
            )))
            .render(inner, buf);
            return;
        }

        // Each record takes two rows; keep the selection in view.
        let per_page = (inner.height as usize / 2).max(1);
        let start = self.selected.saturating_sub(per_page - 1);

        let mut lines: Vec<Line> = Vec::new();
        for (i, plan) in self.plans.iter().enumerate().skip(start).take(per_page) {
            let is_selected = self.focused && i == self.selected;
            let indicator = if is_selected { "\u{25b8}" } else { " " };

            if self.confirm_delete == Some(i) {
                lines.push(Line::from(Span::styled(
                    format!("{indicator} Delete plan \"{}\"?", plan.topic),
                    Style::default()
                        .fg(colors.error())
                        .add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(Span::styled(
                    "   [y] Delete  [n] Keep",
                    Style::default().fg(colors.warning()),
                )));
                continue;
            }

            let title_style = if is_selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{indicator} {}", plan.topic), title_style),
                Span::styled("  \u{203a}", Style::default().fg(colors.text_muted())),
            ]));
            lines.push(Line::from(Span::styled(
                format!("   {}", plan.date),
                Style::default().fg(colors.text_muted()),
            )));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
