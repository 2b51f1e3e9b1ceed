use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::plan::render::{Accent, RenderedPlan};
use crate::ui::theme::Theme;

/// Strategy notes, adaptation rule and focus areas of the shown plan.
pub struct PlanSidebar<'a> {
    plan: &'a RenderedPlan,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> PlanSidebar<'a> {
    pub fn new(plan: &'a RenderedPlan, theme: &'a Theme) -> Self {
        Self {
            plan,
            focused: false,
            theme,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for PlanSidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let border = if self.focused {
            colors.border_focused()
        } else {
            colors.border()
        };

        let focus_rows = self.plan.focus_areas.len().max(1) as u16 + 2;
        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),
                Constraint::Min(5),
                Constraint::Length(focus_rows),
            ])
            .split(area);

        text_section("Strategy", &self.plan.strategy, border, self.theme).render(sections[0], buf);
        text_section("Adaptation", &self.plan.adaptation, border, self.theme)
            .render(sections[1], buf);

        let focus_block = Block::bordered()
            .title(Line::from(Span::styled(
                " Focus Areas ",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )))
            .border_style(Style::default().fg(border));
        let lines: Vec<Line> = if self.plan.focus_areas.is_empty() {
            vec![Line::from(Span::styled(
                " none listed",
                Style::default().fg(colors.text_muted()),
            ))]
        } else {
            self.plan
                .focus_areas
                .iter()
                .map(|focus| {
                    Line::from(vec![
                        Span::styled(
                            " \u{25c6} ",
                            Style::default().fg(colors.timeline_accent(Accent::High)),
                        ),
                        Span::styled(focus.as_str(), Style::default().fg(colors.fg())),
                    ])
                })
                .collect()
        };
        Paragraph::new(lines)
            .block(focus_block)
            .render(sections[2], buf);
    }
}

fn text_section<'a>(title: &str, body: &'a str, border: Color, theme: &Theme) -> Paragraph<'a> {
    let colors = &theme.colors;
    let block = Block::bordered()
        .title(Line::from(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .border_style(Style::default().fg(border));
    Paragraph::new(Span::styled(body, Style::default().fg(colors.fg())))
        .wrap(Wrap { trim: true })
        .block(block)
}
