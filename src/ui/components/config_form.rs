use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::app::{ConfigForm, FormField};
use crate::plan::model::{Goal, Level};
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

pub struct ConfigFormView<'a> {
    form: &'a ConfigForm,
    topic_error: bool,
    entering: bool,
    theme: &'a Theme,
}

impl<'a> ConfigFormView<'a> {
    pub fn new(form: &'a ConfigForm, topic_error: bool, theme: &'a Theme) -> Self {
        Self {
            form,
            topic_error,
            entering: false,
            theme,
        }
    }

    /// Draw dimmed, as the first frame of the enter transition.
    pub fn entering(mut self, entering: bool) -> Self {
        self.entering = entering;
        self
    }

    fn label_style(&self, field: FormField) -> Style {
        let colors = &self.theme.colors;
        if field == FormField::Topic && self.topic_error {
            Style::default()
                .fg(colors.error())
                .add_modifier(Modifier::BOLD)
        } else if self.form.focus == field {
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.text_muted())
        }
    }

    fn input_line(&self, input: &'a LineInput, field: FormField, placeholder: &'a str) -> Line<'a> {
        let colors = &self.theme.colors;
        let focused = self.form.focus == field;
        let marker = if focused { "\u{25b8} " } else { "  " };
        let marker_style = if field == FormField::Topic && self.topic_error {
            Style::default().fg(colors.error())
        } else {
            Style::default().fg(colors.accent())
        };

        if input.value().is_empty() && !focused {
            return Line::from(vec![
                Span::styled(marker, marker_style),
                Span::styled(placeholder, Style::default().fg(colors.border())),
            ]);
        }

        let text_style = Style::default().fg(colors.fg());
        if !focused {
            return Line::from(vec![
                Span::styled(marker, marker_style),
                Span::styled(input.value(), text_style),
            ]);
        }

        let cursor_style = Style::default().fg(colors.bg()).bg(colors.accent());
        let (before, at, after) = input.render_parts();
        let at = at.map(String::from).unwrap_or_else(|| " ".to_string());
        Line::from(vec![
            Span::styled(marker, marker_style),
            Span::styled(before, text_style),
            Span::styled(at, cursor_style),
            Span::styled(after, text_style),
        ])
    }

    fn goal_chips(&self) -> Line<'a> {
        let colors = &self.theme.colors;
        let mut spans = vec![Span::raw("  ")];
        for goal in Goal::ALL {
            let style = if goal == self.form.goal {
                Style::default()
                    .fg(colors.bg())
                    .bg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.text_dim()).bg(colors.header_bg())
            };
            spans.push(Span::styled(format!(" {} ", goal.as_str()), style));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }

    fn level_radio(&self) -> Line<'a> {
        let colors = &self.theme.colors;
        let mut spans = vec![Span::raw("  ")];
        for level in Level::ALL {
            let selected = level == self.form.level;
            let (mark, style) = if selected {
                ("(\u{25cf}) ", Style::default().fg(colors.accent()))
            } else {
                ("( ) ", Style::default().fg(colors.text_muted()))
            };
            spans.push(Span::styled(format!("{mark}{}", level.as_str()), style));
            spans.push(Span::raw("   "));
        }
        Line::from(spans)
    }
}

impl Widget for ConfigFormView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let border = if self.entering {
            colors.border()
        } else {
            colors.border_focused()
        };

        let block = Block::bordered()
            .title(" New Blueprint ")
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(inner);

        let topic_label = if self.topic_error {
            "Topic  (required)"
        } else {
            "Topic"
        };
        let fields: [(FormField, &str, Line); 6] = [
            (
                FormField::Topic,
                topic_label,
                self.input_line(&self.form.topic, FormField::Topic, "e.g. Calculus"),
            ),
            (
                FormField::Syllabus,
                FormField::Syllabus.label(),
                self.input_line(
                    &self.form.syllabus,
                    FormField::Syllabus,
                    "optional: chapters, exam board, links",
                ),
            ),
            (
                FormField::Hours,
                FormField::Hours.label(),
                self.input_line(&self.form.hours, FormField::Hours, "1"),
            ),
            (
                FormField::Days,
                FormField::Days.label(),
                self.input_line(&self.form.days, FormField::Days, "5"),
            ),
            (FormField::Goal, FormField::Goal.label(), self.goal_chips()),
            (FormField::Level, FormField::Level.label(), self.level_radio()),
        ];

        for (i, (field, label, line)) in fields.into_iter().enumerate() {
            let lines = vec![
                Line::from(Span::styled(format!("  {label}"), self.label_style(field))),
                line,
            ];
            Paragraph::new(lines).render(rows[i + 1], buf);
        }

        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  [Enter] Generate blueprint",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
        ]);
        hint.render(rows[7], buf);
    }
}
