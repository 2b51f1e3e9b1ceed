use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// Bar split into `total` equal segments with the first `done` lit. Shows
/// which loading stage is current, not how much of the request is done.
pub struct ProgressBar<'a> {
    label: &'a str,
    done: usize,
    total: usize,
    fill: Option<Color>,
    theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(label: &'a str, done: usize, total: usize, theme: &'a Theme) -> Self {
        Self {
            label,
            done: done.min(total),
            total: total.max(1),
            fill: None,
            theme,
        }
    }

    pub fn fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }
}

/// Column range of segment `index` when `width` columns are shared by
/// `total` segments with a one-column gap between neighbours.
fn segment_span(index: usize, total: usize, width: u16) -> (u16, u16) {
    let usable = (width as usize).saturating_sub(total - 1);
    let start = index * usable / total + index;
    let end = (index + 1) * usable / total + index;
    (start as u16, end as u16)
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let lit = self.fill.unwrap_or_else(|| colors.accent());

        let block = Block::bordered()
            .title(format!(" {} {}/{} ", self.label, self.done, self.total))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        for index in 0..self.total {
            let color = if index < self.done {
                lit
            } else {
                colors.header_bg()
            };
            let (start, end) = segment_span(index, self.total, inner.width);
            for x in start..end {
                buf[(inner.x + x, inner.y)].set_style(Style::default().bg(color));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_cover_width_with_gaps() {
        assert_eq!(segment_span(0, 4, 23), (0, 5));
        assert_eq!(segment_span(1, 4, 23), (6, 11));
        assert_eq!(segment_span(3, 4, 23), (18, 23));
    }

    #[test]
    fn test_lit_segments() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 25, 3);
        let mut buf = Buffer::empty(area);
        ProgressBar::new("Stage", 2, 4, &theme).render(area, &mut buf);

        let accent = theme.colors.accent();
        assert_eq!(buf[(1, 1)].bg, accent);
        assert_eq!(buf[(11, 1)].bg, accent);
        assert_ne!(buf[(12, 1)].bg, accent);
        assert_ne!(buf[(13, 1)].bg, accent);
        assert_ne!(buf[(23, 1)].bg, accent);
    }
}
