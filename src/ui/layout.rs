use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// How much room there is next to the main column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    /// Side column to the right of the main view.
    Wide,
    /// Side column stacked under the main view.
    Medium,
    /// Main view only.
    Narrow,
}

impl LayoutTier {
    pub fn for_area(area: Rect) -> Self {
        match (area.width, area.height) {
            (w, _) if w >= 100 => LayoutTier::Wide,
            (w, h) if w >= 60 && h >= 30 => LayoutTier::Medium,
            _ => LayoutTier::Narrow,
        }
    }
}

pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub sidebar: Option<Rect>,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let tier = LayoutTier::for_area(area);
        let [header, body, footer] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(8),
                Constraint::Length(2),
            ])
            .areas(area);

        let (main, sidebar) = match tier {
            LayoutTier::Wide => {
                let [main, side] = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
                    .areas(body);
                (main, Some(side))
            }
            LayoutTier::Medium => {
                let [main, side] = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                    .areas(body);
                (main, Some(side))
            }
            LayoutTier::Narrow => (body, None),
        };

        Self {
            header,
            main,
            sidebar,
            footer,
            tier,
        }
    }

    /// Form on top of the saved list when there is no side column.
    pub fn form_and_list(&self) -> (Rect, Rect) {
        match self.sidebar {
            Some(side) => (self.main, side),
            None => {
                let [form, list] = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(22), Constraint::Min(4)])
                    .areas(self.main);
                (form, list)
            }
        }
    }
}

/// Plan notes above the saved list inside the side column.
pub fn notes_and_list(side: Rect) -> (Rect, Rect) {
    let [notes, list] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .areas(side);
    (notes, list)
}

/// Join footer hints two spaces apart, starting a new row whenever the next
/// hint would overflow `width`.
pub fn wrap_hints(hints: &[&str], width: usize) -> Vec<String> {
    let mut rows: Vec<String> = Vec::new();
    if width == 0 {
        return rows;
    }
    for hint in hints.iter().filter(|h| !h.is_empty()) {
        match rows.last_mut() {
            Some(row) if row.chars().count() + 2 + hint.chars().count() <= width => {
                row.push_str("  ");
                row.push_str(hint);
            }
            _ => rows.push(format!(" {hint}")),
        }
    }
    rows
}

fn scaled(len: u16, percent: u16) -> u16 {
    (u32::from(len) * u32::from(percent.min(100)) / 100) as u16
}

/// A box of at least 56x18 (clamped to `area`) centered in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = scaled(area.width, percent_x).max(56).min(area.width);
    let height = scaled(area.height, percent_y).max(18).min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Full-height panel docked to the right edge, at least 40 columns wide.
pub fn right_panel(percent_x: u16, area: Rect) -> Rect {
    let width = scaled(area.width, percent_x).max(40).min(area.width);
    Rect::new(area.right() - width, area.y, width, area.height)
}
