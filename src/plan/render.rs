use std::time::Duration;

use crate::plan::model::{Intensity, PlanPayload, PlanUnit, SessionConfig};

/// Per-entry offset of the timeline's enter animation.
pub const STAGGER: Duration = Duration::from_millis(100);

pub const CRITICAL_BADGE: &str = "CRITICAL NODE";
pub const DEFAULT_INTENSITY_LABEL: &str = "Normal";
pub const GUIDE_LABEL: &str = "Deep Dive:";
pub const SUBTOPICS_LABEL: &str = "Subtopics";

/// Narrowest text column the detail sidebar gets (its 40-column floor minus
/// borders). Scrolling is bounded by the row count at this width.
pub const DETAIL_MIN_WIDTH: usize = 38;

/// Timeline accent; the theme maps each variant to a colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Accent {
    Default,
    High,
    Medium,
    Low,
}

impl Accent {
    pub fn for_unit(unit: &PlanUnit) -> Self {
        if unit.important {
            return Accent::High;
        }
        match unit.intensity_class() {
            Intensity::High => Accent::High,
            Intensity::Medium => Accent::Medium,
            Intensity::Low => Accent::Low,
            Intensity::Other => Accent::Default,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlanHeader {
    pub topic: String,
    pub caption: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimelineEntry {
    pub unit_index: usize,
    pub title: String,
    pub duration: String,
    pub description: String,
    pub subtopics: Vec<String>,
    pub accent: Accent,
    pub critical: bool,
    pub enter_delay: Duration,
}

impl TimelineEntry {
    pub fn has_entered(&self, since_shown: Duration) -> bool {
        since_shown >= self.enter_delay
    }
}

/// Everything the results view draws for one payload.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedPlan {
    pub header: PlanHeader,
    pub strategy: String,
    pub adaptation: String,
    pub focus_areas: Vec<String>,
    pub entries: Vec<TimelineEntry>,
}

pub fn caption(config: &SessionConfig) -> String {
    format!(
        "{} Protocol \u{2022} {} Tier",
        config.goal.as_str(),
        config.level.as_str()
    )
}

pub fn render_plan(payload: &PlanPayload, config: &SessionConfig) -> RenderedPlan {
    let entries = payload
        .units()
        .iter()
        .enumerate()
        .map(|(index, unit)| TimelineEntry {
            unit_index: index,
            title: unit.unit_title.clone(),
            duration: unit.duration_or_flex().to_string(),
            description: unit.description.clone(),
            subtopics: unit.subtopics.clone(),
            accent: Accent::for_unit(unit),
            critical: unit.important,
            enter_delay: STAGGER * index as u32,
        })
        .collect();

    RenderedPlan {
        header: PlanHeader {
            topic: config.topic.clone(),
            caption: caption(config),
        },
        strategy: payload.strategy().to_string(),
        adaptation: payload.adaptation().to_string(),
        focus_areas: payload.focus_areas().to_vec(),
        entries,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetailBody {
    Guide(String),
    Plain(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitDetail {
    pub title: String,
    pub duration: String,
    pub intensity: String,
    pub body: DetailBody,
    pub subtopics: Vec<String>,
}

impl UnitDetail {
    pub fn from_unit(unit: &PlanUnit) -> Self {
        let body = match unit.detailed_guide.as_deref().filter(|g| !g.is_empty()) {
            Some(guide) => DetailBody::Guide(guide.to_string()),
            None => DetailBody::Plain(unit.description.clone()),
        };
        Self {
            title: short_title(&unit.unit_title).to_string(),
            duration: unit.duration_or_flex().to_string(),
            intensity: unit
                .intensity
                .as_deref()
                .filter(|i| !i.is_empty())
                .unwrap_or(DEFAULT_INTENSITY_LABEL)
                .to_string(),
            body,
            subtopics: unit.subtopics.clone(),
        }
    }
}

/// One wrapped row of the detail sidebar, tagged so the widget can style it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailRow {
    Title,
    Blank,
    /// Label and value, the label padded to `FIELD_LABEL_WIDTH`.
    Field,
    GuideLabel,
    Guide,
    Plain,
    SubtopicsLabel,
    Subtopic,
}

pub const FIELD_LABEL_WIDTH: usize = 11;

impl UnitDetail {
    /// Sidebar content wrapped to `width` columns.
    pub fn rows(&self, width: usize) -> Vec<(DetailRow, String)> {
        let mut rows = Vec::new();
        let push_wrapped = |rows: &mut Vec<(DetailRow, String)>, kind: DetailRow, text: &str| {
            for chunk in wrap_text(text, width) {
                rows.push((kind, chunk));
            }
        };

        push_wrapped(&mut rows, DetailRow::Title, &self.title);
        rows.push((DetailRow::Blank, String::new()));
        for (label, value) in [("Duration", &self.duration), ("Intensity", &self.intensity)] {
            let field = format!("{label:<w$}{value}", w = FIELD_LABEL_WIDTH);
            if field.chars().count() <= width {
                rows.push((DetailRow::Field, field));
            } else {
                push_wrapped(&mut rows, DetailRow::Field, &field);
            }
        }
        rows.push((DetailRow::Blank, String::new()));

        match &self.body {
            DetailBody::Guide(guide) => {
                rows.push((DetailRow::GuideLabel, GUIDE_LABEL.to_string()));
                for paragraph in guide.lines() {
                    if paragraph.trim().is_empty() {
                        rows.push((DetailRow::Blank, String::new()));
                    } else {
                        push_wrapped(&mut rows, DetailRow::Guide, paragraph);
                    }
                }
            }
            DetailBody::Plain(text) => push_wrapped(&mut rows, DetailRow::Plain, text),
        }

        if !self.subtopics.is_empty() {
            rows.push((DetailRow::Blank, String::new()));
            rows.push((DetailRow::SubtopicsLabel, SUBTOPICS_LABEL.to_string()));
            // The widget draws a three-column bullet before each subtopic.
            for sub in &self.subtopics {
                for chunk in wrap_text(sub, width.saturating_sub(3)) {
                    rows.push((DetailRow::Subtopic, chunk));
                }
            }
        }
        rows
    }
}

/// Drop a "Day 2 [09:00-11:00]:" style prefix, keeping the name after the
/// last ':'. Titles without one, or ending in one, are kept whole.
pub fn short_title(title: &str) -> &str {
    match title.rsplit_once(':') {
        Some((_, rest)) if !rest.trim().is_empty() => rest.trim(),
        _ => title,
    }
}

/// Greedy word wrap; words longer than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if current_len > 0 {
                out.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(width);
            out.push(word.into_iter().collect());
            word = rest;
        }
        let needed = if current_len == 0 {
            word.len()
        } else {
            current_len + 1 + word.len()
        };
        if needed > width {
            out.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }
    if current_len > 0 {
        out.push(current);
    }
    out
}

/// Slide-in sidebar with its dimming overlay. The two toggle independently
/// but `open` and `close` always move them together.
#[derive(Debug, Default)]
pub struct DetailPanel {
    detail: Option<UnitDetail>,
    panel_active: bool,
    overlay_active: bool,
    scroll: u16,
}

impl DetailPanel {
    pub fn open(&mut self, unit: &PlanUnit) {
        self.detail = Some(UnitDetail::from_unit(unit));
        self.scroll = 0;
        self.panel_active = true;
        self.overlay_active = true;
    }

    pub fn close(&mut self) {
        self.panel_active = false;
        self.overlay_active = false;
    }

    /// The overlay only reacts while it is shown.
    pub fn click_overlay(&mut self) {
        if self.overlay_active {
            self.close();
        }
    }

    pub fn is_open(&self) -> bool {
        self.panel_active
    }

    pub fn overlay_active(&self) -> bool {
        self.overlay_active
    }

    pub fn detail(&self) -> Option<&UnitDetail> {
        self.detail.as_ref()
    }

    /// First row shown. The widget further clamps it so the last page
    /// stays full.
    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn scroll_down(&mut self) {
        if !self.panel_active {
            return;
        }
        let Some(detail) = &self.detail else {
            return;
        };
        let last = detail.rows(DETAIL_MIN_WIDTH).len().saturating_sub(1);
        let last = u16::try_from(last).unwrap_or(u16::MAX);
        self.scroll = self.scroll.saturating_add(1).min(last);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::model::{Goal, Level};
    use serde_json::json;

    fn payload(value: serde_json::Value) -> PlanPayload {
        serde_json::from_value(value).unwrap()
    }

    fn config() -> SessionConfig {
        SessionConfig {
            topic: "Calculus".to_string(),
            goal: Goal::DeepLearning,
            level: Level::Advanced,
            ..Default::default()
        }
    }

    #[test]
    fn test_header_caption() {
        let rendered = render_plan(&PlanPayload::default(), &config());
        assert_eq!(rendered.header.topic, "Calculus");
        assert_eq!(
            rendered.header.caption,
            "Deep Learning Protocol \u{2022} Advanced Tier"
        );
    }

    #[test]
    fn test_summary_fallbacks_and_focus() {
        let rendered = render_plan(&PlanPayload::default(), &config());
        assert_eq!(rendered.strategy, "Follow the blueprint strictly.");
        assert_eq!(rendered.adaptation, "Adjust velocity based on comprehension.");
        assert!(rendered.focus_areas.is_empty());
        assert!(rendered.entries.is_empty());

        let rendered = render_plan(
            &payload(json!({
                "strategy_notes": "Spaced repetition.",
                "focus_areas": ["Limits", "Derivatives"]
            })),
            &config(),
        );
        assert_eq!(rendered.strategy, "Spaced repetition.");
        assert_eq!(rendered.focus_areas, vec!["Limits", "Derivatives"]);
    }

    #[test]
    fn test_important_forces_high_accent_and_badge() {
        for intensity in ["low", "Medium", "", "High"] {
            let rendered = render_plan(
                &payload(json!({
                    "plan": [{ "unit_title": "U", "intensity": intensity, "important": true }]
                })),
                &config(),
            );
            let entry = &rendered.entries[0];
            assert_eq!(entry.accent, Accent::High, "intensity {intensity:?}");
            assert!(entry.critical);
        }
    }

    #[test]
    fn test_accent_from_intensity() {
        let rendered = render_plan(
            &payload(json!({
                "plan": [
                    { "unit_title": "a", "intensity": "HIGH" },
                    { "unit_title": "b", "intensity": "medium" },
                    { "unit_title": "c", "intensity": "Low" },
                    { "unit_title": "d" },
                    { "unit_title": "e", "intensity": "High/Medium" }
                ]
            })),
            &config(),
        );
        let accents: Vec<Accent> = rendered.entries.iter().map(|e| e.accent).collect();
        assert_eq!(
            accents,
            vec![
                Accent::High,
                Accent::Medium,
                Accent::Low,
                Accent::Default,
                Accent::Medium
            ]
        );
        assert!(rendered.entries.iter().all(|e| !e.critical));
    }

    #[test]
    fn test_entries_stagger_and_placeholder() {
        let rendered = render_plan(
            &payload(json!({
                "plan": [
                    { "unit_title": "Unit 1", "duration": "2h", "description": "Intro" },
                    { "unit_title": "Unit 2" },
                    { "unit_title": "Unit 3", "subtopics": ["x", "y"] }
                ]
            })),
            &config(),
        );
        assert_eq!(rendered.entries[0].duration, "2h");
        assert_eq!(rendered.entries[1].duration, "FLEX");
        assert_eq!(rendered.entries[2].subtopics, vec!["x", "y"]);
        assert_eq!(rendered.entries[2].enter_delay, Duration::from_millis(200));
        assert!(!rendered.entries[2].has_entered(Duration::from_millis(150)));
        assert!(rendered.entries[2].has_entered(Duration::from_millis(200)));
    }

    #[test]
    fn test_short_title() {
        assert_eq!(short_title("Day 1: Limits"), "Limits");
        assert_eq!(short_title("Day 1 [09:00-11:00]: Limits"), "Limits");
        assert_eq!(short_title("Limits"), "Limits");
        assert_eq!(short_title("Trailing:"), "Trailing:");
    }

    #[test]
    fn test_detail_prefers_guide() {
        let unit: PlanUnit = serde_json::from_value(json!({
            "unit_title": "Day 2: Chain Rule",
            "description": "short",
            "detailed_guide": "long form"
        }))
        .unwrap();
        let detail = UnitDetail::from_unit(&unit);
        assert_eq!(detail.title, "Chain Rule");
        assert_eq!(detail.body, DetailBody::Guide("long form".to_string()));
        assert_eq!(detail.intensity, "Normal");
        assert_eq!(detail.duration, "FLEX");

        let unit: PlanUnit = serde_json::from_value(json!({
            "unit_title": "Chain Rule",
            "description": "short",
            "intensity": "Low"
        }))
        .unwrap();
        let detail = UnitDetail::from_unit(&unit);
        assert_eq!(detail.body, DetailBody::Plain("short".to_string()));
        assert_eq!(detail.intensity, "Low");
    }

    #[test]
    fn test_panel_and_overlay_move_together() {
        let mut panel = DetailPanel::default();
        assert!(!panel.is_open());
        panel.open(&PlanUnit::default());
        assert!(panel.is_open());
        assert!(panel.overlay_active());
        panel.click_overlay();
        assert!(!panel.is_open());
        assert!(!panel.overlay_active());
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("one two three", 7), vec!["one two", "three"]);
        assert!(wrap_text("", 10).is_empty());
        assert_eq!(wrap_text("abcdefgh ij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_detail_rows_wrap_and_tag() {
        let detail = UnitDetail {
            title: "Limits".to_string(),
            duration: "2h".to_string(),
            intensity: "High".to_string(),
            body: DetailBody::Guide("first paragraph goes here\n\nsecond".to_string()),
            subtopics: vec!["Continuity".to_string()],
        };
        let rows = detail.rows(20);
        let kinds: Vec<DetailRow> = rows.iter().map(|(kind, _)| *kind).collect();
        assert_eq!(
            kinds,
            vec![
                DetailRow::Title,
                DetailRow::Blank,
                DetailRow::Field,
                DetailRow::Field,
                DetailRow::Blank,
                DetailRow::GuideLabel,
                DetailRow::Guide,
                DetailRow::Guide,
                DetailRow::Blank,
                DetailRow::Guide,
                DetailRow::Blank,
                DetailRow::SubtopicsLabel,
                DetailRow::Subtopic,
            ]
        );
        assert_eq!(rows[2].1, "Duration   2h");
        assert_eq!(rows[6].1, "first paragraph goes");
        assert_eq!(rows[7].1, "here");
    }

    #[test]
    fn test_detail_scroll_bounds() {
        let unit: PlanUnit = serde_json::from_value(json!({
            "unit_title": "Day 1: Limits",
            "detailed_guide": "a\nb\nc"
        }))
        .unwrap();
        let mut panel = DetailPanel::default();
        panel.scroll_down();
        assert_eq!(panel.scroll(), 0, "closed panel does not scroll");

        panel.open(&unit);
        let rows = panel.detail().unwrap().rows(DETAIL_MIN_WIDTH).len() as u16;
        for _ in 0..50 {
            panel.scroll_down();
        }
        assert_eq!(panel.scroll(), rows - 1);
        panel.scroll_up();
        assert_eq!(panel.scroll(), rows - 2);

        panel.close();
        panel.open(&unit);
        assert_eq!(panel.scroll(), 0);
        panel.scroll_up();
        assert_eq!(panel.scroll(), 0);
    }
}
