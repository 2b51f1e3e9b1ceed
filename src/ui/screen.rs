use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::app::{App, FormField, ResultsFocus};
use crate::plan::render::RenderedPlan;
use crate::ui::components::config_form::ConfigFormView;
use crate::ui::components::detail_panel::{DetailSidebar, Overlay};
use crate::ui::components::loading::LoadingView;
use crate::ui::components::plan_sidebar::PlanSidebar;
use crate::ui::components::saved_list::SavedList;
use crate::ui::components::timeline::Timeline;
use crate::ui::layout::{AppLayout, centered_rect, notes_and_list, wrap_hints};
use crate::view::ViewId;

/// Draw the whole screen for the current view.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = AppLayout::new(area);
    render_header(frame, app, layout.header);

    match app.views.current() {
        ViewId::Config => render_config(frame, app, &layout),
        ViewId::Loading => {
            let centered = centered_rect(60, 50, layout.main);
            let view = LoadingView::new(&app.loading, app.loading_text(), app.now(), app.theme);
            frame.render_widget(view, centered);
        }
        ViewId::Results => render_results(frame, app, &layout),
    }

    render_footer(frame, app, layout.footer);

    if app.detail.overlay_active() {
        frame.render_widget(Overlay::new(app.theme), area);
    }
    if app.detail.is_open()
        && let Some(detail) = app.detail.detail()
    {
        frame.render_widget(
            DetailSidebar::new(detail, app.theme).scroll(app.detail.scroll()),
            area,
        );
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let title_style = Style::default()
        .fg(colors.header_fg())
        .bg(colors.header_bg())
        .add_modifier(Modifier::BOLD);

    let mut spans = vec![Span::styled(" studyplan ", title_style)];
    if app.views.current() == ViewId::Results
        && let Some(rendered) = &app.session.rendered
    {
        spans.push(Span::styled(
            format!(" {} ", rendered.header.topic),
            Style::default()
                .fg(colors.accent())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {}", rendered.header.caption),
            Style::default().fg(colors.text_dim()).bg(colors.header_bg()),
        ));
    }
    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_config(frame: &mut Frame, app: &App, layout: &AppLayout) {
    let (form_area, list_area) = layout.form_and_list();

    let form = ConfigFormView::new(&app.form, app.topic_error, app.theme)
        .entering(app.views.is_entering(ViewId::Config));
    frame.render_widget(form, form_area);

    let list = SavedList::new(
        &app.saved,
        app.saved_selected,
        app.form.focus == FormField::SavedList,
        app.confirm_delete,
        app.theme,
    );
    frame.render_widget(list, list_area);
}

fn render_results(frame: &mut Frame, app: &App, layout: &AppLayout) {
    let Some(rendered) = &app.session.rendered else {
        return;
    };
    let focus = app.results_focus;
    let saved_list = SavedList::new(
        &app.saved,
        app.saved_selected,
        focus == ResultsFocus::SavedList,
        app.confirm_delete,
        app.theme,
    );
    let notes = PlanSidebar::new(rendered, app.theme).focused(focus == ResultsFocus::Notes);

    // Without a side column the focused pane takes over the main area.
    let Some(sidebar) = layout.sidebar else {
        match focus {
            ResultsFocus::Notes => frame.render_widget(notes, layout.main),
            ResultsFocus::SavedList => frame.render_widget(saved_list, layout.main),
            ResultsFocus::Timeline => {
                frame.render_widget(timeline(app, rendered, true), layout.main);
            }
        }
        return;
    };

    let timeline = timeline(app, rendered, focus == ResultsFocus::Timeline);
    frame.render_widget(timeline, layout.main);
    let (notes_area, list_area) = notes_and_list(sidebar);
    frame.render_widget(notes, notes_area);
    frame.render_widget(saved_list, list_area);
}

fn timeline<'a>(app: &'a App, rendered: &'a RenderedPlan, focused: bool) -> Timeline<'a> {
    Timeline::new(
        &rendered.entries,
        app.timeline_selected,
        focused,
        app.since_results_shown(),
        app.theme,
    )
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;

    if let Some(status) = &app.status_line {
        let footer = Paragraph::new(Line::from(Span::styled(
            format!(" {status}"),
            Style::default().fg(colors.error()),
        )));
        frame.render_widget(footer, area);
        return;
    }

    let save_hint = if app.saved_flash {
        "[s] Saved \u{2713}"
    } else {
        "[s] Save"
    };
    let hints: Vec<&str> = match app.views.current() {
        ViewId::Config if app.confirm_delete.is_some() => vec!["[y] Delete", "[n] Keep"],
        ViewId::Config => vec![
            "[Tab] Next field",
            "[\u{2190}\u{2192}] Goal/Level",
            "[Enter] Generate",
            "[x] Delete saved",
            "[Esc] Quit",
        ],
        ViewId::Loading => vec!["[Ctrl-C] Quit"],
        ViewId::Results if app.detail.is_open() => vec!["[j/k] Scroll", "[Esc] Close detail"],
        ViewId::Results if app.confirm_delete.is_some() => vec!["[y] Delete", "[n] Keep"],
        ViewId::Results => vec![
            "[j/k] Select",
            "[Enter] Detail",
            save_hint,
            "[r] Restart",
            "[Tab] Notes/Saved",
            "[q] Quit",
        ],
    };

    let lines: Vec<Line> = wrap_hints(&hints, area.width as usize)
        .into_iter()
        .map(|line| {
            let style = if app.saved_flash && line.contains(save_hint) {
                Style::default().fg(colors.success())
            } else {
                Style::default().fg(colors.text_muted())
            };
            Line::from(Span::styled(line, style))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}
