use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::plan::client::{GenerationError, PlanGenerator};
use crate::plan::model::{Goal, Level, PlanPayload, SessionConfig};
use crate::plan::render::{DetailPanel, RenderedPlan, render_plan};
use crate::store::plan_store::PlanStore;
use crate::store::schema::SavedPlans;
use crate::timer::Timers;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;
use crate::view::{ViewController, ViewId};

pub const STATUS_MESSAGES: [&str; 4] = [
    "ESTABLISHING NEURAL HANDSHAKE...",
    "PARSING SYLLABUS ARCHITECTURE...",
    "OPTIMIZING LEARNING VECTORS...",
    "SYNTHESIZING BLUEPRINT...",
];
pub const STATUS_INTERVAL: Duration = Duration::from_millis(1500);
pub const FAILURE_RESET_DELAY: Duration = Duration::from_millis(4000);
pub const TOPIC_CUE: Duration = Duration::from_millis(1000);
pub const SAVED_FLASH: Duration = Duration::from_millis(2000);

/// Deferred tasks owned by the app. Each has at most one pending deadline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deferred {
    StatusCycle,
    FailureReset,
    TopicCue,
    SavedFlash,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Topic,
    Syllabus,
    Hours,
    Days,
    Goal,
    Level,
    SavedList,
}

impl FormField {
    const ORDER: [FormField; 7] = [
        FormField::Topic,
        FormField::Syllabus,
        FormField::Hours,
        FormField::Days,
        FormField::Goal,
        FormField::Level,
        FormField::SavedList,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Topic => "Topic",
            FormField::Syllabus => "Syllabus",
            FormField::Hours => "Hours / day",
            FormField::Days => "Days",
            FormField::Goal => "Goal",
            FormField::Level => "Level",
            FormField::SavedList => "Saved plans",
        }
    }
}

pub struct ConfigForm {
    pub topic: LineInput,
    pub syllabus: LineInput,
    pub hours: LineInput,
    pub days: LineInput,
    pub goal: Goal,
    pub level: Level,
    pub focus: FormField,
}

impl Default for ConfigForm {
    fn default() -> Self {
        Self {
            topic: LineInput::new(""),
            syllabus: LineInput::new(""),
            hours: LineInput::decimal(""),
            days: LineInput::decimal(""),
            goal: Goal::default(),
            level: Level::default(),
            focus: FormField::Topic,
        }
    }
}

impl ConfigForm {
    pub fn capture(&self) -> SessionConfig {
        SessionConfig {
            topic: self.topic.value().trim().to_string(),
            syllabus: self.syllabus.value().trim().to_string(),
            hours: self.hours.value().trim().to_string(),
            days: self.days.value().trim().to_string(),
            goal: self.goal,
            level: self.level,
        }
    }

    pub fn focused_input(&mut self) -> Option<&mut LineInput> {
        match self.focus {
            FormField::Topic => Some(&mut self.topic),
            FormField::Syllabus => Some(&mut self.syllabus),
            FormField::Hours => Some(&mut self.hours),
            FormField::Days => Some(&mut self.days),
            FormField::Goal | FormField::Level | FormField::SavedList => None,
        }
    }

    /// Move focus, skipping the saved list when it has nothing to select.
    pub fn move_focus(&mut self, forward: bool, has_saved: bool) {
        let fields: Vec<FormField> = FormField::ORDER
            .into_iter()
            .filter(|f| has_saved || *f != FormField::SavedList)
            .collect();
        let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        let count = fields.len();
        let next = if forward {
            (idx + 1) % count
        } else {
            (idx + count - 1) % count
        };
        self.focus = fields[next];
    }

    pub fn cycle_goal(&mut self, forward: bool) {
        self.goal = cycle(&Goal::ALL, self.goal, forward);
    }

    pub fn cycle_level(&mut self, forward: bool) {
        self.level = cycle(&Level::ALL, self.level, forward);
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let idx = all.iter().position(|v| *v == current).unwrap_or(0);
    let count = all.len();
    if forward {
        all[(idx + 1) % count]
    } else {
        all[(idx + count - 1) % count]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadingStatus {
    Cycling(usize),
    Failed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultsFocus {
    Timeline,
    /// Strategy, adaptation and focus areas. On narrow terminals this is
    /// the only way to see them.
    Notes,
    SavedList,
}

/// Transient state of one interaction; never persisted.
#[derive(Debug, Default)]
pub struct Session {
    pub config: SessionConfig,
    pub current_plan: Option<PlanPayload>,
    pub rendered: Option<RenderedPlan>,
}

pub struct App {
    pub views: ViewController,
    pub form: ConfigForm,
    pub session: Session,
    pub loading: LoadingStatus,
    pub detail: DetailPanel,
    pub timeline_selected: usize,
    pub results_focus: ResultsFocus,
    pub saved: SavedPlans,
    pub saved_selected: usize,
    pub confirm_delete: Option<usize>,
    pub topic_error: bool,
    pub saved_flash: bool,
    pub status_line: Option<String>,
    pub results_shown_at: Duration,
    pub theme: &'static Theme,
    pub should_quit: bool,
    now: Duration,
    timers: Timers<Deferred>,
    store: Option<PlanStore>,
    generator: Arc<dyn PlanGenerator>,
    pending: Option<Receiver<Result<PlanPayload, GenerationError>>>,
}

impl App {
    pub fn new(
        theme: &'static Theme,
        store: Option<PlanStore>,
        generator: Arc<dyn PlanGenerator>,
    ) -> Self {
        let mut app = Self {
            views: ViewController::new(),
            form: ConfigForm::default(),
            session: Session::default(),
            loading: LoadingStatus::Cycling(0),
            detail: DetailPanel::default(),
            timeline_selected: 0,
            results_focus: ResultsFocus::Timeline,
            saved: Vec::new(),
            saved_selected: 0,
            confirm_delete: None,
            topic_error: false,
            saved_flash: false,
            status_line: None,
            results_shown_at: Duration::ZERO,
            theme,
            should_quit: false,
            now: Duration::ZERO,
            timers: Timers::new(),
            store,
            generator,
            pending: None,
        };
        app.refresh_saved();
        app
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_generating(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_pending(&self, task: Deferred) -> bool {
        self.timers.is_pending(task)
    }

    /// Advance the virtual clock: apply a settled request first so the status
    /// cycle is cancelled before it could fire, then run due tasks.
    pub fn tick(&mut self, now: Duration) {
        self.now = now;
        self.poll_generation();
        self.views.advance(now);
        for task in self.timers.pop_due(now) {
            self.fire(task);
        }
    }

    pub fn frame_presented(&mut self) {
        self.views.frame_presented();
    }

    fn fire(&mut self, task: Deferred) {
        match task {
            Deferred::StatusCycle => {
                if let LoadingStatus::Cycling(idx) = self.loading {
                    let next = idx + 1;
                    if next < STATUS_MESSAGES.len() {
                        self.loading = LoadingStatus::Cycling(next);
                    }
                    if next + 1 < STATUS_MESSAGES.len() {
                        self.timers
                            .schedule(Deferred::StatusCycle, self.now + STATUS_INTERVAL);
                    }
                }
            }
            Deferred::FailureReset => {
                self.loading = LoadingStatus::Cycling(0);
                self.views.switch_view(ViewId::Config, self.now);
            }
            Deferred::TopicCue => self.topic_error = false,
            Deferred::SavedFlash => self.saved_flash = false,
        }
    }

    pub fn loading_text(&self) -> String {
        match &self.loading {
            LoadingStatus::Cycling(idx) => STATUS_MESSAGES[(*idx).min(STATUS_MESSAGES.len() - 1)]
                .to_string(),
            LoadingStatus::Failed(message) => format!("SYSTEM FAILURE: {message}"),
        }
    }

    pub fn select_goal(&mut self, goal: Goal) {
        self.form.goal = goal;
    }

    /// Validate the topic and start a generation. An empty topic only flashes
    /// the topic field; no request is made.
    pub fn submit(&mut self) {
        if self.views.current() != ViewId::Config || self.is_generating() {
            return;
        }
        if self.form.topic.value().trim().is_empty() {
            self.topic_error = true;
            self.form.focus = FormField::Topic;
            self.timers
                .schedule(Deferred::TopicCue, self.now + TOPIC_CUE);
            return;
        }
        self.session.config = self.form.capture();
        self.start_generation();
    }

    fn start_generation(&mut self) {
        info!(topic = %self.session.config.topic, goal = self.session.config.goal.as_str(), "starting generation");
        self.status_line = None;
        self.views.switch_view(ViewId::Loading, self.now);
        self.loading = LoadingStatus::Cycling(0);
        self.timers.cancel(Deferred::FailureReset);
        self.timers
            .schedule(Deferred::StatusCycle, self.now + STATUS_INTERVAL);

        let (tx, rx) = mpsc::channel();
        let generator = Arc::clone(&self.generator);
        let config = self.session.config.clone();
        thread::spawn(move || {
            let _ = tx.send(generator.generate(&config));
        });
        self.pending = Some(rx);
    }

    fn poll_generation(&mut self) {
        let Some(rx) = &self.pending else {
            return;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err(GenerationError::Transport(
                "request worker stopped unexpectedly".to_string(),
            )),
        };
        self.pending = None;
        self.on_generation_result(result);
    }

    pub fn on_generation_result(&mut self, result: Result<PlanPayload, GenerationError>) {
        self.timers.cancel(Deferred::StatusCycle);
        match result {
            Ok(payload) => self.show_plan(payload),
            Err(e) => {
                warn!("generation failed: {e}");
                self.loading = LoadingStatus::Failed(e.to_string());
                self.timers
                    .schedule(Deferred::FailureReset, self.now + FAILURE_RESET_DELAY);
            }
        }
    }

    /// Render `payload` against the session config, make it the current plan
    /// and show the results view.
    fn show_plan(&mut self, payload: PlanPayload) {
        let rendered = render_plan(&payload, &self.session.config);
        debug!(entries = rendered.entries.len(), "rendered plan");
        self.session.current_plan = Some(payload);
        self.session.rendered = Some(rendered);
        self.timeline_selected = 0;
        self.results_focus = ResultsFocus::Timeline;
        self.detail.close();
        self.views.switch_view(ViewId::Results, self.now);
        self.results_shown_at = self.now;
    }

    pub fn restart(&mut self) {
        self.detail.close();
        self.session.current_plan = None;
        self.session.rendered = None;
        self.confirm_delete = None;
        self.timeline_selected = 0;
        self.status_line = None;
        self.form.focus = FormField::Topic;
        self.views.switch_view(ViewId::Config, self.now);
    }

    pub fn save_current(&mut self) {
        let Some(payload) = &self.session.current_plan else {
            return;
        };
        let Some(store) = &self.store else {
            self.status_line = Some("Saving unavailable: no data directory".to_string());
            return;
        };
        match store.save(&self.session.config, payload) {
            Ok(_) => {
                self.saved_flash = true;
                self.status_line = None;
                self.timers
                    .schedule(Deferred::SavedFlash, self.now + SAVED_FLASH);
                self.refresh_saved();
                self.saved_selected = 0;
            }
            Err(e) => {
                warn!("saving plan failed: {e:#}");
                self.status_line = Some(format!("Save failed: {e}"));
            }
        }
    }

    pub fn refresh_saved(&mut self) {
        self.saved = self.store.as_ref().map(PlanStore::list).unwrap_or_default();
        if self.saved_selected >= self.saved.len() {
            self.saved_selected = self.saved.len().saturating_sub(1);
        }
        if self.saved.is_empty() && self.results_focus == ResultsFocus::SavedList {
            self.results_focus = ResultsFocus::Timeline;
        }
    }

    pub fn open_saved(&mut self, index: usize) {
        if self.confirm_delete.is_some() {
            return;
        }
        let Some(record) = self.saved.get(index).cloned() else {
            return;
        };
        info!(id = record.id, topic = %record.topic, "opening saved plan");
        self.session.config.topic = record.topic;
        self.show_plan(record.data);
    }

    pub fn request_delete(&mut self, index: usize) {
        if index < self.saved.len() {
            self.confirm_delete = Some(index);
        }
    }

    pub fn confirm_delete(&mut self) {
        let Some(index) = self.confirm_delete.take() else {
            return;
        };
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.delete(index) {
            warn!("deleting plan failed: {e:#}");
            self.status_line = Some(format!("Delete failed: {e}"));
        }
        self.refresh_saved();
    }

    pub fn cancel_delete(&mut self) {
        self.confirm_delete = None;
    }

    /// Tab order on the results view: timeline, notes, then the saved list
    /// when there is anything in it.
    pub fn cycle_results_focus(&mut self, forward: bool) {
        let mut order = vec![ResultsFocus::Timeline, ResultsFocus::Notes];
        if !self.saved.is_empty() {
            order.push(ResultsFocus::SavedList);
        }
        let idx = order
            .iter()
            .position(|f| *f == self.results_focus)
            .unwrap_or(0);
        let next = if forward {
            (idx + 1) % order.len()
        } else {
            (idx + order.len() - 1) % order.len()
        };
        self.results_focus = order[next];
    }

    pub fn select_next_entry(&mut self) {
        let count = self.entry_count();
        if count > 0 {
            self.timeline_selected = (self.timeline_selected + 1).min(count - 1);
        }
    }

    pub fn select_prev_entry(&mut self) {
        self.timeline_selected = self.timeline_selected.saturating_sub(1);
    }

    pub fn select_next_saved(&mut self) {
        if !self.saved.is_empty() {
            self.saved_selected = (self.saved_selected + 1).min(self.saved.len() - 1);
        }
    }

    pub fn select_prev_saved(&mut self) {
        self.saved_selected = self.saved_selected.saturating_sub(1);
    }

    fn entry_count(&self) -> usize {
        self.session
            .rendered
            .as_ref()
            .map_or(0, |r| r.entries.len())
    }

    pub fn open_detail(&mut self) {
        let unit = self
            .session
            .current_plan
            .as_ref()
            .and_then(|p| p.units().get(self.timeline_selected));
        if let Some(unit) = unit {
            self.detail.open(unit);
        }
    }

    pub fn close_detail(&mut self) {
        self.detail.click_overlay();
    }

    pub fn since_results_shown(&self) -> Duration {
        self.now.saturating_sub(self.results_shown_at)
    }
}
