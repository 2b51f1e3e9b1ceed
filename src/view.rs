use std::time::Duration;

use crate::timer::Timers;

/// How long a deactivated view keeps drawing its exit before it is hidden.
pub const EXIT_TRANSITION: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewId {
    Config,
    Loading,
    Results,
}

impl ViewId {
    pub const ALL: [ViewId; 3] = [ViewId::Config, ViewId::Loading, ViewId::Results];

    fn index(self) -> usize {
        match self {
            ViewId::Config => 0,
            ViewId::Loading => 1,
            ViewId::Results => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ViewState {
    active: bool,
    hidden: bool,
}

/// Keeps exactly one of the fixed views active, with timed exit transitions
/// and an enter transition deferred to the next presented frame.
#[derive(Debug)]
pub struct ViewController {
    states: [ViewState; 3],
    entering: Option<ViewId>,
    hide_timers: Timers<ViewId>,
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewController {
    pub fn new() -> Self {
        let mut states = [ViewState {
            active: false,
            hidden: true,
        }; 3];
        states[ViewId::Config.index()] = ViewState {
            active: true,
            hidden: false,
        };
        Self {
            states,
            entering: None,
            hide_timers: Timers::new(),
        }
    }

    pub fn switch_view(&mut self, target: ViewId, now: Duration) {
        for id in ViewId::ALL {
            let state = &mut self.states[id.index()];
            if state.active {
                state.active = false;
                self.hide_timers.schedule(id, now + EXIT_TRANSITION);
            }
        }
        // A view still waiting for its first frame never became active, but it
        // was unhidden and needs the same exit.
        if let Some(superseded) = self.entering.take()
            && superseded != target
        {
            self.hide_timers.schedule(superseded, now + EXIT_TRANSITION);
        }
        self.states[target.index()].hidden = false;
        self.entering = Some(target);
    }

    /// Called once a frame has been drawn. Completes a deferred activation so
    /// the entering view is shown in its pre-transition state at least once.
    pub fn frame_presented(&mut self) {
        if let Some(target) = self.entering.take() {
            self.states[target.index()].active = true;
        }
    }

    /// Fire due hide deadlines. A view re-activated (or about to be) since its
    /// deadline was set keeps its visibility.
    pub fn advance(&mut self, now: Duration) {
        for id in self.hide_timers.pop_due(now) {
            let pending_enter = self.entering == Some(id);
            let state = &mut self.states[id.index()];
            if !state.active && !pending_enter {
                state.hidden = true;
            }
        }
    }

    pub fn is_active(&self, id: ViewId) -> bool {
        self.states[id.index()].active
    }

    pub fn is_hidden(&self, id: ViewId) -> bool {
        self.states[id.index()].hidden
    }

    pub fn is_entering(&self, id: ViewId) -> bool {
        self.entering == Some(id)
    }

    /// The view to draw: the pending target while its activation is deferred,
    /// otherwise the active one.
    pub fn current(&self) -> ViewId {
        if let Some(target) = self.entering {
            return target;
        }
        ViewId::ALL
            .into_iter()
            .find(|id| self.is_active(*id))
            .unwrap_or(ViewId::Config)
    }

    pub fn active_count(&self) -> usize {
        self.states.iter().filter(|s| s.active).count()
    }
}
