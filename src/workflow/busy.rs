use crate::domain::state::WorkflowState;
use crate::services::ViewRenderer;

/// Holds the busy flag for as long as it lives.
///
/// Dropping the guard clears `busy` and renders the idle state, whichever
/// way the submission ended (including a panic or a dropped future).
pub struct BusyGuard<'a> {
    state: &'a mut WorkflowState,
    view: &'a dyn ViewRenderer,
}

impl<'a> BusyGuard<'a> {
    pub fn acquire(state: &'a mut WorkflowState, view: &'a dyn ViewRenderer) -> Self {
        state.busy = true;
        view.render_busy(true);
        Self { state, view }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state.busy = false;
        self.view.render_busy(false);
    }
}
