/// UI state owned by whoever drives submissions.
///
/// `busy` is true exactly while a submission is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkflowState {
    pub busy: bool,
}

impl WorkflowState {
    pub fn idle() -> Self {
        Self::default()
    }
}
