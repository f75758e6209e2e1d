use crate::domain::ticket::TicketRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScope {
    Response,
    History,
}

/// Presentation hooks. Each call replaces the content of one region and
/// never fails from the caller's point of view.
pub trait ViewRenderer: Send + Sync {
    fn render_busy(&self, active: bool);
    fn render_ai_response(&self, text: &str);
    fn render_history(&self, records: &[TicketRecord]);
    fn render_error(&self, scope: ErrorScope, message: &str);
}

/// The input surface a draft was entered on.
pub trait DraftSurface: Send + Sync {
    fn reset(&self);
}
