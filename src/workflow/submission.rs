use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::context::AppContext;
use crate::domain::response::AiResponse;
use crate::domain::state::WorkflowState;
use crate::domain::ticket::{TicketDraft, TicketRecord};
use crate::services::{
    AssistantService, DraftSurface, ErrorScope, TicketStoreService, ViewRenderer,
};
use crate::workflow::busy::BusyGuard;

pub const SUBMISSION_ERROR_MESSAGE: &str =
    "Error processing your request. Your ticket could not be submitted, please try again.";
pub const AI_SERVICE_ERROR_MESSAGE: &str =
    "Error processing your request. The AI assistant is unavailable, please try again.";
pub const HISTORY_ERROR_MESSAGE: &str = "Error loading ticket history.";

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Completed {
        ticket: TicketRecord,
        response: AiResponse,
    },
    SubmitFailed,
    /// The ticket was persisted but no AI response could be produced.
    ResponseFailed {
        ticket: TicketRecord,
    },
    /// A submission was already in flight on this state.
    Rejected,
}

impl SubmissionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, SubmissionOutcome::Completed { .. })
    }
}

pub struct TicketSubmissionWorkflow {
    tickets: Arc<dyn TicketStoreService>,
    assistant: Arc<dyn AssistantService>,
    view: Arc<dyn ViewRenderer>,
    form: Arc<dyn DraftSurface>,
}

impl TicketSubmissionWorkflow {
    pub fn new(
        tickets: Arc<dyn TicketStoreService>,
        assistant: Arc<dyn AssistantService>,
        view: Arc<dyn ViewRenderer>,
        form: Arc<dyn DraftSurface>,
    ) -> Self {
        Self {
            tickets,
            assistant,
            view,
            form,
        }
    }

    pub fn from_context(
        ctx: &AppContext,
        view: Arc<dyn ViewRenderer>,
        form: Arc<dyn DraftSurface>,
    ) -> Self {
        Self::new(
            ctx.ticket_store.clone(),
            ctx.assistant.clone(),
            view,
            form,
        )
    }

    /// Submits `draft`, asks the assistant about it, then refreshes history
    /// and clears the form. Calls are strictly sequential.
    pub async fn run(&self, state: &mut WorkflowState, draft: TicketDraft) -> SubmissionOutcome {
        if state.busy {
            warn!("submission already in progress; ignoring new draft");
            return SubmissionOutcome::Rejected;
        }

        let _busy = BusyGuard::acquire(state, self.view.as_ref());

        let ticket = match self.tickets.submit(&draft).await {
            Ok(ticket) => ticket,
            Err(err) => {
                warn!(error = %err, subject = %draft.subject, "ticket submission failed");
                self.view
                    .render_error(ErrorScope::Response, SUBMISSION_ERROR_MESSAGE);
                return SubmissionOutcome::SubmitFailed;
            }
        };
        info!(id = ?ticket.id(), "ticket submitted");

        // The assistant only sees the description, not the stored ticket.
        let response = match self.assistant.respond(&draft.description).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, id = ?ticket.id(), "AI response failed after ticket was stored");
                self.view
                    .render_error(ErrorScope::Response, AI_SERVICE_ERROR_MESSAGE);
                return SubmissionOutcome::ResponseFailed { ticket };
            }
        };
        debug!(classification = ?response.classification, "AI response received");

        self.view.render_ai_response(&response.response);
        self.load_history().await;
        self.form.reset();

        SubmissionOutcome::Completed { ticket, response }
    }

    /// Refreshes the history panel. Failures stay in that panel.
    ///
    /// Returns the number of records shown, or `None` if the list call failed.
    pub async fn load_history(&self) -> Option<usize> {
        match self.tickets.list().await {
            Ok(records) => {
                debug!(count = records.len(), "ticket history loaded");
                self.view.render_history(&records);
                Some(records.len())
            }
            Err(err) => {
                warn!(error = %err, "ticket history refresh failed");
                self.view
                    .render_error(ErrorScope::History, HISTORY_ERROR_MESSAGE);
                None
            }
        }
    }
}
