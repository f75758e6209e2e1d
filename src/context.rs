use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{AssistantService, TicketStoreService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub ticket_store: Arc<dyn TicketStoreService>,
    pub assistant: Arc<dyn AssistantService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        ticket_store: Arc<dyn TicketStoreService>,
        assistant: Arc<dyn AssistantService>,
    ) -> Self {
        Self {
            config,
            ticket_store,
            assistant,
        }
    }
}
