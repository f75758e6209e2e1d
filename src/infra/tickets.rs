use async_trait::async_trait;
use reqwest::{Client, Url, header::ACCEPT};
use serde::Deserialize;

use crate::domain::ticket::{TicketDraft, TicketHistory, TicketRecord};
use crate::error::{AppError, AppResult};
use crate::infra::http::{endpoint, failure_detail};
use crate::services::TicketStoreService;

const TICKETS_PATH: &str = "/api/tickets";

pub struct TicketClient {
    http: Client,
    base_url: String,
}

impl TicketClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn tickets_endpoint(&self) -> String {
        endpoint(&self.base_url, TICKETS_PATH)
    }

    /// The id always lands in a single path segment, escaped as needed.
    fn ticket_endpoint(&self, id: &str) -> AppResult<Url> {
        let mut url = Url::parse(&self.tickets_endpoint()).map_err(|err| {
            AppError::Configuration(format!("invalid API base URL '{}': {err}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                AppError::Configuration(format!(
                    "API base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .push(id.trim());
        Ok(url)
    }
}

#[async_trait]
impl TicketStoreService for TicketClient {
    async fn submit(&self, draft: &TicketDraft) -> AppResult<TicketRecord> {
        let response = self
            .http
            .post(self.tickets_endpoint())
            .header(ACCEPT, "application/json")
            .json(draft)
            .send()
            .await
            .map_err(|err| AppError::Submission(format!("failed to call ticket backend: {err}")))?;

        if !response.status().is_success() {
            return Err(AppError::Submission(failure_detail(response).await));
        }

        let payload: CreateTicketResponse = response.json().await.map_err(|err| {
            AppError::Submission(format!("failed to parse ticket response: {err}"))
        })?;

        Ok(payload.into_record())
    }

    async fn list(&self) -> AppResult<TicketHistory> {
        let response = self
            .http
            .get(self.tickets_endpoint())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| AppError::Fetch(format!("failed to call ticket backend: {err}")))?;

        if !response.status().is_success() {
            return Err(AppError::Fetch(failure_detail(response).await));
        }

        let payload: ListTicketsResponse = response
            .json()
            .await
            .map_err(|err| AppError::Fetch(format!("failed to parse ticket list: {err}")))?;

        Ok(payload.tickets.unwrap_or_default())
    }

    async fn fetch(&self, id: &str) -> AppResult<TicketRecord> {
        if id.trim().is_empty() {
            return Err(AppError::Fetch("ticket id must not be empty".to_string()));
        }

        let response = self
            .http
            .get(self.ticket_endpoint(id)?)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| AppError::Fetch(format!("failed to call ticket backend: {err}")))?;

        if !response.status().is_success() {
            return Err(AppError::Fetch(failure_detail(response).await));
        }

        let payload: GetTicketResponse = response
            .json()
            .await
            .map_err(|err| AppError::Fetch(format!("failed to parse ticket: {err}")))?;

        Ok(payload.ticket)
    }
}

/// The backend wraps created tickets as `{message, ticket}`; a bare ticket
/// object is accepted as well.
#[derive(Deserialize)]
#[serde(untagged)]
enum CreateTicketResponse {
    Envelope { ticket: TicketRecord },
    Bare(TicketRecord),
}

impl CreateTicketResponse {
    fn into_record(self) -> TicketRecord {
        match self {
            CreateTicketResponse::Envelope { ticket } => ticket,
            CreateTicketResponse::Bare(ticket) => ticket,
        }
    }
}

#[derive(Deserialize)]
struct ListTicketsResponse {
    // `null` is treated as an empty history.
    tickets: Option<Vec<TicketRecord>>,
}

#[derive(Deserialize)]
struct GetTicketResponse {
    ticket: TicketRecord,
}
