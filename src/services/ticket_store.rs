use async_trait::async_trait;

use crate::domain::ticket::{TicketDraft, TicketHistory, TicketRecord};
use crate::error::AppResult;

#[async_trait]
pub trait TicketStoreService: Send + Sync {
    /// Fails with `AppError::Submission`.
    async fn submit(&self, draft: &TicketDraft) -> AppResult<TicketRecord>;
    /// Fails with `AppError::Fetch`.
    async fn list(&self) -> AppResult<TicketHistory>;
    /// Fails with `AppError::Fetch`.
    async fn fetch(&self, id: &str) -> AppResult<TicketRecord>;
}
