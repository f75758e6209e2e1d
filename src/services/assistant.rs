use async_trait::async_trait;

use crate::domain::response::{AiResponse, Classification};
use crate::error::AppResult;

#[async_trait]
pub trait AssistantService: Send + Sync {
    async fn respond(&self, query: &str) -> AppResult<AiResponse>;
    async fn classify(&self, text: &str) -> AppResult<Classification>;
}
