use async_trait::async_trait;
use reqwest::{Client, header::ACCEPT};
use serde::Serialize;

use crate::domain::response::{AiResponse, Classification};
use crate::error::{AppError, AppResult};
use crate::infra::http::{endpoint, failure_detail};
use crate::services::AssistantService;

const RESPOND_PATH: &str = "/api/ai/respond";
const CLASSIFY_PATH: &str = "/api/ai/classify";

pub struct AiResponseClient {
    http: Client,
    base_url: String,
}

impl AiResponseClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl AssistantService for AiResponseClient {
    async fn respond(&self, query: &str) -> AppResult<AiResponse> {
        let response = self
            .http
            .post(endpoint(&self.base_url, RESPOND_PATH))
            .header(ACCEPT, "application/json")
            .json(&RespondRequest { query })
            .send()
            .await
            .map_err(|err| AppError::AiService(format!("failed to call AI service: {err}")))?;

        if !response.status().is_success() {
            return Err(AppError::AiService(failure_detail(response).await));
        }

        response
            .json()
            .await
            .map_err(|err| AppError::AiService(format!("failed to parse AI response: {err}")))
    }

    async fn classify(&self, text: &str) -> AppResult<Classification> {
        let response = self
            .http
            .post(endpoint(&self.base_url, CLASSIFY_PATH))
            .header(ACCEPT, "application/json")
            .json(&ClassifyRequest { text })
            .send()
            .await
            .map_err(|err| AppError::AiService(format!("failed to call AI service: {err}")))?;

        if !response.status().is_success() {
            return Err(AppError::AiService(failure_detail(response).await));
        }

        response.json().await.map_err(|err| {
            AppError::AiService(format!("failed to parse classification: {err}"))
        })
    }
}

#[derive(Serialize)]
struct RespondRequest<'a> {
    query: &'a str,
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    use super::*;
    use crate::test_support::spawn_backend;

    #[tokio::test]
    async fn respond_sends_query_and_returns_text_verbatim() {
        let router = Router::new().route(
            RESPOND_PATH,
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body, json!({ "query": "Cannot log in" }));
                Json(json!({
                    "response": "Please reset your password via the link below.",
                    "classification": "account_access"
                }))
            }),
        );
        let client = AiResponseClient::new(Client::new(), spawn_backend(router).await);

        let answer = client.respond("Cannot log in").await.unwrap();

        assert_eq!(answer.response, "Please reset your password via the link below.");
        assert_eq!(answer.classification.as_deref(), Some("account_access"));
    }

    #[tokio::test]
    async fn respond_without_classification() {
        let router = Router::new().route(
            RESPOND_PATH,
            post(|| async { Json(json!({ "response": "<b>ok</b>" })) }),
        );
        let client = AiResponseClient::new(Client::new(), spawn_backend(router).await);

        let answer = client.respond("anything").await.unwrap();

        assert_eq!(answer.response, "<b>ok</b>");
        assert_eq!(answer.classification, None);
    }

    #[tokio::test]
    async fn respond_maps_non_success_to_ai_service_error() {
        let router = Router::new().route(
            RESPOND_PATH,
            post(|| async { StatusCode::BAD_GATEWAY }),
        );
        let client = AiResponseClient::new(Client::new(), spawn_backend(router).await);

        let err = client.respond("anything").await.unwrap_err();

        assert!(matches!(err, AppError::AiService(message) if message.contains("502")));
    }

    #[tokio::test]
    async fn respond_maps_malformed_body_to_ai_service_error() {
        let router = Router::new().route(
            RESPOND_PATH,
            post(|| async { Json(json!({ "answer": "wrong shape" })) }),
        );
        let client = AiResponseClient::new(Client::new(), spawn_backend(router).await);

        let err = client.respond("anything").await.unwrap_err();

        assert!(matches!(err, AppError::AiService(message) if message.contains("parse")));
    }

    #[tokio::test]
    async fn classify_posts_text() {
        let router = Router::new().route(
            CLASSIFY_PATH,
            post(|Json(body): Json<Value>| async move {
                let label = if body["text"].as_str().unwrap_or_default().contains("charge") {
                    "billing"
                } else {
                    "general_inquiry"
                };
                Json(json!({ "classification": label }))
            }),
        );
        let client = AiResponseClient::new(Client::new(), spawn_backend(router).await);

        let result = client.classify("Unexpected charge on my card").await.unwrap();

        assert_eq!(result.classification, "billing");
    }
}
