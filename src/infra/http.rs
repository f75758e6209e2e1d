use std::time::Duration;

use reqwest::{Client, Response};

use crate::error::{AppError, AppResult};

/// Builds the shared HTTP client. The only timeout is the one configured on
/// the transport; the clients themselves never add one.
pub fn build_client(timeout: Option<Duration>) -> AppResult<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|err| AppError::Configuration(format!("failed to build HTTP client: {err}")))
}

pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Status line plus whatever body the backend sent along with a failure.
pub async fn failure_detail(response: Response) -> String {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unable to read response>".to_string());
    if body.trim().is_empty() {
        format!("backend responded with {status}")
    } else {
        format!("backend responded with {status}: {}", body.trim())
    }
}
