use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("ticket submission failed: {0}")]
    Submission(String),
    #[error("AI service error: {0}")]
    AiService(String),
    #[error("failed to fetch tickets: {0}")]
    Fetch(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
