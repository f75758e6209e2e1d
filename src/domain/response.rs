use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AiResponse {
    pub response: String,
    #[serde(default)]
    pub classification: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Classification {
    pub classification: String,
}
