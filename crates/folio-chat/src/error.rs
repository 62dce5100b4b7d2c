use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("no API key configured (checked {checked})")]
    MissingApiKey { checked: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("response contained no text")]
    EmptyResponse,
    #[error("failed to build HTTP client: {0}")]
    Client(String),
    #[error("chat backend stopped unexpectedly")]
    Aborted,
}

impl ChatError {
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            Self::Network(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Api {
                status: err.status().map(|s| s.as_u16()).unwrap_or(0),
                message: err.to_string(),
            }
        }
    }
}

pub const EMPTY_REPLY: &str = "I'm sorry, I couldn't process that request.";

/// Turns a failure into the text shown in the chat transcript.
pub fn describe_failure(err: &ChatError) -> String {
    match err {
        ChatError::MissingApiKey { checked } => format!(
            "⚠️ Gemini API key is not configured. Set {checked} in your environment and restart folio. Get your API key from: https://aistudio.google.com/"
        ),
        ChatError::EmptyResponse => EMPTY_REPLY.to_string(),
        ChatError::Network(_) => {
            "❌ Network error. Please check your internet connection and try again.".to_string()
        }
        other => {
            let message = other.to_string();
            if message.contains("API key") {
                "❌ Invalid API key. Please check your GEMINI_API_KEY.".to_string()
            } else if message.contains("quota") {
                "❌ API quota exceeded. Please check your Gemini API usage limits.".to_string()
            } else if message.contains("network") {
                "❌ Network error. Please check your internet connection and try again."
                    .to_string()
            } else {
                format!("❌ Error: {message}")
            }
        }
    }
}
