//! Blocking client for the Gemini `generateContent` REST endpoint.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use crate::contracts::ChatRequest;
use crate::error::ChatError;

/// Anything that can answer a chat request with reply text.
pub trait ChatBackend: Send + Sync {
    fn complete(&self, request: &ChatRequest) -> Result<String, ChatError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeminiSettings {
    pub api_key: Option<String>,
    /// Names of the environment variables the key was looked up in.
    pub key_source: String,
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
    pub assistant_name: String,
}

pub struct GeminiClient {
    client: Client,
    settings: GeminiSettings,
}

impl GeminiClient {
    pub fn new(settings: GeminiSettings) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|err| ChatError::Client(err.to_string()))?;
        Ok(Self { client, settings })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    fn url(&self, api_key: &str) -> String {
        format!(
            "{}/{model}:generateContent?key={api_key}",
            self.settings.endpoint.trim_end_matches('/'),
            model = self.settings.model,
        )
    }
}

impl ChatBackend for GeminiClient {
    fn complete(&self, request: &ChatRequest) -> Result<String, ChatError> {
        let Some(api_key) = self.settings.api_key.as_deref() else {
            return Err(ChatError::MissingApiKey {
                checked: self.settings.key_source.clone(),
            });
        };

        let body = build_request(
            request,
            &self.settings.assistant_name,
            self.settings.temperature,
        );
        tracing::info!(
            model = %self.settings.model,
            turns = body.contents.len(),
            "sending gemini request"
        );

        let response = self
            .client
            .post(self.url(api_key))
            .json(&body)
            .send()
            .map_err(ChatError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            let err = map_http_error(status, &body_text);
            tracing::warn!(status = status.as_u16(), error = %err, "gemini request failed");
            return Err(err);
        }

        let parsed: GenerateContentResponse = response.json().map_err(ChatError::from_transport)?;
        extract_text_response(parsed)
    }
}

pub fn system_instruction(assistant_name: &str, context: &str) -> String {
    format!(
        "You are {assistant_name}, the AI assistant of this developer portfolio, styled like a code editor's copilot.\n\
Use the following file contents to answer questions about the developer's skills, experience, and projects.\n\
Keep answers professional, helpful, and concise.\n\n\
PORTFOLIO DATA:\n{context}"
    )
}

pub(crate) fn build_request(
    request: &ChatRequest,
    assistant_name: &str,
    temperature: f32,
) -> GenerateContentRequest {
    let mut contents: Vec<Content> = request
        .history
        .iter()
        .map(|turn| Content::text(turn.role.wire_name(), &turn.text))
        .collect();
    contents.push(Content::text("user", &request.prompt));

    GenerateContentRequest {
        contents,
        system_instruction: Some(Content {
            role: None,
            parts: vec![Part {
                text: system_instruction(assistant_name, &request.context),
            }],
        }),
        generation_config: GenerationConfig { temperature },
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

impl Content {
    fn text(role: &str, text: &str) -> Self {
        Self {
            role: Some(role.to_string()),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

pub(crate) fn extract_text_response(response: GenerateContentResponse) -> Result<String, ChatError> {
    let text: String = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(ChatError::EmptyResponse);
    }
    Ok(text)
}

pub(crate) fn map_http_error(status: StatusCode, body: &str) -> ChatError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.to_string());

    ChatError::Api {
        status: status.as_u16(),
        message,
    }
}
