use std::panic;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::thread;

use crate::contracts::ChatRequest;
use crate::error::describe_failure;
use crate::error::ChatError;
use crate::gemini::ChatBackend;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    Reply(String),
    /// The request failed; the text is already fit for display.
    Failed(String),
}

/// Answers a request, converting any failure into display text.
pub fn chat_reply(backend: &dyn ChatBackend, request: &ChatRequest) -> String {
    match backend.complete(request) {
        Ok(text) => text,
        Err(err) => describe_failure(&err),
    }
}

/// Runs the request on a background thread and reports through `callback`.
///
/// The callback fires exactly once, even when the backend panics.
pub fn spawn_chat<F>(backend: Arc<dyn ChatBackend>, request: ChatRequest, callback: F)
where
    F: Fn(ChatEvent) + Send + 'static,
{
    thread::spawn(move || {
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| backend.complete(&request))) {
            Ok(outcome) => outcome,
            Err(_) => Err(ChatError::Aborted),
        };
        let event = match outcome {
            Ok(text) => {
                tracing::info!(chars = text.chars().count(), "chat reply ready");
                ChatEvent::Reply(text)
            }
            Err(err) => {
                tracing::warn!(error = %err, "chat request failed");
                ChatEvent::Failed(describe_failure(&err))
            }
        };
        callback(event);
    });
}
