pub mod contracts;
pub mod error;
pub mod gemini;
pub mod worker;

pub use contracts::*;
pub use error::*;
pub use gemini::ChatBackend;
pub use gemini::GeminiClient;
pub use gemini::GeminiSettings;
pub use worker::*;
