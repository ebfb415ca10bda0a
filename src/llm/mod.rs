mod client;
mod retry;
mod types;

pub use client::{GeminiClient, LlmClient};
pub use retry::{AttemptOutcome, RetryDecision, RetryPolicy};
pub use types::*;
