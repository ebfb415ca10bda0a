use super::retry::{AttemptOutcome, RetryDecision, RetryPolicy};
use super::types::*;
use crate::{Error, Result, config::GeminiConfig};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, error, warn};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends one generation request, retrying per policy, and returns the raw text.
    async fn generate(&self, request: GenerationRequest) -> Result<String>;

    /// Best-effort reachability check used by the health endpoint.
    async fn probe(&self) -> ProbeStatus;
}

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    policy: RetryPolicy,
    probe_timeout: Duration,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        let policy = RetryPolicy::from(&config);
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            model: config.model,
            policy,
            probe_timeout: Duration::from_secs(config.probe_timeout_secs),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn models_url(&self) -> String {
        format!("{}/v1beta/models", self.base_url)
    }

    fn redact(&self, text: &str) -> String {
        if self.api_key.is_empty() {
            return text.to_string();
        }
        text.replace(&self.api_key, "[redacted]")
    }

    /// One POST bounded by the per-attempt timeout, covering both the send and
    /// the body read. `Ok(Err(_))` is an outcome for the retry policy;
    /// `Err(_)` fails the request outright.
    async fn attempt(
        &self,
        url: &str,
        payload: &GenerateContentRequest,
        attempt: u32,
    ) -> Result<std::result::Result<String, AttemptOutcome>> {
        let sent = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(self.policy.attempt_timeout)
            .json(payload)
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                warn!("Gemini API timeout on attempt {}", attempt + 1);
                return Ok(Err(AttemptOutcome::Timeout));
            }
            Err(e) => {
                let message = self.redact(&e.to_string());
                error!("Gemini request failed to send: {}", message);
                return Err(Error::ai(message));
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            let body = truncate_for_log(&self.redact(&body), 500);
            if status == StatusCode::TOO_MANY_REQUESTS {
                warn!("Gemini API rate limited on attempt {}: {}", attempt + 1, body);
            } else {
                error!("Gemini API error: {} - {}", status.as_u16(), body);
            }
            return Ok(Err(AttemptOutcome::Status(status)));
        }

        let body: GenerateContentResponse = match response.json().await {
            Ok(body) => body,
            Err(e) if e.is_timeout() => {
                warn!("Gemini API timeout reading response on attempt {}", attempt + 1);
                return Ok(Err(AttemptOutcome::Timeout));
            }
            Err(e) => {
                return Err(Error::ai(format!(
                    "Invalid Gemini response: {}",
                    self.redact(&e.to_string())
                )));
            }
        };

        debug!("Gemini API answered on attempt {}", attempt + 1);
        body.first_text()
            .map(Ok)
            .ok_or_else(|| Error::ai("Gemini response contained no text"))
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        for (index, image) in request.images.iter().enumerate() {
            debug!(
                "Encoding image {} ({} bytes, {})",
                index + 1,
                image.bytes.len(),
                image.mime_type
            );
        }

        let payload = request.to_wire();
        let url = self.generate_url();
        let mut outcome = AttemptOutcome::Transport;

        for attempt in 0..self.policy.max_attempts {
            outcome = match self.attempt(&url, &payload, attempt).await? {
                Ok(text) => return Ok(text),
                Err(outcome) => outcome,
            };

            match self.policy.decide(outcome, attempt) {
                RetryDecision::RetryAfter(delay) => {
                    warn!(
                        "Retrying Gemini request in {:?} after {:?} (attempt {})",
                        delay,
                        outcome,
                        attempt + 1
                    );
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::Fail => break,
            }
        }

        Err(match outcome {
            AttemptOutcome::Status(status) => Error::Upstream {
                status: status.as_u16(),
            },
            AttemptOutcome::Timeout => Error::Timeout {
                attempts: self.policy.max_attempts,
            },
            AttemptOutcome::Transport => Error::ai("Gemini request did not complete"),
        })
    }

    async fn probe(&self) -> ProbeStatus {
        let result = self
            .http
            .get(self.models_url())
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(self.probe_timeout)
            .send()
            .await;

        match result {
            Ok(response) if response.status() == StatusCode::OK => ProbeStatus::Connected,
            Ok(response) => {
                debug!("Gemini probe returned {}", response.status());
                ProbeStatus::Degraded
            }
            Err(e) => {
                debug!("Gemini probe failed: {}", self.redact(&e.to_string()));
                ProbeStatus::Unavailable
            }
        }
    }
}

fn truncate_for_log(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let truncated: String = value.chars().take(limit).collect();
    format!("{truncated}... (truncated)")
}
