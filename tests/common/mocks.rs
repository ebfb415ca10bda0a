use async_trait::async_trait;
use crystal_grimoire::{
    Error, Result,
    auth::{IdentityStatus, TokenVerifier, UserId},
    llm::{GenerationRequest, LlmClient, ProbeStatus},
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Mock gateway client that replays scripted outcomes in order
pub struct MockLlmClient {
    pub outcomes: Mutex<VecDeque<Result<String>>>,
    pub requests: Mutex<Vec<GenerationRequest>>,
    pub probe_status: ProbeStatus,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            probe_status: ProbeStatus::Connected,
        }
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.outcomes.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    pub fn with_error(self, error: Error) -> Self {
        self.outcomes.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn with_probe_status(mut self, status: ProbeStatus) -> Self {
        self.probe_status = status;
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn get_requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::ai("No more mock responses available")))
    }

    async fn probe(&self) -> ProbeStatus {
        self.probe_status
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Token verifier backed by a fixed token table
pub struct StaticVerifier {
    pub tokens: HashMap<String, UserId>,
}

impl StaticVerifier {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            tokens: pairs
                .iter()
                .map(|(token, user)| (token.to_string(), user.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl TokenVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> Option<UserId> {
        self.tokens.get(token).cloned()
    }

    fn status(&self) -> IdentityStatus {
        IdentityStatus::Connected
    }
}
