use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use crystal_grimoire::{
    auth::{NoopVerifier, TokenVerifier},
    config::{Config, GeminiConfig},
    llm::LlmClient,
    server::{self, handlers::AppState},
};
use serde_json::Value;
use std::sync::Arc;

pub const TEST_BOUNDARY: &str = "crystal-grimoire-test-boundary";

/// A response shaped the way the advisor persona is asked to answer
pub const SAMPLE_AI_RESPONSE: &str = "Ah, beloved seeker...\n\
The spirits clearly reveal this to be Amethyst, the violet guardian.\n\
\n\
**Metaphysical Properties**\n\
• Calms the restless mind and opens intuition\n\
• Shields the aura from heavy, stagnant energies\n\
• Deepens meditation and dream recall\n\
\n\
## Chakra Connections\n\
It resonates with the Third Eye and Crown.\n\
Its element is Air, and Pisces souls adore it.\n\
\n\
## Personal Spiritual Message\n\
Your path is lit by gentle violet light today.\n\
Trust the quiet knowing that rises within.";

/// Create a test configuration with sensible defaults
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.gemini = GeminiConfig {
        api_key: "test-api-key".to_string(),
        ..GeminiConfig::default()
    };
    config.server.environment = "test".to_string();
    config
}

pub fn create_test_app(llm: Arc<dyn LlmClient>) -> Router {
    create_test_app_with(create_test_config(), llm, Arc::new(NoopVerifier))
}

pub fn create_test_app_with(
    config: Config,
    llm: Arc<dyn LlmClient>,
    verifier: Arc<dyn TokenVerifier>,
) -> Router {
    server::router(AppState::new(&config, llm, verifier))
}

/// Hand-built multipart/form-data body
pub struct MultipartBuilder {
    body: Vec<u8>,
}

impl MultipartBuilder {
    pub fn new() -> Self {
        Self { body: Vec::new() }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{TEST_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn image(mut self, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{TEST_BOUNDARY}\r\nContent-Disposition: form-data; name=\"images\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{TEST_BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

impl Default for MultipartBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn identify_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v2/crystal/identify")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={TEST_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn guidance_request(form: &[(&str, &str)]) -> Request<Body> {
    let body = serde_urlencoded::to_string(form).unwrap();
    Request::builder()
        .method("POST")
        .uri("/api/v2/spiritual/guidance")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

pub fn guidance_multipart_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v2/spiritual/guidance")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={TEST_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
