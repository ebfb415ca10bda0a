use crate::{auth::IdentityStatus, llm::ProbeStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct GuidanceForm {
    pub guidance_type: String,
    pub user_profile: String,
    pub custom_prompt: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub environment: String,
    pub debug: bool,
    pub features: Vec<&'static str>,
    pub endpoints: EndpointMap,
}

#[derive(Debug, Serialize)]
pub struct EndpointMap {
    pub health: &'static str,
    pub identify: &'static str,
    pub guidance: &'static str,
    pub metrics: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub service: &'static str,
    pub timestamp: String,
    pub version: &'static str,
    pub environment: String,
    pub gemini_api: ProbeStatus,
    pub identity_provider: IdentityStatus,
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub environment: String,
    pub uptime_seconds: u64,
    pub features: MetricsFeatures,
    pub endpoints: RouteListing,
}

#[derive(Debug, Serialize)]
pub struct MetricsFeatures {
    pub identity_provider: bool,
    pub debug_mode: bool,
    pub rate_limiting: String,
}

#[derive(Debug, Serialize)]
pub struct RouteListing {
    pub total: usize,
    pub available: Vec<&'static str>,
}
