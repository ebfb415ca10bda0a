use super::types::*;
use super::{ROUTE_GUIDANCE, ROUTE_HEALTH, ROUTE_IDENTIFY, ROUTE_METRICS, ROUTES};
use crate::{
    API_VERSION, Error, SERVICE_NAME,
    auth::{IdentityStatus, TokenVerifier, resolve_user},
    config::{Config, RateLimitConfig},
    guidance::{GuidanceResponse, GuidanceService},
    identify::{IdentificationRequest, IdentificationResult, Identifier, ImageUpload, PromptComposer},
    llm::LlmClient,
};
use axum::{
    Form,
    extract::{
        FromRequest, Multipart, Request, State,
        multipart::{MultipartError, MultipartRejection},
        rejection::FormRejection,
    },
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::Json,
};
use std::{sync::Arc, time::Instant};
use tracing::{debug, error, info};

pub type ApiError = (StatusCode, Json<ErrorResponse>);

const FEATURES: [&str; 6] = [
    "Enhanced crystal identification",
    "Spiritual guidance with astrological integration",
    "Multi-image processing",
    "Pluggable identity verification",
    "Comprehensive error handling",
    "Performance metrics",
];

/// Process-level facts reported by the info, health and metrics endpoints.
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub environment: String,
    pub debug: bool,
    pub allowed_origins: Vec<String>,
    pub rate_limit: RateLimitConfig,
    pub started_at: Instant,
}

impl ServiceInfo {
    pub fn from_config(config: &Config) -> Self {
        Self {
            environment: config.server.environment.clone(),
            debug: config.server.debug,
            allowed_origins: config.server.allowed_origins.clone(),
            rate_limit: config.server.rate_limit.clone(),
            started_at: Instant::now(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub identifier: Arc<Identifier>,
    pub guidance: Arc<GuidanceService>,
    pub llm: Arc<dyn LlmClient>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub info: Arc<ServiceInfo>,
}

impl AppState {
    pub fn new(
        config: &Config,
        llm: Arc<dyn LlmClient>,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Self {
        let composer = config
            .gemini
            .persona_prompt
            .clone()
            .map(PromptComposer::new)
            .unwrap_or_default();

        Self {
            identifier: Arc::new(Identifier::new(
                llm.clone(),
                composer,
                config.server.debug,
            )),
            guidance: Arc::new(GuidanceService::new(llm.clone())),
            llm,
            verifier,
            info: Arc::new(ServiceInfo::from_config(config)),
        }
    }
}

fn error_response(e: Error) -> ApiError {
    error_detail(e.status_code(), e.to_string())
}

fn error_detail(status: StatusCode, detail: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
}

fn multipart_error(e: MultipartError) -> ApiError {
    error_detail(e.status(), format!("Invalid multipart body: {}", e.body_text()))
}

fn multipart_rejection(e: MultipartRejection) -> ApiError {
    error_detail(e.status(), e.body_text())
}

fn form_rejection(e: FormRejection) -> ApiError {
    error_detail(e.status(), e.body_text())
}

pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        service: SERVICE_NAME,
        version: API_VERSION,
        status: "online",
        environment: state.info.environment.clone(),
        debug: state.info.debug,
        features: FEATURES.to_vec(),
        endpoints: EndpointMap {
            health: ROUTE_HEALTH,
            identify: ROUTE_IDENTIFY,
            guidance: ROUTE_GUIDANCE,
            metrics: state.info.debug.then_some(ROUTE_METRICS),
        },
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let gemini_api = state.llm.probe().await;
    debug!("Health probe: gemini_api={:?}", gemini_api);

    Json(HealthResponse {
        service: "healthy",
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: API_VERSION,
        environment: state.info.environment.clone(),
        gemini_api,
        identity_provider: state.verifier.status(),
    })
}

pub async fn identify(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<IdentificationResult>, ApiError> {
    let mut multipart = multipart.map_err(multipart_rejection)?;
    let user_id = resolve_user(state.verifier.as_ref(), &headers).await;
    let mut request = IdentificationRequest::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("images") => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                request
                    .images
                    .push(ImageUpload::new(bytes, content_type.as_deref()));
            }
            Some("description") => {
                request.description = field.text().await.map_err(multipart_error)?;
            }
            Some("session_id") => {
                request.session_id = Some(field.text().await.map_err(multipart_error)?);
            }
            Some("astrological_context") => {
                request.astrological_context = Some(field.text().await.map_err(multipart_error)?);
            }
            Some("user_preferences") => {
                request.user_preferences = Some(field.text().await.map_err(multipart_error)?);
            }
            other => debug!("Ignoring unknown multipart field: {:?}", other),
        }
    }

    match state.identifier.identify(request, user_id.as_deref()).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            if e.is_upstream() {
                error!("Identification failed upstream: {}", e);
            } else {
                info!("Identification rejected: {}", e);
            }
            Err(error_response(e))
        }
    }
}

/// Accepts the three guidance fields either urlencoded or as multipart parts.
pub async fn guidance(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<GuidanceResponse>, ApiError> {
    let user_id = resolve_user(state.verifier.as_ref(), request.headers()).await;
    let form = read_guidance_form(request, &state).await?;

    state
        .guidance
        .guidance(
            &form.guidance_type,
            &form.user_profile,
            &form.custom_prompt,
            user_id.as_deref(),
        )
        .await
        .map(Json)
        .map_err(error_response)
}

async fn read_guidance_form(request: Request, state: &AppState) -> Result<GuidanceForm, ApiError> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));

    if !is_multipart {
        let Form(form) = Form::<GuidanceForm>::from_request(request, state)
            .await
            .map_err(form_rejection)?;
        return Ok(form);
    }

    let mut multipart = Multipart::from_request(request, state)
        .await
        .map_err(multipart_rejection)?;
    let (mut guidance_type, mut user_profile, mut custom_prompt) = (None, None, None);

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let slot = match field.name() {
            Some("guidance_type") => &mut guidance_type,
            Some("user_profile") => &mut user_profile,
            Some("custom_prompt") => &mut custom_prompt,
            other => {
                debug!("Ignoring unknown multipart field: {:?}", other);
                continue;
            }
        };
        *slot = Some(field.text().await.map_err(multipart_error)?);
    }

    let missing = |name: &str| {
        error_detail(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("Missing form field: {}", name),
        )
    };

    Ok(GuidanceForm {
        guidance_type: guidance_type.ok_or_else(|| missing("guidance_type"))?,
        user_profile: user_profile.ok_or_else(|| missing("user_profile"))?,
        custom_prompt: custom_prompt.ok_or_else(|| missing("custom_prompt"))?,
    })
}

pub async fn metrics(State(state): State<AppState>) -> Result<Json<MetricsResponse>, ApiError> {
    if !state.info.debug {
        return Err(error_detail(
            StatusCode::NOT_FOUND,
            "Metrics not available in production mode",
        ));
    }

    Ok(Json(MetricsResponse {
        service: SERVICE_NAME,
        version: API_VERSION,
        environment: state.info.environment.clone(),
        uptime_seconds: state.info.started_at.elapsed().as_secs(),
        features: MetricsFeatures {
            identity_provider: state.verifier.status() != IdentityStatus::NotConfigured,
            debug_mode: state.info.debug,
            rate_limiting: format!(
                "{}/{}s",
                state.info.rate_limit.requests, state.info.rate_limit.window_secs
            ),
        },
        endpoints: RouteListing {
            total: ROUTES.len(),
            available: ROUTES.to_vec(),
        },
    }))
}
