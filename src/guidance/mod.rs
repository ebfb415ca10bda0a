use crate::{
    API_VERSION, Error, Result,
    identify::compose_guidance_prompt,
    llm::{GenerationOptions, GenerationRequest, LlmClient},
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

pub const DEFAULT_GUIDANCE_TYPE: &str = "daily";

/// Canned answers served when the live call fails, keyed by guidance type.
pub const FALLBACK_GUIDANCE: [(&str, &str); 7] = [
    (
        "daily",
        "Beloved seeker, today the universe invites you to connect deeply with your crystal allies. Take time to hold your favorite stone and set clear, loving intentions for the day ahead. Trust the wisdom that flows through you.",
    ),
    (
        "crystal_selection",
        "Look within your collection with fresh eyes and an open heart today. Notice which crystal calls to you most strongly - that sacred stone carries a special message waiting to unfold in your spiritual journey.",
    ),
    (
        "chakra_balancing",
        "Begin with grounding at your root chakra, then gently work your way up through each energy center with intention and presence. Allow your crystals to guide this beautiful dance of alignment and healing.",
    ),
    (
        "lunar_guidance",
        "The moon's cycles offer powerful energy for cleansing and charging your crystals. Tonight, honor this divine connection under the night sky and feel the ancient wisdom flowing through your sacred stones.",
    ),
    (
        "manifestation",
        "Your crystals are powerful allies for manifestation work. Choose stones that resonate with your heart's desires and create a sacred space for focused intention, knowing the universe supports your highest good.",
    ),
    (
        "healing_session",
        "Trust your intuition as you select healing crystals from your collection. Place them with loving intention and allow their pure energy to flow, bringing harmony and restoration to body, mind, and spirit.",
    ),
    (
        "spiritual_reading",
        "Your spiritual journey is unfolding perfectly, dear one. Each crystal in your collection represents wisdom gained and lessons learned. You are exactly where you need to be on this sacred path.",
    ),
];

/// Fallback text for a guidance type, using `daily` for unknown types.
pub fn fallback_guidance(guidance_type: &str) -> &'static str {
    FALLBACK_GUIDANCE
        .iter()
        .find(|(key, _)| *key == guidance_type)
        .or_else(|| {
            FALLBACK_GUIDANCE
                .iter()
                .find(|(key, _)| *key == DEFAULT_GUIDANCE_TYPE)
        })
        .map(|(_, text)| *text)
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GuidanceSource {
    #[serde(rename = "gemini_ai_enhanced")]
    Ai,
    #[serde(rename = "fallback_enhanced")]
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalizationLevel {
    High,
    Basic,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidanceResponse {
    pub guidance: String,
    pub guidance_type: String,
    pub user_id: String,
    pub timestamp: String,
    pub source: GuidanceSource,
    pub personalization_level: PersonalizationLevel,
    pub version: String,
}

pub struct GuidanceService {
    llm: Arc<dyn LlmClient>,
}

impl GuidanceService {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Only a malformed profile is an error; upstream failures degrade to the
    /// fallback text for `guidance_type`.
    pub async fn guidance(
        &self,
        guidance_type: &str,
        user_profile: &str,
        custom_prompt: &str,
        user_id: Option<&str>,
    ) -> Result<GuidanceResponse> {
        info!(
            "Spiritual guidance request: type={}, user={}",
            guidance_type,
            user_id.unwrap_or("anonymous")
        );

        let profile: Value = serde_json::from_str(user_profile)
            .map_err(|_| Error::validation("Invalid user profile format"))?;

        let prompt = compose_guidance_prompt(&profile, guidance_type, custom_prompt);
        let (guidance, source, personalization_level) = match self
            .llm
            .generate(GenerationRequest::text(prompt, GenerationOptions::GUIDANCE))
            .await
        {
            Ok(text) => (text, GuidanceSource::Ai, PersonalizationLevel::High),
            Err(e) => {
                error!("Spiritual guidance error: {}", e);
                (
                    fallback_guidance(guidance_type).to_string(),
                    GuidanceSource::Fallback,
                    PersonalizationLevel::Basic,
                )
            }
        };

        Ok(GuidanceResponse {
            guidance,
            guidance_type: guidance_type.to_string(),
            user_id: user_id.unwrap_or("anonymous").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            source,
            personalization_level,
            version: API_VERSION.to_string(),
        })
    }
}
