pub mod catalog;
mod classifier;
mod ingest;
mod prompt;
mod structurer;
mod types;

pub use classifier::{Classification, Classifier};
pub use ingest::{ImageUpload, MAX_IMAGES, MAX_TOTAL_IMAGE_BYTES, ValidatedImages, validate_images};
pub use prompt::{
    AstrologicalProfile, DEFAULT_USER_PROMPT, PERSONA_PROMPT, PromptComposer, UserPreferences,
    compose_guidance_prompt,
};
pub use structurer::{ParsedGuidance, structure};
pub use types::*;

use crate::{
    API_VERSION, Result,
    llm::{GenerationOptions, GenerationRequest, LlmClient},
};
use std::{sync::Arc, time::Instant};
use tracing::{error, info};
use uuid::Uuid;

const DESCRIPTION_PREVIEW_CHARS: usize = 300;

/// Runs one identification end to end: validate, prompt, call, classify, structure.
pub struct Identifier {
    llm: Arc<dyn LlmClient>,
    composer: PromptComposer,
    classifier: Classifier<'static>,
    include_metrics: bool,
}

impl Identifier {
    pub fn new(llm: Arc<dyn LlmClient>, composer: PromptComposer, include_metrics: bool) -> Self {
        Self {
            llm,
            composer,
            classifier: Classifier::default(),
            include_metrics,
        }
    }

    pub async fn identify(
        &self,
        request: IdentificationRequest,
        user_id: Option<&str>,
    ) -> Result<IdentificationResult> {
        let started = Instant::now();

        // Rejections happen here, before anything goes upstream.
        let images = validate_images(&request.images)?;

        let session_id = request
            .session_id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let identification_id = Uuid::new_v4().to_string();

        info!(
            "Crystal identification request: session={}, user={}, images={}",
            session_id,
            user_id.unwrap_or("anonymous"),
            images.parts.len()
        );

        let prompt = self.composer.compose(
            &request.description,
            request.astrological_context.as_deref(),
            request.user_preferences.as_deref(),
        );
        let image_count = images.parts.len();

        let full_response = self
            .llm
            .generate(GenerationRequest {
                prompt,
                images: images.parts,
                options: GenerationOptions::IDENTIFY,
            })
            .await
            .inspect_err(|e| error!("Crystal identification failed: {}", e))?;

        let classification = self.classifier.classify(&full_response);
        let parsed = structure(&full_response);
        let confidence = classification.confidence;

        let metrics = ResponseMetrics {
            processing_time_seconds: started.elapsed().as_secs_f64(),
            image_count,
            total_image_size_bytes: images.total_bytes,
            response_length_chars: full_response.chars().count(),
            confidence_score: confidence,
            api_calls: 1,
            tokens_used: ResponseMetrics::estimate_tokens(&full_response),
        };

        info!(
            "Identification completed: {} (confidence: {:.2}, {:.2}s)",
            classification.crystal_name, confidence, metrics.processing_time_seconds
        );

        let now = chrono::Utc::now().to_rfc3339();

        Ok(IdentificationResult {
            session_id,
            identification_id: identification_id.clone(),
            timestamp: now.clone(),
            version: API_VERSION.to_string(),
            crystal: CrystalReport {
                id: identification_id,
                scientific_name: format!("{} Variety", classification.crystal_name),
                name: classification.crystal_name,
                confidence,
                description: preview(&full_response),
                metaphysical_properties: parsed.metaphysical,
                healing_properties: parsed.healing,
                chakras: parsed.chakras,
                elements: parsed.elements.clone(),
                zodiac_signs: parsed.zodiac_signs.clone(),
                color_description: parsed.color_description,
                hardness: parsed.hardness,
                formation: parsed.formation,
                care_instructions: parsed.care_instructions,
                identification_date: now,
                image_count,
            },
            full_response,
            confidence_level: ConfidenceLevel::from_score(confidence),
            needs_more_info: confidence < 0.6,
            suggested_angles: if confidence > 0.7 {
                Vec::new()
            } else {
                catalog::to_owned_list(&catalog::SUGGESTED_ANGLES)
            },
            spiritual_message: parsed.spiritual_message,
            daily_guidance: parsed.daily_guidance,
            meditation_suggestions: parsed.meditation_suggestions,
            affirmations: parsed.affirmations,
            ritual_suggestions: parsed.ritual_suggestions,
            journal_data: JournalData {
                elements: parsed.elements,
                zodiac_signs: parsed.zodiac_signs,
                emotional_resonance: parsed.emotional_resonance,
                spiritual_lessons: parsed.spiritual_lessons,
                synchronicities: parsed.synchronicities,
            },
            metrics: self.include_metrics.then_some(metrics),
            user_context: UserContext {
                has_astrology: request.astrological_context.is_some(),
                has_preferences: request.user_preferences.is_some(),
                is_authenticated: user_id.is_some(),
            },
        })
    }
}

/// First 300 characters followed by an ellipsis when the text is longer.
fn preview(text: &str) -> String {
    if text.chars().count() > DESCRIPTION_PREVIEW_CHARS {
        let head: String = text.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
