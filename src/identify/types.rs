use super::ingest::ImageUpload;
use serde::Serialize;

/// Everything the identify endpoint accepted from the client.
#[derive(Debug, Clone, Default)]
pub struct IdentificationRequest {
    pub images: Vec<ImageUpload>,
    pub description: String,
    pub session_id: Option<String>,
    pub astrological_context: Option<String>,
    pub user_preferences: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    VeryHigh,
    High,
    Medium,
    Low,
    Uncertain,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.85 {
            Self::VeryHigh
        } else if score >= 0.7 {
            Self::High
        } else if score >= 0.55 {
            Self::Medium
        } else if score >= 0.4 {
            Self::Low
        } else {
            Self::Uncertain
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseMetrics {
    pub processing_time_seconds: f64,
    pub image_count: usize,
    pub total_image_size_bytes: usize,
    pub response_length_chars: usize,
    pub confidence_score: f64,
    pub api_calls: u32,
    pub tokens_used: f64,
}

impl ResponseMetrics {
    /// Rough token estimate: 1.3 tokens per whitespace-separated word.
    pub fn estimate_tokens(text: &str) -> f64 {
        text.split_whitespace().count() as f64 * 1.3
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentificationResult {
    pub session_id: String,
    pub identification_id: String,
    pub timestamp: String,
    pub version: String,
    pub crystal: CrystalReport,
    pub full_response: String,
    pub confidence_level: ConfidenceLevel,
    pub needs_more_info: bool,
    pub suggested_angles: Vec<String>,
    pub spiritual_message: String,
    pub daily_guidance: String,
    pub meditation_suggestions: Vec<String>,
    pub affirmations: Vec<String>,
    pub ritual_suggestions: Vec<String>,
    pub journal_data: JournalData,
    pub metrics: Option<ResponseMetrics>,
    pub user_context: UserContext,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrystalReport {
    pub id: String,
    pub name: String,
    pub scientific_name: String,
    pub confidence: f64,
    pub description: String,
    pub metaphysical_properties: Vec<String>,
    pub healing_properties: Vec<String>,
    pub chakras: Vec<String>,
    pub elements: Vec<String>,
    pub zodiac_signs: Vec<String>,
    pub color_description: String,
    pub hardness: String,
    pub formation: String,
    pub care_instructions: String,
    pub identification_date: String,
    pub image_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalData {
    pub elements: Vec<String>,
    pub zodiac_signs: Vec<String>,
    pub emotional_resonance: Vec<String>,
    pub spiritual_lessons: Vec<String>,
    pub synchronicities: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub has_astrology: bool,
    pub has_preferences: bool,
    pub is_authenticated: bool,
}
