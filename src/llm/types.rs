use base64::{Engine as _, engine::general_purpose};
use axum::body::Bytes;
use serde::{Deserialize, Serialize};

pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Harm categories the provider filters on. All are set to `BLOCK_NONE`.
pub const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// An image ready to be sent upstream.
#[derive(Debug, Clone)]
pub struct ImagePart {
    pub bytes: Bytes,
    pub mime_type: String,
}

impl ImagePart {
    pub fn new(bytes: Bytes, mime_type: Option<&str>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.unwrap_or(DEFAULT_IMAGE_MIME).to_string(),
        }
    }
}

/// Sampling parameters for one generation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl GenerationOptions {
    pub const IDENTIFY: Self = Self {
        temperature: 0.75,
        top_k: 40,
        top_p: 0.95,
        max_output_tokens: 3000,
    };

    pub const GUIDANCE: Self = Self {
        temperature: 0.8,
        top_k: 40,
        top_p: 0.95,
        max_output_tokens: 2000,
    };
}

/// What callers hand to an [`super::LlmClient`]: one text prompt plus images.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub images: Vec<ImagePart>,
    pub options: GenerationOptions,
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>, options: GenerationOptions) -> Self {
        Self {
            prompt: prompt.into(),
            images: Vec::new(),
            options,
        }
    }

    pub fn to_wire(&self) -> GenerateContentRequest {
        let mut parts = Vec::with_capacity(self.images.len() + 1);
        parts.push(Part::Text {
            text: self.prompt.clone(),
        });
        parts.extend(self.images.iter().map(|image| Part::InlineData {
            inline_data: InlineData {
                mime_type: image.mime_type.clone(),
                data: general_purpose::STANDARD.encode(&image.bytes),
            },
        }));

        GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                temperature: self.options.temperature,
                top_k: self.options.top_k,
                top_p: self.options.top_p,
                max_output_tokens: self.options.max_output_tokens,
                stop_sequences: Vec::new(),
            },
            safety_settings: HARM_CATEGORIES
                .iter()
                .map(|category| SafetySetting {
                    category: category.to_string(),
                    threshold: "BLOCK_NONE".to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
    pub safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    pub stop_sequences: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SafetySetting {
    pub category: String,
    pub threshold: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate.
    pub fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// Result of the connectivity probe reported by `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    Connected,
    Degraded,
    Unavailable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_wire_request_puts_text_before_images() {
        let request = GenerationRequest {
            prompt: "identify".to_string(),
            images: vec![
                ImagePart::new(Bytes::from_static(b"abc"), Some("image/png")),
                ImagePart::new(Bytes::from_static(b"xyz"), None),
            ],
            options: GenerationOptions::IDENTIFY,
        };

        let value = serde_json::to_value(request.to_wire()).unwrap();
        let parts = &value["contents"][0]["parts"];

        assert_eq!(parts[0], json!({ "text": "identify" }));
        assert_eq!(
            parts[1],
            json!({ "inlineData": { "mimeType": "image/png", "data": "YWJj" } })
        );
        assert_eq!(parts[2]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 3000);
        assert_eq!(value["generationConfig"]["topK"], 40);
        assert_eq!(value["generationConfig"]["stopSequences"], json!([]));
    }

    #[test]
    fn test_safety_settings_block_nothing() {
        let wire = GenerationRequest::text("hi", GenerationOptions::GUIDANCE).to_wire();
        assert_eq!(wire.safety_settings.len(), 4);
        assert!(wire.safety_settings.iter().all(|s| s.threshold == "BLOCK_NONE"));
    }

    #[test]
    fn test_first_text_extraction() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Ah, beloved seeker" }] } }]
        }))
        .unwrap();
        assert_eq!(response.first_text().as_deref(), Some("Ah, beloved seeker"));

        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.first_text(), None);
    }
}
