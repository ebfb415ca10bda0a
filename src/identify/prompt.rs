use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt::Write as _;
use tracing::warn;

pub const DEFAULT_USER_PROMPT: &str =
    "Please identify this crystal and provide comprehensive spiritual guidance.";

pub const PERSONA_PROMPT: &str = r#"You are the Crystal Grimoire Spiritual Advisor - an ancient and wise mystical guide who combines profound spiritual wisdom with expert geological knowledge.

PERSONALITY & VOICE:
- Speak like a loving, wise grandmother who studied both spirituality and geology
- Use mystical, poetic language filled with warmth and wonder
- Always empathetic, encouraging, and uplifting
- Include metaphors about light, energy, vibrations, and cosmic connections
- Begin responses with mystical greetings like "Ah, beloved seeker..." or "Blessed soul..."

IDENTIFICATION EXPERTISE:
- Use geological knowledge for accurate crystal identification
- Consider: Crystal systems, cleavage, fracture, luster, hardness, color causes
- Look for: Growth patterns, inclusions, twinning, phantoms, formation indicators
- Account for: Common look-alikes and identification pitfalls
- Express confidence levels mystically but accurately

RESPONSE STRUCTURE (CRITICAL FOR PARSING):
1. **Mystical Greeting** (1-2 sentences)
2. **Crystal Identification** with confidence level woven naturally
3. **Physical Description** (poetic but accurate)
4. **Metaphysical Properties** (5-7 detailed points)
5. **Chakra Connections** (specific chakras and their purposes)
6. **Healing Applications** (3-5 specific uses)
7. **Astrological Connections** (elements, zodiac signs, planetary influences)
8. **Meditation & Ritual Practices** (specific techniques)
9. **Care Instructions** (cleansing and charging methods)
10. **Personal Spiritual Message** (guidance for the seeker)
11. **Mystical Blessing** (closing prophecy or affirmation)

CONFIDENCE LEVELS:
- "The spirits clearly reveal this to be..." (HIGH: 85%+)
- "The energies strongly suggest this is..." (MEDIUM-HIGH: 70-85%)
- "I sense this beautiful stone is..." (MEDIUM: 55-70%)
- "The crystal's message suggests it might be..." (LOW: 40-55%)
- "The stone guards its identity, but..." (UNCERTAIN: <40%)

ESSENTIAL GUIDELINES:
✨ Balance spirituality with scientific accuracy
✨ Never use technical jargon - translate to mystical language
✨ Include specific chakras, elements, and practices
✨ Make each response feel like a sacred reading
✨ Focus 70% metaphysical, 30% physical properties
✨ Include synchronicities and sign interpretations
✨ Provide actionable spiritual guidance

Remember: You are bridging the mineral kingdom with human consciousness, helping souls connect with their crystalline teachers through both ancient wisdom and modern understanding."#;

#[derive(Debug, Default, Deserialize)]
pub struct AstrologicalProfile {
    #[serde(default)]
    pub sun_sign: Option<SignPlacement>,
    #[serde(default)]
    pub moon_sign: Option<SignPlacement>,
    #[serde(default)]
    pub ascendant: Option<SignPlacement>,
    #[serde(default)]
    pub dominant_elements: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SignPlacement {
    #[serde(default)]
    pub sign: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub experience_level: Option<Value>,
    #[serde(default)]
    pub spiritual_goals: Option<Value>,
}

/// Builds the text part of an identification request.
#[derive(Debug, Clone)]
pub struct PromptComposer {
    persona: String,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(PERSONA_PROMPT)
    }
}

impl PromptComposer {
    pub fn new(persona: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
        }
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// Persona, then the seeker's text, then whichever context blobs parse.
    pub fn compose(
        &self,
        description: &str,
        astrological_context: Option<&str>,
        user_preferences: Option<&str>,
    ) -> String {
        let mut user_prompt = if description.is_empty() {
            DEFAULT_USER_PROMPT.to_string()
        } else {
            description.to_string()
        };

        if let Some(raw) = astrological_context.filter(|raw| !raw.is_empty()) {
            match serde_json::from_str::<AstrologicalProfile>(raw) {
                Ok(profile) => user_prompt.push_str(&astrology_section(&profile)),
                Err(e) => warn!("Failed to parse astrological context: {}", e),
            }
        }

        if let Some(raw) = user_preferences.filter(|raw| !raw.is_empty()) {
            match serde_json::from_str::<UserPreferences>(raw) {
                Ok(prefs) => user_prompt.push_str(&preferences_section(&prefs)),
                Err(e) => warn!("Failed to parse user preferences: {}", e),
            }
        }

        format!("{}\n\n{}", self.persona, user_prompt)
    }
}

fn sign_or_unknown(placement: &Option<SignPlacement>) -> &str {
    placement
        .as_ref()
        .and_then(|p| p.sign.as_deref())
        .unwrap_or("Unknown")
}

fn astrology_section(profile: &AstrologicalProfile) -> String {
    let mut out = String::from("\n\n🌟 SEEKER'S ASTROLOGICAL PROFILE:\n");
    let _ = writeln!(out, "☀️ Sun: {}", sign_or_unknown(&profile.sun_sign));
    let _ = writeln!(out, "🌙 Moon: {}", sign_or_unknown(&profile.moon_sign));
    let _ = writeln!(out, "⬆️ Rising: {}", sign_or_unknown(&profile.ascendant));

    if !profile.dominant_elements.is_empty() {
        let elements: Vec<String> = profile
            .dominant_elements
            .iter()
            .map(|(element, weight)| format!("{}: {}", element, display_value(weight)))
            .collect();
        let _ = writeln!(out, "🔥 Dominant elements: {}", elements.join(", "));
    }

    out.push_str("\nPlease weave their astrological energies into your crystal guidance, connecting their planetary influences with the stone's vibrations.");
    out
}

fn preferences_section(prefs: &UserPreferences) -> String {
    let mut out = String::from("\n\n💎 SEEKER'S PREFERENCES:\n");
    if !prefs.interests.is_empty() {
        let _ = writeln!(out, "Interests: {}", prefs.interests.join(", "));
    }
    if let Some(level) = prefs.experience_level.as_ref().filter(|v| is_present(v)) {
        let _ = writeln!(out, "Crystal experience: {}", display_value(level));
    }
    if let Some(goals) = prefs.spiritual_goals.as_ref().filter(|v| is_present(v)) {
        let _ = writeln!(out, "Spiritual goals: {}", display_value(goals));
    }
    out
}

/// Builds the prompt for a personalised guidance request.
pub fn compose_guidance_prompt(profile: &Value, guidance_type: &str, custom_prompt: &str) -> String {
    let profile_json =
        serde_json::to_string_pretty(profile).unwrap_or_else(|_| profile.to_string());

    format!(
        r#"You are the Crystal Grimoire Spiritual Advisor providing deeply personalized metaphysical guidance.

SEEKER'S SPIRITUAL PROFILE:
{profile_json}

GUIDANCE REQUEST TYPE: {guidance_type}
SPECIFIC QUESTION: {custom_prompt}

Provide warm, personalized spiritual guidance that:
1. References their specific crystals and spiritual journey
2. Incorporates their preferences and patterns
3. Offers practical, actionable advice
4. Maintains your mystical, loving tone
5. Is encouraging and empowering
6. Includes specific practices they can do today

Begin with "Ah, beloved seeker..." and provide 3-4 paragraphs of personalized guidance.
Include specific crystal recommendations from their collection if applicable.
End with a blessing or affirmation for their journey.
"#
    )
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Number(_) => true,
    }
}

/// Strings render bare, everything else as compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn user_part(prompt: &str) -> &str {
        prompt
            .split_once("\n\n")
            .map(|(_, rest)| rest)
            .unwrap_or_default()
    }

    #[test]
    fn test_empty_description_uses_default() {
        let composer = PromptComposer::new("PERSONA");
        let prompt = composer.compose("", None, None);
        assert_eq!(prompt, format!("PERSONA\n\n{}", DEFAULT_USER_PROMPT));
    }

    #[test]
    fn test_default_persona_is_advisor() {
        let composer = PromptComposer::default();
        assert!(composer.persona().starts_with("You are the Crystal Grimoire Spiritual Advisor"));
    }

    #[test]
    fn test_astrology_section() {
        let composer = PromptComposer::new("P");
        let astro = json!({
            "sun_sign": { "sign": "Leo" },
            "moon_sign": { "sign": "Cancer" },
            "dominant_elements": { "fire": 4, "water": "high" }
        })
        .to_string();

        let prompt = composer.compose("purple stone", Some(&astro), None);

        assert_eq!(
            user_part(&prompt),
            "purple stone\n\n🌟 SEEKER'S ASTROLOGICAL PROFILE:\n\
             ☀️ Sun: Leo\n🌙 Moon: Cancer\n⬆️ Rising: Unknown\n\
             🔥 Dominant elements: fire: 4, water: high\n\
             \nPlease weave their astrological energies into your crystal guidance, connecting their planetary influences with the stone's vibrations."
        );
    }

    #[test]
    fn test_preferences_section_skips_missing_fields() {
        let composer = PromptComposer::new("P");
        let prefs = json!({
            "interests": ["healing", "meditation"],
            "experience_level": "beginner"
        })
        .to_string();

        let prompt = composer.compose("stone", None, Some(&prefs));

        assert_eq!(
            user_part(&prompt),
            "stone\n\n💎 SEEKER'S PREFERENCES:\nInterests: healing, meditation\nCrystal experience: beginner\n"
        );
    }

    #[test]
    fn test_malformed_context_is_ignored() {
        let composer = PromptComposer::new("P");
        let prompt = composer.compose("stone", Some("{not json"), Some("[1, 2"));
        assert_eq!(prompt, "P\n\nstone");
    }

    #[test]
    fn test_guidance_prompt_embeds_profile() {
        let profile = json!({ "name": "Willow", "crystals": ["Amethyst"] });
        let prompt = compose_guidance_prompt(&profile, "daily", "What should I focus on?");
        assert!(prompt.contains("\"name\": \"Willow\""));
        assert!(prompt.contains("GUIDANCE REQUEST TYPE: daily"));
        assert!(prompt.contains("SPECIFIC QUESTION: What should I focus on?"));
    }
}
