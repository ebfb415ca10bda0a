use super::catalog::*;
use serde::Serialize;

/// Fields recovered from the model's prose plus the fixed content that ships
/// alongside them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedGuidance {
    pub metaphysical: Vec<String>,
    pub healing: Vec<String>,
    pub chakras: Vec<String>,
    pub elements: Vec<String>,
    pub zodiac_signs: Vec<String>,
    pub color_description: String,
    pub hardness: String,
    pub formation: String,
    pub care_instructions: String,
    pub spiritual_message: String,
    pub daily_guidance: String,
    pub meditation_suggestions: Vec<String>,
    pub affirmations: Vec<String>,
    pub ritual_suggestions: Vec<String>,
    pub emotional_resonance: Vec<String>,
    pub spiritual_lessons: Vec<String>,
    pub synchronicities: Vec<String>,
}

/// Scans raw model text into a [`ParsedGuidance`]. Never fails; every derived
/// field except zodiac signs falls back to fixed content.
pub fn structure(text: &str) -> ParsedGuidance {
    let lines: Vec<&str> = text.split('\n').collect();
    let lower = text.to_lowercase();

    ParsedGuidance {
        metaphysical: or_default(extract_metaphysical(&lines), &DEFAULT_METAPHYSICAL),
        healing: Vec::new(),
        chakras: or_default(find_names(&lower, &CHAKRAS), &DEFAULT_CHAKRAS),
        elements: or_default(find_names(&lower, &ELEMENTS), &DEFAULT_ELEMENTS),
        zodiac_signs: find_names(&lower, &ZODIAC_SIGNS),
        color_description: COLOR_DESCRIPTION.to_string(),
        hardness: HARDNESS.to_string(),
        formation: FORMATION.to_string(),
        care_instructions: CARE_INSTRUCTIONS.to_string(),
        spiritual_message: extract_spiritual_message(&lines)
            .unwrap_or_else(|| DEFAULT_SPIRITUAL_MESSAGE.to_string()),
        daily_guidance: String::new(),
        meditation_suggestions: to_owned_list(&MEDITATION_SUGGESTIONS),
        affirmations: to_owned_list(&AFFIRMATIONS),
        ritual_suggestions: to_owned_list(&RITUAL_SUGGESTIONS),
        emotional_resonance: Vec::new(),
        spiritual_lessons: Vec::new(),
        synchronicities: Vec::new(),
    }
}

fn or_default(found: Vec<String>, fallback: &[&str]) -> Vec<String> {
    if found.is_empty() {
        to_owned_list(fallback)
    } else {
        found
    }
}

fn extract_metaphysical(lines: &[&str]) -> Vec<String> {
    let mut items = Vec::new();
    let mut in_section = false;

    for line in lines {
        let line = line.trim();
        let lower = line.to_lowercase();
        if METAPHYSICAL_MARKERS
            .iter()
            .any(|marker| lower.contains(marker))
        {
            in_section = true;
            continue;
        }

        if !in_section || !is_list_item(line) {
            continue;
        }

        let item = line
            .trim_start_matches(|c: char| BULLET_MARKERS.contains(&c) || c.is_ascii_digit() || c == '.' || c == ' ')
            .trim();
        if item.chars().count() > MIN_METAPHYSICAL_CHARS {
            items.push(item.chars().take(MAX_METAPHYSICAL_CHARS).collect());
        }
        if items.len() >= MAX_METAPHYSICAL_ITEMS {
            break;
        }
    }

    items
}

fn is_list_item(line: &str) -> bool {
    line.chars()
        .next()
        .is_some_and(|c| BULLET_MARKERS.contains(&c) || c.is_ascii_digit())
}

/// Every listed name present anywhere in the text, in list order.
fn find_names(lower_text: &str, names: &[&str]) -> Vec<String> {
    names
        .iter()
        .filter(|name| lower_text.contains(*name))
        .map(|name| title_case(name))
        .collect()
}

fn extract_spiritual_message(lines: &[&str]) -> Option<String> {
    for (index, line) in lines.iter().enumerate() {
        let lower = line.to_lowercase();
        if !MESSAGE_MARKERS.iter().any(|marker| lower.contains(marker)) {
            continue;
        }

        let message: Vec<&str> = lines[index..]
            .iter()
            .take(MESSAGE_WINDOW_LINES)
            .map(|line| line.trim())
            .filter(|line| line.chars().count() > MESSAGE_MIN_CHARS)
            .take(MESSAGE_MAX_LINES)
            .collect();

        if !message.is_empty() {
            return Some(message.join(" "));
        }
    }
    None
}
