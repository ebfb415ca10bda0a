use super::catalog::{
    CONFIDENCE_RULES, CRYSTAL_CATALOG, ConfidenceRule, DEFAULT_MATCH_CONFIDENCE, UNKNOWN_CONFIDENCE,
    UNKNOWN_CRYSTAL,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub crystal_name: String,
    pub confidence: f64,
}

/// Picks a crystal name and a heuristic confidence out of free text.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    catalog: &'a [&'a str],
    rules: &'a [ConfidenceRule],
}

impl Default for Classifier<'static> {
    fn default() -> Self {
        Self::new(&CRYSTAL_CATALOG, &CONFIDENCE_RULES)
    }
}

impl<'a> Classifier<'a> {
    pub fn new(catalog: &'a [&'a str], rules: &'a [ConfidenceRule]) -> Self {
        Self { catalog, rules }
    }

    /// The first catalog entry found anywhere in the text wins, regardless of
    /// where in the text it appears.
    pub fn classify(&self, text: &str) -> Classification {
        let lower = text.to_lowercase();

        let Some(name) = self
            .catalog
            .iter()
            .find(|name| lower.contains(&name.to_lowercase()))
        else {
            return Classification {
                crystal_name: UNKNOWN_CRYSTAL.to_string(),
                confidence: UNKNOWN_CONFIDENCE,
            };
        };

        Classification {
            crystal_name: name.to_string(),
            confidence: self.confidence(&lower),
        }
    }

    fn confidence(&self, lower: &str) -> f64 {
        self.rules
            .iter()
            .find(|rule| rule.phrases.iter().any(|phrase| lower.contains(phrase)))
            .map(|rule| rule.score)
            .unwrap_or(DEFAULT_MATCH_CONFIDENCE)
    }
}
