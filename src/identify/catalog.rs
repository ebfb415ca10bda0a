//! Fixed rule data used by the classifier and structurer.
//!
//! Order matters in every list here: the first crystal in [`CRYSTAL_CATALOG`]
//! that appears in a response wins, and chakras, elements and zodiac signs are
//! reported in list order.

pub const UNKNOWN_CRYSTAL: &str = "Unknown Crystal";
pub const UNKNOWN_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_MATCH_CONFIDENCE: f64 = 0.7;

pub const CRYSTAL_CATALOG: [&str; 30] = [
    "Amethyst",
    "Clear Quartz",
    "Rose Quartz",
    "Citrine",
    "Black Tourmaline",
    "Selenite",
    "Labradorite",
    "Fluorite",
    "Pyrite",
    "Malachite",
    "Lapis Lazuli",
    "Amazonite",
    "Carnelian",
    "Obsidian",
    "Jade",
    "Moonstone",
    "Turquoise",
    "Garnet",
    "Aquamarine",
    "Sodalite",
    "Hematite",
    "Tiger's Eye",
    "Aventurine",
    "Prehnite",
    "Moldavite",
    "Peridot",
    "Rhodonite",
    "Sunstone",
    "Lepidolite",
    "Iolite",
];

/// A set of phrases that, when any is present, fixes the confidence score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceRule {
    pub phrases: &'static [&'static str],
    pub score: f64,
}

/// Checked top to bottom; the first rule with a matching phrase applies.
pub const CONFIDENCE_RULES: [ConfidenceRule; 3] = [
    ConfidenceRule {
        phrases: &["spirits clearly reveal", "clearly this"],
        score: 0.9,
    },
    ConfidenceRule {
        phrases: &["strongly suggest", "energies indicate"],
        score: 0.75,
    },
    ConfidenceRule {
        phrases: &["sense this", "appears to be"],
        score: 0.6,
    },
];

pub const CHAKRAS: [&str; 7] = [
    "root",
    "sacral",
    "solar plexus",
    "heart",
    "throat",
    "third eye",
    "crown",
];

pub const ELEMENTS: [&str; 4] = ["fire", "earth", "air", "water"];

pub const ZODIAC_SIGNS: [&str; 12] = [
    "aries",
    "taurus",
    "gemini",
    "cancer",
    "leo",
    "virgo",
    "libra",
    "scorpio",
    "sagittarius",
    "capricorn",
    "aquarius",
    "pisces",
];

pub const METAPHYSICAL_MARKERS: [&str; 3] = ["metaphysical", "properties", "spiritual qualities"];
pub const BULLET_MARKERS: [char; 3] = ['•', '-', '*'];
pub const MAX_METAPHYSICAL_ITEMS: usize = 6;
pub const MIN_METAPHYSICAL_CHARS: usize = 10;
pub const MAX_METAPHYSICAL_CHARS: usize = 100;

pub const MESSAGE_MARKERS: [&str; 4] = ["message", "guidance", "blessing", "prophecy"];
pub const MESSAGE_WINDOW_LINES: usize = 5;
pub const MESSAGE_MAX_LINES: usize = 2;
pub const MESSAGE_MIN_CHARS: usize = 20;

pub const DEFAULT_METAPHYSICAL: [&str; 5] = [
    "Amplifies spiritual energy and intuition",
    "Promotes emotional healing and balance",
    "Enhances meditation and spiritual connection",
    "Provides protection and grounding",
    "Attracts positive energy and abundance",
];
pub const DEFAULT_CHAKRAS: [&str; 2] = ["Crown", "Heart"];
pub const DEFAULT_ELEMENTS: [&str; 1] = ["Earth"];
pub const DEFAULT_SPIRITUAL_MESSAGE: &str =
    "This crystal brings divine light and healing energy into your spiritual journey.";

pub const COLOR_DESCRIPTION: &str = "Natural crystal coloration";
pub const HARDNESS: &str = "Variable (Mohs scale)";
pub const FORMATION: &str = "Natural formation";
pub const CARE_INSTRUCTIONS: &str = "Cleanse with moonlight, charge in sunlight";

// Static content. These are returned verbatim for every identification and are
// not derived from the model output.

pub const MEDITATION_SUGGESTIONS: [&str; 3] = [
    "Hold during morning meditation for clarity",
    "Place on altar during full moon ceremonies",
    "Carry for daily energy protection and grounding",
];

pub const AFFIRMATIONS: [&str; 3] = [
    "I am open to the healing energy of this sacred stone",
    "My spiritual path is illuminated with divine light",
    "I trust my intuition and inner wisdom",
];

pub const RITUAL_SUGGESTIONS: [&str; 3] = [
    "New moon intention setting ritual",
    "Chakra balancing meditation session",
    "Energy cleansing and protection ceremony",
];

pub const SUGGESTED_ANGLES: [&str; 3] = [
    "Close-up of crystal termination",
    "Side view showing full form",
    "Detail of any inclusions",
];

pub fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

/// Upper-cases the first letter of every word, lower-cases the rest.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;
    for c in value.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
