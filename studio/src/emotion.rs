//! Keyword-based tone detection for transcribed speech

use serde::{Deserialize, Serialize};

/// Detected tone of an utterance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    #[default]
    Neutral,
    Excited,
    Focused,
    Confident,
}

impl Emotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Excited => "excited",
            Emotion::Focused => "focused",
            Emotion::Confident => "confident",
        }
    }

    /// Display glyph
    pub fn emoji(&self) -> &'static str {
        match self {
            Emotion::Neutral => "😐",
            Emotion::Excited => "🤩",
            Emotion::Focused => "🎯",
            Emotion::Confident => "😎",
        }
    }
}

/// Classifier output; confidence is a percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionReading {
    pub emotion: Emotion,
    pub confidence: u8,
}

impl Default for EmotionReading {
    fn default() -> Self {
        Self {
            emotion: Emotion::Neutral,
            confidence: NEUTRAL_CONFIDENCE,
        }
    }
}

const NEUTRAL_CONFIDENCE: u8 = 50;

/// Confidence added per keyword hit
const POINTS_PER_HIT: u32 = 10;

struct Category {
    emotion: Emotion,
    keywords: &'static [&'static str],
    base: u32,
    cap: u32,
}

/// Categories in tie-break order
static CATEGORIES: [Category; 3] = [
    Category {
        emotion: Emotion::Excited,
        keywords: &["awesome", "amazing", "excited", "love", "fantastic", "great"],
        base: 60,
        cap: 90,
    },
    Category {
        emotion: Emotion::Focused,
        keywords: &["need", "want", "create", "build", "implement", "develop"],
        base: 55,
        cap: 85,
    },
    Category {
        emotion: Emotion::Confident,
        keywords: &["will", "can", "should", "must", "definitely", "absolutely"],
        base: 65,
        cap: 95,
    },
];

/// Classify the tone of `text`.
///
/// Tokens are whitespace-separated and compared whole after lower-casing, so
/// punctuation attached to a word prevents a match.
pub fn classify(text: &str) -> EmotionReading {
    let tokens: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();

    let counts: Vec<u32> = CATEGORIES
        .iter()
        .map(|category| {
            tokens
                .iter()
                .filter(|token| category.keywords.contains(&token.as_str()))
                .count() as u32
        })
        .collect();

    let max = counts.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return EmotionReading::default();
    }

    let Some((category, count)) = CATEGORIES
        .iter()
        .zip(counts)
        .find(|(_, count)| *count == max)
    else {
        return EmotionReading::default();
    };

    EmotionReading {
        emotion: category.emotion,
        confidence: category.cap.min(category.base + count * POINTS_PER_HIT) as u8,
    }
}
