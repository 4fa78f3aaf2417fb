//! Emotion heuristic tests

use velo_studio::emotion::{classify, Emotion, EmotionReading};

#[test]
fn test_excited_hits_are_capped() {
    let reading = classify("I love this, it's amazing and fantastic");
    assert_eq!(reading.emotion, Emotion::Excited);
    assert_eq!(reading.confidence, 90);
}

#[test]
fn test_no_hits_is_neutral() {
    assert_eq!(
        classify("the quarterly report is attached"),
        EmotionReading {
            emotion: Emotion::Neutral,
            confidence: 50
        }
    );
    assert_eq!(classify("").emotion, Emotion::Neutral);
}

#[test]
fn test_tie_prefers_excited() {
    let reading = classify("love to build");
    assert_eq!(reading.emotion, Emotion::Excited);
    assert_eq!(reading.confidence, 70);
}

#[test]
fn test_focused_beats_confident_on_tie() {
    let reading = classify("we can create it");
    assert_eq!(reading.emotion, Emotion::Focused);
}

#[test]
fn test_punctuation_blocks_match() {
    // "great!" is not the keyword "great"
    assert_eq!(classify("great!").emotion, Emotion::Neutral);
    assert_eq!(classify("GREAT").emotion, Emotion::Excited);
}

#[test]
fn test_glyphs() {
    assert_eq!(Emotion::Excited.emoji(), "🤩");
    assert_eq!(Emotion::Neutral.as_str(), "neutral");
}
