//! Speech input session

use async_trait::async_trait;
use tracing::{info, warn};

use crate::emotion::{classify, Emotion, EmotionReading};
use crate::errors::BuilderError;

/// A speech-recognition capability
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Whether recognition is available on this host
    fn is_supported(&self) -> bool;

    /// Begin continuous listening
    async fn start(&self) -> Result<(), BuilderError>;

    /// Stop listening
    async fn stop(&self) -> Result<(), BuilderError>;
}

/// Recognizer for hosts without speech input
pub struct UnsupportedRecognizer;

#[async_trait]
impl SpeechRecognizer for UnsupportedRecognizer {
    fn is_supported(&self) -> bool {
        false
    }

    async fn start(&self) -> Result<(), BuilderError> {
        Err(BuilderError::SpeechNotSupported(
            "no speech recognizer available".to_string(),
        ))
    }

    async fn stop(&self) -> Result<(), BuilderError> {
        Ok(())
    }
}

/// A transcript segment delivered by the recognizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Provisional text, replaced by the next segment
    Interim(String),
    /// Committed text
    Final(String),
}

/// Accumulates a spoken prompt and tracks its tone
pub struct VoiceSession<R: SpeechRecognizer> {
    recognizer: R,
    disabled: bool,
    listening: bool,
    committed: String,
    pending: String,
    reading: EmotionReading,
}

impl<R: SpeechRecognizer> VoiceSession<R> {
    pub fn new(recognizer: R) -> Self {
        Self {
            recognizer,
            disabled: false,
            listening: false,
            committed: String::new(),
            pending: String::new(),
            reading: EmotionReading::default(),
        }
    }

    /// Start listening with a fresh transcript.
    ///
    /// An unsupported recognizer is reported once with a warning; the feature
    /// then stays disabled for the session.
    pub async fn start(&mut self) -> Result<(), BuilderError> {
        if self.disabled {
            return Err(BuilderError::SpeechNotSupported(
                "speech input disabled for this session".to_string(),
            ));
        }
        if !self.recognizer.is_supported() {
            self.disabled = true;
            warn!("Speech input is not supported; disabling voice input");
            return Err(BuilderError::SpeechNotSupported(
                "speech recognition is not supported on this host".to_string(),
            ));
        }

        self.reset();
        self.recognizer.start().await?;
        self.listening = true;
        info!("Listening for speech input");
        Ok(())
    }

    /// Stop listening, keeping the transcript
    pub async fn stop(&mut self) -> Result<(), BuilderError> {
        if self.listening {
            self.recognizer.stop().await?;
            self.listening = false;
        }
        Ok(())
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Apply a transcript segment and re-classify the tone
    pub fn push(&mut self, segment: Segment) -> EmotionReading {
        match segment {
            Segment::Interim(text) => self.pending = text,
            Segment::Final(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    if !self.committed.is_empty() {
                        self.committed.push(' ');
                    }
                    self.committed.push_str(text);
                }
                self.pending.clear();
            }
        }
        self.reading = classify(&self.transcript());
        self.reading
    }

    /// Committed text followed by any interim text
    pub fn transcript(&self) -> String {
        let pending = self.pending.trim();
        match (self.committed.is_empty(), pending.is_empty()) {
            (_, true) => self.committed.clone(),
            (true, false) => pending.to_string(),
            (false, false) => format!("{} {}", self.committed, pending),
        }
    }

    /// Tone of the current transcript
    pub fn reading(&self) -> EmotionReading {
        self.reading
    }

    /// Take the transcript as a prompt and clear the session.
    ///
    /// Returns `None` for a blank transcript.
    pub fn submit(&mut self) -> Option<String> {
        let prompt = self.transcript().trim().to_string();
        if prompt.is_empty() {
            return None;
        }
        self.reset();
        self.reading = EmotionReading {
            emotion: Emotion::Neutral,
            confidence: 0,
        };
        Some(prompt)
    }

    fn reset(&mut self) {
        self.committed.clear();
        self.pending.clear();
        self.reading = EmotionReading::default();
    }
}
