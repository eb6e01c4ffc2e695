//! **Speech synthesis**: optional text-to-speech used to play example phrases.
//!
//! Fire-and-forget: `speak` has no result, and hosts without a synthesizer simply
//! skip playback.

use std::sync::{Arc, Mutex};

pub const DEFAULT_SPEECH_LANG: &str = "en-US";
pub const DEFAULT_SPEECH_RATE: f32 = 0.8;

/// Text to speak plus voice settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// BCP 47 language tag (default `en-US`).
    pub lang: String,
    /// Speaking rate; 1.0 is normal speed (default 0.8, slightly slow for clarity).
    pub rate: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lang: DEFAULT_SPEECH_LANG.to_string(),
            rate: DEFAULT_SPEECH_RATE,
        }
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }
}

/// Text-to-speech facility. Failures stay inside the implementation.
pub trait SpeechSynthesis: Send + Sync {
    fn supported(&self) -> bool {
        true
    }

    fn speak(&self, utterance: &Utterance);
}

/// Synthesizer that stays silent but remembers what it was asked to say.
#[derive(Debug, Default)]
pub struct SilentSynthesis {
    spoken: Mutex<Vec<Utterance>>,
}

impl SilentSynthesis {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn spoken(&self) -> Vec<Utterance> {
        self.spoken
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

impl SpeechSynthesis for SilentSynthesis {
    fn speak(&self, utterance: &Utterance) {
        if let Ok(mut spoken) = self.spoken.lock() {
            spoken.push(utterance.clone());
        }
    }
}
