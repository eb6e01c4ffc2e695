//! Voice Session Controller - capture lifecycle and one-shot intent dispatch
//!
//! Driven by host events on a single thread of control: the user taps the microphone
//! (`start_listening` / `stop_listening`), the recognizer reports transcripts
//! (`on_partial_transcript` / `on_transcript_finalized`) or failures (`on_capture_error`).
//! Each listening turn dispatches at most one intent; events arriving outside a turn
//! are rejected rather than re-dispatched.

use crate::capture::SpeechCapture;
use crate::config::VoiceConfig;
use crate::error::{CaptureError, SessionError, SessionResult, VoiceError, VoiceResult};
use crate::session::{CaptureSession, CaptureState, Transcript};
use crate::synthesis::{SpeechSynthesis, Utterance, DEFAULT_SPEECH_LANG, DEFAULT_SPEECH_RATE};
use gramsetu_intent::{CommandClassifier, Intent, VocabularyContext, DICTATION_EXAMPLES};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Host callback receiving each dispatched intent.
pub type OnIntent = Box<dyn FnMut(&Intent) + Send>;

/// What a finalized transcript turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Classify against the active vocabulary.
    #[default]
    Command,
    /// Voice search box: forward every transcript verbatim as `FreeText`.
    Dictation,
}

impl DispatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchMode::Command => "command",
            DispatchMode::Dictation => "dictation",
        }
    }
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DispatchMode {
    type Err = VoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "command" => Ok(DispatchMode::Command),
            "dictation" | "dictate" => Ok(DispatchMode::Dictation),
            _ => Err(VoiceError::Invalid(format!("unknown dispatch mode: {}", s))),
        }
    }
}

/// Owns one capture collaborator and turns each listening turn into at most one intent.
///
/// Starts `Idle` in the given vocabulary context. The host drives it with
/// `start_listening` / `stop_listening` and forwards recognizer results; dispatched
/// intents reach the `on_intent` callback. Collaborator failures are returned as
/// `SessionError` and never leave the controller anywhere but `Idle` or `Error`.
pub struct VoiceSessionController {
    capture: Box<dyn SpeechCapture>,
    synthesis: Option<Arc<dyn SpeechSynthesis>>,
    classifier: CommandClassifier,
    context: VocabularyContext,
    mode: DispatchMode,
    session: CaptureSession,
    on_intent: Option<OnIntent>,
    supported: bool,
    listen_timeout: Option<Duration>,
    deadline: Option<Instant>,
    speech_lang: String,
    speech_rate: f32,
}

impl VoiceSessionController {
    /// Create a controller over `capture`, probing its capability once.
    pub fn new(capture: impl SpeechCapture + 'static, context: VocabularyContext) -> Self {
        let supported = capture.supported();
        if !supported {
            info!("Speech capture unsupported, voice input will not be offered");
        }
        Self {
            capture: Box::new(capture),
            synthesis: None,
            classifier: CommandClassifier::default(),
            context,
            mode: DispatchMode::Command,
            session: CaptureSession::default(),
            on_intent: None,
            supported,
            listen_timeout: None,
            deadline: None,
            speech_lang: DEFAULT_SPEECH_LANG.to_string(),
            speech_rate: DEFAULT_SPEECH_RATE,
        }
    }

    /// Build from loaded configuration (context, mode, match mode, rule overlays, timeout, voice).
    pub fn from_config(capture: impl SpeechCapture + 'static, config: &VoiceConfig) -> VoiceResult<Self> {
        config.validate()?;
        let classifier = config.build_classifier()?;
        let mut controller = Self::new(capture, config.context)
            .with_classifier(classifier)
            .with_mode(config.mode)
            .with_voice(config.speech_lang.clone(), config.speech_rate);
        controller.listen_timeout = config.listen_timeout();
        Ok(controller)
    }

    pub fn with_classifier(mut self, classifier: CommandClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_synthesis(mut self, synthesis: Arc<dyn SpeechSynthesis>) -> Self {
        self.synthesis = Some(synthesis);
        self
    }

    pub fn with_mode(mut self, mode: DispatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Stop listening automatically when no transcript arrives within `timeout`.
    pub fn with_listen_timeout(mut self, timeout: Duration) -> Self {
        self.listen_timeout = Some(timeout);
        self
    }

    pub fn with_voice(mut self, lang: impl Into<String>, rate: f32) -> Self {
        self.speech_lang = lang.into();
        self.speech_rate = rate;
        self
    }

    pub fn on_intent(mut self, callback: impl FnMut(&Intent) + Send + 'static) -> Self {
        self.on_intent = Some(Box::new(callback));
        self
    }

    pub fn set_on_intent(&mut self, callback: Option<OnIntent>) {
        self.on_intent = callback;
    }

    pub fn state(&self) -> CaptureState {
        self.session.state()
    }

    pub fn is_listening(&self) -> bool {
        self.session.state() == CaptureState::Listening
    }

    pub fn session(&self) -> &CaptureSession {
        &self.session
    }

    pub fn last_error(&self) -> Option<&CaptureError> {
        self.session.last_error()
    }

    pub fn context(&self) -> VocabularyContext {
        self.context
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    pub fn classifier(&self) -> &CommandClassifier {
        &self.classifier
    }

    /// Result of the capability probe. When false the host hides the microphone.
    pub fn is_capability_supported(&self) -> bool {
        self.supported
    }

    /// Deadline of the current turn, when a listen timeout is configured.
    pub fn listen_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Change vocabulary between turns.
    pub fn set_context(&mut self, context: VocabularyContext) -> SessionResult<()> {
        if self.is_listening() {
            warn!("Vocabulary change to {} rejected mid-turn", context);
            return Err(SessionError::ContextLocked);
        }
        debug!("Vocabulary context: {} -> {}", self.context, context);
        self.context = context;
        Ok(())
    }

    pub fn set_mode(&mut self, mode: DispatchMode) -> SessionResult<()> {
        if self.is_listening() {
            return Err(SessionError::ContextLocked);
        }
        self.mode = mode;
        Ok(())
    }

    /// Begin a listening turn. From `Error` this is the retry path.
    ///
    /// A second start while listening is rejected with `AlreadyListening`; the
    /// running turn is left untouched.
    pub fn start_listening(&mut self) -> SessionResult<()> {
        match self.session.state() {
            CaptureState::Listening => {
                warn!("start_listening while already listening, rejected");
                return Err(SessionError::AlreadyListening);
            }
            CaptureState::Error => {
                info!("Retrying speech capture after {:?}", self.session.last_error());
                self.session.clear_error();
                self.supported = self.capture.supported();
            }
            CaptureState::Idle => {}
        }

        if !self.supported {
            warn!("Speech capture unsupported, not listening");
            self.session.fail(CaptureError::Unsupported);
            return Err(CaptureError::Unsupported.into());
        }

        if let Err(err) = self.capture.start() {
            if err == CaptureError::Unsupported {
                self.supported = false;
            }
            warn!("Speech capture failed to start: {}", err);
            self.session.fail(err.clone());
            return Err(err.into());
        }

        self.session.begin();
        self.deadline = self.listen_timeout.and_then(|t| {
            let deadline = Instant::now().checked_add(t);
            if deadline.is_none() {
                warn!("Listen timeout {:?} out of range, listening without a deadline", t);
            }
            deadline
        });
        info!("🎤 Listening ({}, {:?})", self.context, self.mode);
        Ok(())
    }

    /// End the current turn without dispatching. A no-op outside `Listening`.
    pub fn stop_listening(&mut self) -> SessionResult<()> {
        if !self.is_listening() {
            debug!("stop_listening while {}, nothing to do", self.session.state());
            return Ok(());
        }
        let result = self.capture.stop();
        self.session.reset();
        self.deadline = None;
        match result {
            Ok(()) => {
                info!("🤫 Stopped listening");
                Ok(())
            }
            Err(err) => {
                warn!("Speech capture failed to stop cleanly: {}", err);
                self.session.note_error(err.clone());
                Err(err.into())
            }
        }
    }

    /// Record an interim hypothesis for the current turn.
    pub fn on_partial_transcript(&mut self, text: impl Into<String>) -> SessionResult<()> {
        if !self.is_listening() {
            return Err(SessionError::NotListening);
        }
        self.session.set_partial(text.into());
        Ok(())
    }

    /// Classify a finalized transcript, dispatch it once, and return to `Idle`.
    ///
    /// Returns the dispatched intent, or `None` when the transcript was blank.
    pub fn on_transcript_finalized(&mut self, text: impl Into<String>) -> SessionResult<Option<Intent>> {
        if !self.is_listening() {
            warn!("Finalized transcript outside a listening turn, ignored");
            return Err(SessionError::NotListening);
        }

        self.session.finalize(Transcript::new(text));
        let transcript = self.session.take_transcript();
        self.session.reset();
        self.deadline = None;

        let Some(transcript) = transcript.filter(|t| !t.is_blank()) else {
            debug!("Blank transcript, turn ended without dispatch");
            return Ok(None);
        };

        let intent = match self.mode {
            DispatchMode::Command => self.classifier.classify(transcript.as_str(), self.context),
            DispatchMode::Dictation => Intent::FreeText(transcript.into_string()),
        };

        info!("🎯 Dispatching {}", intent);
        match self.on_intent.as_mut() {
            Some(callback) => callback(&intent),
            None => debug!("No intent callback registered"),
        }
        Ok(Some(intent))
    }

    /// Collaborator failure mid-session. Returns the error for the host to surface.
    pub fn on_capture_error(&mut self, err: CaptureError) -> SessionError {
        warn!("Speech capture reported: {}", err);
        if err == CaptureError::Unsupported {
            self.supported = false;
        }
        self.session.fail(err.clone());
        self.deadline = None;
        SessionError::Capture(err)
    }

    /// Recognizer ended the turn on its own without a final transcript.
    pub fn on_capture_ended(&mut self) {
        if self.is_listening() {
            debug!("Recognizer ended the turn without a transcript");
            self.session.reset();
            self.deadline = None;
        }
    }

    /// Apply the listen timeout. On expiry this behaves exactly like `stop_listening`.
    ///
    /// Returns whether the turn expired.
    pub fn check_deadline(&mut self, now: Instant) -> SessionResult<bool> {
        match self.deadline {
            Some(deadline) if self.is_listening() && now >= deadline => {
                info!("⏱️ Listen timeout reached, stopping");
                self.stop_listening()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Phrases to show (and optionally play) next to the microphone.
    pub fn example_phrases(&self) -> &'static [&'static str] {
        match self.mode {
            DispatchMode::Command => self.context.example_phrases(),
            DispatchMode::Dictation => DICTATION_EXAMPLES,
        }
    }

    /// Speak `text` if a supported synthesizer is attached; otherwise do nothing.
    pub fn speak(&self, text: &str) {
        let Some(synthesis) = self.synthesis.as_ref() else {
            debug!("No synthesizer attached, skipping playback");
            return;
        };
        if !synthesis.supported() {
            debug!("Synthesizer unsupported, skipping playback");
            return;
        }
        let utterance = Utterance::new(text)
            .with_lang(self.speech_lang.clone())
            .with_rate(self.speech_rate);
        synthesis.speak(&utterance);
    }

    /// Play the example phrase at `index`. Returns false if there is none.
    pub fn speak_example(&self, index: usize) -> bool {
        match self.example_phrases().get(index) {
            Some(phrase) => {
                self.speak(phrase);
                true
            }
            None => false,
        }
    }
}
