//! # GramSetu Voice - Voice Session Control
//!
//! Turns the microphone button on a marketplace dashboard into at most one intent per
//! tap. The controller owns the capture lifecycle; classification is delegated to
//! `gramsetu-intent`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Voice Session Controller                    │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐      │
//! │  │ SpeechCapture│→ │ CaptureEvent │→ │  Classifier  │      │
//! │  │ (recognizer) │  │   (mpsc)     │  │ (vocabulary) │      │
//! │  └──────────────┘  └──────────────┘  └──────────────┘      │
//! │         ↑                                      ↓             │
//! │  ┌──────────────┐                    ┌──────────────┐      │
//! │  │  Idle/Listen │←── one dispatch ───│  on_intent   │      │
//! │  │    /Error    │                    │  (host nav)  │      │
//! │  └──────────────┘                    └──────────────┘      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```
//! use gramsetu_intent::{Intent, VocabularyContext};
//! use gramsetu_voice::{ScriptedCapture, VoiceSessionController};
//!
//! let mut voice = VoiceSessionController::new(ScriptedCapture::new(), VocabularyContext::Generic);
//! voice.start_listening().unwrap();
//! let intent = voice.on_transcript_finalized("Show my earnings").unwrap();
//! assert_eq!(intent, Some(Intent::ShowEarnings));
//! assert!(!voice.is_listening());
//! ```

pub mod capture;
pub mod config;
pub mod controller;
pub mod error;
pub mod pump;
pub mod session;
pub mod synthesis;

pub use capture::{CaptureEvent, ScriptedCapture, SpeechCapture};
pub use config::VoiceConfig;
pub use controller::{DispatchMode, OnIntent, VoiceSessionController};
pub use error::{CaptureError, SessionError, SessionResult, VoiceError, VoiceResult};
pub use pump::{run_capture_loop, LoopSummary};
pub use session::{CaptureSession, CaptureState, Transcript};
pub use synthesis::{SilentSynthesis, SpeechSynthesis, Utterance, DEFAULT_SPEECH_LANG, DEFAULT_SPEECH_RATE};
