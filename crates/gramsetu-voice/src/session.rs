//! Capture session state: one listening lifecycle.
//!
//! Idle → Listening → Idle (stop, or transcript dispatched). Error is entered when
//! capture is unsupported or permission is denied, and left only by a retry.

use crate::error::CaptureError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Finalized speech-to-text output for one listening turn. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript(String);

impl Transcript {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl AsRef<str> for Transcript {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureState {
    #[default]
    Idle,
    Listening,
    Error,
}

impl CaptureState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureState::Idle => "idle",
            CaptureState::Listening => "listening",
            CaptureState::Error => "error",
        }
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owned exclusively by the session controller.
#[derive(Debug, Clone, Default)]
pub struct CaptureSession {
    state: CaptureState,
    last_transcript: Option<Transcript>,
    partial: Option<String>,
    started_at: Option<DateTime<Utc>>,
    last_error: Option<CaptureError>,
}

impl CaptureSession {
    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn last_transcript(&self) -> Option<&Transcript> {
        self.last_transcript.as_ref()
    }

    /// Latest interim (non-finalized) transcript of the current turn.
    pub fn partial(&self) -> Option<&str> {
        self.partial.as_deref()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Status flag for the host: the most recent collaborator failure.
    pub fn last_error(&self) -> Option<&CaptureError> {
        self.last_error.as_ref()
    }

    pub(crate) fn begin(&mut self) {
        self.state = CaptureState::Listening;
        self.last_transcript = None;
        self.partial = None;
        self.started_at = Some(Utc::now());
        self.last_error = None;
    }

    pub(crate) fn set_partial(&mut self, text: String) {
        self.partial = Some(text);
    }

    pub(crate) fn finalize(&mut self, transcript: Transcript) {
        self.partial = None;
        self.last_transcript = Some(transcript);
    }

    pub(crate) fn take_transcript(&mut self) -> Option<Transcript> {
        self.last_transcript.take()
    }

    /// Back to Idle with transcript and partial discarded. Keeps `last_error`.
    pub(crate) fn reset(&mut self) {
        self.state = CaptureState::Idle;
        self.last_transcript = None;
        self.partial = None;
        self.started_at = None;
    }

    /// Record a collaborator failure and land in a safe state.
    pub(crate) fn fail(&mut self, err: CaptureError) {
        self.reset();
        if err.is_capability_error() {
            self.state = CaptureState::Error;
        }
        self.last_error = Some(err);
    }

    /// Record a failure without changing state (stop failures still end in Idle).
    pub(crate) fn note_error(&mut self, err: CaptureError) {
        self.last_error = Some(err);
    }

    pub(crate) fn clear_error(&mut self) {
        self.last_error = None;
        if self.state == CaptureState::Error {
            self.state = CaptureState::Idle;
        }
    }
}
