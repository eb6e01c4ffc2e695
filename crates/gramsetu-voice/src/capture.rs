//! **Speech capture**: the speech-to-text collaborator the controller drives.
//!
//! Implement `SpeechCapture` for whatever recognizer the host provides (browser speech
//! API bridge, on-device Whisper, a remote service). Finalized transcripts flow back
//! either as direct calls on the controller or as `CaptureEvent`s on a channel.

use crate::error::CaptureError;
use std::sync::{Arc, Mutex, MutexGuard};

/// Speech recognition facility. `start`/`stop` only request a change; transcripts
/// arrive asynchronously.
pub trait SpeechCapture: Send {
    /// Capability probe. When false, the host must not offer voice input.
    fn supported(&self) -> bool;

    fn start(&mut self) -> Result<(), CaptureError>;

    fn stop(&mut self) -> Result<(), CaptureError>;
}

/// Events fed to the capture loop: host microphone taps and recognizer reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// Host tapped the microphone: begin a listening turn.
    Start,
    /// Host tapped the microphone again: end the turn without dispatch.
    Stop,
    /// Interim hypothesis; replaced by later partials and discarded on stop.
    Partial(String),
    /// Finalized transcript; ends the listening turn.
    Final(String),
    /// Collaborator failure mid-session.
    Error(CaptureError),
    /// Recognizer ended the turn without a final result (e.g. silence).
    Ended,
}

#[derive(Debug, Default)]
struct ScriptState {
    supported: bool,
    fail_next_start: Option<CaptureError>,
    fail_next_stop: Option<CaptureError>,
    starts: usize,
    stops: usize,
    active: bool,
}

/// In-process capture collaborator for tests and demos.
///
/// Clones share state, so a test can keep a handle after moving one into the controller.
#[derive(Debug, Clone)]
pub struct ScriptedCapture {
    inner: Arc<Mutex<ScriptState>>,
}

impl Default for ScriptedCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedCapture {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ScriptState {
                supported: true,
                ..Default::default()
            })),
        }
    }

    /// A recognizer on a device without speech input.
    pub fn unsupported() -> Self {
        let capture = Self::new();
        capture.set_supported(false);
        capture
    }

    fn state(&self) -> MutexGuard<'_, ScriptState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_supported(&self, supported: bool) {
        self.state().supported = supported;
    }

    pub fn fail_next_start(&self, err: CaptureError) {
        self.state().fail_next_start = Some(err);
    }

    pub fn fail_next_stop(&self, err: CaptureError) {
        self.state().fail_next_stop = Some(err);
    }

    pub fn start_calls(&self) -> usize {
        self.state().starts
    }

    pub fn stop_calls(&self) -> usize {
        self.state().stops
    }

    pub fn is_active(&self) -> bool {
        self.state().active
    }
}

impl SpeechCapture for ScriptedCapture {
    fn supported(&self) -> bool {
        self.state().supported
    }

    fn start(&mut self) -> Result<(), CaptureError> {
        let mut state = self.state();
        state.starts += 1;
        if !state.supported {
            return Err(CaptureError::Unsupported);
        }
        if let Some(err) = state.fail_next_start.take() {
            return Err(err);
        }
        state.active = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        let mut state = self.state();
        state.stops += 1;
        state.active = false;
        match state.fail_next_stop.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
