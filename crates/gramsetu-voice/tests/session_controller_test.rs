//! Integration tests for the voice session controller
//!
//! ## Scenarios
//! 1. Provider dashboard: "Accept booking" dispatches Accept exactly once.
//! 2. Stop is idempotent and never dispatches.
//! 3. A finalized transcript after the turn ended is rejected.
//! 4. Unsupported capture: start fails, state is Error, no dispatch ever.
//! 5. Permission denied then retry succeeds.
//! 6. Start while listening is rejected and the running turn survives.
//! 7. Vocabulary cannot change mid-turn.
//! 8. Dictation forwards the raw transcript.
//! 9. Example playback uses the configured voice; unsupported synthesizers stay silent.
//! 10. Controller built from TOML config.

use gramsetu_intent::{Intent, VocabularyContext};
use gramsetu_voice::{
    CaptureError, CaptureState, DispatchMode, ScriptedCapture, SessionError, SilentSynthesis, SpeechSynthesis,
    Utterance, VoiceConfig, VoiceSessionController,
};
use std::sync::{Arc, Mutex};
use tokio_test::{assert_err, assert_ok};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Controller plus a shared log of every intent the callback received.
fn recording_controller(
    capture: ScriptedCapture,
    context: VocabularyContext,
) -> (VoiceSessionController, Arc<Mutex<Vec<Intent>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let controller = VoiceSessionController::new(capture, context).on_intent(move |intent| {
        sink.lock().unwrap().push(intent.clone());
    });
    (controller, seen)
}

#[test]
fn provider_accept_booking_dispatches_once() {
    init_tracing();
    let capture = ScriptedCapture::new();
    let (mut voice, seen) = recording_controller(capture.clone(), VocabularyContext::ProviderDashboard);

    assert_ok!(voice.start_listening());
    assert!(capture.is_active());
    let intent = assert_ok!(voice.on_transcript_finalized("Accept booking"));
    assert_eq!(intent, Some(Intent::Accept));
    assert_eq!(voice.state(), CaptureState::Idle);
    assert_eq!(*seen.lock().unwrap(), vec![Intent::Accept]);
}

#[test]
fn stop_is_idempotent_and_silent() {
    let capture = ScriptedCapture::new();
    let (mut voice, seen) = recording_controller(capture.clone(), VocabularyContext::Generic);

    assert_ok!(voice.stop_listening());
    assert_eq!(capture.stop_calls(), 0);

    assert_ok!(voice.start_listening());
    assert_ok!(voice.on_partial_transcript("show my"));
    assert_eq!(voice.session().partial(), Some("show my"));
    assert_ok!(voice.stop_listening());
    assert_ok!(voice.stop_listening());

    assert_eq!(capture.stop_calls(), 1);
    assert_eq!(voice.state(), CaptureState::Idle);
    assert_eq!(voice.session().partial(), None);
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn late_final_transcript_is_rejected() {
    let (mut voice, seen) = recording_controller(ScriptedCapture::new(), VocabularyContext::Generic);

    assert_ok!(voice.start_listening());
    assert_ok!(voice.on_transcript_finalized("Show profile"));
    assert_eq!(voice.on_transcript_finalized("Show profile"), Err(SessionError::NotListening));
    assert_eq!(voice.on_partial_transcript("again"), Err(SessionError::NotListening));

    assert_ok!(voice.start_listening());
    assert_ok!(voice.stop_listening());
    assert_eq!(voice.on_transcript_finalized("Show earnings"), Err(SessionError::NotListening));

    assert_eq!(*seen.lock().unwrap(), vec![Intent::ShowProfile]);
}

#[test]
fn unsupported_capture_never_dispatches() {
    let capture = ScriptedCapture::unsupported();
    let (mut voice, seen) = recording_controller(capture.clone(), VocabularyContext::Generic);

    assert!(!voice.is_capability_supported());
    let err = assert_err!(voice.start_listening());
    assert_eq!(err, SessionError::Capture(CaptureError::Unsupported));
    assert_eq!(voice.state(), CaptureState::Error);
    assert_eq!(voice.last_error(), Some(&CaptureError::Unsupported));
    assert_eq!(capture.start_calls(), 0);

    assert_err!(voice.on_transcript_finalized("Accept"));
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn permission_denied_then_retry() {
    let capture = ScriptedCapture::new();
    capture.fail_next_start(CaptureError::PermissionDenied);
    let (mut voice, seen) = recording_controller(capture.clone(), VocabularyContext::CustomerDashboard);

    assert_eq!(
        voice.start_listening(),
        Err(SessionError::Capture(CaptureError::PermissionDenied))
    );
    assert_eq!(voice.state(), CaptureState::Error);

    assert_ok!(voice.start_listening());
    assert!(voice.is_listening());
    assert_eq!(voice.last_error(), None);

    assert_eq!(
        assert_ok!(voice.on_transcript_finalized("Find services")),
        Some(Intent::ShowSearch)
    );
    assert_eq!(*seen.lock().unwrap(), vec![Intent::ShowSearch]);
}

#[test]
fn transient_start_failure_returns_to_idle() {
    let capture = ScriptedCapture::new();
    capture.fail_next_start(CaptureError::Failed("audio-capture".into()));
    let mut voice = VoiceSessionController::new(capture, VocabularyContext::Generic);

    assert_err!(voice.start_listening());
    assert_eq!(voice.state(), CaptureState::Idle);
    assert!(voice.last_error().is_some());
}

#[test]
fn mid_session_error_ends_turn() {
    let (mut voice, seen) = recording_controller(ScriptedCapture::new(), VocabularyContext::Generic);
    assert_ok!(voice.start_listening());

    let surfaced = voice.on_capture_error(CaptureError::Failed("network".into()));
    assert_eq!(surfaced, SessionError::Capture(CaptureError::Failed("network".into())));
    assert_eq!(voice.state(), CaptureState::Idle);
    assert_err!(voice.on_transcript_finalized("Accept"));

    assert_ok!(voice.start_listening());
    voice.on_capture_error(CaptureError::PermissionDenied);
    assert_eq!(voice.state(), CaptureState::Error);
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn stop_failure_still_lands_idle() {
    let capture = ScriptedCapture::new();
    let mut voice = VoiceSessionController::new(capture.clone(), VocabularyContext::Generic);
    assert_ok!(voice.start_listening());

    capture.fail_next_stop(CaptureError::Failed("already stopped".into()));
    assert_err!(voice.stop_listening());
    assert_eq!(voice.state(), CaptureState::Idle);
    assert_eq!(voice.last_error(), Some(&CaptureError::Failed("already stopped".into())));
}

#[test]
fn second_start_is_rejected() {
    let capture = ScriptedCapture::new();
    let mut voice = VoiceSessionController::new(capture.clone(), VocabularyContext::Generic);

    assert_ok!(voice.start_listening());
    assert_ok!(voice.on_partial_transcript("show"));
    assert_eq!(voice.start_listening(), Err(SessionError::AlreadyListening));
    assert!(voice.is_listening());
    assert_eq!(voice.session().partial(), Some("show"));
    assert_eq!(capture.start_calls(), 1);
}

#[test]
fn vocabulary_is_locked_mid_turn() {
    let mut voice = VoiceSessionController::new(ScriptedCapture::new(), VocabularyContext::Generic);

    assert_ok!(voice.set_context(VocabularyContext::ProviderDashboard));
    assert_ok!(voice.start_listening());
    assert_eq!(
        voice.set_context(VocabularyContext::CustomerDashboard),
        Err(SessionError::ContextLocked)
    );
    assert_eq!(voice.set_mode(DispatchMode::Dictation), Err(SessionError::ContextLocked));
    assert_eq!(voice.context(), VocabularyContext::ProviderDashboard);

    assert_eq!(
        assert_ok!(voice.on_transcript_finalized("View requests")),
        Some(Intent::ShowRequests)
    );
}

#[test]
fn same_transcript_depends_on_context() {
    let mut voice = VoiceSessionController::new(ScriptedCapture::new(), VocabularyContext::ProviderDashboard);
    assert_ok!(voice.start_listening());
    assert_eq!(
        assert_ok!(voice.on_transcript_finalized("Open my dashboard")),
        Some(Intent::ShowOverview)
    );

    assert_ok!(voice.set_context(VocabularyContext::Generic));
    assert_ok!(voice.start_listening());
    assert_eq!(
        assert_ok!(voice.on_transcript_finalized("Open my dashboard")),
        Some(Intent::FreeText("Open my dashboard".into()))
    );
}

#[test]
fn dictation_forwards_raw_transcript() {
    let (voice, seen) = recording_controller(ScriptedCapture::new(), VocabularyContext::CustomerDashboard);
    let mut voice = voice.with_mode(DispatchMode::Dictation);

    assert_ok!(voice.start_listening());
    assert_eq!(
        assert_ok!(voice.on_transcript_finalized("Find plumbers near me")),
        Some(Intent::FreeText("Find plumbers near me".into()))
    );
    assert_eq!(*seen.lock().unwrap(), vec![Intent::FreeText("Find plumbers near me".into())]);
}

#[test]
fn examples_play_with_configured_voice() {
    let tts = SilentSynthesis::new();
    let voice = VoiceSessionController::new(ScriptedCapture::new(), VocabularyContext::CustomerDashboard)
        .with_synthesis(tts.clone())
        .with_voice("hi-IN", 0.9);

    assert!(voice.speak_example(0));
    assert!(!voice.speak_example(99));

    let spoken = tts.spoken();
    assert_eq!(spoken.len(), 1);
    assert_eq!(spoken[0].text, voice.example_phrases()[0]);
    assert_eq!(spoken[0].lang, "hi-IN");
    assert!((spoken[0].rate - 0.9).abs() < 1e-6);
}

/// Synthesizer on a device without text-to-speech; records anything it is asked to say.
#[derive(Default)]
struct MuteSynthesis {
    spoken: Mutex<Vec<Utterance>>,
}

impl SpeechSynthesis for MuteSynthesis {
    fn supported(&self) -> bool {
        false
    }

    fn speak(&self, utterance: &Utterance) {
        self.spoken.lock().unwrap().push(utterance.clone());
    }
}

#[test]
fn unsupported_synthesizer_is_never_asked_to_speak() {
    let tts = Arc::new(MuteSynthesis::default());
    let voice = VoiceSessionController::new(ScriptedCapture::new(), VocabularyContext::ProviderDashboard)
        .with_synthesis(tts.clone());

    assert!(voice.speak_example(0));
    voice.speak("Show earnings");
    assert!(tts.spoken.lock().unwrap().is_empty());
}

#[test]
fn speaking_without_synthesizer_is_a_no_op() {
    let voice = VoiceSessionController::new(ScriptedCapture::new(), VocabularyContext::Generic);
    voice.speak("Show my earnings");
    assert!(voice.speak_example(0));
}

#[test]
fn controller_from_config() {
    let config = VoiceConfig::from_toml_str(
        r#"
        context = "customer_dashboard"
        mode = "command"
        match_mode = "whole_word"
        listen_timeout_secs = 10
        speech_rate = 1.0
        "#,
    )
    .unwrap();
    let mut voice = VoiceSessionController::from_config(ScriptedCapture::new(), &config).unwrap();

    assert_eq!(voice.context(), VocabularyContext::CustomerDashboard);
    assert_ok!(voice.start_listening());
    assert!(voice.listen_deadline().is_some());
    // Whole-word matching: "notifications" does not trip the "no" rule.
    assert_eq!(
        assert_ok!(voice.on_transcript_finalized("Check notifications")),
        Some(Intent::ShowNotifications)
    );
}

#[test]
fn out_of_range_timeout_never_reaches_the_controller() {
    let config = VoiceConfig {
        listen_timeout_secs: Some(u64::MAX / 2),
        ..Default::default()
    };
    assert!(VoiceSessionController::from_config(ScriptedCapture::new(), &config).is_err());

    let mut voice = VoiceSessionController::new(ScriptedCapture::new(), VocabularyContext::Generic)
        .with_listen_timeout(std::time::Duration::MAX);
    assert_ok!(voice.start_listening());
    assert!(voice.listen_deadline().is_none());
    assert_eq!(
        assert_ok!(voice.on_transcript_finalized("Show profile")),
        Some(Intent::ShowProfile)
    );
}

#[test]
fn intent_serializes_for_the_host() {
    let json = serde_json::to_value(Intent::ShowBookings).unwrap();
    assert_eq!(json["kind"], "show_bookings");
    let state = serde_json::to_value(CaptureState::Listening).unwrap();
    assert_eq!(state, "listening");
}
