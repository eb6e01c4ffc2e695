//! **Capture loop**: feed recognizer events into a controller until the channel closes.
//!
//! The host pushes microphone taps (`Start`/`Stop`) and the recognizer pushes its
//! reports onto one mpsc channel; this loop applies them to the controller in order
//! and enforces the listen timeout while a turn is open. Intents reach the host
//! through the controller's callback.

use crate::capture::CaptureEvent;
use crate::controller::VoiceSessionController;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Counters for one run of the capture loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoopSummary {
    /// Intents handed to the callback.
    pub dispatched: usize,
    /// Finalized transcripts that were blank.
    pub blank: usize,
    /// Events that arrived outside a listening turn.
    pub rejected: usize,
    /// `Start` events the controller refused (already listening, capture failure).
    pub start_failures: usize,
    /// Collaborator failures reported mid-session.
    pub errors: usize,
    /// Turns ended by the listen timeout.
    pub timeouts: usize,
}

/// Drive `controller` from `events` until every sender is dropped.
///
/// Serves any number of turns: each `CaptureEvent::Start` opens one. A controller
/// already listening when the loop begins keeps its turn.
pub async fn run_capture_loop(
    controller: &mut VoiceSessionController,
    events: &mut mpsc::Receiver<CaptureEvent>,
) -> LoopSummary {
    let mut summary = LoopSummary::default();

    loop {
        enum Event {
            Capture(CaptureEvent),
            Deadline,
            Closed,
        }

        let event = match controller.listen_deadline() {
            Some(deadline) => match tokio::time::timeout_at(deadline, events.recv()).await {
                Ok(Some(e)) => Event::Capture(e),
                Ok(None) => Event::Closed,
                Err(_) => Event::Deadline,
            },
            None => match events.recv().await {
                Some(e) => Event::Capture(e),
                None => Event::Closed,
            },
        };

        match event {
            Event::Capture(CaptureEvent::Start) => {
                if let Err(e) = controller.start_listening() {
                    debug!("Start refused: {}", e);
                    summary.start_failures += 1;
                }
            }
            Event::Capture(CaptureEvent::Stop) => {
                if let Err(e) = controller.stop_listening() {
                    debug!("Stop reported: {}", e);
                    summary.errors += 1;
                }
            }
            Event::Capture(CaptureEvent::Partial(text)) => {
                if controller.on_partial_transcript(text).is_err() {
                    summary.rejected += 1;
                }
            }
            Event::Capture(CaptureEvent::Final(text)) => match controller.on_transcript_finalized(text) {
                Ok(Some(_)) => summary.dispatched += 1,
                Ok(None) => summary.blank += 1,
                Err(e) => {
                    debug!("Final transcript rejected: {}", e);
                    summary.rejected += 1;
                }
            },
            Event::Capture(CaptureEvent::Error(err)) => {
                let surfaced = controller.on_capture_error(err);
                debug!("Capture error surfaced to host: {}", surfaced);
                summary.errors += 1;
            }
            Event::Capture(CaptureEvent::Ended) => controller.on_capture_ended(),
            Event::Deadline => match controller.check_deadline(Instant::now()) {
                Ok(true) => summary.timeouts += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!("Listen timeout stop failed: {}", e);
                    summary.timeouts += 1;
                }
            },
            Event::Closed => break,
        }
    }

    info!(
        "Capture loop finished: {} dispatched, {} rejected, {} timeouts",
        summary.dispatched, summary.rejected, summary.timeouts
    );
    summary
}
