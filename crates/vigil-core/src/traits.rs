//! Collaborator traits: the narrow contracts through which the guard core
//! consumes audio, vision, alarm, and persistence backends.

use crate::error::GuardResult;
use crate::evidence::EvidenceRecord;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// One captured frame: encoded image bytes, never decoded by the core.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Encoded image bytes (typically JPEG).
    pub bytes: Vec<u8>,
    /// When the frame was captured.
    pub captured_at: DateTime<Utc>,
}

impl Frame {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            captured_at: Utc::now(),
        }
    }
}

/// Blocking speak/listen primitives.
///
/// `listen` returns `Ok("")` on timeout, silence, or unintelligible audio;
/// only transport-level failures surface as `Err`, and callers treat those
/// as an empty transcript after logging.
pub trait SpeechChannel: Send + Sync {
    /// Speak text, blocking until audible completion (or a logged no-op when
    /// no synthesis backend is available).
    fn speak(&self, text: &str) -> GuardResult<()>;

    /// Listen for one utterance. `timeout` bounds the wait for speech;
    /// `phrase_limit` bounds the utterance itself.
    fn listen(&self, timeout: Duration, phrase_limit: Duration) -> GuardResult<String>;
}

/// Fire-and-forget alert playback; must return immediately. Playback
/// failures are the device's problem to log.
pub trait AlarmDevice: Send + Sync {
    fn play_alert(&self);
}

/// Persists an evidence record. Failures are reported but never change an
/// escalation outcome.
pub trait EvidenceSink: Send + Sync {
    fn store(&self, record: &EvidenceRecord) -> GuardResult<()>;
}

/// Extracts face embeddings from a frame. The first entry is the most
/// prominent face; the core processes at most one face per frame.
pub trait FaceReader: Send + Sync {
    fn read_faces(&self, frame: &Frame) -> GuardResult<Vec<Vec<f32>>>;
}

/// Source of captured frames. `Ok(None)` means no new frame yet; `Err` is
/// fatal to the surveillance loop (the camera-cannot-open class).
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> GuardResult<Option<Frame>>;
}
