//! Scripted collaborators for exercising the guard protocol without audio
//! or camera hardware.
#![allow(dead_code)] // each test binary uses a different subset

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use vigil_core::{
    AlarmDevice, EvidenceRecord, EvidenceSink, FaceReader, Frame, FrameSource, GuardError,
    GuardResult, SpeechChannel,
};

/// One scripted reply for a `listen` call.
pub enum Reply {
    Heard(&'static str),
    /// Timeout / silence: the channel reports an empty transcript.
    Silence,
    /// Transport failure: recoverable error the caller degrades to empty.
    TransportError,
}

/// Speech channel that replays a script of replies and records everything
/// spoken through it.
pub struct ScriptedSpeech {
    replies: Mutex<VecDeque<Reply>>,
    pub spoken: Mutex<Vec<String>>,
}

impl ScriptedSpeech {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            spoken: Mutex::new(Vec::new()),
        }
    }

    pub fn spoken_lines(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

impl SpeechChannel for ScriptedSpeech {
    fn speak(&self, text: &str) -> GuardResult<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn listen(&self, _timeout: Duration, _phrase_limit: Duration) -> GuardResult<String> {
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Heard(text)) => Ok(text.to_string()),
            Some(Reply::Silence) | None => Ok(String::new()),
            Some(Reply::TransportError) => {
                Err(GuardError::Listen("scripted transport failure".into()))
            }
        }
    }
}

/// Counts alarm triggers.
#[derive(Default)]
pub struct CountingAlarm {
    pub triggers: AtomicUsize,
}

impl CountingAlarm {
    pub fn count(&self) -> usize {
        self.triggers.load(Ordering::SeqCst)
    }
}

impl AlarmDevice for CountingAlarm {
    fn play_alert(&self) {
        self.triggers.fetch_add(1, Ordering::SeqCst);
    }
}

/// Keeps stored records in memory.
#[derive(Default)]
pub struct MemEvidenceSink {
    pub records: Mutex<Vec<EvidenceRecord>>,
}

impl MemEvidenceSink {
    pub fn stored(&self) -> Vec<EvidenceRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl EvidenceSink for MemEvidenceSink {
    fn store(&self, record: &EvidenceRecord) -> GuardResult<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Evidence sink whose writes always fail, for the failures-are-not-fatal path.
pub struct FailingEvidenceSink;

impl EvidenceSink for FailingEvidenceSink {
    fn store(&self, _record: &EvidenceRecord) -> GuardResult<()> {
        Err(GuardError::Evidence("disk full".into()))
    }
}

/// Yields a fixed number of frames; on exhaustion it sends `Quit` once so
/// the surveillance loop winds down deterministically in tests.
pub struct CountedFrames {
    remaining: usize,
    on_empty: Option<std::sync::mpsc::Sender<vigil_core::ManualCommand>>,
}

impl CountedFrames {
    pub fn new(count: usize, on_empty: std::sync::mpsc::Sender<vigil_core::ManualCommand>) -> Self {
        Self {
            remaining: count,
            on_empty: Some(on_empty),
        }
    }
}

impl FrameSource for CountedFrames {
    fn next_frame(&mut self) -> GuardResult<Option<Frame>> {
        if self.remaining == 0 {
            if let Some(tx) = self.on_empty.take() {
                let _ = tx.send(vigil_core::ManualCommand::Quit);
            }
            return Ok(None);
        }
        self.remaining -= 1;
        Ok(Some(Frame::new(vec![0xFF, 0xD8, 0xFF])))
    }
}

/// Frame source that fails immediately, for the fatal-error path.
pub struct BrokenCamera;

impl FrameSource for BrokenCamera {
    fn next_frame(&mut self) -> GuardResult<Option<Frame>> {
        Err(GuardError::Vision("cannot open capture device".into()))
    }
}

/// Returns the same embedding list for every frame.
pub struct FixedFaces {
    pub embeddings: Vec<Vec<f32>>,
}

impl FaceReader for FixedFaces {
    fn read_faces(&self, _frame: &Frame) -> GuardResult<Vec<Vec<f32>>> {
        Ok(self.embeddings.clone())
    }
}
