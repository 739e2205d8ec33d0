//! The microphone-backed implementation of the core's `SpeechChannel`.

use crate::capture::{CaptureConfig, MicCapture};
use crate::playback::PlaybackHandle;
use crate::stt::SttBackend;
use crate::tts::TtsBackend;
use crate::VoiceError;
use std::time::Duration;
use tracing::{info, warn};
use vigil_core::{GuardError, GuardResult, SpeechChannel};

/// Speak through TTS + blocking playback; listen through a bounded capture
/// window + STT. Transport failures surface as `GuardError::Listen` so the
/// core can degrade them to an empty transcript.
pub struct MicSpeechChannel {
    stt: Box<dyn SttBackend>,
    tts: Box<dyn TtsBackend>,
    playback: PlaybackHandle,
    capture: MicCapture,
}

impl MicSpeechChannel {
    /// Wire the channel. Fails when no output device exists; input device
    /// problems surface per listen call instead (the microphone is opened
    /// and released around each window).
    pub fn new(
        stt: Box<dyn SttBackend>,
        tts: Box<dyn TtsBackend>,
        capture_config: CaptureConfig,
    ) -> Result<Self, VoiceError> {
        Ok(Self {
            stt,
            tts,
            playback: PlaybackHandle::spawn()?,
            capture: MicCapture::new(capture_config),
        })
    }

    /// Best-effort channel from the environment: OpenAI-compatible STT/TTS
    /// when keys are configured, placeholders otherwise.
    pub fn from_env() -> Result<Self, VoiceError> {
        Self::new(
            crate::stt::create_best_stt(),
            crate::tts::create_best_tts(),
            CaptureConfig::default(),
        )
    }
}

impl SpeechChannel for MicSpeechChannel {
    fn speak(&self, text: &str) -> GuardResult<()> {
        info!(line = %text, "speaking");
        let bytes = self
            .tts
            .synthesize(text)
            .map_err(|e| GuardError::Speech(e.to_string()))?;
        if bytes.is_empty() {
            // No synthesis backend: the log line above is the fallback.
            return Ok(());
        }
        self.playback
            .play_blocking(bytes)
            .map_err(|e| GuardError::Speech(e.to_string()))
    }

    fn listen(&self, timeout: Duration, phrase_limit: Duration) -> GuardResult<String> {
        let samples = self
            .capture
            .capture_window(timeout)
            .map_err(|e| GuardError::Listen(e.to_string()))?;
        if samples.is_empty() {
            return Ok(String::new());
        }
        // Cap the utterance at the phrase limit.
        let max_samples =
            (self.capture.config().sample_rate as f64 * phrase_limit.as_secs_f64()) as usize;
        let clipped = if samples.len() > max_samples && max_samples > 0 {
            &samples[..max_samples]
        } else {
            &samples[..]
        };
        match self
            .stt
            .transcribe(clipped, self.capture.config().sample_rate)
        {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!(error = %e, "transcription failed");
                Err(GuardError::Listen(e.to_string()))
            }
        }
    }
}
