//! vigil-voice: real audio backends for the guard core's speech contracts.
//!
//! Provides the microphone-backed [`MicSpeechChannel`] (cpal capture →
//! OpenAI-compatible STT; OpenAI-compatible TTS → rodio playback), the
//! rodio-based [`RodioAlarm`], and placeholder backends so the system runs
//! end-to-end without API keys or audio hardware.

mod alarm;
mod capture;
mod channel;
mod error;
mod playback;
mod stt;
mod tts;

pub use alarm::RodioAlarm;
pub use capture::{rms, CaptureConfig, MicCapture};
pub use channel::MicSpeechChannel;
pub use error::{VoiceError, VoiceResult};
pub use playback::PlaybackHandle;
pub use stt::{create_best_stt, OpenAiStt, PlaceholderStt, SttBackend};
pub use tts::{create_best_tts, OpenAiTts, PlaceholderTts, TtsBackend};
