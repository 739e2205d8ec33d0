//! Bounded-window microphone capture.
//!
//! The guard's dialogue is strictly turn-based, so capture is a fixed
//! listening window rather than continuous VAD streaming: open the input
//! stream, buffer mono f32 chunks for the window, close the stream. Opening
//! per call also means the microphone is held only while someone is
//! actually listening, which is what lets the activation listener and the
//! escalation engine time-share the device.

use crate::error::{VoiceError, VoiceResult};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::StreamConfig;
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Capture parameters. 16 kHz mono is what the transcription APIs expect.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub sample_rate: u32,
    /// Chunk size in samples per callback delivery (480 = 30ms at 16kHz).
    pub chunk_size: usize,
    /// RMS below this over the whole window counts as silence.
    pub silence_rms: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            chunk_size: 480,
            silence_rms: 0.01,
        }
    }
}

/// Root-mean-square level of a sample window.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

/// Microphone capture over the default input device.
pub struct MicCapture {
    config: CaptureConfig,
}

impl MicCapture {
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Capture one listening window of mono f32 PCM. Returns an empty vec
    /// when the whole window stayed below the silence gate (timeout /
    /// nobody spoke); device and stream failures are real errors.
    pub fn capture_window(&self, window: Duration) -> VoiceResult<Vec<f32>> {
        let device = cpal::default_host()
            .default_input_device()
            .ok_or_else(|| VoiceError::AudioDevice("no input device available".to_string()))?;
        debug!(
            device = %device.name().unwrap_or_else(|_| "unknown".to_string()),
            window_secs = window.as_secs_f32(),
            "opening capture window"
        );

        let stream_config = StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(self.config.sample_rate),
            buffer_size: cpal::BufferSize::Fixed(self.config.chunk_size as u32),
        };

        let (chunk_tx, chunk_rx) = mpsc::channel::<Vec<f32>>();
        let stream = device.build_input_stream(
            &stream_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let _ = chunk_tx.send(data.to_vec());
            },
            move |err| {
                warn!(error = %err, "audio input stream error");
            },
            None,
        )?;
        stream.play()?;

        let mut samples =
            Vec::with_capacity(self.config.sample_rate as usize * window.as_secs() as usize);
        let deadline = Instant::now() + window;
        while Instant::now() < deadline {
            match chunk_rx.recv_timeout(Duration::from_millis(100)) {
                Ok(chunk) => samples.extend_from_slice(&chunk),
                Err(mpsc::RecvTimeoutError::Timeout) => continue,
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    return Err(VoiceError::AudioStream(
                        "capture stream disconnected".to_string(),
                    ))
                }
            }
        }
        drop(stream);

        if rms(&samples) < self.config.silence_rms {
            debug!("capture window below silence gate");
            return Ok(Vec::new());
        }
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rms_of_silence_is_zero() {
        assert_eq!(rms(&[]), 0.0);
        assert_eq!(rms(&[0.0; 480]), 0.0);
    }

    #[test]
    fn rms_of_full_scale_square_is_one() {
        let samples = vec![1.0f32; 480];
        assert!((rms(&samples) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn default_config_is_16khz_mono_chunks() {
        let c = CaptureConfig::default();
        assert_eq!(c.sample_rate, 16000);
        assert_eq!(c.chunk_size, 480);
    }
}
