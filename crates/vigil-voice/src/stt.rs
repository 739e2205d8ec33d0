//! Speech-to-text backends: convert captured PCM into a transcript.
//!
//! Implement [`SttBackend`] for any transcription service. The production
//! backend uploads WAV to an OpenAI-compatible `/audio/transcriptions`
//! endpoint; the placeholder replays a scripted queue for offline runs.

use crate::error::{VoiceError, VoiceResult};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Backend for converting PCM to text. PCM is mono f32 in -1.0..1.0; return
/// an empty string when nothing intelligible was heard.
pub trait SttBackend: Send + Sync {
    fn transcribe(&self, samples: &[f32], sample_rate: u32) -> VoiceResult<String>;
}

/// Encode f32 PCM (mono) to 16-bit WAV bytes for API upload.
fn pcm_f32_to_wav(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let data_len = samples.len() * 2; // 16-bit samples
    let file_len = 44u32 + data_len as u32;

    let mut buf = Vec::with_capacity(44 + data_len);
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(file_len - 8).to_le_bytes());
    buf.extend_from_slice(b"WAVE");
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes()); // subchunk1 size
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&1u16.to_le_bytes()); // mono
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&(sample_rate * 2).to_le_bytes()); // byte rate
    buf.extend_from_slice(&2u16.to_le_bytes()); // block align
    buf.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&(data_len as u32).to_le_bytes());
    for &s in samples {
        let i = (s.clamp(-1.0, 1.0) * 32767.0).round() as i16;
        buf.extend_from_slice(&i.to_le_bytes());
    }
    buf
}

/// Scripted STT for tests and offline operation: pops one queued transcript
/// per call, returning empty once the script is exhausted.
#[derive(Debug, Default)]
pub struct PlaceholderStt {
    script: Mutex<VecDeque<String>>,
}

impl PlaceholderStt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(lines: Vec<String>) -> Self {
        Self {
            script: Mutex::new(lines.into()),
        }
    }
}

impl SttBackend for PlaceholderStt {
    fn transcribe(&self, _samples: &[f32], _sample_rate: u32) -> VoiceResult<String> {
        Ok(self
            .script
            .lock()
            .map_err(|e| VoiceError::Stt(format!("script lock poisoned: {}", e)))?
            .pop_front()
            .unwrap_or_default())
    }
}

/// Production STT: OpenAI-compatible transcription API.
/// Uses `VIGIL_STT_API_URL` (default https://api.openai.com/v1),
/// `VIGIL_STT_API_KEY`, and `VIGIL_STT_MODEL` (default whisper-1).
#[derive(Debug, Clone)]
pub struct OpenAiStt {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    client: reqwest::blocking::Client,
}

impl OpenAiStt {
    /// Build from environment; errors when no API key is configured.
    pub fn from_env() -> VoiceResult<Self> {
        let base_url = std::env::var("VIGIL_STT_API_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let api_key = std::env::var("VIGIL_STT_API_KEY")
            .map_err(|_| VoiceError::Config("STT requires VIGIL_STT_API_KEY".to_string()))?;
        let model = std::env::var("VIGIL_STT_MODEL").unwrap_or_else(|_| "whisper-1".to_string());
        Self::new(base_url, api_key, model)
    }

    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> VoiceResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| VoiceError::Stt(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            client,
        })
    }
}

impl SttBackend for OpenAiStt {
    fn transcribe(&self, samples: &[f32], sample_rate: u32) -> VoiceResult<String> {
        if samples.is_empty() {
            return Ok(String::new());
        }
        let wav = pcm_f32_to_wav(samples, sample_rate);
        let url = format!("{}/audio/transcriptions", self.base_url.trim_end_matches('/'));
        let part = reqwest::blocking::multipart::Part::bytes(wav)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| VoiceError::Stt(e.to_string()))?;
        let form = reqwest::blocking::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone());
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .map_err(|e| VoiceError::Stt(e.to_string()))?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().unwrap_or_default();
            return Err(VoiceError::Stt(format!("STT API error {}: {}", status, body)));
        }
        let json: serde_json::Value = res.json().map_err(|e| VoiceError::Stt(e.to_string()))?;
        let text = json
            .get("text")
            .and_then(|t| t.as_str())
            .unwrap_or("")
            .trim()
            .to_string();
        Ok(text)
    }
}

/// Best available STT from environment: the OpenAI-compatible backend when a
/// key is configured, otherwise the (logged) placeholder.
pub fn create_best_stt() -> Box<dyn SttBackend> {
    match OpenAiStt::from_env() {
        Ok(stt) => Box::new(stt),
        Err(e) => {
            tracing::warn!(error = %e, "no STT backend configured; using placeholder");
            Box::new(PlaceholderStt::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_header_is_well_formed() {
        let wav = pcm_f32_to_wav(&[0.0, 0.5, -0.5], 16000);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(wav.len(), 44 + 6);
        // Sample rate field at offset 24.
        assert_eq!(&wav[24..28], &16000u32.to_le_bytes());
    }

    #[test]
    fn placeholder_replays_script_then_goes_silent() {
        let stt = PlaceholderStt::with_script(vec!["protect my room".into()]);
        assert_eq!(stt.transcribe(&[0.0], 16000).unwrap(), "protect my room");
        assert_eq!(stt.transcribe(&[0.0], 16000).unwrap(), "");
    }
}
