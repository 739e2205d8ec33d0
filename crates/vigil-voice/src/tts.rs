//! Text-to-speech backends: turn prompt text into audio bytes.

use crate::error::{VoiceError, VoiceResult};

/// Backend that synthesizes text to audio bytes (WAV/MP3). Return an empty
/// vec to skip playback (the channel logs the text instead).
pub trait TtsBackend: Send + Sync {
    fn synthesize(&self, text: &str) -> VoiceResult<Vec<u8>>;
}

/// Placeholder TTS: no audio. The speech channel falls back to logging the
/// line, which keeps the escalation protocol observable without a speaker.
#[derive(Debug, Default)]
pub struct PlaceholderTts;

impl TtsBackend for PlaceholderTts {
    fn synthesize(&self, _text: &str) -> VoiceResult<Vec<u8>> {
        Ok(Vec::new())
    }
}

/// Production TTS: OpenAI-compatible `/audio/speech` endpoint.
/// Uses `VIGIL_TTS_API_URL` (default https://api.openai.com/v1),
/// `VIGIL_TTS_API_KEY`, `VIGIL_TTS_MODEL` (default tts-1), and
/// `VIGIL_TTS_VOICE` (default onyx).
#[derive(Debug, Clone)]
pub struct OpenAiTts {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub voice: String,
    client: reqwest::blocking::Client,
}

impl OpenAiTts {
    /// Build from environment; errors when no API key is configured.
    pub fn from_env() -> VoiceResult<Self> {
        let base_url = std::env::var("VIGIL_TTS_API_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let api_key = std::env::var("VIGIL_TTS_API_KEY")
            .map_err(|_| VoiceError::Config("TTS requires VIGIL_TTS_API_KEY".to_string()))?;
        let model = std::env::var("VIGIL_TTS_MODEL").unwrap_or_else(|_| "tts-1".to_string());
        let voice = std::env::var("VIGIL_TTS_VOICE").unwrap_or_else(|_| "onyx".to_string());
        Self::new(base_url, api_key, model, voice)
    }

    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        voice: impl Into<String>,
    ) -> VoiceResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| VoiceError::Tts(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            voice: voice.into(),
            client,
        })
    }
}

impl TtsBackend for OpenAiTts {
    fn synthesize(&self, text: &str) -> VoiceResult<Vec<u8>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let url = format!("{}/audio/speech", self.base_url.trim_end_matches('/'));
        let body = serde_json::json!({
            "model": self.model,
            "input": text,
            "voice": self.voice,
        });
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| VoiceError::Tts(e.to_string()))?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().unwrap_or_default();
            return Err(VoiceError::Tts(format!("TTS API error {}: {}", status, body)));
        }
        let bytes = res.bytes().map_err(|e| VoiceError::Tts(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Best available TTS from environment: OpenAI-compatible when a key is
/// configured, otherwise the placeholder (spoken lines go to the log).
pub fn create_best_tts() -> Box<dyn TtsBackend> {
    match OpenAiTts::from_env() {
        Ok(tts) => Box::new(tts),
        Err(e) => {
            tracing::warn!(error = %e, "no TTS backend configured; spoken lines will be logged only");
            Box::new(PlaceholderTts)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_returns_empty_audio() {
        let out = PlaceholderTts.synthesize("leave the room").unwrap();
        assert!(out.is_empty());
    }
}
