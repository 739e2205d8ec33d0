//! Guard configuration loaded from the environment.
//!
//! All values are fixed at process start; there is no reload. Unset or
//! unparseable variables fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_activation_phrase() -> String {
    "protect my room".to_string()
}

fn default_deactivation_phrase() -> String {
    "stop".to_string()
}

fn default_match_threshold() -> f32 {
    0.45
}

fn default_cooldown_secs() -> u64 {
    10
}

fn default_listen_timeout_secs() -> u64 {
    10
}

fn default_listener_phrase_limit_secs() -> u64 {
    4
}

fn default_settle_delay_ms() -> u64 {
    1000
}

fn default_inter_level_delay_ms() -> u64 {
    2000
}

fn default_listener_backoff_ms() -> u64 {
    2000
}

fn default_frame_poll_ms() -> u64 {
    100
}

fn default_enroll_dir() -> String {
    "trusted_faces".to_string()
}

fn default_evidence_dir() -> String {
    "evidence".to_string()
}

fn default_alarm_file() -> String {
    "alarm.wav".to_string()
}

fn default_frame_dir() -> String {
    "frames".to_string()
}

/// Guard agent configuration.
///
/// | Env | Default | Description |
/// |-----|---------|-------------|
/// | VIGIL_ACTIVATION_PHRASE | protect my room | Spoken phrase that arms the guard. |
/// | VIGIL_DEACTIVATION_PHRASE | stop | Spoken phrase that disarms the guard. |
/// | VIGIL_MATCH_THRESHOLD | 0.45 | Embedding distance below which a face is trusted. |
/// | VIGIL_COOLDOWN_SECS | 10 | Minimum seconds between escalation starts. |
/// | VIGIL_LISTEN_TIMEOUT_SECS | 10 | Listen timeout per escalation level (also the phrase limit). |
/// | VIGIL_LISTENER_PHRASE_LIMIT_SECS | 4 | Phrase limit for the activation listener. |
/// | VIGIL_SETTLE_DELAY_MS | 1000 | Pause after a prompt before listening starts. |
/// | VIGIL_INTER_LEVEL_DELAY_MS | 2000 | Pause between escalation levels. |
/// | VIGIL_LISTENER_BACKOFF_MS | 2000 | Backoff after a transient transcription error. |
/// | VIGIL_FRAME_POLL_MS | 100 | Sleep between frame polls when the source is idle. |
/// | VIGIL_ENROLL_DIR | trusted_faces | Directory of trusted embedding files. |
/// | VIGIL_EVIDENCE_DIR | evidence | Directory where evidence records are written. |
/// | VIGIL_ALARM_FILE | alarm.wav | Alarm audio file (WAV/MP3). |
/// | VIGIL_FRAME_DIR | frames | Snapshot directory watched for new frames. |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    #[serde(default = "default_activation_phrase")]
    pub activation_phrase: String,
    #[serde(default = "default_deactivation_phrase")]
    pub deactivation_phrase: String,
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f32,
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
    #[serde(default = "default_listen_timeout_secs")]
    pub listen_timeout_secs: u64,
    #[serde(default = "default_listener_phrase_limit_secs")]
    pub listener_phrase_limit_secs: u64,
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_inter_level_delay_ms")]
    pub inter_level_delay_ms: u64,
    #[serde(default = "default_listener_backoff_ms")]
    pub listener_backoff_ms: u64,
    #[serde(default = "default_frame_poll_ms")]
    pub frame_poll_ms: u64,
    #[serde(default = "default_enroll_dir")]
    pub enroll_dir: String,
    #[serde(default = "default_evidence_dir")]
    pub evidence_dir: String,
    #[serde(default = "default_alarm_file")]
    pub alarm_file: String,
    #[serde(default = "default_frame_dir")]
    pub frame_dir: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            activation_phrase: default_activation_phrase(),
            deactivation_phrase: default_deactivation_phrase(),
            match_threshold: default_match_threshold(),
            cooldown_secs: default_cooldown_secs(),
            listen_timeout_secs: default_listen_timeout_secs(),
            listener_phrase_limit_secs: default_listener_phrase_limit_secs(),
            settle_delay_ms: default_settle_delay_ms(),
            inter_level_delay_ms: default_inter_level_delay_ms(),
            listener_backoff_ms: default_listener_backoff_ms(),
            frame_poll_ms: default_frame_poll_ms(),
            enroll_dir: default_enroll_dir(),
            evidence_dir: default_evidence_dir(),
            alarm_file: default_alarm_file(),
            frame_dir: default_frame_dir(),
        }
    }
}

fn env_string(key: &str, default: String) -> String {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default,
    }
}

fn env_f32(key: &str, default: f32) -> f32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<f32>().ok())
        .unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

impl GuardConfig {
    /// Load from environment. Unset or invalid => defaults (see field docs).
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            activation_phrase: env_string("VIGIL_ACTIVATION_PHRASE", d.activation_phrase)
                .to_lowercase(),
            deactivation_phrase: env_string("VIGIL_DEACTIVATION_PHRASE", d.deactivation_phrase)
                .to_lowercase(),
            match_threshold: env_f32("VIGIL_MATCH_THRESHOLD", d.match_threshold),
            cooldown_secs: env_u64("VIGIL_COOLDOWN_SECS", d.cooldown_secs),
            listen_timeout_secs: env_u64("VIGIL_LISTEN_TIMEOUT_SECS", d.listen_timeout_secs),
            listener_phrase_limit_secs: env_u64(
                "VIGIL_LISTENER_PHRASE_LIMIT_SECS",
                d.listener_phrase_limit_secs,
            ),
            settle_delay_ms: env_u64("VIGIL_SETTLE_DELAY_MS", d.settle_delay_ms),
            inter_level_delay_ms: env_u64("VIGIL_INTER_LEVEL_DELAY_MS", d.inter_level_delay_ms),
            listener_backoff_ms: env_u64("VIGIL_LISTENER_BACKOFF_MS", d.listener_backoff_ms),
            frame_poll_ms: env_u64("VIGIL_FRAME_POLL_MS", d.frame_poll_ms),
            enroll_dir: env_string("VIGIL_ENROLL_DIR", d.enroll_dir),
            evidence_dir: env_string("VIGIL_EVIDENCE_DIR", d.evidence_dir),
            alarm_file: env_string("VIGIL_ALARM_FILE", d.alarm_file),
            frame_dir: env_string("VIGIL_FRAME_DIR", d.frame_dir),
        }
    }

    /// Minimum elapsed time between the start of successive escalations.
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    /// Per-level listen timeout during escalation.
    pub fn listen_timeout(&self) -> Duration {
        Duration::from_secs(self.listen_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_field_docs() {
        let c = GuardConfig::default();
        assert_eq!(c.activation_phrase, "protect my room");
        assert_eq!(c.deactivation_phrase, "stop");
        assert!((c.match_threshold - 0.45).abs() < f32::EPSILON);
        assert_eq!(c.cooldown_secs, 10);
        assert_eq!(c.listen_timeout_secs, 10);
        assert_eq!(c.settle_delay_ms, 1000);
        assert_eq!(c.inter_level_delay_ms, 2000);
    }
}
