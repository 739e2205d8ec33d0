//! The audible alarm device.

use crate::playback::play_detached;
use crate::{VoiceError, VoiceResult};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use vigil_core::AlarmDevice;

/// Plays a pre-loaded alert sound asynchronously via rodio. The file is
/// read once at startup so a missing alarm is caught before arming, not
/// during an escalation.
#[derive(Debug)]
pub struct RodioAlarm {
    bytes: Arc<Vec<u8>>,
}

impl RodioAlarm {
    /// Load the alarm audio (WAV/MP3) from disk.
    pub fn load(path: &Path) -> VoiceResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            VoiceError::Config(format!("alarm file {} unavailable: {}", path.display(), e))
        })?;
        if bytes.is_empty() {
            return Err(VoiceError::Config(format!(
                "alarm file {} is empty",
                path.display()
            )));
        }
        info!(file = %path.display(), bytes = bytes.len(), "alarm audio loaded");
        Ok(Self {
            bytes: Arc::new(bytes),
        })
    }
}

impl AlarmDevice for RodioAlarm {
    /// Fire-and-forget: playback runs on a detached thread and this returns
    /// immediately, so the escalation protocol is never stalled.
    fn play_alert(&self) {
        info!("alarm triggered");
        play_detached(self.bytes.as_ref().clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_alarm_file_is_a_config_error() {
        let err = RodioAlarm::load(Path::new("/nonexistent/alarm.wav")).unwrap_err();
        assert!(matches!(err, VoiceError::Config(_)));
    }

    #[test]
    fn empty_alarm_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alarm.wav");
        std::fs::write(&path, b"").unwrap();
        let err = RodioAlarm::load(&path).unwrap_err();
        assert!(matches!(err, VoiceError::Config(_)));
    }
}
