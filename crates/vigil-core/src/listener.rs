//! Activation listener: converts spoken utterances into mode transitions.
//!
//! A long-running blocking loop. Each iteration performs one bounded listen,
//! so the shutdown flag is observed promptly and a transient transcription
//! error can never hang or kill the loop. While an escalation runs, the
//! surveillance loop raises the pause flag so the two never contend for the
//! microphone.

use crate::error::GuardError;
use crate::mode::GuardModeController;
use crate::traits::SpeechChannel;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Spoken after arming (voice command or manual toggle).
pub const ARMED_ANNOUNCEMENT: &str = "Guard mode activated.";

/// Spoken after disarming.
pub const DISARMED_ANNOUNCEMENT: &str = "Guard mode deactivated.";

/// Sleep granularity while paused (microphone handed to the escalation engine).
const PAUSE_POLL: Duration = Duration::from_millis(200);

/// Continuous voice activation/deactivation loop.
pub struct ActivationListener {
    speech: Arc<dyn SpeechChannel>,
    controller: Arc<GuardModeController>,
    shutdown: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
    activation_phrase: String,
    deactivation_phrase: String,
    listen_timeout: Duration,
    phrase_limit: Duration,
    error_backoff: Duration,
}

impl ActivationListener {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        speech: Arc<dyn SpeechChannel>,
        controller: Arc<GuardModeController>,
        shutdown: Arc<AtomicBool>,
        paused: Arc<AtomicBool>,
        activation_phrase: impl Into<String>,
        deactivation_phrase: impl Into<String>,
        listen_timeout: Duration,
        phrase_limit: Duration,
        error_backoff: Duration,
    ) -> Self {
        Self {
            speech,
            controller,
            shutdown,
            paused,
            activation_phrase: activation_phrase.into().to_lowercase(),
            deactivation_phrase: deactivation_phrase.into().to_lowercase(),
            listen_timeout,
            phrase_limit,
            error_backoff,
        }
    }

    /// Run until the shutdown flag is set. Blocking; intended for a
    /// dedicated blocking task or thread.
    pub fn run(&self) {
        info!(
            activation = %self.activation_phrase,
            deactivation = %self.deactivation_phrase,
            "activation listener started"
        );
        while !self.shutdown.load(Ordering::SeqCst) {
            if self.paused.load(Ordering::SeqCst) {
                std::thread::sleep(PAUSE_POLL);
                continue;
            }
            match self.speech.listen(self.listen_timeout, self.phrase_limit) {
                Ok(text) => self.handle_transcript(&text),
                Err(GuardError::Listen(e)) => {
                    warn!(error = %e, "transcription service error; backing off");
                    std::thread::sleep(self.error_backoff);
                }
                Err(e) => {
                    warn!(error = %e, "unexpected listen error; backing off");
                    std::thread::sleep(self.error_backoff);
                }
            }
        }
        info!("activation listener stopped");
    }

    fn handle_transcript(&self, text: &str) {
        let text = text.trim().to_lowercase();
        if text.is_empty() {
            return;
        }
        debug!(heard = %text, "activation listener transcript");

        if text.contains(&self.activation_phrase) && !self.controller.is_armed() {
            self.controller.set_armed(true);
            info!("guard mode -> armed (voice)");
            self.announce(ARMED_ANNOUNCEMENT);
        } else if text.contains(&self.deactivation_phrase) && self.controller.is_armed() {
            self.controller.set_armed(false);
            info!("guard mode -> disarmed (voice)");
            self.announce(DISARMED_ANNOUNCEMENT);
        }
        // Any other transcript is ignored.
    }

    fn announce(&self, text: &str) {
        if let Err(e) = self.speech.speak(text) {
            warn!(error = %e, "mode announcement failed");
        }
    }
}
