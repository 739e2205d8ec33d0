//! The three-level escalation engine.
//!
//! A bounded-depth conversational state machine, executed synchronously once
//! triggered: for each level, speak the prompt, wait a settle delay, listen,
//! classify the reply, and branch. A cooperative reply stands the guard
//! down; a defiant reply (or an unresolved level 3) fires the alarm and
//! persists evidence. Exactly one outcome per invocation, at most one alarm
//! trigger and one evidence write, never on a stand-down.

use crate::error::GuardError;
use crate::evidence::EvidenceRecord;
use crate::judge::{judge_reply, ReplyJudgement};
use crate::traits::{AlarmDevice, EvidenceSink, SpeechChannel};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Fixed prompts for levels 1 through 3. There is no level 4; an unresolved
/// level 3 is itself a terminal outcome.
pub const ESCALATION_PROMPTS: [&str; 3] = [
    "Hello. Who are you and why are you in this room?",
    "This is not your room. Leave the room immediately",
    "Leave this room right now. I am recording this.",
];

/// Spoken before the surveillance loop hands over to the engine.
pub const DETECTION_ANNOUNCEMENT: &str = "Unknown person detected. Starting verification.";

/// Spoken on a cooperative reply before standing down.
pub const STAND_DOWN_ACK: &str = "Thank you. I will stand down.";

/// Spoken on a defiant reply before recording evidence.
pub const RECORD_WARNING: &str = "You are not authorized. Recording evidence.";

/// Spoken when level 3 completes without resolution.
pub const FINAL_WARNING: &str = "Final warning. Recording evidence and triggering alarm.";

/// Timing knobs for one escalation run.
#[derive(Debug, Clone)]
pub struct EscalationConfig {
    /// Bound on the wait for a reply at each level.
    pub listen_timeout: Duration,
    /// Bound on the reply utterance itself.
    pub phrase_limit: Duration,
    /// Grace period after each prompt before listening starts. Applies
    /// uniformly to every level, level 1 included.
    pub settle_delay: Duration,
    /// Pause before moving to the next level.
    pub inter_level_delay: Duration,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            listen_timeout: Duration::from_secs(10),
            phrase_limit: Duration::from_secs(10),
            settle_delay: Duration::from_millis(1000),
            inter_level_delay: Duration::from_millis(2000),
        }
    }
}

/// Terminal action of an escalation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationAction {
    /// Subject cooperated; no evidence, no alarm.
    StandDown,
    /// Evidence persisted and alarm fired.
    RecordAndWarn,
}

/// Result of one escalation run.
#[derive(Debug, Clone)]
pub struct EscalationOutcome {
    pub action: EscalationAction,
    /// Level at which the run terminated (1..=3).
    pub level: u8,
    /// `(level, transcript)` pairs collected up to termination.
    pub transcripts: Vec<(u8, String)>,
}

/// Runs the escalation protocol against a snapshot. Blocks the caller for
/// the full duration of the run (multiple speak/listen round-trips).
pub struct EscalationEngine {
    speech: Arc<dyn SpeechChannel>,
    alarm: Arc<dyn AlarmDevice>,
    evidence: Arc<dyn EvidenceSink>,
    config: EscalationConfig,
}

impl EscalationEngine {
    pub fn new(
        speech: Arc<dyn SpeechChannel>,
        alarm: Arc<dyn AlarmDevice>,
        evidence: Arc<dyn EvidenceSink>,
        config: EscalationConfig,
    ) -> Self {
        Self {
            speech,
            alarm,
            evidence,
            config,
        }
    }

    /// Execute levels 1 → 3 strictly in order against `snapshot`. Returns
    /// exactly one outcome; speech failures never abort the run.
    pub fn run(&self, snapshot: &[u8]) -> EscalationOutcome {
        info!("starting escalation");
        let mut transcripts: Vec<(u8, String)> = Vec::new();

        for (idx, prompt) in ESCALATION_PROMPTS.iter().enumerate() {
            let level = (idx + 1) as u8;
            info!(level, prompt, "escalation prompt");
            self.say(prompt);

            // Give the subject time to process the prompt before listening.
            std::thread::sleep(self.config.settle_delay);

            let transcript = self.listen_for_reply(level);
            info!(level, transcript = %transcript, "reply transcript");
            transcripts.push((level, transcript.clone()));

            let judgement = judge_reply(&transcript);
            info!(level, ?judgement, "reply judged");

            match judgement {
                ReplyJudgement::Ok => {
                    self.say(STAND_DOWN_ACK);
                    return EscalationOutcome {
                        action: EscalationAction::StandDown,
                        level,
                        transcripts,
                    };
                }
                ReplyJudgement::Refuse => {
                    self.say(RECORD_WARNING);
                    self.alarm.play_alert();
                    self.store_evidence(snapshot, vec![(level, transcript)]);
                    return EscalationOutcome {
                        action: EscalationAction::RecordAndWarn,
                        level,
                        transcripts,
                    };
                }
                ReplyJudgement::Suspicious | ReplyJudgement::NoResponse => {
                    if level < 3 {
                        std::thread::sleep(self.config.inter_level_delay);
                    }
                }
            }
        }

        // Level 3 completed without resolution.
        self.say(FINAL_WARNING);
        self.alarm.play_alert();
        self.store_evidence(snapshot, transcripts.clone());
        EscalationOutcome {
            action: EscalationAction::RecordAndWarn,
            level: 3,
            transcripts,
        }
    }

    /// Speak, absorbing failures: a broken speaker must not abort the run.
    fn say(&self, text: &str) {
        if let Err(e) = self.speech.speak(text) {
            warn!(error = %e, "speak failed");
        }
    }

    /// Listen for one reply. Timeout and unintelligible audio arrive as an
    /// empty transcript from the channel; transport errors degrade to empty
    /// here so the protocol always continues.
    fn listen_for_reply(&self, level: u8) -> String {
        match self
            .speech
            .listen(self.config.listen_timeout, self.config.phrase_limit)
        {
            Ok(t) => t,
            Err(GuardError::Listen(e)) => {
                warn!(level, error = %e, "listen transport failure; treating as no response");
                String::new()
            }
            Err(e) => {
                warn!(level, error = %e, "listen failed; treating as no response");
                String::new()
            }
        }
    }

    /// Persist evidence; failures are logged and do not change the outcome.
    fn store_evidence(&self, snapshot: &[u8], transcripts: Vec<(u8, String)>) {
        let record = EvidenceRecord::new(snapshot.to_vec(), transcripts);
        info!(id = %record.id, "storing evidence record");
        if let Err(e) = self.evidence.store(&record) {
            warn!(id = %record.id, error = %e, "evidence store failed");
        }
    }
}
