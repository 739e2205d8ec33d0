//! vigil-core: guard state and escalation engine for the room-guard agent.
//!
//! Owns the armed/disarmed mode, the escalation cooldown, the per-detection
//! decision of whether to escalate, and the three-round escalation dialogue
//! (prompt → listen → classify → branch). Audio, vision, and persistence are
//! consumed through the collaborator traits in [`traits`]; vigil-voice and
//! vigil-vision provide the real backends.

mod config;
mod enroll;
mod error;
mod escalation;
mod evidence;
mod judge;
mod listener;
mod matcher;
mod mode;
mod surveillance;
mod traits;

pub use config::GuardConfig;
pub use enroll::load_trusted;
pub use error::{GuardError, GuardResult};
pub use escalation::{
    EscalationAction, EscalationConfig, EscalationEngine, EscalationOutcome, DETECTION_ANNOUNCEMENT,
    ESCALATION_PROMPTS, FINAL_WARNING, RECORD_WARNING, STAND_DOWN_ACK,
};
pub use evidence::EvidenceRecord;
pub use judge::{judge_reply, ReplyJudgement};
pub use listener::{ActivationListener, ARMED_ANNOUNCEMENT, DISARMED_ANNOUNCEMENT};
pub use matcher::{MatchVerdict, Matcher, TrustedIdentity};
pub use mode::GuardModeController;
pub use surveillance::{ManualCommand, SurveillanceLoop};
pub use traits::{AlarmDevice, EvidenceSink, FaceReader, Frame, FrameSource, SpeechChannel};
