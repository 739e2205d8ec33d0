//! Surveillance loop: the orchestrator.
//!
//! Per frame, when armed: read the most prominent face, match it against the
//! trusted set, and, on an unknown verdict with the cooldown elapsed, run
//! the escalation engine against the snapshot. The engine call blocks this
//! loop for the full protocol; that stall is deliberate (a human dialogue
//! cannot usefully be interleaved with continued detection) and also
//! guarantees escalations never overlap, so the cooldown timestamp needs no
//! cross-task synchronization.

use crate::error::GuardResult;
use crate::escalation::{EscalationEngine, EscalationOutcome, DETECTION_ANNOUNCEMENT};
use crate::listener::{ARMED_ANNOUNCEMENT, DISARMED_ANNOUNCEMENT};
use crate::matcher::Matcher;
use crate::mode::GuardModeController;
use crate::traits::{FaceReader, FrameSource, SpeechChannel};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Manual control surface: the key-press equivalents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualCommand {
    /// Toggle armed/disarmed (the 'a' key).
    ToggleArmed,
    /// Stop the surveillance loop (the 'q' key).
    Quit,
}

/// The main sensing loop. Owns the frame source and the escalation call.
pub struct SurveillanceLoop<S: FrameSource> {
    frames: S,
    faces: Arc<dyn FaceReader>,
    matcher: Matcher,
    controller: Arc<GuardModeController>,
    speech: Arc<dyn SpeechChannel>,
    engine: EscalationEngine,
    commands: Receiver<ManualCommand>,
    shutdown: Arc<AtomicBool>,
    listener_paused: Arc<AtomicBool>,
    cooldown: Duration,
    frame_poll: Duration,
    last_escalation_start: Option<Instant>,
}

impl<S: FrameSource> SurveillanceLoop<S> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        frames: S,
        faces: Arc<dyn FaceReader>,
        matcher: Matcher,
        controller: Arc<GuardModeController>,
        speech: Arc<dyn SpeechChannel>,
        engine: EscalationEngine,
        commands: Receiver<ManualCommand>,
        shutdown: Arc<AtomicBool>,
        listener_paused: Arc<AtomicBool>,
        cooldown: Duration,
        frame_poll: Duration,
    ) -> Self {
        Self {
            frames,
            faces,
            matcher,
            controller,
            speech,
            engine,
            commands,
            shutdown,
            listener_paused,
            cooldown,
            frame_poll,
            last_escalation_start: None,
        }
    }

    /// Run until a quit command or shutdown. A frame source failure is fatal
    /// to this loop only and is returned to the caller.
    pub fn run(&mut self) -> GuardResult<()> {
        info!(
            trusted = self.matcher.trusted_count(),
            cooldown_secs = self.cooldown.as_secs(),
            "surveillance loop started"
        );

        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                info!("surveillance loop: shutdown flag set");
                return Ok(());
            }
            if self.drain_commands() {
                return Ok(());
            }

            let frame = match self.frames.next_frame()? {
                Some(frame) => frame,
                None => {
                    std::thread::sleep(self.frame_poll);
                    continue;
                }
            };

            if !self.controller.is_armed() {
                continue;
            }

            let embeddings = match self.faces.read_faces(&frame) {
                Ok(e) => e,
                Err(e) => {
                    // Transient sensor error: log and keep scanning.
                    warn!(error = %e, "face reader failed on frame");
                    continue;
                }
            };
            let Some(embedding) = embeddings.first() else {
                continue;
            };

            let verdict = self.matcher.match_embedding(embedding);
            debug!(label = verdict.label(), "frame verdict");
            if !verdict.is_unknown() {
                continue;
            }

            if !self.cooldown_elapsed() {
                debug!("unknown face within cooldown; not escalating");
                continue;
            }

            // Stamp the cooldown before the blocking engine call so a
            // subsequent frame cannot re-trigger while this run is in flight.
            self.last_escalation_start = Some(Instant::now());
            info!("unknown face detected; starting escalation");
            if let Err(e) = self.speech.speak(DETECTION_ANNOUNCEMENT) {
                warn!(error = %e, "detection announcement failed");
            }

            let outcome = self.escalate(&frame.bytes);
            info!(
                action = ?outcome.action,
                level = outcome.level,
                "escalation finished"
            );
        }
    }

    fn cooldown_elapsed(&self) -> bool {
        match self.last_escalation_start {
            Some(start) => start.elapsed() > self.cooldown,
            None => true,
        }
    }

    /// Run the engine with the activation listener paused, so the two never
    /// listen on the microphone simultaneously.
    fn escalate(&self, snapshot: &[u8]) -> EscalationOutcome {
        self.listener_paused.store(true, Ordering::SeqCst);
        let outcome = self.engine.run(snapshot);
        self.listener_paused.store(false, Ordering::SeqCst);
        outcome
    }

    /// Handle pending manual commands. Returns true when the loop should exit.
    fn drain_commands(&self) -> bool {
        while let Ok(command) = self.commands.try_recv() {
            match command {
                ManualCommand::ToggleArmed => {
                    let armed = self.controller.toggle();
                    info!(armed, "guard mode toggled (manual)");
                    let announcement = if armed {
                        ARMED_ANNOUNCEMENT
                    } else {
                        DISARMED_ANNOUNCEMENT
                    };
                    if let Err(e) = self.speech.speak(announcement) {
                        warn!(error = %e, "mode announcement failed");
                    }
                }
                ManualCommand::Quit => {
                    info!("quit requested");
                    return true;
                }
            }
        }
        false
    }
}
