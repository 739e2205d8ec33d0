//! Surveillance loop orchestration tests: cooldown gating, disarmed frames,
//! manual control, fatal frame-source errors.

mod support;

use std::sync::atomic::AtomicBool;
use std::sync::{mpsc, Arc};
use std::time::Duration;
use support::{
    BrokenCamera, CountedFrames, CountingAlarm, FixedFaces, MemEvidenceSink, Reply, ScriptedSpeech,
};
use vigil_core::{
    AlarmDevice, EscalationConfig, EscalationEngine, EvidenceSink, FrameSource,
    GuardModeController, ManualCommand, Matcher, SpeechChannel, SurveillanceLoop, TrustedIdentity,
    ARMED_ANNOUNCEMENT, DETECTION_ANNOUNCEMENT,
};

struct Fixture {
    speech: Arc<ScriptedSpeech>,
    alarm: Arc<CountingAlarm>,
    evidence: Arc<MemEvidenceSink>,
    controller: Arc<GuardModeController>,
    commands: mpsc::Sender<ManualCommand>,
}

fn fast_engine(
    speech: Arc<ScriptedSpeech>,
    alarm: Arc<CountingAlarm>,
    evidence: Arc<MemEvidenceSink>,
) -> EscalationEngine {
    EscalationEngine::new(
        speech as Arc<dyn SpeechChannel>,
        alarm as Arc<dyn AlarmDevice>,
        evidence as Arc<dyn EvidenceSink>,
        EscalationConfig {
            listen_timeout: Duration::from_millis(1),
            phrase_limit: Duration::from_millis(1),
            settle_delay: Duration::ZERO,
            inter_level_delay: Duration::ZERO,
        },
    )
}

/// Build a loop over a frame source showing a single unenrolled face per
/// frame. The source quits the loop once its frames run out.
fn build_loop<S: FrameSource>(
    frames: S,
    armed: bool,
    trusted: Vec<TrustedIdentity>,
    replies: Vec<Reply>,
    cooldown: Duration,
    commands: (mpsc::Sender<ManualCommand>, mpsc::Receiver<ManualCommand>),
) -> (SurveillanceLoop<S>, Fixture) {
    let speech = Arc::new(ScriptedSpeech::new(replies));
    let alarm = Arc::new(CountingAlarm::default());
    let evidence = Arc::new(MemEvidenceSink::default());
    let controller = Arc::new(GuardModeController::new(armed));

    let engine = fast_engine(
        Arc::clone(&speech),
        Arc::clone(&alarm),
        Arc::clone(&evidence),
    );
    let faces = Arc::new(FixedFaces {
        embeddings: vec![vec![9.0, 9.0]],
    });

    let surveillance = SurveillanceLoop::new(
        frames,
        faces,
        Matcher::new(trusted, 0.45),
        Arc::clone(&controller),
        Arc::clone(&speech) as Arc<dyn SpeechChannel>,
        engine,
        commands.1,
        Arc::new(AtomicBool::new(false)),
        Arc::new(AtomicBool::new(false)),
        cooldown,
        Duration::ZERO,
    );

    (
        surveillance,
        Fixture {
            speech,
            alarm,
            evidence,
            controller,
            commands: commands.0,
        },
    )
}

fn announcement_count(fx: &Fixture) -> usize {
    fx.speech
        .spoken_lines()
        .iter()
        .filter(|s| s.as_str() == DETECTION_ANNOUNCEMENT)
        .count()
}

#[test]
fn cooldown_suppresses_second_trigger() {
    // Five consecutive unknown-face frames under a generous cooldown: only
    // the first may start an escalation.
    let (tx, rx) = mpsc::channel();
    let frames = CountedFrames::new(5, tx.clone());
    let (mut surveillance, fx) = build_loop(
        frames,
        true,
        Vec::new(),
        vec![Reply::Heard("sorry, I will leave")],
        Duration::from_secs(60),
        (tx, rx),
    );

    surveillance.run().unwrap();

    assert_eq!(announcement_count(&fx), 1);
    assert_eq!(fx.alarm.count(), 0);
    assert!(fx.evidence.stored().is_empty());
}

#[test]
fn elapsed_cooldown_allows_second_trigger() {
    let (tx, rx) = mpsc::channel();
    let frames = CountedFrames::new(2, tx.clone());
    let (mut surveillance, fx) = build_loop(
        frames,
        true,
        Vec::new(),
        vec![
            Reply::Heard("sorry, I will leave"),
            Reply::Heard("sorry, I will leave"),
        ],
        Duration::ZERO,
        (tx, rx),
    );

    surveillance.run().unwrap();

    assert_eq!(announcement_count(&fx), 2);
    assert_eq!(fx.alarm.count(), 0);
}

#[test]
fn disarmed_frames_never_escalate() {
    let (tx, rx) = mpsc::channel();
    let frames = CountedFrames::new(5, tx.clone());
    let (mut surveillance, fx) = build_loop(
        frames,
        false,
        Vec::new(),
        vec![Reply::Heard("no")],
        Duration::ZERO,
        (tx, rx),
    );

    surveillance.run().unwrap();

    assert_eq!(fx.alarm.count(), 0);
    assert!(fx.evidence.stored().is_empty());
    assert!(fx.speech.spoken_lines().is_empty());
}

#[test]
fn trusted_face_does_not_escalate() {
    // The fixed embedding [9.0, 9.0] is enrolled, so every frame matches.
    let trusted = vec![TrustedIdentity {
        name: "alice".into(),
        embedding: vec![9.0, 9.0],
    }];
    let (tx, rx) = mpsc::channel();
    let frames = CountedFrames::new(3, tx.clone());
    let (mut surveillance, fx) = build_loop(
        frames,
        true,
        trusted,
        vec![Reply::Heard("no")],
        Duration::ZERO,
        (tx, rx),
    );

    surveillance.run().unwrap();

    assert_eq!(fx.alarm.count(), 0);
    assert!(fx.evidence.stored().is_empty());
}

#[test]
fn manual_toggle_arms_and_announces() {
    let (tx, rx) = mpsc::channel();
    let frames = CountedFrames::new(0, tx.clone());
    let (mut surveillance, fx) =
        build_loop(frames, false, Vec::new(), Vec::new(), Duration::ZERO, (tx, rx));

    fx.commands.send(ManualCommand::ToggleArmed).unwrap();
    surveillance.run().unwrap();

    assert!(fx.controller.is_armed());
    assert_eq!(
        fx.speech.spoken_lines(),
        vec![ARMED_ANNOUNCEMENT.to_string()]
    );
}

#[test]
fn frame_source_failure_is_fatal_to_the_loop() {
    let (tx, rx) = mpsc::channel();
    let (mut surveillance, _fx) =
        build_loop(BrokenCamera, true, Vec::new(), Vec::new(), Duration::ZERO, (tx, rx));

    let err = surveillance.run().unwrap_err();
    assert!(err.to_string().contains("capture device"));
}
