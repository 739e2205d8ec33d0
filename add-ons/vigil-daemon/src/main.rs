//! Room-guard daemon.
//!
//! Two long-lived tasks share the guard mode controller: the activation
//! listener (voice arm/disarm) and the surveillance loop (frames → verdicts
//! → escalation). Manual control comes from stdin: `a` toggles guard mode,
//! `q` quits. CTRL-C also shuts everything down.

use anyhow::Context;
use std::io::BufRead;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vigil_core::{
    load_trusted, ActivationListener, EscalationConfig, EscalationEngine, FaceReader, GuardConfig,
    GuardModeController, ManualCommand, Matcher, SpeechChannel, SurveillanceLoop,
};
use vigil_vision::{FsEvidenceSink, HttpFaceReader, PlaceholderFaceReader, WatchDirFrameSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (before any env::var calls).
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[vigil-daemon] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GuardConfig::from_env();
    tracing::info!(
        activation = %config.activation_phrase,
        cooldown_secs = config.cooldown_secs,
        threshold = config.match_threshold,
        "vigil daemon starting"
    );

    // Trusted identities: missing enrollment degrades to always-unknown.
    let trusted = load_trusted(Path::new(&config.enroll_dir));
    let matcher = Matcher::new(trusted, config.match_threshold);

    // Audio: best-effort backends from env, placeholders when unconfigured.
    let speech: Arc<dyn SpeechChannel> = Arc::new(
        vigil_voice::MicSpeechChannel::from_env().context("speech channel init failed")?,
    );
    let alarm = Arc::new(
        vigil_voice::RodioAlarm::load(Path::new(&config.alarm_file))
            .context("alarm device init failed")?,
    );
    let evidence = Arc::new(
        FsEvidenceSink::new(&config.evidence_dir).context("evidence sink init failed")?,
    );

    let faces: Arc<dyn FaceReader> = match HttpFaceReader::from_env() {
        Ok(reader) => Arc::new(reader),
        Err(e) => {
            tracing::warn!(error = %e, "no face API configured; frames will show no faces");
            Arc::new(PlaceholderFaceReader::new())
        }
    };
    let frames =
        WatchDirFrameSource::new(&config.frame_dir).context("frame source init failed")?;

    let controller = Arc::new(GuardModeController::new(false));
    let shutdown = Arc::new(AtomicBool::new(false));
    let listener_paused = Arc::new(AtomicBool::new(false));
    let (command_tx, command_rx) = mpsc::channel::<ManualCommand>();

    // Activation listener task.
    let listener = ActivationListener::new(
        Arc::clone(&speech),
        Arc::clone(&controller),
        Arc::clone(&shutdown),
        Arc::clone(&listener_paused),
        config.activation_phrase.clone(),
        config.deactivation_phrase.clone(),
        Duration::from_secs(config.listen_timeout_secs),
        Duration::from_secs(config.listener_phrase_limit_secs),
        Duration::from_millis(config.listener_backoff_ms),
    );
    let listener_task = tokio::task::spawn_blocking(move || listener.run());

    // Manual control: stdin lines -> commands.
    spawn_stdin_reader(command_tx);

    // Surveillance loop task (blocking; the escalation call stalls it by design).
    let engine = EscalationEngine::new(
        Arc::clone(&speech),
        alarm,
        evidence,
        EscalationConfig {
            listen_timeout: config.listen_timeout(),
            phrase_limit: config.listen_timeout(),
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            inter_level_delay: Duration::from_millis(config.inter_level_delay_ms),
        },
    );
    let mut surveillance = SurveillanceLoop::new(
        frames,
        faces,
        matcher,
        Arc::clone(&controller),
        Arc::clone(&speech),
        engine,
        command_rx,
        Arc::clone(&shutdown),
        listener_paused,
        config.cooldown(),
        Duration::from_millis(config.frame_poll_ms),
    );
    let surveillance_task = tokio::task::spawn_blocking(move || surveillance.run());

    tracing::info!("vigil daemon running; press 'a' to toggle guard, 'q' to quit");

    tokio::select! {
        result = surveillance_task => {
            match result {
                Ok(Ok(())) => tracing::info!("surveillance loop exited"),
                Ok(Err(e)) => tracing::error!(error = %e, "surveillance loop failed"),
                Err(e) => tracing::error!(error = %e, "surveillance task panicked"),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("CTRL-C received; shutting down");
        }
    }

    // Signal the listener; its bounded listen finishes or times out first.
    shutdown.store(true, Ordering::SeqCst);
    let _ = listener_task.await;
    tracing::info!("vigil daemon stopped");
    Ok(())
}

/// Reads stdin lines on a detached thread: `a` toggles guard mode, `q`
/// quits. The thread ends when stdin closes or the receiver is gone.
fn spawn_stdin_reader(commands: mpsc::Sender<ManualCommand>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let command = match line.trim() {
                "a" => ManualCommand::ToggleArmed,
                "q" => ManualCommand::Quit,
                _ => continue,
            };
            let quit = command == ManualCommand::Quit;
            if commands.send(command).is_err() || quit {
                break;
            }
        }
    });
}
