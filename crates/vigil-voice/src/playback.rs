//! Blocking TTS playback on a dedicated thread.
//!
//! `rodio::OutputStream` is not `Send` on some platforms, so the sink lives
//! on its own thread; callers submit audio bytes and block on an ack that
//! fires when playback has drained. That gives the speech channel the
//! "speak blocks until audible completion" contract while staying
//! `Send + Sync` itself.

use crate::error::{VoiceError, VoiceResult};
use rodio::{Decoder, OutputStream, Sink, Source};
use std::io::Cursor;
use std::sync::mpsc::{self, Sender};
use std::sync::Mutex;
use tracing::{info, warn};

struct PlaybackJob {
    bytes: Vec<u8>,
    done: Sender<VoiceResult<()>>,
}

/// Handle to the playback thread. Dropping it stops the thread.
pub struct PlaybackHandle {
    jobs: Mutex<Sender<PlaybackJob>>,
}

impl PlaybackHandle {
    /// Spawn the playback thread on the default output device. Fails fast
    /// when no output device is available.
    pub fn spawn() -> VoiceResult<Self> {
        let (jobs_tx, jobs_rx) = mpsc::channel::<PlaybackJob>();
        let (ready_tx, ready_rx) = mpsc::channel::<VoiceResult<()>>();

        std::thread::spawn(move || {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    let _ = ready_tx.send(Err(VoiceError::Playback(e.to_string())));
                    return;
                }
            };
            let sink = match Sink::try_new(&handle) {
                Ok(sink) => sink,
                Err(e) => {
                    let _ = ready_tx.send(Err(VoiceError::Playback(e.to_string())));
                    return;
                }
            };
            let _ = ready_tx.send(Ok(()));
            // Keep the stream alive for the thread's lifetime.
            let _stream = stream;

            while let Ok(job) = jobs_rx.recv() {
                let result = play_on_sink(&sink, job.bytes);
                let _ = job.done.send(result);
            }
            info!("playback thread stopped");
        });

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                jobs: Mutex::new(jobs_tx),
            }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(VoiceError::Playback("playback thread died".to_string())),
        }
    }

    /// Play audio bytes (WAV/MP3), blocking until the sink drains.
    pub fn play_blocking(&self, bytes: Vec<u8>) -> VoiceResult<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        let (done_tx, done_rx) = mpsc::channel();
        let job = PlaybackJob {
            bytes,
            done: done_tx,
        };
        self.jobs
            .lock()
            .map_err(|e| VoiceError::Playback(format!("job lock poisoned: {}", e)))?
            .send(job)
            .map_err(|_| VoiceError::Playback("playback thread gone".to_string()))?;
        done_rx
            .recv()
            .map_err(|_| VoiceError::Playback("playback thread gone".to_string()))?
    }
}

fn play_on_sink(sink: &Sink, bytes: Vec<u8>) -> VoiceResult<()> {
    let source = Decoder::new(Cursor::new(bytes))
        .map_err(|e| VoiceError::Playback(format!("decode failed: {}", e)))?;
    sink.append(source.convert_samples::<f32>());
    sink.sleep_until_end();
    Ok(())
}

/// Play audio on a freshly opened output stream, detached from the caller.
/// Used by the alarm device; failures are logged, never returned.
pub(crate) fn play_detached(bytes: Vec<u8>) {
    std::thread::spawn(move || {
        let (stream, handle) = match OutputStream::try_default() {
            Ok(pair) => pair,
            Err(e) => {
                warn!(error = %e, "alarm playback: no output device");
                return;
            }
        };
        let _stream = stream;
        let sink = match Sink::try_new(&handle) {
            Ok(sink) => sink,
            Err(e) => {
                warn!(error = %e, "alarm playback: sink init failed");
                return;
            }
        };
        match Decoder::new(Cursor::new(bytes)) {
            Ok(source) => {
                sink.append(source.convert_samples::<f32>());
                sink.sleep_until_end();
            }
            Err(e) => warn!(error = %e, "alarm playback: decode failed"),
        }
    });
}
