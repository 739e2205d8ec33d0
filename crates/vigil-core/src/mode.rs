//! Guard mode controller: the shared armed/disarmed flag.
//!
//! Exactly two writers (activation listener, manual input) and one reader
//! (surveillance loop) touch this concurrently; all operations are lock-free
//! and non-blocking. Spoken/logged confirmation after a transition is the
//! caller's responsibility, which keeps the controller trivially testable.

use std::sync::atomic::{AtomicBool, Ordering};

/// Thread-safe armed/disarmed flag.
#[derive(Debug, Default)]
pub struct GuardModeController {
    armed: AtomicBool,
}

impl GuardModeController {
    /// Create a controller in the given initial state.
    pub fn new(armed: bool) -> Self {
        Self {
            armed: AtomicBool::new(armed),
        }
    }

    /// Non-blocking read of the current mode.
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    /// Atomically set the mode; returns the previous value. Arming while
    /// already armed (and disarming while disarmed) is a harmless no-op.
    pub fn set_armed(&self, armed: bool) -> bool {
        self.armed.swap(armed, Ordering::SeqCst)
    }

    /// Atomically flip the mode; returns the new value.
    pub fn toggle(&self) -> bool {
        !self.armed.fetch_xor(true, Ordering::SeqCst)
    }
}
