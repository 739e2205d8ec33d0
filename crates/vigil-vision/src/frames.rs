//! Snapshot-directory frame source.
//!
//! A camera process (or anything else) drops encoded images into a watch
//! directory; `next_frame` returns each new file once, newest first. The
//! core never decodes the bytes, so any encoder works as long as the
//! evidence viewer can read it.

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};
use vigil_core::{Frame, FrameSource, GuardError, GuardResult};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Polls a directory for new image files.
pub struct WatchDirFrameSource {
    dir: PathBuf,
    last_mtime: Option<SystemTime>,
}

impl WatchDirFrameSource {
    /// Open the watch directory, creating it when absent. An unusable
    /// directory is the camera-cannot-open failure class: fatal here.
    pub fn new(dir: impl Into<PathBuf>) -> GuardResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| GuardError::Vision(format!("frame dir {} unusable: {}", dir.display(), e)))?;
        info!(dir = %dir.display(), "watching for frames");
        Ok(Self {
            dir,
            last_mtime: None,
        })
    }

    fn newest_image(&self) -> GuardResult<Option<(PathBuf, SystemTime)>> {
        let entries = std::fs::read_dir(&self.dir)
            .map_err(|e| GuardError::Vision(format!("frame dir read failed: {}", e)))?;
        let mut newest: Option<(PathBuf, SystemTime)> = None;
        for entry in entries.flatten() {
            let path = entry.path();
            if !is_image(&path) {
                continue;
            }
            let mtime = match entry.metadata().and_then(|m| m.modified()) {
                Ok(t) => t,
                Err(_) => continue,
            };
            if newest.as_ref().map_or(true, |(_, t)| mtime > *t) {
                newest = Some((path, mtime));
            }
        }
        Ok(newest)
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

impl FrameSource for WatchDirFrameSource {
    /// Return the newest image not yet seen, or `None` when nothing new has
    /// arrived since the last call.
    fn next_frame(&mut self) -> GuardResult<Option<Frame>> {
        let Some((path, mtime)) = self.newest_image()? else {
            return Ok(None);
        };
        if self.last_mtime.map_or(false, |seen| mtime <= seen) {
            return Ok(None);
        }
        let bytes = std::fs::read(&path)
            .map_err(|e| GuardError::Vision(format!("frame read failed: {}", e)))?;
        self.last_mtime = Some(mtime);
        debug!(file = %path.display(), bytes = bytes.len(), "new frame");
        Ok(Some(Frame::new(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn empty_directory_yields_no_frame() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = WatchDirFrameSource::new(dir.path()).unwrap();
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn each_new_file_is_returned_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = WatchDirFrameSource::new(dir.path()).unwrap();

        std::fs::write(dir.path().join("one.jpg"), b"first").unwrap();
        let frame = source.next_frame().unwrap().unwrap();
        assert_eq!(frame.bytes, b"first");
        assert!(source.next_frame().unwrap().is_none());

        // Coarse mtime resolution on some filesystems.
        std::thread::sleep(Duration::from_millis(1100));
        std::fs::write(dir.path().join("two.jpg"), b"second").unwrap();
        let frame = source.next_frame().unwrap().unwrap();
        assert_eq!(frame.bytes, b"second");
    }

    #[test]
    fn non_image_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = WatchDirFrameSource::new(dir.path()).unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"not a frame").unwrap();
        assert!(source.next_frame().unwrap().is_none());
    }
}
