//! Filesystem evidence sink.

use std::path::PathBuf;
use tracing::info;
use vigil_core::{EvidenceRecord, EvidenceSink, GuardError, GuardResult};

/// Writes each record as `<id>.jpg` (snapshot bytes verbatim) plus
/// `<id>.txt` (level-tagged transcripts) under the evidence directory.
pub struct FsEvidenceSink {
    dir: PathBuf,
}

impl FsEvidenceSink {
    /// Open the evidence directory, creating it when absent.
    pub fn new(dir: impl Into<PathBuf>) -> GuardResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            GuardError::Evidence(format!("evidence dir {} unusable: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }
}

impl EvidenceSink for FsEvidenceSink {
    fn store(&self, record: &EvidenceRecord) -> GuardResult<()> {
        let image_path = self.dir.join(format!("{}.jpg", record.id));
        let text_path = self.dir.join(format!("{}.txt", record.id));
        std::fs::write(&image_path, &record.snapshot)
            .map_err(|e| GuardError::Evidence(format!("snapshot write failed: {}", e)))?;
        std::fs::write(&text_path, record.transcript_text())
            .map_err(|e| GuardError::Evidence(format!("transcript write failed: {}", e)))?;
        info!(
            image = %image_path.display(),
            transcript = %text_path.display(),
            "evidence persisted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_snapshot_and_tagged_transcripts() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsEvidenceSink::new(dir.path()).unwrap();
        let record = EvidenceRecord::new(
            vec![0xFF, 0xD8],
            vec![(1, "".into()), (2, "I live here".into()), (3, "no".into())],
        );

        sink.store(&record).unwrap();

        let image = std::fs::read(dir.path().join(format!("{}.jpg", record.id))).unwrap();
        assert_eq!(image, vec![0xFF, 0xD8]);
        let text =
            std::fs::read_to_string(dir.path().join(format!("{}.txt", record.id))).unwrap();
        assert_eq!(text, "L1: \nL2: I live here\nL3: no\n");
    }

    #[test]
    fn unusable_directory_is_an_error() {
        // A path below an existing file cannot be created as a directory.
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        assert!(FsEvidenceSink::new(blocker.join("sub")).is_err());
    }
}
