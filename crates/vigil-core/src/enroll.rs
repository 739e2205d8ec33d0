//! Enrollment store: loads trusted embeddings once at startup.
//!
//! One JSON file per person under the enrollment directory; the file stem is
//! the identity name and the body is an array of embedding vectors
//! (`[[f32, ...], ...]`). A missing directory or an unreadable file is never
//! fatal; it degrades to fewer (or zero) trusted identities.

use crate::matcher::TrustedIdentity;
use std::path::Path;
use tracing::{info, warn};

/// Load all trusted identities from `dir`. Returns an empty set (logged)
/// when the directory does not exist; skips malformed files with a warning.
pub fn load_trusted(dir: &Path) -> Vec<TrustedIdentity> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "enrollment directory unavailable; running always-unknown");
            return Vec::new();
        }
    };

    let mut identities = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let name = match path.file_stem().and_then(|s| s.to_str()) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => continue,
        };
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping unreadable enrollment file");
                continue;
            }
        };
        let embeddings: Vec<Vec<f32>> = match serde_json::from_slice(&bytes) {
            Ok(v) => v,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping malformed enrollment file");
                continue;
            }
        };
        for embedding in embeddings {
            if embedding.is_empty() {
                warn!(file = %path.display(), "skipping empty embedding");
                continue;
            }
            identities.push(TrustedIdentity {
                name: name.clone(),
                embedding,
            });
        }
    }

    let names: std::collections::BTreeSet<&str> =
        identities.iter().map(|i| i.name.as_str()).collect();
    info!(
        trusted_users = ?names,
        total_embeddings = identities.len(),
        "enrollment store loaded"
    );
    identities
}
