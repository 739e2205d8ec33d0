//! Evidence records produced by non-cooperative escalation outcomes.

use chrono::Utc;

/// Snapshot plus transcripts, persisted under a timestamp-derived identifier.
/// Created only on a Refuse at any level or an unresolved level 3; never on
/// a stand-down.
#[derive(Debug, Clone)]
pub struct EvidenceRecord {
    /// Identifier, e.g. `unknown_20250114_193205`. Doubles as the file stem.
    pub id: String,
    /// Encoded snapshot bytes from the triggering frame.
    pub snapshot: Vec<u8>,
    /// `(level, transcript)` pairs in level order. A single pair for a
    /// Refuse outcome; all levels (empty transcripts included) for the
    /// unresolved-at-3 branch.
    pub transcripts: Vec<(u8, String)>,
}

impl EvidenceRecord {
    /// Build a record with a fresh timestamp identifier.
    pub fn new(snapshot: Vec<u8>, transcripts: Vec<(u8, String)>) -> Self {
        let id = format!("unknown_{}", Utc::now().format("%Y%m%d_%H%M%S"));
        Self {
            id,
            snapshot,
            transcripts,
        }
    }

    /// Transcript text as persisted: one `L{level}: {text}` line per level.
    pub fn transcript_text(&self) -> String {
        let mut out = String::new();
        for (level, text) in &self.transcripts {
            out.push_str(&format!("L{}: {}\n", level, text));
        }
        out
    }
}
