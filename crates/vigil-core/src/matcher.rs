//! Trusted-identity matching by embedding distance.

use serde::{Deserialize, Serialize};

/// One enrolled reference embedding. Several records may share a name
/// (multiple enrollment samples per person).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustedIdentity {
    pub name: String,
    pub embedding: Vec<f32>,
}

/// Per-frame verdict for the most prominent detected face.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchVerdict {
    /// Closest trusted embedding was within the threshold.
    Known { name: String, distance: f32 },
    /// No trusted embedding within the threshold (or none enrolled).
    Unknown { distance: f32 },
}

impl MatchVerdict {
    pub fn is_unknown(&self) -> bool {
        matches!(self, MatchVerdict::Unknown { .. })
    }

    /// Display label, as drawn on overlays and written to logs.
    pub fn label(&self) -> &str {
        match self {
            MatchVerdict::Known { name, .. } => name,
            MatchVerdict::Unknown { .. } => "Unknown",
        }
    }
}

/// Nearest-neighbor matcher over the in-memory trusted set.
#[derive(Debug, Clone)]
pub struct Matcher {
    identities: Vec<TrustedIdentity>,
    threshold: f32,
}

fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

impl Matcher {
    /// Build a matcher. An empty identity list yields always-unknown.
    pub fn new(identities: Vec<TrustedIdentity>, threshold: f32) -> Self {
        Self {
            identities,
            threshold,
        }
    }

    pub fn trusted_count(&self) -> usize {
        self.identities.len()
    }

    /// Match one embedding against the trusted set: nearest reference by
    /// Euclidean distance, known only when strictly below the threshold.
    /// Dimension-mismatched references are skipped.
    pub fn match_embedding(&self, embedding: &[f32]) -> MatchVerdict {
        let mut best: Option<(&TrustedIdentity, f32)> = None;
        for identity in &self.identities {
            if identity.embedding.len() != embedding.len() {
                continue;
            }
            let d = euclidean_distance(&identity.embedding, embedding);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((identity, d));
            }
        }
        match best {
            Some((identity, distance)) if distance < self.threshold => MatchVerdict::Known {
                name: identity.name.clone(),
                distance,
            },
            Some((_, distance)) => MatchVerdict::Unknown { distance },
            None => MatchVerdict::Unknown {
                distance: f32::INFINITY,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str, embedding: Vec<f32>) -> TrustedIdentity {
        TrustedIdentity {
            name: name.to_string(),
            embedding,
        }
    }

    #[test]
    fn empty_set_is_always_unknown() {
        let m = Matcher::new(Vec::new(), 0.45);
        let v = m.match_embedding(&[0.1, 0.2, 0.3]);
        assert!(v.is_unknown());
        assert_eq!(v.label(), "Unknown");
    }

    #[test]
    fn below_threshold_matches_identity() {
        let m = Matcher::new(
            vec![ident("alice", vec![0.0, 0.0]), ident("bob", vec![1.0, 1.0])],
            0.45,
        );
        match m.match_embedding(&[0.1, 0.1]) {
            MatchVerdict::Known { name, distance } => {
                assert_eq!(name, "alice");
                assert!(distance < 0.45);
            }
            other => panic!("expected Known, got {:?}", other),
        }
    }

    #[test]
    fn at_or_above_threshold_is_unknown() {
        let m = Matcher::new(vec![ident("alice", vec![0.0, 0.0])], 0.45);
        assert!(m.match_embedding(&[3.0, 4.0]).is_unknown());
        // Distance exactly at the threshold is not a match.
        let m = Matcher::new(vec![ident("alice", vec![0.0])], 0.5);
        assert!(m.match_embedding(&[0.5]).is_unknown());
    }

    #[test]
    fn mismatched_dimensions_are_skipped() {
        let m = Matcher::new(
            vec![ident("bad", vec![0.0, 0.0, 0.0]), ident("alice", vec![0.0, 0.0])],
            0.45,
        );
        match m.match_embedding(&[0.1, 0.1]) {
            MatchVerdict::Known { name, .. } => assert_eq!(name, "alice"),
            other => panic!("expected Known, got {:?}", other),
        }
    }
}
