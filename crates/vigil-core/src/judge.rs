//! Reply judgement: deterministic keyword classification of a transcript.
//!
//! Pure and total: every string maps to exactly one judgement, evaluated in
//! a fixed precedence order (first match wins).

/// Classification of a subject's reply at one escalation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyJudgement {
    /// Cooperative: apology or stated intent to leave.
    Ok,
    /// Defiant: refusal or negation.
    Refuse,
    /// Unclear but substantial speech.
    Suspicious,
    /// Empty or too short to mean anything.
    NoResponse,
}

/// Cooperative phrases: the subject agrees to leave.
const COOPERATIVE: &[&str] = &[
    "sorry",
    "i will leave",
    "i will go",
    "i will get out",
    "i'm leaving",
];

/// Defiant phrases: the subject refuses to cooperate.
const DEFIANT: &[&str] = &["no", "i will not", "i'm not", "none of your business", "refuse"];

/// Classify a transcript. Precedence: cooperative phrase → `Ok`, defiant
/// phrase → `Refuse`, fewer than 3 characters → `NoResponse`, otherwise
/// `Suspicious`. Matching is case-insensitive substring containment.
pub fn judge_reply(text: &str) -> ReplyJudgement {
    let t = text.to_lowercase();
    if COOPERATIVE.iter().any(|kw| t.contains(kw)) {
        return ReplyJudgement::Ok;
    }
    if DEFIANT.iter().any(|kw| t.contains(kw)) {
        return ReplyJudgement::Refuse;
    }
    if t.len() < 3 {
        return ReplyJudgement::NoResponse;
    }
    ReplyJudgement::Suspicious
}
