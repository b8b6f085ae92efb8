//! Session lifecycle states

use serde::{Deserialize, Serialize};

/// Phase of an interview session
///
/// Phases only ever move forward: `Prep -> Setup -> Active -> Completed ->
/// Report`. `Report` is terminal; abandoning a session drops the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Reviewing job details before committing to a run
    Prep,
    /// Device check; camera and microphone must be granted to proceed
    Setup,
    /// Question loop in progress
    Active,
    /// All questions answered or skipped
    Completed,
    /// Report generated; terminal
    Report,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prep => "prep",
            Self::Setup => "setup",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Report => "report",
        }
    }
}

/// Outcome of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Not recording, or an operation is in flight; nothing counted down
    Idle,
    /// Seconds remaining for the current question
    Counting(u32),
    /// The budget just ran out; the caller must advance the question.
    /// Fired at most once per question.
    Expired,
}

/// A recoverable problem surfaced to the user without interrupting the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionNotice {
    /// Evaluation failed for an answered question; the answer is kept.
    EvaluationFailed { question_index: usize, reason: String },
}

impl std::fmt::Display for SessionNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EvaluationFailed {
                question_index,
                reason,
            } => write!(
                f,
                "Could not evaluate the answer to question {}: {}",
                question_index + 1,
                reason
            ),
        }
    }
}
