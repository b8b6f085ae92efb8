//! Interview session module
//!
//! Owns the lifecycle of one practice run: prep, media setup, the active
//! question loop with its countdown, completion, and report generation.

mod controller;
mod state;
mod timer;
mod types;

pub use controller::InterviewSessionController;
pub use state::{Phase, SessionNotice, Tick};
pub use timer::{format_clock, QuestionCountdown};
pub use types::{Feedback, Question, SessionPlan, SkillAnalysis};
