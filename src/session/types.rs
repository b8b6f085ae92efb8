//! Session domain types

use serde::{Deserialize, Serialize};

use crate::report::Score;

/// Everything a session needs to know before it starts.
///
/// Captured once, up front, and handed to the controller at construction;
/// immutable once the session goes active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPlan {
    /// Job title the candidate is practicing for
    pub job_position: String,

    /// Free-text job description
    pub job_description: String,

    /// Years of experience, as entered ("3", "5+", ...)
    pub experience_years: String,

    /// Resume text extracted from an uploaded PDF, when available
    pub resume_text: Option<String>,

    /// Identity of the person running the session
    pub created_by: String,

    /// How many questions to generate
    pub question_count: usize,
}

/// One generated interview question with optional answering guidance.
///
/// Serialized field names match the stored question-list JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_tested: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ideal_answer_elements: Vec<String>,
}

/// Structured evaluator output for one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    /// Canonical 0-100 rating
    pub rating: Score,

    pub strengths: Vec<String>,

    pub improvements: Vec<String>,

    pub advice: Option<String>,
}

/// Per-skill breakdown produced by the report categorization pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillAnalysis {
    pub communication: Score,
    pub technical_knowledge: Score,
    pub problem_solving: Score,

    pub communication_feedback: String,
    pub technical_knowledge_feedback: String,
    pub problem_solving_feedback: String,
}
