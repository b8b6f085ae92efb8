//! Data models for storage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::report::Score;
use crate::session::{Feedback, Question, SessionPlan};

/// One practice interview session, created when the question set is
/// generated and never updated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewRecord {
    /// Unique identifier (UUID)
    pub id: String,

    /// Job title the session was generated for
    pub job_position: String,

    /// Job description text
    pub job_description: String,

    /// Years of experience, as entered
    pub experience_years: String,

    /// The generated question set, in order
    pub questions: Vec<Question>,

    /// Identity of the session creator
    pub created_by: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl InterviewRecord {
    /// Create a new interview record from a session plan and its questions
    pub fn new(plan: &SessionPlan, questions: Vec<Question>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            job_position: plan.job_position.clone(),
            job_description: plan.job_description.clone(),
            experience_years: plan.experience_years.clone(),
            questions,
            created_by: plan.created_by.clone(),
            created_at: Utc::now(),
        }
    }
}

/// One answered question: transcript plus evaluator feedback when the
/// evaluation succeeded. Written once, never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// Database row id (0 until inserted)
    pub id: i64,

    /// Parent interview session
    pub interview_id: String,

    /// Position of the question within the session's question set
    pub question_index: usize,

    /// The question as asked
    pub question: String,

    /// Committed transcript of the spoken answer
    pub answer: String,

    /// Canonical 0-100 rating; absent when evaluation failed
    pub rating: Option<Score>,

    pub strengths: Vec<String>,

    pub improvements: Vec<String>,

    pub advice: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl AnswerRecord {
    pub fn new(
        interview_id: String,
        question_index: usize,
        question: String,
        answer: String,
        feedback: Option<&Feedback>,
    ) -> Self {
        Self {
            id: 0, // Will be set by database
            interview_id,
            question_index,
            question,
            answer,
            rating: feedback.map(|f| f.rating),
            strengths: feedback.map(|f| f.strengths.clone()).unwrap_or_default(),
            improvements: feedback.map(|f| f.improvements.clone()).unwrap_or_default(),
            advice: feedback.and_then(|f| f.advice.clone()),
            created_at: Utc::now(),
        }
    }
}

/// Aggregated per-session report. At most one row exists per interview;
/// creation is first-write-wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRecord {
    /// Database row id (0 until inserted)
    pub id: i64,

    pub interview_id: String,

    pub job_position: String,

    /// Rounded mean of the rated answers, 0-100
    pub overall_score: Score,

    pub communication_score: Score,
    pub technical_knowledge_score: Score,
    pub problem_solving_score: Score,

    /// Deduplicated top strengths across answers, comma-joined
    pub strengths: String,

    /// Deduplicated top improvements across answers, comma-joined
    pub improvements: String,

    pub question_count: usize,
    pub answered_count: usize,

    /// Supporting detail kept as a JSON blob
    pub detail: ReportDetail,

    pub created_at: DateTime<Utc>,
}

/// Supporting report detail serialized into one JSON column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDetail {
    #[serde(default)]
    pub communication_feedback: String,

    #[serde(default)]
    pub technical_knowledge_feedback: String,

    #[serde(default)]
    pub problem_solving_feedback: String,

    #[serde(default)]
    pub answers: Vec<AnswerDigest>,
}

/// Per-answer digest embedded in the report detail blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDigest {
    pub question: String,
    pub rating: Option<Score>,
    pub advice: Option<String>,
}
