use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Settings;
use crate::llm::gemini::GeminiClient;
use crate::session::{Feedback, Question, SkillAnalysis};
use crate::storage::AnswerRecord;

/// Question generation request payload.
pub struct QuestionRequest<'a> {
    pub job_position: &'a str,
    pub job_description: &'a str,
    pub experience_years: &'a str,
    pub resume_text: Option<&'a str>,
    pub question_count: usize,
}

/// Answer evaluation request payload.
pub struct EvaluationRequest<'a> {
    pub question: &'a str,
    pub transcript: &'a str,
    pub job_position: &'a str,
}

/// Skill categorization request payload (report generation).
pub struct SkillAnalysisRequest<'a> {
    pub job_position: &'a str,
    pub answers: &'a [AnswerRecord],
}

#[async_trait]
pub trait InterviewCoach: Send + Sync {
    /// Generate the ordered question set for a session.
    async fn generate_questions(&self, request: QuestionRequest<'_>) -> Result<Vec<Question>>;

    /// Rate one answer and produce structured feedback.
    async fn evaluate_answer(&self, request: EvaluationRequest<'_>) -> Result<Feedback>;

    /// Categorize a session's answers into per-skill scores.
    async fn analyze_skills(&self, request: SkillAnalysisRequest<'_>) -> Result<SkillAnalysis>;
}

/// Build an interview coach from runtime settings.
pub fn build_coach(settings: &Settings) -> Result<Arc<dyn InterviewCoach>> {
    match settings.llm.provider.to_lowercase().as_str() {
        "gemini" => Ok(Arc::new(GeminiClient::from_settings(settings)?)),
        other => anyhow::bail!(
            "Unsupported llm.provider '{}'. Supported providers: gemini",
            other
        ),
    }
}
