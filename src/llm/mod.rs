//! LLM coach module
//!
//! Question generation, answer evaluation and the report-time skill
//! categorization pass, all behind one trait so the session controller can
//! run against a fake in tests.

mod client;
mod gemini;
mod prompts;
mod response;

pub use client::{
    build_coach, EvaluationRequest, InterviewCoach, QuestionRequest, SkillAnalysisRequest,
};
pub use gemini::GeminiClient;
pub use response::{parse_feedback, parse_question_set, parse_skill_analysis, strip_code_fences};
