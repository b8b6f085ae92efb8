//! Validation of LLM response payloads
//!
//! The coach replies with loosely-shaped JSON, sometimes wrapped in
//! Markdown code fences or a `{"data": ...}` envelope. Everything is
//! validated into typed domain values here, at the boundary; malformed
//! payloads are rejected instead of leaking partial data into the session.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::report::Score;
use crate::session::{Feedback, Question, SkillAnalysis};

/// Strip a leading ```/```json fence and a trailing ``` fence, if present.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string ("json") up to the first newline
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };

    body.trim().strip_suffix("```").unwrap_or(body).trim()
}

/// Unwrap an optional `{"data": ...}` envelope.
fn unwrap_data(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(serde_json::Value::Null)
        }
        other => other,
    }
}

fn parse_payload<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T> {
    let value: serde_json::Value =
        serde_json::from_str(strip_code_fences(raw)).context("Response is not valid JSON")?;
    serde_json::from_value(unwrap_data(value)).context("Response has an unexpected shape")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionPayload {
    question: String,
    #[serde(default)]
    skill_tested: Option<String>,
    #[serde(default)]
    ideal_answer_elements: Vec<String>,
}

/// Parse and validate a generated question set.
pub fn parse_question_set(raw: &str) -> Result<Vec<Question>> {
    let payload: Vec<QuestionPayload> = parse_payload(raw)?;

    let questions: Vec<Question> = payload
        .into_iter()
        .filter_map(|q| {
            let text = q.question.trim().to_string();
            if text.is_empty() {
                return None;
            }
            Some(Question {
                text,
                skill_tested: q.skill_tested.filter(|s| !s.trim().is_empty()),
                ideal_answer_elements: q.ideal_answer_elements,
            })
        })
        .collect();

    if questions.is_empty() {
        anyhow::bail!("Response contained no usable questions");
    }

    Ok(questions)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackPayload {
    overall_rating: u8,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    areas_for_improvement: Vec<String>,
    #[serde(default)]
    specific_advice: Option<String>,
}

/// Parse and validate an answer evaluation (1-10 scale at the wire).
pub fn parse_feedback(raw: &str) -> Result<Feedback> {
    let payload: FeedbackPayload = parse_payload(raw)?;

    let rating = Score::from_scale_of_10(payload.overall_rating).with_context(|| {
        format!(
            "Rating {} is outside the expected 1-10 scale",
            payload.overall_rating
        )
    })?;

    Ok(Feedback {
        rating,
        strengths: payload.strengths,
        improvements: payload.areas_for_improvement,
        advice: payload.specific_advice.filter(|s| !s.trim().is_empty()),
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SkillPayload {
    communication: u8,
    technical_knowledge: u8,
    problem_solving: u8,
    #[serde(default)]
    communication_feedback: String,
    #[serde(default)]
    technical_knowledge_feedback: String,
    #[serde(default)]
    problem_solving_feedback: String,
}

/// Parse and validate a skill categorization (1-5 scale at the wire).
pub fn parse_skill_analysis(raw: &str) -> Result<SkillAnalysis> {
    let payload: SkillPayload = parse_payload(raw)?;

    let convert = |rating: u8, skill: &str| {
        Score::from_scale_of_5(rating)
            .with_context(|| format!("{skill} rating {rating} is outside the expected 1-5 scale"))
    };

    Ok(SkillAnalysis {
        communication: convert(payload.communication, "communication")?,
        technical_knowledge: convert(payload.technical_knowledge, "technicalKnowledge")?,
        problem_solving: convert(payload.problem_solving, "problemSolving")?,
        communication_feedback: payload.communication_feedback,
        technical_knowledge_feedback: payload.technical_knowledge_feedback,
        problem_solving_feedback: payload.problem_solving_feedback,
    })
}
