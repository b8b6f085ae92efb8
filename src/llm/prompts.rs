//! Deterministic prompt builders for the interview coach

use crate::storage::AnswerRecord;

/// Build the question-generation prompt for a session's job details.
pub fn build_question_prompt(
    job_position: &str,
    job_description: &str,
    experience_years: &str,
    resume_text: Option<&str>,
    question_count: usize,
) -> String {
    let resume_section = resume_text
        .filter(|text| !text.trim().is_empty())
        .map(|text| format!("- Resume: {text}\n"))
        .unwrap_or_default();

    format!(
        "You are a professional interview coach preparing a candidate for a job interview.\n\
\n\
JOB DETAILS:\n\
- Position: {job_position}\n\
- Description: {job_description}\n\
\n\
CANDIDATE INFORMATION:\n\
{resume_section}- Experience: {experience_years} years\n\
\n\
Generate exactly {question_count} interview questions tailored to this role and candidate.\n\
\n\
Respond with ONLY a JSON array in this format:\n\
[\n\
  {{\n\
    \"question\": \"the question text\",\n\
    \"skillTested\": \"the skill this question probes\",\n\
    \"idealAnswerElements\": [\"point a strong answer should cover\"]\n\
  }}\n\
]"
    )
}

/// Build the answer-evaluation prompt. The requested rating scale is 1-10.
pub fn build_evaluation_prompt(question: &str, transcript: &str, job_position: &str) -> String {
    format!(
        "You are an expert interview coach evaluating a candidate's response for a {job_position} position.\n\
\n\
QUESTION: {question}\n\
\n\
CANDIDATE'S ANSWER: {transcript}\n\
\n\
Assess relevance to the question, specificity (examples and evidence), structure and\n\
clarity, technical accuracy where applicable, and professional tone.\n\
\n\
Respond with ONLY a JSON object in this format:\n\
{{\n\
  \"overallRating\": <number from 1 to 10>,\n\
  \"strengths\": [\"1-2 specific aspects that were effective\"],\n\
  \"areasForImprovement\": [\"1-2 specific suggestions\"],\n\
  \"specificAdvice\": \"a concise 2-3 sentence overall assessment\"\n\
}}"
    )
}

/// Build the report-time skill categorization prompt. The requested rating
/// scale is 1-5 per skill.
pub fn build_skill_analysis_prompt(job_position: &str, answers: &[AnswerRecord]) -> String {
    let answers_json: Vec<serde_json::Value> = answers
        .iter()
        .map(|answer| {
            serde_json::json!({
                "question": answer.question,
                "userAnswer": answer.answer,
                "rating": answer.rating.map(|r| r.value()),
            })
        })
        .collect();

    format!(
        "You are an expert interview analyzer evaluating a candidate's performance for a {job_position} position.\n\
\n\
Here are the candidate's responses to interview questions:\n\
{answers}\n\
\n\
Rate each category on a 1-5 scale, considering:\n\
- Communication: clarity, structure, conciseness, engagement\n\
- Technical Knowledge: accuracy, depth, relevance to the position\n\
- Problem Solving: approach, creativity, thoroughness\n\
\n\
Respond with ONLY a JSON object in this format:\n\
{{\n\
  \"communication\": <number>,\n\
  \"technicalKnowledge\": <number>,\n\
  \"problemSolving\": <number>,\n\
  \"communicationFeedback\": \"brief explanation\",\n\
  \"technicalKnowledgeFeedback\": \"brief explanation\",\n\
  \"problemSolvingFeedback\": \"brief explanation\"\n\
}}",
        answers = serde_json::Value::Array(answers_json)
    )
}
