use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::llm::client::{
    EvaluationRequest, InterviewCoach, QuestionRequest, SkillAnalysisRequest,
};
use crate::llm::prompts::{
    build_evaluation_prompt, build_question_prompt, build_skill_analysis_prompt,
};
use crate::llm::response::{parse_feedback, parse_question_set, parse_skill_analysis};
use crate::session::{Feedback, Question, SkillAnalysis};

const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.llm.api_key.trim().to_string();
        if api_key.is_empty() {
            anyhow::bail!(
                "Gemini API key is missing. Set llm.api_key in config or PREPIFY_GEMINI_API_KEY."
            );
        }

        let model = if settings.llm.model.trim().is_empty() {
            DEFAULT_GEMINI_MODEL.to_string()
        } else {
            settings.llm.model.trim().to_string()
        };

        let endpoint = if settings.llm.endpoint.trim().is_empty() {
            DEFAULT_GEMINI_ENDPOINT.to_string()
        } else {
            settings
                .llm
                .endpoint
                .trim()
                .trim_end_matches('/')
                .to_string()
        };

        Ok(Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(45))
                .build()
                .context("Failed to build Gemini HTTP client")?,
            api_key,
            model,
            endpoint,
        })
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        )
    }

    /// Send one prompt and return the first non-empty candidate text.
    async fn generate(&self, prompt: String) -> Result<String> {
        let body = GeminiGenerateContentRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(self.request_url())
            .json(&body)
            .send()
            .await
            .context("Gemini request failed")?;

        let response = response
            .error_for_status()
            .context("Gemini returned an error status")?;

        let payload: GeminiGenerateContentResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        let text = payload
            .candidates
            .iter()
            .flat_map(|c| c.content.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .map(str::trim)
            .find(|t| !t.is_empty())
            .map(str::to_string)
            .context("Gemini response did not contain any text")?;

        Ok(text)
    }
}

#[async_trait]
impl InterviewCoach for GeminiClient {
    async fn generate_questions(&self, request: QuestionRequest<'_>) -> Result<Vec<Question>> {
        let prompt = build_question_prompt(
            request.job_position,
            request.job_description,
            request.experience_years,
            request.resume_text,
            request.question_count,
        );

        let raw = self.generate(prompt).await?;
        let questions = parse_question_set(&raw)?;
        tracing::info!("Generated {} interview questions", questions.len());
        Ok(questions)
    }

    async fn evaluate_answer(&self, request: EvaluationRequest<'_>) -> Result<Feedback> {
        let prompt =
            build_evaluation_prompt(request.question, request.transcript, request.job_position);

        let raw = self.generate(prompt).await?;
        parse_feedback(&raw)
    }

    async fn analyze_skills(&self, request: SkillAnalysisRequest<'_>) -> Result<SkillAnalysis> {
        let prompt = build_skill_analysis_prompt(request.job_position, request.answers);

        let raw = self.generate(prompt).await?;
        parse_skill_analysis(&raw)
    }
}

#[derive(Debug, Serialize)]
struct GeminiGenerateContentRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiGenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContentResponse,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}
