//! Resume PDF text extraction
//!
//! Sends the PDF to an external extraction endpoint as base64 and pulls
//! the text out of its loosely-shaped response. Failures here are
//! recoverable: a session can always run without resume text.

use anyhow::{Context, Result};
use base64::Engine;
use reqwest::Client;
use serde::Serialize;
use std::path::Path;

use crate::config::Settings;

pub struct ResumeExtractor {
    http: Client,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct ExtractRequest {
    pdf_base64: String,
}

impl ResumeExtractor {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let endpoint = settings.resume.endpoint.trim().to_string();
        if endpoint.is_empty() {
            anyhow::bail!(
                "Resume extraction endpoint is not configured. Set resume.endpoint in config."
            );
        }

        Ok(Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(settings.resume.timeout_secs))
                .build()
                .context("Failed to build resume extraction HTTP client")?,
            endpoint,
        })
    }

    /// Extract text from a PDF file on disk.
    pub async fn extract_file(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read PDF: {}", path.display()))?;
        self.extract(&bytes).await
    }

    /// Extract text from PDF bytes.
    pub async fn extract(&self, pdf_bytes: &[u8]) -> Result<String> {
        let request = ExtractRequest {
            pdf_base64: base64::engine::general_purpose::STANDARD.encode(pdf_bytes),
        };

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .context("PDF extraction request failed")?;

        let response = response
            .error_for_status()
            .context("PDF extraction endpoint returned an error status")?;

        let payload: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse PDF extraction response")?;

        extract_text_field(&payload).context("PDF extraction response contained no text")
    }
}

/// Pull the extracted text out of the response, trying the field names the
/// endpoint is known to use.
fn extract_text_field(payload: &serde_json::Value) -> Option<String> {
    for field in ["text", "content", "data"] {
        if let Some(text) = payload.get(field).and_then(|v| v.as_str()) {
            let text = text.trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }
    None
}
