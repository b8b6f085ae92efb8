//! prepify - Practice job interviews from the terminal
//!
//! Generates tailored interview questions, captures spoken (or typed)
//! answers against a per-question countdown, scores them with an LLM coach,
//! and stores everything for later review as a report.

pub mod cli;
pub mod config;
pub mod llm;
pub mod media;
pub mod report;
pub mod resume;
pub mod session;
pub mod storage;
pub mod transcription;

use thiserror::Error;

/// Main error type for prepify
#[derive(Error, Debug)]
pub enum PrepifyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Camera or microphone could not be acquired. Recoverable: the user
    /// may fix the device and retry acquisition.
    #[error("Camera or microphone unavailable: {0}")]
    DeviceUnavailable(String),

    /// No speech capture is possible in this environment at all.
    #[error("Speech capture is not supported here: {0}")]
    UnsupportedEnvironment(String),

    /// A stopped recording produced less text than the capture threshold.
    /// Blocks advancement until the answer is retried or skipped.
    #[error("Answer too short: {got} characters (minimum {min})")]
    AnswerTooShort { got: usize, min: usize },

    #[error("Question generation failed: {0}")]
    QuestionGeneration(String),

    #[error("Answer evaluation failed: {0}")]
    Evaluation(String),

    #[error("Persistence failed: {0}")]
    Persistence(String),

    #[error("Invalid session transition: {0}")]
    InvalidTransition(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PrepifyError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "prepify";
