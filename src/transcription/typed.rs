//! Typed-input fallback speech source
//!
//! Terminals have no speech engine, so the interactive session falls back
//! to typed answers: every entered line becomes a final segment and a blank
//! line ends the utterance.

use async_trait::async_trait;
use std::io::IsTerminal;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::transcription::{SpeechRecognizer, SpeechSegment, SpeechSource};
use crate::PrepifyError;

/// Recognizer that opens typed-input sessions over stdin.
pub struct TypedInputRecognizer;

impl SpeechRecognizer for TypedInputRecognizer {
    fn open_session(&self) -> crate::Result<Box<dyn SpeechSource>> {
        if !std::io::stdin().is_terminal() {
            return Err(PrepifyError::UnsupportedEnvironment(
                "typed answers need an interactive terminal".to_string(),
            ));
        }
        Ok(Box::new(TypedSpeechSource::new()))
    }
}

/// Reads answer lines from stdin until a blank line.
pub struct TypedSpeechSource {
    lines: Lines<BufReader<Stdin>>,
}

impl TypedSpeechSource {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for TypedSpeechSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechSource for TypedSpeechSource {
    async fn next_segment(&mut self) -> crate::Result<Option<SpeechSegment>> {
        match self.lines.next_line().await? {
            Some(line) if line.trim().is_empty() => Ok(None),
            Some(line) => Ok(Some(SpeechSegment::final_text(line.trim()))),
            None => Ok(None),
        }
    }
}
