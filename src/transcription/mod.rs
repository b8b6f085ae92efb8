//! Speech-to-text session handling
//!
//! The recognition engine itself is an external collaborator reached
//! through [`SpeechRecognizer`]; this module owns only the session
//! lifecycle and transcript accumulation. The bundled implementation is a
//! typed-input fallback for terminals without a speech engine.

mod session;
mod typed;

pub use session::TranscriptionSession;
pub use typed::{TypedInputRecognizer, TypedSpeechSource};

use async_trait::async_trait;

/// One unit of recognized speech.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechSegment {
    pub text: String,

    /// Interim segments are unstable and may be replaced; only final
    /// segments are committed to the transcript.
    pub is_final: bool,
}

impl SpeechSegment {
    pub fn final_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }

    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }
}

/// A live stream of speech segments for one recording window.
#[async_trait]
pub trait SpeechSource: Send {
    /// Next segment from the engine; `Ok(None)` once the utterance ends.
    async fn next_segment(&mut self) -> crate::Result<Option<SpeechSegment>>;
}

/// Factory for speech sources.
///
/// Returns [`crate::PrepifyError::UnsupportedEnvironment`] when no speech
/// capture is possible here at all.
pub trait SpeechRecognizer: Send + Sync {
    fn open_session(&self) -> crate::Result<Box<dyn SpeechSource>>;
}
