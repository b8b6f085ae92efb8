//! Transcript accumulation for one recording window

use crate::transcription::SpeechSegment;

/// Accumulates recognized speech for a single answer.
///
/// Only segments marked final are appended to the committed buffer; interim
/// text is kept separately and replaced wholesale on every update, so
/// unstable engine output is never duplicated into the answer. `close` is
/// idempotent: closing an already-closed session returns the same committed
/// text and changes nothing.
#[derive(Debug)]
pub struct TranscriptionSession {
    committed: String,
    interim: String,
    open: bool,
}

impl TranscriptionSession {
    pub fn open() -> Self {
        Self {
            committed: String::new(),
            interim: String::new(),
            open: true,
        }
    }

    /// Feed one segment from the recognition engine. Ignored once closed.
    pub fn push(&mut self, segment: SpeechSegment) {
        if !self.open {
            return;
        }

        if segment.is_final {
            let text = segment.text.trim();
            if !text.is_empty() {
                if !self.committed.is_empty() {
                    self.committed.push(' ');
                }
                self.committed.push_str(text);
            }
            self.interim.clear();
        } else {
            self.interim = segment.text;
        }
    }

    /// Committed text so far, without interim tail.
    pub fn committed(&self) -> &str {
        &self.committed
    }

    /// Committed text plus the current interim tail, for live display.
    pub fn preview(&self) -> String {
        if self.interim.is_empty() {
            self.committed.clone()
        } else if self.committed.is_empty() {
            self.interim.clone()
        } else {
            format!("{} {}", self.committed, self.interim)
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Close the session and return the final committed text.
    pub fn close(&mut self) -> String {
        if self.open {
            self.open = false;
            self.interim.clear();
        }
        self.committed.clone()
    }
}
