//! Per-question countdown

/// Countdown budget for one question's recording window.
///
/// Holds no timer of its own: the driver calls [`QuestionCountdown::tick`]
/// once per second while recording, and the controller decides when ticks
/// are allowed to count (they are suspended while a network call is in
/// flight). The remaining budget never goes below zero.
#[derive(Debug, Clone)]
pub struct QuestionCountdown {
    budget_secs: u32,
    remaining_secs: u32,
}

impl QuestionCountdown {
    pub fn new(budget_secs: u32) -> Self {
        Self {
            budget_secs,
            remaining_secs: budget_secs,
        }
    }

    /// Restore the full budget (start of a question's recording window).
    pub fn reset(&mut self) {
        self.remaining_secs = self.budget_secs;
    }

    /// Count down one second. Returns `true` when the budget has run out.
    pub fn tick(&mut self) -> bool {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        self.remaining_secs == 0
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn budget_secs(&self) -> u32 {
        self.budget_secs
    }
}

/// Format seconds as MM:SS for display.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
