//! Report aggregation for completed interview sessions
//!
//! Derives an overall score and per-skill breakdown from the stored
//! per-question answers, on a single canonical 0-100 scale.

mod aggregator;
mod score;

pub use aggregator::{build_report, collect_highlights, generate_or_load, overall_score};
pub use score::Score;
