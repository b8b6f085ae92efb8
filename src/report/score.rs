//! Canonical 0-100 answer score
//!
//! The LLM pipelines rate on different scales (1-10 for per-answer
//! evaluation, 1-5 for the skill categorization pass). Every rating is
//! converted to this one scale at the deserialization boundary so that
//! aggregation never mixes scales.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A score on the canonical 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(u8);

impl Score {
    pub const MAX: u8 = 100;

    pub const ZERO: Score = Score(0);

    /// Create a score, rejecting values above 100.
    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    /// Convert a 1-5 rating (skill categorization pipeline).
    pub fn from_scale_of_5(rating: u8) -> Option<Self> {
        (1..=5).contains(&rating).then(|| Self(rating * 20))
    }

    /// Convert a 1-10 rating (answer evaluation pipeline).
    pub fn from_scale_of_10(rating: u8) -> Option<Self> {
        (1..=10).contains(&rating).then(|| Self(rating * 10))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Rounded mean of a set of scores. Returns `None` for an empty set.
    pub fn mean<I: IntoIterator<Item = Score>>(scores: I) -> Option<Score> {
        let mut sum: u32 = 0;
        let mut count: u32 = 0;
        for score in scores {
            sum += u32::from(score.0);
            count += 1;
        }
        if count == 0 {
            return None;
        }
        let mean = (f64::from(sum) / f64::from(count)).round() as u8;
        Some(Self(mean.min(Self::MAX)))
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
