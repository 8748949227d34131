//! Coarse confidence buckets derived from a numeric score.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Score at or above which an answer counts as a strength.
pub const HIGH_THRESHOLD: f64 = 0.8;
/// Score below which an answer is low confidence.
pub const LOW_THRESHOLD: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_THRESHOLD {
            Confidence::High
        } else if score >= LOW_THRESHOLD {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    /// CSS class used by the HTML renderer.
    pub fn css_class(self) -> &'static str {
        match self {
            Confidence::High => "conf-high",
            Confidence::Medium => "conf-med",
            Confidence::Low => "conf-low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::High => write!(f, "High"),
            Confidence::Medium => write!(f, "Medium"),
            Confidence::Low => write!(f, "Low"),
        }
    }
}
