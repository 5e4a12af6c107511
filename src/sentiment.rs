//! Score classifiers shared by every block that shows a sentiment or a
//! reliability tier. The political breakdown and the per-sentence breakdown
//! both go through [`Sentiment::classify`]; there is no second copy.

use serde::{Deserialize, Serialize};

/// Scores strictly above this are positive, strictly below its negation negative.
pub const SENTIMENT_THRESHOLD: f64 = 0.2;

pub const RELIABILITY_HIGH: f64 = 80.0;
pub const RELIABILITY_MEDIUM: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// NaN lands on neutral.
    pub fn classify(score: f64) -> Self {
        if score > SENTIMENT_THRESHOLD {
            Sentiment::Positive
        } else if score < -SENTIMENT_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    /// CSS-style class name used by the renderer.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReliabilityTier {
    High,
    Medium,
    Low,
}

impl ReliabilityTier {
    pub fn classify(score: f64) -> Self {
        if score >= RELIABILITY_HIGH {
            ReliabilityTier::High
        } else if score >= RELIABILITY_MEDIUM {
            ReliabilityTier::Medium
        } else {
            ReliabilityTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReliabilityTier::High => "high",
            ReliabilityTier::Medium => "medium",
            ReliabilityTier::Low => "low",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_boundaries_are_exclusive() {
        assert_eq!(Sentiment::classify(0.2), Sentiment::Neutral);
        assert_eq!(Sentiment::classify(0.2001), Sentiment::Positive);
        assert_eq!(Sentiment::classify(-0.2), Sentiment::Neutral);
        assert_eq!(Sentiment::classify(-0.2001), Sentiment::Negative);
        assert_eq!(Sentiment::classify(0.0), Sentiment::Neutral);
    }

    #[test]
    fn nan_is_neutral() {
        assert_eq!(Sentiment::classify(f64::NAN), Sentiment::Neutral);
    }

    #[test]
    fn reliability_tiers() {
        assert_eq!(ReliabilityTier::classify(92.0), ReliabilityTier::High);
        assert_eq!(ReliabilityTier::classify(80.0), ReliabilityTier::High);
        assert_eq!(ReliabilityTier::classify(79.0), ReliabilityTier::Medium);
        assert_eq!(ReliabilityTier::classify(60.0), ReliabilityTier::Medium);
        assert_eq!(ReliabilityTier::classify(59.0), ReliabilityTier::Low);
        assert_eq!(ReliabilityTier::classify(0.0), ReliabilityTier::Low);
    }
}
