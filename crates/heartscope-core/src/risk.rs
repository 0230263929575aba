#![forbid(unsafe_code)]

//! Probability → risk tier.

use crate::color::{Rgba, palette};

/// Lower bound (inclusive) of the medium tier, in percent.
pub const MEDIUM_THRESHOLD: f64 = 40.0;
/// Lower bound (inclusive) of the high tier, in percent.
pub const HIGH_THRESHOLD: f64 = 70.0;

/// Coarse risk classification shown next to the probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Classify a probability given in percent. Boundaries belong to the
    /// higher tier.
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability < MEDIUM_THRESHOLD {
            Self::Low
        } else if probability < HIGH_THRESHOLD {
            Self::Medium
        } else {
            Self::High
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    #[must_use]
    pub const fn color(self) -> Rgba {
        match self {
            Self::Low => palette::GREEN,
            Self::Medium => palette::YELLOW,
            Self::High => palette::RED,
        }
    }

    /// Stylesheet class for the probability figure.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Low => "text-green-500",
            Self::Medium => "text-yellow-500",
            Self::High => "text-red-500",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_land_in_higher_tier() {
        assert_eq!(RiskTier::from_probability(39.99), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(40.0), RiskTier::Medium);
        assert_eq!(RiskTier::from_probability(69.99), RiskTier::Medium);
        assert_eq!(RiskTier::from_probability(70.0), RiskTier::High);
    }

    #[test]
    fn extremes() {
        assert_eq!(RiskTier::from_probability(0.0), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(100.0), RiskTier::High);
    }

    #[test]
    fn high_is_red() {
        assert_eq!(RiskTier::High.color(), palette::RED);
        assert_eq!(RiskTier::High.label(), "High");
    }
}
