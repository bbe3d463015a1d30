//! Balloon risk model: the three fixed color tiers, their pump
//! ceilings, and the escalating explosion-probability curve.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{MAX_PUMPS_BLUE, MAX_PUMPS_ORANGE, MAX_PUMPS_YELLOW};

/// Risk category of a balloon color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    High,
    Moderate,
    Low,
}

/// Balloon color presented to the participant. Each color carries a
/// fixed pump ceiling; lower ceilings mean a steeper risk curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalloonColor {
    Yellow,
    Orange,
    Blue,
}

impl BalloonColor {
    /// All colors, in the order the sequence sampler indexes them.
    pub const ALL: [Self; 3] = [Self::Yellow, Self::Orange, Self::Blue];

    /// Maximum pumps this color can hold before the forced pop.
    #[must_use]
    pub const fn max_pumps(self) -> u32 {
        match self {
            Self::Yellow => MAX_PUMPS_YELLOW,
            Self::Orange => MAX_PUMPS_ORANGE,
            Self::Blue => MAX_PUMPS_BLUE,
        }
    }

    /// Risk category implied by the ceiling.
    #[must_use]
    pub const fn risk_tier(self) -> RiskTier {
        match self {
            Self::Yellow => RiskTier::High,
            Self::Orange => RiskTier::Moderate,
            Self::Blue => RiskTier::Low,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yellow => "Yellow",
            Self::Orange => "Orange",
            Self::Blue => "Blue",
        }
    }
}

impl fmt::Display for BalloonColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BalloonColor {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yellow" => Ok(Self::Yellow),
            "orange" => Ok(Self::Orange),
            "blue" => Ok(Self::Blue),
            _ => Err(()),
        }
    }
}

/// Instantaneous explosion probability after `pumps` completed pumps.
///
/// `1 / (max_pumps - pumps + 1)`, the intentionally smoothed curve:
/// strictly increasing toward the ceiling. The pump that reaches the
/// ceiling itself never consults this; it pops unconditionally.
#[must_use]
pub fn explosion_probability(color: BalloonColor, pumps: u32) -> f64 {
    let max = color.max_pumps();
    debug_assert!(pumps < max, "probability is undefined at the ceiling");
    1.0 / f64::from(max.saturating_sub(pumps) + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceilings_match_risk_order() {
        assert_eq!(BalloonColor::Yellow.max_pumps(), 8);
        assert_eq!(BalloonColor::Orange.max_pumps(), 16);
        assert_eq!(BalloonColor::Blue.max_pumps(), 64);
        assert_eq!(BalloonColor::Yellow.risk_tier(), RiskTier::High);
        assert_eq!(BalloonColor::Blue.risk_tier(), RiskTier::Low);
    }

    #[test]
    fn probability_is_strictly_increasing() {
        for color in BalloonColor::ALL {
            let mut last = 0.0_f64;
            for pumps in 0..color.max_pumps() {
                let p = explosion_probability(color, pumps);
                assert!(p > last, "{color} not increasing at {pumps}");
                assert!(p > 0.0 && p <= 1.0);
                last = p;
            }
        }
    }

    #[test]
    fn probability_matches_formula_endpoints() {
        // Untouched yellow balloon: 1 / (8 - 0 + 1).
        let first = explosion_probability(BalloonColor::Yellow, 0);
        assert!((first - 1.0 / 9.0).abs() < f64::EPSILON);
        // One pump below the ceiling: 1 / (8 - 7 + 1).
        let near = explosion_probability(BalloonColor::Yellow, 7);
        assert!((near - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn color_labels_roundtrip() {
        for color in BalloonColor::ALL {
            assert_eq!(color.as_str().parse::<BalloonColor>(), Ok(color));
        }
        assert!("purple".parse::<BalloonColor>().is_err());
    }
}
