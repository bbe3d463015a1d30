//! Scripted pump policies used by the automated runner.

use bart_game::BalloonColor;
use clap::ValueEnum;
use std::fmt;

/// How aggressively the scripted participant pumps each balloon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PumpPolicy {
    /// Collect at a quarter of the ceiling.
    Cautious,
    /// Collect at half the ceiling.
    Balanced,
    /// Collect one pump below the ceiling.
    Greedy,
    /// Pump to the ceiling; every balloon pops.
    Ceiling,
}

impl PumpPolicy {
    /// Pump count at which this policy collects, per color.
    #[must_use]
    pub const fn target_pumps(self, color: BalloonColor) -> u32 {
        let max = color.max_pumps();
        match self {
            Self::Cautious => {
                let quarter = max / 4;
                if quarter == 0 { 1 } else { quarter }
            }
            Self::Balanced => max / 2,
            Self::Greedy => max - 1,
            Self::Ceiling => max,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cautious => "cautious",
            Self::Balanced => "balanced",
            Self::Greedy => "greedy",
            Self::Ceiling => "ceiling",
        }
    }
}

impl fmt::Display for PumpPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
