//! Trial engine: one balloon from first pump to collect or pop.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{BALLOON_BASE_SIZE, BALLOON_GROWTH_PER_PUMP, BALLOON_MAX_SIZE, POINTS_PER_PUMP};
use crate::risk::{BalloonColor, explosion_probability};
use crate::rng::RngBundle;

/// Contract violations in the trial call sequence. These signal caller
/// bugs, not recoverable runtime conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TrialError {
    /// `pump` or `collect` was invoked after the balloon popped.
    #[error("balloon already popped after {pumps} pumps")]
    AlreadyPopped { pumps: u32 },
    /// `finalize_explosion` was invoked on a standing balloon.
    #[error("balloon is still standing; nothing to finalize")]
    StillStanding,
}

/// Result of a single pump, as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpOutcome {
    /// The balloon held; the trial continues.
    Inflated,
    /// The balloon popped; only finalization remains.
    Popped,
}

/// Finalized outcome of one balloon, before the session controller
/// assigns its trial number and running total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub color: BalloonColor,
    pub pumps: u32,
    pub exploded: bool,
    pub money_earned: u32,
}

/// Immutable row appended to the session log when a trial completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub trial_number: u32,
    pub balloon_color: BalloonColor,
    pub pumps: u32,
    pub exploded: bool,
    pub money_earned: u32,
    pub total_money_after_trial: u32,
}

/// Mutable state of the balloon currently on the pump. Owned by the
/// session for the duration of one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialState {
    color: BalloonColor,
    pumps: u32,
    temp_score: u32,
    exploded: bool,
}

impl TrialState {
    /// Fresh balloon of the given color.
    #[must_use]
    pub const fn new(color: BalloonColor) -> Self {
        Self {
            color,
            pumps: 0,
            temp_score: 0,
            exploded: false,
        }
    }

    #[must_use]
    pub const fn color(self) -> BalloonColor {
        self.color
    }

    #[must_use]
    pub const fn pumps(self) -> u32 {
        self.pumps
    }

    #[must_use]
    pub const fn temp_score(self) -> u32 {
        self.temp_score
    }

    #[must_use]
    pub const fn exploded(self) -> bool {
        self.exploded
    }

    /// Pixel diameter hint for rendering the inflating balloon.
    #[must_use]
    pub const fn display_size(self) -> u32 {
        let size = BALLOON_BASE_SIZE + self.pumps * BALLOON_GROWTH_PER_PUMP;
        if size > BALLOON_MAX_SIZE {
            BALLOON_MAX_SIZE
        } else {
            size
        }
    }

    /// One pump: bank the points, then roll for a pop.
    ///
    /// The pump that reaches the color's ceiling pops unconditionally;
    /// below the ceiling a single uniform draw against
    /// [`explosion_probability`] decides.
    ///
    /// # Errors
    ///
    /// Returns [`TrialError::AlreadyPopped`] if the balloon has
    /// already exploded.
    pub fn pump(&mut self, rng: &RngBundle) -> Result<PumpOutcome, TrialError> {
        if self.exploded {
            return Err(TrialError::AlreadyPopped { pumps: self.pumps });
        }
        self.pumps += 1;
        self.temp_score += POINTS_PER_PUMP;
        if self.pumps >= self.color.max_pumps() {
            self.exploded = true;
        } else {
            let roll = rng.explosion().r#gen::<f64>();
            if roll < explosion_probability(self.color, self.pumps) {
                self.exploded = true;
            }
        }
        Ok(if self.exploded {
            PumpOutcome::Popped
        } else {
            PumpOutcome::Inflated
        })
    }

    /// Bank the temporary balance as this trial's earnings.
    ///
    /// Collecting at zero pumps is a degenerate but valid trial and
    /// yields zero earnings.
    ///
    /// # Errors
    ///
    /// Returns [`TrialError::AlreadyPopped`] if the balloon exploded;
    /// a popped balloon can only be finalized as an explosion.
    pub const fn collect(self) -> Result<TrialOutcome, TrialError> {
        if self.exploded {
            return Err(TrialError::AlreadyPopped { pumps: self.pumps });
        }
        Ok(TrialOutcome {
            color: self.color,
            pumps: self.pumps,
            exploded: false,
            money_earned: self.temp_score,
        })
    }

    /// Finalize a popped balloon: the temporary balance is forfeit.
    ///
    /// # Errors
    ///
    /// Returns [`TrialError::StillStanding`] if the balloon has not
    /// exploded.
    pub const fn finalize_explosion(self) -> Result<TrialOutcome, TrialError> {
        if !self.exploded {
            return Err(TrialError::StillStanding);
        }
        Ok(TrialOutcome {
            color: self.color,
            pumps: self.pumps,
            exploded: true,
            money_earned: 0,
        })
    }
}
