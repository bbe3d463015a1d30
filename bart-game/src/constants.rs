//! Centralized tuning constants for the BART engine.
//!
//! These values define the deterministic math for the experiment.
//! Keeping them together ensures that trial behavior can only be
//! adjusted via code changes reviewed in version control.

// Scoring ------------------------------------------------------------------
/// Points added to the temporary balance by every pump.
pub const POINTS_PER_PUMP: u32 = 5;

/// Number of balloons presented in one session.
pub const TOTAL_TRIALS: usize = 7;

// Pump ceilings per balloon color -------------------------------------------
pub(crate) const MAX_PUMPS_YELLOW: u32 = 8;
pub(crate) const MAX_PUMPS_ORANGE: u32 = 16;
pub(crate) const MAX_PUMPS_BLUE: u32 = 64;

// Participant form ----------------------------------------------------------
/// Sentinel shown by the department selector before a real choice.
pub const DEPARTMENT_PLACEHOLDER: &str = "Select Department";

// Export --------------------------------------------------------------------
pub(crate) const EXPORT_FILE_PREFIX: &str = "BART_";

// Balloon rendering hints ----------------------------------------------------
pub(crate) const BALLOON_BASE_SIZE: u32 = 150;
pub(crate) const BALLOON_GROWTH_PER_PUMP: u32 = 5;
pub(crate) const BALLOON_MAX_SIZE: u32 = 350;
