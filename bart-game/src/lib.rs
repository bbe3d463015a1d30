//! BART Engine
//!
//! Platform-agnostic core logic for the Balloon Analogue Risk Task
//! experiment: the per-trial risk model, the pump/collect trial
//! engine, and the session controller that sequences trials and owns
//! the exportable record log. No UI or platform-specific dependencies.

pub mod constants;
pub mod export;
pub mod risk;
pub mod rng;
pub mod session;
pub mod trial;

// Re-export commonly used types
pub use constants::{DEPARTMENT_PLACEHOLDER, POINTS_PER_PUMP, TOTAL_TRIALS};
pub use export::{CSV_HEADER, csv_filename, render_csv, session_csv};
pub use risk::{BalloonColor, RiskTier, explosion_probability};
pub use rng::{CountingRng, RngBundle};
pub use session::{
    Department, Participant, ParticipantError, Session, SessionError, SessionPhase,
};
pub use trial::{PumpOutcome, TrialError, TrialOutcome, TrialRecord, TrialState};
