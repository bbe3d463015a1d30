//! Session controller: validates the participant, fixes the balloon
//! sequence, sequences trials, and owns the append-only trial log.

use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::{DEPARTMENT_PLACEHOLDER, TOTAL_TRIALS};
use crate::risk::BalloonColor;
use crate::rng::RngBundle;
use crate::trial::{PumpOutcome, TrialError, TrialRecord, TrialState};

/// Academic department of the participant. The form's placeholder
/// sentinel is deliberately unrepresentable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Department {
    Accounting,
    Finance,
    ManagementStudies,
    Entrepreneurship,
    Marketing,
    Economics,
    Other,
}

impl Department {
    /// All departments, in the order the selection form lists them.
    pub const ALL: [Self; 7] = [
        Self::Accounting,
        Self::Finance,
        Self::ManagementStudies,
        Self::Entrepreneurship,
        Self::Marketing,
        Self::Economics,
        Self::Other,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accounting => "Accounting",
            Self::Finance => "Finance (BAF)",
            Self::ManagementStudies => "Management Studies (MGT)",
            Self::Entrepreneurship => "Entrepreneurship",
            Self::Marketing => "Marketing",
            Self::Economics => "Economics",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = ParticipantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == label)
            .ok_or_else(|| {
                if label == DEPARTMENT_PLACEHOLDER {
                    ParticipantError::DepartmentNotSelected
                } else {
                    ParticipantError::UnknownDepartment(label.to_string())
                }
            })
    }
}

/// Identity-form validation failures. Surfaced to the participant; no
/// session is created until the form passes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParticipantError {
    #[error("participant name must not be empty")]
    EmptyName,
    #[error("game id must not be empty")]
    EmptyGameId,
    #[error("a department must be selected")]
    DepartmentNotSelected,
    #[error("not a listed department: {0}")]
    UnknownDepartment(String),
}

/// Validated participant identity. Constructing one is the only way
/// into a session, so invalid identities never reach the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    name: String,
    department: Department,
    game_id: String,
}

impl Participant {
    /// Validate the identity form. The game id is sanitized into a
    /// filesystem-safe token (whitespace becomes underscores) because
    /// it later names the export file.
    ///
    /// # Errors
    ///
    /// Returns a [`ParticipantError`] for an empty name or game id.
    pub fn new(
        name: &str,
        department: Department,
        game_id: &str,
    ) -> Result<Self, ParticipantError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ParticipantError::EmptyName);
        }
        let game_id = sanitize_game_id(game_id);
        if game_id.is_empty() {
            return Err(ParticipantError::EmptyGameId);
        }
        Ok(Self {
            name: name.to_string(),
            department,
            game_id,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn department(&self) -> Department {
        self.department
    }

    #[must_use]
    pub fn game_id(&self) -> &str {
        &self.game_id
    }
}

fn sanitize_game_id(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Explicit session phase; transitions are checked, never inferred
/// from strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// A balloon is on the pump and accepting actions.
    Active,
    /// The trial ended (collected or popped) and awaits `advance`.
    TrialEnded { exploded: bool },
    /// All trials are logged; the session is read-only.
    Complete,
}

/// Rejected session operations. Like [`TrialError`], these are caller
/// contract faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Trial(#[from] TrialError),
    /// `pump` or `collect` outside an active trial.
    #[error("no active trial; the last outcome must be advanced first")]
    TrialNotActive,
    /// `advance` without a pending trial outcome (double-advance).
    #[error("no trial outcome is pending")]
    NothingToAdvance,
    /// Any gameplay operation after the final trial was logged.
    #[error("session is complete and read-only")]
    SessionComplete,
}

/// One participant's run: the fixed balloon sequence, the current
/// trial, the banked total, and the append-only record log.
#[derive(Debug, Clone)]
pub struct Session {
    participant: Participant,
    seed: u64,
    rng: RngBundle,
    color_sequence: SmallVec<[BalloonColor; TOTAL_TRIALS]>,
    current_trial: usize,
    total_score: u32,
    trial_log: Vec<TrialRecord>,
    trial: TrialState,
    phase: SessionPhase,
}

impl Session {
    /// Start a session for a validated participant. The whole balloon
    /// sequence is drawn up front, uniformly with replacement, and
    /// never changes afterwards; trial 1 begins immediately.
    #[must_use]
    pub fn new(participant: Participant, seed: u64) -> Self {
        let rng = RngBundle::from_user_seed(seed);
        let color_sequence: SmallVec<[BalloonColor; TOTAL_TRIALS]> = (0..TOTAL_TRIALS)
            .map(|_| {
                let idx = rng.sequence().gen_range(0..BalloonColor::ALL.len());
                BalloonColor::ALL[idx]
            })
            .collect();
        let trial = TrialState::new(color_sequence[0]);
        Self {
            participant,
            seed,
            rng,
            color_sequence,
            current_trial: 1,
            total_score: 0,
            trial_log: Vec::with_capacity(TOTAL_TRIALS),
            trial,
            phase: SessionPhase::Active,
        }
    }

    /// One pump on the current balloon.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] when no trial is active.
    pub fn pump(&mut self) -> Result<PumpOutcome, SessionError> {
        self.require_active()?;
        let outcome = self.trial.pump(&self.rng)?;
        if outcome == PumpOutcome::Popped {
            self.phase = SessionPhase::TrialEnded { exploded: true };
        }
        Ok(outcome)
    }

    /// End the current trial by banking its temporary balance. The
    /// earnings reach `total_score` on the following [`Self::advance`].
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] when no trial is active.
    pub fn collect(&mut self) -> Result<(), SessionError> {
        self.require_active()?;
        self.phase = SessionPhase::TrialEnded { exploded: false };
        Ok(())
    }

    /// Finalize the ended trial into a log record and start the next
    /// trial, or complete the session after the final one.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NothingToAdvance`] unless exactly one
    /// trial outcome is pending.
    pub fn advance(&mut self) -> Result<&TrialRecord, SessionError> {
        let exploded = match self.phase {
            SessionPhase::TrialEnded { exploded } => exploded,
            SessionPhase::Active => return Err(SessionError::NothingToAdvance),
            SessionPhase::Complete => return Err(SessionError::SessionComplete),
        };
        let outcome = if exploded {
            self.trial.finalize_explosion()?
        } else {
            self.trial.collect()?
        };
        self.total_score += outcome.money_earned;
        self.trial_log.push(TrialRecord {
            trial_number: self.current_trial as u32,
            balloon_color: outcome.color,
            pumps: outcome.pumps,
            exploded: outcome.exploded,
            money_earned: outcome.money_earned,
            total_money_after_trial: self.total_score,
        });
        self.current_trial += 1;
        if self.current_trial > TOTAL_TRIALS {
            self.phase = SessionPhase::Complete;
        } else {
            self.trial = TrialState::new(self.color_sequence[self.current_trial - 1]);
            self.phase = SessionPhase::Active;
        }
        Ok(self.trial_log.last().expect("record just appended"))
    }

    const fn require_active(&self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Active => Ok(()),
            SessionPhase::TrialEnded { .. } => Err(SessionError::TrialNotActive),
            SessionPhase::Complete => Err(SessionError::SessionComplete),
        }
    }

    /// True once every trial has been logged.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.trial_log.len() == TOTAL_TRIALS
    }

    /// Ordered trial log; the full set once [`Self::is_complete`].
    #[must_use]
    pub fn export(&self) -> &[TrialRecord] {
        &self.trial_log
    }

    #[must_use]
    pub const fn participant(&self) -> &Participant {
        &self.participant
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub const fn total_score(&self) -> u32 {
        self.total_score
    }

    /// 1-based number of the trial currently in play.
    #[must_use]
    pub const fn trial_number(&self) -> usize {
        self.current_trial
    }

    /// Balloon colors for the whole session, fixed at start.
    #[must_use]
    pub fn color_sequence(&self) -> &[BalloonColor] {
        &self.color_sequence
    }

    /// State of the balloon in play, if the session is not complete.
    #[must_use]
    pub const fn current_trial(&self) -> Option<&TrialState> {
        match self.phase {
            SessionPhase::Complete => None,
            _ => Some(&self.trial),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::POINTS_PER_PUMP;

    fn participant() -> Participant {
        Participant::new("Ada Lovelace", Department::Economics, "ECO 01").unwrap()
    }

    #[test]
    fn participant_validation() {
        assert_eq!(
            Participant::new("  ", Department::Other, "x"),
            Err(ParticipantError::EmptyName)
        );
        assert_eq!(
            Participant::new("Ada", Department::Other, "   "),
            Err(ParticipantError::EmptyGameId)
        );
        let p = participant();
        assert_eq!(p.game_id(), "ECO_01");
        assert_eq!(p.name(), "Ada Lovelace");
    }

    #[test]
    fn department_parsing() {
        assert_eq!("Finance (BAF)".parse::<Department>(), Ok(Department::Finance));
        assert_eq!(
            "Select Department".parse::<Department>(),
            Err(ParticipantError::DepartmentNotSelected)
        );
        assert_eq!(
            "Astrology".parse::<Department>(),
            Err(ParticipantError::UnknownDepartment("Astrology".to_string()))
        );
        for d in Department::ALL {
            assert_eq!(d.as_str().parse::<Department>(), Ok(d));
        }
    }

    #[test]
    fn sequence_is_fixed_and_deterministic() {
        let a = Session::new(participant(), 1337);
        let b = Session::new(participant(), 1337);
        assert_eq!(a.color_sequence(), b.color_sequence());
        assert_eq!(a.color_sequence().len(), TOTAL_TRIALS);

        // Re-deriving the current color for trial k always indexes the
        // same fixed sequence.
        let mut session = Session::new(participant(), 1337);
        let sequence = session.color_sequence().to_vec();
        while !session.is_complete() {
            let k = session.trial_number();
            assert_eq!(session.current_trial().unwrap().color(), sequence[k - 1]);
            session.collect().unwrap();
            session.advance().unwrap();
        }
        assert_eq!(session.color_sequence(), sequence.as_slice());
    }

    #[test]
    fn zero_pump_session_banks_nothing() {
        let mut session = Session::new(participant(), 7);
        for _ in 0..TOTAL_TRIALS {
            session.collect().unwrap();
            let record = session.advance().unwrap();
            assert!(!record.exploded);
            assert_eq!(record.money_earned, 0);
        }
        assert!(session.is_complete());
        assert_eq!(session.total_score(), 0);
        assert_eq!(session.export().len(), TOTAL_TRIALS);
        assert!(session.current_trial().is_none());
    }

    #[test]
    fn collect_banks_on_advance() {
        let mut session = Session::new(participant(), 40);
        let before = session.total_score();
        // One pump then collect; skip the rare first-pump pop.
        if session.pump().unwrap() == PumpOutcome::Inflated {
            session.collect().unwrap();
            let record = *session.advance().unwrap();
            assert_eq!(record.pumps, 1);
            assert_eq!(record.money_earned, POINTS_PER_PUMP);
            assert_eq!(record.total_money_after_trial, before + POINTS_PER_PUMP);
            assert_eq!(session.total_score(), before + POINTS_PER_PUMP);
        }
    }

    #[test]
    fn explosion_contributes_zero() {
        let mut session = Session::new(participant(), 5);
        while session.pump().unwrap() == PumpOutcome::Inflated {}
        let record = *session.advance().unwrap();
        assert!(record.exploded);
        assert_eq!(record.money_earned, 0);
        assert_eq!(session.total_score(), 0);
    }

    #[test]
    fn actions_after_trial_end_are_rejected() {
        let mut session = Session::new(participant(), 11);
        session.collect().unwrap();
        assert_eq!(session.pump(), Err(SessionError::TrialNotActive));
        assert_eq!(session.collect(), Err(SessionError::TrialNotActive));
        session.advance().unwrap();
        // Double-advance is a contract fault.
        assert!(matches!(
            session.advance(),
            Err(SessionError::NothingToAdvance)
        ));
    }

    #[test]
    fn completed_session_is_read_only() {
        let mut session = Session::new(participant(), 3);
        for _ in 0..TOTAL_TRIALS {
            session.collect().unwrap();
            session.advance().unwrap();
        }
        assert_eq!(session.phase(), SessionPhase::Complete);
        assert_eq!(session.pump(), Err(SessionError::SessionComplete));
        assert_eq!(session.collect(), Err(SessionError::SessionComplete));
        assert!(matches!(
            session.advance(),
            Err(SessionError::SessionComplete)
        ));
    }

    #[test]
    fn log_grows_by_one_per_advance() {
        let mut session = Session::new(participant(), 21);
        let mut expected_len = 0;
        while !session.is_complete() {
            while session.pump().unwrap() == PumpOutcome::Inflated {
                if session.current_trial().unwrap().pumps() >= 2 {
                    session.collect().unwrap();
                    break;
                }
            }
            session.advance().unwrap();
            expected_len += 1;
            assert_eq!(session.export().len(), expected_len);
        }
        assert_eq!(expected_len, TOTAL_TRIALS);
    }
}
