//! Drives complete scripted sessions and validates engine invariants
//! after every run.

use anyhow::{Context, Result, bail};
use bart_game::{
    Department, POINTS_PER_PUMP, Participant, PumpOutcome, Session, TOTAL_TRIALS, TrialRecord,
    csv_filename, session_csv,
};
use serde::Serialize;

use crate::policy::PumpPolicy;

/// Outcome of one scripted session, plus its rendered CSV export.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub policy: String,
    pub total_score: u32,
    pub explosions: u32,
    pub total_pumps: u32,
    pub records: Vec<TrialRecord>,
    pub export_name: String,
    #[serde(skip)]
    pub csv: String,
}

/// Run one full scripted session for the given seed and policy.
pub fn run_session(seed: u64, policy: PumpPolicy) -> Result<RunSummary> {
    let game_id = format!("{policy}-{seed}");
    let participant = Participant::new("Auto Runner", Department::Other, &game_id)
        .context("identity form rejected")?;
    let mut session = Session::new(participant, seed);

    while !session.is_complete() {
        let target = session
            .current_trial()
            .map(|trial| policy.target_pumps(trial.color()))
            .context("active session without a trial")?;
        loop {
            let pumps = session.current_trial().map_or(0, |trial| trial.pumps());
            if pumps >= target {
                session.collect()?;
                break;
            }
            match session.pump()? {
                PumpOutcome::Popped => break,
                PumpOutcome::Inflated => {}
            }
        }
        let record = session.advance()?;
        log::debug!(
            "seed {seed} trial {}: {} pumps, exploded={}, earned {}",
            record.trial_number,
            record.pumps,
            record.exploded,
            record.money_earned
        );
    }

    verify(&session)?;

    let records = session.export().to_vec();
    let explosions = records.iter().filter(|r| r.exploded).count() as u32;
    let total_pumps = records.iter().map(|r| r.pumps).sum();
    Ok(RunSummary {
        seed,
        policy: policy.to_string(),
        total_score: session.total_score(),
        explosions,
        total_pumps,
        export_name: csv_filename(session.participant()),
        csv: session_csv(&session),
        records,
    })
}

/// Re-check the engine's promises on the finished log.
fn verify(session: &Session) -> Result<()> {
    let records = session.export();
    if records.len() != TOTAL_TRIALS {
        bail!("expected {TOTAL_TRIALS} records, got {}", records.len());
    }
    let mut running = 0;
    for record in records {
        if record.pumps > record.balloon_color.max_pumps() {
            bail!("trial {} exceeded the pump ceiling", record.trial_number);
        }
        let expected = if record.exploded {
            0
        } else {
            record.pumps * POINTS_PER_PUMP
        };
        if record.money_earned != expected {
            bail!(
                "trial {} earned {} but should earn {expected}",
                record.trial_number,
                record.money_earned
            );
        }
        running += record.money_earned;
        if record.total_money_after_trial != running {
            bail!("trial {} running total drifted", record.trial_number);
        }
    }
    if session.total_score() != running {
        bail!("session total diverged from the record log");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceiling_policy_pops_every_balloon() {
        let summary = run_session(1337, PumpPolicy::Ceiling).unwrap();
        assert_eq!(summary.explosions as usize, TOTAL_TRIALS);
        assert_eq!(summary.total_score, 0);
    }

    #[test]
    fn cautious_runs_bank_when_balloons_hold() {
        let summary = run_session(1337, PumpPolicy::Cautious).unwrap();
        assert_eq!(summary.records.len(), TOTAL_TRIALS);
        for record in &summary.records {
            if !record.exploded {
                assert_eq!(record.money_earned, record.pumps * POINTS_PER_PUMP);
            }
        }
    }

    #[test]
    fn summary_export_matches_game_id() {
        let summary = run_session(9, PumpPolicy::Balanced).unwrap();
        assert_eq!(summary.export_name, "BART_balanced-9.csv");
        assert!(summary.csv.starts_with(bart_game::CSV_HEADER));
    }
}
