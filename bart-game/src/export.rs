//! Tabular export of the trial log.
//!
//! Column order is a compatibility contract with downstream analysis
//! tooling; do not reorder fields.

use std::fmt::Write as _;

use crate::constants::EXPORT_FILE_PREFIX;
use crate::session::{Participant, Session};
use crate::trial::TrialRecord;

/// CSV header row, in the contracted column order.
pub const CSV_HEADER: &str = "participant_name,department,game_id,trial_number,balloon_color,\
                              pumps,exploded,money_earned,total_money_after_trial";

/// Export filename derived from the sanitized game id.
#[must_use]
pub fn csv_filename(participant: &Participant) -> String {
    format!("{EXPORT_FILE_PREFIX}{}.csv", participant.game_id())
}

/// Render the trial log as CSV, one row per completed trial in
/// trial-number order. Exploded is encoded 0/1.
#[must_use]
pub fn render_csv(participant: &Participant, records: &[TrialRecord]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + records.len() * 64);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for record in records {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{},{},{}",
            escape_field(participant.name()),
            escape_field(participant.department().as_str()),
            participant.game_id(),
            record.trial_number,
            record.balloon_color,
            record.pumps,
            u8::from(record.exploded),
            record.money_earned,
            record.total_money_after_trial,
        );
    }
    out
}

/// Convenience wrapper rendering a session's current log.
#[must_use]
pub fn session_csv(session: &Session) -> String {
    render_csv(session.participant(), session.export())
}

fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::BalloonColor;
    use crate::session::Department;

    fn participant() -> Participant {
        Participant::new("Grace Hopper", Department::Finance, "BAF 01").unwrap()
    }

    fn record(n: u32, pumps: u32, exploded: bool, money: u32, total: u32) -> TrialRecord {
        TrialRecord {
            trial_number: n,
            balloon_color: BalloonColor::Yellow,
            pumps,
            exploded,
            money_earned: money,
            total_money_after_trial: total,
        }
    }

    #[test]
    fn filename_uses_sanitized_game_id() {
        assert_eq!(csv_filename(&participant()), "BART_BAF_01.csv");
    }

    #[test]
    fn rows_follow_column_contract() {
        let csv = render_csv(&participant(), &[record(1, 3, false, 15, 15)]);
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), CSV_HEADER);
        assert_eq!(
            lines.next().unwrap(),
            "Grace Hopper,Finance (BAF),BAF_01,1,Yellow,3,0,15,15"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn exploded_encodes_as_zero_one() {
        let csv = render_csv(
            &participant(),
            &[record(1, 8, true, 0, 0), record(2, 1, false, 5, 5)],
        );
        let rows: Vec<&str> = csv.lines().skip(1).collect();
        assert!(rows[0].ends_with(",8,1,0,0"));
        assert!(rows[1].ends_with(",1,0,5,5"));
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let commas = Participant::new("Hopper, Grace", Department::Other, "x1").unwrap();
        let csv = render_csv(&commas, &[record(1, 2, false, 10, 10)]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("\"Hopper, Grace\",Other,x1,1,Yellow,"));
    }
}
