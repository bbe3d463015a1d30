//! Console and JSON reporting for scripted runs.

use anyhow::Result;
use colored::Colorize;

use crate::runner::RunSummary;

pub fn print_console(summaries: &[RunSummary], verbose: bool) {
    println!();
    println!("{}", "📊 BART Session Sweep".bright_cyan().bold());
    println!("{}", "=====================".cyan());

    let runs = summaries.len();
    let total_score: u32 = summaries.iter().map(|s| s.total_score).sum();
    let explosions: u32 = summaries.iter().map(|s| s.explosions).sum();
    let trials: u32 = summaries.iter().map(|s| s.records.len() as u32).sum();

    println!("Sessions run: {runs}");
    println!("Trials logged: {trials}");
    #[allow(clippy::cast_precision_loss)]
    let explosion_rate = if trials == 0 {
        0.0
    } else {
        f64::from(explosions) / f64::from(trials) * 100.0
    };
    println!("Explosion rate: {explosion_rate:.1}%");
    #[allow(clippy::cast_precision_loss)]
    let mean_score = if runs == 0 {
        0.0
    } else {
        f64::from(total_score) / runs as f64
    };
    println!("Mean banked score: {mean_score:.1}");
    println!();

    for summary in summaries {
        let banked = format!("${}", summary.total_score);
        println!(
            "{} seed {} ({}): {} banked, {} pumps, {} pops",
            "✅".green(),
            summary.seed.to_string().bold(),
            summary.policy,
            banked.green(),
            summary.total_pumps,
            summary.explosions.to_string().red()
        );
        if verbose {
            for record in &summary.records {
                let ending = if record.exploded {
                    "💥 popped".red()
                } else {
                    "💰 collected".green()
                };
                println!(
                    "   trial {} {} after {} pumps (+${}, total ${})",
                    record.trial_number,
                    ending,
                    record.pumps,
                    record.money_earned,
                    record.total_money_after_trial
                );
            }
        }
    }
    println!();
}

pub fn render_json(summaries: &[RunSummary]) -> Result<String> {
    Ok(serde_json::to_string_pretty(summaries)?)
}
