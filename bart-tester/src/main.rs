mod policy;
mod report;
mod runner;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use policy::PumpPolicy;
use runner::RunSummary;

#[derive(Debug, Parser)]
#[command(name = "bart-tester", version)]
#[command(about = "Automated QA runner for the BART engine - scripted sessions over seed sweeps")]
struct Args {
    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Pump policy driving the scripted participant
    #[arg(long, value_enum, default_value_t = PumpPolicy::Balanced)]
    policy: PumpPolicy,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json"])]
    report: String,

    /// Directory to write per-session CSV exports into
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let seeds = split_seeds(&args.seeds)?;
    let mut summaries = Vec::with_capacity(seeds.len());
    for seed in seeds {
        log::info!("running scripted session, seed {seed}, policy {}", args.policy);
        let summary = runner::run_session(seed, args.policy)
            .with_context(|| format!("session failed for seed {seed}"))?;
        if let Some(dir) = &args.export_dir {
            write_export(dir, &summary)?;
        }
        summaries.push(summary);
    }

    match args.report.as_str() {
        "json" => println!("{}", report::render_json(&summaries)?),
        _ => report::print_console(&summaries, args.verbose),
    }
    Ok(())
}

fn split_seeds(raw: &str) -> Result<Vec<u64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>()
                .with_context(|| format!("invalid seed '{s}'"))
        })
        .collect()
}

fn write_export(dir: &Path, summary: &RunSummary) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating export dir {}", dir.display()))?;
    let path = dir.join(&summary.export_name);
    fs::write(&path, &summary.csv).with_context(|| format!("writing {}", path.display()))?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_lists_parse() {
        assert_eq!(split_seeds("1, 2,3").unwrap(), vec![1, 2, 3]);
        assert_eq!(split_seeds("1337").unwrap(), vec![1337]);
        assert!(split_seeds("1,x").is_err());
    }
}
