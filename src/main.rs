use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod growth;
mod indicators;
mod input;
mod lexicon;
mod matcher;
mod models;
mod normalize;
mod report;
mod trend;

use input::Period;
use lexicon::{AnalysisConfig, Lexicon};

#[derive(Parser)]
#[command(name = "writing-growth")]
#[command(about = "Feedback application and growth analytics for writing practice history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a history file and print the analytics report as JSON
    Analyze {
        #[arg(long)]
        history: PathBuf,
        #[arg(long, value_enum, default_value_t = Period::Month)]
        period: Period,
    },
    /// Generate a markdown growth report
    Report {
        #[arg(long)]
        history: PathBuf,
        #[arg(long, value_enum, default_value_t = Period::Month)]
        period: Period,
        #[arg(long, default_value = "growth-report.md")]
        out: PathBuf,
    },
    /// Convert a CSV of entries into a history file
    Import {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value = "history.json")]
        out: PathBuf,
    },
    /// Write a realistic sample history file
    Sample {
        #[arg(long, default_value = "sample-history.json")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let lexicon = Lexicon::default();
    let config = AnalysisConfig::default();

    match cli.command {
        Commands::Analyze { history, period } => {
            let records = input::load_history(&history)?;
            let cutoff = input::cutoff_date(period);
            let (entries, payloads) = input::split_records(input::filter_window(records, cutoff));
            let analytics = growth::analyze_history(&entries, &payloads, &lexicon, &config);
            println!("{}", serde_json::to_string_pretty(&analytics)?);
        }
        Commands::Report {
            history,
            period,
            out,
        } => {
            let records = input::load_history(&history)?;
            let cutoff = input::cutoff_date(period);
            let (entries, payloads) = input::split_records(input::filter_window(records, cutoff));
            let analytics = growth::analyze_history(&entries, &payloads, &lexicon, &config);
            let markdown = report::build_report(&analytics, cutoff);
            std::fs::write(&out, markdown)?;
            println!("Report written to {}.", out.display());
        }
        Commands::Import { csv, out } => {
            let records = input::import_csv(&csv)?;
            let imported = records.len();
            input::write_history(&out, &records)?;
            println!(
                "Imported {imported} entries from {} into {}.",
                csv.display(),
                out.display()
            );
        }
        Commands::Sample { out } => {
            let records = input::sample_history()?;
            input::write_history(&out, &records)?;
            println!("Sample history written to {}.", out.display());
        }
    }

    Ok(())
}
