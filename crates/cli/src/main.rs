use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use trajectory_core::{analyze, classify, parse_visits_json, Issue};

#[derive(Parser)]
#[command(name = "trajectory")]
#[command(about = "Offline patient trajectory analysis")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the severity level of a diagnosis
    Classify {
        /// Free-text diagnosis, e.g. "Diabetes Type 2"
        diagnosis: String,
    },
    /// Analyse a JSON array of visits
    Analyze {
        /// Path to a JSON file containing an array of visits
        file: PathBuf,
        /// Print the issues as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Classify { diagnosis }) => match classify(&diagnosis) {
            Some(severity) => println!("{severity}"),
            None => println!("unknown"),
        },
        Some(Commands::Analyze { file, json }) => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let visits = parse_visits_json(&text)
                .with_context(|| format!("failed to parse visits from {}", file.display()))?;
            let issues = analyze(&visits);

            if json {
                println!("{}", serde_json::to_string_pretty(&issues)?);
            } else if issues.is_empty() {
                println!("No issues found.");
            } else {
                for issue in &issues {
                    println!("{}", format_issue(issue));
                }
            }
        }
        None => {
            println!("Use 'trajectory --help' for commands");
        }
    }

    Ok(())
}

fn format_issue(issue: &Issue) -> String {
    let dates: Vec<String> = issue
        .related_dates
        .iter()
        .map(|d| d.to_string())
        .collect();
    format!("[{}] {}: {}", issue.issue_type, dates.join(", "), issue.message)
}
