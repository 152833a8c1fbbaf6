mod commands;
mod input;
mod output;
mod settings;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::payout::{BreakdownArgs, EditArgs, RecomputeArgs};
use commands::summary::SummaryArgs;

/// Commission, TDS and net profit for insurance lead payouts
#[derive(Parser)]
#[command(
    name = "payout",
    version,
    about = "Commission, TDS and net profit for insurance lead payouts",
    long_about = "Recompute the derived figures of insurance payout records with decimal \
                  precision. Supports Net, OD, TP, OD+TP, ONLINE POINTS and Fixed commission \
                  bases, default TDS, field edits with recompute, and batch summaries."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Calculator settings file (JSON, YAML or TOML)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log filter when RUST_LOG is unset (e.g. debug, payout_core=trace)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Recompute earning, TDS, post-TDS amount and net profit for one record
    Recompute(RecomputeArgs),
    /// Show every intermediate of the commission calculation with warnings
    Breakdown(BreakdownArgs),
    /// Apply field edits to a record, recomputing after each
    Edit(EditArgs),
    /// Totals across a batch of payout records
    Summary(SummaryArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    settings::init_tracing(&cli.log_level);

    let calc_settings = match settings::load_settings(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}: invalid configuration: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };
    tracing::debug!(settings = ?calc_settings, "calculator settings loaded");

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Recompute(args) => commands::payout::run_recompute(args, &calc_settings),
        Commands::Breakdown(args) => commands::payout::run_breakdown(args, &calc_settings),
        Commands::Edit(args) => commands::payout::run_edit(args, &calc_settings),
        Commands::Summary(args) => commands::summary::run_summary(args, &calc_settings),
        Commands::Version => {
            println!("payout {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
