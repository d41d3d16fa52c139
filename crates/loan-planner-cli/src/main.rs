mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process;

use commands::compare::CompareArgs;
use commands::payment::PaymentArgs;
use commands::schedule::ScheduleArgs;
use commands::state::StateArgs;

/// Loan amortization schedules and prepayment what-if scenarios
#[derive(Parser)]
#[command(
    name = "loanplan",
    version,
    about = "Loan amortization schedules and prepayment what-if scenarios",
    long_about = "A CLI for fixed-rate loan amortization with decimal precision. \
                  Computes level payments and month-by-month schedules, and compares \
                  extra-principal scenarios (recurring extras and one-time lump sums) \
                  against the base payoff."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Directory holding saved planner state
    #[arg(long, env = "LOANPLAN_STORE_DIR", default_value = ".loanplan", global = true)]
    store_dir: PathBuf,

    /// Debug logging (otherwise RUST_LOG, default warn)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Level monthly payment for a fixed-rate loan
    Payment(PaymentArgs),
    /// Month-by-month amortization schedule
    Schedule(ScheduleArgs),
    /// Compare extra-principal scenarios against the base schedule
    Compare(CompareArgs),
    /// Saved loan and scenarios
    State(StateArgs),
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

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::payment::run_payment(args),
        Commands::Schedule(args) => commands::schedule::run_schedule(args, &cli.output),
        Commands::Compare(args) => commands::compare::run_compare(args, &cli.output),
        Commands::State(args) => commands::state::run_state(args, &cli.store_dir, &cli.output),
        Commands::Version => {
            println!("loanplan {}", env!("CARGO_PKG_VERSION"));
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
