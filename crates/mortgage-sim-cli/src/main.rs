mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::payment::PaymentArgs;
use commands::scenarios::ScenariosArgs;
use commands::simulate::{RefinanceArgs, SimulateArgs};

/// Mortgage payoff strategy comparison
#[derive(Parser)]
#[command(
    name = "mortsim",
    version,
    about = "Mortgage amortization and payoff-strategy comparison",
    long_about = "Simulates mortgage payoff month by month with decimal precision: \
                  scheduled payments, recurring extra payments, lump sums, and a \
                  mid-life refinance. The scenarios command compares the four \
                  standard strategies side by side."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the scheduled monthly principal-and-interest payment
    Payment(PaymentArgs),
    /// Simulate payoff with extra payments and a day-one lump sum
    Simulate(SimulateArgs),
    /// Simulate payoff with a mid-life refinance
    Refinance(RefinanceArgs),
    /// Compare the four payoff strategies for one loan
    Scenarios(ScenariosArgs),
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

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::payment::run_payment(args),
        Commands::Simulate(args) => commands::simulate::run_simulate(args),
        Commands::Refinance(args) => commands::simulate::run_refinance(args),
        Commands::Scenarios(args) => commands::scenarios::run_scenarios(args),
        Commands::Version => {
            println!("mortsim {}", env!("CARGO_PKG_VERSION"));
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
