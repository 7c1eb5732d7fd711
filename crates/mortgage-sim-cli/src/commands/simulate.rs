use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_sim_core::simulation::{self, RefinanceInput, SimulationInput};

use crate::input;

/// Arguments for the single-phase payoff simulation
#[derive(Args)]
pub struct SimulateArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 6 for 6%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in months
    #[arg(long)]
    pub term_months: Option<u32>,

    /// Recurring extra payment applied every month
    #[arg(long)]
    pub extra_monthly: Option<Decimal>,

    /// One-time extra principal payment on day one
    #[arg(long)]
    pub lump_sum_at_start: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the two-phase refinance simulation
#[derive(Args)]
pub struct RefinanceArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 6 for 6%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in months
    #[arg(long)]
    pub term_months: Option<u32>,

    /// Recurring extra payment applied every month before the refinance
    #[arg(long)]
    pub extra_monthly: Option<Decimal>,

    /// One-time extra principal payment on day one
    #[arg(long)]
    pub lump_sum_at_start: Option<Decimal>,

    /// Month offset at which the refinance occurs
    #[arg(long)]
    pub refinance_after_months: Option<u32>,

    /// New term in months at refinance
    #[arg(long)]
    pub refinance_term_months: Option<u32>,

    /// New annual rate in percent at refinance
    #[arg(long)]
    pub refinance_rate: Option<Decimal>,

    /// Recurring extra payment continued after the refinance
    #[arg(long)]
    pub extra_after: Option<Decimal>,

    /// One-time extra principal payment at the refinance boundary
    #[arg(long)]
    pub lump_sum_at_refinance: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sim_input: SimulationInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        SimulationInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_months: args
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
            extra_monthly: args.extra_monthly.unwrap_or(Decimal::ZERO),
            lump_sum_at_start: args.lump_sum_at_start.unwrap_or(Decimal::ZERO),
        }
    };
    let result = simulation::analyze_simulation(&sim_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_refinance(args: RefinanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let refi_input: RefinanceInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        RefinanceInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_months: args
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
            extra_monthly: args.extra_monthly.unwrap_or(Decimal::ZERO),
            lump_sum_at_start: args.lump_sum_at_start.unwrap_or(Decimal::ZERO),
            refinance_after_months: args
                .refinance_after_months
                .ok_or("--refinance-after-months is required (or provide --input)")?,
            refinance_term_months: args
                .refinance_term_months
                .ok_or("--refinance-term-months is required (or provide --input)")?,
            refinance_rate_pct: args
                .refinance_rate
                .ok_or("--refinance-rate is required (or provide --input)")?,
            extra_monthly_after_refinance: args.extra_after.unwrap_or(Decimal::ZERO),
            lump_sum_at_refinance: args.lump_sum_at_refinance.unwrap_or(Decimal::ZERO),
        }
    };
    let result = simulation::analyze_refinance(&refi_input)?;
    Ok(serde_json::to_value(result)?)
}
