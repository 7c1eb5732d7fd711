use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_sim_core::payment::{self, PaymentInput};

use crate::input;

/// Arguments for the scheduled payment calculation
#[derive(Args)]
pub struct PaymentArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 6 for 6%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in months
    #[arg(long)]
    pub term_months: Option<u32>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let payment_input: PaymentInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        PaymentInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_months: args
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
        }
    };
    let result = payment::analyze_payment(&payment_input)?;
    Ok(serde_json::to_value(result)?)
}
