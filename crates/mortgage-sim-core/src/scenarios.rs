//! Four-way payoff strategy comparison.
//!
//! Runs the same loan through four fixed configurations — standard schedule,
//! extra payments without refinancing, refinance without continued extras,
//! refinance with continued extras — and returns them in that fixed order.
//! Index 0 is the baseline strategies are compared against.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MortgageSimError;
use crate::simulation::{
    simulate, simulate_with_refinance, ExtraPaymentPlan, LoanTerms, RefinanceEvent,
    SimulationResult,
};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::MortgageSimResult;

/// Caller-supplied input record for the scenario comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioInput {
    /// Original principal.
    pub principal: Money,
    /// Annual interest rate in percent (6 = 6%).
    pub annual_rate_pct: Rate,
    /// Loan term in months.
    pub term_months: u32,
    /// Recurring extra payment applied every month before any refinance.
    #[serde(default)]
    pub extra_monthly: Money,
    /// One-time extra principal payment on day one.
    #[serde(default)]
    pub lump_sum_at_start: Money,
    /// Month offset at which the refinance occurs.
    #[serde(default)]
    pub refinance_after_months: u32,
    /// New term in months at refinance.
    pub refinance_term_months: u32,
    /// New annual rate in percent at refinance.
    #[serde(default)]
    pub refinance_rate_pct: Rate,
    /// Recurring extra payment continued after the refinance.
    #[serde(default)]
    pub extra_monthly_after_refinance: Money,
    /// One-time extra principal payment at the refinance boundary.
    #[serde(default)]
    pub lump_sum_at_refinance: Money,
}

/// One strategy's outcome, tagged for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Display name of the strategy.
    pub name: String,
    /// One-line description of what the strategy does.
    pub description: String,
    #[serde(flatten)]
    pub result: SimulationResult,
}

/// Ordered list of the four strategy outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutput {
    pub scenarios: Vec<ScenarioResult>,
}

/// Run the four fixed configurations against the same loan terms.
///
/// Ordering is part of the contract: 0 = standard baseline, 1 = extra
/// payments without refinance, 2 = refinance with pre-refinance extras only,
/// 3 = refinance with extras continuing afterward.
pub fn calculate_scenarios(input: &ScenarioInput) -> Vec<ScenarioResult> {
    let terms = LoanTerms {
        principal: input.principal,
        annual_rate_pct: input.annual_rate_pct,
        term_months: input.term_months,
    };
    let plan = ExtraPaymentPlan {
        extra_monthly: input.extra_monthly,
        lump_sum: input.lump_sum_at_start,
    };
    let refinance = RefinanceEvent {
        after_months: input.refinance_after_months,
        new_rate_pct: input.refinance_rate_pct,
        new_term_months: input.refinance_term_months,
    };

    vec![
        ScenarioResult {
            name: "Standard".into(),
            description: "Scheduled payments only, no extra principal, no refinance".into(),
            result: simulate(&terms, &ExtraPaymentPlan::default()),
        },
        ScenarioResult {
            name: "Extra payments".into(),
            description: "Recurring extra payment and day-one lump sum, no refinance".into(),
            result: simulate(&terms, &plan),
        },
        ScenarioResult {
            name: "Refinance".into(),
            description: "Extra payments and lump sum until the refinance, then scheduled payments only"
                .into(),
            result: simulate_with_refinance(
                &terms,
                &plan,
                &refinance,
                Decimal::ZERO,
                Decimal::ZERO,
            ),
        },
        ScenarioResult {
            name: "Refinance + extra payments".into(),
            description: "Refinance with extra payments and lump sum continuing afterward".into(),
            result: simulate_with_refinance(
                &terms,
                &plan,
                &refinance,
                input.extra_monthly_after_refinance,
                input.lump_sum_at_refinance,
            ),
        },
    ]
}

/// Run the validated four-way comparison.
pub fn analyze_scenarios(
    input: &ScenarioInput,
) -> MortgageSimResult<ComputationOutput<ScenarioOutput>> {
    let start = Instant::now();
    validate_scenarios(input)?;

    let mut warnings = Vec::new();
    if input.refinance_after_months >= input.term_months {
        warnings.push(
            "Refinance month is at or beyond the original term; refinance scenarios match the non-refinance ones"
                .into(),
        );
    }
    if input.lump_sum_at_start >= input.principal {
        warnings.push("Lump sum at start covers the full principal; loan pays off on day one".into());
    }

    let output = ScenarioOutput {
        scenarios: calculate_scenarios(input),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Rate Amortization Strategy Comparison",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_scenarios(input: &ScenarioInput) -> MortgageSimResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(MortgageSimError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if input.term_months == 0 {
        return Err(MortgageSimError::InvalidInput {
            field: "term_months".into(),
            reason: "Term must be greater than zero months".into(),
        });
    }
    if input.refinance_term_months == 0 {
        return Err(MortgageSimError::InvalidInput {
            field: "refinance_term_months".into(),
            reason: "Refinance term must be greater than zero months".into(),
        });
    }
    if input.annual_rate_pct < Decimal::ZERO || input.refinance_rate_pct < Decimal::ZERO {
        return Err(MortgageSimError::InvalidInput {
            field: "annual_rate_pct".into(),
            reason: "Rates cannot be negative".into(),
        });
    }
    for (value, field) in [
        (input.extra_monthly, "extra_monthly"),
        (input.lump_sum_at_start, "lump_sum_at_start"),
        (input.extra_monthly_after_refinance, "extra_monthly_after_refinance"),
        (input.lump_sum_at_refinance, "lump_sum_at_refinance"),
    ] {
        if value < Decimal::ZERO {
            return Err(MortgageSimError::InvalidInput {
                field: field.into(),
                reason: "Amount cannot be negative".into(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
