//! Month-by-month amortization simulation.
//!
//! One phase-stepping primitive drives both the single-phase payoff
//! simulation and the two-phase refinance simulation, so the two paths
//! cannot diverge in rounding or final-payment cap behavior.
//! All math in `rust_decimal::Decimal`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MortgageSimError;
use crate::payment::{monthly_rate, scheduled_payment};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::MortgageSimResult;

/// Minimum balance threshold below which the loan is considered fully paid.
pub(crate) const BALANCE_EPSILON: Decimal = dec!(0.01);

/// Reported totals are rounded to the cent. Nothing else is rounded.
const CENTS: u32 = 2;

// ---------------------------------------------------------------------------
// Value types
// ---------------------------------------------------------------------------

/// Immutable terms of a fixed-rate loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Original principal.
    pub principal: Money,
    /// Annual interest rate in percent (6 = 6%).
    pub annual_rate_pct: Rate,
    /// Term in months.
    pub term_months: u32,
}

/// Extra principal applied on top of the scheduled payment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtraPaymentPlan {
    /// Recurring extra amount applied every month.
    pub extra_monthly: Money,
    /// One-time extra principal payment applied on day one.
    pub lump_sum: Money,
}

/// A mid-life refinance: new rate and term, payment recomputed against the
/// balance outstanding at that month rather than the original principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinanceEvent {
    /// Month offset at which the refinance occurs.
    pub after_months: u32,
    /// New annual rate in percent.
    pub new_rate_pct: Rate,
    /// New term in months.
    pub new_term_months: u32,
}

/// Outcome of a payoff simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Every cash outflow summed: scheduled payments, extras, lump sums.
    pub total_paid: Money,
    /// Months until the balance reached zero or the term ran out.
    pub duration_months: u32,
    /// Scheduled monthly payment of the original loan.
    pub scheduled_payment: Money,
    /// Scheduled monthly payment after the refinance, when one occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refinance_payment: Option<Money>,
}

// ---------------------------------------------------------------------------
// Phase stepping
// ---------------------------------------------------------------------------

struct PhaseOutcome {
    paid: Money,
    months: u32,
    ending_balance: Money,
}

/// Step one level-pay phase month by month until payoff or the month cap.
///
/// Interest accrues on the running balance; the final payment is capped at
/// `balance + interest_due` so the balance never goes negative.
fn run_phase(
    starting_balance: Money,
    rate_monthly: Rate,
    scheduled: Money,
    extra_monthly: Money,
    max_months: u32,
) -> PhaseOutcome {
    let mut balance = starting_balance;
    let mut paid = Decimal::ZERO;
    let mut months = 0u32;

    while balance > BALANCE_EPSILON && months < max_months {
        let interest_due = balance * rate_monthly;
        let payoff = balance + interest_due;
        let nominal = scheduled + extra_monthly;
        let actual = if payoff < nominal { payoff } else { nominal };

        balance -= actual - interest_due;
        if balance < Decimal::ZERO {
            balance = Decimal::ZERO;
        }
        paid += actual;
        months += 1;
    }

    PhaseOutcome {
        paid,
        months,
        ending_balance: balance,
    }
}

/// Lump sums never pay more than what is owed.
fn capped_lump(lump: Money, owed: Money) -> Money {
    if lump < owed {
        lump
    } else {
        owed
    }
}

// ---------------------------------------------------------------------------
// Simulators
// ---------------------------------------------------------------------------

/// Simulate payoff of a loan under an extra-payment plan.
///
/// The scheduled payment is computed from the original principal, not the
/// post-lump-sum balance: a day-one lump sum accelerates payoff instead of
/// lowering the monthly bill. A lump sum covering the whole principal pays
/// the loan off on day one with `total_paid` equal to the principal.
pub fn simulate(terms: &LoanTerms, plan: &ExtraPaymentPlan) -> SimulationResult {
    let lump = capped_lump(plan.lump_sum, terms.principal);
    let starting_balance = terms.principal - lump;
    if starting_balance <= Decimal::ZERO {
        return SimulationResult {
            total_paid: terms.principal.round_dp(CENTS),
            duration_months: 0,
            scheduled_payment: Decimal::ZERO,
            refinance_payment: None,
        };
    }

    let scheduled = scheduled_payment(terms.principal, terms.annual_rate_pct, terms.term_months);
    let phase = run_phase(
        starting_balance,
        monthly_rate(terms.annual_rate_pct),
        scheduled,
        plan.extra_monthly,
        terms.term_months,
    );

    SimulationResult {
        total_paid: (lump + phase.paid).round_dp(CENTS),
        duration_months: phase.months,
        scheduled_payment: scheduled,
        refinance_payment: None,
    }
}

/// Simulate payoff with a refinance at `refinance.after_months`.
///
/// Phase 1 follows the original schedule (with the plan's extras) up to the
/// refinance month. At the boundary the refinance lump sum is applied, then
/// the new scheduled payment is computed from the remaining balance, the new
/// rate, and the new term. Phase 2 runs on its own term counter while
/// `duration_months` keeps accumulating. `refinance_payment` is present
/// exactly when phase 2 was entered.
pub fn simulate_with_refinance(
    terms: &LoanTerms,
    plan: &ExtraPaymentPlan,
    refinance: &RefinanceEvent,
    extra_after: Money,
    lump_at_refinance: Money,
) -> SimulationResult {
    let lump_start = capped_lump(plan.lump_sum, terms.principal);
    let starting_balance = terms.principal - lump_start;
    if starting_balance <= Decimal::ZERO {
        return SimulationResult {
            total_paid: terms.principal.round_dp(CENTS),
            duration_months: 0,
            scheduled_payment: Decimal::ZERO,
            refinance_payment: None,
        };
    }

    let scheduled = scheduled_payment(terms.principal, terms.annual_rate_pct, terms.term_months);
    let phase1 = run_phase(
        starting_balance,
        monthly_rate(terms.annual_rate_pct),
        scheduled,
        plan.extra_monthly,
        terms.term_months.min(refinance.after_months),
    );

    let mut total_paid = lump_start + phase1.paid;

    // Paid off before the refinance point: no second phase.
    if phase1.ending_balance <= BALANCE_EPSILON {
        return SimulationResult {
            total_paid: total_paid.round_dp(CENTS),
            duration_months: phase1.months,
            scheduled_payment: scheduled,
            refinance_payment: None,
        };
    }

    let lump_refi = capped_lump(lump_at_refinance, phase1.ending_balance);
    let balance = phase1.ending_balance - lump_refi;
    total_paid += lump_refi;

    // The refinance lump sum cleared the loan.
    if balance <= BALANCE_EPSILON {
        return SimulationResult {
            total_paid: total_paid.round_dp(CENTS),
            duration_months: phase1.months,
            scheduled_payment: scheduled,
            refinance_payment: None,
        };
    }

    // The refinance payment is always computed off what is actually owed.
    let refinance_payment =
        scheduled_payment(balance, refinance.new_rate_pct, refinance.new_term_months);
    let phase2 = run_phase(
        balance,
        monthly_rate(refinance.new_rate_pct),
        refinance_payment,
        extra_after,
        refinance.new_term_months,
    );

    SimulationResult {
        total_paid: (total_paid + phase2.paid).round_dp(CENTS),
        duration_months: phase1.months + phase2.months,
        scheduled_payment: scheduled,
        refinance_payment: Some(refinance_payment),
    }
}

// ---------------------------------------------------------------------------
// Validated entry points
// ---------------------------------------------------------------------------

/// Single-phase simulation input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationInput {
    /// Original principal.
    pub principal: Money,
    /// Annual interest rate in percent (6 = 6%).
    pub annual_rate_pct: Rate,
    /// Term in months.
    pub term_months: u32,
    /// Recurring extra payment applied every month.
    #[serde(default)]
    pub extra_monthly: Money,
    /// One-time extra principal payment on day one.
    #[serde(default)]
    pub lump_sum_at_start: Money,
}

/// Two-phase refinance simulation input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinanceInput {
    /// Original principal.
    pub principal: Money,
    /// Annual interest rate in percent (6 = 6%).
    pub annual_rate_pct: Rate,
    /// Term in months.
    pub term_months: u32,
    /// Recurring extra payment applied every month before the refinance.
    #[serde(default)]
    pub extra_monthly: Money,
    /// One-time extra principal payment on day one.
    #[serde(default)]
    pub lump_sum_at_start: Money,
    /// Month offset at which the refinance occurs.
    pub refinance_after_months: u32,
    /// New term in months.
    pub refinance_term_months: u32,
    /// New annual rate in percent.
    pub refinance_rate_pct: Rate,
    /// Recurring extra payment continued after the refinance.
    #[serde(default)]
    pub extra_monthly_after_refinance: Money,
    /// One-time extra principal payment at the refinance boundary.
    #[serde(default)]
    pub lump_sum_at_refinance: Money,
}

/// Run a validated single-phase payoff simulation.
pub fn analyze_simulation(
    input: &SimulationInput,
) -> MortgageSimResult<ComputationOutput<SimulationResult>> {
    let start = Instant::now();
    validate_simulation(input)?;

    let mut warnings = Vec::new();
    if input.lump_sum_at_start >= input.principal {
        warnings.push("Lump sum at start covers the full principal; loan pays off on day one".into());
    }

    let terms = LoanTerms {
        principal: input.principal,
        annual_rate_pct: input.annual_rate_pct,
        term_months: input.term_months,
    };
    let plan = ExtraPaymentPlan {
        extra_monthly: input.extra_monthly,
        lump_sum: input.lump_sum_at_start,
    };
    let result = simulate(&terms, &plan);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly Amortization Simulation",
        input,
        warnings,
        elapsed,
        result,
    ))
}

/// Run a validated two-phase refinance simulation.
pub fn analyze_refinance(
    input: &RefinanceInput,
) -> MortgageSimResult<ComputationOutput<SimulationResult>> {
    let start = Instant::now();
    validate_refinance(input)?;

    let mut warnings = Vec::new();
    if input.refinance_after_months >= input.term_months {
        warnings.push(
            "Refinance month is at or beyond the original term; the loan amortises in full first"
                .into(),
        );
    }
    if input.lump_sum_at_start >= input.principal {
        warnings.push("Lump sum at start covers the full principal; loan pays off on day one".into());
    }

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
    let result = simulate_with_refinance(
        &terms,
        &plan,
        &refinance,
        input.extra_monthly_after_refinance,
        input.lump_sum_at_refinance,
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Two-Phase Refinance Amortization Simulation",
        input,
        warnings,
        elapsed,
        result,
    ))
}

fn validate_loan_fields(
    principal: Money,
    annual_rate_pct: Rate,
    term_months: u32,
) -> MortgageSimResult<()> {
    if principal <= Decimal::ZERO {
        return Err(MortgageSimError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if annual_rate_pct < Decimal::ZERO {
        return Err(MortgageSimError::InvalidInput {
            field: "annual_rate_pct".into(),
            reason: "Annual rate cannot be negative".into(),
        });
    }
    if term_months == 0 {
        return Err(MortgageSimError::InvalidInput {
            field: "term_months".into(),
            reason: "Term must be greater than zero months".into(),
        });
    }
    Ok(())
}

fn validate_non_negative(value: Money, field: &str) -> MortgageSimResult<()> {
    if value < Decimal::ZERO {
        return Err(MortgageSimError::InvalidInput {
            field: field.into(),
            reason: "Amount cannot be negative".into(),
        });
    }
    Ok(())
}

fn validate_simulation(input: &SimulationInput) -> MortgageSimResult<()> {
    validate_loan_fields(input.principal, input.annual_rate_pct, input.term_months)?;
    validate_non_negative(input.extra_monthly, "extra_monthly")?;
    validate_non_negative(input.lump_sum_at_start, "lump_sum_at_start")?;
    Ok(())
}

fn validate_refinance(input: &RefinanceInput) -> MortgageSimResult<()> {
    validate_loan_fields(input.principal, input.annual_rate_pct, input.term_months)?;
    validate_non_negative(input.extra_monthly, "extra_monthly")?;
    validate_non_negative(input.lump_sum_at_start, "lump_sum_at_start")?;
    validate_non_negative(input.extra_monthly_after_refinance, "extra_monthly_after_refinance")?;
    validate_non_negative(input.lump_sum_at_refinance, "lump_sum_at_refinance")?;
    if input.refinance_rate_pct < Decimal::ZERO {
        return Err(MortgageSimError::InvalidInput {
            field: "refinance_rate_pct".into(),
            reason: "Refinance rate cannot be negative".into(),
        });
    }
    if input.refinance_term_months == 0 {
        return Err(MortgageSimError::InvalidInput {
            field: "refinance_term_months".into(),
            reason: "Refinance term must be greater than zero months".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::{prop_assert, proptest};
    use rust_decimal_macros::dec;

    const TOL: Decimal = dec!(0.01);

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    fn standard_terms() -> LoanTerms {
        LoanTerms {
            principal: dec!(500_000),
            annual_rate_pct: dec!(6),
            term_months: 360,
        }
    }

    fn no_extras() -> ExtraPaymentPlan {
        ExtraPaymentPlan::default()
    }

    fn standard_refinance() -> RefinanceEvent {
        RefinanceEvent {
            after_months: 60,
            new_rate_pct: dec!(4),
            new_term_months: 300,
        }
    }

    // -----------------------------------------------------------------------
    // 1. Standard amortization runs to exactly the full term
    // -----------------------------------------------------------------------
    #[test]
    fn test_standard_loan_runs_full_term() {
        let out = simulate(&standard_terms(), &no_extras());
        assert_eq!(out.duration_months, 360);
        assert_close(out.scheduled_payment, dec!(2997.75), TOL, "scheduled payment");
        // 360 level payments, final one capped at the exact payoff amount.
        assert_close(out.total_paid, dec!(1_079_191), dec!(1), "total paid");
        assert_eq!(out.refinance_payment, None);
    }

    // -----------------------------------------------------------------------
    // 2. Zero rate: total paid equals principal exactly
    // -----------------------------------------------------------------------
    #[test]
    fn test_zero_rate_no_interest() {
        let terms = LoanTerms {
            principal: dec!(360_000),
            annual_rate_pct: dec!(0),
            term_months: 360,
        };
        let out = simulate(&terms, &no_extras());
        assert_eq!(out.duration_months, 360);
        assert_eq!(out.scheduled_payment, dec!(1000));
        assert_eq!(out.total_paid, dec!(360_000));
    }

    // -----------------------------------------------------------------------
    // 3. Extra payments shorten the loan and cut the total
    // -----------------------------------------------------------------------
    #[test]
    fn test_extra_payment_shortens_loan() {
        let baseline = simulate(&standard_terms(), &no_extras());
        let accelerated = simulate(
            &standard_terms(),
            &ExtraPaymentPlan {
                extra_monthly: dec!(1000),
                lump_sum: Decimal::ZERO,
            },
        );
        assert!(accelerated.duration_months < 360);
        assert!(accelerated.total_paid < baseline.total_paid);
        // The scheduled payment itself is unchanged by extras.
        assert_eq!(accelerated.scheduled_payment, baseline.scheduled_payment);
    }

    // -----------------------------------------------------------------------
    // 4. Day-one lump sum covering the principal pays off immediately
    // -----------------------------------------------------------------------
    #[test]
    fn test_lump_sum_full_payoff_day_one() {
        let out = simulate(
            &standard_terms(),
            &ExtraPaymentPlan {
                extra_monthly: Decimal::ZERO,
                lump_sum: dec!(600_000),
            },
        );
        assert_eq!(out.duration_months, 0);
        assert_eq!(out.total_paid, dec!(500_000));
        assert_eq!(out.scheduled_payment, Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // 5. Day-one lump sum accelerates payoff without changing the payment
    // -----------------------------------------------------------------------
    #[test]
    fn test_partial_lump_sum_keeps_original_payment() {
        let baseline = simulate(&standard_terms(), &no_extras());
        let out = simulate(
            &standard_terms(),
            &ExtraPaymentPlan {
                extra_monthly: Decimal::ZERO,
                lump_sum: dec!(100_000),
            },
        );
        assert_eq!(out.scheduled_payment, baseline.scheduled_payment);
        assert!(out.duration_months < 360);
        assert!(out.total_paid < baseline.total_paid);
    }

    // -----------------------------------------------------------------------
    // 6. Refinance to a lower rate cuts total paid vs never refinancing
    // -----------------------------------------------------------------------
    #[test]
    fn test_refinance_rate_improvement_saves() {
        let baseline = simulate(&standard_terms(), &no_extras());
        let refi = simulate_with_refinance(
            &standard_terms(),
            &no_extras(),
            &standard_refinance(),
            Decimal::ZERO,
            Decimal::ZERO,
        );
        assert!(refi.total_paid < baseline.total_paid);
        assert!(refi.refinance_payment.is_some());
        // New payment is computed off the ~465k remaining, not the original 500k.
        let refi_payment = refi.refinance_payment.unwrap();
        assert!(refi_payment < refi.scheduled_payment);
        assert_close(refi_payment, dec!(2455.87), dec!(2), "refinance payment");
    }

    // -----------------------------------------------------------------------
    // 7. Refinance duration spans both phases
    // -----------------------------------------------------------------------
    #[test]
    fn test_refinance_duration_spans_phases() {
        let refi = simulate_with_refinance(
            &standard_terms(),
            &no_extras(),
            &standard_refinance(),
            Decimal::ZERO,
            Decimal::ZERO,
        );
        // 60 months of phase 1 plus the full 300-month refinance term.
        assert_eq!(refi.duration_months, 360);
    }

    // -----------------------------------------------------------------------
    // 8. Loan paid off before the refinance month: no refinance payment
    // -----------------------------------------------------------------------
    #[test]
    fn test_payoff_before_refinance_point() {
        let terms = LoanTerms {
            principal: dec!(50_000),
            annual_rate_pct: dec!(5),
            term_months: 120,
        };
        let plan = ExtraPaymentPlan {
            extra_monthly: dec!(5000),
            lump_sum: Decimal::ZERO,
        };
        let refinance = RefinanceEvent {
            after_months: 60,
            new_rate_pct: dec!(3),
            new_term_months: 120,
        };
        let out = simulate_with_refinance(&terms, &plan, &refinance, Decimal::ZERO, Decimal::ZERO);
        assert!(out.duration_months < 60);
        assert_eq!(out.refinance_payment, None);

        let single = simulate(&terms, &plan);
        assert_eq!(out.total_paid, single.total_paid);
        assert_eq!(out.duration_months, single.duration_months);
    }

    // -----------------------------------------------------------------------
    // 9. Lump sum at refinance clearing the balance ends the loan there
    // -----------------------------------------------------------------------
    #[test]
    fn test_refinance_lump_clears_balance() {
        let out = simulate_with_refinance(
            &standard_terms(),
            &no_extras(),
            &standard_refinance(),
            Decimal::ZERO,
            dec!(1_000_000),
        );
        assert_eq!(out.duration_months, 60);
        assert_eq!(out.refinance_payment, None);
        // 60 scheduled payments plus exactly the ~465k remaining balance.
        let sixty_payments = out.scheduled_payment * dec!(60);
        assert!(out.total_paid > sixty_payments + dec!(400_000));
        assert!(out.total_paid < sixty_payments + dec!(500_000));
    }

    // -----------------------------------------------------------------------
    // 10. Extra payments after the refinance shorten phase 2
    // -----------------------------------------------------------------------
    #[test]
    fn test_extra_after_refinance_shortens_phase_two() {
        let without = simulate_with_refinance(
            &standard_terms(),
            &no_extras(),
            &standard_refinance(),
            Decimal::ZERO,
            Decimal::ZERO,
        );
        let with_extra = simulate_with_refinance(
            &standard_terms(),
            &no_extras(),
            &standard_refinance(),
            dec!(500),
            Decimal::ZERO,
        );
        assert!(with_extra.duration_months < without.duration_months);
        assert!(with_extra.total_paid < without.total_paid);
        // Both phases share the same scheduled payments.
        assert_eq!(with_extra.scheduled_payment, without.scheduled_payment);
        assert_eq!(with_extra.refinance_payment, without.refinance_payment);
    }

    // -----------------------------------------------------------------------
    // 11. Refinance month beyond the term degenerates to the plain schedule
    // -----------------------------------------------------------------------
    #[test]
    fn test_refinance_beyond_term_is_plain_amortization() {
        let refinance = RefinanceEvent {
            after_months: 999,
            new_rate_pct: dec!(4),
            new_term_months: 300,
        };
        let out = simulate_with_refinance(
            &standard_terms(),
            &no_extras(),
            &refinance,
            Decimal::ZERO,
            Decimal::ZERO,
        );
        let single = simulate(&standard_terms(), &no_extras());
        assert_eq!(out.total_paid, single.total_paid);
        assert_eq!(out.duration_months, single.duration_months);
        assert_eq!(out.refinance_payment, None);
    }

    // -----------------------------------------------------------------------
    // 12. Validated entries reject bad fields and warn on odd ones
    // -----------------------------------------------------------------------
    #[test]
    fn test_validation_and_warnings() {
        let input = SimulationInput {
            principal: dec!(-1),
            annual_rate_pct: dec!(6),
            term_months: 360,
            extra_monthly: Decimal::ZERO,
            lump_sum_at_start: Decimal::ZERO,
        };
        assert!(analyze_simulation(&input).is_err());

        let input = SimulationInput {
            principal: dec!(100_000),
            annual_rate_pct: dec!(6),
            term_months: 360,
            extra_monthly: Decimal::ZERO,
            lump_sum_at_start: dec!(150_000),
        };
        let out = analyze_simulation(&input).unwrap();
        assert!(!out.warnings.is_empty());
        assert_eq!(out.result.duration_months, 0);

        let input = RefinanceInput {
            principal: dec!(100_000),
            annual_rate_pct: dec!(6),
            term_months: 360,
            extra_monthly: Decimal::ZERO,
            lump_sum_at_start: Decimal::ZERO,
            refinance_after_months: 60,
            refinance_term_months: 0,
            refinance_rate_pct: dec!(4),
            extra_monthly_after_refinance: Decimal::ZERO,
            lump_sum_at_refinance: Decimal::ZERO,
        };
        assert!(analyze_refinance(&input).is_err());
    }

    // -----------------------------------------------------------------------
    // 13. Input records deserialize with omitted optional fields
    // -----------------------------------------------------------------------
    #[test]
    fn test_input_defaults_from_json() {
        let input: SimulationInput = serde_json::from_str(
            r#"{"principal": "250000", "annual_rate_pct": "5.5", "term_months": 300}"#,
        )
        .unwrap();
        assert_eq!(input.extra_monthly, Decimal::ZERO);
        assert_eq!(input.lump_sum_at_start, Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // Property: more extra payment never lengthens or raises the payoff
    // -----------------------------------------------------------------------
    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_extra_payment_monotone(
            principal_k in 50u32..800,
            rate_bp in 0u32..1200,
            term in 12u32..481,
            extra_lo in 0u32..3000,
            extra_bump in 1u32..3000,
        ) {
            let terms = LoanTerms {
                principal: Decimal::from(principal_k) * dec!(1000),
                annual_rate_pct: Decimal::from(rate_bp) / dec!(100),
                term_months: term,
            };
            let lo = simulate(&terms, &ExtraPaymentPlan {
                extra_monthly: Decimal::from(extra_lo),
                lump_sum: Decimal::ZERO,
            });
            let hi = simulate(&terms, &ExtraPaymentPlan {
                extra_monthly: Decimal::from(extra_lo + extra_bump),
                lump_sum: Decimal::ZERO,
            });
            prop_assert!(hi.duration_months <= lo.duration_months);
            prop_assert!(hi.total_paid <= lo.total_paid + BALANCE_EPSILON);
        }

        #[test]
        fn prop_duration_bounded_and_total_covers_principal(
            principal_k in 10u32..900,
            rate_bp in 0u32..1500,
            term in 6u32..481,
            extra in 0u32..5000,
            lump_k in 0u32..200,
        ) {
            let terms = LoanTerms {
                principal: Decimal::from(principal_k) * dec!(1000),
                annual_rate_pct: Decimal::from(rate_bp) / dec!(100),
                term_months: term,
            };
            let plan = ExtraPaymentPlan {
                extra_monthly: Decimal::from(extra),
                lump_sum: Decimal::from(lump_k) * dec!(1000),
            };
            let out = simulate(&terms, &plan);
            prop_assert!(out.duration_months <= term);
            // Total outflow is at least the principal, minus forgiven dust.
            prop_assert!(out.total_paid + BALANCE_EPSILON >= terms.principal);
        }

        #[test]
        fn prop_refinance_duration_bounded(
            principal_k in 50u32..600,
            rate_bp in 100u32..1000,
            term in 60u32..361,
            after in 1u32..120,
            refi_rate_bp in 0u32..1000,
            refi_term in 12u32..361,
        ) {
            let terms = LoanTerms {
                principal: Decimal::from(principal_k) * dec!(1000),
                annual_rate_pct: Decimal::from(rate_bp) / dec!(100),
                term_months: term,
            };
            let refinance = RefinanceEvent {
                after_months: after,
                new_rate_pct: Decimal::from(refi_rate_bp) / dec!(100),
                new_term_months: refi_term,
            };
            let out = simulate_with_refinance(
                &terms,
                &ExtraPaymentPlan::default(),
                &refinance,
                Decimal::ZERO,
                Decimal::ZERO,
            );
            prop_assert!(out.duration_months <= term.min(after) + refi_term);
            prop_assert!(out.total_paid + BALANCE_EPSILON >= terms.principal);
        }
    }
}
