//! Fixed-rate annuity payment math.
//!
//! The level principal-and-interest payment is the closed-form anchor for
//! every simulation in this crate. All math in `rust_decimal::Decimal`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MortgageSimError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::MortgageSimResult;

/// Convert an annual percentage rate (6 = 6%) to a monthly decimal rate.
pub fn monthly_rate(annual_rate_pct: Rate) -> Rate {
    annual_rate_pct / dec!(100) / dec!(12)
}

/// Level payment for a fixed-rate amortising loan.
///
/// Zero-rate loans amortise straight-line (`principal / term_months`).
/// A zero-month term returns the full balance as due immediately; the
/// validated entry points reject it before it gets here.
pub fn scheduled_payment(principal: Money, annual_rate_pct: Rate, term_months: u32) -> Money {
    if term_months == 0 {
        return principal;
    }
    let r = monthly_rate(annual_rate_pct);
    if r <= Decimal::ZERO {
        return principal / Decimal::from(term_months);
    }

    // P * r * (1+r)^n / ((1+r)^n - 1)
    let growth = iterative_pow(Decimal::ONE + r, term_months);
    principal * r * growth / (growth - Decimal::ONE)
}

// ---------------------------------------------------------------------------
// Decimal math helpers (no f64, no powd)
// ---------------------------------------------------------------------------

/// Compute base^n for a positive integer exponent via iterative multiplication.
pub(crate) fn iterative_pow(base: Decimal, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result *= base;
    }
    result
}

// ---------------------------------------------------------------------------
// Validated entry point
// ---------------------------------------------------------------------------

/// Scheduled payment input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInput {
    /// Loan principal.
    pub principal: Money,
    /// Annual interest rate in percent (6 = 6%).
    pub annual_rate_pct: Rate,
    /// Loan term in months.
    pub term_months: u32,
}

/// Scheduled payment output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOutput {
    /// Level monthly principal-and-interest payment.
    pub scheduled_payment: Money,
}

/// Compute the scheduled monthly payment for validated loan terms.
pub fn analyze_payment(input: &PaymentInput) -> MortgageSimResult<ComputationOutput<PaymentOutput>> {
    let start = Instant::now();
    validate_payment(input)?;

    let output = PaymentOutput {
        scheduled_payment: scheduled_payment(
            input.principal,
            input.annual_rate_pct,
            input.term_months,
        ),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Rate Annuity Payment",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}

fn validate_payment(input: &PaymentInput) -> MortgageSimResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(MortgageSimError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if input.annual_rate_pct < Decimal::ZERO {
        return Err(MortgageSimError::InvalidInput {
            field: "annual_rate_pct".into(),
            reason: "Annual rate cannot be negative".into(),
        });
    }
    if input.term_months == 0 {
        return Err(MortgageSimError::InvalidInput {
            field: "term_months".into(),
            reason: "Term must be greater than zero months".into(),
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
    use rust_decimal_macros::dec;

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

    // -----------------------------------------------------------------------
    // 1. Textbook 30-year fixed: 500k at 6% -> 2997.75/month
    // -----------------------------------------------------------------------
    #[test]
    fn test_payment_500k_6pct_360() {
        let p = scheduled_payment(dec!(500_000), dec!(6), 360);
        assert_close(p, dec!(2997.75), dec!(0.01), "500k 6% 360m payment");
    }

    // -----------------------------------------------------------------------
    // 2. Zero rate amortises straight-line
    // -----------------------------------------------------------------------
    #[test]
    fn test_payment_zero_rate_straight_line() {
        let p = scheduled_payment(dec!(360_000), dec!(0), 360);
        assert_eq!(p, dec!(1000));
    }

    // -----------------------------------------------------------------------
    // 3. One-month term: full balance plus one month of interest
    // -----------------------------------------------------------------------
    #[test]
    fn test_payment_single_month() {
        let p = scheduled_payment(dec!(1000), dec!(12), 1);
        // r = 0.01, payment = 1000 * 1.01
        assert_close(p, dec!(1010), dec!(0.0001), "single-month payment");
    }

    // -----------------------------------------------------------------------
    // 4. Payment scales linearly with principal
    // -----------------------------------------------------------------------
    #[test]
    fn test_payment_scales_with_principal() {
        let p1 = scheduled_payment(dec!(100_000), dec!(5), 240);
        let p2 = scheduled_payment(dec!(200_000), dec!(5), 240);
        assert_close(p2, p1 * dec!(2), dec!(0.0001), "payment linearity");
    }

    // -----------------------------------------------------------------------
    // 5. Validation rejects degenerate inputs
    // -----------------------------------------------------------------------
    #[test]
    fn test_validation_rejects_degenerate_terms() {
        let base = PaymentInput {
            principal: dec!(100_000),
            annual_rate_pct: dec!(5),
            term_months: 240,
        };

        let mut zero_term = base.clone();
        zero_term.term_months = 0;
        assert!(analyze_payment(&zero_term).is_err());

        let mut negative_rate = base.clone();
        negative_rate.annual_rate_pct = dec!(-1);
        assert!(analyze_payment(&negative_rate).is_err());

        let mut zero_principal = base;
        zero_principal.principal = Decimal::ZERO;
        assert!(analyze_payment(&zero_principal).is_err());
    }

    // -----------------------------------------------------------------------
    // 6. Envelope metadata is populated
    // -----------------------------------------------------------------------
    #[test]
    fn test_metadata_populated() {
        let input = PaymentInput {
            principal: dec!(500_000),
            annual_rate_pct: dec!(6),
            term_months: 360,
        };
        let result = analyze_payment(&input).unwrap();
        assert!(result.methodology.contains("Annuity"));
        assert_eq!(result.metadata.precision, "rust_decimal_128bit");
    }
}
