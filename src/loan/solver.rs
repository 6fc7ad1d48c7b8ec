//! Closed-form amortization identities
//!
//! Payment:  P = r(PV) / (1 - (1+r)^-n)
//! Periods:  n = -ln(1 - r(PV)/P) / ln(1+r)
//!
//! Both return `None` when the inputs do not describe a loan that can be
//! solved; callers keep whatever value they had before.

/// Slack allowed below an integer period count before rounding up.
/// Absorbs floating-point noise so a payment solved for `n` periods
/// solves back to exactly `n`.
const PERIOD_ROUNDING_TOLERANCE: f64 = 1e-9;

/// Level payment that retires `principal` over `periods` at `period_rate`
pub fn payment_amount(principal: f64, period_rate: f64, periods: u32) -> Option<f64> {
    if !is_positive(principal) || periods == 0 || !is_non_negative(period_rate) {
        return None;
    }

    let n = f64::from(periods);
    if period_rate == 0.0 {
        // Interest-free: straight-line
        return Some(principal / n);
    }

    // 1 - (1+r)^-n, without rounding 1+r away for tiny r
    let discount = -(-n * period_rate.ln_1p()).exp_m1();
    let payment = (period_rate * principal) / discount;
    payment.is_finite().then_some(payment)
}

/// Number of payments of `payment` needed to retire `principal`
///
/// `None` when the payment never covers the interest.
pub fn period_count(principal: f64, payment: f64, period_rate: f64) -> Option<u32> {
    if !is_positive(principal) || !is_positive(payment) || !is_non_negative(period_rate) {
        return None;
    }

    let exact = if period_rate == 0.0 {
        principal / payment
    } else {
        let interest_share = (period_rate * principal) / payment;
        // At 1 the payment covers interest only and the loan never ends
        if interest_share >= 1.0 {
            return None;
        }
        -(-interest_share).ln_1p() / period_rate.ln_1p()
    };

    let periods = (exact - PERIOD_ROUNDING_TOLERANCE).ceil();
    if !periods.is_finite() || periods > f64::from(u32::MAX) {
        return None;
    }
    Some((periods as u32).max(1))
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
