//! Ledger math for a project's derived financial fields.
//!
//! A project's `received_amt`, `pending_amt`, and `profit` are always
//! derivable from its contracted amount, fixed outsourcing cost, and the
//! income/expense rows that reference it. The functions here are the single
//! source of truth for that derivation; the aggregator and the reconciliation
//! validator both go through them so a stored row can be diffed against the
//! same numbers it was written from.

use serde::Serialize;

use crate::types::Money;

/// Derived financial fields for one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FinancialSnapshot {
    /// Sum of all income rows linked to the project.
    pub received_amt: Money,
    /// `amount - received_amt`. Negative when the project is overpaid;
    /// not clamped so callers can detect overpayment.
    pub pending_amt: Money,
    /// `amount - (outsourcing_amt + total_expenses)`.
    pub profit: Money,
}

/// Derive the financial snapshot from ledger totals.
pub fn derive_finances(
    amount: Money,
    outsourcing_amt: Money,
    total_income: Money,
    total_expenses: Money,
) -> FinancialSnapshot {
    let received_amt = total_income;
    FinancialSnapshot {
        received_amt,
        pending_amt: amount - received_amt,
        profit: amount - (outsourcing_amt + total_expenses),
    }
}

/// Whether `received` covers at least 80% of `amount`.
///
/// Compared by cross-multiplication so integer division cannot truncate the
/// threshold (`amount * 4 / 5` would under-count for amounts not divisible
/// by 5). A zero-amount project is trivially paid.
pub fn meets_payment_threshold(received: Money, amount: Money) -> bool {
    received * 5 >= amount * 4
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // derive_finances
    // -----------------------------------------------------------------------

    #[test]
    fn worked_example() {
        // amount 100000, income 60000, expense 10000, outsourcing 5000
        let snap = derive_finances(100_000, 5_000, 60_000, 10_000);
        assert_eq!(snap.received_amt, 60_000);
        assert_eq!(snap.pending_amt, 40_000);
        assert_eq!(snap.profit, 85_000);
    }

    #[test]
    fn empty_ledger() {
        let snap = derive_finances(50_000, 0, 0, 0);
        assert_eq!(snap.received_amt, 0);
        assert_eq!(snap.pending_amt, 50_000);
        assert_eq!(snap.profit, 50_000);
    }

    #[test]
    fn overpayment_goes_negative() {
        let snap = derive_finances(10_000, 0, 12_500, 0);
        assert_eq!(snap.pending_amt, -2_500);
    }

    #[test]
    fn expenses_exceeding_amount_give_negative_profit() {
        let snap = derive_finances(10_000, 4_000, 0, 8_000);
        assert_eq!(snap.profit, -2_000);
    }

    #[test]
    fn idempotent_over_same_inputs() {
        let a = derive_finances(77_000, 3_000, 21_000, 9_000);
        let b = derive_finances(77_000, 3_000, 21_000, 9_000);
        assert_eq!(a, b);
    }

    // -----------------------------------------------------------------------
    // meets_payment_threshold
    // -----------------------------------------------------------------------

    #[test]
    fn threshold_exact_80_percent() {
        assert!(meets_payment_threshold(80_000, 100_000));
    }

    #[test]
    fn threshold_below_80_percent() {
        assert!(!meets_payment_threshold(79_999, 100_000));
    }

    #[test]
    fn threshold_not_truncated_for_odd_amounts() {
        // 0.8 * 7 = 5.6; naive integer division (7 * 4 / 5 = 5) would
        // wrongly accept 5.
        assert!(!meets_payment_threshold(5, 7));
        assert!(meets_payment_threshold(6, 7));
    }

    #[test]
    fn zero_amount_counts_as_paid() {
        assert!(meets_payment_threshold(0, 0));
    }
}
