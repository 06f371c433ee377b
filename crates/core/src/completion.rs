//! Completion criteria evaluation.
//!
//! Decides whether a project should be moved to Completed based on its
//! current status, payment totals, and shoot end date. Pure over its inputs;
//! the caller supplies freshly summed income so a stale cached
//! `received_amt` can never satisfy a criterion.

use chrono::NaiveDate;
use serde::Serialize;

use crate::finance::meets_payment_threshold;
use crate::lifecycle::STATUS_COMPLETED;
use crate::types::Money;

/// Reason reported when the status was already manually set to Completed.
pub const REASON_MANUAL: &str = "Manual status change to completed";

/// Reason reported when payment covers the full contracted amount.
pub const REASON_FULLY_PAID: &str = "Project fully paid";

/// Reason reported when the shoot ended and 80% of payment arrived.
pub const REASON_DATE_PASSED: &str = "Shoot end date passed with 80% payment received";

/// Outcome of a completion evaluation, including the snapshot it was
/// decided from.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionDecision {
    pub should_complete: bool,
    /// Empty when `should_complete` is false.
    pub reason: String,
    pub status_id: Option<i16>,
    pub amount: Money,
    pub received_amt: Money,
    pub shoot_end_date: Option<NaiveDate>,
    pub fully_paid: bool,
    pub end_date_passed: bool,
}

/// Evaluate the completion criteria in precedence order (first match wins):
///
/// 1. status already manually Completed;
/// 2. fully paid (`received_amt >= amount`);
/// 3. shoot end date passed and the 80% payment threshold met.
pub fn evaluate(
    status_id: Option<i16>,
    amount: Money,
    received_amt: Money,
    shoot_end_date: Option<NaiveDate>,
    today: NaiveDate,
) -> CompletionDecision {
    let fully_paid = received_amt >= amount;
    let end_date_passed = shoot_end_date.is_some_and(|end| today > end);

    let (should_complete, reason) = if status_id == Some(STATUS_COMPLETED) {
        (true, REASON_MANUAL)
    } else if fully_paid {
        (true, REASON_FULLY_PAID)
    } else if end_date_passed && meets_payment_threshold(received_amt, amount) {
        (true, REASON_DATE_PASSED)
    } else {
        (false, "")
    };

    CompletionDecision {
        should_complete,
        reason: reason.to_string(),
        status_id,
        amount,
        received_amt,
        shoot_end_date,
        fully_paid,
        end_date_passed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{STATUS_IN_PROGRESS, STATUS_ON_HOLD};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn today() -> NaiveDate {
        d(2026, 8, 4)
    }

    // -----------------------------------------------------------------------
    // Precedence
    // -----------------------------------------------------------------------

    #[test]
    fn manual_completed_beats_underpayment() {
        // Manually Completed but only partially paid: rule 1 still wins.
        let dec = evaluate(Some(STATUS_COMPLETED), 100_000, 10_000, None, today());
        assert!(dec.should_complete);
        assert_eq!(dec.reason, REASON_MANUAL);
    }

    #[test]
    fn manual_completed_beats_fully_paid_reason() {
        let dec = evaluate(Some(STATUS_COMPLETED), 100_000, 100_000, None, today());
        assert_eq!(dec.reason, REASON_MANUAL);
    }

    #[test]
    fn fully_paid_beats_date_rule_reason() {
        let dec = evaluate(
            Some(STATUS_IN_PROGRESS),
            100_000,
            100_000,
            Some(d(2026, 8, 3)),
            today(),
        );
        assert!(dec.should_complete);
        assert_eq!(dec.reason, REASON_FULLY_PAID);
    }

    // -----------------------------------------------------------------------
    // Fully paid
    // -----------------------------------------------------------------------

    #[test]
    fn overpaid_is_fully_paid() {
        let dec = evaluate(None, 100_000, 120_000, None, today());
        assert!(dec.should_complete);
        assert_eq!(dec.reason, REASON_FULLY_PAID);
    }

    #[test]
    fn zero_amount_is_fully_paid() {
        let dec = evaluate(None, 0, 0, None, today());
        assert!(dec.should_complete);
        assert_eq!(dec.reason, REASON_FULLY_PAID);
    }

    // -----------------------------------------------------------------------
    // Date + 80% rule
    // -----------------------------------------------------------------------

    #[test]
    fn worked_example_sixty_percent_not_enough() {
        // amount 100000, received 60000, shoot ended yesterday: 60000 < 80000.
        let dec = evaluate(
            Some(STATUS_IN_PROGRESS),
            100_000,
            60_000,
            Some(d(2026, 8, 3)),
            today(),
        );
        assert!(!dec.should_complete);
        assert!(dec.end_date_passed);
        assert!(!dec.fully_paid);
    }

    #[test]
    fn worked_example_eighty_five_percent_completes() {
        let dec = evaluate(
            Some(STATUS_IN_PROGRESS),
            100_000,
            85_000,
            Some(d(2026, 8, 3)),
            today(),
        );
        assert!(dec.should_complete);
        assert_eq!(dec.reason, REASON_DATE_PASSED);
    }

    #[test]
    fn end_date_today_has_not_passed() {
        let dec = evaluate(Some(STATUS_IN_PROGRESS), 100_000, 85_000, Some(today()), today());
        assert!(!dec.should_complete);
        assert!(!dec.end_date_passed);
    }

    #[test]
    fn no_end_date_blocks_date_rule() {
        let dec = evaluate(Some(STATUS_IN_PROGRESS), 100_000, 85_000, None, today());
        assert!(!dec.should_complete);
    }

    // -----------------------------------------------------------------------
    // Evaluation reports, it does not transition
    // -----------------------------------------------------------------------

    #[test]
    fn on_hold_project_can_still_report_criteria() {
        // The evaluator only reports; the transition engine is what skips
        // OnHold projects.
        let dec = evaluate(Some(STATUS_ON_HOLD), 100_000, 100_000, None, today());
        assert!(dec.should_complete);
        assert_eq!(dec.reason, REASON_FULLY_PAID);
    }

    #[test]
    fn underpaid_future_shoot_is_incomplete() {
        let dec = evaluate(
            Some(STATUS_IN_PROGRESS),
            100_000,
            50_000,
            Some(d(2026, 12, 1)),
            today(),
        );
        assert!(!dec.should_complete);
        assert!(dec.reason.is_empty());
    }
}
