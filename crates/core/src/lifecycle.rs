//! Date-driven project lifecycle state machine.
//!
//! Status IDs match the `project_statuses` seed data (1-based SMALLSERIAL).
//! They are intentionally duplicated from the `db` crate's `ProjectStatus`
//! enum because `core` must have zero internal deps.

use chrono::NaiveDate;

/// `project_statuses` seed ID: shoot has not started.
pub const STATUS_NOT_STARTED: i16 = 1;

/// `project_statuses` seed ID: shoot window is open.
pub const STATUS_IN_PROGRESS: i16 = 2;

/// `project_statuses` seed ID: terminal for automation.
pub const STATUS_COMPLETED: i16 = 3;

/// `project_statuses` seed ID: manual override, frozen for automation.
pub const STATUS_ON_HOLD: i16 = 4;

/// Compute the status a project's shoot dates imply for `today`.
///
/// Evaluated at midnight granularity against the stored DATE columns:
///
/// - both dates set: before start -> NotStarted, inside the window
///   (inclusive on both ends) -> InProgress, after end -> Completed;
/// - only a start date: reached -> InProgress, otherwise NotStarted;
/// - no start date: `None`, the dates imply nothing.
pub fn status_for_dates(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> Option<i16> {
    match (start, end) {
        (Some(start), Some(end)) => {
            if today < start {
                Some(STATUS_NOT_STARTED)
            } else if today <= end {
                Some(STATUS_IN_PROGRESS)
            } else {
                Some(STATUS_COMPLETED)
            }
        }
        (Some(start), None) => {
            if today >= start {
                Some(STATUS_IN_PROGRESS)
            } else {
                Some(STATUS_NOT_STARTED)
            }
        }
        _ => None,
    }
}

/// Whether the automatic transition engine may touch a project in `current`.
///
/// OnHold is a manual override and is never auto-exited. Completed is
/// terminal for automation (manual edits may still re-open a project).
pub fn is_auto_transition_allowed(current: Option<i16>) -> bool {
    !matches!(current, Some(STATUS_ON_HOLD) | Some(STATUS_COMPLETED))
}
