//! Project financial and lifecycle reconciliation engine.
//!
//! Everything that keeps a project's derived financial fields and lifecycle
//! status consistent with its ledger:
//!
//! - `finances`: recompute `received_amt` / `pending_amt` / `profit` from
//!   the income and expense rows;
//! - `completion`: completion evaluation, the date-driven status machine,
//!   the completion + income-conversion write, and the batch pass;
//! - `reconciliation`: batch validation of stored derived fields against
//!   recomputed values, with automated corrections.

pub mod completion;
pub mod finances;
pub mod reconciliation;
