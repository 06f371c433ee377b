//! HTTP handlers, one module per resource.

pub mod expense;
pub mod income;
pub mod jobs;
pub mod project;
pub mod reconciliation;
