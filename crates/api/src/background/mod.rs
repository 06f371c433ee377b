//! Background tasks and scheduled jobs.
//!
//! The [`scheduler::JobScheduler`] owns the long-running loops; each loop is
//! spawned via `tokio::spawn` and accepts a `CancellationToken` for graceful
//! shutdown.

pub mod scheduler;
