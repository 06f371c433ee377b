//! Scheduled job runner for auto-completion and financial reconciliation.
//!
//! One instance per process, owned by `AppState`. `start` runs one pass of
//! each job immediately, then keeps auto-completion on a fixed interval
//! (default hourly) and reconciliation on a daily schedule anchored at a
//! fixed local hour (default 02:00). Pass failures are logged and swallowed;
//! a bad tick never kills a loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use shutterdesk_core::types::Timestamp;
use shutterdesk_db::DbPool;

use crate::config::ServerConfig;
use crate::engine::completion::{auto_complete_projects, AutoCompleteSummary};
use crate::engine::reconciliation::{
    perform_automated_corrections, reconcile_project_finances, FinancialValidationResult,
};
use crate::error::AppResult;

/// Snapshot of the runner's state for the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SchedulerStatus {
    pub is_running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_auto_completion: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reconciliation: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_reconciliation: Option<Timestamp>,
}

/// Process-wide scheduled job runner.
pub struct JobScheduler {
    pool: DbPool,
    auto_complete_interval: Duration,
    reconciliation_hour: u32,
    running: AtomicBool,
    cancel: Mutex<Option<CancellationToken>>,
    last_auto_completion: Mutex<Option<Timestamp>>,
    last_reconciliation: Mutex<Option<Timestamp>>,
    next_reconciliation: Mutex<Option<Timestamp>>,
}

impl JobScheduler {
    pub fn new(pool: DbPool, config: &ServerConfig) -> Arc<Self> {
        Arc::new(Self {
            pool,
            auto_complete_interval: Duration::from_secs(config.auto_complete_interval_secs),
            reconciliation_hour: config.reconciliation_hour,
            running: AtomicBool::new(false),
            cancel: Mutex::new(None),
            last_auto_completion: Mutex::new(None),
            last_reconciliation: Mutex::new(None),
            next_reconciliation: Mutex::new(None),
        })
    }

    /// Start both job loops. Calling `start` on a running scheduler is a
    /// no-op with a warning, not an error.
    pub fn start(self: Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("Scheduled jobs already running; start ignored");
            return;
        }

        let cancel = CancellationToken::new();
        *self.cancel.lock().unwrap() = Some(cancel.clone());

        tracing::info!(
            auto_complete_interval_secs = self.auto_complete_interval.as_secs(),
            reconciliation_hour = self.reconciliation_hour,
            "Scheduled jobs started"
        );

        let scheduler = Arc::clone(&self);
        let token = cancel.clone();
        tokio::spawn(async move {
            scheduler.auto_completion_loop(token).await;
        });

        tokio::spawn(async move {
            self.reconciliation_loop(cancel).await;
        });
    }

    /// Stop future scheduling. In-flight passes finish on their own.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            tracing::warn!("Scheduled jobs not running; stop ignored");
            return;
        }
        if let Some(cancel) = self.cancel.lock().unwrap().take() {
            cancel.cancel();
        }
        *self.next_reconciliation.lock().unwrap() = None;
        tracing::info!("Scheduled jobs stopped");
    }

    pub fn status(&self) -> SchedulerStatus {
        SchedulerStatus {
            is_running: self.running.load(Ordering::SeqCst),
            last_auto_completion: *self.last_auto_completion.lock().unwrap(),
            last_reconciliation: *self.last_reconciliation.lock().unwrap(),
            next_reconciliation: *self.next_reconciliation.lock().unwrap(),
        }
    }

    /// Run a single auto-completion pass synchronously, independent of the
    /// timers. Returns a human summary plus the raw result.
    pub async fn run_auto_completion_now(&self) -> AppResult<(String, AutoCompleteSummary)> {
        let summary = auto_complete_projects(&self.pool).await?;
        *self.last_auto_completion.lock().unwrap() = Some(Utc::now());

        let message = format!(
            "Auto-completion: {} of {} projects completed, {} errors",
            summary.completed, summary.checked, summary.errors
        );
        Ok((message, summary))
    }

    /// Run a single reconciliation pass synchronously. When the scan finds
    /// inconsistencies, automated corrections run as part of the same pass.
    pub async fn run_reconciliation_now(&self) -> AppResult<(String, FinancialValidationResult)> {
        let result = reconcile_project_finances(&self.pool).await?;

        if result.inconsistent > 0 {
            let corrections = perform_automated_corrections(&self.pool).await?;
            tracing::info!(
                corrected_projects = corrections.corrected_projects,
                errors = corrections.errors,
                "Reconciliation applied automated corrections"
            );
        }

        *self.last_reconciliation.lock().unwrap() = Some(Utc::now());

        let message = format!(
            "Reconciliation: {} of {} projects consistent, {} issues",
            result.consistent, result.checked, result.total_issues
        );
        Ok((message, result))
    }

    async fn auto_completion_loop(&self, cancel: CancellationToken) {
        // The first tick fires immediately, giving the start-time pass.
        let mut ticker = tokio::time::interval(self.auto_complete_interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Auto-completion loop stopping");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.run_auto_completion_now().await {
                        tracing::error!(error = %e, "Scheduled auto-completion pass failed");
                    }
                }
            }
        }
    }

    async fn reconciliation_loop(&self, cancel: CancellationToken) {
        // Immediate pass on start, then anchored to the configured hour.
        if let Err(e) = self.run_reconciliation_now().await {
            tracing::error!(error = %e, "Startup reconciliation pass failed");
        }

        loop {
            let next = next_daily_run(Local::now(), self.reconciliation_hour);
            *self.next_reconciliation.lock().unwrap() = Some(next.with_timezone(&Utc));

            let wait = (next - Local::now())
                .to_std()
                .unwrap_or(Duration::ZERO);

            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Reconciliation loop stopping");
                    break;
                }
                _ = tokio::time::sleep(wait) => {
                    if let Err(e) = self.run_reconciliation_now().await {
                        tracing::error!(error = %e, "Scheduled reconciliation pass failed");
                    }
                }
            }
        }
    }
}

/// The next occurrence of `hour:00` strictly after `after`.
///
/// Skips forward past local times that do not exist (DST gaps).
fn next_daily_run<Tz: TimeZone>(after: DateTime<Tz>, hour: u32) -> DateTime<Tz> {
    let tz = after.timezone();
    let mut date = after.date_naive();

    loop {
        let naive = date.and_hms_opt(hour, 0, 0).expect("hour must be 0-23");
        if let Some(candidate) = tz.from_local_datetime(&naive).earliest() {
            if candidate > after {
                return candidate;
            }
        }
        date = date.succ_opt().expect("date overflow");
    }
}
