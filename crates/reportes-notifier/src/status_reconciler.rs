// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Background worker that closes overdue assigned reports.
//!
//! Once per daily trigger the reconciler scans the full collection and
//! moves every `Asignado` report whose due date has passed to
//! `Cerrado parcialmente`, resetting `notificadoVencido` to `false` so the
//! notification scanner will pick the report up on its next pass.
//!
//! Comparison is calendar-day against local time: a report due today is
//! not yet overdue. Reports without a parseable due date are skipped.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::Notify;
use tracing::{debug, error, info};

use reportes_core::{ReportPatch, ReportStatus, ReportStore, parse_due_date};

use crate::error::Result;
use crate::schedule::DailySchedule;

/// Configuration for the status reconciler.
#[derive(Debug, Clone)]
pub struct StatusReconcilerConfig {
    /// Daily trigger for the reconciliation scan.
    pub schedule: DailySchedule,
    /// Run one scan at startup, before the first trigger.
    pub run_on_startup: bool,
}

impl Default for StatusReconcilerConfig {
    fn default() -> Self {
        Self {
            schedule: DailySchedule::parse("0 12 * * *").unwrap(),
            run_on_startup: false,
        }
    }
}

/// Background worker that transitions overdue assigned reports.
pub struct StatusReconciler {
    store: Arc<dyn ReportStore>,
    config: StatusReconcilerConfig,
    shutdown: Arc<Notify>,
}

impl StatusReconciler {
    /// Create a new status reconciler.
    pub fn new(store: Arc<dyn ReportStore>, config: StatusReconcilerConfig) -> Self {
        Self {
            store,
            config,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Get a handle that can be used to signal shutdown.
    pub fn shutdown_handle(&self) -> Arc<Notify> {
        self.shutdown.clone()
    }

    /// Run the reconciler loop.
    ///
    /// Fires once per scheduled trigger until the shutdown signal is
    /// received. A failed scan is logged and retried at the next trigger.
    pub async fn run(&self) {
        info!(
            schedule = self.config.schedule.expression(),
            "Status reconciler started"
        );

        if self.config.run_on_startup {
            self.run_scan().await;
        }

        loop {
            let wait = match self.config.schedule.until_next(Local::now()) {
                Ok(wait) => wait,
                Err(e) => {
                    // The expression was validated at startup; no next
                    // occurrence means the schedule can never fire again.
                    error!(error = %e, "No upcoming reconciliation trigger");
                    break;
                }
            };

            tokio::select! {
                biased;

                _ = self.shutdown.notified() => {
                    info!("Status reconciler received shutdown signal");
                    break;
                }

                _ = tokio::time::sleep(wait) => {
                    self.run_scan().await;
                }
            }
        }

        info!("Status reconciler stopped");
    }

    async fn run_scan(&self) {
        match self.reconcile(Local::now().date_naive()).await {
            Ok(transitioned) => {
                info!(transitioned, "Reconciliation scan completed");
            }
            Err(e) => {
                error!(error = %e, "Reconciliation scan failed");
            }
        }
    }

    /// Scan the collection once and transition every overdue `Asignado`
    /// report. Returns the number of reports transitioned.
    ///
    /// A store write failure aborts the remaining scan for this
    /// invocation; reports already transitioned keep their new status.
    pub async fn reconcile(&self, today: NaiveDate) -> Result<u64> {
        let reports = self.store.list_reports().await?;
        let mut transitioned = 0u64;

        for report in reports {
            let Some(due_raw) = report.due_date.as_deref() else {
                continue;
            };
            let due = match parse_due_date(due_raw) {
                Ok(due) => due,
                Err(e) => {
                    debug!(report_id = %report.id, error = %e, "Skipping report with malformed due date");
                    continue;
                }
            };

            if report.status == Some(ReportStatus::Assigned) && due < today {
                self.store
                    .update_report(
                        &report.id,
                        &ReportPatch::transition(ReportStatus::PartiallyClosed, false),
                    )
                    .await?;
                info!(
                    report_id = %report.id,
                    due_date = due_raw,
                    "Overdue report moved to Cerrado parcialmente"
                );
                transitioned += 1;
            }
        }

        Ok(transitioned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reportes_core::{InMemoryStore, ReportRecord};

    fn report(id: &str, status: Option<ReportStatus>, due: Option<&str>) -> ReportRecord {
        let mut record = ReportRecord::new(id);
        record.status = status;
        record.due_date = due.map(str::to_string);
        record
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    async fn reconciler_with(records: Vec<ReportRecord>) -> (StatusReconciler, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        for record in records {
            store.insert(record).await;
        }
        let reconciler =
            StatusReconciler::new(store.clone(), StatusReconcilerConfig::default());
        (reconciler, store)
    }

    #[tokio::test]
    async fn overdue_assigned_report_is_transitioned() {
        let (reconciler, store) = reconciler_with(vec![report(
            "abc123",
            Some(ReportStatus::Assigned),
            Some("01/01/2024"),
        )])
        .await;

        let transitioned = reconciler.reconcile(today()).await.unwrap();
        assert_eq!(transitioned, 1);

        let record = store.get("abc123").await.unwrap();
        assert_eq!(record.status, Some(ReportStatus::PartiallyClosed));
        assert_eq!(record.overdue_notified, Some(false));
    }

    #[tokio::test]
    async fn report_due_today_is_not_overdue() {
        let (reconciler, store) = reconciler_with(vec![report(
            "abc123",
            Some(ReportStatus::Assigned),
            Some("01/06/2024"),
        )])
        .await;

        assert_eq!(reconciler.reconcile(today()).await.unwrap(), 0);
        let record = store.get("abc123").await.unwrap();
        assert_eq!(record.status, Some(ReportStatus::Assigned));
        assert_eq!(record.overdue_notified, None);
    }

    #[tokio::test]
    async fn future_due_date_is_untouched() {
        let (reconciler, store) = reconciler_with(vec![report(
            "abc123",
            Some(ReportStatus::Assigned),
            Some("01/01/2099"),
        )])
        .await;

        assert_eq!(reconciler.reconcile(today()).await.unwrap(), 0);
        assert_eq!(
            store.get("abc123").await.unwrap().status,
            Some(ReportStatus::Assigned)
        );
    }

    #[tokio::test]
    async fn reports_without_due_date_are_skipped() {
        let (reconciler, store) = reconciler_with(vec![
            report("aaa", Some(ReportStatus::Assigned), None),
            report("bbb", Some(ReportStatus::Assigned), Some("sin fecha")),
        ])
        .await;

        assert_eq!(reconciler.reconcile(today()).await.unwrap(), 0);
        assert_eq!(
            store.get("aaa").await.unwrap().status,
            Some(ReportStatus::Assigned)
        );
        assert_eq!(
            store.get("bbb").await.unwrap().status,
            Some(ReportStatus::Assigned)
        );
    }

    #[tokio::test]
    async fn other_statuses_are_never_touched() {
        let (reconciler, store) = reconciler_with(vec![
            report(
                "closed",
                Some(ReportStatus::PartiallyClosed),
                Some("01/01/2024"),
            ),
            report(
                "custom",
                Some(ReportStatus::Other("Cerrado".to_string())),
                Some("01/01/2024"),
            ),
            report("none", None, Some("01/01/2024")),
        ])
        .await;

        assert_eq!(reconciler.reconcile(today()).await.unwrap(), 0);
        assert_eq!(
            store.get("closed").await.unwrap().status,
            Some(ReportStatus::PartiallyClosed)
        );
        assert_eq!(
            store.get("custom").await.unwrap().status,
            Some(ReportStatus::Other("Cerrado".to_string()))
        );
        assert_eq!(store.get("none").await.unwrap().status, None);
    }

    #[tokio::test]
    async fn write_failure_aborts_the_scan() {
        let (reconciler, store) = reconciler_with(vec![
            report("aaa", Some(ReportStatus::Assigned), Some("01/01/2024")),
            report("bbb", Some(ReportStatus::Assigned), Some("01/01/2024")),
        ])
        .await;
        store.fail_updates(true);

        assert!(reconciler.reconcile(today()).await.is_err());

        // Nothing was transitioned; the next trigger retries both.
        assert_eq!(
            store.get("aaa").await.unwrap().status,
            Some(ReportStatus::Assigned)
        );
        assert_eq!(
            store.get("bbb").await.unwrap().status,
            Some(ReportStatus::Assigned)
        );
    }

    #[tokio::test]
    async fn reconcile_is_idempotent() {
        let (reconciler, store) = reconciler_with(vec![report(
            "abc123",
            Some(ReportStatus::Assigned),
            Some("01/01/2024"),
        )])
        .await;

        assert_eq!(reconciler.reconcile(today()).await.unwrap(), 1);
        assert_eq!(reconciler.reconcile(today()).await.unwrap(), 0);

        let record = store.get("abc123").await.unwrap();
        assert_eq!(record.status, Some(ReportStatus::PartiallyClosed));
        assert_eq!(record.overdue_notified, Some(false));
    }
}
