// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Background worker that emails expiration notices.
//!
//! Once per daily trigger the scanner walks the full collection and, for
//! every `Cerrado parcialmente` report whose due date has passed and whose
//! `notificadoVencido` flag is not already `true`, sends the notice to the
//! administrator and to the responsible party, then sets the flag.
//!
//! The scan deliberately covers `Asignado` reports too: whenever one is
//! found with a flag that is not exactly `false` (drifted by hand-edits or
//! a crashed earlier run), the flag is forced back to `false` so the next
//! transition into overdue status notifies cleanly. That self-healing pass
//! is why the scanner reads the whole collection instead of pre-filtering
//! by status.
//!
//! The flag is only persisted after both sends succeed, so a failed send
//! leaves the report unnotified and the next trigger retries it.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

use reportes_core::{ReportPatch, ReportRecord, ReportStatus, ReportStore, parse_due_date};

use crate::error::Result;
use crate::mailer::{Mailer, OutgoingEmail};
use crate::notice::OverdueNotice;
use crate::schedule::DailySchedule;

/// Configuration for the overdue scanner.
#[derive(Debug, Clone)]
pub struct OverdueScannerConfig {
    /// Daily trigger for the notification scan.
    pub schedule: DailySchedule,
    /// Administrator address receiving a copy of every notice.
    pub admin_email: String,
    /// Run one scan at startup, before the first trigger.
    pub run_on_startup: bool,
}

impl Default for OverdueScannerConfig {
    fn default() -> Self {
        Self {
            schedule: DailySchedule::parse("10 12 * * *").unwrap(),
            admin_email: String::new(),
            run_on_startup: false,
        }
    }
}

/// What one notification scan did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// `Asignado` reports whose flag was forced back to `false`.
    pub flags_reset: u64,
    /// Overdue reports notified (two emails each).
    pub notified: u64,
}

/// Background worker that sends expiration notices.
pub struct OverdueScanner {
    store: Arc<dyn ReportStore>,
    mailer: Arc<dyn Mailer>,
    config: OverdueScannerConfig,
    shutdown: Arc<Notify>,
}

impl OverdueScanner {
    /// Create a new overdue scanner.
    pub fn new(
        store: Arc<dyn ReportStore>,
        mailer: Arc<dyn Mailer>,
        config: OverdueScannerConfig,
    ) -> Self {
        Self {
            store,
            mailer,
            config,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Get a handle that can be used to signal shutdown.
    pub fn shutdown_handle(&self) -> Arc<Notify> {
        self.shutdown.clone()
    }

    /// Run the scanner loop.
    ///
    /// Fires once per scheduled trigger until the shutdown signal is
    /// received. A failed scan is logged and retried at the next trigger.
    pub async fn run(&self) {
        info!(
            schedule = self.config.schedule.expression(),
            admin_email = %self.config.admin_email,
            "Overdue scanner started"
        );

        if self.config.run_on_startup {
            self.run_scan().await;
        }

        loop {
            let wait = match self.config.schedule.until_next(Local::now()) {
                Ok(wait) => wait,
                Err(e) => {
                    error!(error = %e, "No upcoming notification trigger");
                    break;
                }
            };

            tokio::select! {
                biased;

                _ = self.shutdown.notified() => {
                    info!("Overdue scanner received shutdown signal");
                    break;
                }

                _ = tokio::time::sleep(wait) => {
                    self.run_scan().await;
                }
            }
        }

        info!("Overdue scanner stopped");
    }

    async fn run_scan(&self) {
        match self.scan(Local::now().date_naive()).await {
            Ok(outcome) => {
                info!(
                    notified = outcome.notified,
                    flags_reset = outcome.flags_reset,
                    "Notification scan completed"
                );
            }
            Err(e) => {
                error!(error = %e, "Notification scan failed");
            }
        }
    }

    /// Scan the collection once, healing flags and sending notices.
    ///
    /// A store or mail failure aborts the remaining scan for this
    /// invocation; reports already processed keep their updates, and the
    /// report whose send failed stays unnotified for the next trigger.
    pub async fn scan(&self, today: NaiveDate) -> Result<ScanOutcome> {
        let reports = self.store.list_reports().await?;
        let mut outcome = ScanOutcome::default();

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

            match &report.status {
                // Assigned reports never get notified; they only get their
                // flag forced back to false when it has drifted.
                Some(ReportStatus::Assigned) => {
                    if report.overdue_notified != Some(false) {
                        self.store
                            .update_report(&report.id, &ReportPatch::notified(false))
                            .await?;
                        info!(report_id = %report.id, "Reset notification flag on assigned report");
                        outcome.flags_reset += 1;
                    }
                }
                Some(ReportStatus::PartiallyClosed)
                    if due < today && report.overdue_notified != Some(true) =>
                {
                    let Some(responsible) = report.responsible.clone() else {
                        warn!(
                            report_id = %report.id,
                            "Overdue report has no responsible address; leaving unnotified"
                        );
                        continue;
                    };
                    self.notify(&report, &responsible).await?;
                    self.store
                        .update_report(&report.id, &ReportPatch::notified(true))
                        .await?;
                    info!(
                        report_id = %report.id,
                        responsible = %responsible,
                        due_date = due_raw,
                        "Expiration notice sent"
                    );
                    outcome.notified += 1;
                }
                _ => {}
            }
        }

        Ok(outcome)
    }

    /// Send the two notices for one report: administrator first, then the
    /// responsible party. Either failure propagates before the flag is
    /// persisted.
    async fn notify(&self, report: &ReportRecord, responsible: &str) -> Result<()> {
        let notice = OverdueNotice::new(report);
        let subject = notice.subject();

        self.mailer
            .send(&OutgoingEmail {
                to: self.config.admin_email.clone(),
                subject: subject.clone(),
                html_body: notice.admin_body(),
            })
            .await?;

        self.mailer
            .send(&OutgoingEmail {
                to: responsible.to_string(),
                subject,
                html_body: notice.responsible_body(),
            })
            .await?;

        Ok(())
    }
}
