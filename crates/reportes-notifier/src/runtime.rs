// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Embeddable runtime for reportes-notifier.
//!
//! [`NotifierRuntime`] wires the HTTP liveness server and the two
//! scheduled workers into one unit with a single graceful shutdown, so
//! the service can run standalone (see `main.rs`) or inside another
//! tokio application and its tests.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use reportes_core::FirestoreStore;
//! use reportes_notifier::mailer::SmtpMailer;
//! use reportes_notifier::runtime::NotifierRuntime;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(FirestoreStore::new(reqwest::Client::new(), "my-project"));
//!     let mailer = Arc::new(SmtpMailer::new("smtp.gmail.com", "user", "pass")?);
//!
//!     let runtime = NotifierRuntime::builder()
//!         .store(store)
//!         .mailer(mailer)
//!         .admin_email("admin@example.com")
//!         .build()?
//!         .start()
//!         .await?;
//!
//!     // ... run your application ...
//!
//!     runtime.shutdown().await?;
//!     Ok(())
//! }
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tracing::{error, info};

use reportes_core::ReportStore;

use crate::mailer::Mailer;
use crate::overdue_scanner::{OverdueScanner, OverdueScannerConfig};
use crate::schedule::DailySchedule;
use crate::server::run_http_server;
use crate::status_reconciler::{StatusReconciler, StatusReconcilerConfig};

/// Builder for creating a [`NotifierRuntime`].
pub struct NotifierRuntimeBuilder {
    store: Option<Arc<dyn ReportStore>>,
    mailer: Option<Arc<dyn Mailer>>,
    http_addr: SocketAddr,
    admin_email: String,
    reconcile_schedule: DailySchedule,
    notify_schedule: DailySchedule,
    run_on_startup: bool,
}

impl Default for NotifierRuntimeBuilder {
    fn default() -> Self {
        Self {
            store: None,
            mailer: None,
            http_addr: "0.0.0.0:3000".parse().unwrap(),
            admin_email: String::new(),
            reconcile_schedule: DailySchedule::parse("0 12 * * *").unwrap(),
            notify_schedule: DailySchedule::parse("10 12 * * *").unwrap(),
            run_on_startup: false,
        }
    }
}

impl NotifierRuntimeBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the report store (required).
    pub fn store(mut self, store: Arc<dyn ReportStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the outbound mail transport (required).
    pub fn mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    /// Set the bind address for the liveness endpoint.
    ///
    /// Default: `0.0.0.0:3000`
    pub fn http_addr(mut self, addr: SocketAddr) -> Self {
        self.http_addr = addr;
        self
    }

    /// Set the administrator address (required).
    pub fn admin_email(mut self, email: impl Into<String>) -> Self {
        self.admin_email = email.into();
        self
    }

    /// Set the daily trigger for status reconciliation.
    ///
    /// Default: `0 12 * * *`
    pub fn reconcile_schedule(mut self, schedule: DailySchedule) -> Self {
        self.reconcile_schedule = schedule;
        self
    }

    /// Set the daily trigger for the notification scan.
    ///
    /// The two triggers are independent; nothing enforces an ordering
    /// between them.
    ///
    /// Default: `10 12 * * *`
    pub fn notify_schedule(mut self, schedule: DailySchedule) -> Self {
        self.notify_schedule = schedule;
        self
    }

    /// Run both scans once at startup, before their first trigger.
    ///
    /// Default: `false`
    pub fn run_on_startup(mut self, run: bool) -> Self {
        self.run_on_startup = run;
        self
    }

    /// Build the runtime configuration.
    ///
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<NotifierRuntimeConfig> {
        let store = self
            .store
            .ok_or_else(|| anyhow::anyhow!("store is required"))?;
        let mailer = self
            .mailer
            .ok_or_else(|| anyhow::anyhow!("mailer is required"))?;
        if self.admin_email.is_empty() {
            return Err(anyhow::anyhow!("admin_email is required"));
        }

        Ok(NotifierRuntimeConfig {
            store,
            mailer,
            http_addr: self.http_addr,
            admin_email: self.admin_email,
            reconcile_schedule: self.reconcile_schedule,
            notify_schedule: self.notify_schedule,
            run_on_startup: self.run_on_startup,
        })
    }
}

/// Configuration for a [`NotifierRuntime`].
pub struct NotifierRuntimeConfig {
    store: Arc<dyn ReportStore>,
    mailer: Arc<dyn Mailer>,
    http_addr: SocketAddr,
    admin_email: String,
    reconcile_schedule: DailySchedule,
    notify_schedule: DailySchedule,
    run_on_startup: bool,
}

impl NotifierRuntimeConfig {
    /// Start the runtime, spawning the HTTP server and the two workers.
    pub async fn start(self) -> Result<NotifierRuntime> {
        // Bind before spawning so the caller learns the real address
        // (port 0 in tests) and a bad port fails startup loudly.
        let listener = tokio::net::TcpListener::bind(self.http_addr).await?;
        let http_addr = listener.local_addr()?;

        let (server_shutdown_tx, server_shutdown_rx) = watch::channel(false);
        let server_handle = tokio::spawn(run_http_server(listener, server_shutdown_rx));

        let reconciler = StatusReconciler::new(
            self.store.clone(),
            StatusReconcilerConfig {
                schedule: self.reconcile_schedule,
                run_on_startup: self.run_on_startup,
            },
        );
        let reconciler_shutdown = reconciler.shutdown_handle();
        let reconciler_handle = tokio::spawn(async move {
            reconciler.run().await;
        });

        let scanner = OverdueScanner::new(
            self.store.clone(),
            self.mailer.clone(),
            OverdueScannerConfig {
                schedule: self.notify_schedule,
                admin_email: self.admin_email.clone(),
                run_on_startup: self.run_on_startup,
            },
        );
        let scanner_shutdown = scanner.shutdown_handle();
        let scanner_handle = tokio::spawn(async move {
            scanner.run().await;
        });

        info!(
            http_addr = %http_addr,
            admin_email = %self.admin_email,
            "NotifierRuntime started"
        );

        Ok(NotifierRuntime {
            http_addr,
            server_handle,
            reconciler_handle,
            scanner_handle,
            server_shutdown_tx,
            reconciler_shutdown,
            scanner_shutdown,
        })
    }
}

/// A running notifier instance.
///
/// The runtime manages:
/// - the HTTP liveness endpoint
/// - the status reconciler (overdue `Asignado` → `Cerrado parcialmente`)
/// - the overdue scanner (expiration emails + notification flags)
///
/// Call [`shutdown`](Self::shutdown) for graceful termination.
pub struct NotifierRuntime {
    http_addr: SocketAddr,
    server_handle: JoinHandle<std::io::Result<()>>,
    reconciler_handle: JoinHandle<()>,
    scanner_handle: JoinHandle<()>,
    server_shutdown_tx: watch::Sender<bool>,
    reconciler_shutdown: Arc<Notify>,
    scanner_shutdown: Arc<Notify>,
}

impl NotifierRuntime {
    /// Create a new builder for configuring the runtime.
    pub fn builder() -> NotifierRuntimeBuilder {
        NotifierRuntimeBuilder::new()
    }

    /// The address the liveness endpoint is actually listening on.
    pub fn http_addr(&self) -> SocketAddr {
        self.http_addr
    }

    /// Gracefully shut down the runtime.
    ///
    /// Signals the HTTP server and both workers to stop, then waits for
    /// them to complete.
    pub async fn shutdown(self) -> Result<()> {
        info!("NotifierRuntime shutting down...");

        let _ = self.server_shutdown_tx.send(true);
        self.reconciler_shutdown.notify_one();
        self.scanner_shutdown.notify_one();

        if let Err(e) = self.reconciler_handle.await {
            error!("Status reconciler task panicked: {}", e);
        }
        if let Err(e) = self.scanner_handle.await {
            error!("Overdue scanner task panicked: {}", e);
        }

        match self.server_handle.await {
            Ok(Ok(())) => {
                info!("NotifierRuntime shutdown complete");
                Ok(())
            }
            Ok(Err(e)) => Err(e.into()),
            Err(e) => {
                error!("HTTP server task panicked: {}", e);
                Err(e.into())
            }
        }
    }
}
