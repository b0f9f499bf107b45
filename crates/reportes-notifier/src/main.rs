// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Reportes Notifier - service entry point
//!
//! Loads configuration, wires the Firestore store and the SMTP mailer into
//! a [`NotifierRuntime`], and runs until ctrl-c.

use std::sync::Arc;

use tracing::{info, warn};

use reportes_core::FirestoreStore;
use reportes_notifier::config::Config;
use reportes_notifier::mailer::SmtpMailer;
use reportes_notifier::runtime::NotifierRuntime;
use reportes_notifier::schedule::DailySchedule;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reportes_notifier=info".into()),
        )
        .init();

    // Load .env file if present
    if let Err(e) = dotenvy::dotenv() {
        warn!("No .env file loaded: {}", e);
    }

    // Load configuration
    let config = Config::from_env()?;

    info!(
        http_addr = %config.http_addr,
        reconcile_schedule = %config.reconcile_schedule,
        notify_schedule = %config.notify_schedule,
        "Starting Reportes Notifier"
    );

    // Build the Firestore store
    let client = reqwest::Client::new();
    let mut store = match &config.firestore_base_url {
        Some(base_url) => {
            FirestoreStore::with_base_url(client, &config.firestore_project_id, base_url)
        }
        None => FirestoreStore::new(client, &config.firestore_project_id),
    };
    if let Some(token) = &config.firestore_access_token {
        store = store.with_access_token(token.clone());
    }

    // Build the SMTP mailer
    let mailer = SmtpMailer::new(&config.smtp_host, &config.smtp_user, &config.smtp_password)?;

    // Validate the schedules before anything starts
    let reconcile_schedule = DailySchedule::parse(&config.reconcile_schedule)?;
    let notify_schedule = DailySchedule::parse(&config.notify_schedule)?;

    // Start the runtime
    let runtime = NotifierRuntime::builder()
        .store(Arc::new(store))
        .mailer(Arc::new(mailer))
        .http_addr(config.http_addr)
        .admin_email(config.admin_email.clone())
        .reconcile_schedule(reconcile_schedule)
        .notify_schedule(notify_schedule)
        .run_on_startup(config.run_on_startup)
        .build()?
        .start()
        .await?;

    info!(http_addr = %runtime.http_addr(), "Reportes Notifier ready");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    // Graceful shutdown
    runtime.shutdown().await?;

    info!("Reportes Notifier shut down");

    Ok(())
}
