// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration for reportes-notifier.

use std::net::SocketAddr;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Google Cloud project whose Firestore holds the `reportes` collection.
    pub firestore_project_id: String,
    /// Bearer token for Firestore requests. `None` when the deployment
    /// provides ambient credentials or targets the emulator.
    pub firestore_access_token: Option<String>,
    /// Override for the Firestore endpoint (emulator). `None` means the
    /// public endpoint.
    pub firestore_base_url: Option<String>,
    /// SMTP relay host.
    pub smtp_host: String,
    /// SMTP account, also used as the sender address.
    pub smtp_user: String,
    /// SMTP password.
    pub smtp_password: String,
    /// Administrator address receiving a copy of every notification.
    pub admin_email: String,
    /// HTTP listen address for the liveness endpoint.
    pub http_addr: SocketAddr,
    /// Daily cron expression for the status reconciliation scan.
    pub reconcile_schedule: String,
    /// Daily cron expression for the notification scan.
    pub notify_schedule: String,
    /// Run both scans once at startup, before their first trigger.
    pub run_on_startup: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Required | Default |
    /// |----------|----------|---------|
    /// | `REPORTES_FIRESTORE_PROJECT_ID` | Yes | - |
    /// | `REPORTES_FIRESTORE_ACCESS_TOKEN` | No | none |
    /// | `REPORTES_FIRESTORE_BASE_URL` | No | public endpoint |
    /// | `REPORTES_SMTP_HOST` | No | `smtp.gmail.com` |
    /// | `REPORTES_SMTP_USER` | Yes | - |
    /// | `REPORTES_SMTP_PASSWORD` | Yes | - |
    /// | `REPORTES_ADMIN_EMAIL` | Yes | - |
    /// | `REPORTES_HTTP_PORT` | No | `3000` |
    /// | `REPORTES_RECONCILE_CRON` | No | `0 12 * * *` |
    /// | `REPORTES_NOTIFY_CRON` | No | `10 12 * * *` |
    /// | `REPORTES_RUN_ON_STARTUP` | No | `false` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let firestore_project_id = require("REPORTES_FIRESTORE_PROJECT_ID")?;
        let firestore_access_token = std::env::var("REPORTES_FIRESTORE_ACCESS_TOKEN").ok();
        let firestore_base_url = std::env::var("REPORTES_FIRESTORE_BASE_URL").ok();

        let smtp_host = std::env::var("REPORTES_SMTP_HOST")
            .unwrap_or_else(|_| "smtp.gmail.com".to_string());
        let smtp_user = require("REPORTES_SMTP_USER")?;
        let smtp_password = require("REPORTES_SMTP_PASSWORD")?;
        let admin_email = require("REPORTES_ADMIN_EMAIL")?;

        let port: u16 = std::env::var("REPORTES_HTTP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;
        let http_addr = SocketAddr::from(([0, 0, 0, 0], port));

        // The two scans are uncoordinated; the defaults stagger
        // reconciliation ahead of notification so a freshly transitioned
        // report is usually emailed the same day.
        let reconcile_schedule = std::env::var("REPORTES_RECONCILE_CRON")
            .unwrap_or_else(|_| "0 12 * * *".to_string());
        let notify_schedule = std::env::var("REPORTES_NOTIFY_CRON")
            .unwrap_or_else(|_| "10 12 * * *".to_string());

        let run_on_startup = std::env::var("REPORTES_RUN_ON_STARTUP")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            firestore_project_id,
            firestore_access_token,
            firestore_base_url,
            smtp_host,
            smtp_user,
            smtp_password,
            admin_email,
            http_addr,
            reconcile_schedule,
            notify_schedule,
            run_on_startup,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),
    /// The port number is invalid.
    #[error("Invalid port number")]
    InvalidPort,
}
