// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Reportes Notifier - Overdue Report Reconciliation and Notification
//!
//! A small scheduled service over the `reportes` collection. Twice a day
//! (two independent cron triggers) it:
//!
//! 1. moves overdue `Asignado` reports to `Cerrado parcialmente`
//!    (status reconciler), and
//! 2. emails an expiration notice for overdue `Cerrado parcialmente`
//!    reports to the responsible party and the administrator, marking each
//!    report so it is notified at most once per overdue period
//!    (overdue scanner).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 reportes-notifier (this crate)                │
//! │                                                               │
//! │  ┌──────────────┐   ┌──────────────────┐   ┌──────────────┐  │
//! │  │   Status     │   │     Overdue      │   │   Liveness   │  │
//! │  │  Reconciler  │   │     Scanner      │   │   GET /      │  │
//! │  │ (cron, daily)│   │  (cron, daily)   │   │  (port 3000) │  │
//! │  └──────┬───────┘   └───────┬──────┬───┘   └──────────────┘  │
//! └─────────┼───────────────────┼──────┼─────────────────────────┘
//!           │ estado,           │      │ two HTML emails
//!           │ notificadoVencido │      ▼
//!           ▼                   ▼   ┌──────────────┐
//!     ┌─────────────────────────┐   │  SMTP relay  │
//!     │  Firestore `reportes`   │   └──────────────┘
//!     │  (reportes-core store)  │
//!     └─────────────────────────┘
//! ```
//!
//! Each scan is sequential: one record read, patch, or send at a time.
//! A failed run is logged and the state it did not reach is retried at
//! the next trigger; nothing is fatal to the process.
//!
//! # Configuration
//!
//! Loaded once at startup from environment variables; see
//! [`Config::from_env`]. Missing store or SMTP credentials prevent
//! startup.
//!
//! # Modules
//!
//! - [`config`]: environment-variable configuration
//! - [`error`]: service error types
//! - [`schedule`]: daily cron triggers
//! - [`status_reconciler`]: overdue status transitions
//! - [`overdue_scanner`]: expiration emails and flag healing
//! - [`notice`]: subject/body composition
//! - [`mailer`]: SMTP dispatch behind a trait
//! - [`server`]: HTTP liveness endpoint
//! - [`runtime`]: embeddable start/shutdown wrapper

#![deny(missing_docs)]

/// Service configuration loaded from environment variables.
pub mod config;

/// Error types for the service.
pub mod error;

/// Outbound email dispatch.
pub mod mailer;

/// Expiration-notice composition.
pub mod notice;

/// Background worker that emails expiration notices.
pub mod overdue_scanner;

/// Embeddable runtime wiring workers and HTTP together.
pub mod runtime;

/// Daily trigger schedules.
pub mod schedule;

/// HTTP liveness endpoint.
pub mod server;

/// Background worker that closes overdue assigned reports.
pub mod status_reconciler;

pub use config::Config;
pub use error::Error;
