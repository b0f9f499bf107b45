// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Reportes Core - Domain Model and Report Store
//!
//! This crate holds everything the notification service knows about report
//! documents: the typed record, its lifecycle statuses, due-date parsing,
//! and the store abstraction with its Firestore REST and in-memory
//! backends.
//!
//! # Data Model
//!
//! Reports live in the Firestore collection `reportes` and are created by
//! an external application. This crate (and the service built on it) only
//! ever writes two fields:
//!
//! | Wire field | Rust field | Written when |
//! |------------|------------|--------------|
//! | `estado` | [`ReportRecord::status`] | an overdue `Asignado` report is moved to `Cerrado parcialmente` |
//! | `notificadoVencido` | [`ReportRecord::overdue_notified`] | the flag is reset on transition or set after a successful notification |
//!
//! Every other field is read-only display data for the notification email.
//!
//! # Status Lifecycle (as enforced by the workers)
//!
//! ```text
//!              due date passes
//!  ┌──────────┐  (reconciler)   ┌──────────────────────┐
//!  │ Asignado │───────────────▶│ Cerrado parcialmente  │
//!  └──────────┘                 │ notificadoVencido=false│
//!       │                       └──────────┬───────────┘
//!       │ flag drifts from false           │ emails sent (scanner)
//!       ▼ (scanner resets it)              ▼
//!  notificadoVencido=false       notificadoVencido=true
//! ```
//!
//! # Modules
//!
//! - [`report`]: record, status, and patch types
//! - [`due_date`]: `dd/mm/yyyy` parsing
//! - [`store`]: [`ReportStore`] trait, [`FirestoreStore`], [`InMemoryStore`]
//! - [`error`]: [`StoreError`]

#![deny(missing_docs)]

/// Due-date parsing for the `fechaLimite` field.
pub mod due_date;

/// Error types for store operations.
pub mod error;

/// Report record, status, and patch types.
pub mod report;

/// Report-store trait and backends.
pub mod store;

pub use due_date::{DueDateError, parse_due_date};
pub use error::StoreError;
pub use report::{ReportPatch, ReportRecord, ReportStatus};
pub use store::{FirestoreStore, InMemoryStore, ReportStore};
