// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Report-store abstraction and backends.
//!
//! The scheduled workers never talk to Firestore directly; they go through
//! [`ReportStore`], which hides the backend behind a trait so the same
//! worker code runs against the REST backend in production and the
//! in-memory backend in tests.

pub mod firestore;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::report::{ReportPatch, ReportRecord};

pub use self::firestore::FirestoreStore;
pub use self::memory::InMemoryStore;

/// Access to the `reportes` document collection.
///
/// Implementations must be thread-safe: the store handle is shared between
/// the two scheduled workers.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Fetch every report in the collection.
    ///
    /// The scans read the full collection: the notification scanner needs
    /// to see `Asignado` records to keep their flag reset, not just the
    /// partially-closed ones it notifies on.
    async fn list_reports(&self) -> Result<Vec<ReportRecord>>;

    /// Apply a partial update to one report.
    ///
    /// Only the fields set in the patch are written; the rest of the
    /// document is left untouched.
    async fn update_report(&self, id: &str, patch: &ReportPatch) -> Result<()>;
}
