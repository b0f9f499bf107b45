// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! In-memory report store.
//!
//! Backend for tests and local development. Records are kept in a
//! `BTreeMap` so scans see them in a stable id order, which matters for
//! tests asserting that a failed write aborts the rest of a scan.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{Result, StoreError};
use crate::report::{ReportPatch, ReportRecord};

use super::ReportStore;

/// In-memory [`ReportStore`] implementation.
pub struct InMemoryStore {
    reports: Mutex<BTreeMap<String, ReportRecord>>,
    fail_updates: AtomicBool,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            reports: Mutex::new(BTreeMap::new()),
            fail_updates: AtomicBool::new(false),
        }
    }

    /// Insert or replace a record, keyed by its id.
    pub async fn insert(&self, record: ReportRecord) {
        self.reports.lock().await.insert(record.id.clone(), record);
    }

    /// Fetch a single record by id.
    pub async fn get(&self, id: &str) -> Option<ReportRecord> {
        self.reports.lock().await.get(id).cloned()
    }

    /// Make every subsequent `update_report` call fail.
    ///
    /// Used to exercise the abort-on-write-failure and retry-on-next-scan
    /// paths in the workers.
    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ReportStore for InMemoryStore {
    async fn list_reports(&self) -> Result<Vec<ReportRecord>> {
        Ok(self.reports.lock().await.values().cloned().collect())
    }

    async fn update_report(&self, id: &str, patch: &ReportPatch) -> Result<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(StoreError::Other("simulated update failure".to_string()));
        }

        let mut reports = self.reports.lock().await;
        let record = reports
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if let Some(status) = &patch.status {
            record.status = Some(status.clone());
        }
        if let Some(flag) = patch.overdue_notified {
            record.overdue_notified = Some(flag);
        }
        Ok(())
    }
}
