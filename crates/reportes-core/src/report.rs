// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Report record types.
//!
//! Field names on the wire are the Spanish identifiers used by the
//! `reportes` collection; the Rust structs expose English names and map
//! via serde renames. All display fields are optional; records are
//! created by an external application and frequently arrive incomplete.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a report.
///
/// The store is shared with other applications, so statuses outside the
/// two this service acts on are preserved verbatim in [`ReportStatus::Other`]
/// rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReportStatus {
    /// "Asignado": the report has a responsible party and a due date.
    Assigned,
    /// "Cerrado parcialmente": overdue and administratively closed,
    /// pending final review.
    PartiallyClosed,
    /// Any status this service does not act on.
    Other(String),
}

/// Wire value for [`ReportStatus::Assigned`].
pub const STATUS_ASSIGNED: &str = "Asignado";
/// Wire value for [`ReportStatus::PartiallyClosed`].
pub const STATUS_PARTIALLY_CLOSED: &str = "Cerrado parcialmente";

impl ReportStatus {
    /// The exact string stored in the `estado` field.
    pub fn as_str(&self) -> &str {
        match self {
            ReportStatus::Assigned => STATUS_ASSIGNED,
            ReportStatus::PartiallyClosed => STATUS_PARTIALLY_CLOSED,
            ReportStatus::Other(s) => s,
        }
    }
}

impl From<String> for ReportStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            STATUS_ASSIGNED => ReportStatus::Assigned,
            STATUS_PARTIALLY_CLOSED => ReportStatus::PartiallyClosed,
            _ => ReportStatus::Other(value),
        }
    }
}

impl From<ReportStatus> for String {
    fn from(value: ReportStatus) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A report document from the `reportes` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    /// Opaque document id assigned by the store.
    #[serde(skip)]
    pub id: String,
    /// Lifecycle status (`estado`). `None` when the field is absent.
    #[serde(rename = "estado", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReportStatus>,
    /// Due date (`fechaLimite`) as a `dd/mm/yyyy` string.
    ///
    /// Records without a due date are never evaluated by the workers.
    #[serde(rename = "fechaLimite", default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Overdue-notification flag (`notificadoVencido`).
    ///
    /// Tri-state: `Some(false)` explicitly reset, `Some(true)` already
    /// emailed, `None` never touched.
    #[serde(
        rename = "notificadoVencido",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub overdue_notified: Option<bool>,
    /// Email address of the responsible party (`responsable`).
    #[serde(rename = "responsable", default, skip_serializing_if = "Option::is_none")]
    pub responsible: Option<String>,
    /// Free-text description (`descripcion`).
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Location (`lugar`).
    #[serde(rename = "lugar", default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    /// Assignment date (`fechaAsignacion`), display-only.
    #[serde(
        rename = "fechaAsignacion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub assigned_date: Option<String>,
    /// Risk level (`nivelRiesgo`), display-only.
    #[serde(rename = "nivelRiesgo", default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
    /// Report type (`tipo`), embedded in the notification subject.
    #[serde(rename = "tipo", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Name of the person who filed the report (`reportante`).
    #[serde(rename = "reportante", default, skip_serializing_if = "Option::is_none")]
    pub reporter: Option<String>,
}

impl ReportRecord {
    /// Create an empty record with the given id. Primarily for tests and
    /// the in-memory backend.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: None,
            due_date: None,
            overdue_notified: None,
            responsible: None,
            description: None,
            place: None,
            assigned_date: None,
            risk_level: None,
            kind: None,
            reporter: None,
        }
    }
}

/// Partial update applied to a report document.
///
/// Only the two fields this service ever writes are representable; both
/// backends update exactly the fields that are `Some` and leave the rest
/// of the document untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportPatch {
    /// New value for `estado`, if it should change.
    pub status: Option<ReportStatus>,
    /// New value for `notificadoVencido`, if it should change.
    pub overdue_notified: Option<bool>,
}

impl ReportPatch {
    /// Patch that only sets the overdue-notification flag.
    pub fn notified(value: bool) -> Self {
        Self {
            status: None,
            overdue_notified: Some(value),
        }
    }

    /// Patch that moves the record to a new status and resets the flag.
    pub fn transition(status: ReportStatus, overdue_notified: bool) -> Self {
        Self {
            status: Some(status),
            overdue_notified: Some(overdue_notified),
        }
    }

    /// True when the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.overdue_notified.is_none()
    }
}
