// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Expiration-notice composition.
//!
//! Renders the subject line and the two HTML bodies (administrator and
//! responsible party) from a report record. All "not specified"
//! substitution for missing fields happens here and nowhere else; the
//! recipients are Spanish-speaking, so the copy is Spanish.

use reportes_core::ReportRecord;

/// Subject fallback when the report has no `tipo`.
const KIND_FALLBACK: &str = "Sin tipo";

/// Closing line pointing recipients back at the reporting application.
const CLOSING: &str = "Por favor, revise la aplicación de reportes.";

/// A rendered expiration notice for one overdue report.
pub struct OverdueNotice<'a> {
    report: &'a ReportRecord,
}

impl<'a> OverdueNotice<'a> {
    /// Build a notice for the given report.
    pub fn new(report: &'a ReportRecord) -> Self {
        Self { report }
    }

    /// Subject line: the report type plus a short id so two reports of the
    /// same type remain distinguishable in a mailbox.
    pub fn subject(&self) -> String {
        let kind = self.report.kind.as_deref().unwrap_or(KIND_FALLBACK);
        let short_id: String = self.report.id.chars().take(3).collect();
        format!("Reporte vencido de \"{kind}\" - {short_id}")
    }

    /// Body addressed to the administrator.
    pub fn admin_body(&self) -> String {
        self.body("Estimado/a administrador,")
    }

    /// Body addressed to the responsible party.
    pub fn responsible_body(&self) -> String {
        self.body("Estimado/a responsable,")
    }

    fn body(&self, greeting: &str) -> String {
        let report = self.report;
        format!(
            "<p>{greeting}</p>\n\
             <p>El reporte con los siguientes datos ha vencido:</p>\n\
             <ul>\n\
             <li><b>Descripción:</b> {description}</li>\n\
             <li><b>Lugar:</b> {place}</li>\n\
             <li><b>Fecha de asignación:</b> {assigned}</li>\n\
             <li><b>Fecha límite:</b> {due}</li>\n\
             <li><b>Nivel de riesgo:</b> {risk}</li>\n\
             <li><b>Reportante:</b> {reporter}</li>\n\
             </ul>\n\
             <p>{CLOSING}</p>\n",
            description = field(&report.description, "No especificada"),
            place = field(&report.place, "No especificado"),
            assigned = field(&report.assigned_date, "No especificada"),
            due = field(&report.due_date, "No especificada"),
            risk = field(&report.risk_level, "No especificado"),
            reporter = field(&report.reporter, "No especificado"),
        )
    }
}

fn field(value: &Option<String>, fallback: &str) -> String {
    match value {
        Some(v) => escape_html(v),
        None => fallback.to_string(),
    }
}

/// Minimal HTML escaping for free-text values interpolated into the body.
fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
