// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Firestore REST backend for the report store.
//!
//! Talks to the Firestore v1 REST API:
//! - `GET .../documents/reportes` with `pageSize`/`pageToken` pagination to
//!   fetch the collection
//! - `PATCH .../documents/reportes/{id}` with `updateMask.fieldPaths` so a
//!   write touches only `estado`/`notificadoVencido` and never clobbers the
//!   rest of the document
//!
//! Authentication is a bearer token supplied by the deployment (metadata
//! server, workload identity, or the emulator's no-auth mode). Token
//! provisioning and refresh are outside this crate.

use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::report::{ReportPatch, ReportRecord};

use super::ReportStore;
use async_trait::async_trait;

/// Firestore collection holding the report documents.
const COLLECTION: &str = "reportes";

/// Default Firestore REST endpoint.
const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Default page size for collection listing.
const DEFAULT_PAGE_SIZE: u32 = 300;

/// [`ReportStore`] backed by the Firestore REST API.
pub struct FirestoreStore {
    client: reqwest::Client,
    /// `{base}/projects/{project}/databases/(default)/documents`
    documents_url: String,
    access_token: Option<String>,
    page_size: u32,
}

impl FirestoreStore {
    /// Create a store for the given Google Cloud project, using the public
    /// Firestore endpoint.
    pub fn new(client: reqwest::Client, project_id: &str) -> Self {
        Self::with_base_url(client, project_id, DEFAULT_BASE_URL)
    }

    /// Create a store against a non-default endpoint (emulator, test server).
    pub fn with_base_url(client: reqwest::Client, project_id: &str, base_url: &str) -> Self {
        let documents_url = format!(
            "{}/projects/{}/databases/(default)/documents",
            base_url.trim_end_matches('/'),
            project_id
        );
        Self {
            client,
            documents_url,
            access_token: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Attach a bearer token to every request.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Override the listing page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl ReportStore for FirestoreStore {
    async fn list_reports(&self) -> Result<Vec<ReportRecord>> {
        let url = format!("{}/{}", self.documents_url, COLLECTION);
        let mut reports = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .query(&[("pageSize", self.page_size.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let page: ListDocumentsResponse = self
                .authorize(request)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            for document in page.documents {
                reports.push(decode_document(document)?);
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(count = reports.len(), "Fetched report collection");
        Ok(reports)
    }

    async fn update_report(&self, id: &str, patch: &ReportPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let url = format!("{}/{}/{}", self.documents_url, COLLECTION, id);

        let mut mask: Vec<(&str, &str)> = Vec::new();
        let mut fields = Map::new();
        if let Some(status) = &patch.status {
            mask.push(("updateMask.fieldPaths", "estado"));
            fields.insert(
                "estado".to_string(),
                json!({ "stringValue": status.as_str() }),
            );
        }
        if let Some(flag) = patch.overdue_notified {
            mask.push(("updateMask.fieldPaths", "notificadoVencido"));
            fields.insert(
                "notificadoVencido".to_string(),
                json!({ "booleanValue": flag }),
            );
        }

        let request = self
            .client
            .patch(&url)
            .query(&mask)
            .json(&json!({ "fields": fields }));

        let response = self.authorize(request).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(id.to_string()));
        }
        response.error_for_status()?;

        debug!(report_id = id, ?patch, "Patched report");
        Ok(())
    }
}

/// One page of `documents.list`.
#[derive(Debug, Deserialize)]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

/// A Firestore document: full resource name plus typed field values.
#[derive(Debug, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

fn decode_document(document: Document) -> Result<ReportRecord> {
    let id = document
        .name
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| StoreError::MalformedDocument {
            id: document.name.clone(),
            reason: "document name has no id segment".to_string(),
        })?
        .to_string();

    let fields = &document.fields;
    let mut record = ReportRecord::new(id);
    record.status = string_value(fields, "estado").map(Into::into);
    record.due_date = string_value(fields, "fechaLimite");
    record.overdue_notified = bool_value(fields, "notificadoVencido");
    record.responsible = string_value(fields, "responsable");
    record.description = string_value(fields, "descripcion");
    record.place = string_value(fields, "lugar");
    record.assigned_date = string_value(fields, "fechaAsignacion");
    record.risk_level = string_value(fields, "nivelRiesgo");
    record.kind = string_value(fields, "tipo");
    record.reporter = string_value(fields, "reportante");
    Ok(record)
}

/// Read a `stringValue` field. Absent fields and other value kinds are
/// treated as unset; the collection is written by hand in places and the
/// workers only skip, never fail, on odd field types.
fn string_value(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)?
        .get("stringValue")?
        .as_str()
        .map(str::to_string)
}

/// Read a `booleanValue` field, with the same leniency as [`string_value`].
fn bool_value(fields: &Map<String, Value>, key: &str) -> Option<bool> {
    fields.get(key)?.get("booleanValue")?.as_bool()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportStatus;

    fn doc(name: &str, fields: Value) -> Document {
        Document {
            name: name.to_string(),
            fields: fields.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn decodes_typed_fields() {
        let document = doc(
            "projects/p/databases/(default)/documents/reportes/abc123",
            json!({
                "estado": { "stringValue": "Asignado" },
                "fechaLimite": { "stringValue": "01/01/2024" },
                "notificadoVencido": { "booleanValue": false },
                "responsable": { "stringValue": "ana@example.com" },
            }),
        );

        let record = decode_document(document).unwrap();
        assert_eq!(record.id, "abc123");
        assert_eq!(record.status, Some(ReportStatus::Assigned));
        assert_eq!(record.due_date.as_deref(), Some("01/01/2024"));
        assert_eq!(record.overdue_notified, Some(false));
        assert_eq!(record.responsible.as_deref(), Some("ana@example.com"));
    }

    #[test]
    fn unknown_value_kinds_read_as_unset() {
        // A writer once stored the flag as a string; the scanner must see
        // "unset" rather than fail the whole scan.
        let document = doc(
            "projects/p/databases/(default)/documents/reportes/abc123",
            json!({
                "notificadoVencido": { "stringValue": "true" },
                "estado": { "integerValue": "4" },
            }),
        );

        let record = decode_document(document).unwrap();
        assert_eq!(record.overdue_notified, None);
        assert_eq!(record.status, None);
    }

    #[test]
    fn empty_document_name_is_malformed() {
        let document = doc("", json!({}));
        assert!(matches!(
            decode_document(document),
            Err(StoreError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let store = FirestoreStore::with_base_url(
            reqwest::Client::new(),
            "demo",
            "http://localhost:8080/v1/",
        );
        assert_eq!(
            store.documents_url,
            "http://localhost:8080/v1/projects/demo/databases/(default)/documents"
        );
    }
}
