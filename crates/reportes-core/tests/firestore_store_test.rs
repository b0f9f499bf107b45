// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Tests for the Firestore REST backend against a mock HTTP server.

use reportes_core::report::{ReportPatch, ReportStatus};
use reportes_core::store::{FirestoreStore, ReportStore};
use reportes_core::StoreError;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOCUMENTS_PATH: &str = "/v1/projects/demo/databases/(default)/documents/reportes";

fn store_for(server: &MockServer) -> FirestoreStore {
    FirestoreStore::with_base_url(
        reqwest::Client::new(),
        "demo",
        &format!("{}/v1", server.uri()),
    )
}

fn firestore_doc(id: &str, fields: serde_json::Value) -> serde_json::Value {
    json!({
        "name": format!("projects/demo/databases/(default)/documents/reportes/{id}"),
        "fields": fields,
    })
}

#[tokio::test]
async fn list_reports_follows_pagination() {
    let server = MockServer::start().await;

    // Page 2 is more specific (carries the token), so it is mounted first.
    Mock::given(method("GET"))
        .and(path(DOCUMENTS_PATH))
        .and(query_param("pageToken", "tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [firestore_doc("bbb222", json!({
                "estado": { "stringValue": "Cerrado parcialmente" },
                "fechaLimite": { "stringValue": "02/02/2024" },
            }))],
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(DOCUMENTS_PATH))
        .and(query_param("pageSize", "300"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [firestore_doc("aaa111", json!({
                "estado": { "stringValue": "Asignado" },
                "fechaLimite": { "stringValue": "01/01/2024" },
                "notificadoVencido": { "booleanValue": false },
            }))],
            "nextPageToken": "tok-1",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reports = store_for(&server).list_reports().await.unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].id, "aaa111");
    assert_eq!(reports[0].status, Some(ReportStatus::Assigned));
    assert_eq!(reports[0].overdue_notified, Some(false));
    assert_eq!(reports[1].id, "bbb222");
    assert_eq!(reports[1].status, Some(ReportStatus::PartiallyClosed));
}

#[tokio::test]
async fn list_reports_sends_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DOCUMENTS_PATH))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "documents": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server).with_access_token("secret-token");
    let reports = store.list_reports().await.unwrap();
    assert!(reports.is_empty());
}

#[tokio::test]
async fn empty_collection_lists_no_documents() {
    let server = MockServer::start().await;

    // Firestore omits the `documents` key entirely for an empty collection.
    Mock::given(method("GET"))
        .and(path(DOCUMENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let reports = store_for(&server).list_reports().await.unwrap();
    assert!(reports.is_empty());
}

#[tokio::test]
async fn update_report_patches_with_field_mask() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(format!("{DOCUMENTS_PATH}/abc123")))
        .and(query_param("updateMask.fieldPaths", "estado"))
        .and(body_partial_json(json!({
            "fields": {
                "estado": { "stringValue": "Cerrado parcialmente" },
                "notificadoVencido": { "booleanValue": false },
            }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(firestore_doc("abc123", json!({}))),
        )
        .expect(1)
        .mount(&server)
        .await;

    store_for(&server)
        .update_report(
            "abc123",
            &ReportPatch::transition(ReportStatus::PartiallyClosed, false),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn flag_only_patch_masks_only_the_flag() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(format!("{DOCUMENTS_PATH}/abc123")))
        .and(query_param("updateMask.fieldPaths", "notificadoVencido"))
        .and(body_partial_json(json!({
            "fields": { "notificadoVencido": { "booleanValue": true } }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(firestore_doc("abc123", json!({}))),
        )
        .expect(1)
        .mount(&server)
        .await;

    store_for(&server)
        .update_report("abc123", &ReportPatch::notified(true))
        .await
        .unwrap();
}

#[tokio::test]
async fn update_missing_report_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(format!("{DOCUMENTS_PATH}/nope")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = store_for(&server)
        .update_report("nope", &ReportPatch::notified(true))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == "nope"));
}

#[tokio::test]
async fn server_error_propagates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DOCUMENTS_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = store_for(&server).list_reports().await.unwrap_err();
    assert!(matches!(err, StoreError::Http(_)));
}

#[tokio::test]
async fn empty_patch_makes_no_request() {
    let server = MockServer::start().await;
    // No mocks mounted: any request would 404 and fail the call.

    store_for(&server)
        .update_report("abc123", &ReportPatch::default())
        .await
        .unwrap();
}
