// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Tests for the embeddable runtime: liveness endpoint and graceful
//! shutdown.

use std::sync::Arc;

use reportes_core::InMemoryStore;
use reportes_notifier::mailer::MockMailer;
use reportes_notifier::runtime::NotifierRuntime;
use reportes_notifier::server::LIVENESS_MESSAGE;

fn builder_with_mocks() -> reportes_notifier::runtime::NotifierRuntimeBuilder {
    NotifierRuntime::builder()
        .store(Arc::new(InMemoryStore::new()))
        .mailer(Arc::new(MockMailer::new()))
        .admin_email("admin@example.com")
}

#[tokio::test]
async fn liveness_endpoint_answers_while_running() {
    let runtime = builder_with_mocks()
        .http_addr("127.0.0.1:0".parse().unwrap())
        .build()
        .unwrap()
        .start()
        .await
        .unwrap();

    let url = format!("http://{}/", runtime.http_addr());
    let body = reqwest::get(&url).await.unwrap();
    assert_eq!(body.status(), reqwest::StatusCode::OK);
    assert_eq!(body.text().await.unwrap(), LIVENESS_MESSAGE);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn shutdown_stops_the_http_server() {
    let runtime = builder_with_mocks()
        .http_addr("127.0.0.1:0".parse().unwrap())
        .build()
        .unwrap()
        .start()
        .await
        .unwrap();

    let addr = runtime.http_addr();
    runtime.shutdown().await.unwrap();

    // The port is released once shutdown returns.
    assert!(reqwest::get(format!("http://{addr}/")).await.is_err());
}

#[tokio::test]
async fn builder_requires_store_mailer_and_admin() {
    assert!(NotifierRuntime::builder().build().is_err());

    assert!(
        NotifierRuntime::builder()
            .store(Arc::new(InMemoryStore::new()))
            .mailer(Arc::new(MockMailer::new()))
            .build()
            .is_err()
    );

    assert!(builder_with_mocks().build().is_ok());
}
