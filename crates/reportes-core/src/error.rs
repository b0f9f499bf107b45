// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for reportes-core.

use thiserror::Error;

/// Errors from report-store operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// HTTP transport failure or non-success status from the store.
    #[error("Store request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The store returned a document this crate cannot interpret.
    #[error("Malformed document {id}: {reason}")]
    MalformedDocument {
        /// Document id (or name, when the id could not be derived).
        id: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The referenced report does not exist.
    #[error("Report not found: {0}")]
    NotFound(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// Result type using [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
