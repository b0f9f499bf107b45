// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for reportes-notifier.

use thiserror::Error;

/// Service errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Configuration loading failed.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Report-store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] reportes_core::StoreError),

    /// Email dispatch failed.
    #[error("Mail error: {0}")]
    Mail(#[from] crate::mailer::MailError),

    /// A cron expression could not be parsed or evaluated.
    #[error("Schedule error: {0}")]
    Schedule(#[from] croner::errors::CronError),

    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// Result type using the service [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
