// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Outbound email dispatch.
//!
//! The scanner never talks to SMTP directly; it goes through [`Mailer`],
//! with [`SmtpMailer`] as the production transport and [`MockMailer`]
//! for tests.

pub mod mock;
pub mod smtp;

use async_trait::async_trait;
use thiserror::Error;

pub use self::mock::MockMailer;
pub use self::smtp::SmtpMailer;

/// Errors from email dispatch.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MailError {
    /// A sender or recipient address could not be parsed.
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be assembled.
    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    /// The SMTP transport rejected or failed the send.
    #[error("SMTP error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// One outbound message: recipient, subject, and HTML body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html_body: String,
}

/// Outbound mail transport.
///
/// A failed send must leave no trace the caller could mistake for
/// success: the scanner only marks a report notified after `send`
/// returns `Ok` for both recipients.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one message.
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}
