// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Daily trigger schedules.
//!
//! Each worker fires at a fixed wall-clock time per day, configured as a
//! five-field cron expression evaluated in local time. The wrapper exists
//! so expression parsing fails at startup rather than inside a worker
//! loop, and so "how long until the next trigger" is testable against
//! fixed instants.

use chrono::{DateTime, Local};
use croner::Cron;
use croner::errors::CronError;

/// A parsed cron trigger evaluated in local time.
#[derive(Clone)]
pub struct DailySchedule {
    cron: Cron,
    expression: String,
}

impl DailySchedule {
    /// Parse a five-field cron expression (`minute hour day month weekday`).
    pub fn parse(expression: &str) -> Result<Self, CronError> {
        let cron = Cron::new(expression).parse()?;
        Ok(Self {
            cron,
            expression: expression.to_string(),
        })
    }

    /// The original expression, for logging.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The next trigger strictly after `now`.
    pub fn next_after(&self, now: DateTime<Local>) -> Result<DateTime<Local>, CronError> {
        self.cron.find_next_occurrence(&now, false)
    }

    /// How long to sleep from `now` until the next trigger.
    pub fn until_next(&self, now: DateTime<Local>) -> Result<std::time::Duration, CronError> {
        let next = self.next_after(now)?;
        Ok((next - now).to_std().unwrap_or(std::time::Duration::ZERO))
    }
}

impl std::fmt::Debug for DailySchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DailySchedule")
            .field("expression", &self.expression)
            .finish()
    }
}
