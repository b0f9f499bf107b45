// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Due-date parsing.
//!
//! The store keeps `fechaLimite` as a `dd/mm/yyyy` string written by the
//! reporting application. Parsing is isolated here so the day-granularity
//! comparison semantics stay independently testable: both "today" and the
//! due date are calendar days, and a report due *today* is not yet overdue.

use chrono::NaiveDate;
use thiserror::Error;

/// Error parsing a `fechaLimite` value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DueDateError {
    /// The string does not match `dd/mm/yyyy` or names an impossible date.
    #[error("invalid due date {0:?}: expected dd/mm/yyyy")]
    Invalid(String),
}

/// Parse a `dd/mm/yyyy` due date into a calendar day.
///
/// Single-digit day and month are accepted ("1/1/2024"); anything else
/// (wrong separators, missing components, out-of-range values) is an error.
/// Callers treat a parse failure the same as an absent due date: the record
/// is skipped, not failed.
pub fn parse_due_date(raw: &str) -> Result<NaiveDate, DueDateError> {
    NaiveDate::parse_from_str(raw.trim(), "%d/%m/%Y")
        .map_err(|_| DueDateError::Invalid(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_padded_dates() {
        assert_eq!(
            parse_due_date("01/01/2024"),
            Ok(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        );
        assert_eq!(
            parse_due_date("31/12/2099"),
            Ok(NaiveDate::from_ymd_opt(2099, 12, 31).unwrap())
        );
    }

    #[test]
    fn parses_unpadded_dates() {
        assert_eq!(
            parse_due_date("1/2/2024"),
            Ok(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
        );
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        assert_eq!(
            parse_due_date(" 15/06/2024 "),
            Ok(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
        );
    }

    #[test]
    fn rejects_iso_ordering() {
        // yyyy/mm/dd would silently swap day and year if accepted.
        assert!(parse_due_date("2024/01/15").is_err());
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!(parse_due_date("31/02/2024").is_err());
        assert!(parse_due_date("00/01/2024").is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_due_date("").is_err());
        assert!(parse_due_date("pendiente").is_err());
        assert!(parse_due_date("01-01-2024").is_err());
    }

    #[test]
    fn day_granularity_ordering() {
        let due = parse_due_date("01/06/2024").unwrap();
        let same_day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let next_day = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        // Due today: not overdue. Due yesterday: overdue.
        assert!(!(due < same_day));
        assert!(due < next_day);
    }
}
