// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Timestamp grammar shared by the launcher CLI and the engine orchestrator.
//!
//! The CLI carries date fields through as raw strings and leaves their
//! validation to the orchestrator right before launch; both sides use this
//! module so the accepted patterns are defined exactly once.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// Timestamp patterns accepted on the command line, in the order they are
/// tried.
pub const SUPPORTED_TIMESTAMPS: [&str; 4] = [
    "YYYY-MM-DD",
    "YYYY-MM-DD HH",
    "YYYY-MM-DD HH:MM",
    "YYYY-MM-DD HH:MM:SS",
];

const DATE_FORMAT: &str = "%Y-%m-%d";
const MINUTE_FORMAT: &str = "%Y-%m-%d %H:%M";
const SECOND_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Last hourly point of a date-only end timestamp.
const END_OF_DAY_HOUR: i64 = 23;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error(
        "unrecognized timestamp '{0}', expected 'YYYY-MM-DD', 'YYYY-MM-DD HH', 'YYYY-MM-DD HH:MM' or 'YYYY-MM-DD HH:MM:SS'"
    )]
    Unrecognized(String),
}

enum Parsed {
    DateOnly(NaiveDate),
    DateTime(NaiveDateTime),
}

fn parse_any(raw: &str) -> Result<Parsed, TimestampError> {
    let trimmed = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Ok(Parsed::DateOnly(date));
    }

    for format in [SECOND_FORMAT, MINUTE_FORMAT] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Parsed::DateTime(datetime));
        }
    }

    // 'YYYY-MM-DD HH': chrono cannot assemble a time-of-day from a bare hour,
    // so the hour field is split off and parsed by hand.
    if let Some((date_part, hour_part)) = trimmed.rsplit_once(' ') {
        if let (Ok(date), Ok(hour)) = (
            NaiveDate::parse_from_str(date_part.trim_end(), DATE_FORMAT),
            hour_part.parse::<u32>(),
        ) && let Some(datetime) = date.and_hms_opt(hour, 0, 0)
        {
            return Ok(Parsed::DateTime(datetime));
        }
    }

    Err(TimestampError::Unrecognized(raw.to_string()))
}

/// Parse a timestamp in one of the [`SUPPORTED_TIMESTAMPS`] patterns. A date
/// without a time-of-day maps to midnight.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, TimestampError> {
    match parse_any(raw)? {
        Parsed::DateOnly(date) => Ok(date.and_time(NaiveTime::MIN)),
        Parsed::DateTime(datetime) => Ok(datetime),
    }
}

/// Parse the end of a simulation range. A date without a time-of-day is
/// inclusive through its last hour, so the entire end date is simulated.
pub fn parse_end_timestamp(raw: &str) -> Result<NaiveDateTime, TimestampError> {
    match parse_any(raw)? {
        Parsed::DateOnly(date) => {
            Ok(date.and_time(NaiveTime::MIN) + Duration::hours(END_OF_DAY_HOUR))
        }
        Parsed::DateTime(datetime) => Ok(datetime),
    }
}
