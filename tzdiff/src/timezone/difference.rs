use super::registry::{Registry, RegistryError};
use chrono::{DateTime, Timelike, Utc};
use clock_code::{format_hhmm, ClockCode, OffsetCode};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum TimeDiffError {
    #[error("missing param `{0}`")]
    MissingParameter(&'static str),

    #[error("unknown location `{0}`")]
    UnknownLocation(String),

    #[error("computed time {0:?} is not in HHMM form")]
    FormatAssumptionViolation(String),

    #[error("invalid clock. {0}")]
    InvalidClock(clock_code::Error),

    #[error("registry error {0}")]
    RegistryError(RegistryError),
}

impl TimeDiffError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingParameter(_) => "missing_parameter",
            Self::UnknownLocation(_) => "unknown_location",
            Self::FormatAssumptionViolation(_) => "format_assumption_violation",
            Self::InvalidClock(_) => "invalid_clock",
            Self::RegistryError(_) => "registry_error",
        }
    }
}

impl From<RegistryError> for TimeDiffError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::UnknownLocation(key) => Self::UnknownLocation(key),
            other => Self::RegistryError(other),
        }
    }
}

impl From<clock_code::Error> for TimeDiffError {
    fn from(e: clock_code::Error) -> Self {
        match e {
            clock_code::Error::FormatAssumptionViolation(rendered) => {
                Self::FormatAssumptionViolation(rendered)
            }
            other => Self::InvalidClock(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, TimeDiffError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockArithmetic {
    /// Offset codes added onto the HHMM clock code as plain integers.
    Flat,
    MinuteCarrying,
}

impl Default for ClockArithmetic {
    fn default() -> Self {
        Self::Flat
    }
}

impl FromStr for ClockArithmetic {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "flat" => Ok(Self::Flat),
            "minute_carrying" => Ok(Self::MinuteCarrying),
            r => Err(format!("unknown arithmetic {r}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeDifference {
    pub location_from: String,
    pub location_from_time: String,
    pub location_too: String,
    pub location_too_time: String,
    pub time_difference: i32,
}

/// Local times of `loc_from` and `loc_too` at `now`, and the signed difference
/// between them as an HHMM style code.
///
/// With [`ClockArithmetic::Flat`] the difference is taken before the "too"
/// side is wrapped past midnight, and only the "too" side is wrapped and zero
/// padded. The "from" side is rendered as is and fails with
/// [`TimeDiffError::FormatAssumptionViolation`] unless it is 4 characters long.
pub fn compute_difference(
    registry: &Registry,
    loc_from: &str,
    loc_too: &str,
    now: &DateTime<Utc>,
    arithmetic: ClockArithmetic,
) -> Result<TimeDifference> {
    let location_from = registry.lookup(loc_from)?;
    let location_too = registry.lookup(loc_too)?;

    let now_code = ClockCode::from_clock(now.hour(), now.minute())?;
    log::debug!(
        "compute difference. now: {now_code}, from: {loc_from}({}), too: {loc_too}({})",
        location_from.offset,
        location_too.offset
    );

    let (location_from_time, location_too_time, time_difference) = match arithmetic {
        ClockArithmetic::Flat => {
            let from_code = now_code.shift(location_from.offset);
            let too_code = now_code.shift(location_too.offset);
            let difference = from_code.value() - too_code.value();

            let too_code = too_code.wrap_past_midnight();
            (
                format_hhmm(&from_code.render())?,
                format_hhmm(&too_code.render_zero_padded())?,
                difference,
            )
        }
        ClockArithmetic::MinuteCarrying => {
            let from_code = now_code.shift_carrying(location_from.offset);
            let too_code = now_code.shift_carrying(location_too.offset);
            let difference = OffsetCode::from_minutes(
                location_from.offset.total_minutes() - location_too.offset.total_minutes(),
            );
            (
                format_hhmm(&from_code.render_zero_padded())?,
                format_hhmm(&too_code.render_zero_padded())?,
                difference.value(),
            )
        }
    };

    Ok(TimeDifference {
        location_from: loc_from.to_string(),
        location_from_time,
        location_too: loc_too.to_string(),
        location_too_time,
        time_difference,
    })
}
