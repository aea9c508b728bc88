use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FormatterResult};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("invalid offset code {0}. the last two digits must be minutes between 00 and 59")]
    InvalidOffset(i32),

    #[error("invalid clock {hour}:{minute}")]
    InvalidClock { hour: u32, minute: u32 },

    #[error("time code {0:?} does not render as 4 characters")]
    FormatAssumptionViolation(String),
}

/// Codes above this value are moved back by one day on the "too" side.
pub const WRAP_THRESHOLD: i32 = 2400;

const MINUTES_PER_DAY: i32 = 24 * 60;

/// Signed hour/minute shift flattened into a decimal, `-700` is -07:00 and `530` is +05:30.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OffsetCode(i32);

impl OffsetCode {
    pub fn new(code: i32) -> Result<Self> {
        if code.abs() % 100 >= 60 {
            return Err(Error::InvalidOffset(code));
        }
        Ok(Self(code))
    }

    pub fn from_minutes(minutes: i32) -> Self {
        let abs = minutes.abs();
        Self(minutes.signum() * (abs / 60 * 100 + abs % 60))
    }

    pub fn value(&self) -> i32 {
        self.0
    }

    pub fn total_minutes(&self) -> i32 {
        let abs = self.0.abs();
        self.0.signum() * (abs / 100 * 60 + abs % 100)
    }
}

impl Display for OffsetCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatterResult {
        let sign = if self.0 < 0 { '-' } else { '+' };
        let abs = self.0.abs();
        write!(f, "{sign}{:02}:{:02}", abs / 100, abs % 100)
    }
}

/// Wall clock as `hour * 100 + minute`.
///
/// Offsets are added as flat integers, so a code produced by [`ClockCode::shift`]
/// can leave the 0000..=2359 range and may even have a minute part above 59.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockCode(i32);

impl ClockCode {
    // same value as zero padding to "HHMM" and parsing it back, 9:05 => "0905" => 905
    pub fn from_clock(hour: u32, minute: u32) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(Error::InvalidClock { hour, minute });
        }
        Ok(Self((hour * 100 + minute) as i32))
    }

    pub fn from_raw(code: i32) -> Self {
        Self(code)
    }

    pub fn value(&self) -> i32 {
        self.0
    }

    /// Flat integer addition, no carry from minutes into hours.
    pub fn shift(self, offset: OffsetCode) -> Self {
        Self(self.0 + offset.0)
    }

    /// Shift through total minutes, wrapped into a single day.
    pub fn shift_carrying(self, offset: OffsetCode) -> Self {
        let minutes = (self.0 / 100 * 60 + self.0 % 100 + offset.total_minutes())
            .rem_euclid(MINUTES_PER_DAY);
        Self(minutes / 60 * 100 + minutes % 60)
    }

    pub fn wrap_past_midnight(self) -> Self {
        if self.0 > WRAP_THRESHOLD {
            Self(self.0 - WRAP_THRESHOLD)
        } else {
            self
        }
    }

    pub fn render(&self) -> String {
        self.0.to_string()
    }

    /// Left pads with zeros. The smallest matching threshold decides the padding,
    /// and the thresholds are compared against the signed value.
    pub fn render_zero_padded(&self) -> String {
        let mut left_pad = "";
        if self.0 < 1000 {
            left_pad = "0";
        }
        if self.0 < 100 {
            left_pad = "00";
        }
        if self.0 < 10 {
            left_pad = "000";
        }
        format!("{left_pad}{code}", code = self.0)
    }
}

impl Display for ClockCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatterResult {
        write!(f, "{}", self.0)
    }
}

/// "1630" => "16:30". Anything that is not exactly 4 characters is rejected.
pub fn format_hhmm(rendered: &str) -> Result<String> {
    match (rendered.len(), rendered.get(0..2), rendered.get(2..4)) {
        (4, Some(hours), Some(minutes)) => Ok(format!("{hours}:{minutes}")),
        _ => Err(Error::FormatAssumptionViolation(rendered.to_string())),
    }
}
