use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_seconds, naive_date_to_unix_seconds};
use crate::error::{ChartError, ChartResult};

/// Position on the shared time axis.
///
/// Logical indices are strictly increasing with time and always equal the
/// position of the owning time point inside the sorted timeline.
pub type LogicalIndex = i64;

/// Totally ordered scalar derived from a domain time value.
///
/// Two domain times producing the same key address the same time point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeKey(OrderedFloat<f64>);

impl TimeKey {
    #[must_use]
    pub fn new(raw: f64) -> Self {
        Self(OrderedFloat(raw))
    }

    #[must_use]
    pub fn raw(self) -> f64 {
        self.0.into_inner()
    }
}

impl From<i64> for TimeKey {
    fn from(value: i64) -> Self {
        Self::new(value as f64)
    }
}

impl From<f64> for TimeKey {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for TimeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeriesId(u32);

impl SeriesId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Calendar day without intraday component (exchange session date).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "BusinessDayParts", into = "BusinessDayParts")]
pub struct BusinessDay(NaiveDate);

/// Serialized form of [`BusinessDay`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BusinessDayParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl BusinessDay {
    pub fn new(year: i32, month: u32, day: u32) -> ChartResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| {
                ChartError::InvalidData(format!(
                    "invalid business day: {year:04}-{month:02}-{day:02}"
                ))
            })
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    #[must_use]
    pub fn day(self) -> u32 {
        self.0.day()
    }

    /// UTC midnight of this day, in seconds.
    #[must_use]
    pub fn unix_seconds(self) -> i64 {
        naive_date_to_unix_seconds(self.0)
    }
}

impl TryFrom<BusinessDayParts> for BusinessDay {
    type Error = ChartError;

    fn try_from(parts: BusinessDayParts) -> Result<Self, Self::Error> {
        Self::new(parts.year, parts.month, parts.day)
    }
}

impl From<BusinessDay> for BusinessDayParts {
    fn from(day: BusinessDay) -> Self {
        Self {
            year: day.year(),
            month: day.month(),
            day: day.day(),
        }
    }
}

impl FromStr for BusinessDay {
    type Err = ChartError;

    /// Parses ISO `YYYY-MM-DD` strings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|e| ChartError::InvalidData(format!("invalid business day `{s}`: {e}")))
    }
}

/// Time value as supplied by the host, before key conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DomainTime {
    /// Seconds since the Unix epoch.
    Utc(i64),
    BusinessDay(BusinessDay),
}

impl DomainTime {
    #[must_use]
    pub fn from_datetime(time: DateTime<Utc>) -> Self {
        Self::Utc(datetime_to_unix_seconds(time))
    }

    /// Seconds since the Unix epoch; business days map to UTC midnight.
    #[must_use]
    pub fn unix_seconds(self) -> i64 {
        match self {
            Self::Utc(seconds) => seconds,
            Self::BusinessDay(day) => day.unix_seconds(),
        }
    }
}

impl From<i64> for DomainTime {
    fn from(seconds: i64) -> Self {
        Self::Utc(seconds)
    }
}

impl From<BusinessDay> for DomainTime {
    fn from(day: BusinessDay) -> Self {
        Self::BusinessDay(day)
    }
}

/// Coarseness rank of a time point, used for tick-mark selection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TickMarkWeight(u8);

impl TickMarkWeight {
    pub const LESS_THAN_SECOND: Self = Self(0);
    pub const SECOND: Self = Self(10);
    pub const MINUTE1: Self = Self(20);
    pub const MINUTE5: Self = Self(21);
    pub const MINUTE30: Self = Self(22);
    pub const HOUR1: Self = Self(30);
    pub const HOUR3: Self = Self(31);
    pub const HOUR6: Self = Self(32);
    pub const HOUR12: Self = Self(33);
    pub const DAY: Self = Self(50);
    pub const MONTH: Self = Self(60);
    pub const YEAR: Self = Self(70);

    #[must_use]
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// One entry of the shared sorted timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub key: TimeKey,
    pub original_time: DomainTime,
    pub index: LogicalIndex,
    pub weight: TickMarkWeight,
}

impl TimePoint {
    #[must_use]
    pub fn new(key: TimeKey, original_time: DomainTime) -> Self {
        Self {
            key,
            original_time,
            index: 0,
            weight: TickMarkWeight::default(),
        }
    }
}
