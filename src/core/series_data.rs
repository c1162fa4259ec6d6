use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::primitives::decimal_to_f64;
use crate::core::types::DomainTime;
use crate::error::ChartResult;

/// Price extraction for custom series payloads.
///
/// The row factory folds the extracted prices into a regular four-channel row
/// so range queries work the same way for built-in and custom series.
pub trait CustomSeriesSource: fmt::Debug + Send + Sync {
    /// Prices carried by one payload. The last entry is the "current" value.
    fn price_values(&self, payload: &Value) -> Vec<f64>;

    fn is_whitespace(&self, payload: &Value) -> bool {
        !self.price_values(payload).iter().any(|v| v.is_finite())
    }
}

/// Series type, selecting how raw items are turned into rows.
#[derive(Debug, Clone)]
pub enum SeriesKind {
    Bar,
    Candlestick,
    Area,
    Baseline,
    Line,
    Histogram,
    Custom(Arc<dyn CustomSeriesSource>),
}

impl SeriesKind {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Candlestick => "candlestick",
            Self::Area => "area",
            Self::Baseline => "baseline",
            Self::Line => "line",
            Self::Histogram => "histogram",
            Self::Custom(_) => "custom",
        }
    }

    /// Returns `true` for kinds consuming open/high/low/close items.
    #[must_use]
    pub fn is_ohlc(&self) -> bool {
        matches!(self, Self::Bar | Self::Candlestick)
    }

    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

/// Optional per-row colors. Unset fields fall back to series options.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOverrides {
    pub color: Option<String>,
    pub border_color: Option<String>,
    pub wick_color: Option<String>,
    pub line_color: Option<String>,
    pub top_color: Option<String>,
    pub bottom_color: Option<String>,
}

impl StyleOverrides {
    #[must_use]
    pub fn with_color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.color.is_none()
            && self.border_color.is_none()
            && self.wick_color.is_none()
            && self.line_color.is_none()
            && self.top_color.is_none()
            && self.bottom_color.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcItem {
    pub time: DomainTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub style: StyleOverrides,
    #[serde(default)]
    pub custom_values: Option<Value>,
}

impl OhlcItem {
    #[must_use]
    pub fn new(time: impl Into<DomainTime>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time: time.into(),
            open,
            high,
            low,
            close,
            style: StyleOverrides::default(),
            custom_values: None,
        }
    }

    /// Converts strongly-typed temporal/decimal input into an OHLC item.
    pub fn from_decimal_time(
        time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
    ) -> ChartResult<Self> {
        Ok(Self::new(
            DomainTime::from_datetime(time),
            decimal_to_f64(open, "open")?,
            decimal_to_f64(high, "high")?,
            decimal_to_f64(low, "low")?,
            decimal_to_f64(close, "close")?,
        ))
    }

    #[must_use]
    pub fn with_style(mut self, style: StyleOverrides) -> Self {
        self.style = style;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueItem {
    pub time: DomainTime,
    pub value: f64,
    #[serde(default)]
    pub style: StyleOverrides,
    #[serde(default)]
    pub custom_values: Option<Value>,
}

impl ValueItem {
    #[must_use]
    pub fn new(time: impl Into<DomainTime>, value: f64) -> Self {
        Self {
            time: time.into(),
            value,
            style: StyleOverrides::default(),
            custom_values: None,
        }
    }

    pub fn from_decimal_time(time: DateTime<Utc>, value: Decimal) -> ChartResult<Self> {
        Ok(Self::new(
            DomainTime::from_datetime(time),
            decimal_to_f64(value, "value")?,
        ))
    }

    #[must_use]
    pub fn with_style(mut self, style: StyleOverrides) -> Self {
        self.style = style;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomItem {
    pub time: DomainTime,
    pub payload: Value,
    #[serde(default)]
    pub custom_values: Option<Value>,
}

impl CustomItem {
    #[must_use]
    pub fn new(time: impl Into<DomainTime>, payload: Value) -> Self {
        Self {
            time: time.into(),
            payload,
            custom_values: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhitespaceItem {
    pub time: DomainTime,
    #[serde(default)]
    pub custom_values: Option<Value>,
}

impl WhitespaceItem {
    #[must_use]
    pub fn new(time: impl Into<DomainTime>) -> Self {
        Self {
            time: time.into(),
            custom_values: None,
        }
    }
}

/// Host-supplied data item, tagged by value shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum RawItem {
    Ohlc(OhlcItem),
    Value(ValueItem),
    Custom(CustomItem),
    Whitespace(WhitespaceItem),
}

impl RawItem {
    #[must_use]
    pub fn time(&self) -> DomainTime {
        match self {
            Self::Ohlc(item) => item.time,
            Self::Value(item) => item.time,
            Self::Custom(item) => item.time,
            Self::Whitespace(item) => item.time,
        }
    }

    #[must_use]
    pub fn custom_values(&self) -> Option<&Value> {
        match self {
            Self::Ohlc(item) => item.custom_values.as_ref(),
            Self::Value(item) => item.custom_values.as_ref(),
            Self::Custom(item) => item.custom_values.as_ref(),
            Self::Whitespace(item) => item.custom_values.as_ref(),
        }
    }

    #[must_use]
    pub fn shape_name(&self) -> &'static str {
        match self {
            Self::Ohlc(_) => "ohlc",
            Self::Value(_) => "value",
            Self::Custom(_) => "custom",
            Self::Whitespace(_) => "whitespace",
        }
    }
}

impl From<OhlcItem> for RawItem {
    fn from(item: OhlcItem) -> Self {
        Self::Ohlc(item)
    }
}

impl From<ValueItem> for RawItem {
    fn from(item: ValueItem) -> Self {
        Self::Value(item)
    }
}

impl From<CustomItem> for RawItem {
    fn from(item: CustomItem) -> Self {
        Self::Custom(item)
    }
}

impl From<WhitespaceItem> for RawItem {
    fn from(item: WhitespaceItem) -> Self {
        Self::Whitespace(item)
    }
}
