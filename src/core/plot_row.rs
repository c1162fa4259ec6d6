use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::series_data::StyleOverrides;
use crate::core::types::{DomainTime, LogicalIndex, TimeKey};

/// Channel of the four-value row tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlotRowValueIndex {
    Open = 0,
    High = 1,
    Low = 2,
    Close = 3,
}

impl PlotRowValueIndex {
    pub const ALL: [Self; 4] = [Self::Open, Self::High, Self::Low, Self::Close];

    #[must_use]
    pub const fn position(self) -> usize {
        self as usize
    }

    #[must_use]
    pub(crate) const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Open, high, low, close. Single-value rows repeat the value.
pub type PlotRowValues = [f64; 4];

/// Normalized series row addressed by logical index.
///
/// A row with `values == None` is a whitespace row: it occupies a timeline
/// slot but never contributes to value ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotRow {
    pub index: LogicalIndex,
    pub time: TimeKey,
    pub original_time: DomainTime,
    pub values: Option<PlotRowValues>,
    #[serde(default)]
    pub custom_values: Option<Value>,
    #[serde(default)]
    pub style: Option<StyleOverrides>,
    /// Original payload of custom series rows.
    #[serde(default)]
    pub custom_data: Option<Value>,
}

impl PlotRow {
    #[must_use]
    pub fn whitespace(index: LogicalIndex, time: TimeKey, original_time: DomainTime) -> Self {
        Self {
            index,
            time,
            original_time,
            values: None,
            custom_values: None,
            style: None,
            custom_data: None,
        }
    }

    #[must_use]
    pub fn is_whitespace(&self) -> bool {
        self.values.is_none()
    }

    #[must_use]
    pub fn value(&self, channel: PlotRowValueIndex) -> Option<f64> {
        self.values.map(|values| values[channel.position()])
    }

    #[must_use]
    pub fn close(&self) -> Option<f64> {
        self.value(PlotRowValueIndex::Close)
    }
}
