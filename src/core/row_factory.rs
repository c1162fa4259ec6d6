//! Conversion of host items into normalized plot rows.

use crate::core::plot_row::{PlotRow, PlotRowValues};
use crate::core::series_data::{RawItem, SeriesKind, StyleOverrides};
use crate::core::types::{DomainTime, LogicalIndex, TimeKey};

/// Builds the row for one item of a series of the given kind.
///
/// Items without a usable numeric value for `kind` become whitespace rows,
/// keeping their `custom_values`. Shape mismatches are resolved as follows:
/// a value item on an OHLC series repeats the value on all channels, an OHLC
/// item on a single-value series uses its close, and anything else not
/// matching the kind is whitespace.
#[must_use]
pub fn create_row(
    kind: &SeriesKind,
    time: TimeKey,
    index: LogicalIndex,
    item: RawItem,
    original_time: DomainTime,
) -> PlotRow {
    let mut row = PlotRow::whitespace(index, time, original_time);
    match (kind, item) {
        (_, RawItem::Whitespace(item)) => {
            row.custom_values = item.custom_values;
        }
        (SeriesKind::Custom(source), RawItem::Custom(item)) => {
            row.custom_values = item.custom_values;
            if !source.is_whitespace(&item.payload) {
                row.values = custom_row_values(&source.price_values(&item.payload));
                row.custom_data = Some(item.payload);
            }
        }
        (SeriesKind::Custom(_), other) | (_, other @ RawItem::Custom(_)) => {
            row.custom_values = other.custom_values().cloned();
        }
        (kind, RawItem::Ohlc(item)) => {
            row.values = if kind.is_ohlc() {
                ohlc_row_values(item.open, item.high, item.low, item.close)
            } else {
                single_row_values(item.close)
            };
            row.custom_values = item.custom_values;
            row.style = style_or_none(item.style);
        }
        (_, RawItem::Value(item)) => {
            row.values = single_row_values(item.value);
            row.custom_values = item.custom_values;
            row.style = style_or_none(item.style);
        }
    }

    if row.is_whitespace() {
        row.style = None;
    }
    row
}

fn ohlc_row_values(open: f64, high: f64, low: f64, close: f64) -> Option<PlotRowValues> {
    let values = [open, high, low, close];
    values.iter().any(|v| v.is_finite()).then_some(values)
}

fn single_row_values(value: f64) -> Option<PlotRowValues> {
    value.is_finite().then_some([value; 4])
}

/// Folds extracted custom prices into `[last, max, min, last]`.
fn custom_row_values(prices: &[f64]) -> Option<PlotRowValues> {
    let mut finite = prices.iter().copied().filter(|v| v.is_finite());
    let first = finite.next()?;
    let (mut min, mut max, mut last) = (first, first, first);
    for value in finite {
        min = min.min(value);
        max = max.max(value);
        last = value;
    }
    Some([last, max, min, last])
}

fn style_or_none(style: StyleOverrides) -> Option<StyleOverrides> {
    (!style.is_empty()).then_some(style)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_values_fold_last_max_min_last() {
        let values = custom_row_values(&[3.0, 9.0, f64::NAN, 1.0, 4.0]).expect("finite prices");
        assert_eq!(values, [4.0, 9.0, 1.0, 4.0]);
    }

    #[test]
    fn custom_values_without_finite_prices_are_none() {
        assert!(custom_row_values(&[]).is_none());
        assert!(custom_row_values(&[f64::NAN, f64::INFINITY]).is_none());
    }

    #[test]
    fn ohlc_values_need_one_finite_channel() {
        assert!(ohlc_row_values(f64::NAN, f64::NAN, f64::NAN, f64::NAN).is_none());
        assert!(ohlc_row_values(f64::NAN, 2.0, f64::NAN, f64::NAN).is_some());
    }
}
