use chrono::{DateTime, Datelike, Utc};

use crate::core::primitives::unix_seconds_to_datetime;
use crate::core::types::{DomainTime, TickMarkWeight, TimeKey, TimePoint};

/// Horizontal-scale behavior injected into the data layer.
///
/// Converts host time values into ordered keys and ranks timeline points for
/// tick-mark selection.
pub trait HorzScaleBehavior {
    fn key(&self, time: DomainTime) -> TimeKey;

    /// Recomputes `weight` for `points[start_index..]`.
    ///
    /// Points before `start_index` may be read as context but must not be changed.
    fn fill_weights(&self, points: &mut [TimePoint], start_index: usize);
}

/// Calendar time behavior: keys are UTC seconds, weights follow calendar boundaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeHorzScaleBehavior;

const MS_PER_SECOND: f64 = 1_000.0;

const INTRADAY_WEIGHT_DIVISORS: [(f64, TickMarkWeight); 8] = [
    (1_000.0, TickMarkWeight::SECOND),
    (60_000.0, TickMarkWeight::MINUTE1),
    (300_000.0, TickMarkWeight::MINUTE5),
    (1_800_000.0, TickMarkWeight::MINUTE30),
    (3_600_000.0, TickMarkWeight::HOUR1),
    (10_800_000.0, TickMarkWeight::HOUR3),
    (21_600_000.0, TickMarkWeight::HOUR6),
    (43_200_000.0, TickMarkWeight::HOUR12),
];

impl HorzScaleBehavior for TimeHorzScaleBehavior {
    fn key(&self, time: DomainTime) -> TimeKey {
        TimeKey::from(time.unix_seconds())
    }

    fn fill_weights(&self, points: &mut [TimePoint], start_index: usize) {
        if start_index >= points.len() {
            return;
        }

        let mut prev_seconds = start_index
            .checked_sub(1)
            .map(|prev| points[prev].key.raw());
        let mut total_diff = 0.0;
        for point in &mut points[start_index..] {
            let seconds = point.key.raw();
            if let Some(prev) = prev_seconds {
                point.weight = weight_by_time(seconds, prev);
                total_diff += seconds - prev;
            }
            prev_seconds = Some(seconds);
        }

        // The first point has no predecessor: guess one from the average spacing.
        if start_index == 0 && points.len() > 1 {
            let average_diff = (total_diff / (points.len() - 1) as f64).ceil();
            let first = points[0].key.raw();
            points[0].weight = weight_by_time(first, first - average_diff);
        }
    }
}

/// Coarsest calendar boundary crossed between `prev_seconds` and `seconds`.
#[must_use]
pub fn weight_by_time(seconds: f64, prev_seconds: f64) -> TickMarkWeight {
    let (Some(current), Some(prev)) = (
        unix_seconds_to_datetime(seconds),
        unix_seconds_to_datetime(prev_seconds),
    ) else {
        return TickMarkWeight::LESS_THAN_SECOND;
    };

    if let Some(weight) = calendar_weight(current, prev) {
        return weight;
    }

    let current_ms = seconds * MS_PER_SECOND;
    let prev_ms = prev_seconds * MS_PER_SECOND;
    INTRADAY_WEIGHT_DIVISORS
        .iter()
        .rev()
        .find(|(divisor, _)| (prev_ms / divisor).floor() != (current_ms / divisor).floor())
        .map_or(TickMarkWeight::LESS_THAN_SECOND, |(_, weight)| *weight)
}

fn calendar_weight(current: DateTime<Utc>, prev: DateTime<Utc>) -> Option<TickMarkWeight> {
    if current.year() != prev.year() {
        Some(TickMarkWeight::YEAR)
    } else if current.month() != prev.month() {
        Some(TickMarkWeight::MONTH)
    } else if current.day() != prev.day() {
        Some(TickMarkWeight::DAY)
    } else {
        None
    }
}
