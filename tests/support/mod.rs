#![allow(dead_code)]

use chart_timeline::core::{HorzScaleBehavior, LogicalIndex, TimeKey};
use chart_timeline::lwc::model::DataLayer;

/// Asserts every structural invariant of the data layer.
pub fn assert_layer_invariants<H: HorzScaleBehavior>(layer: &DataLayer<H>) {
    let points = layer.points();
    for pair in points.windows(2) {
        assert!(
            pair[0].time_point().key < pair[1].time_point().key,
            "timeline must be strictly increasing"
        );
    }
    for (position, point) in points.iter().enumerate() {
        assert_eq!(point.time_point().index, position as LogicalIndex);
        assert!(!point.is_empty(), "empty time point at {position}");
    }

    for series in layer.series_ids() {
        let plot_list = layer.plot_list(series).expect("registered series");
        let rows = plot_list.rows();
        for pair in rows.windows(2) {
            assert!(pair[0].index < pair[1].index, "plot rows must be ordered");
        }
        for (position, row) in rows.iter().enumerate() {
            let point = layer.point_at(row.index).expect("row index inside timeline");
            assert_eq!(point.time_point().key, row.time, "row key must match point key");
            assert_eq!(point.series_row(series), Some(position));
        }
        let referencing = points
            .iter()
            .filter(|point| point.series_row(series).is_some())
            .count();
        assert_eq!(referencing, rows.len(), "points and plot list disagree");
    }
}

pub fn timeline_keys<H: HorzScaleBehavior>(layer: &DataLayer<H>) -> Vec<TimeKey> {
    layer.time_points().map(|point| point.key).collect()
}

pub fn raw_keys<H: HorzScaleBehavior>(layer: &DataLayer<H>) -> Vec<f64> {
    layer.time_points().map(|point| point.key.raw()).collect()
}
