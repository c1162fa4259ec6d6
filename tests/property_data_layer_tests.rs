mod support;

use std::collections::{BTreeMap, BTreeSet};

use chart_timeline::ChartError;
use chart_timeline::core::{RawItem, SeriesId, SeriesKind, TimeKey, ValueItem};
use chart_timeline::lwc::model::{DataLayer, DataUpdateResponse};
use proptest::prelude::*;
use support::{assert_layer_invariants, raw_keys};

const SERIES_COUNT: usize = 3;

#[derive(Debug, Clone)]
enum Operation {
    Set { series: usize, items: Vec<(i64, f64)> },
    Update { series: usize, time: i64, value: f64 },
    Historical { series: usize, time: i64, value: f64 },
    Remove { series: usize },
}

fn operation() -> impl Strategy<Value = Operation> {
    let series = 0..SERIES_COUNT;
    prop_oneof![
        3 => (series.clone(), prop::collection::vec((0i64..60, -100.0f64..100.0), 0..25))
            .prop_map(|(series, items)| Operation::Set { series, items }),
        4 => (series.clone(), 0i64..70, -100.0f64..100.0)
            .prop_map(|(series, time, value)| Operation::Update { series, time, value }),
        2 => (series.clone(), 0i64..70, -100.0f64..100.0)
            .prop_map(|(series, time, value)| Operation::Historical { series, time, value }),
        1 => series.prop_map(|series| Operation::Remove { series }),
    ]
}

/// Straightforward per-series maps the layer must agree with.
#[derive(Default)]
struct Model {
    series: Vec<BTreeMap<i64, f64>>,
}

impl Model {
    fn timeline(&self) -> Vec<f64> {
        let keys: BTreeSet<i64> = self.series.iter().flat_map(|rows| rows.keys().copied()).collect();
        keys.into_iter().map(|key| key as f64).collect()
    }
}

fn value_items(items: &[(i64, f64)]) -> Vec<RawItem> {
    items
        .iter()
        .map(|(time, value)| ValueItem::new(*time, *value).into())
        .collect()
}

fn expected_first_change(old: &[f64], new: &[f64]) -> Option<usize> {
    old.iter()
        .zip(new)
        .position(|(old, new)| old != new)
        .or_else(|| (old.len() != new.len()).then(|| old.len().min(new.len())))
}

fn assert_response(
    response: &DataUpdateResponse,
    old_keys: &[f64],
    new_keys: &[f64],
    updated: SeriesId,
) -> Result<(), TestCaseError> {
    let expected = expected_first_change(old_keys, new_keys);
    prop_assert_eq!(response.time_scale.first_changed_point_index, expected);
    prop_assert_eq!(response.time_scale.points.is_some(), expected.is_some());
    if let Some(points) = &response.time_scale.points {
        let keys: Vec<f64> = points.iter().map(|point| point.key.raw()).collect();
        prop_assert_eq!(keys.as_slice(), new_keys);
    }
    prop_assert!(response.series.contains_key(&updated));
    Ok(())
}

proptest! {
    #[test]
    fn random_operations_keep_layer_consistent(
        operations in prop::collection::vec(operation(), 1..40)
    ) {
        let mut layer = DataLayer::new();
        let ids: Vec<SeriesId> = (0..SERIES_COUNT)
            .map(|_| layer.add_series(SeriesKind::Line))
            .collect();
        let mut model = Model {
            series: vec![BTreeMap::new(); SERIES_COUNT],
        };

        for operation in operations {
            let old_keys = raw_keys(&layer);
            match operation {
                Operation::Set { series, items } => {
                    let response = layer
                        .set_series_data(ids[series], value_items(&items))
                        .expect("set data");
                    model.series[series] = items.iter().copied().collect();
                    assert_response(&response, &old_keys, &model.timeline(), ids[series])?;
                }
                Operation::Update { series, time, value } => {
                    let last = model.series[series].keys().next_back().copied();
                    let result = layer.update_series_data(ids[series], ValueItem::new(time, value).into());
                    if last.is_some_and(|last| time < last) {
                        let rejected = matches!(result, Err(ChartError::OutOfOrderUpdate { .. }));
                        prop_assert!(rejected);
                        prop_assert_eq!(raw_keys(&layer), old_keys);
                    } else {
                        let response = result.expect("in-order update");
                        model.series[series].insert(time, value);
                        assert_response(&response, &old_keys, &model.timeline(), ids[series])?;
                    }
                }
                Operation::Historical { series, time, value } => {
                    let response = layer
                        .update_series_data_historical(ids[series], ValueItem::new(time, value).into())
                        .expect("historical update");
                    model.series[series].insert(time, value);
                    assert_response(&response, &old_keys, &model.timeline(), ids[series])?;
                }
                Operation::Remove { series } => {
                    let response = layer.remove_series(ids[series]).expect("remove series");
                    model.series[series].clear();
                    assert_response(&response, &old_keys, &model.timeline(), ids[series])?;
                }
            }

            assert_layer_invariants(&layer);
            prop_assert_eq!(raw_keys(&layer), model.timeline());
            for (position, id) in ids.iter().enumerate() {
                let rows = layer.plot_list(*id).expect("registered").rows();
                let stored: Vec<(f64, Option<f64>)> = rows
                    .iter()
                    .map(|row| (row.time.raw(), row.close()))
                    .collect();
                let expected: Vec<(f64, Option<f64>)> = model.series[position]
                    .iter()
                    .map(|(time, value)| (*time as f64, Some(*value)))
                    .collect();
                prop_assert_eq!(stored, expected);
            }
        }
    }

    #[test]
    fn setting_identical_data_twice_changes_nothing(
        items in prop::collection::vec((0i64..200, -100.0f64..100.0), 1..40),
        other in prop::collection::vec((0i64..200, -100.0f64..100.0), 0..40)
    ) {
        let mut layer = DataLayer::new();
        let a = layer.add_series(SeriesKind::Line);
        let b = layer.add_series(SeriesKind::Line);
        layer.set_series_data(b, value_items(&other)).expect("set b");
        layer.set_series_data(a, value_items(&items)).expect("set a");
        let points_before: Vec<_> = layer.time_points().copied().collect();

        let response = layer.set_series_data(a, value_items(&items)).expect("set a again");

        prop_assert_eq!(response.time_scale.first_changed_point_index, None);
        prop_assert!(response.time_scale.points.is_none());
        prop_assert_eq!(response.series.len(), 1);
        let points_after: Vec<_> = layer.time_points().copied().collect();
        prop_assert_eq!(points_before, points_after);
        assert_layer_invariants(&layer);
    }

    #[test]
    fn rejected_updates_leave_series_untouched(
        times in prop::collection::btree_set(10i64..500, 2..30),
        probe in 0i64..500
    ) {
        let mut layer = DataLayer::new();
        let a = layer.add_series(SeriesKind::Line);
        let items: Vec<(i64, f64)> = times.iter().map(|time| (*time, *time as f64)).collect();
        layer.set_series_data(a, value_items(&items)).expect("set data");
        let last = *times.iter().next_back().expect("non-empty set");
        prop_assume!(probe < last);
        let rows_before = layer.plot_list(a).expect("registered").rows().to_vec();

        let result = layer.update_series_data(a, ValueItem::new(probe, -1.0).into());

        let rejected = matches!(result, Err(ChartError::OutOfOrderUpdate { .. }));
        prop_assert!(rejected);
        prop_assert_eq!(layer.plot_list(a).expect("registered").rows(), rows_before.as_slice());
        prop_assert_eq!(layer.series_last_time(a), Some(TimeKey::from(last)));
    }
}
