use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::core::{
    DEFAULT_CHUNK_SIZE, HorzScaleBehavior, LogicalIndex, PlotList, PlotRow, RawItem, SeriesId,
    SeriesKind, TickMarkWeight, TimeHorzScaleBehavior, TimeKey, TimePoint, create_row,
};
use crate::error::{ChartError, ChartResult};

use super::{DataUpdateResponse, SeriesChanges, SeriesUpdateInfo, TimeScaleChanges};

/// One entry of the shared timeline together with the series holding a row there.
///
/// Series rows live in their [`PlotList`]; the point only records the row
/// position inside that list.
#[derive(Debug, Clone, PartialEq)]
pub struct PointData {
    time_point: TimePoint,
    by_series: SmallVec<[(SeriesId, usize); 4]>,
}

impl PointData {
    fn new(time_point: TimePoint) -> Self {
        Self {
            time_point,
            by_series: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn time_point(&self) -> &TimePoint {
        &self.time_point
    }

    /// Position of `series`' row at this point inside its plot list.
    #[must_use]
    pub fn series_row(&self, series: SeriesId) -> Option<usize> {
        self.by_series
            .iter()
            .find(|(id, _)| *id == series)
            .map(|(_, position)| *position)
    }

    pub fn series(&self) -> impl Iterator<Item = SeriesId> + '_ {
        self.by_series.iter().map(|(id, _)| *id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_series.is_empty()
    }

    fn remove_series(&mut self, series: SeriesId) {
        self.by_series.retain(|(id, _)| *id != series);
    }
}

#[derive(Debug)]
struct SeriesEntry {
    kind: SeriesKind,
    plot_list: PlotList,
    /// Key of the last item, whitespace included.
    last_time: Option<TimeKey>,
}

/// Merges every series onto one strictly ordered timeline.
///
/// Owns the sorted time points and the per-series plot lists and keeps row
/// indices equal to timeline positions across full replacements and realtime
/// updates. Mutations are single-writer and run to completion.
#[derive(Debug)]
pub struct DataLayer<H: HorzScaleBehavior = TimeHorzScaleBehavior> {
    horz_scale: H,
    chunk_size: usize,
    series: IndexMap<SeriesId, SeriesEntry>,
    points: Vec<PointData>,
    next_series_id: u32,
}

impl Default for DataLayer<TimeHorzScaleBehavior> {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLayer<TimeHorzScaleBehavior> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_horz_scale(TimeHorzScaleBehavior)
    }
}

impl<H: HorzScaleBehavior> DataLayer<H> {
    #[must_use]
    pub fn with_horz_scale(horz_scale: H) -> Self {
        Self {
            horz_scale,
            chunk_size: DEFAULT_CHUNK_SIZE,
            series: IndexMap::new(),
            points: Vec::new(),
            next_series_id: 0,
        }
    }

    /// Sets the min/max cache chunk size used by plot lists of series added later.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    #[must_use]
    pub fn horz_scale(&self) -> &H {
        &self.horz_scale
    }

    /// Registers a new series without data.
    pub fn add_series(&mut self, kind: SeriesKind) -> SeriesId {
        let id = SeriesId::new(self.next_series_id);
        self.next_series_id += 1;
        debug!(series = %id, kind = kind.name(), "add series");
        self.series.insert(
            id,
            SeriesEntry {
                kind,
                plot_list: PlotList::with_chunk_size(self.chunk_size),
                last_time: None,
            },
        );
        id
    }

    #[must_use]
    pub fn series_kind(&self, series: SeriesId) -> Option<&SeriesKind> {
        self.series.get(&series).map(|entry| &entry.kind)
    }

    pub fn series_ids(&self) -> impl Iterator<Item = SeriesId> + '_ {
        self.series.keys().copied()
    }

    #[must_use]
    pub fn plot_list(&self, series: SeriesId) -> Option<&PlotList> {
        self.series.get(&series).map(|entry| &entry.plot_list)
    }

    #[must_use]
    pub fn series_last_time(&self, series: SeriesId) -> Option<TimeKey> {
        self.series.get(&series).and_then(|entry| entry.last_time)
    }

    #[must_use]
    pub fn points(&self) -> &[PointData] {
        &self.points
    }

    pub fn time_points(&self) -> impl Iterator<Item = &TimePoint> + '_ {
        self.points.iter().map(|point| &point.time_point)
    }

    #[must_use]
    pub fn point_at(&self, index: LogicalIndex) -> Option<&PointData> {
        usize::try_from(index)
            .ok()
            .and_then(|position| self.points.get(position))
    }

    /// Resolves a key to its logical index.
    ///
    /// With `find_nearest`, a missing key resolves to the first point right of
    /// it, or to the last point when the key lies beyond the timeline.
    #[must_use]
    pub fn time_to_index(&self, key: TimeKey, find_nearest: bool) -> Option<LogicalIndex> {
        let last = self.points.last()?;
        if key > last.time_point.key {
            return find_nearest.then_some(last.time_point.index);
        }
        match self.position_of(key) {
            Ok(position) => Some(position as LogicalIndex),
            Err(position) => find_nearest.then_some(position as LogicalIndex),
        }
    }

    /// Highest last-row index over series holding data.
    #[must_use]
    pub fn base_index(&self) -> Option<LogicalIndex> {
        self.series
            .values()
            .filter_map(|entry| entry.plot_list.last_index())
            .max()
    }

    /// Drops every row and time point; registered series stay registered.
    pub fn clear(&mut self) {
        self.points.clear();
        for entry in self.series.values_mut() {
            entry.plot_list.set_data(Vec::new());
            entry.last_time = None;
        }
        debug!("cleared data layer");
    }

    /// Replaces all data of one series.
    ///
    /// Items are stable-sorted by key; for duplicate keys the last item wins.
    pub fn set_series_data(
        &mut self,
        series: SeriesId,
        items: Vec<RawItem>,
    ) -> ChartResult<DataUpdateResponse> {
        let kind = self
            .series
            .get(&series)
            .ok_or(ChartError::UnknownSeries(series))?
            .kind
            .clone();
        let original_count = items.len();
        let keyed = canonicalize_items(&self.horz_scale, items);

        let old_timeline: Vec<(TimeKey, TickMarkWeight)> = self
            .points
            .iter()
            .map(|point| (point.time_point.key, point.time_point.weight))
            .collect();

        let only_series = self
            .series
            .iter()
            .all(|(id, entry)| *id == series || entry.plot_list.is_empty());
        if only_series {
            // Every point belongs to this series: rebuilding from scratch is equivalent.
            self.points.clear();
        } else if let Some(entry) = self.series.get(&series) {
            for row in entry.plot_list.rows() {
                if let Some(point) = usize::try_from(row.index)
                    .ok()
                    .and_then(|position| self.points.get_mut(position))
                {
                    point.remove_series(series);
                }
            }
        }

        let mut row_positions = Vec::with_capacity(keyed.len());
        let mut merged = Vec::with_capacity(self.points.len() + keyed.len());
        let mut old_points = std::mem::take(&mut self.points)
            .into_iter()
            .filter(|point| !point.is_empty())
            .peekable();
        for (row_position, (key, item)) in keyed.iter().enumerate() {
            while let Some(point) = old_points.next_if(|point| point.time_point.key < *key) {
                merged.push(point);
            }
            let mut point = old_points
                .next_if(|point| point.time_point.key == *key)
                .unwrap_or_else(|| PointData::new(TimePoint::new(*key, item.time())));
            point.by_series.push((series, row_position));
            row_positions.push(merged.len());
            merged.push(point);
        }
        merged.extend(old_points);
        self.points = merged;

        let first_changed = first_changed_position(&old_timeline, &self.points);
        let stable_len = first_changed.unwrap_or(self.points.len());
        for (position, (point, (_, weight))) in self.points[..stable_len]
            .iter_mut()
            .zip(&old_timeline)
            .enumerate()
        {
            point.time_point.index = position as LogicalIndex;
            point.time_point.weight = *weight;
        }
        if let Some(first) = first_changed {
            self.apply_timeline_change(first, series);
        }

        let rows: Vec<PlotRow> = keyed
            .into_iter()
            .zip(row_positions)
            .map(|((key, item), position)| {
                let original_time = item.time();
                create_row(&kind, key, position as LogicalIndex, item, original_time)
            })
            .collect();
        let canonical_count = rows.len();
        if let Some(entry) = self.series.get_mut(&series) {
            entry.last_time = rows.last().map(|row| row.time);
            entry.plot_list.set_data(rows);
        }

        debug!(
            series = %series,
            original_count,
            canonical_count,
            timeline_len = self.points.len(),
            first_changed_point_index = ?first_changed,
            "set series data"
        );
        Ok(self.update_response(series, first_changed, None))
    }

    /// Appends or amends exactly one item of a series.
    ///
    /// Items older than the series' last item are rejected with
    /// [`ChartError::OutOfOrderUpdate`] and leave the layer unchanged.
    pub fn update_series_data(
        &mut self,
        series: SeriesId,
        item: RawItem,
    ) -> ChartResult<DataUpdateResponse> {
        self.update_series_item(series, item, false)
    }

    /// Like [`Self::update_series_data`] but also accepts items older than the
    /// series' last item, amending or inserting them in place.
    pub fn update_series_data_historical(
        &mut self,
        series: SeriesId,
        item: RawItem,
    ) -> ChartResult<DataUpdateResponse> {
        self.update_series_item(series, item, true)
    }

    /// Removes all data of a series; equivalent to setting an empty data set.
    pub fn remove_series(&mut self, series: SeriesId) -> ChartResult<DataUpdateResponse> {
        self.set_series_data(series, Vec::new())
    }

    fn update_series_item(
        &mut self,
        series: SeriesId,
        item: RawItem,
        historical: bool,
    ) -> ChartResult<DataUpdateResponse> {
        let entry = self
            .series
            .get(&series)
            .ok_or(ChartError::UnknownSeries(series))?;
        let original_time = item.time();
        let key = self.horz_scale.key(original_time);
        if !historical
            && let Some(last_time) = entry.last_time
            && key < last_time
        {
            return Err(ChartError::OutOfOrderUpdate {
                series,
                time: key,
                last_time,
            });
        }
        let kind = entry.kind.clone();
        let row_count = entry.plot_list.size();
        let existing_row = entry
            .plot_list
            .rows()
            .binary_search_by_key(&key, |row| row.time);
        let info = Some(SeriesUpdateInfo {
            last_bar_updated_or_new_bars_added_to_the_right: match existing_row {
                Ok(position) => position + 1 == row_count,
                Err(position) => position == row_count,
            },
        });

        let row_position = match existing_row {
            Ok(row_position) => {
                let index = entry.plot_list.rows()[row_position].index;
                let row = create_row(&kind, key, index, item, original_time);
                if let Some(entry) = self.series.get_mut(&series) {
                    entry.plot_list.replace_at(row_position, row);
                }
                trace!(series = %series, index, "update amended row");
                return Ok(self.update_response(series, None, info));
            }
            Err(row_position) => row_position,
        };

        let (position, first_changed) = match self.position_of(key) {
            Ok(position) => (position, None),
            Err(position) => {
                self.insert_point(position, TimePoint::new(key, original_time));
                (position, Some(position))
            }
        };
        if row_position < row_count {
            // Later rows of this series move one slot right inside its plot list.
            for point in &mut self.points[position + 1..] {
                for (id, row) in &mut point.by_series {
                    if *id == series {
                        *row += 1;
                    }
                }
            }
        }
        self.points[position]
            .by_series
            .push((series, row_position));

        let row = create_row(&kind, key, position as LogicalIndex, item, original_time);
        if let Some(entry) = self.series.get_mut(&series) {
            entry.plot_list.insert_at(row_position, row);
            entry.last_time = entry.last_time.max(Some(key));
        }

        trace!(
            series = %series,
            index = position,
            timeline_len = self.points.len(),
            first_changed_point_index = ?first_changed,
            "update inserted row"
        );
        Ok(self.update_response(series, first_changed, info))
    }

    /// Inserts a new time point at `position`, shifting every later point and
    /// series row one index right.
    fn insert_point(&mut self, position: usize, time_point: TimePoint) {
        self.points.insert(position, PointData::new(time_point));
        for (offset, point) in self.points[position..].iter_mut().enumerate() {
            point.time_point.index = (position + offset) as LogicalIndex;
        }
        for entry in self.series.values_mut() {
            entry
                .plot_list
                .shift_indices_from(position as LogicalIndex, 1);
        }
        self.refresh_weights(position);
    }

    /// Recomputes tick-mark weights of points from `start` on.
    fn refresh_weights(&mut self, start: usize) {
        let mut time_points: Vec<TimePoint> = self.time_points().copied().collect();
        self.horz_scale.fill_weights(&mut time_points, start);
        for (point, time_point) in self.points.iter_mut().zip(time_points).skip(start) {
            point.time_point.weight = time_point.weight;
        }
    }

    fn position_of(&self, key: TimeKey) -> Result<usize, usize> {
        self.points
            .binary_search_by_key(&key, |point| point.time_point.key)
    }

    /// Re-indexes points from `first` on, refreshes their weights and moves
    /// the rows of every series other than `updated` to the new indices.
    fn apply_timeline_change(&mut self, first: usize, updated: SeriesId) {
        for (offset, point) in self.points[first..].iter_mut().enumerate() {
            point.time_point.index = (first + offset) as LogicalIndex;
        }
        self.refresh_weights(first);

        let points = &self.points;
        let first = first as LogicalIndex;
        for (_, entry) in self.series.iter_mut().filter(|(id, _)| **id != updated) {
            entry.plot_list.reindex(|row| {
                if row.index < first {
                    return row.index;
                }
                let position = points.binary_search_by_key(&row.time, |point| point.time_point.key);
                debug_assert!(position.is_ok(), "series row without time point");
                position.map_or(row.index, |position| position as LogicalIndex)
            });
        }
    }

    fn update_response(
        &self,
        updated: SeriesId,
        first_changed: Option<usize>,
        info: Option<SeriesUpdateInfo>,
    ) -> DataUpdateResponse {
        let changes = |id: SeriesId, entry: &SeriesEntry| SeriesChanges {
            row_count: entry.plot_list.size(),
            info: if id == updated { info } else { None },
        };

        let mut series = IndexMap::new();
        if first_changed.is_some() {
            for (id, entry) in &self.series {
                if *id == updated || !entry.plot_list.is_empty() {
                    series.insert(*id, changes(*id, entry));
                }
            }
        } else if let Some(entry) = self.series.get(&updated) {
            series.insert(updated, changes(updated, entry));
        }

        DataUpdateResponse {
            series,
            time_scale: TimeScaleChanges {
                base_index: self.base_index(),
                first_changed_point_index: first_changed,
                points: first_changed.map(|_| self.time_points().copied().collect()),
            },
        }
    }
}

/// Keys every item and restores strictly increasing key order.
fn canonicalize_items<H: HorzScaleBehavior>(
    horz_scale: &H,
    items: Vec<RawItem>,
) -> Vec<(TimeKey, RawItem)> {
    let mut keyed: Vec<(TimeKey, RawItem)> = items
        .into_iter()
        .map(|item| (horz_scale.key(item.time()), item))
        .collect();
    if keyed.windows(2).all(|pair| pair[0].0 < pair[1].0) {
        return keyed;
    }

    let original_count = keyed.len();
    keyed.sort_by_key(|(key, _)| *key);
    let mut deduped: Vec<(TimeKey, RawItem)> = Vec::with_capacity(keyed.len());
    let mut duplicate_count = 0_usize;
    for entry in keyed {
        if let Some(last) = deduped.last_mut()
            && last.0 == entry.0
        {
            *last = entry;
            duplicate_count += 1;
            continue;
        }
        deduped.push(entry);
    }
    warn!(
        original_count,
        duplicate_count,
        canonical_count = deduped.len(),
        "canonicalized unsorted series items on set_series_data"
    );
    deduped
}

/// First position where the key sequences differ, or the shorter length when
/// one is a strict prefix of the other.
fn first_changed_position(old: &[(TimeKey, TickMarkWeight)], new: &[PointData]) -> Option<usize> {
    old.iter()
        .zip(new)
        .position(|((key, _), point)| *key != point.time_point.key)
        .or_else(|| (old.len() != new.len()).then(|| old.len().min(new.len())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ValueItem, WhitespaceItem};

    fn keys(items: &[(TimeKey, RawItem)]) -> Vec<f64> {
        items.iter().map(|(key, _)| key.raw()).collect()
    }

    #[test]
    fn canonicalize_sorts_and_keeps_last_duplicate() {
        let items = vec![
            ValueItem::new(3, 1.0).into(),
            ValueItem::new(1, 2.0).into(),
            ValueItem::new(3, 9.0).into(),
            WhitespaceItem::new(2).into(),
        ];
        let keyed = canonicalize_items(&TimeHorzScaleBehavior, items);
        assert_eq!(keys(&keyed), vec![1.0, 2.0, 3.0]);
        match &keyed[2].1 {
            RawItem::Value(item) => assert_eq!(item.value, 9.0),
            other => panic!("unexpected item {other:?}"),
        }
    }

    #[test]
    fn first_changed_position_handles_prefixes() {
        let point = |raw: i64| PointData::new(TimePoint::new(TimeKey::from(raw), raw.into()));
        let old = |raws: &[i64]| -> Vec<(TimeKey, TickMarkWeight)> {
            raws.iter()
                .map(|raw| (TimeKey::from(*raw), TickMarkWeight::default()))
                .collect()
        };

        let new = vec![point(1), point(2), point(3)];
        assert_eq!(first_changed_position(&old(&[1, 2, 3]), &new), None);
        assert_eq!(first_changed_position(&old(&[1, 2]), &new), Some(2));
        assert_eq!(first_changed_position(&old(&[1, 2, 3, 4]), &new), Some(3));
        assert_eq!(first_changed_position(&old(&[1, 5, 3]), &new), Some(1));
        assert_eq!(first_changed_position(&[], &[]), None);
    }
}
