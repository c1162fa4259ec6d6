use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::plot_row::{PlotRow, PlotRowValueIndex};
use crate::core::types::LogicalIndex;

/// Rows per min/max cache chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn merge(self, other: MinMax) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    fn include(range: Option<Self>, value: f64) -> Option<Self> {
        if value.is_nan() {
            return range;
        }
        Some(match range {
            Some(range) => range.merge(Self::new(value, value)),
            None => Self::new(value, value),
        })
    }
}

fn merge_min_max(left: Option<MinMax>, right: Option<MinMax>) -> Option<MinMax> {
    match (left, right) {
        (Some(left), Some(right)) => Some(left.merge(right)),
        (left, None) => left,
        (None, right) => right,
    }
}

/// Fallback policy for [`PlotList::search`] when no row sits at the requested index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchMismatch {
    #[default]
    None,
    NearestLeft,
    NearestRight,
}

type ChannelMask = u8;
type ChunkCache = HashMap<i64, Option<MinMax>>;

/// One series' rows ordered by logical index.
///
/// Range queries are served from a lazily filled per-chunk min/max cache.
/// Rows are replaced wholesale through [`PlotList::set_data`]; the data layer
/// additionally amends, inserts or shifts single rows in place during realtime
/// updates, invalidating the affected cache entries.
#[derive(Debug, Clone)]
pub struct PlotList {
    rows: Vec<PlotRow>,
    chunk_size: usize,
    min_max_cache: RefCell<HashMap<ChannelMask, ChunkCache>>,
}

impl Default for PlotList {
    fn default() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }
}

impl PlotList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty list; a zero chunk size is treated as one.
    #[must_use]
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            rows: Vec::new(),
            chunk_size: chunk_size.max(1),
            min_max_cache: RefCell::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Replaces all rows. Rows must be sorted by strictly increasing index.
    pub fn set_data(&mut self, rows: Vec<PlotRow>) {
        debug_assert!(
            rows.windows(2).all(|pair| pair[0].index < pair[1].index),
            "plot rows must be strictly increasing by index"
        );
        self.rows = rows;
        self.min_max_cache.get_mut().clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn first_index(&self) -> Option<LogicalIndex> {
        self.rows.first().map(|row| row.index)
    }

    #[must_use]
    pub fn last_index(&self) -> Option<LogicalIndex> {
        self.rows.last().map(|row| row.index)
    }

    #[must_use]
    pub fn first(&self) -> Option<&PlotRow> {
        self.rows.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&PlotRow> {
        self.rows.last()
    }

    #[must_use]
    pub fn rows(&self) -> &[PlotRow] {
        &self.rows
    }

    #[must_use]
    pub fn contains(&self, index: LogicalIndex) -> bool {
        self.value_at(index).is_some()
    }

    #[must_use]
    pub fn value_at(&self, index: LogicalIndex) -> Option<&PlotRow> {
        self.search(index, SearchMismatch::None)
    }

    /// Binary search for the row at `index`, optionally falling back to the
    /// nearest row strictly left or right of it.
    #[must_use]
    pub fn search(&self, index: LogicalIndex, mismatch: SearchMismatch) -> Option<&PlotRow> {
        match self.rows.binary_search_by_key(&index, |row| row.index) {
            Ok(position) => Some(&self.rows[position]),
            Err(position) => match mismatch {
                SearchMismatch::None => None,
                SearchMismatch::NearestLeft => position
                    .checked_sub(1)
                    .and_then(|left| self.rows.get(left)),
                SearchMismatch::NearestRight => self.rows.get(position),
            },
        }
    }

    /// Min/max over `channels` for rows with index in `[start, end]`.
    ///
    /// Whitespace rows and NaN channel values are skipped. Returns `None` when
    /// no value falls in range.
    #[must_use]
    pub fn min_max_on_range(
        &self,
        start: LogicalIndex,
        end: LogicalIndex,
        channels: &[PlotRowValueIndex],
    ) -> Option<MinMax> {
        let mask = channels.iter().fold(0, |mask, channel| mask | channel.bit());
        if mask == 0 {
            return None;
        }
        let start = start.max(self.first_index()?);
        let end = end.min(self.last_index()?);
        if start > end {
            return None;
        }

        let chunk_size = self.chunk_size as i64;
        let first_full_chunk = start.div_euclid(chunk_size)
            + i64::from(start.rem_euclid(chunk_size) != 0);
        let end_full_chunk = (end + 1).div_euclid(chunk_size);
        if first_full_chunk >= end_full_chunk {
            return self.scan_indices(start, end, mask);
        }

        let mut result = self.scan_indices(start, first_full_chunk * chunk_size - 1, mask);
        for chunk in first_full_chunk..end_full_chunk {
            result = merge_min_max(result, self.chunk_min_max(chunk, mask));
        }
        merge_min_max(result, self.scan_indices(end_full_chunk * chunk_size, end, mask))
    }

    /// Number of memoized chunk entries across all channel sets.
    #[must_use]
    pub fn cached_chunk_count(&self) -> usize {
        self.min_max_cache.borrow().values().map(HashMap::len).sum()
    }

    /// Replaces the row at `position`, keeping its index.
    pub(crate) fn replace_at(&mut self, position: usize, row: PlotRow) {
        let Some(slot) = self.rows.get(position) else {
            return;
        };
        debug_assert_eq!(slot.index, row.index, "replacement must keep the row index");
        self.invalidate_chunk_of(slot.index);
        self.invalidate_chunk_of(row.index);
        self.rows[position] = row;
    }

    /// Inserts a row at `position`; indices of neighbours must bracket `row.index`.
    pub(crate) fn insert_at(&mut self, position: usize, row: PlotRow) {
        debug_assert!(
            position
                .checked_sub(1)
                .and_then(|left| self.rows.get(left))
                .is_none_or(|left| left.index < row.index)
                && self.rows.get(position).is_none_or(|right| row.index < right.index),
            "inserted row must keep index order"
        );
        self.invalidate_chunk_of(row.index);
        self.rows.insert(position.min(self.rows.len()), row);
    }

    /// Adds `delta` to every row index `>= from_index`.
    pub(crate) fn shift_indices_from(&mut self, from_index: LogicalIndex, delta: LogicalIndex) {
        let position = self.lower_bound(from_index);
        if position == self.rows.len() || delta == 0 {
            return;
        }
        for row in &mut self.rows[position..] {
            row.index += delta;
        }
        self.min_max_cache.get_mut().clear();
    }

    /// Rewrites every row index with `index_of`; the mapping must be monotonic.
    pub(crate) fn reindex(&mut self, mut index_of: impl FnMut(&PlotRow) -> LogicalIndex) {
        let mut changed = false;
        for row in &mut self.rows {
            let index = index_of(row);
            changed |= index != row.index;
            row.index = index;
        }
        if changed {
            self.min_max_cache.get_mut().clear();
        }
    }

    fn invalidate_chunk_of(&mut self, index: LogicalIndex) {
        let chunk = index.div_euclid(self.chunk_size as i64);
        for cache in self.min_max_cache.get_mut().values_mut() {
            cache.remove(&chunk);
        }
    }

    fn chunk_min_max(&self, chunk: i64, mask: ChannelMask) -> Option<MinMax> {
        let cached = self
            .min_max_cache
            .borrow()
            .get(&mask)
            .and_then(|cache| cache.get(&chunk).copied());
        if let Some(cached) = cached {
            return cached;
        }

        let chunk_size = self.chunk_size as i64;
        let computed = self.scan_indices(chunk * chunk_size, (chunk + 1) * chunk_size - 1, mask);
        self.min_max_cache
            .borrow_mut()
            .entry(mask)
            .or_default()
            .insert(chunk, computed);
        computed
    }

    fn scan_indices(
        &self,
        start: LogicalIndex,
        end: LogicalIndex,
        mask: ChannelMask,
    ) -> Option<MinMax> {
        if start > end {
            return None;
        }
        let from = self.lower_bound(start);
        let to = self.upper_bound(end);
        let mut result = None;
        for row in &self.rows[from..to.max(from)] {
            let Some(values) = row.values else {
                continue;
            };
            for channel in PlotRowValueIndex::ALL {
                if mask & channel.bit() != 0 {
                    result = MinMax::include(result, values[channel.position()]);
                }
            }
        }
        result
    }

    fn lower_bound(&self, index: LogicalIndex) -> usize {
        self.rows.partition_point(|row| row.index < index)
    }

    fn upper_bound(&self, index: LogicalIndex) -> usize {
        self.rows.partition_point(|row| row.index <= index)
    }
}
