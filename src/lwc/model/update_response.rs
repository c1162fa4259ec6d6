use indexmap::IndexMap;
use serde::Serialize;

use crate::core::{LogicalIndex, SeriesId, TimePoint};

/// Extra hints attached to realtime updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesUpdateInfo {
    /// The update amended the last bar or appended bars on the right edge.
    pub last_bar_updated_or_new_bars_added_to_the_right: bool,
}

/// Per-series part of a [`DataUpdateResponse`].
///
/// Rows themselves stay in the series' plot list; consumers read them from
/// [`crate::lwc::model::DataLayer::plot_list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesChanges {
    pub row_count: usize,
    pub info: Option<SeriesUpdateInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeScaleChanges {
    /// Highest last-row index across series holding data.
    pub base_index: Option<LogicalIndex>,
    /// First timeline position whose key differs from the previous timeline.
    /// `None` means the key sequence is unchanged.
    pub first_changed_point_index: Option<usize>,
    /// Full timeline snapshot, present exactly when the timeline changed.
    pub points: Option<Vec<TimePoint>>,
}

impl TimeScaleChanges {
    #[must_use]
    pub fn timeline_changed(&self) -> bool {
        self.first_changed_point_index.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataUpdateResponse {
    pub series: IndexMap<SeriesId, SeriesChanges>,
    pub time_scale: TimeScaleChanges,
}
