use serde::{Deserialize, Serialize};

use crate::core::{HorzScaleBehavior, LogicalIndex, PlotRow, SeriesId, TimePoint};

use super::ChartData;

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSnapshot {
    pub id: SeriesId,
    pub kind: String,
    pub rows: Vec<PlotRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataLayerSnapshot {
    pub time_points: Vec<TimePoint>,
    pub base_index: Option<LogicalIndex>,
    pub series: Vec<SeriesSnapshot>,
}

impl<H: HorzScaleBehavior> ChartData<H> {
    #[must_use]
    pub fn snapshot(&self) -> DataLayerSnapshot {
        let layer = &self.data_layer;
        DataLayerSnapshot {
            time_points: layer.time_points().copied().collect(),
            base_index: layer.base_index(),
            series: layer
                .series_ids()
                .map(|id| SeriesSnapshot {
                    id,
                    kind: layer
                        .series_kind(id)
                        .map_or_else(String::new, |kind| kind.name().to_owned()),
                    rows: layer
                        .plot_list(id)
                        .map(|plot_list| plot_list.rows().to_vec())
                        .unwrap_or_default(),
                })
                .collect(),
        }
    }
}
