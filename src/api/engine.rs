use crate::core::{
    HorzScaleBehavior, LogicalIndex, MinMax, PlotList, PlotRowValueIndex, SeriesId, SeriesKind,
    TimeHorzScaleBehavior,
};
use crate::error::{ChartError, ChartResult};
use crate::lwc::model::DataLayer;

use super::ChartDataConfig;

/// Host-facing facade over the data layer.
///
/// `ChartData` applies the configured item validation, logs every mutation
/// and exposes read access for rendering and autoscale passes.
#[derive(Debug)]
pub struct ChartData<H: HorzScaleBehavior = TimeHorzScaleBehavior> {
    pub(super) config: ChartDataConfig,
    pub(super) data_layer: DataLayer<H>,
}

impl ChartData<TimeHorzScaleBehavior> {
    /// Creates a facade with calendar time behavior.
    pub fn new(config: ChartDataConfig) -> ChartResult<Self> {
        Self::with_horz_scale(config, TimeHorzScaleBehavior)
    }
}

impl<H: HorzScaleBehavior> ChartData<H> {
    pub fn with_horz_scale(config: ChartDataConfig, horz_scale: H) -> ChartResult<Self> {
        let config = config.validate()?;
        Ok(Self {
            config,
            data_layer: DataLayer::with_horz_scale(horz_scale).with_chunk_size(config.chunk_size),
        })
    }

    #[must_use]
    pub fn config(&self) -> ChartDataConfig {
        self.config
    }

    #[must_use]
    pub fn data_layer(&self) -> &DataLayer<H> {
        &self.data_layer
    }

    pub fn add_series(&mut self, kind: SeriesKind) -> SeriesId {
        self.data_layer.add_series(kind)
    }

    #[must_use]
    pub fn plot_list(&self, series: SeriesId) -> Option<&PlotList> {
        self.data_layer.plot_list(series)
    }

    /// Autoscale range of one series over `[start, end]`.
    ///
    /// OHLC series use their high/low channels, every other kind its close.
    pub fn series_value_range(
        &self,
        series: SeriesId,
        start: LogicalIndex,
        end: LogicalIndex,
    ) -> ChartResult<Option<MinMax>> {
        let kind = self
            .data_layer
            .series_kind(series)
            .ok_or(ChartError::UnknownSeries(series))?;
        let channels: &[PlotRowValueIndex] = if kind.is_ohlc() {
            &[PlotRowValueIndex::High, PlotRowValueIndex::Low]
        } else {
            &[PlotRowValueIndex::Close]
        };
        Ok(self
            .data_layer
            .plot_list(series)
            .and_then(|plot_list| plot_list.min_max_on_range(start, end, channels)))
    }

    /// Merged autoscale range of every series over `[start, end]`.
    #[must_use]
    pub fn value_range(&self, start: LogicalIndex, end: LogicalIndex) -> Option<MinMax> {
        self.data_layer
            .series_ids()
            .filter_map(|series| self.series_value_range(series, start, end).ok().flatten())
            .reduce(MinMax::merge)
    }
}
