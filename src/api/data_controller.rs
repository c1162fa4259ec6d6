use tracing::{debug, trace, warn};

use crate::core::{HorzScaleBehavior, RawItem, SeriesId};
use crate::error::{ChartError, ChartResult};
use crate::lwc::model::DataUpdateResponse;

use super::validation::{validate_item, validate_items_order};
use super::{ChartData, ItemValidationMode};

impl<H: HorzScaleBehavior> ChartData<H> {
    /// Replaces all data of a series.
    pub fn set_series_data(
        &mut self,
        series: SeriesId,
        items: Vec<RawItem>,
    ) -> ChartResult<DataUpdateResponse> {
        self.check_items(series, &items, true)?;
        let response = self.data_layer.set_series_data(series, items)?;
        debug!(
            series = %series,
            timeline_changed = response.time_scale.timeline_changed(),
            affected_series = response.series.len(),
            "set series data"
        );
        Ok(response)
    }

    /// Updates a series using realtime-update semantics:
    /// - appends when the item is newer than the latest item
    /// - replaces the latest item when times are equal
    /// - rejects out-of-order updates (item older than the latest item)
    pub fn update_series_data(
        &mut self,
        series: SeriesId,
        item: RawItem,
    ) -> ChartResult<DataUpdateResponse> {
        self.check_items(series, std::slice::from_ref(&item), false)?;
        let response = self
            .data_layer
            .update_series_data(series, item)
            .inspect_err(|err| warn!(series = %series, error = %err, "rejected series update"))?;
        trace!(
            series = %series,
            timeline_changed = response.time_scale.timeline_changed(),
            "update series data"
        );
        Ok(response)
    }

    /// Updates a series item at any time, amending or inserting history.
    pub fn update_series_data_historical(
        &mut self,
        series: SeriesId,
        item: RawItem,
    ) -> ChartResult<DataUpdateResponse> {
        self.check_items(series, std::slice::from_ref(&item), false)?;
        let response = self.data_layer.update_series_data_historical(series, item)?;
        trace!(
            series = %series,
            timeline_changed = response.time_scale.timeline_changed(),
            "historical series update"
        );
        Ok(response)
    }

    pub fn remove_series(&mut self, series: SeriesId) -> ChartResult<DataUpdateResponse> {
        let response = self.data_layer.remove_series(series)?;
        debug!(series = %series, "removed series data");
        Ok(response)
    }

    fn check_items(&self, series: SeriesId, items: &[RawItem], ordered: bool) -> ChartResult<()> {
        let mode = self.config.item_validation;
        if mode == ItemValidationMode::Off {
            return Ok(());
        }
        let kind = self
            .data_layer
            .series_kind(series)
            .ok_or(ChartError::UnknownSeries(series))?;

        let mut result = items.iter().try_for_each(|item| validate_item(kind, item));
        if ordered && result.is_ok() {
            result = validate_items_order(self.data_layer.horz_scale(), items);
        }
        match (mode, result) {
            (ItemValidationMode::Strict, Err(err)) => Err(err),
            (_, Err(err)) => {
                warn!(series = %series, error = %err, "malformed series data");
                Ok(())
            }
            (_, Ok(())) => Ok(()),
        }
    }
}
