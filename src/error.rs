use thiserror::Error;

use crate::core::{SeriesId, TimeKey};

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error(
        "out-of-order update for series {series}: time {time} is older than latest time {last_time}"
    )]
    OutOfOrderUpdate {
        series: SeriesId,
        time: TimeKey,
        last_time: TimeKey,
    },

    #[error("unknown series: {0}")]
    UnknownSeries(SeriesId),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
