pub mod horz_scale;
pub mod plot_list;
pub mod plot_row;
pub mod primitives;
pub mod row_factory;
pub mod series_data;
pub mod types;

pub use horz_scale::{HorzScaleBehavior, TimeHorzScaleBehavior, weight_by_time};
pub use plot_list::{DEFAULT_CHUNK_SIZE, MinMax, PlotList, SearchMismatch};
pub use plot_row::{PlotRow, PlotRowValueIndex, PlotRowValues};
pub use row_factory::create_row;
pub use series_data::{
    CustomItem, CustomSeriesSource, OhlcItem, RawItem, SeriesKind, StyleOverrides, ValueItem,
    WhitespaceItem,
};
pub use types::{
    BusinessDay, DomainTime, LogicalIndex, SeriesId, TickMarkWeight, TimeKey, TimePoint,
};
