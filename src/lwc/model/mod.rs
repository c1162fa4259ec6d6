mod data_layer;
mod update_response;

pub use data_layer::{DataLayer, PointData};
pub use update_response::{DataUpdateResponse, SeriesChanges, SeriesUpdateInfo, TimeScaleChanges};
