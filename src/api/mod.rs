mod data_controller;
mod engine;
mod engine_config;
mod engine_snapshot;
mod json_contract;
mod validation;

pub use engine::ChartData;
pub use engine_config::{ChartDataConfig, ItemValidationMode};
pub use engine_snapshot::{DataLayerSnapshot, SeriesSnapshot};
pub use json_contract::{DATA_SNAPSHOT_JSON_SCHEMA_V1, DataLayerSnapshotJsonContractV1};
