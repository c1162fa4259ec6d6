//! chart-timeline: time-aligned multi-series data layer.
//!
//! This crate merges heterogeneous series (OHLC bars, single values, custom
//! payloads) onto one strictly ordered logical time axis, keeps per-series
//! plot lists index-consistent under full replacements and realtime updates,
//! and serves cached min/max range queries for autoscale passes.

pub mod api;
pub mod core;
pub mod error;
pub mod lwc;
pub mod telemetry;

pub use api::{ChartData, ChartDataConfig};
pub use error::{ChartError, ChartResult};
pub use lwc::model::{DataLayer, DataUpdateResponse};
