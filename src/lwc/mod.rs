//! Model layer mirroring the Lightweight Charts data pipeline.

pub mod model;
