//! rinkfield CLI library
//!
//! SpatialField → JSON / CSV export and the player report (see `export`).

pub mod export;

pub use export::{write_field, write_field_csv, write_field_json, write_report, OutputFormat, PlayerReport};
