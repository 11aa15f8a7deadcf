//! # rink_core - Spatial expected-goal fields for NHL shot data
//!
//! Turns a shot log into a smooth xGoal surface over the offensive zone and
//! compares one shooter's surface against the league's.
//!
//! ## Features
//! - Local cubic RBF interpolation of scattered shots onto a regular grid
//! - Separable Gaussian smoothing with reflect / mirror / nearest / wrap / constant edges
//! - Player-vs-league difference fields, guarded against mismatched geometry
//! - Game-state filtering (5v5, empty net, behind the net) carried with the data
//! - YAML configuration with MoneyPuck defaults
//!
//! ## Usage
//! ```rust,no_run
//! use std::path::Path;
//! use rink_core::{load_shots_csv, ShotFilter, ShotSet, SpatialFieldPipeline};
//!
//! let records = load_shots_csv(Path::new("shots_2023.csv")).unwrap();
//! let league = ShotSet::from_records(records, ShotFilter::even_strength());
//! let player = league.for_shooter("Connor McDavid");
//!
//! let diff = SpatialFieldPipeline::default().player_vs_league(&player, &league).unwrap();
//! println!("{:?}", diff.shape()); // (85, 100)
//! ```

// Grid loops index rows and columns together
#![allow(clippy::needless_range_loop)]

pub mod config;
pub mod error;
pub mod field;
pub mod pipeline;
pub mod shots;

pub use config::{AnalysisConfig, PipelineConfig};
pub use error::{DataError, FieldError, Result};
pub use field::{
    difference, interpolate, interpolate_with, smooth, smooth_with, BoundaryMode, DifferenceField,
    Domain, GridSpec, InterpolationConfig, Resolution, Sample, SmoothingConfig, SpatialField,
};
pub use pipeline::{player_vs_league, SpatialFieldPipeline};
pub use shots::{
    load_shots_csv, read_shots, read_shots_with_stats, FieldSummary, HighDangerStats, LeagueSummary, ShooterStats,
    ParseStats, ShotFilter, ShotRecord, ShotSet, HIGH_DANGER_DISTANCE_FT,
};
