//! # Shot data
//!
//! - `record` - one row of a shot log
//! - `load` - CSV reading
//! - `shot_set` - game-state filter and the filtered, immutable shot set
//! - `stats` - league / shooter / field summaries

pub mod load;
pub mod record;
pub mod shot_set;
pub mod stats;

pub use load::{load_shots_csv, read_shots, read_shots_with_stats, ParseStats};
pub use record::{ShotRecord, GOAL_EVENT};
pub use shot_set::{ShotFilter, ShotSet};
pub use stats::{FieldSummary, HighDangerStats, LeagueSummary, ShooterStats, HIGH_DANGER_DISTANCE_FT};
