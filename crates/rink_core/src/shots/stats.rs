//! # Shot statistics
//!
//! Scalar summaries that accompany the spatial comparison:
//!
//! - `LeagueSummary` - xGoal max/mean and coordinate ranges of a shot set
//! - `ShooterStats` - shots, goals, shooting percentage
//! - `HighDangerStats` - share of shots taken close to the net
//! - `FieldSummary` - extremes of a (difference) field and where they sit

use serde::{Deserialize, Serialize};

use super::shot_set::ShotSet;
use crate::field::SpatialField;

/// Shots from within this distance (ft) count as high danger.
pub const HIGH_DANGER_DISTANCE_FT: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueSummary {
    pub shots: usize,
    pub xg_max: f64,
    pub xg_mean: f64,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

impl LeagueSummary {
    /// `None` for an empty set.
    pub fn from_shots(set: &ShotSet) -> Option<Self> {
        let shots = set.shots();
        if shots.is_empty() {
            return None;
        }
        let mut xg_max = f64::NEG_INFINITY;
        let mut xg_sum = 0.0;
        let mut x_range = (f64::INFINITY, f64::NEG_INFINITY);
        let mut y_range = (f64::INFINITY, f64::NEG_INFINITY);
        for s in shots {
            xg_max = xg_max.max(s.expected_goal);
            xg_sum += s.expected_goal;
            x_range = (x_range.0.min(s.x), x_range.1.max(s.x));
            y_range = (y_range.0.min(s.y), y_range.1.max(s.y));
        }
        Some(Self { shots: shots.len(), xg_max, xg_mean: xg_sum / shots.len() as f64, x_range, y_range })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShooterStats {
    pub total_shots: usize,
    pub goals: usize,
    /// Goals per shot, in percent (0 without shots).
    pub shooting_pct: f64,
    /// Sum of xGoal over the shots.
    pub expected_goals: f64,
}

impl ShooterStats {
    pub fn from_shots(set: &ShotSet) -> Self {
        let total_shots = set.len();
        let goals = set.shots().iter().filter(|s| s.is_goal()).count();
        let expected_goals: f64 = set.shots().iter().map(|s| s.expected_goal).sum();
        Self { total_shots, goals, shooting_pct: percent(goals, total_shots), expected_goals }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighDangerStats {
    pub distance_threshold: f64,
    pub high_danger_shots: usize,
    pub high_danger_pct: f64,
}

impl HighDangerStats {
    pub fn from_shots(set: &ShotSet, distance_threshold: f64) -> Self {
        let high_danger_shots =
            set.shots().iter().filter(|s| s.shot_distance <= distance_threshold).count();
        Self {
            distance_threshold,
            high_danger_shots,
            high_danger_pct: percent(high_danger_shots, set.len()),
        }
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// A field value with the rink position of its node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldExtreme {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSummary {
    pub rows: usize,
    pub cols: usize,
    pub min: FieldExtreme,
    pub max: FieldExtreme,
    pub mean: f64,
}

impl FieldSummary {
    /// For a difference field, `max` is the strongest over-performance zone
    /// and `min` the weakest. Ties resolve to the first node in row-major order.
    pub fn from_field(field: &SpatialField) -> Self {
        let spec = field.spec();
        let (rows, cols) = field.shape();
        let mut min = (0usize, f64::INFINITY);
        let mut max = (0usize, f64::NEG_INFINITY);
        for (i, &v) in field.values().iter().enumerate() {
            if v < min.1 {
                min = (i, v);
            }
            if v > max.1 {
                max = (i, v);
            }
        }
        let extreme = |(i, value): (usize, f64)| FieldExtreme {
            x: spec.node_x(i % cols),
            y: spec.node_y(i / cols),
            value,
        };
        Self { rows, cols, min: extreme(min), max: extreme(max), mean: field.mean() }
    }
}
