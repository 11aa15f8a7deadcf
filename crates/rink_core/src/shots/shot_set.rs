//! Game-state filtering.
//!
//! Fields built from different game states (power play vs 5v5, empty net)
//! are not comparable, so every [`ShotSet`] carries the predicate its rows
//! satisfy and the pipeline refuses to difference sets with unequal ones.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::record::ShotRecord;
use crate::field::Sample;

/// Distance from the net to the blue line; longer shots come from the
/// neutral zone or across the ice.
pub const MAX_SHOT_DISTANCE_FT: f64 = 89.0;
/// Goal line in adjusted coordinates; shots past it come from behind the net.
pub const GOAL_LINE_X_FT: f64 = 89.0;

/// Predicate that every row of a [`ShotSet`] satisfies.
///
/// Fields missing from a config block keep their even-strength value; an
/// explicit `null` lifts a bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotFilter {
    /// Skaters required on ice for both sides (`None` = any).
    pub skaters_per_side: Option<u8>,
    pub max_shot_distance: Option<f64>,
    pub exclude_empty_net: bool,
    /// Largest adjusted x accepted.
    pub max_x: Option<f64>,
}

impl Default for ShotFilter {
    /// 5v5, inside the blue line, goalie in net, in front of the goal line.
    fn default() -> Self {
        Self::even_strength()
    }
}

impl ShotFilter {
    pub fn even_strength() -> Self {
        Self {
            skaters_per_side: Some(5),
            max_shot_distance: Some(MAX_SHOT_DISTANCE_FT),
            exclude_empty_net: true,
            max_x: Some(GOAL_LINE_X_FT),
        }
    }

    /// Accepts every row.
    pub fn all_situations() -> Self {
        Self { skaters_per_side: None, max_shot_distance: None, exclude_empty_net: false, max_x: None }
    }

    // negated comparisons so NaN never passes a bound
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn matches(&self, shot: &ShotRecord) -> bool {
        if let Some(n) = self.skaters_per_side {
            if shot.home_skaters_on_ice != n || shot.away_skaters_on_ice != n {
                return false;
            }
        }
        if let Some(max) = self.max_shot_distance {
            if !(shot.shot_distance <= max) {
                return false;
            }
        }
        if self.exclude_empty_net && shot.shot_on_empty_net {
            return false;
        }
        if let Some(max) = self.max_x {
            if !(shot.x <= max) {
                return false;
            }
        }
        true
    }
}

/// Shots that all satisfy one [`ShotFilter`].
#[derive(Debug, Clone, PartialEq)]
pub struct ShotSet {
    filter: ShotFilter,
    shots: Vec<ShotRecord>,
}

impl ShotSet {
    /// Keep the records matching `filter`, in input order.
    pub fn from_records(records: Vec<ShotRecord>, filter: ShotFilter) -> Self {
        let total = records.len();
        let shots: Vec<ShotRecord> = records.into_iter().filter(|s| filter.matches(s)).collect();
        if shots.is_empty() && total > 0 {
            warn!(total, "game-state filter rejected every shot");
        }
        debug!(total, kept = shots.len(), dropped = total - shots.len(), "filtered shot table");
        Self { filter, shots }
    }

    pub fn filter(&self) -> &ShotFilter {
        &self.filter
    }

    pub fn shots(&self) -> &[ShotRecord] {
        &self.shots
    }

    pub fn len(&self) -> usize {
        self.shots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
    }

    /// Shots by one shooter (exact name match), same filter.
    pub fn for_shooter(&self, name: &str) -> ShotSet {
        let shots = self.shots.iter().filter(|s| s.shooter_name == name).cloned().collect();
        ShotSet { filter: self.filter.clone(), shots }
    }

    /// Shots by one team, same filter.
    pub fn for_team(&self, team_code: &str) -> ShotSet {
        let shots = self.shots.iter().filter(|s| s.team_code == team_code).cloned().collect();
        ShotSet { filter: self.filter.clone(), shots }
    }

    pub fn samples(&self) -> Vec<Sample> {
        self.shots.iter().map(ShotRecord::sample).collect()
    }

    /// Whether fields from `self` and `other` can be compared.
    pub fn is_comparable_with(&self, other: &ShotSet) -> bool {
        self.filter == other.filter
    }
}
