use serde::{Deserialize, Deserializer, Serialize};

use crate::field::Sample;

/// `event` value of a shot that went in.
pub const GOAL_EVENT: &str = "GOAL";

/// One shot event from a MoneyPuck-style shot log.
///
/// Coordinates are "adjusted": every shot is expressed as attacking toward
/// +x, so the offensive zone is 25..100 and the goal line sits at x = 89.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotRecord {
    #[serde(rename = "xCordAdjusted")]
    pub x: f64,
    #[serde(rename = "yCordAdjusted")]
    pub y: f64,
    /// Model probability that the shot is a goal.
    #[serde(rename = "xGoal")]
    pub expected_goal: f64,
    pub home_skaters_on_ice: u8,
    pub away_skaters_on_ice: u8,
    #[serde(deserialize_with = "flag_from_number")]
    pub shot_on_empty_net: bool,
    #[serde(default)]
    pub shooter_name: String,
    pub shot_distance: f64,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub team_code: String,
}

/// Empty-net flags come as `0`/`1` (sometimes `0.0`/`1.0`).
fn flag_from_number<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let v = f64::deserialize(deserializer)?;
    Ok(v != 0.0)
}

impl ShotRecord {
    pub fn is_goal(&self) -> bool {
        self.event == GOAL_EVENT
    }

    /// Location and xGoal as an interpolation sample.
    pub fn sample(&self) -> Sample {
        Sample::new(self.x, self.y, self.expected_goal)
    }
}
