//! # Spatial field pipeline
//!
//! shots → samples → interpolated field → smoothed field, and the
//! player-vs-league difference built from two of those chains.
//!
//! The pipeline owns nothing but its [`PipelineConfig`]; every call is a
//! pure function of its arguments, so one pipeline can serve any number of
//! comparisons (and threads).

use tracing::info;

use crate::config::PipelineConfig;
use crate::error::{FieldError, Result};
use crate::field::{
    difference, interpolate_with, smooth_with, DifferenceField, GridSpec, Sample, SmoothingConfig,
    SpatialField,
};
use crate::shots::ShotSet;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpatialFieldPipeline {
    config: PipelineConfig,
}

impl SpatialFieldPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridSpec {
        &self.config.grid
    }

    /// Samples → raw field on the configured grid.
    pub fn interpolate(&self, samples: &[Sample]) -> Result<SpatialField> {
        interpolate_with(samples, &self.config.grid, &self.config.interpolation)
    }

    /// Blur with the configured kernel and boundary, overriding sigma.
    pub fn smooth(&self, field: &SpatialField, sigma: f64) -> Result<SpatialField> {
        let cfg = SmoothingConfig { sigma, ..self.config.smoothing };
        smooth_with(field, &cfg)
    }

    pub fn difference(&self, a: &SpatialField, b: &SpatialField) -> Result<DifferenceField> {
        difference(a, b)
    }

    /// Interpolate then smooth one shot set.
    pub fn shot_field(&self, shots: &ShotSet) -> Result<SpatialField> {
        let raw = self.interpolate(&shots.samples())?;
        smooth_with(&raw, &self.config.smoothing)
    }

    /// Smoothed player field minus smoothed league field.
    ///
    /// Positive values: the player's shots from that area carry more xGoal
    /// than the league's.
    pub fn player_vs_league(&self, player: &ShotSet, league: &ShotSet) -> Result<DifferenceField> {
        if !player.is_comparable_with(league) {
            return Err(FieldError::IncomparableShotSets);
        }
        info!(
            player_shots = player.len(),
            league_shots = league.len(),
            sigma = self.config.smoothing.sigma,
            "computing player vs league field"
        );
        let player_field = self.shot_field(player)?;
        let league_field = self.shot_field(league)?;
        difference(&player_field, &league_field)
    }
}

/// Free-function form of [`SpatialFieldPipeline::player_vs_league`].
pub fn player_vs_league(
    player: &ShotSet,
    league: &ShotSet,
    config: &PipelineConfig,
) -> Result<DifferenceField> {
    SpatialFieldPipeline::new(*config)?.player_vs_league(player, league)
}
