//! # Analysis configuration
//!
//! Every tunable of the comparison lives here: the game-state filter, the
//! grid, the interpolation neighbourhood and the smoothing kernel. The
//! defaults reproduce the MoneyPuck offensive-zone workflow (5v5, 100x85
//! grid over 0..100 x -42.5..42.5, sigma = 3, reflect boundary).
//!
//! ## Usage
//! ```rust
//! use rink_core::config::AnalysisConfig;
//!
//! let yaml = "
//! pipeline:
//!   smoothing:
//!     sigma: 2.0
//!     boundary: nearest
//! ";
//! let config = AnalysisConfig::from_yaml_str(yaml).unwrap();
//! assert_eq!(config.pipeline.smoothing.sigma, 2.0);
//! assert_eq!(config.pipeline.grid.resolution.nx, 100);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};
use crate::field::{GridSpec, InterpolationConfig, SmoothingConfig};
use crate::shots::ShotFilter;

/// Pipeline geometry and numerics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PipelineConfig {
    #[serde(default)]
    pub grid: GridSpec,
    #[serde(default)]
    pub interpolation: InterpolationConfig,
    #[serde(default)]
    pub smoothing: SmoothingConfig,
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        self.interpolation.validate()?;
        self.smoothing.validate()
    }
}

/// Filter + pipeline, as read from a YAML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub filter: ShotFilter,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl AnalysisConfig {
    /// Same as `default()`: the original offensive-zone comparison.
    pub fn moneypuck_offensive_zone() -> Self {
        Self::default()
    }

    pub fn from_yaml_str(yaml: &str) -> std::result::Result<Self, DataError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.pipeline.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> std::result::Result<Self, DataError> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn to_yaml_string(&self) -> std::result::Result<String, DataError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
