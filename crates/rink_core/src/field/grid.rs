//! Grid geometry shared by every field.
//!
//! - Truth = rink feet (adjusted coordinates, attacking toward +x)
//! - Grid = inclusive linspace over the domain, `nx` columns by `ny` rows
//! - Row-major storage, row = y, column = x
//!
//! Two fields are comparable only when their `GridSpec`s are equal, so the
//! spec is built once from config and handed to every stage.

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, Result};

/// Upper bound on nodes per axis.
pub const MAX_NODES_PER_AXIS: usize = 4096;

/// Rink length covered by the default domain (blue line region to end boards).
pub const RINK_LENGTH_FT: f64 = 100.0;
/// Full rink width.
pub const RINK_WIDTH_FT: f64 = 85.0;

/// Rectangular coordinate bounds in rink feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Domain {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self> {
        let domain = Self { x_min, x_max, y_min, y_max };
        domain.validate()?;
        Ok(domain)
    }

    /// Offensive half of the rink in adjusted coordinates: length 0..100,
    /// width -42.5..42.5.
    pub fn offensive_zone() -> Self {
        Self {
            x_min: 0.0,
            x_max: RINK_LENGTH_FT,
            y_min: -RINK_WIDTH_FT / 2.0,
            y_max: RINK_WIDTH_FT / 2.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let bounds = [self.x_min, self.x_max, self.y_min, self.y_max];
        if bounds.iter().any(|v| !v.is_finite()) {
            return Err(FieldError::InvalidDomain(format!(
                "non-finite bounds x=[{}, {}] y=[{}, {}]",
                self.x_min, self.x_max, self.y_min, self.y_max
            )));
        }
        if self.x_max <= self.x_min {
            return Err(FieldError::InvalidDomain(format!(
                "x_max {} must exceed x_min {}",
                self.x_max, self.x_min
            )));
        }
        if self.y_max <= self.y_min {
            return Err(FieldError::InvalidDomain(format!(
                "y_max {} must exceed y_min {}",
                self.y_max, self.y_min
            )));
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::offensive_zone()
    }
}

/// Node counts per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub nx: usize,
    pub ny: usize,
}

impl Resolution {
    pub fn new(nx: usize, ny: usize) -> Result<Self> {
        let res = Self { nx, ny };
        res.validate()?;
        Ok(res)
    }

    pub fn validate(&self) -> Result<()> {
        for (axis, n) in [("nx", self.nx), ("ny", self.ny)] {
            if n < 2 {
                return Err(FieldError::InvalidDomain(format!("{} = {} (need at least 2 nodes)", axis, n)));
            }
            if n > MAX_NODES_PER_AXIS {
                return Err(FieldError::InvalidDomain(format!(
                    "{} = {} exceeds {} nodes",
                    axis, n, MAX_NODES_PER_AXIS
                )));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Resolution {
    fn default() -> Self {
        // ~1 ft per node on both axes
        Self { nx: 100, ny: 85 }
    }
}

/// Full grid geometry: domain, resolution, node placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct GridSpec {
    pub domain: Domain,
    pub resolution: Resolution,
    /// Round node coordinates to whole feet (shot coordinates are whole feet).
    #[serde(default)]
    pub snap_nodes: bool,
}

impl GridSpec {
    pub fn new(domain: Domain, resolution: Resolution) -> Result<Self> {
        let spec = Self { domain, resolution, snap_nodes: false };
        spec.validate()?;
        Ok(spec)
    }

    pub fn with_snapped_nodes(mut self, snap: bool) -> Self {
        self.snap_nodes = snap;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.domain.validate()?;
        self.resolution.validate()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.resolution.nx
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.resolution.ny
    }

    /// (rows, cols), the numpy-style shape.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.resolution.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn idx(&self, row: usize, col: usize) -> usize {
        row * self.cols() + col
    }

    /// x coordinate of column `col`.
    pub fn node_x(&self, col: usize) -> f64 {
        let step = self.domain.width() / (self.cols() - 1) as f64;
        self.snap(self.domain.x_min + col as f64 * step)
    }

    /// y coordinate of row `row`.
    pub fn node_y(&self, row: usize) -> f64 {
        let step = self.domain.height() / (self.rows() - 1) as f64;
        self.snap(self.domain.y_min + row as f64 * step)
    }

    pub fn x_coords(&self) -> Vec<f64> {
        (0..self.cols()).map(|c| self.node_x(c)).collect()
    }

    pub fn y_coords(&self) -> Vec<f64> {
        (0..self.rows()).map(|r| self.node_y(r)).collect()
    }

    /// Nearest node (row, col) to a rink position; out-of-domain positions
    /// clamp to the border.
    pub fn nearest_node(&self, x: f64, y: f64) -> (usize, usize) {
        let fx = (x - self.domain.x_min) / self.domain.width() * (self.cols() - 1) as f64;
        let fy = (y - self.domain.y_min) / self.domain.height() * (self.rows() - 1) as f64;
        let col = fx.round().clamp(0.0, (self.cols() - 1) as f64) as usize;
        let row = fy.round().clamp(0.0, (self.rows() - 1) as f64) as usize;
        (row, col)
    }

    #[inline]
    fn snap(&self, v: f64) -> f64 {
        if self.snap_nodes {
            v.round()
        } else {
            v
        }
    }
}
