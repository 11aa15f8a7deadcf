//! Separable Gaussian blur over a [`SpatialField`].
//!
//! The blur runs along rows, then along columns, with a kernel truncated at
//! `truncate * sigma` cells and normalized to sum 1. Boundary handling
//! decides which values the kernel sees past the grid edge; it biases the
//! nodes within one kernel radius of the border.

use serde::{Deserialize, Serialize};

use super::grid::MAX_NODES_PER_AXIS;
use super::spatial_field::SpatialField;
use crate::error::{FieldError, Result};

pub const DEFAULT_SIGMA: f64 = 3.0;
pub const DEFAULT_TRUNCATE: f64 = 4.0;
/// Largest kernel radius in cells. Past two grid spans every boundary mode
/// has already folded the kernel over the whole axis.
pub const MAX_KERNEL_RADIUS: usize = 2 * MAX_NODES_PER_AXIS;

/// How the grid is extended past its edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryMode {
    /// `d c b a | a b c d | d c b a` (edge value repeated)
    #[default]
    Reflect,
    /// `d c b | a b c d | c b a` (edge value not repeated)
    Mirror,
    /// `a a a | a b c d | d d d`
    Nearest,
    /// `b c d | a b c d | a b c`
    Wrap,
    /// `k k k | a b c d | k k k`
    Constant(f64),
}

impl BoundaryMode {
    /// Map an index outside `0..n` back into the grid; `None` means the
    /// constant fill applies.
    fn resolve(self, idx: isize, n: usize) -> Option<usize> {
        let n_i = n as isize;
        if (0..n_i).contains(&idx) {
            return Some(idx as usize);
        }
        match self {
            BoundaryMode::Reflect => {
                let period = 2 * n_i;
                let m = idx.rem_euclid(period);
                let folded = if m < n_i { m } else { period - 1 - m };
                Some(folded as usize)
            }
            BoundaryMode::Mirror => {
                if n == 1 {
                    return Some(0);
                }
                let period = 2 * n_i - 2;
                let m = idx.rem_euclid(period);
                let folded = if m < n_i { m } else { period - m };
                Some(folded as usize)
            }
            BoundaryMode::Nearest => Some(idx.clamp(0, n_i - 1) as usize),
            BoundaryMode::Wrap => Some(idx.rem_euclid(n_i) as usize),
            BoundaryMode::Constant(_) => None,
        }
    }

    fn fill(self) -> f64 {
        match self {
            BoundaryMode::Constant(v) => v,
            _ => 0.0,
        }
    }
}

/// Smoothing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingConfig {
    /// Standard deviation in grid cells.
    pub sigma: f64,
    /// Kernel radius in multiples of sigma.
    #[serde(default = "default_truncate")]
    pub truncate: f64,
    #[serde(default)]
    pub boundary: BoundaryMode,
}

fn default_truncate() -> f64 {
    DEFAULT_TRUNCATE
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self { sigma: DEFAULT_SIGMA, truncate: DEFAULT_TRUNCATE, boundary: BoundaryMode::Reflect }
    }
}

impl SmoothingConfig {
    pub fn with_sigma(sigma: f64) -> Self {
        Self { sigma, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        let too_wide = || kernel_radius(self.sigma, self.truncate) > MAX_KERNEL_RADIUS as f64;
        if !ok(self.sigma) || !ok(self.truncate) || too_wide() {
            return Err(FieldError::InvalidSmoothing { sigma: self.sigma, truncate: self.truncate });
        }
        Ok(())
    }
}

/// Kernel half-width in cells.
fn kernel_radius(sigma: f64, truncate: f64) -> f64 {
    (truncate * sigma + 0.5).floor()
}

/// Normalized 1D Gaussian weights for offsets `-radius..=radius`.
/// Callers validate the config first.
pub(crate) fn gaussian_kernel(sigma: f64, truncate: f64) -> Vec<f64> {
    let radius = kernel_radius(sigma, truncate) as usize;
    let denom = 2.0 * sigma * sigma;
    let mut weights: Vec<f64> = (-(radius as isize)..=radius as isize)
        .map(|i| (-((i * i) as f64) / denom).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

fn convolve_line(input: &[f64], output: &mut [f64], kernel: &[f64], mode: BoundaryMode) {
    let n = input.len();
    let radius = (kernel.len() / 2) as isize;
    for (i, out) in output.iter_mut().enumerate() {
        let mut acc = 0.0;
        for (k, w) in kernel.iter().enumerate() {
            let src = i as isize + k as isize - radius;
            acc += w * match mode.resolve(src, n) {
                Some(j) => input[j],
                None => mode.fill(),
            };
        }
        *out = acc;
    }
}

/// Gaussian-blur `field` with standard deviation `sigma` (grid cells) and
/// default truncation/boundary.
pub fn smooth(field: &SpatialField, sigma: f64) -> Result<SpatialField> {
    smooth_with(field, &SmoothingConfig::with_sigma(sigma))
}

/// Gaussian-blur `field` with explicit parameters. Output geometry equals
/// input geometry.
pub fn smooth_with(field: &SpatialField, config: &SmoothingConfig) -> Result<SpatialField> {
    config.validate()?;
    let kernel = gaussian_kernel(config.sigma, config.truncate);
    let (rows, cols) = field.shape();
    let src = field.values();

    // pass 1: along x (rows)
    let mut tmp = vec![0.0; src.len()];
    for r in 0..rows {
        let span = r * cols..(r + 1) * cols;
        convolve_line(&src[span.clone()], &mut tmp[span], &kernel, config.boundary);
    }

    // pass 2: along y (columns)
    let mut out = vec![0.0; src.len()];
    let mut column = vec![0.0; rows];
    let mut blurred = vec![0.0; rows];
    for c in 0..cols {
        for r in 0..rows {
            column[r] = tmp[r * cols + c];
        }
        convolve_line(&column, &mut blurred, &kernel, config.boundary);
        for r in 0..rows {
            out[r * cols + c] = blurred[r];
        }
    }

    SpatialField::from_values(*field.spec(), out)
}
