//! Scattered-data interpolation onto a regular grid.
//!
//! Each grid node inside the convex hull of the sites gets a local cubic
//! radial-basis estimate: `phi(r) = r^3` plus a linear polynomial tail,
//! fitted exactly through the `k` nearest sites. Nodes outside the hull take
//! the fill value.
//!
//! Estimates are bounded by the neighbourhood's value range, so a cubic
//! overshoot never pushes xGoal past the largest nearby sample. A
//! neighbourhood lying on a line, or a solve landing far outside that range,
//! falls back to inverse-distance weighting. The result is clamped to be
//! non-negative, since a negative expected-goal value has no meaning.
//!
//! Sites with identical coordinates are merged (mean value) first; shot
//! coordinates are whole feet, so a season of shots stacks many samples on
//! the same spot and the cubic system would otherwise be singular.

use std::collections::HashMap;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::grid::GridSpec;
use super::hull::ConvexHull;
use super::kdtree::KdTree;
use super::spatial_field::SpatialField;
use crate::error::{FieldError, Result};

/// Fewest distinct, non-collinear sites that produce a field.
pub const MIN_DISTINCT_SITES: usize = 4;
pub const DEFAULT_NEIGHBORS: usize = 32;
/// Smallest hull area of a unit-radius neighbourhood that still pins down
/// the linear tail.
const MIN_NEIGHBOURHOOD_AREA: f64 = 1e-6;

/// A located value, e.g. one shot's xGoal at its adjusted coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64, value: f64) -> Self {
        Self { x, y, value }
    }
}

impl From<(f64, f64, f64)> for Sample {
    fn from((x, y, value): (f64, f64, f64)) -> Self {
        Self { x, y, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterpolationConfig {
    /// Sites per local cubic fit.
    #[serde(default = "default_neighbors")]
    pub neighbors: usize,
    /// Value for nodes outside the convex hull of the sites.
    #[serde(default)]
    pub fill_value: f64,
}

fn default_neighbors() -> usize {
    DEFAULT_NEIGHBORS
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self { neighbors: DEFAULT_NEIGHBORS, fill_value: 0.0 }
    }
}

impl InterpolationConfig {
    pub fn validate(&self) -> Result<()> {
        // linear tail needs 3 sites, one more to make the fit non-trivial
        if self.neighbors < MIN_DISTINCT_SITES {
            return Err(FieldError::InvalidDomain(format!(
                "neighbors = {} (need at least {})",
                self.neighbors, MIN_DISTINCT_SITES
            )));
        }
        if !self.fill_value.is_finite() {
            return Err(FieldError::InvalidDomain(format!("fill_value = {}", self.fill_value)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct Site {
    point: [f64; 2],
    value: f64,
}

/// Validate samples and merge coincident ones, keeping first-seen order.
fn merge_sites(samples: &[Sample]) -> Result<Vec<Site>> {
    let mut index: HashMap<(u64, u64), usize> = HashMap::with_capacity(samples.len());
    let mut sums: Vec<(Site, usize)> = Vec::new();

    for (i, s) in samples.iter().enumerate() {
        if !s.x.is_finite() || !s.y.is_finite() {
            return Err(FieldError::InvalidSample {
                index: i,
                reason: format!("non-finite location ({}, {})", s.x, s.y),
            });
        }
        if !s.value.is_finite() {
            return Err(FieldError::InvalidSample { index: i, reason: format!("non-finite value {}", s.value) });
        }
        // +0.0 folds -0.0 into 0.0 so both hash alike
        let key = ((s.x + 0.0).to_bits(), (s.y + 0.0).to_bits());
        match index.get(&key) {
            Some(&slot) => {
                sums[slot].0.value += s.value;
                sums[slot].1 += 1;
            }
            None => {
                index.insert(key, sums.len());
                sums.push((Site { point: [s.x + 0.0, s.y + 0.0], value: s.value }, 1));
            }
        }
    }

    let merged = samples.len() - sums.len();
    if merged > 0 {
        debug!(samples = samples.len(), sites = sums.len(), "merged coincident samples");
    }

    Ok(sums
        .into_iter()
        .map(|(site, count)| Site { value: site.value / count as f64, ..site })
        .collect())
}

/// Exact local fit of `sum w_j |p - p_j|^3 + c0 + c1 x + c2 y` through the
/// neighbourhood, evaluated at `q` and clamped to the neighbourhood's value
/// range. `None` when the sites are (nearly) collinear or the solve is
/// unstable.
fn local_cubic_estimate(sites: &[Site], ids: &[usize], q: [f64; 2]) -> Option<f64> {
    let m = ids.len();
    // centre on q and scale to unit radius; the cubic interpolant is
    // invariant under both, the conditioning is not
    let local: Vec<[f64; 2]> = ids
        .iter()
        .map(|&id| [sites[id].point[0] - q[0], sites[id].point[1] - q[1]])
        .collect();
    let h = local.iter().map(|p| p[0].hypot(p[1])).fold(0.0_f64, f64::max);
    let h = if h > 0.0 { h } else { 1.0 };
    let local: Vec<[f64; 2]> = local.iter().map(|p| [p[0] / h, p[1] / h]).collect();
    if ConvexHull::new(&local).area() < MIN_NEIGHBOURHOOD_AREA {
        return None;
    }

    let n = m + 3;
    let mut a = DMatrix::<f64>::zeros(n, n);
    let mut b = DVector::<f64>::zeros(n);
    for i in 0..m {
        for j in 0..m {
            let r = (local[i][0] - local[j][0]).hypot(local[i][1] - local[j][1]);
            a[(i, j)] = r * r * r;
        }
        a[(i, m)] = 1.0;
        a[(i, m + 1)] = local[i][0];
        a[(i, m + 2)] = local[i][1];
        a[(m, i)] = 1.0;
        a[(m + 1, i)] = local[i][0];
        a[(m + 2, i)] = local[i][1];
        b[i] = sites[ids[i]].value;
    }

    let coeffs = a.lu().solve(&b)?;
    // q sits at the origin: polynomial reduces to c0
    let radial: f64 = local
        .iter()
        .enumerate()
        .map(|(j, p)| coeffs[j] * p[0].hypot(p[1]).powi(3))
        .sum();
    let estimate = radial + coeffs[m];

    let (lo, hi) = ids
        .iter()
        .map(|&id| sites[id].value)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let span = hi - lo;
    if !estimate.is_finite() || estimate < lo - span || estimate > hi + span {
        return None;
    }
    Some(estimate.clamp(lo, hi))
}

/// Inverse-distance-squared mean of the neighbourhood.
fn idw_estimate(sites: &[Site], ids: &[usize], q: [f64; 2]) -> f64 {
    let mut num = 0.0;
    let mut den = 0.0;
    for &id in ids {
        let s = &sites[id];
        let d2 = (s.point[0] - q[0]).powi(2) + (s.point[1] - q[1]).powi(2);
        if d2 == 0.0 {
            return s.value;
        }
        num += s.value / d2;
        den += 1.0 / d2;
    }
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

/// Interpolate `samples` onto `grid` with default parameters.
pub fn interpolate(samples: &[Sample], grid: &GridSpec) -> Result<SpatialField> {
    interpolate_with(samples, grid, &InterpolationConfig::default())
}

/// Interpolate `samples` onto `grid`.
///
/// # Errors
/// * `InvalidDomain` - bad grid or config
/// * `InvalidSample` - non-finite coordinate or value
/// * `InsufficientData` - fewer than [`MIN_DISTINCT_SITES`] distinct sites,
///   or all sites collinear
pub fn interpolate_with(
    samples: &[Sample],
    grid: &GridSpec,
    config: &InterpolationConfig,
) -> Result<SpatialField> {
    grid.validate()?;
    config.validate()?;

    let sites = merge_sites(samples)?;
    if sites.len() < MIN_DISTINCT_SITES {
        return Err(FieldError::InsufficientData { distinct: sites.len(), required: MIN_DISTINCT_SITES });
    }

    let points: Vec<[f64; 2]> = sites.iter().map(|s| s.point).collect();
    let hull = ConvexHull::new(&points);
    if hull.is_degenerate() {
        // collinear sites span no area: nothing to interpolate over
        return Err(FieldError::InsufficientData { distinct: sites.len(), required: MIN_DISTINCT_SITES });
    }

    let tree = KdTree::new(&points);
    let k = config.neighbors.min(sites.len());
    let fill = config.fill_value;

    let mut inside = 0usize;
    let mut fallbacks = 0usize;
    let raw = SpatialField::from_fn(*grid, |x, y| {
        let q = [x, y];
        if !hull.contains(q) {
            return fill;
        }
        inside += 1;
        let ids = tree.nearest(q, k);
        match local_cubic_estimate(&sites, &ids, q) {
            Some(v) => v,
            None => {
                fallbacks += 1;
                idw_estimate(&sites, &ids, q)
            }
        }
    });

    debug!(
        sites = sites.len(),
        nodes = grid.len(),
        inside_hull = inside,
        idw_fallbacks = fallbacks,
        "interpolated field"
    );

    Ok(raw.map(|v| {
        let v = if v.is_finite() { v } else { fill };
        v.max(0.0)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::grid::{Domain, Resolution};
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn scenario_samples() -> Vec<Sample> {
        vec![
            Sample::new(10.0, 0.0, 0.3),
            Sample::new(12.0, 2.0, 0.1),
            Sample::new(8.0, -2.0, 0.2),
            Sample::new(50.0, 0.0, 0.05),
            Sample::new(89.0, 0.0, 0.01),
        ]
    }

    fn unit_grid(n: usize) -> GridSpec {
        GridSpec::new(Domain::new(0.0, 1.0, 0.0, 1.0).unwrap(), Resolution::new(n, n).unwrap()).unwrap()
    }

    fn corner_samples<F: Fn(f64, f64) -> f64>(f: F) -> Vec<Sample> {
        let mut out = Vec::new();
        for i in 0..6 {
            for j in 0..6 {
                let (x, y) = (i as f64 / 5.0, j as f64 / 5.0);
                out.push(Sample::new(x, y, f(x, y)));
            }
        }
        out
    }

    #[test]
    fn test_single_sample_is_insufficient() {
        let err = interpolate(&[Sample::new(10.0, 0.0, 0.3)], &GridSpec::default()).unwrap_err();
        assert_eq!(err, FieldError::InsufficientData { distinct: 1, required: MIN_DISTINCT_SITES });
    }

    #[test]
    fn test_duplicates_do_not_count_as_sites() {
        let samples = vec![Sample::new(1.0, 1.0, 0.1); 10];
        assert!(matches!(
            interpolate(&samples, &GridSpec::default()),
            Err(FieldError::InsufficientData { distinct: 1, .. })
        ));
    }

    #[test]
    fn test_collinear_is_insufficient() {
        let samples: Vec<Sample> = (0..10).map(|i| Sample::new(i as f64, 0.0, 0.1)).collect();
        assert!(matches!(
            interpolate(&samples, &GridSpec::default()),
            Err(FieldError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_non_finite_sample_rejected() {
        let mut samples = scenario_samples();
        samples[3].value = f64::NAN;
        assert!(matches!(
            interpolate(&samples, &GridSpec::default()),
            Err(FieldError::InvalidSample { index: 3, .. })
        ));
        samples[3] = Sample::new(f64::INFINITY, 0.0, 0.1);
        assert!(matches!(
            interpolate(&samples, &GridSpec::default()),
            Err(FieldError::InvalidSample { index: 3, .. })
        ));
    }

    #[test]
    fn test_reproduces_linear_field() {
        // linear data lies in the polynomial tail: the fit must be exact
        let samples = corner_samples(|x, y| 0.1 + 0.2 * x + 0.3 * y);
        let field = interpolate(&samples, &unit_grid(11)).unwrap();
        for row in 0..11 {
            for col in 0..11 {
                let (x, y) = (field.spec().node_x(col), field.spec().node_y(row));
                let expected = 0.1 + 0.2 * x + 0.3 * y;
                assert!((field.get(row, col) - expected).abs() < 1e-8, "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_passes_through_sites() {
        let samples = corner_samples(|x, y| (3.0 * x).sin().abs() + y * y);
        let field = interpolate(&samples, &unit_grid(6)).unwrap();
        for s in &samples {
            assert!((field.value_near(s.x, s.y) - s.value).abs() < 1e-8);
        }
    }

    #[test]
    fn test_outside_hull_gets_fill() {
        let field = interpolate(&scenario_samples(), &GridSpec::default()).unwrap();
        assert_eq!(field.value_near(89.0, 42.0), 0.0);
        assert_eq!(field.value_near(0.0, 0.0), 0.0);
        assert!((field.value_near(10.0, 0.0) - 0.3).abs() < 0.05);
    }

    #[test]
    fn test_coincident_samples_are_averaged() {
        let mut samples = corner_samples(|_, _| 0.2);
        samples.push(Sample::new(0.0, 0.0, 0.4));
        let field = interpolate(&samples, &unit_grid(6)).unwrap();
        assert!((field.get(0, 0) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_negative_estimates_are_clamped() {
        let samples = corner_samples(|x, _| x - 0.5);
        let field = interpolate(&samples, &unit_grid(11)).unwrap();
        assert_eq!(field.get(5, 0), 0.0);
        assert!(field.get(5, 10) > 0.4);
    }

    #[test]
    fn test_small_neighbourhood_config() {
        let cfg = InterpolationConfig { neighbors: 6, fill_value: 0.0 };
        let samples = corner_samples(|x, y| x * y);
        let field = interpolate_with(&samples, &unit_grid(9), &cfg).unwrap();
        assert!((field.value_near(1.0, 1.0) - 1.0).abs() < 1e-8);
        let bad = InterpolationConfig { neighbors: 2, fill_value: 0.0 };
        assert!(interpolate_with(&samples, &unit_grid(9), &bad).is_err());
    }

    #[test]
    fn test_collinear_neighbourhood_falls_back() {
        // a dense baseline plus one apex: nodes near the baseline only see
        // collinear sites
        let mut samples: Vec<Sample> = (0..=100).map(|x| Sample::new(x as f64, 0.0, 0.1)).collect();
        samples.push(Sample::new(50.0, 40.0, 0.1));
        let field = interpolate(&samples, &GridSpec::default()).unwrap();
        assert!(field.values().iter().all(|v| *v == 0.0 || (v - 0.1).abs() < 1e-12));
        assert!((field.value_near(50.0, 1.0) - 0.1).abs() < 1e-12);
        assert!((field.value_near(50.0, 20.0) - 0.1).abs() < 1e-12);

        // varying values along the line stay inside the data range
        let mut samples: Vec<Sample> = (0..=100).map(|x| Sample::new(x as f64, 0.0, 0.001 * x as f64)).collect();
        samples.push(Sample::new(50.0, 40.0, 0.05));
        let field = interpolate(&samples, &GridSpec::default()).unwrap();
        assert!(field.max() <= 0.1);
        let near_line = field.value_near(50.0, 1.0);
        assert!((0.03..=0.07).contains(&near_line), "{}", near_line);
    }

    #[test]
    fn test_estimates_stay_within_sample_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..5 {
            let samples: Vec<Sample> = (0..150)
                .map(|_| {
                    let x = rng.gen_range(25..=89) as f64;
                    let y = rng.gen_range(-40..=40) as f64;
                    Sample::new(x, y, rng.gen_range(0.0..0.5))
                })
                .collect();
            let field = interpolate(&samples, &GridSpec::default()).unwrap();
            assert!(field.max() < 0.5, "max = {}", field.max());
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// Grid shape depends only on the resolution, never on the samples.
        #[test]
        fn prop_geometry_independent_of_samples(
            pts in prop::collection::vec((0.0f64..100.0, -42.5f64..42.5, 0.0f64..1.0), 4..60),
            nx in 2usize..40,
            ny in 2usize..40,
        ) {
            let samples: Vec<Sample> = pts.into_iter().map(Sample::from).collect();
            let spec = GridSpec::new(Domain::offensive_zone(), Resolution::new(nx, ny).unwrap()).unwrap();
            match interpolate(&samples, &spec) {
                Ok(field) => {
                    prop_assert_eq!(field.shape(), (ny, nx));
                    prop_assert_eq!(field.spec(), &spec);
                }
                Err(e) => prop_assert!(
                    matches!(e, FieldError::InsufficientData { .. }),
                    "unexpected error {:?}",
                    e
                ),
            }
        }

        /// Interpolated xGoal is never negative.
        #[test]
        fn prop_non_negative(
            pts in prop::collection::vec((0.0f64..100.0, -42.5f64..42.5, -0.5f64..1.0), 4..80),
        ) {
            let samples: Vec<Sample> = pts.into_iter().map(Sample::from).collect();
            let spec = GridSpec::new(Domain::offensive_zone(), Resolution::new(30, 25).unwrap()).unwrap();
            if let Ok(field) = interpolate(&samples, &spec) {
                prop_assert!(field.values().iter().all(|v| *v >= 0.0));
            }
        }
    }
}
