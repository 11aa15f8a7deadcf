use serde::{Deserialize, Serialize};

use super::grid::GridSpec;
use crate::error::{FieldError, Result};

/// Dense scalar field over a [`GridSpec`], stored row-major (row = y).
///
/// Fields are immutable once built; every pipeline stage returns a new one.
/// Deserialization goes through [`SpatialField::from_values`], so a decoded
/// field always has one value per node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSpatialField")]
pub struct SpatialField {
    spec: GridSpec,
    values: Vec<f64>, // len = rows*cols
}

/// Unchecked wire form of [`SpatialField`].
#[derive(Deserialize)]
struct RawSpatialField {
    spec: GridSpec,
    values: Vec<f64>,
}

impl TryFrom<RawSpatialField> for SpatialField {
    type Error = FieldError;

    fn try_from(raw: RawSpatialField) -> Result<Self> {
        SpatialField::from_values(raw.spec, raw.values)
    }
}

/// Result of [`difference`](super::difference::difference). Values may be
/// negative.
pub type DifferenceField = SpatialField;

impl SpatialField {
    pub fn zeros(spec: GridSpec) -> Self {
        Self { spec, values: vec![0.0; spec.len()] }
    }

    pub fn from_values(spec: GridSpec, values: Vec<f64>) -> Result<Self> {
        spec.validate()?;
        if values.len() != spec.len() {
            return Err(FieldError::InvalidDomain(format!(
                "{} values for a {}x{} grid",
                values.len(),
                spec.rows(),
                spec.cols()
            )));
        }
        Ok(Self { spec, values })
    }

    /// Build a field by evaluating `f(x, y)` at every node.
    pub fn from_fn<F>(spec: GridSpec, mut f: F) -> Self
    where
        F: FnMut(f64, f64) -> f64,
    {
        let xs = spec.x_coords();
        let mut values = Vec::with_capacity(spec.len());
        for row in 0..spec.rows() {
            let y = spec.node_y(row);
            values.extend(xs.iter().map(|&x| f(x, y)));
        }
        Self { spec, values }
    }

    #[inline]
    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.spec.shape()
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[self.spec.idx(row, col)]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let cols = self.spec.cols();
        &self.values[row * cols..(row + 1) * cols]
    }

    /// Value at the node nearest to (x, y).
    pub fn value_near(&self, x: f64, y: f64) -> f64 {
        let (row, col) = self.spec.nearest_node(x, y);
        self.get(row, col)
    }

    pub fn min(&self) -> f64 {
        self.values.iter().cloned().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.values.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Population variance over all nodes.
    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        self.values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / self.values.len() as f64
    }

    /// Keep only node columns with `x <= x_max`.
    ///
    /// Used to stop a heatmap at the goal line (x = 89) before rendering.
    pub fn crop_x(&self, x_max: f64) -> Result<Self> {
        let keep = (0..self.spec.cols()).take_while(|&c| self.spec.node_x(c) <= x_max).count();
        if keep < 2 {
            return Err(FieldError::InvalidDomain(format!(
                "crop at x={} leaves {} columns",
                x_max, keep
            )));
        }

        // unsnapped position of the last kept column, so node spacing is preserved
        let step = self.spec.domain.width() / (self.spec.cols() - 1) as f64;
        let mut spec = self.spec;
        spec.domain.x_max = self.spec.domain.x_min + (keep - 1) as f64 * step;
        spec.resolution.nx = keep;

        let mut values = Vec::with_capacity(keep * spec.rows());
        for row in 0..self.spec.rows() {
            values.extend_from_slice(&self.row(row)[..keep]);
        }
        Ok(Self { spec, values })
    }

    pub(crate) fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self { spec: self.spec, values: self.values.iter().map(|&v| f(v)).collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::grid::{Domain, Resolution};

    fn small_spec() -> GridSpec {
        GridSpec::new(Domain::new(0.0, 4.0, 0.0, 2.0).unwrap(), Resolution::new(5, 3).unwrap()).unwrap()
    }

    #[test]
    fn test_from_fn_row_major() {
        let field = SpatialField::from_fn(small_spec(), |x, y| x + 10.0 * y);
        assert_eq!(field.shape(), (3, 5));
        assert_eq!(field.get(0, 4), 4.0);
        assert_eq!(field.get(2, 0), 20.0);
        assert_eq!(field.row(1), &[10.0, 11.0, 12.0, 13.0, 14.0]);
    }

    #[test]
    fn test_from_values_length_check() {
        assert!(SpatialField::from_values(small_spec(), vec![0.0; 14]).is_err());
        assert!(SpatialField::from_values(small_spec(), vec![0.0; 15]).is_ok());
    }

    #[test]
    fn test_decode_checks_value_count() {
        let field = SpatialField::from_fn(small_spec(), |x, y| x - y);
        let json = serde_json::to_string(&field).unwrap();
        assert_eq!(serde_json::from_str::<SpatialField>(&json).unwrap(), field);

        let spec_json = serde_json::to_string(field.spec()).unwrap();
        let short = format!("{{\"spec\":{},\"values\":[1.0]}}", spec_json);
        let err = serde_json::from_str::<SpatialField>(&short).unwrap_err();
        assert!(err.to_string().contains("1 values for a 3x5 grid"), "{}", err);

        let bad_domain = r#"{"spec":{"domain":{"x_min":1.0,"x_max":0.0,"y_min":0.0,"y_max":1.0},
            "resolution":{"nx":2,"ny":2}},"values":[0.0,0.0,0.0,0.0]}"#;
        assert!(serde_json::from_str::<SpatialField>(bad_domain).is_err());
    }

    #[test]
    fn test_stats() {
        let field = SpatialField::from_fn(small_spec(), |x, _| x);
        assert_eq!(field.min(), 0.0);
        assert_eq!(field.max(), 4.0);
        assert!((field.mean() - 2.0).abs() < 1e-12);
        assert!((field.variance() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_crop_x_keeps_leading_columns() {
        let field = SpatialField::from_fn(small_spec(), |x, y| x + 10.0 * y);
        let cropped = field.crop_x(2.5).unwrap();
        assert_eq!(cropped.shape(), (3, 3));
        assert_eq!(cropped.spec().domain.x_max, 2.0);
        assert_eq!(cropped.row(2), &[20.0, 21.0, 22.0]);
        // node spacing unchanged
        assert_eq!(cropped.spec().node_x(1), 1.0);
    }

    #[test]
    fn test_crop_x_too_narrow() {
        let field = SpatialField::zeros(small_spec());
        assert!(matches!(field.crop_x(0.5), Err(FieldError::InvalidDomain(_))));
    }

    #[test]
    fn test_default_crop_at_goal_line() {
        let field = SpatialField::zeros(GridSpec::default());
        let cropped = field.crop_x(89.0).unwrap();
        // columns 0..=88 sit at or before the goal line
        assert_eq!(cropped.shape(), (85, 89));
        assert!(cropped.spec().domain.x_max <= 89.0);
    }
}
