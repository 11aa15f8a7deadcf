use super::spatial_field::{DifferenceField, SpatialField};
use crate::error::{FieldError, Result};

/// Elementwise `a - b`. Both fields must share one [`GridSpec`](super::GridSpec);
/// no clamping, so negative values mark where `a` falls below `b`.
pub fn difference(a: &SpatialField, b: &SpatialField) -> Result<DifferenceField> {
    if a.spec() != b.spec() {
        return Err(FieldError::GeometryMismatch { left: a.shape(), right: b.shape() });
    }
    let values = a.values().iter().zip(b.values()).map(|(x, y)| x - y).collect();
    SpatialField::from_values(*a.spec(), values)
}
