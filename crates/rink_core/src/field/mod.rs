//! # Spatial fields
//!
//! Regular-grid scalar fields and the operations that build them from shot
//! samples:
//!
//! - `grid` - domain, resolution, node placement
//! - `spatial_field` - the dense field container
//! - `interpolate` - scattered samples → field (local cubic RBF inside the hull)
//! - `smooth` - separable Gaussian blur with selectable boundary mode
//! - `difference` - elementwise subtraction of same-geometry fields

pub mod difference;
pub mod grid;
pub mod hull;
pub mod interpolate;
pub mod kdtree;
pub mod smooth;
pub mod spatial_field;

pub use difference::difference;
pub use grid::{Domain, GridSpec, Resolution};
pub use interpolate::{interpolate, interpolate_with, InterpolationConfig, Sample, MIN_DISTINCT_SITES};
pub use smooth::{smooth, smooth_with, BoundaryMode, SmoothingConfig};
pub use spatial_field::{DifferenceField, SpatialField};
