//! Convex hull of the interpolation sites (Andrew's monotone chain).
//!
//! Grid nodes outside the hull are never extrapolated; they take the fill
//! value instead.

use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct ConvexHull {
    /// Counter-clockwise, no repeated first vertex.
    vertices: Vec<[f64; 2]>,
    tolerance: f64,
}

#[inline]
fn cross(o: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

impl ConvexHull {
    pub fn new(points: &[[f64; 2]]) -> Self {
        let mut pts: Vec<[f64; 2]> = points.to_vec();
        pts.sort_by(|a, b| {
            a[0].partial_cmp(&b[0])
                .unwrap_or(Ordering::Equal)
                .then(a[1].partial_cmp(&b[1]).unwrap_or(Ordering::Equal))
        });
        pts.dedup();

        let scale = pts
            .iter()
            .flat_map(|p| p.iter())
            .fold(1.0_f64, |acc, v| acc.max(v.abs()));
        let tolerance = scale * 1e-9;

        if pts.len() < 3 {
            return Self { vertices: pts, tolerance };
        }

        let mut lower: Vec<[f64; 2]> = Vec::with_capacity(pts.len());
        for &p in &pts {
            while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
                lower.pop();
            }
            lower.push(p);
        }
        let mut upper: Vec<[f64; 2]> = Vec::with_capacity(pts.len());
        for &p in pts.iter().rev() {
            while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
                upper.pop();
            }
            upper.push(p);
        }
        lower.pop();
        upper.pop();
        lower.extend(upper);
        Self { vertices: lower, tolerance }
    }

    pub fn vertices(&self) -> &[[f64; 2]] {
        &self.vertices
    }

    /// Shoelace area; zero for collinear input.
    pub fn area(&self) -> f64 {
        if self.vertices.len() < 3 {
            return 0.0;
        }
        let n = self.vertices.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let a = self.vertices[i];
                let b = self.vertices[(i + 1) % n];
                a[0] * b[1] - b[0] * a[1]
            })
            .sum();
        twice.abs() / 2.0
    }

    /// Degenerate hulls (fewer than 3 vertices) contain nothing.
    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < 3 || self.area() <= self.tolerance
    }

    /// Inside or on the boundary.
    pub fn contains(&self, p: [f64; 2]) -> bool {
        if self.is_degenerate() {
            return false;
        }
        let n = self.vertices.len();
        (0..n).all(|i| {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let edge_len = ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2)).sqrt();
            // signed distance scaled by edge length
            cross(a, b, p) >= -self.tolerance * edge_len
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_with_interior_point() {
        let hull = ConvexHull::new(&[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [1.0, 1.0]]);
        assert_eq!(hull.vertices().len(), 4);
        assert!((hull.area() - 4.0).abs() < 1e-12);
        assert!(hull.contains([1.0, 1.0]));
        assert!(hull.contains([0.0, 1.0])); // boundary
        assert!(hull.contains([2.0, 2.0])); // vertex
        assert!(!hull.contains([2.1, 1.0]));
        assert!(!hull.contains([-0.001, 1.0]));
    }

    #[test]
    fn test_collinear_is_degenerate() {
        let hull = ConvexHull::new(&[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]]);
        assert!(hull.is_degenerate());
        assert_eq!(hull.area(), 0.0);
        assert!(!hull.contains([1.0, 1.0]));
    }

    #[test]
    fn test_duplicates_ignored() {
        let hull = ConvexHull::new(&[[0.0, 0.0], [0.0, 0.0], [4.0, 0.0], [0.0, 3.0], [4.0, 0.0]]);
        assert_eq!(hull.vertices().len(), 3);
        assert!((hull.area() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_thin_shot_triangle() {
        // sites from the end-to-end scenario
        let hull = ConvexHull::new(&[[10.0, 0.0], [12.0, 2.0], [8.0, -2.0], [50.0, 0.0], [89.0, 0.0]]);
        assert_eq!(hull.vertices().len(), 3);
        assert!(hull.contains([10.0, 0.0]));
        assert!(hull.contains([50.0, 0.0]));
        assert!(!hull.contains([89.0, 42.0]));
        assert!(!hull.contains([10.0, 5.0]));
    }
}
