//! Uniform sphere sampling.
//!
//! Every layout in this crate starts from points spread evenly over the unit
//! sphere. Points come from a golden-angle (Fibonacci) spiral: latitude steps
//! uniformly in `y`, azimuth advances by `2π / φ` each step, which avoids the
//! pole clustering of naive latitude/longitude grids.
//!
//! ```text
//!   i = 0        y ≈ +1   (north)
//!   i = n/2      y ≈  0   (equator)
//!   i = n-1      y ≈ -1   (south)
//! ```
//!
//! Output is a pure function of `(i, n)`; there is no entropy source.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A position in 3D space.
pub type Position = [f64; 3];

/// The golden ratio.
const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// A unit-length direction on the sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpherePoint {
    pub nx: f64,
    pub ny: f64,
    pub nz: f64,
}

impl SpherePoint {
    /// The `i`-th of `n` spiral points.
    pub fn spiral(i: usize, n: usize) -> Self {
        let cos_phi = 1.0 - (2.0 * (i as f64 + 0.5)) / n as f64;
        let sin_phi = (1.0 - cos_phi * cos_phi).max(0.0).sqrt();
        let theta = 2.0 * PI * i as f64 / GOLDEN_RATIO;

        Self {
            nx: sin_phi * theta.cos(),
            ny: cos_phi,
            nz: sin_phi * theta.sin(),
        }
    }

    /// Euclidean norm (≈1 for generated points).
    pub fn magnitude(&self) -> f64 {
        (self.nx * self.nx + self.ny * self.ny + self.nz * self.nz).sqrt()
    }

    pub fn to_array(self) -> Position {
        [self.nx, self.ny, self.nz]
    }

    /// Normalize an arbitrary direction. Zero vectors map to the north pole.
    pub fn from_direction(v: Position) -> Self {
        let norm = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        if norm < 1e-12 {
            return Self {
                nx: 0.0,
                ny: 1.0,
                nz: 0.0,
            };
        }
        Self {
            nx: v[0] / norm,
            ny: v[1] / norm,
            nz: v[2] / norm,
        }
    }
}

/// Generate `n` evenly spaced unit-sphere points.
///
/// `n = 0` yields an empty vector. Two calls with the same `n` return
/// bit-identical output.
pub fn generate(n: usize) -> Vec<SpherePoint> {
    (0..n).map(|i| SpherePoint::spiral(i, n)).collect()
}

/// Scale a unit direction onto a sphere of the given radius.
#[inline]
pub fn scale(point: &SpherePoint, radius: f64) -> Position {
    [point.nx * radius, point.ny * radius, point.nz * radius]
}

/// Euclidean distance between two points, each drawn on its own sphere.
///
/// Symmetric, and zero when both scaled points coincide.
#[inline]
pub fn distance(a: &SpherePoint, radius_a: f64, b: &SpherePoint, radius_b: f64) -> f64 {
    euclidean(&scale(a, radius_a), &scale(b, radius_b))
}

/// Plain Euclidean distance between two positions.
#[inline]
pub fn euclidean(a: &Position, b: &Position) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}
