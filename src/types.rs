use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A 2D point in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Euclidean distance, computed in double precision.
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        dx.hypot(dy)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Landmark indices in the 68-point scheme.
pub mod index {
    pub const LEFT_JAW: [usize; 3] = [0, 1, 2];
    pub const RIGHT_JAW: [usize; 3] = [14, 15, 16];
    /// Jaw points around the chin, center first.
    pub const CHIN: [usize; 3] = [8, 7, 9];
    /// Eyebrow midpoints used as the top of the face.
    pub const FOREHEAD: [usize; 2] = [19, 24];

    /// Every index the classifier reads.
    pub const REQUIRED: [usize; 11] = [0, 1, 2, 7, 8, 9, 14, 15, 16, 19, 24];
}

/// Facial landmarks for one detected face.
///
/// Points follow the 68-point scheme. A detector may hand over fewer points;
/// the checked accessors report which index is missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LandmarkSet {
    pub points: Vec<Point>,
}

impl LandmarkSet {
    /// Number of points in the full 68-point scheme.
    pub const FULL: usize = 68;

    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn num_landmarks(&self) -> usize {
        self.points.len()
    }

    pub fn is_full(&self) -> bool {
        self.points.len() >= Self::FULL
    }

    /// Get a landmark by index, failing if the set is too short.
    pub fn get(&self, idx: usize) -> Result<Point> {
        self.points
            .get(idx)
            .copied()
            .ok_or(Error::IncompleteLandmarkSet {
                required: idx,
                found: self.points.len(),
            })
    }

    /// Look up several landmarks at once.
    pub fn select<const N: usize>(&self, indices: [usize; N]) -> Result<[Point; N]> {
        let mut out = [Point::zero(); N];
        for (slot, idx) in out.iter_mut().zip(indices) {
            *slot = self.get(idx)?;
        }
        Ok(out)
    }

    /// Check that every index read by the classifier is present.
    pub fn validate(&self) -> Result<()> {
        for idx in index::REQUIRED {
            self.get(idx)?;
        }
        Ok(())
    }
}

impl std::ops::Index<usize> for LandmarkSet {
    type Output = Point;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.points[idx]
    }
}

impl std::ops::IndexMut<usize> for LandmarkSet {
    fn index_mut(&mut self, idx: usize) -> &mut Self::Output {
        &mut self.points[idx]
    }
}
