//! Landmarks produced by the external detector.
//!
//! Coordinates are normalized to the camera frame: `x` and `y` in `[0, 1]`
//! with the origin top-left and `y` growing downward, `z` a relative depth that
//! gets more negative toward the camera.

pub mod topology;

use nalgebra::{Point2, Point3};

use crate::error::{ComposeError, Result};

pub type Landmark = Point3<f32>;

/// Index-addressed landmarks for one detected face or hand in one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    // construct from a flat [x0, y0, z0, x1, y1, z1, ...] buffer; a trailing
    // partial triple is dropped
    pub fn from_flat(values: &[f32]) -> Self {
        let points = values
            .chunks_exact(3)
            .map(|c| Landmark::new(c[0], c[1], c[2]))
            .collect();
        Self { points }
    }

    pub fn get_landmark(&self, index: usize) -> Option<Landmark> {
        self.points.get(index).copied()
    }

    /// Like [`get_landmark`](Self::get_landmark) but reports the gap as a
    /// [`ComposeError::MissingLandmark`].
    pub fn landmark(&self, index: usize) -> Result<Landmark> {
        self.get_landmark(index).ok_or(ComposeError::MissingLandmark {
            index,
            len: self.points.len(),
        })
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn distance(&self, a: usize, b: usize) -> Result<f32> {
        let p1 = self.landmark(a)?;
        let p2 = self.landmark(b)?;
        Ok((p1 - p2).norm())
    }

    /// Min and max corners of the normalized x/y extent, `None` for an empty set.
    pub fn xy_bounds(&self) -> Option<(Point2<f32>, Point2<f32>)> {
        let first = self.points.first()?;
        let mut min = Point2::new(first.x, first.y);
        let mut max = min;

        for p in self.points.iter().skip(1) {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }

        Some((min, max))
    }
}

impl From<Vec<Landmark>> for LandmarkSet {
    fn from(points: Vec<Landmark>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Landmark> for LandmarkSet {
    fn from_iter<I: IntoIterator<Item = Landmark>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
