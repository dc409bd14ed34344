//! Game targets and their random placement inside the frame.

use nalgebra::Point2;
use rand::Rng;

use super::Viewport;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub id: u64,
    /// Center in frame pixels.
    pub position: Point2<f32>,
    pub radius: f32,
}

// [radius + margin, extent - radius - margin]; collapses to the middle when the
// frame is too small to hold the target
fn spawn_axis<R: Rng + ?Sized>(rng: &mut R, extent: f32, radius: f32, margin: f32) -> f32 {
    let lo = radius + margin;
    let hi = extent - radius - margin;
    if hi < lo {
        return extent * 0.5;
    }
    rng.gen_range(lo..=hi)
}

/// Random target center that keeps the whole target plus `margin` inside the
/// frame.
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    viewport: Viewport,
    radius: f32,
    margin: f32,
) -> Point2<f32> {
    Point2::new(
        spawn_axis(rng, viewport.width, radius, margin),
        spawn_axis(rng, viewport.height, radius, margin),
    )
}
