//! Immutable scene configuration.
//!
//! The host (UI sliders, toggles, ...) builds a [`SceneConfig`] and hands it to
//! the composer. Component algorithms only ever read it.

use crate::error::{ComposeError, Result};
use crate::game::gesture::Gesture;
use crate::landmarks::topology::face;
use crate::mesh::ring::BoundaryRing;

/// Vertical displacement applied by the surface deformer, in model units.
/// Tuned by eye; recalibrate together with the model scale.
pub const DEFAULT_DEFORM_AMPLITUDE: f32 = 0.1;

/// Gain applied to the pin-to-center displacement. Tuned for typical
/// face-to-camera distances; not derived.
pub const DEFAULT_DISPLACEMENT_SCALE: f32 = 10.0;

/// Distance in pixels kept between a spawned target and the frame edge.
pub const DEFAULT_SPAWN_MARGIN: f32 = 20.0;

pub const DEFAULT_TARGET_RADIUS: f32 = 30.0;

pub const DEFAULT_MIN_GESTURE_CONFIDENCE: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct RingConfig {
    pub enabled: bool,
    pub indices: Vec<usize>,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            indices: face::INNER_LIPS_RING.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeformConfig {
    pub enabled: bool,
    /// Curvature coefficient, typically in `[-1, 1]`.
    pub curvature: f32,
    pub amplitude: f32,
    /// Emit one segment per vertex from its undeformed position to the origin.
    pub debug_lines: bool,
}

impl Default for DeformConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            curvature: 0.0,
            amplitude: DEFAULT_DEFORM_AMPLITUDE,
            debug_lines: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetargetConfig {
    pub enabled: bool,
    /// Landmark the object stays anchored to.
    pub pin_vertex: usize,
    /// Landmark the pin displacement is measured from.
    pub center_landmark: usize,
    pub uniform_scale: f32,
    pub displacement_scale: f32,
}

impl Default for RetargetConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pin_vertex: face::NOSE_BRIDGE,
            center_landmark: face::NOSE_TIP,
            uniform_scale: 1.0,
            displacement_scale: DEFAULT_DISPLACEMENT_SCALE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub enabled: bool,
    pub trigger: Gesture,
    /// Classifications below this score count as [`Gesture::None`].
    pub min_confidence: f32,
    pub target_radius: f32,
    pub spawn_margin: f32,
    /// Fixed seed for reproducible target placement.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            trigger: Gesture::ClosedFist,
            min_confidence: DEFAULT_MIN_GESTURE_CONFIDENCE,
            target_radius: DEFAULT_TARGET_RADIUS,
            spawn_margin: DEFAULT_SPAWN_MARGIN,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneConfig {
    pub ring: RingConfig,
    pub deform: DeformConfig,
    pub retarget: RetargetConfig,
    pub game: GameConfig,
}

impl SceneConfig {
    pub fn validate(&self) -> Result<()> {
        BoundaryRing::new(self.ring.indices.clone())?;

        finite("deform.curvature", self.deform.curvature)?;
        finite("deform.amplitude", self.deform.amplitude)?;

        positive("retarget.uniform_scale", self.retarget.uniform_scale)?;
        finite("retarget.displacement_scale", self.retarget.displacement_scale)?;

        if !(0.0..=1.0).contains(&self.game.min_confidence) {
            return Err(ComposeError::invalid_config(
                "game.min_confidence",
                format!("{} is outside [0, 1]", self.game.min_confidence),
            ));
        }
        positive("game.target_radius", self.game.target_radius)?;
        finite("game.spawn_margin", self.game.spawn_margin)?;
        if self.game.spawn_margin < 0.0 {
            return Err(ComposeError::invalid_config("game.spawn_margin", "must not be negative"));
        }

        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn finite(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ComposeError::invalid_config(field, format!("{value} is not finite")))
    }
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ComposeError::invalid_config(field, "must be positive"))
    }
}
