//! Per-frame driver.
//!
//! [`SceneComposer::compose`] runs every enabled component on one frame of
//! detector output and returns what the renderer and the game host should
//! apply. Components are independent: a failure in one only withholds that
//! component's output for the frame.

use std::collections::HashSet;

use nalgebra::Matrix4;
use tracing::{debug, info, warn};

use crate::camera::PerspectiveCamera;
use crate::config::SceneConfig;
use crate::error::{Collaborator, ComposeError, Result};
use crate::game::{GameEvent, HandObservation, HandReport, TargetGame, Viewport};
use crate::landmarks::LandmarkSet;
use crate::mesh::deform::deform;
use crate::mesh::ring::{triangulate, BoundaryRing};
use crate::mesh::{LineSegment, Mesh};
use crate::pose::canonical::CanonicalModel;
use crate::pose::{ObjectPose, Retargeter};

const REQUIRED: [Collaborator; 3] = [
    Collaborator::Camera,
    Collaborator::Detector,
    Collaborator::Renderer,
];

/// Detector output for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameInput {
    /// One set per detected face; only the first is used.
    pub faces: Vec<LandmarkSet>,
    pub transform: Option<Matrix4<f32>>,
    pub hands: Vec<HandObservation>,
    pub viewport: Viewport,
}

impl FrameInput {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            faces: Vec::new(),
            transform: None,
            hands: Vec::new(),
            viewport,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceFrame {
    pub mesh: Mesh,
    pub debug_lines: Vec<LineSegment>,
}

/// What changed this frame. `None` means "keep what was rendered last".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameOutput {
    pub surface: Option<SurfaceFrame>,
    pub pose: Option<ObjectPose>,
    pub hands: Vec<HandReport>,
    pub events: Vec<GameEvent>,
}

pub struct SceneComposer {
    config: SceneConfig,
    ring: BoundaryRing,
    camera: PerspectiveCamera,
    canonical: Option<CanonicalModel>,
    retargeter: Retargeter,
    game: Option<TargetGame>,
    ready: HashSet<Collaborator>,
}

impl SceneComposer {
    pub fn new(config: SceneConfig, camera: PerspectiveCamera) -> Result<Self> {
        config.validate()?;
        let ring = BoundaryRing::new(config.ring.indices.clone())?;

        Ok(Self {
            config,
            ring,
            camera,
            canonical: None,
            retargeter: Retargeter::new(),
            game: None,
            ready: HashSet::new(),
        })
    }

    /// Enables transform estimation for frames that arrive without a matrix.
    pub fn with_canonical_model(mut self, model: CanonicalModel) -> Self {
        self.canonical = Some(model);
        self
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Replaces the configuration; an invalid one is rejected and the
    /// current configuration stays in effect.
    pub fn set_config(&mut self, config: SceneConfig) -> Result<()> {
        if let Err(e) = config.validate() {
            warn!(error = %e, "configuration rejected");
            return Err(e);
        }

        self.ring = BoundaryRing::new(config.ring.indices.clone())?;
        self.config = config;
        Ok(())
    }

    pub fn set_camera(&mut self, camera: PerspectiveCamera) {
        self.camera = camera;
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn mark_ready(&mut self, collaborator: Collaborator) {
        if self.ready.insert(collaborator) {
            info!(%collaborator, "collaborator ready");
        }
    }

    pub fn mark_unavailable(&mut self, collaborator: Collaborator) {
        if self.ready.remove(&collaborator) {
            info!(%collaborator, "collaborator unavailable");
        }
    }

    pub fn is_ready(&self) -> bool {
        REQUIRED.iter().all(|c| self.ready.contains(c))
    }

    pub fn pose(&self) -> &ObjectPose {
        self.retargeter.pose()
    }

    pub fn game(&self) -> Option<&TargetGame> {
        self.game.as_ref()
    }

    /// Processes one frame. Returns `ResourceUnavailable` without touching any
    /// state until every collaborator has signalled readiness.
    pub fn compose(&mut self, frame: &FrameInput) -> Result<FrameOutput> {
        if let Some(missing) = REQUIRED.iter().find(|c| !self.ready.contains(c)) {
            return Err(ComposeError::ResourceUnavailable(*missing));
        }

        let empty = LandmarkSet::empty();
        let face = frame.faces.first().unwrap_or(&empty);

        let mut output = FrameOutput {
            surface: self.compose_surface(face),
            pose: self.compose_pose(face, frame.transform.as_ref()),
            ..FrameOutput::default()
        };

        if self.config.game.enabled {
            if frame.viewport.is_valid() {
                let config = &self.config.game;
                let game = self.game.get_or_insert_with(|| TargetGame::new(config, frame.viewport));

                output.hands = game.update(config, &frame.hands, frame.viewport);
                output.events = game.drain_events();

                for event in output.events.iter() {
                    if let GameEvent::ScoreChanged(score) = event {
                        info!(score, "score changed");
                    }
                }
            } else {
                debug!(viewport = ?frame.viewport, "game skipped: invalid viewport");
            }
        }

        Ok(output)
    }

    fn compose_surface(&self, face: &LandmarkSet) -> Option<SurfaceFrame> {
        if !self.config.ring.enabled || face.is_empty() {
            return None;
        }

        let mesh = match triangulate(&self.ring, face) {
            Ok(mesh) => mesh,
            Err(e) => {
                debug!(error = %e, kind = ?e.kind(), "surface skipped");
                return None;
            }
        };

        if self.config.deform.enabled {
            let deformed = deform(&mesh, &self.config.deform);
            Some(SurfaceFrame {
                mesh: deformed.mesh,
                debug_lines: deformed.debug_lines,
            })
        } else {
            Some(SurfaceFrame {
                mesh,
                debug_lines: Vec::new(),
            })
        }
    }

    fn compose_pose(
        &mut self,
        face: &LandmarkSet,
        transform: Option<&Matrix4<f32>>,
    ) -> Option<ObjectPose> {
        if !self.config.retarget.enabled {
            return None;
        }

        let estimated;
        let transform = match (transform, &self.canonical) {
            (Some(t), _) => Some(t),
            (None, Some(model)) if !face.is_empty() => {
                match model.estimate_transform(face, &self.camera) {
                    Ok(m) => {
                        estimated = m;
                        Some(&estimated)
                    }
                    Err(e) => {
                        debug!(error = %e, "transform estimation failed");
                        None
                    }
                }
            }
            (None, _) => None,
        };

        match self.retargeter.update(&self.config.retarget, face, transform, &self.camera) {
            Ok(pose) => Some(*pose),
            Err(e) => {
                debug!(error = %e, kind = ?e.kind(), "pose skipped");
                None
            }
        }
    }
}
