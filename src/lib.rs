pub mod camera;
pub mod composer;
pub mod config;
pub mod error;
pub mod game;
pub mod landmarks;
pub mod mesh;
pub mod overlay;
pub mod pose;

pub use camera::PerspectiveCamera;
pub use composer::{FrameInput, FrameOutput, SceneComposer, SurfaceFrame};
pub use config::SceneConfig;
pub use error::{Collaborator, ComposeError, ErrorKind, Result};
pub use game::gesture::Gesture;
pub use game::{GameEvent, HandObservation, HandReport, TargetGame, Viewport};
pub use landmarks::{Landmark, LandmarkSet};
pub use mesh::{Mesh, Vertex};
pub use pose::ObjectPose;
