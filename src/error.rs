//! Error types for the scene composer.
//!
//! Every error here is expected during normal operation (first frames before a
//! face is visible, a hand leaving the frame, ...). Callers skip the dependent
//! output for the current frame instead of aborting.

use std::fmt;

use thiserror::Error;

/// External collaborators the composer waits on before doing any work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collaborator {
    Detector,
    Renderer,
    Camera,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Collaborator::Detector => "landmark detector",
            Collaborator::Renderer => "renderer",
            Collaborator::Camera => "camera",
        };
        f.write_str(name)
    }
}

/// Coarse classification used by callers deciding how to degrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingInput,
    DegenerateGeometry,
    ResourceUnavailable,
    Configuration,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComposeError {
    #[error("no landmarks in this frame")]
    NoLandmarks,

    #[error("landmark {index} missing (set has {len} points)")]
    MissingLandmark { index: usize, len: usize },

    #[error("boundary ring has {0} usable points, need at least 3")]
    RingTooShort(usize),

    #[error("boundary ring length {0} is odd")]
    OddRing(usize),

    #[error("boundary ring repeats landmark index {0}")]
    DuplicateRingIndex(usize),

    #[error("degenerate geometry: {0}")]
    Degenerate(&'static str),

    #[error("{0} not ready")]
    ResourceUnavailable(Collaborator),

    #[error("invalid configuration value: {field} - {message}")]
    InvalidConfig { field: &'static str, message: String },
}

impl ComposeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ComposeError::NoLandmarks | ComposeError::MissingLandmark { .. } => {
                ErrorKind::MissingInput
            }
            ComposeError::RingTooShort(_)
            | ComposeError::OddRing(_)
            | ComposeError::DuplicateRingIndex(_)
            | ComposeError::Degenerate(_) => ErrorKind::DegenerateGeometry,
            ComposeError::ResourceUnavailable(_) => ErrorKind::ResourceUnavailable,
            ComposeError::InvalidConfig { .. } => ErrorKind::Configuration,
        }
    }

    pub(crate) fn invalid_config(field: &'static str, message: impl Into<String>) -> Self {
        ComposeError::InvalidConfig {
            field,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ComposeError>;
