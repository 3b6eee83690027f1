use crate::frames::FrameKind;
use crate::marker::MarkerId;
use thiserror::Error;

/// Lookup failures inside the scene graph.
///
/// None of these are fatal: per-frame callers log them and skip the step.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    #[error("marker {0} is not in the current page")]
    MissingMarker(MarkerId),
    #[error("no satellite is present in the scene")]
    MissingSatellite,
    #[error("frame {0:?} is hidden")]
    HiddenFrame(FrameKind),
    #[error("marker {0} sits at the frame origin, direction is undefined")]
    DegenerateDirection(MarkerId),
    #[error("unknown location type `{0}`")]
    UnknownLocation(String),
}
