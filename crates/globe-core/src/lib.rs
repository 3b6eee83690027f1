//! Platform-free interaction core of the timeline globe.
//!
//! Gestures, marker hover and pulse rings, camera fly-to animations and the
//! auto-rotate/recenter controller, all driven by explicit `now_ms`
//! timestamps so the same code runs in the browser and in host tests.

pub mod autorotate;
pub mod camera_anim;
pub mod constants;
pub mod context;
pub mod controls;
pub mod error;
pub mod frames;
pub mod geo;
pub mod gesture;
pub mod hover;
pub mod layout;
pub mod marker;
pub mod picking;
pub mod pulse;
pub mod services;
pub mod state;
pub mod timers;
pub mod zoom;

pub use context::InteractionContext;
pub use controls::{ClickOutcome, ControlsConfig, GlobeControls, HostEffect};
pub use error::SceneError;
pub use frames::FrameKind;
pub use gesture::PointerKind;
pub use marker::{EventPayload, LocationType, MarkerId, MarkerSpec};
pub use state::{StationPose, Viewport};
