//! Interaction tuning constants.
//!
//! Values are hand-tuned UX numbers. They are kept literal and grouped by the
//! component that reads them.
use std::f32::consts::FRAC_PI_2;

// Scene layout
pub const GLOBE_RADIUS: f32 = 1.0; // globe is a unit sphere in its local space
pub const MARKER_PICK_RADIUS: f32 = 0.035; // ray-sphere radius per unit of marker scale
pub const RING_SURFACE_OFFSET: f32 = 0.002; // lift decals off the surface to avoid z-fighting

// Gestures
pub const ROTATION_SPEED_PER_PX: f32 = 0.005; // radians of globe rotation per dragged pixel
pub const PITCH_LIMIT: f32 = FRAC_PI_2; // pitch clamp, prevents flipping over the poles
pub const MOMENTUM_DECAY: f32 = 0.95; // per-frame velocity multiplier after release
pub const MOMENTUM_EPSILON: f32 = 1e-4; // velocity below this is snapped to zero
pub const TAP_MOVE_THRESHOLD_PX: f32 = 5.0; // touch travel that turns a tap into a drag

// Zoom
pub const WHEEL_ZOOM_SENSITIVITY: f32 = 0.001; // distance per wheel delta unit
pub const BUTTON_ZOOM_STEP: f32 = 0.4; // distance per zoom button press
pub const MIN_CAMERA_DISTANCE: f32 = 1.5;
pub const MAX_CAMERA_DISTANCE_DESKTOP: f32 = 5.0;
pub const MAX_CAMERA_DISTANCE_MOBILE_PORTRAIT: f32 = 7.0;

// Auto-rotate / recenter
pub const AUTO_ROTATE_SPEED: f32 = 0.002; // yaw radians per frame while free-spinning
pub const RESUME_DELAY_IDLE_MS: f64 = 5000.0;
pub const RESUME_DELAY_EVENT_OPEN_MS: f64 = 2000.0;
pub const RESUME_DELAY_HOVER_EXIT_MS: f64 = 500.0;
pub const RECENTER_AFTER_ZOOM_MS: f64 = 2000.0;
pub const RECENTER_STEP: f32 = 0.004; // constant angular step per frame
pub const RECENTER_DONE_THRESHOLD: f32 = 0.01;
pub const RECENTER_RESTART_RATIO: f32 = 1.1; // diff grew past 110% of the initial => restart
pub const RECENTER_FADE_RATIO: f32 = 0.1; // 90% converged
pub const RECENTER_JACOBIAN_EPS: f32 = 1e-3; // finite-difference step for the pitch/yaw jacobian

// Pulse rings
pub const PULSE_RING_DURATION_MS: f64 = 1200.0;
pub const PULSE_RING_START_SCALE: f32 = 1.0;
pub const PULSE_RING_MAX_SCALE: f32 = 4.0;
pub const PULSE_RING_MAX_OPACITY: f32 = 0.9;
pub const PULSE_WAVE_INTERVAL_MS: f64 = 1500.0;

// Breathing
pub const BREATH_RATE_PER_MS: f32 = 0.008; // radians of phase per millisecond
pub const BREATH_SCALE_MIN: f32 = 0.85;
pub const BREATH_SCALE_MAX: f32 = 1.20;

// Camera animation
pub const ZOOM_TARGET_DISTANCE: f32 = 2.5;
pub const CAMERA_ANIMATION_MS: f64 = 500.0;
pub const DEFAULT_CAMERA_DISTANCE: f32 = 3.5;
pub const DEFAULT_CAMERA_DISTANCE_MOBILE_PORTRAIT: f32 = 5.5;
pub const FOLLOW_LERP_PER_FRAME: f32 = 0.1;
pub const CAMERA_FOV_Y: f32 = std::f32::consts::FRAC_PI_4;
pub const CAMERA_ZNEAR: f32 = 0.01;
pub const CAMERA_ZFAR: f32 = 100.0;

// Layout
pub const MOBILE_BREAKPOINT_PX: f32 = 768.0;
pub const MOBILE_CONTENT_AREA_FRACTION: f32 = 0.5; // top share of the screen left above the info panel
pub const PANEL_SIZE_DESKTOP: f32 = 0.22; // panel height as a fraction of the visible height
pub const PANEL_SIZE_MOBILE_PORTRAIT: f32 = 0.14;
pub const PANEL_FADE_PER_FRAME: f32 = 0.08;
pub const PANEL_HOVER_EMISSIVE: f32 = 0.35;

// Station
pub const STATION_PIN_MIN_LENGTH: f32 = 1e-3; // shorter pin lines are not emitted
