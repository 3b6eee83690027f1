use crate::constants::{BUTTON_ZOOM_STEP, MIN_CAMERA_DISTANCE, WHEEL_ZOOM_SENSITIVITY};
use crate::context::InteractionContext;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZoomInput {
    /// Raw wheel `deltaY`; positive scrolls away from the globe.
    Wheel(f32),
    In,
    Out,
}

impl ZoomInput {
    pub fn distance_delta(self) -> f32 {
        match self {
            ZoomInput::Wheel(delta_y) => delta_y * WHEEL_ZOOM_SENSITIVITY,
            ZoomInput::In => -BUTTON_ZOOM_STEP,
            ZoomInput::Out => BUTTON_ZOOM_STEP,
        }
    }
}

/// Move the camera along its local Z axis, clamped to the allowed distance
/// band. Orientation is kept by moving the look target by the same offset.
pub fn apply_zoom(ctx: &mut InteractionContext, input: ZoomInput) -> f32 {
    let delta = input.distance_delta();
    let backward = -ctx.camera.forward();
    let eye = ctx.camera.eye + backward * delta;
    let clamped = clamp_distance(eye.length(), ctx.max_camera_distance());
    let eye = eye.normalize_or_zero() * clamped;
    let shift = eye - ctx.camera.eye;
    ctx.camera.eye = eye;
    ctx.camera.target += shift;
    log::debug!("[zoom] {:?} -> distance {:.2}", input, clamped);
    clamped
}

/// Pull the camera back inside the band after a viewport change.
pub fn clamp_camera_distance(ctx: &mut InteractionContext) {
    let distance = ctx.camera.distance();
    let clamped = clamp_distance(distance, ctx.max_camera_distance());
    if (clamped - distance).abs() > f32::EPSILON {
        let eye = ctx.camera.eye.normalize_or_zero() * clamped;
        let shift = eye - ctx.camera.eye;
        ctx.camera.eye = eye;
        ctx.camera.target += shift;
    }
}

#[inline]
fn clamp_distance(distance: f32, max: f32) -> f32 {
    distance.clamp(MIN_CAMERA_DISTANCE, max)
}
