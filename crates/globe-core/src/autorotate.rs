//! Idle auto-rotation and recentering onto the open event marker.
//!
//! The controller is a three-state machine driven once per frame. Gestures
//! and hover put it into [`AutoRotateMode::Idle`] synchronously; a single
//! resume deadline brings it back to spinning, or to recentering when an
//! event is open.
//!
//! Recentering measures how far the marker sits from the point under the
//! camera as `|Δlat| + |Δlon|` and walks the globe toward zero at a constant
//! angular speed. The walk is taken in (lat, lon) space and mapped onto
//! pitch/yaw through the local Jacobian, so every frame reduces the distance
//! even though the globe's Euler rotation couples the two axes.

use crate::constants::{
    AUTO_ROTATE_SPEED, RECENTER_DONE_THRESHOLD, RECENTER_FADE_RATIO, RECENTER_JACOBIAN_EPS,
    RECENTER_RESTART_RATIO, RECENTER_STEP,
};
use crate::context::InteractionContext;
use crate::frames::FrameKind;
use crate::geo::{wrap_angle, LatLon};
use crate::gesture::{clamp_pitch, RotationVelocity};
use crate::marker::MarkerId;
use crate::state::Globe;
use crate::timers::TimerSlot;
use glam::{Mat2, Vec2, Vec3};

/// Levenberg damping added to `J·Jᵀ` before inverting.
const JACOBIAN_DAMPING: f32 = 1e-3;
/// Largest pitch/yaw change a single recenter step may apply.
const MAX_STEP_RADIANS: f32 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoRotateMode {
    Idle,
    FreeSpin,
    Recentering,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RecenterState {
    pub initial_angle_diff: Option<f32>,
    pub fade_in_triggered: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecenterEvent {
    /// Distance dropped to a tenth of where the approach started. Fires once per approach.
    NinetyPercent,
    /// The marker is under the camera; the controller is idle again.
    Converged,
    /// The marker cannot be brought any closer (off the globe, gone, or at a
    /// pose the globe cannot rotate out of); the controller is idle again.
    Stalled,
}

/// `|Δlat| + |Δlon|` for a (Δlat, Δlon) pair.
#[inline]
pub fn angle_diff(delta: (f32, f32)) -> f32 {
    delta.0.abs() + delta.1.abs()
}

/// Signed (Δlat, Δlon) that would bring the marker under the camera, with
/// the globe at `rotation`.
pub fn recenter_delta(
    globe: &Globe,
    rotation: Vec2,
    marker_local: Vec3,
    camera_eye: Vec3,
) -> Option<(f32, f32)> {
    let camera = LatLon::of(camera_eye - globe.position)?;
    let marker = LatLon::of(Globe::rotation_for(rotation) * marker_local)?;
    Some(marker.delta_to(camera))
}

/// Pitch/yaw change that moves the marker by `want` in (lat, lon).
///
/// Damped least squares on the finite-difference Jacobian, so directions
/// the current pose cannot move along (a marker sitting on the pitch axis)
/// are dropped instead of blowing the step up.
fn solve_step(rotation: Vec2, marker_local: Vec3, want: Vec2) -> Option<Vec2> {
    let eps = RECENTER_JACOBIAN_EPS;
    let at = |r: Vec2| LatLon::of(Globe::rotation_for(r) * marker_local);
    let here = at(rotation)?;
    let by_pitch = at(rotation + Vec2::new(eps, 0.0))?;
    let by_yaw = at(rotation + Vec2::new(0.0, eps))?;

    // rows: lat, lon; columns: pitch, yaw
    let jacobian = Mat2::from_cols(
        Vec2::new(by_pitch.lat - here.lat, wrap_angle(by_pitch.lon - here.lon)) / eps,
        Vec2::new(by_yaw.lat - here.lat, wrap_angle(by_yaw.lon - here.lon)) / eps,
    );
    let normal =
        jacobian * jacobian.transpose() + Mat2::from_diagonal(Vec2::splat(JACOBIAN_DAMPING));
    if normal.determinant().abs() <= f32::EPSILON {
        return None;
    }
    let step = jacobian.transpose() * (normal.inverse() * want);
    if step.length_squared() <= f32::EPSILON * f32::EPSILON {
        return None;
    }
    Some(step.clamp(Vec2::splat(-MAX_STEP_RADIANS), Vec2::splat(MAX_STEP_RADIANS)))
}

/// Constant-length step along (Δlat, Δlon), never past the target.
fn constant_speed_step(delta: (f32, f32)) -> Option<Vec2> {
    let direction = Vec2::new(delta.0, delta.1).try_normalize()?;
    let step = direction * RECENTER_STEP;
    Some(Vec2::new(
        step.x.clamp(-delta.0.abs(), delta.0.abs()),
        step.y.clamp(-delta.1.abs(), delta.1.abs()),
    ))
}

#[derive(Clone, Debug)]
pub struct AutoRotateController {
    enabled: bool,
    mode: AutoRotateMode,
    recenter: RecenterState,
    resume: TimerSlot<()>,
}

impl AutoRotateController {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            mode: if enabled {
                AutoRotateMode::FreeSpin
            } else {
                AutoRotateMode::Idle
            },
            recenter: RecenterState::default(),
            resume: TimerSlot::default(),
        }
    }

    pub fn mode(&self) -> AutoRotateMode {
        self.mode
    }

    pub fn recenter_state(&self) -> RecenterState {
        self.recenter
    }

    pub fn resume_pending(&self) -> bool {
        self.resume.is_pending()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.interrupt();
        }
    }

    /// Stop rotating right now and forget any pending resume.
    pub fn interrupt(&mut self) {
        if self.mode != AutoRotateMode::Idle {
            log::debug!("[autorotate] {:?} -> Idle", self.mode);
        }
        self.mode = AutoRotateMode::Idle;
        self.resume.clear();
    }

    /// Resume after `delay_ms`, replacing any earlier pending resume. No-op
    /// while disabled.
    pub fn schedule_resume(&mut self, now_ms: f64, delay_ms: f64) {
        if self.enabled {
            self.resume.schedule(now_ms, delay_ms, ());
        }
    }

    pub fn reset_recenter(&mut self) {
        self.recenter = RecenterState::default();
    }

    /// One frame of auto-rotation. `open_event` is the marker whose event
    /// overlay is showing, if any.
    pub fn tick(
        &mut self,
        ctx: &mut InteractionContext,
        now_ms: f64,
        open_event: Option<MarkerId>,
        velocity: &mut RotationVelocity,
    ) -> Option<RecenterEvent> {
        if self.resume.take_due(now_ms).is_some() && self.enabled {
            self.mode = if open_event.is_some() {
                velocity.clear();
                AutoRotateMode::Recentering
            } else {
                AutoRotateMode::FreeSpin
            };
            log::debug!("[autorotate] resume -> {:?}", self.mode);
        }

        let event = match (self.mode, open_event) {
            (AutoRotateMode::Idle, _) => None,
            (AutoRotateMode::FreeSpin, _) => {
                ctx.globe.yaw += AUTO_ROTATE_SPEED;
                None
            }
            (AutoRotateMode::Recentering, None) => {
                self.mode = AutoRotateMode::FreeSpin;
                self.reset_recenter();
                None
            }
            (AutoRotateMode::Recentering, Some(marker)) => self.recenter_step(ctx, marker, velocity),
        };
        ctx.globe.pitch = clamp_pitch(ctx.globe.pitch);
        event
    }

    fn recenter_step(
        &mut self,
        ctx: &mut InteractionContext,
        marker: MarkerId,
        velocity: &mut RotationVelocity,
    ) -> Option<RecenterEvent> {
        let local = match ctx.markers.get(marker) {
            Ok(m) if m.frame == FrameKind::Globe => m.position,
            Ok(m) => {
                log::debug!("[recenter] {} is on {:?}, nothing to rotate", marker, m.frame);
                return Some(self.stall());
            }
            Err(e) => {
                log::trace!("[recenter] {}", e);
                return Some(self.stall());
            }
        };
        let rotation = ctx.globe.rotation();
        let Some(delta) = recenter_delta(&ctx.globe, rotation, local, ctx.camera.eye) else {
            return Some(self.stall());
        };
        let diff = angle_diff(delta);

        let initial = match self.recenter.initial_angle_diff {
            Some(initial) if diff < initial * RECENTER_RESTART_RATIO => initial,
            _ => {
                log::debug!("[recenter] approach {} from {:.3} rad", marker, diff);
                self.recenter = RecenterState {
                    initial_angle_diff: Some(diff),
                    fade_in_triggered: false,
                };
                diff
            }
        };

        if diff <= RECENTER_DONE_THRESHOLD {
            log::debug!("[recenter] converged on {}", marker);
            self.mode = AutoRotateMode::Idle;
            self.reset_recenter();
            velocity.clear();
            return Some(RecenterEvent::Converged);
        }

        let mut event = None;
        if !self.recenter.fade_in_triggered && diff <= initial * RECENTER_FADE_RATIO {
            self.recenter.fade_in_triggered = true;
            event = Some(RecenterEvent::NinetyPercent);
        }

        let step = constant_speed_step(delta).and_then(|want| solve_step(rotation, local, want));
        let Some(step) = step else {
            return Some(self.stall());
        };
        let next = Vec2::new(clamp_pitch(rotation.x + step.x), rotation.y + step.y);
        let progressed = recenter_delta(&ctx.globe, next, local, ctx.camera.eye)
            .is_some_and(|d| angle_diff(d) < diff);
        if !progressed {
            return Some(self.stall());
        }
        ctx.globe.set_rotation(next);
        event
    }

    /// The marker cannot be brought any closer; give up this approach.
    fn stall(&mut self) -> RecenterEvent {
        log::debug!("[recenter] no further progress, idling");
        self.mode = AutoRotateMode::Idle;
        self.reset_recenter();
        RecenterEvent::Stalled
    }
}

impl Default for AutoRotateController {
    fn default() -> Self {
        Self::new(true)
    }
}
