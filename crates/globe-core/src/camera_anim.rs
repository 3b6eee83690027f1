//! Camera fly-to animations and station following.

use crate::constants::{
    CAMERA_ANIMATION_MS, FOLLOW_LERP_PER_FRAME, MOBILE_CONTENT_AREA_FRACTION, ZOOM_TARGET_DISTANCE,
};
use crate::context::InteractionContext;
use crate::error::SceneError;
use crate::frames::marker_world_position;
use crate::geo::wrap_angle;
use crate::marker::MarkerId;
use crate::state::{Camera, Viewport};
use glam::{Vec2, Vec3};

/// View to come back to after zooming into a marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSnapshot {
    pub camera_position: Vec3,
    pub globe_rotation: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraEvent {
    ZoomCompleted(MarkerId),
    ResetCompleted,
    ReturnCompleted,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Flight {
    ToMarker {
        marker: MarkerId,
        from: Vec3,
        to: Vec3,
    },
    /// Back to a fixed pose, looking at the origin, globe rotation eased too.
    ToPose {
        from: Vec3,
        to: Vec3,
        from_rotation: Vec2,
        to_rotation: Vec2,
        restoring: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ActiveFlight {
    flight: Flight,
    start_ms: f64,
}

#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Downward shift of the look point that lifts `look_point` into the centre
/// of the content area on mobile; zero on desktop.
///
/// The content area is the top part of the screen left above the info
/// panel. The pixel distance between its centre and the screen centre is
/// converted to world units at the look point's depth.
pub fn mobile_look_offset(camera: &Camera, viewport: &Viewport, eye: Vec3, look_point: Vec3) -> Vec3 {
    if !viewport.is_mobile() {
        return Vec3::ZERO;
    }
    let to_point = look_point - eye;
    let Some(forward) = to_point.try_normalize() else {
        return Vec3::ZERO;
    };
    let Some(right) = forward.cross(camera.up).try_normalize() else {
        return Vec3::ZERO;
    };
    let up = right.cross(forward);
    let content_centre_px = viewport.height * MOBILE_CONTENT_AREA_FRACTION * 0.5;
    let offset_px = viewport.height * 0.5 - content_centre_px;
    let world_per_px = camera.visible_height_at(to_point.length()) / viewport.height;
    up * (offset_px * world_per_px)
}

#[derive(Clone, Debug, Default)]
pub struct CameraAnimator {
    snapshot: Option<CameraSnapshot>,
    active: Option<ActiveFlight>,
    follow: Option<MarkerId>,
}

impl CameraAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<CameraSnapshot> {
        self.snapshot
    }

    pub fn clear_snapshot(&mut self) {
        if self.snapshot.take().is_some() {
            log::debug!("[camera] snapshot cleared");
        }
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    pub fn following(&self) -> Option<MarkerId> {
        self.follow
    }

    /// Fly to a point 2.5 units out above `marker`, keeping the pre-zoom view
    /// as the snapshot if none is stored yet.
    pub fn zoom_to_marker(
        &mut self,
        ctx: &mut InteractionContext,
        marker: MarkerId,
        now_ms: f64,
    ) -> Result<(), SceneError> {
        let world = {
            let m = ctx.markers.get(marker)?;
            marker_world_position(ctx, m)?
        };
        let to = world
            .try_normalize()
            .ok_or(SceneError::DegenerateDirection(marker))?
            * ZOOM_TARGET_DISTANCE;
        if self.snapshot.is_none() {
            self.snapshot = Some(CameraSnapshot {
                camera_position: ctx.camera.eye,
                globe_rotation: ctx.globe.rotation(),
            });
            log::debug!("[camera] snapshot captured");
        }
        ctx.hide_celestial_panels();
        self.follow = None;
        self.active = Some(ActiveFlight {
            flight: Flight::ToMarker {
                marker,
                from: ctx.camera.eye,
                to,
            },
            start_ms: now_ms,
        });
        log::info!("[camera] zoom to {}", marker);
        Ok(())
    }

    /// Fly back to the default distance on +Z with the globe unrotated.
    pub fn reset_to_default(&mut self, ctx: &mut InteractionContext, now_ms: f64) {
        ctx.apply_panel_visibility();
        let to = Vec3::Z * ctx.default_camera_distance();
        self.fly_to_pose(ctx, to, Vec2::ZERO, false, now_ms);
        log::info!("[camera] reset to default");
    }

    /// Fly back to the stored snapshot; without one this is a reset.
    pub fn return_to_previous_view(&mut self, ctx: &mut InteractionContext, now_ms: f64) {
        match self.snapshot {
            Some(snapshot) => {
                ctx.apply_panel_visibility();
                self.fly_to_pose(
                    ctx,
                    snapshot.camera_position,
                    snapshot.globe_rotation,
                    true,
                    now_ms,
                );
                log::info!("[camera] return to previous view");
            }
            None => self.reset_to_default(ctx, now_ms),
        }
    }

    fn fly_to_pose(
        &mut self,
        ctx: &mut InteractionContext,
        to: Vec3,
        to_rotation: Vec2,
        restoring: bool,
        now_ms: f64,
    ) {
        self.follow = None;
        // Unwind accumulated yaw so the globe turns the short way back.
        let from_rotation = Vec2::new(ctx.globe.pitch, wrap_angle(ctx.globe.yaw));
        let to_rotation = Vec2::new(
            to_rotation.x,
            from_rotation.y + wrap_angle(to_rotation.y - from_rotation.y),
        );
        ctx.globe.set_rotation(from_rotation);
        self.active = Some(ActiveFlight {
            flight: Flight::ToPose {
                from: ctx.camera.eye,
                to,
                from_rotation,
                to_rotation,
                restoring,
            },
            start_ms: now_ms,
        });
    }

    pub fn start_following(&mut self, marker: MarkerId) {
        self.follow = Some(marker);
        log::debug!("[camera] following {}", marker);
    }

    pub fn stop_following(&mut self) {
        self.follow = None;
    }

    /// Drop a running flight without finishing it.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Advance the running flight, or the follow pursuit when none runs.
    pub fn tick(&mut self, ctx: &mut InteractionContext, now_ms: f64) -> Option<CameraEvent> {
        let Some(active) = self.active else {
            self.follow_step(ctx);
            return None;
        };
        let t = ((now_ms - active.start_ms) / CAMERA_ANIMATION_MS).clamp(0.0, 1.0) as f32;
        let eased = ease_out_cubic(t);
        let done = t >= 1.0;

        match active.flight {
            Flight::ToMarker { marker, from, to } => {
                let eye = from.lerp(to, eased);
                ctx.camera.eye = eye;
                match ctx
                    .markers
                    .get(marker)
                    .and_then(|m| marker_world_position(ctx, m))
                {
                    Ok(point) => look_with_offset(ctx, eye, point),
                    Err(e) => {
                        log::trace!("[camera] zoom look skipped: {}", e);
                        ctx.camera.look_at(Vec3::ZERO);
                    }
                }
                if done {
                    self.active = None;
                    return Some(CameraEvent::ZoomCompleted(marker));
                }
            }
            Flight::ToPose {
                from,
                to,
                from_rotation,
                to_rotation,
                restoring,
            } => {
                ctx.camera.eye = from.lerp(to, eased);
                ctx.camera.look_at(Vec3::ZERO);
                ctx.globe
                    .set_rotation(from_rotation.lerp(to_rotation, eased));
                if done {
                    self.active = None;
                    self.snapshot = None;
                    return Some(if restoring {
                        CameraEvent::ReturnCompleted
                    } else {
                        CameraEvent::ResetCompleted
                    });
                }
            }
        }
        None
    }

    fn follow_step(&mut self, ctx: &mut InteractionContext) {
        let Some(marker) = self.follow else {
            return;
        };
        let point = match ctx
            .markers
            .get(marker)
            .and_then(|m| marker_world_position(ctx, m))
        {
            Ok(p) => p,
            Err(e) => {
                log::trace!("[camera] follow skipped: {}", e);
                return;
            }
        };
        let Some(dir) = point.try_normalize() else {
            return;
        };
        let eye = ctx
            .camera
            .eye
            .lerp(dir * ZOOM_TARGET_DISTANCE, FOLLOW_LERP_PER_FRAME);
        ctx.camera.eye = eye;
        look_with_offset(ctx, eye, point);
    }
}

fn look_with_offset(ctx: &mut InteractionContext, eye: Vec3, point: Vec3) {
    let offset = mobile_look_offset(&ctx.camera, &ctx.viewport, eye, point);
    ctx.camera.look_at(point - offset);
}
