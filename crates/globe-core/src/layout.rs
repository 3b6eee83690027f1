//! Moon/Mars panel placement and station pin lines.

use crate::constants::{
    GLOBE_RADIUS, PANEL_FADE_PER_FRAME, PANEL_HOVER_EMISSIVE, PANEL_SIZE_DESKTOP,
    PANEL_SIZE_MOBILE_PORTRAIT, STATION_PIN_MIN_LENGTH,
};
use crate::context::InteractionContext;
use crate::frames::{marker_world_position, FrameKind};
use crate::marker::MarkerId;
use crate::state::{Camera, Panel};
use glam::{Mat3, Quat, Vec2, Vec3};

/// Segment from the globe surface up to a marker riding the satellite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinLine {
    pub marker: MarkerId,
    pub start: Vec3,
    pub end: Vec3,
}

impl PinLine {
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// Screen anchors (NDC) for the Moon and Mars panels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelAnchors {
    pub moon: Vec2,
    pub mars: Vec2,
    /// Panel height as a fraction of the visible height at the globe.
    pub size: f32,
}

impl PanelAnchors {
    /// Side by side along the top on mobile portrait, stacked on the right otherwise.
    pub fn for_viewport(mobile_portrait: bool) -> Self {
        if mobile_portrait {
            Self {
                moon: Vec2::new(-0.45, 0.75),
                mars: Vec2::new(0.45, 0.75),
                size: PANEL_SIZE_MOBILE_PORTRAIT,
            }
        } else {
            Self {
                moon: Vec2::new(0.75, 0.35),
                mars: Vec2::new(0.75, -0.35),
                size: PANEL_SIZE_DESKTOP,
            }
        }
    }
}

/// Point on the camera-facing plane through `origin` under an NDC anchor.
pub fn anchor_on_plane(camera: &Camera, origin: Vec3, ndc: Vec2) -> Vec3 {
    let forward = camera.forward();
    let (right, up) = camera.basis();
    let depth = (origin - camera.eye).dot(forward).max(camera.znear);
    let centre = camera.eye + forward * depth;
    let half_height = camera.visible_height_at(depth) * 0.5;
    let half_width = half_height * camera.aspect;
    centre + right * (ndc.x * half_width) + up * (ndc.y * half_height)
}

/// Rotation turning a panel's +Z toward the camera, upright on screen.
pub fn billboard_rotation(camera: &Camera) -> Quat {
    let forward = camera.forward();
    let (right, up) = camera.basis();
    if right == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    Quat::from_mat3(&Mat3::from_cols(right, up, -forward))
}

/// Place, billboard and fade the auxiliary panels for this frame.
pub fn update_panels(ctx: &mut InteractionContext, hovered: Option<MarkerId>) {
    let anchors = PanelAnchors::for_viewport(ctx.viewport.is_mobile_portrait());
    let origin = ctx.globe.position;
    let depth = (origin - ctx.camera.eye).dot(ctx.camera.forward()).max(ctx.camera.znear);
    let size = ctx.camera.visible_height_at(depth) * anchors.size;
    let rotation = billboard_rotation(&ctx.camera);
    let hovered_frame = hovered
        .and_then(|id| ctx.markers.get(id).ok())
        .map(|m| m.frame);

    let moon_pos = anchor_on_plane(&ctx.camera, origin, anchors.moon);
    let mars_pos = anchor_on_plane(&ctx.camera, origin, anchors.mars);
    place(&mut ctx.moon, moon_pos, rotation, size);
    place(&mut ctx.mars, mars_pos, rotation, size);

    for frame in [FrameKind::MoonPanel, FrameKind::MarsPanel, FrameKind::FlatMap] {
        if let Some(panel) = ctx.panel_mut(frame) {
            fade(panel);
            panel.emissive = if hovered_frame == Some(frame) {
                PANEL_HOVER_EMISSIVE
            } else {
                0.0
            };
        }
    }
}

fn place(panel: &mut Panel, position: Vec3, rotation: Quat, size: f32) {
    panel.position = position;
    panel.rotation = rotation;
    panel.scale = Vec3::new(size, size, 1.0);
}

fn fade(panel: &mut Panel) {
    let target = if panel.visible { 1.0 } else { 0.0 };
    let step = (target - panel.opacity).clamp(-PANEL_FADE_PER_FRAME, PANEL_FADE_PER_FRAME);
    panel.opacity = (panel.opacity + step).clamp(0.0, 1.0);
}

/// Rebuild the pin lines of every station marker. No satellite, no lines.
pub fn update_station_pin_lines(ctx: &mut InteractionContext) {
    ctx.pin_lines.clear();
    if ctx.find_satellite().is_none() {
        return;
    }
    let centre = ctx.globe.position;
    let mut lines = Vec::new();
    for marker in ctx.markers.iter().filter(|m| m.frame == FrameKind::Station) {
        let end = match marker_world_position(ctx, marker) {
            Ok(p) => p,
            Err(e) => {
                log::trace!("[station] pin line skipped: {}", e);
                continue;
            }
        };
        let Some(dir) = (end - centre).try_normalize() else {
            continue;
        };
        let line = PinLine {
            marker: marker.id,
            start: centre + dir * GLOBE_RADIUS,
            end,
        };
        if line.length() >= STATION_PIN_MIN_LENGTH {
            lines.push(line);
        }
    }
    ctx.pin_lines = lines;
}
