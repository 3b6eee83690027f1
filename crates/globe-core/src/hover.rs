//! Marker hover detection and the pulse-wave scheduler keyed to it.

use crate::constants::{MARKER_PICK_RADIUS, PULSE_WAVE_INTERVAL_MS};
use crate::context::InteractionContext;
use crate::frames::{marker_world_position, FrameKind};
use crate::marker::{Marker, MarkerId};
use crate::picking::{closer, ray_sphere, Ray};
use crate::pulse::{clear_rings, spawn_ring};
use crate::timers::TimerSlot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverTransition {
    Unchanged,
    Entered(MarkerId),
    Exited(MarkerId),
    Switched { from: MarkerId, to: MarkerId },
}

impl HoverTransition {
    pub fn entered(self) -> Option<MarkerId> {
        match self {
            HoverTransition::Entered(id) | HoverTransition::Switched { to: id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn exited(self) -> Option<MarkerId> {
        match self {
            HoverTransition::Exited(id) | HoverTransition::Switched { from: id, .. } => Some(id),
            _ => None,
        }
    }
}

/// Tracks the single hovered marker and its repeating pulse wave.
#[derive(Default)]
pub struct HoverEngine {
    hovered: Option<MarkerId>,
    wave: TimerSlot<MarkerId>,
}

impl HoverEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<MarkerId> {
        self.hovered
    }

    /// Raycast and move the hover to whatever the ray hits first.
    pub fn update(
        &mut self,
        ctx: &mut InteractionContext,
        ray: Ray,
        now_ms: f64,
    ) -> HoverTransition {
        let dropped = self.revalidate(ctx);
        let hit = pick_marker(ctx, ray);
        let transition = match (self.hovered, hit) {
            (Some(current), Some(target)) if current == target => HoverTransition::Unchanged,
            (Some(current), Some(target)) => {
                self.exit(ctx, current);
                self.enter(ctx, target, now_ms);
                HoverTransition::Switched {
                    from: current,
                    to: target,
                }
            }
            (Some(current), None) => {
                self.exit(ctx, current);
                HoverTransition::Exited(current)
            }
            (None, Some(target)) => {
                self.enter(ctx, target, now_ms);
                match dropped {
                    Some(from) => HoverTransition::Switched { from, to: target },
                    None => HoverTransition::Entered(target),
                }
            }
            (None, None) => match dropped {
                Some(from) => HoverTransition::Exited(from),
                None => HoverTransition::Unchanged,
            },
        };
        if transition != HoverTransition::Unchanged {
            log::debug!("[hover] {:?}", transition);
        }
        transition
    }

    /// Drop the hover if its marker vanished or became locked/non-interactive.
    /// Returns the marker that lost hover.
    pub fn revalidate(&mut self, ctx: &mut InteractionContext) -> Option<MarkerId> {
        let current = self.hovered?;
        let still_eligible = ctx
            .markers
            .get(current)
            .map(|m| is_pickable(ctx, m))
            .unwrap_or(false);
        if still_eligible {
            return None;
        }
        self.exit(ctx, current);
        Some(current)
    }

    /// Forget the hover (page change, overlay opened). Returns the marker that lost it.
    pub fn clear(&mut self, ctx: &mut InteractionContext) -> Option<MarkerId> {
        let current = self.hovered?;
        self.exit(ctx, current);
        Some(current)
    }

    /// Fire the wave-repeat timer: a new ring only when the same marker is
    /// still hovered and the previous wave has finished.
    pub fn tick(&mut self, ctx: &mut InteractionContext, now_ms: f64) {
        let Some(marker) = self.wave.take_due(now_ms) else {
            return;
        };
        if self.hovered != Some(marker) {
            return;
        }
        spawn_ring(ctx, marker, now_ms);
        self.wave.schedule(now_ms, PULSE_WAVE_INTERVAL_MS, marker);
    }

    fn enter(&mut self, ctx: &mut InteractionContext, marker: MarkerId, now_ms: f64) {
        self.hovered = Some(marker);
        spawn_ring(ctx, marker, now_ms);
        self.wave.schedule(now_ms, PULSE_WAVE_INTERVAL_MS, marker);
    }

    fn exit(&mut self, ctx: &mut InteractionContext, marker: MarkerId) {
        clear_rings(ctx, marker);
        self.wave.clear();
        self.hovered = None;
    }
}

fn is_pickable(ctx: &InteractionContext, marker: &Marker) -> bool {
    marker.is_hover_eligible() && ctx.frame_visible(marker.frame)
}

/// Closest eligible marker along `ray`, across every frame.
///
/// Globe markers on the far hemisphere are skipped.
pub fn pick_marker(ctx: &InteractionContext, ray: Ray) -> Option<MarkerId> {
    let mut best = None::<(MarkerId, f32)>;
    for marker in ctx.markers.iter() {
        if !is_pickable(ctx, marker) {
            continue;
        }
        let Ok(center) = marker_world_position(ctx, marker) else {
            continue;
        };
        if marker.frame == FrameKind::Globe {
            let normal = center - ctx.globe.position;
            if normal.dot(ray.origin - center) <= 0.0 {
                continue;
            }
        }
        let frame_scale = ctx.panel(marker.frame).map(|p| p.scale.x).unwrap_or(1.0);
        let radius = MARKER_PICK_RADIUS * marker.base_scale * frame_scale;
        if let Some(t) = ray_sphere(ray.origin, ray.dir, center, radius) {
            best = closer(best, (marker.id, t));
        }
    }
    best.map(|(id, _)| id)
}
