//! Per-frame pulse ring animation and marker breathing.
//!
//! Both are pure functions of `now_ms` and the start times stored on the
//! marker, so they can be re-run or skipped for a frame without drifting.

use crate::constants::{
    BREATH_RATE_PER_MS, BREATH_SCALE_MAX, BREATH_SCALE_MIN, PULSE_RING_MAX_OPACITY,
};
use crate::context::InteractionContext;
use crate::frames::decal_world_transform;
use crate::marker::{MarkerId, PulseRing};
use glam::{Mat4, Vec3};

/// Breathing factor for a phase angle in radians.
///
/// Swells up to [`BREATH_SCALE_MAX`] on the positive half-wave and shrinks to
/// [`BREATH_SCALE_MIN`] on the negative one; exactly 1.0 where the sine
/// crosses zero.
#[inline]
pub fn breathing_scale(phase: f32) -> f32 {
    let s = phase.sin();
    if s >= 0.0 {
        1.0 + s * (BREATH_SCALE_MAX - 1.0)
    } else {
        1.0 + s * (1.0 - BREATH_SCALE_MIN)
    }
}

#[inline]
pub fn ring_scale(ring: &PulseRing, progress: f32) -> f32 {
    let p = progress.clamp(0.0, 1.0);
    ring.start_scale + (ring.max_scale - ring.start_scale) * p
}

/// Front-loaded visibility with a fast tail.
#[inline]
pub fn ring_opacity(progress: f32) -> f32 {
    PULSE_RING_MAX_OPACITY * (1.0 - progress.clamp(0.0, 1.0)).sqrt()
}

/// Spawn one ring on `marker` unless one is still active. Returns whether a
/// ring was created.
pub fn spawn_ring(ctx: &mut InteractionContext, marker: MarkerId, now_ms: f64) -> bool {
    let Ok(m) = ctx.markers.get_mut(marker) else {
        return false;
    };
    if m.has_active_ring(now_ms) {
        return false;
    }
    m.rings.push(PulseRing::new(marker, now_ms));
    log::trace!("[pulse] ring spawned on {}", marker);
    ctx.play_sound("pulse");
    true
}

/// Detach every ring of `marker` right away.
pub fn clear_rings(ctx: &mut InteractionContext, marker: MarkerId) {
    if let Ok(m) = ctx.markers.get_mut(marker) {
        m.rings.clear();
    }
}

/// Grow, fade and expire every active ring; re-resolve its pose so rings on
/// moving markers follow them.
pub fn update_pulse_rings(ctx: &mut InteractionContext, now_ms: f64) {
    let ids: Vec<MarkerId> = ctx
        .markers
        .iter()
        .filter(|m| !m.rings.is_empty())
        .map(|m| m.id)
        .collect();

    for id in ids {
        let updates: Vec<(Vec3, f32, Option<Mat4>)> = {
            let Ok(marker) = ctx.markers.get(id) else {
                continue;
            };
            marker
                .rings
                .iter()
                .filter(|r| r.is_active(now_ms))
                .map(|ring| {
                    let progress = ring.progress(now_ms);
                    let scale = marker.frame_scale(ring_scale(ring, progress));
                    let world = match decal_world_transform(ctx, marker, scale) {
                        Ok(w) => Some(w),
                        Err(e) => {
                            log::trace!("[pulse] ring pose skipped: {}", e);
                            ring.world
                        }
                    };
                    (scale, ring_opacity(progress), world)
                })
                .collect()
        };
        let Ok(marker) = ctx.markers.get_mut(id) else {
            continue;
        };
        marker.rings.retain(|r| r.is_active(now_ms));
        for (ring, (scale, opacity, world)) in marker.rings.iter_mut().zip(updates) {
            ring.scale = scale;
            ring.opacity = opacity;
            ring.world = world;
        }
    }
}

/// Breathing scale oscillation on every interactive event marker.
pub fn update_marker_pulse(ctx: &mut InteractionContext, now_ms: f64) {
    for marker in ctx.markers.iter_mut() {
        if !marker.is_event_marker || !marker.is_interactive || marker.is_animating {
            continue;
        }
        let elapsed = (now_ms - marker.pulse.start_ms).max(0.0);
        let phase =
            (elapsed * f64::from(BREATH_RATE_PER_MS)).rem_euclid(std::f64::consts::TAU) as f32;
        marker.scale = marker.frame_scale(marker.base_scale * breathing_scale(phase));
    }
}
