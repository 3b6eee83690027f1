//! Pointer/touch drag tracking and rotation momentum.

use crate::constants::{
    MOMENTUM_DECAY, MOMENTUM_EPSILON, PITCH_LIMIT, ROTATION_SPEED_PER_PX, TAP_MOVE_THRESHOLD_PX,
};
use crate::state::Globe;
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

#[inline]
pub fn clamp_pitch(pitch: f32) -> f32 {
    pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT)
}

/// Apply a (pitch, yaw) delta to the globe, keeping pitch inside the pole limits.
pub fn rotate_globe(globe: &mut Globe, delta: Vec2) {
    globe.pitch = clamp_pitch(globe.pitch + delta.x);
    globe.yaw += delta.y;
}

/// Rotation momentum left over after a drag, as (pitch, yaw) per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotationVelocity(pub Vec2);

impl RotationVelocity {
    pub fn is_zero(&self) -> bool {
        self.0 == Vec2::ZERO
    }

    pub fn clear(&mut self) {
        self.0 = Vec2::ZERO;
    }

    /// Apply one frame of momentum and decay it; negligible velocity snaps to zero.
    pub fn step(&mut self, globe: &mut Globe) {
        if self.is_zero() {
            return;
        }
        rotate_globe(globe, self.0);
        self.0 *= MOMENTUM_DECAY;
        if self.0.x.abs() < MOMENTUM_EPSILON && self.0.y.abs() < MOMENTUM_EPSILON {
            self.0 = Vec2::ZERO;
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureMove {
    /// (pitch, yaw) delta to apply, when dragging.
    pub rotation: Option<Vec2>,
    /// The gesture travelled far enough that the page should not scroll.
    pub suppress_default: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureEnd {
    pub was_dragging: bool,
    /// Travelled beyond the tap threshold at some point.
    pub was_drag: bool,
    pub position: Option<Vec2>,
}

#[derive(Clone, Debug, Default)]
pub struct GestureTracker {
    dragging: bool,
    kind: Option<PointerKind>,
    previous: Option<Vec2>,
    initial: Option<Vec2>,
    moved_beyond_tap: bool,
    pub velocity: RotationVelocity,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn pointer_down(&mut self, pos: Vec2, kind: PointerKind) {
        self.dragging = true;
        self.kind = Some(kind);
        self.previous = Some(pos);
        self.initial = Some(pos);
        self.moved_beyond_tap = false;
        self.velocity.clear();
        log::debug!("[gesture] down {:?} at ({:.1},{:.1})", kind, pos.x, pos.y);
    }

    /// Track a move. Returns the rotation to apply while a drag is in progress.
    pub fn pointer_move(&mut self, pos: Vec2) -> GestureMove {
        if !self.dragging {
            self.previous = Some(pos);
            return GestureMove::default();
        }
        if let Some(initial) = self.initial {
            if pos.distance(initial) > TAP_MOVE_THRESHOLD_PX {
                self.moved_beyond_tap = true;
            }
        }
        let previous = self.previous.unwrap_or(pos);
        let delta_px = pos - previous;
        self.previous = Some(pos);
        let rotation = Vec2::new(delta_px.y, delta_px.x) * ROTATION_SPEED_PER_PX;
        self.velocity = RotationVelocity(rotation);
        GestureMove {
            rotation: Some(rotation),
            suppress_default: self.moved_beyond_tap && self.kind == Some(PointerKind::Touch),
        }
    }

    pub fn pointer_up(&mut self) -> GestureEnd {
        let end = GestureEnd {
            was_dragging: self.dragging,
            was_drag: self.moved_beyond_tap,
            position: self.previous,
        };
        self.dragging = false;
        self.initial = None;
        end
    }

    /// Abort the gesture without a release (pointer cancel, touch cancel).
    /// Returns whether a press was in progress.
    pub fn cancel(&mut self) -> bool {
        let was_dragging = self.dragging;
        self.dragging = false;
        self.initial = None;
        self.moved_beyond_tap = false;
        was_dragging
    }
}
