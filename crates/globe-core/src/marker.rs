//! Markers, their pulse rings and the arena that owns them.
//!
//! A marker owns its ring list; a ring only keeps the `MarkerId` of its owner,
//! so tearing a marker down is a single list clear.

use crate::constants::{
    PULSE_RING_DURATION_MS, PULSE_RING_MAX_SCALE, PULSE_RING_START_SCALE,
};
use crate::error::SceneError;
use crate::frames::FrameKind;
use fnv::FnvHashMap;
use glam::{Mat4, Vec3};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u32);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LocationType {
    Earth,
    Moon,
    Mars,
    Station,
}

impl LocationType {
    /// Frame a marker of this location type lives in unless told otherwise.
    pub fn default_frame(self) -> FrameKind {
        match self {
            LocationType::Earth => FrameKind::Globe,
            LocationType::Moon => FrameKind::MoonPanel,
            LocationType::Mars => FrameKind::MarsPanel,
            LocationType::Station => FrameKind::Station,
        }
    }

    /// Events on these locations reset the view instead of zooming into them.
    pub fn resets_on_click(self) -> bool {
        !matches!(self, LocationType::Earth)
    }
}

impl FromStr for LocationType {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "earth" => Ok(LocationType::Earth),
            "moon" => Ok(LocationType::Moon),
            "mars" => Ok(LocationType::Mars),
            "station" | "iss" => Ok(LocationType::Station),
            _ => Err(SceneError::UnknownLocation(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventPayload {
    pub name: String,
    pub description: String,
    pub image: Option<String>,
}

/// Breathing clock; the oscillation is measured from `start_ms`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PulseData {
    pub start_ms: f64,
}

#[derive(Clone, Debug)]
pub struct PulseRing {
    pub marker: MarkerId,
    pub created_ms: f64,
    pub duration_ms: f64,
    pub start_scale: f32,
    pub max_scale: f32,
    pub scale: Vec3,
    pub opacity: f32,
    /// Last resolved world transform; `None` until the first ring update.
    pub world: Option<Mat4>,
}

impl PulseRing {
    pub fn new(marker: MarkerId, now_ms: f64) -> Self {
        Self {
            marker,
            created_ms: now_ms,
            duration_ms: PULSE_RING_DURATION_MS,
            start_scale: PULSE_RING_START_SCALE,
            max_scale: PULSE_RING_MAX_SCALE,
            scale: Vec3::splat(PULSE_RING_START_SCALE),
            opacity: crate::constants::PULSE_RING_MAX_OPACITY,
            world: None,
        }
    }

    /// Fraction of the ring's lifetime elapsed at `now_ms` (unclamped).
    pub fn progress(&self, now_ms: f64) -> f32 {
        ((now_ms - self.created_ms) / self.duration_ms) as f32
    }

    pub fn is_active(&self, now_ms: f64) -> bool {
        now_ms - self.created_ms < self.duration_ms
    }
}

pub type RingList = SmallVec<[PulseRing; 2]>;

/// Everything needed to create a marker.
#[derive(Clone, Debug)]
pub struct MarkerSpec {
    pub position: Vec3,
    pub location: LocationType,
    pub frame: Option<FrameKind>,
    pub is_event_marker: bool,
    pub is_interactive: bool,
    pub is_locked: bool,
    pub base_scale: f32,
    pub event: Option<EventPayload>,
}

impl MarkerSpec {
    /// An interactive event marker at `position` in the location's default frame.
    pub fn event(position: Vec3, location: LocationType, event: EventPayload) -> Self {
        Self {
            position,
            location,
            frame: None,
            is_event_marker: true,
            is_interactive: true,
            is_locked: false,
            base_scale: 1.0,
            event: Some(event),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Marker {
    pub id: MarkerId,
    pub frame: FrameKind,
    pub position: Vec3,
    pub location: LocationType,
    pub is_event_marker: bool,
    pub is_interactive: bool,
    pub is_locked: bool,
    pub is_animating: bool,
    pub event: Option<EventPayload>,
    pub base_scale: f32,
    pub scale: Vec3,
    pub pulse: PulseData,
    pub rings: RingList,
}

impl Marker {
    /// Event markers that accept hover and clicks.
    pub fn is_hover_eligible(&self) -> bool {
        self.is_event_marker && self.is_interactive && !self.is_locked
    }

    pub fn has_active_ring(&self, now_ms: f64) -> bool {
        self.rings.iter().any(|r| r.is_active(now_ms))
    }

    /// Scale vector for a uniform factor, honoring the flat-frame rule.
    pub fn frame_scale(&self, factor: f32) -> Vec3 {
        if self.frame.is_flat() {
            Vec3::new(factor, factor, 1.0)
        } else {
            Vec3::splat(factor)
        }
    }
}

/// Owns every marker of the current page.
///
/// Ids are never reused, so a stale id held by a timer simply misses.
#[derive(Default)]
pub struct MarkerArena {
    markers: Vec<Marker>,
    index: FnvHashMap<MarkerId, usize>,
    next_id: u32,
}

impl MarkerArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, spec: MarkerSpec, now_ms: f64) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let frame = spec.frame.unwrap_or_else(|| spec.location.default_frame());
        let marker = Marker {
            id,
            frame,
            position: spec.position,
            location: spec.location,
            is_event_marker: spec.is_event_marker,
            is_interactive: spec.is_interactive,
            is_locked: spec.is_locked,
            is_animating: false,
            event: spec.event,
            base_scale: spec.base_scale,
            scale: Vec3::splat(spec.base_scale),
            pulse: PulseData { start_ms: now_ms },
            rings: RingList::new(),
        };
        self.index.insert(id, self.markers.len());
        self.markers.push(marker);
        id
    }

    pub fn get(&self, id: MarkerId) -> Result<&Marker, SceneError> {
        self.index
            .get(&id)
            .and_then(|&i| self.markers.get(i))
            .ok_or(SceneError::MissingMarker(id))
    }

    pub fn get_mut(&mut self, id: MarkerId) -> Result<&mut Marker, SceneError> {
        match self.index.get(&id) {
            Some(&i) => self.markers.get_mut(i).ok_or(SceneError::MissingMarker(id)),
            None => Err(SceneError::MissingMarker(id)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Marker> {
        self.markers.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Drop every marker together with its rings.
    pub fn clear(&mut self) {
        self.markers.clear();
        self.index.clear();
    }
}
