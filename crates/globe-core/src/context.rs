use crate::frames::FrameKind;
use crate::layout::PinLine;
use crate::marker::{LocationType, MarkerArena};
use crate::services::{CurrentEvents, NoSatellite, PageLocations, SatelliteLookup, Silent, SoundFx};
use crate::state::{Camera, Globe, Panel, StationPose, Viewport};

/// Scene graph plus the collaborators every interaction component needs.
///
/// Components do not hold it; the orchestrator lends it to them per call.
pub struct InteractionContext {
    pub camera: Camera,
    pub globe: Globe,
    pub moon: Panel,
    pub mars: Panel,
    pub flat_map: Panel,
    pub markers: MarkerArena,
    pub viewport: Viewport,
    pub pin_lines: Vec<PinLine>,
    satellite: Box<dyn SatelliteLookup>,
    events: Box<dyn CurrentEvents>,
    sound: Box<dyn SoundFx>,
}

impl Default for InteractionContext {
    fn default() -> Self {
        Self::new(
            Box::new(NoSatellite),
            Box::new(PageLocations::new()),
            Box::new(Silent),
        )
    }
}

impl InteractionContext {
    pub fn new(
        satellite: Box<dyn SatelliteLookup>,
        events: Box<dyn CurrentEvents>,
        sound: Box<dyn SoundFx>,
    ) -> Self {
        Self {
            camera: Camera::default(),
            globe: Globe::default(),
            moon: Panel::default(),
            mars: Panel::default(),
            flat_map: Panel::default(),
            markers: MarkerArena::new(),
            viewport: Viewport::default(),
            pin_lines: Vec::new(),
            satellite,
            events,
            sound,
        }
    }

    pub fn find_satellite(&self) -> Option<StationPose> {
        self.satellite.find_satellite()
    }

    pub fn play_sound(&self, name: &str) {
        self.sound.play(name);
    }

    pub fn set_satellite(&mut self, satellite: Box<dyn SatelliteLookup>) {
        self.satellite = satellite;
    }

    pub fn set_sound(&mut self, sound: Box<dyn SoundFx>) {
        self.sound = sound;
    }

    /// Panel node backing a flat frame; `None` for the globe and the station.
    pub fn panel(&self, frame: FrameKind) -> Option<&Panel> {
        match frame {
            FrameKind::MoonPanel => Some(&self.moon),
            FrameKind::MarsPanel => Some(&self.mars),
            FrameKind::FlatMap => Some(&self.flat_map),
            FrameKind::Globe | FrameKind::Station => None,
        }
    }

    pub fn panel_mut(&mut self, frame: FrameKind) -> Option<&mut Panel> {
        match frame {
            FrameKind::MoonPanel => Some(&mut self.moon),
            FrameKind::MarsPanel => Some(&mut self.mars),
            FrameKind::FlatMap => Some(&mut self.flat_map),
            FrameKind::Globe | FrameKind::Station => None,
        }
    }

    pub fn frame_visible(&self, frame: FrameKind) -> bool {
        match frame {
            FrameKind::Globe => true,
            FrameKind::Station => self.find_satellite().is_some(),
            _ => self.panel(frame).is_some_and(|p| p.visible),
        }
    }

    /// Show Moon/Mars only when the current page has events located there.
    pub fn apply_panel_visibility(&mut self) {
        self.moon.visible = self.events.page_has_location(LocationType::Moon);
        self.mars.visible = self.events.page_has_location(LocationType::Mars);
    }

    pub fn hide_celestial_panels(&mut self) {
        self.moon.visible = false;
        self.mars.visible = false;
    }

    pub fn max_camera_distance(&self) -> f32 {
        if self.viewport.is_mobile_portrait() {
            crate::constants::MAX_CAMERA_DISTANCE_MOBILE_PORTRAIT
        } else {
            crate::constants::MAX_CAMERA_DISTANCE_DESKTOP
        }
    }

    pub fn default_camera_distance(&self) -> f32 {
        if self.viewport.is_mobile_portrait() {
            crate::constants::DEFAULT_CAMERA_DISTANCE_MOBILE_PORTRAIT
        } else {
            crate::constants::DEFAULT_CAMERA_DISTANCE
        }
    }
}
