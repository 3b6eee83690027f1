//! Narrow interfaces to collaborators outside the interaction core.
//!
//! They are injected into [`InteractionContext`](crate::context::InteractionContext)
//! once instead of being looked up globally.

use crate::marker::LocationType;
use crate::state::StationPose;
use fnv::FnvHashSet;
use std::cell::RefCell;
use std::rc::Rc;

/// Finds the satellite node. It may not exist yet or may be recreated, so the
/// pose is looked up every time it is needed.
pub trait SatelliteLookup {
    fn find_satellite(&self) -> Option<StationPose>;
}

/// Answers questions about the events on the current page.
pub trait CurrentEvents {
    /// True when at least one event on the page (multi-event variants
    /// included) is located at `location`.
    fn page_has_location(&self, location: LocationType) -> bool;
}

/// Fire-and-forget sound effects.
pub trait SoundFx {
    fn play(&self, name: &str);
}

impl<F: Fn(&str)> SoundFx for F {
    fn play(&self, name: &str) {
        self(name)
    }
}

pub struct NoSatellite;

impl SatelliteLookup for NoSatellite {
    fn find_satellite(&self) -> Option<StationPose> {
        None
    }
}

pub struct Silent;

impl SoundFx for Silent {
    fn play(&self, _name: &str) {}
}

/// Satellite pose written by the transport feed and read by the core.
#[derive(Clone, Default)]
pub struct SharedStation(Rc<RefCell<Option<StationPose>>>);

impl SharedStation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, pose: Option<StationPose>) {
        *self.0.borrow_mut() = pose;
    }
}

impl SatelliteLookup for SharedStation {
    fn find_satellite(&self) -> Option<StationPose> {
        *self.0.borrow()
    }
}

/// Location types present on the current page, updated on page or filter change.
#[derive(Clone, Default)]
pub struct PageLocations(Rc<RefCell<FnvHashSet<LocationType>>>);

impl PageLocations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<I: IntoIterator<Item = LocationType>>(&self, locations: I) {
        let mut set = self.0.borrow_mut();
        set.clear();
        set.extend(locations);
    }
}

impl CurrentEvents for PageLocations {
    fn page_has_location(&self, location: LocationType) -> bool {
        self.0.borrow().contains(&location)
    }
}
