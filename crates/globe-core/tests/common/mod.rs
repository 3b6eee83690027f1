// Shared scene builders for the integration tests.

#![allow(dead_code)]

use globe_core::marker::MarkerSpec;
use globe_core::services::{NoSatellite, PageLocations, SatelliteLookup, Silent};
use globe_core::{
    ControlsConfig, EventPayload, GlobeControls, InteractionContext, LocationType, MarkerId,
};
use glam::{Vec2, Vec3};

pub const FRAME_MS: f64 = 16.0;

pub fn event(position: Vec3, location: LocationType) -> MarkerSpec {
    MarkerSpec::event(
        position,
        location,
        EventPayload {
            name: "event".to_string(),
            description: String::new(),
            image: Some("event.jpg".to_string()),
        },
    )
}

pub fn controls_with(
    auto_rotate: bool,
    locations: &[LocationType],
    satellite: Box<dyn SatelliteLookup>,
) -> GlobeControls {
    let page = PageLocations::new();
    page.set(locations.iter().copied());
    let ctx = InteractionContext::new(satellite, Box::new(page), Box::new(Silent));
    GlobeControls::new(
        ctx,
        ControlsConfig {
            auto_rotate_enabled: auto_rotate,
            sound_enabled: false,
        },
    )
}

pub fn controls(auto_rotate: bool) -> GlobeControls {
    controls_with(auto_rotate, &[LocationType::Earth], Box::new(NoSatellite))
}

/// Controls with a single Earth event marker at the given globe-local position.
pub fn controls_with_marker(auto_rotate: bool, position: Vec3) -> (GlobeControls, MarkerId) {
    let mut controls = controls(auto_rotate);
    let ids = controls.replace_markers([event(position, LocationType::Earth)], 0.0);
    (controls, ids[0])
}

/// Container pixel position of a world point.
pub fn to_px(controls: &GlobeControls, world: Vec3) -> Vec2 {
    let ctx = controls.context();
    let ndc = ctx.camera.project(world).expect("point is in front of the camera");
    Vec2::new(
        (ndc.x + 1.0) * 0.5 * ctx.viewport.width,
        (1.0 - ndc.y) * 0.5 * ctx.viewport.height,
    )
}

pub fn marker_px(controls: &GlobeControls, id: MarkerId) -> Vec2 {
    let ctx = controls.context();
    let marker = ctx.markers.get(id).expect("marker exists");
    let world = globe_core::frames::marker_world_position(ctx, marker).expect("frame resolves");
    to_px(controls, world)
}

pub fn assert_vec3_near(a: Vec3, b: Vec3, tol: f32) {
    assert!((a - b).length() < tol, "expected {:?} ~ {:?}", a, b);
}
