// Camera fly-to, reset, return and follow animations.

mod common;

use common::*;
use globe_core::camera_anim::{ease_out_cubic, mobile_look_offset};
use globe_core::services::SharedStation;
use globe_core::state::Camera;
use globe_core::{LocationType, StationPose, Viewport};
use glam::{Quat, Vec3};

#[test]
fn ease_out_cubic_shape() {
    assert_eq!(ease_out_cubic(0.0), 0.0);
    assert_eq!(ease_out_cubic(1.0), 1.0);
    assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-6);
    assert_eq!(ease_out_cubic(2.0), 1.0);
}

#[test]
fn zoom_flies_to_two_and_a_half_units_above_the_marker() {
    let (mut controls, id) = controls_with_marker(false, Vec3::Z);
    controls.zoom_to_marker(id, 0.0).unwrap();
    controls.frame(250.0);
    let mid = controls.context().camera.distance();
    assert!(mid < 3.5 && mid > 2.5);
    controls.frame(500.0);
    assert_vec3_near(controls.context().camera.eye, Vec3::new(0.0, 0.0, 2.5), 1e-4);
    assert!(!controls.is_camera_animating());
}

#[test]
fn zoom_hides_moon_and_mars() {
    let mut controls = controls_with(
        false,
        &[LocationType::Moon, LocationType::Mars],
        Box::new(globe_core::services::NoSatellite),
    );
    let ids = controls.replace_markers([event(Vec3::Z, LocationType::Earth)], 0.0);
    assert!(controls.context().moon.visible);
    controls.zoom_to_marker(ids[0], 0.0).unwrap();
    assert!(!controls.context().moon.visible);
    assert!(!controls.context().mars.visible);

    controls.frame(600.0);
    controls.reset_camera_to_default(700.0);
    assert!(controls.context().moon.visible);
    assert!(controls.context().mars.visible);
}

#[test]
fn snapshot_is_taken_once() {
    let mut controls = controls(false);
    let ids = controls.replace_markers(
        [
            event(Vec3::Z, LocationType::Earth),
            event(Vec3::new(0.6, 0.0, 0.8), LocationType::Earth),
        ],
        0.0,
    );
    controls.zoom_to_marker(ids[0], 0.0).unwrap();
    let first = controls.snapshot().expect("snapshot captured");
    assert_vec3_near(first.camera_position, Vec3::new(0.0, 0.0, 3.5), 1e-5);

    controls.frame(600.0);
    controls.zoom_to_marker(ids[1], 700.0).unwrap();
    controls.frame(1300.0);
    assert_eq!(controls.snapshot(), Some(first));
}

#[test]
fn zoom_then_wheel_then_reset() {
    let (mut controls, id) = controls_with_marker(false, Vec3::Z);
    controls.zoom_to_marker(id, 0.0).unwrap();
    controls.frame(600.0);
    assert!(controls.snapshot().is_some());

    controls.wheel(100.0);
    assert!(controls.snapshot().is_none());
    assert!((controls.context().camera.distance() - 2.6).abs() < 1e-3);

    controls.reset_camera_to_default(700.0);
    controls.frame(1300.0);
    assert_vec3_near(controls.context().camera.eye, Vec3::new(0.0, 0.0, 3.5), 1e-4);
    assert!(controls.snapshot().is_none());
    assert!(controls.context().globe.rotation().length() < 1e-5);
}

#[test]
fn reset_takes_the_short_way_round() {
    let mut controls = controls(false);
    controls.context_mut().globe.yaw = 6.0 * std::f32::consts::PI + 0.2;
    controls.reset_camera_to_default(0.0);
    let mut t = 0.0;
    while t <= 500.0 {
        controls.frame(t);
        assert!(controls.context().globe.yaw.abs() <= 0.2 + 1e-4);
        t += FRAME_MS;
    }
    controls.frame(600.0);
    assert!(controls.context().globe.yaw.abs() < 1e-5);
}

#[test]
fn mobile_portrait_reset_uses_the_farther_default() {
    let mut controls = controls(false);
    controls.on_window_resize(390.0, 844.0);
    controls.reset_camera_to_default(0.0);
    controls.frame(600.0);
    assert_vec3_near(controls.context().camera.eye, Vec3::new(0.0, 0.0, 5.5), 1e-4);
}

#[test]
fn return_to_previous_view_restores_the_snapshot() {
    let (mut controls, id) = controls_with_marker(false, Vec3::new(0.6, 0.0, 0.8));
    controls.context_mut().globe.yaw = 0.3;
    controls.zoom_to_marker(id, 0.0).unwrap();
    controls.frame(600.0);
    controls.context_mut().globe.pitch = 0.4;

    controls.return_to_previous_view(700.0);
    controls.frame(1300.0);
    let ctx = controls.context();
    assert_vec3_near(ctx.camera.eye, Vec3::new(0.0, 0.0, 3.5), 1e-4);
    assert!((ctx.globe.yaw - 0.3).abs() < 1e-4);
    assert!(ctx.globe.pitch.abs() < 1e-4);
    assert!(controls.snapshot().is_none());
}

#[test]
fn return_without_snapshot_resets() {
    let mut controls = controls(false);
    controls.context_mut().camera.eye = Vec3::new(0.0, 0.0, 4.5);
    controls.return_to_previous_view(0.0);
    controls.frame(600.0);
    assert_vec3_near(controls.context().camera.eye, Vec3::new(0.0, 0.0, 3.5), 1e-4);
}

#[test]
fn desktop_has_no_look_offset() {
    let camera = Camera::default();
    let viewport = Viewport::new(1280.0, 800.0);
    let offset = mobile_look_offset(&camera, &viewport, Vec3::new(0.0, 0.0, 2.5), Vec3::Z);
    assert_eq!(offset, Vec3::ZERO);
}

#[test]
fn mobile_look_offset_lifts_the_marker_into_the_content_area() {
    let camera = Camera::default();
    let viewport = Viewport::new(390.0, 844.0);
    let offset = mobile_look_offset(&camera, &viewport, Vec3::new(0.0, 0.0, 2.5), Vec3::Z);
    // a quarter of the screen height, in world units at distance 1.5
    let expected = 0.25 * camera.visible_height_at(1.5);
    assert!((offset.y - expected).abs() < 1e-5);
    assert!(offset.x.abs() < 1e-6 && offset.z.abs() < 1e-6);
}

#[test]
fn mobile_zoom_frames_the_marker_above_centre() {
    let (mut controls, id) = controls_with_marker(false, Vec3::Z);
    controls.on_window_resize(390.0, 844.0);
    controls.zoom_to_marker(id, 0.0).unwrap();
    controls.frame(600.0);
    let px = marker_px(&controls, id);
    // centre of the top half of the screen
    assert!((px.y - 844.0 * 0.25).abs() < 844.0 * 0.03, "marker at y={}", px.y);
    assert!((px.x - 195.0).abs() < 1.0);
}

#[test]
fn following_chases_the_station() {
    let station = SharedStation::new();
    station.set(Some(StationPose {
        position: Vec3::new(1.5, 0.0, 0.0),
        rotation: Quat::IDENTITY,
    }));
    let mut controls = controls_with(false, &[], Box::new(station.clone()));
    let ids = controls.replace_markers([event(Vec3::ZERO, LocationType::Station)], 0.0);
    controls.start_following_station(ids[0]).unwrap();
    for i in 0..200 {
        controls.frame(i as f64 * FRAME_MS);
    }
    assert_vec3_near(controls.context().camera.eye, Vec3::new(2.5, 0.0, 0.0), 1e-3);

    controls.stop_following_station();
    station.set(Some(StationPose {
        position: Vec3::new(0.0, 1.5, 0.0),
        rotation: Quat::IDENTITY,
    }));
    controls.frame(4000.0);
    assert_vec3_near(controls.context().camera.eye, Vec3::new(2.5, 0.0, 0.0), 1e-3);
}

#[test]
fn zoom_cancels_following() {
    let (mut controls, id) = controls_with_marker(false, Vec3::Z);
    controls.start_following_station(id).unwrap();
    controls.zoom_to_marker(id, 0.0).unwrap();
    assert!(controls.following().is_none());
}
