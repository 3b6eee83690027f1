// End-to-end interaction scenarios through GlobeControls.

mod common;

use common::*;
use globe_core::autorotate::AutoRotateMode;
use globe_core::constants::MAX_CAMERA_DISTANCE_DESKTOP;
use globe_core::services::NoSatellite;
use globe_core::{ClickOutcome, GlobeControls, HostEffect, LocationType, PointerKind};
use glam::{Vec2, Vec3};

const CORNER: Vec2 = Vec2::new(10.0, 10.0);

#[test]
fn hover_then_leave() {
    let (mut controls, id) = controls_with_marker(true, Vec3::Z);
    assert_eq!(controls.auto_rotate_mode(), AutoRotateMode::FreeSpin);
    let over = marker_px(&controls, id);

    controls.pointer_move(over, 0.0);
    assert_eq!(controls.hovered(), Some(id));
    assert_eq!(controls.auto_rotate_mode(), AutoRotateMode::Idle);
    assert_eq!(controls.context().markers.get(id).unwrap().rings.len(), 1);

    // the wave repeats while the hover lasts, never overlapping
    controls.frame(100.0);
    controls.frame(1600.0);
    let rings = &controls.context().markers.get(id).unwrap().rings;
    assert_eq!(rings.len(), 1);
    assert_eq!(rings[0].created_ms, 1600.0);

    controls.pointer_move(CORNER, 1700.0);
    assert_eq!(controls.hovered(), None);
    assert!(controls.context().markers.get(id).unwrap().rings.is_empty());
    assert!(controls.auto_rotate().resume_pending());

    controls.frame(2199.0);
    assert_eq!(controls.auto_rotate_mode(), AutoRotateMode::Idle);
    controls.frame(2200.0);
    assert_eq!(controls.auto_rotate_mode(), AutoRotateMode::FreeSpin);
    // no ring comes back after the hover is gone
    controls.frame(3200.0);
    assert!(controls.context().markers.get(id).unwrap().rings.is_empty());
}

#[test]
fn click_same_event_twice() {
    let (mut controls, id) = controls_with_marker(true, Vec3::Z);
    let over = marker_px(&controls, id);

    assert_eq!(controls.click_at(over, 0.0), ClickOutcome::OpenedAndZoomed(id));
    assert_eq!(controls.current_event(), Some(id));
    assert!(controls.drain_effects().contains(&HostEffect::EventOpened(id)));
    controls.frame(600.0);
    let eye = controls.context().camera.eye;
    assert_vec3_near(eye, Vec3::new(0.0, 0.0, 2.5), 1e-4);

    let over = marker_px(&controls, id);
    assert_eq!(controls.click_at(over, 700.0), ClickOutcome::Closed(id));
    assert_eq!(controls.current_event(), None);
    assert!(controls.drain_effects().contains(&HostEffect::EventClosed(id)));
    assert!(controls.auto_rotate().resume_pending());

    // closing leaves the camera where it is
    controls.frame(800.0);
    assert_vec3_near(controls.context().camera.eye, eye, 1e-6);
    controls.frame(5700.0);
    assert_eq!(controls.auto_rotate_mode(), AutoRotateMode::FreeSpin);
}

#[test]
fn celestial_events_reset_instead_of_zooming() {
    let mut controls = controls_with(false, &[LocationType::Moon], Box::new(NoSatellite));
    let ids = controls.replace_markers([event(Vec3::new(0.1, 0.1, 0.0), LocationType::Moon)], 0.0);
    controls.frame(0.0);
    let over = marker_px(&controls, ids[0]);
    assert_eq!(controls.click_at(over, 10.0), ClickOutcome::OpenedAndReset(ids[0]));
    assert!(controls.is_camera_animating());
    assert!(controls.snapshot().is_none());
    assert!(controls.context().moon.visible);
}

#[test]
fn clicking_empty_space_does_nothing() {
    let (mut controls, _) = controls_with_marker(false, Vec3::Z);
    assert_eq!(controls.click_at(CORNER, 0.0), ClickOutcome::Missed);
    assert_eq!(controls.current_event(), None);
}

#[test]
fn markers_without_an_event_are_not_clickable() {
    let mut controls = controls(false);
    let mut spec = event(Vec3::Z, LocationType::Earth);
    spec.event = None;
    let id = controls.add_marker(spec, 0.0);
    let over = marker_px(&controls, id);
    assert_eq!(controls.click_at(over, 0.0), ClickOutcome::Missed);
}

#[test]
fn touch_tap_is_a_click() {
    let (mut controls, id) = controls_with_marker(false, Vec3::Z);
    let over = marker_px(&controls, id);
    controls.pointer_down(over, PointerKind::Touch);
    controls.pointer_move(over + Vec2::new(2.0, 1.0), 0.0);
    assert_eq!(controls.pointer_up(0.0), Some(ClickOutcome::OpenedAndZoomed(id)));
}

#[test]
fn touch_drag_is_not_a_click() {
    let (mut controls, id) = controls_with_marker(false, Vec3::Z);
    let over = marker_px(&controls, id);
    controls.pointer_down(over, PointerKind::Touch);
    let moved = controls.pointer_move(over + Vec2::new(40.0, 0.0), 0.0);
    assert!(moved.suppress_default);
    assert!(controls.pointer_up(0.0).is_none());
    assert!((controls.context().globe.yaw - 0.2).abs() < 1e-5);
    assert!(!controls.velocity().is_zero());
}

#[test]
fn drag_with_an_open_event_hides_the_image() {
    let (mut controls, id) = controls_with_marker(true, Vec3::Z);
    controls.open_event(id);
    controls.drain_effects();
    controls.pointer_down(CORNER, PointerKind::Mouse);
    assert_eq!(controls.drain_effects(), vec![HostEffect::DragStarted]);
    controls.pointer_move(CORNER + Vec2::new(30.0, 0.0), 0.0);
    controls.pointer_up(0.0);
    assert!(controls.auto_rotate().resume_pending());
}

fn fades(controls: &mut GlobeControls) -> usize {
    controls
        .drain_effects()
        .into_iter()
        .filter(|e| *e == HostEffect::FadeInEventImage)
        .count()
}

#[test]
fn drag_over_a_moon_event_brings_the_image_back() {
    let mut controls = controls_with(true, &[LocationType::Moon], Box::new(NoSatellite));
    let ids = controls.replace_markers([event(Vec3::new(0.1, 0.1, 0.0), LocationType::Moon)], 0.0);
    controls.open_event(ids[0]);
    controls.drain_effects();

    controls.pointer_down(CORNER, PointerKind::Mouse);
    assert_eq!(controls.drain_effects(), vec![HostEffect::DragStarted]);
    controls.pointer_move(CORNER + Vec2::new(30.0, 0.0), 0.0);
    assert!(controls.pointer_up(0.0).is_none());
    // nothing on the globe to recenter onto, so the image returns on release
    assert_eq!(fades(&mut controls), 1);

    let mut now = 0.0;
    for _ in 0..200 {
        now += FRAME_MS;
        controls.frame(now);
    }
    assert_eq!(controls.auto_rotate_mode(), AutoRotateMode::Idle);
    assert_eq!(fades(&mut controls), 0);
}

#[test]
fn drag_with_auto_rotate_off_brings_the_image_back() {
    let (mut controls, id) = controls_with_marker(false, Vec3::Z);
    controls.open_event(id);
    controls.pointer_down(CORNER, PointerKind::Mouse);
    controls.drain_effects();
    controls.pointer_move(CORNER + Vec2::new(30.0, 0.0), 0.0);
    controls.pointer_up(0.0);
    assert!(!controls.auto_rotate().resume_pending());
    assert_eq!(fades(&mut controls), 1);
}

#[test]
fn drag_with_recenter_pending_waits_for_the_approach() {
    let (mut controls, id) = controls_with_marker(true, Vec3::Z);
    controls.open_event(id);
    controls.pointer_down(CORNER, PointerKind::Mouse);
    controls.pointer_move(CORNER + Vec2::new(30.0, 0.0), 0.0);
    controls.pointer_up(0.0);
    assert!(controls.auto_rotate().resume_pending());
    assert_eq!(fades(&mut controls), 0);
}

#[test]
fn cancelled_touch_resumes_spinning() {
    let mut controls = controls(true);
    controls.pointer_down(CORNER, PointerKind::Touch);
    controls.pointer_move(CORNER + Vec2::new(20.0, 0.0), 0.0);
    controls.pointer_cancel(100.0);
    assert!(!controls.is_dragging());
    assert!(controls.auto_rotate().resume_pending());

    controls.frame(5099.0);
    assert_eq!(controls.auto_rotate_mode(), AutoRotateMode::Idle);
    controls.frame(5100.0);
    assert_eq!(controls.auto_rotate_mode(), AutoRotateMode::FreeSpin);
}

#[test]
fn cancelled_touch_over_an_open_event_recenters_sooner() {
    let (mut controls, id) = controls_with_marker(true, Vec3::X);
    controls.open_event(id);
    controls.pointer_down(CORNER, PointerKind::Touch);
    controls.pointer_cancel(0.0);
    controls.frame(2000.0);
    assert_eq!(controls.auto_rotate_mode(), AutoRotateMode::Recentering);
}

#[test]
fn cancel_without_a_press_changes_nothing() {
    let mut controls = controls(true);
    controls.pointer_cancel(0.0);
    assert!(!controls.auto_rotate().resume_pending());
    assert_eq!(controls.auto_rotate_mode(), AutoRotateMode::FreeSpin);
}

#[test]
fn drag_without_an_open_event_leaves_the_overlay_alone() {
    let mut controls = controls(true);
    controls.pointer_down(CORNER, PointerKind::Mouse);
    assert!(controls.drain_effects().is_empty());
}

#[test]
fn momentum_spins_after_release() {
    let mut controls = controls(false);
    controls.pointer_down(CORNER, PointerKind::Mouse);
    controls.pointer_move(CORNER + Vec2::new(20.0, 0.0), 0.0);
    controls.pointer_up(0.0);
    let yaw = controls.context().globe.yaw;
    controls.frame(16.0);
    assert!(controls.context().globe.yaw > yaw);
    for i in 0..500 {
        controls.frame(32.0 + i as f64 * FRAME_MS);
    }
    assert!(controls.velocity().is_zero());
}

#[test]
fn resize_pulls_the_camera_back_inside_the_band() {
    let mut controls = controls(false);
    controls.on_window_resize(390.0, 844.0);
    for _ in 0..20 {
        controls.zoom_out();
    }
    assert!((controls.context().camera.distance() - 7.0).abs() < 1e-4);
    controls.on_window_resize(1280.0, 800.0);
    assert!((controls.context().camera.distance() - MAX_CAMERA_DISTANCE_DESKTOP).abs() < 1e-4);
    assert!((controls.context().camera.aspect - 1.6).abs() < 1e-6);
}

#[test]
fn zoom_buttons_step_by_a_fixed_amount() {
    let mut controls = controls(false);
    controls.zoom_in();
    assert!((controls.context().camera.distance() - 3.1).abs() < 1e-4);
    controls.zoom_out();
    controls.zoom_out();
    assert!((controls.context().camera.distance() - 3.9).abs() < 1e-4);
}

#[test]
fn overlay_blocks_hover() {
    let (mut controls, id) = controls_with_marker(false, Vec3::Z);
    controls.set_overlay_blocking(true);
    let over = marker_px(&controls, id);
    controls.pointer_move(over, 0.0);
    assert_eq!(controls.hovered(), None);
    controls.set_overlay_blocking(false);
    controls.pointer_move(over, 10.0);
    assert_eq!(controls.hovered(), Some(id));
}

#[test]
fn locking_a_hovered_marker_drops_the_hover() {
    let (mut controls, id) = controls_with_marker(false, Vec3::Z);
    let over = marker_px(&controls, id);
    controls.pointer_move(over, 0.0);
    assert_eq!(controls.hovered(), Some(id));
    controls.context_mut().markers.get_mut(id).unwrap().is_locked = true;
    controls.pointer_move(over, 10.0);
    assert_eq!(controls.hovered(), None);
    assert!(controls.context().markers.get(id).unwrap().rings.is_empty());
}

#[test]
fn replacing_markers_forgets_hover_and_open_event() {
    let (mut controls, id) = controls_with_marker(false, Vec3::Z);
    let over = marker_px(&controls, id);
    controls.pointer_move(over, 0.0);
    controls.open_event(id);
    let ids = controls.replace_markers([event(Vec3::X, LocationType::Earth)], 100.0);
    assert_eq!(controls.hovered(), None);
    assert_eq!(controls.current_event(), None);
    assert_ne!(ids[0], id);
    assert!(controls.context().markers.get(id).is_err());
}

#[test]
fn animating_flag_round_trips_through_the_arena() {
    let (mut controls, id) = controls_with_marker(false, Vec3::Z);
    controls.set_marker_animating(id, true).unwrap();
    assert!(controls.context().markers.get(id).unwrap().is_animating);
    controls.clear_markers();
    assert!(controls.set_marker_animating(id, false).is_err());
}

#[test]
fn disabling_auto_rotate_stops_the_spin() {
    let mut controls = controls(true);
    controls.frame(0.0);
    controls.set_auto_rotate_enabled(false, 16.0);
    let yaw = controls.context().globe.yaw;
    controls.frame(32.0);
    assert_eq!(controls.context().globe.yaw, yaw);
    controls.set_auto_rotate_enabled(true, 48.0);
    controls.frame(48.0);
    assert_eq!(controls.auto_rotate_mode(), AutoRotateMode::FreeSpin);
}
