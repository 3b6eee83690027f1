// Drag, momentum and zoom behaviour of the gesture layer.

use globe_core::constants::{MAX_CAMERA_DISTANCE_DESKTOP, MIN_CAMERA_DISTANCE, PITCH_LIMIT};
use globe_core::gesture::{clamp_pitch, rotate_globe, GestureTracker, PointerKind, RotationVelocity};
use globe_core::state::Globe;
use globe_core::zoom::{apply_zoom, ZoomInput};
use globe_core::{InteractionContext, Viewport};
use glam::Vec2;

#[test]
fn pitch_never_leaves_the_pole_limits() {
    let mut globe = Globe::default();
    for _ in 0..100 {
        rotate_globe(&mut globe, Vec2::new(0.3, 0.1));
        assert!(globe.pitch <= PITCH_LIMIT + 1e-6);
    }
    for _ in 0..200 {
        rotate_globe(&mut globe, Vec2::new(-0.3, 0.1));
        assert!(globe.pitch >= -PITCH_LIMIT - 1e-6);
    }
    assert_eq!(clamp_pitch(10.0), PITCH_LIMIT);
    assert_eq!(clamp_pitch(-10.0), -PITCH_LIMIT);
}

#[test]
fn drag_maps_pixels_to_pitch_and_yaw() {
    let mut tracker = GestureTracker::new();
    tracker.pointer_down(Vec2::new(100.0, 100.0), PointerKind::Mouse);
    let moved = tracker.pointer_move(Vec2::new(120.0, 90.0));
    let rotation = moved.rotation.expect("dragging yields a rotation");
    // dx drives yaw, dy drives pitch, 0.005 rad per pixel
    assert!((rotation.y - 0.1).abs() < 1e-6);
    assert!((rotation.x + 0.05).abs() < 1e-6);
    assert_eq!(tracker.velocity, RotationVelocity(rotation));
}

#[test]
fn moves_without_a_drag_do_not_rotate() {
    let mut tracker = GestureTracker::new();
    let moved = tracker.pointer_move(Vec2::new(50.0, 50.0));
    assert!(moved.rotation.is_none());
    assert!(!moved.suppress_default);
}

#[test]
fn touch_suppresses_scrolling_only_past_the_tap_radius() {
    let mut tracker = GestureTracker::new();
    tracker.pointer_down(Vec2::new(0.0, 0.0), PointerKind::Touch);
    assert!(!tracker.pointer_move(Vec2::new(3.0, 0.0)).suppress_default);
    assert!(tracker.pointer_move(Vec2::new(12.0, 0.0)).suppress_default);
    let end = tracker.pointer_up();
    assert!(end.was_dragging);
    assert!(end.was_drag);
}

#[test]
fn short_release_is_not_a_drag() {
    let mut tracker = GestureTracker::new();
    tracker.pointer_down(Vec2::new(10.0, 10.0), PointerKind::Mouse);
    tracker.pointer_move(Vec2::new(12.0, 11.0));
    let end = tracker.pointer_up();
    assert!(end.was_dragging);
    assert!(!end.was_drag);
    assert_eq!(end.position, Some(Vec2::new(12.0, 11.0)));
}

#[test]
fn momentum_decays_to_exactly_zero() {
    let mut globe = Globe::default();
    let mut velocity = RotationVelocity(Vec2::new(0.02, -0.03));
    let mut previous = velocity.0.length();
    let mut frames = 0;
    while !velocity.is_zero() {
        velocity.step(&mut globe);
        let now = velocity.0.length();
        assert!(now < previous);
        previous = now;
        frames += 1;
        assert!(frames < 1000, "momentum never settled");
    }
    // ~0.95^n: from 3e-2 to below 1e-4 takes a bit over a hundred frames
    assert!(frames > 50);
    assert!(globe.yaw < 0.0);
}

#[test]
fn pointer_down_kills_momentum() {
    let mut tracker = GestureTracker::new();
    tracker.velocity = RotationVelocity(Vec2::new(0.1, 0.1));
    tracker.pointer_down(Vec2::ZERO, PointerKind::Touch);
    assert!(tracker.velocity.is_zero());
}

#[test]
fn zoom_stays_inside_the_distance_band() {
    let mut ctx = InteractionContext::default();
    for _ in 0..50 {
        apply_zoom(&mut ctx, ZoomInput::In);
    }
    assert!((ctx.camera.distance() - MIN_CAMERA_DISTANCE).abs() < 1e-4);
    for _ in 0..50 {
        apply_zoom(&mut ctx, ZoomInput::Wheel(500.0));
    }
    assert!((ctx.camera.distance() - MAX_CAMERA_DISTANCE_DESKTOP).abs() < 1e-4);
}

#[test]
fn mobile_portrait_allows_a_farther_camera() {
    let mut ctx = InteractionContext::default();
    ctx.viewport = Viewport::new(390.0, 844.0);
    for _ in 0..50 {
        apply_zoom(&mut ctx, ZoomInput::Out);
    }
    assert!((ctx.camera.distance() - 7.0).abs() < 1e-4);
}

#[test]
fn wheel_step_is_proportional_to_delta() {
    let mut ctx = InteractionContext::default();
    let before = ctx.camera.distance();
    let after = apply_zoom(&mut ctx, ZoomInput::Wheel(100.0));
    assert!((after - before - 0.1).abs() < 1e-4);
    // orientation is kept: still looking at the origin
    assert!(ctx.camera.forward().dot(-ctx.camera.eye.normalize()) > 0.9999);
}
