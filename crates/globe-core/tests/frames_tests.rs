// Frame resolution, surface bases, picking and panel/station layout.

use globe_core::frames::{decal_world_transform, marker_world_position, resolve_frame, SurfaceBasis};
use globe_core::hover::pick_marker;
use globe_core::layout::{update_panels, update_station_pin_lines};
use globe_core::marker::MarkerSpec;
use globe_core::picking::{ray_sphere, Ray};
use globe_core::services::SharedStation;
use globe_core::{
    EventPayload, FrameKind, InteractionContext, LocationType, SceneError, StationPose, Viewport,
};
use glam::{Quat, Vec3};

fn event(position: Vec3, location: LocationType) -> MarkerSpec {
    MarkerSpec::event(position, location, EventPayload::default())
}

fn station_context(pose: StationPose) -> InteractionContext {
    let station = SharedStation::new();
    station.set(Some(pose));
    let mut ctx = InteractionContext::default();
    ctx.set_satellite(Box::new(station));
    ctx
}

#[test]
fn surface_basis_is_right_handed_and_orthonormal() {
    let normals = [
        Vec3::Z,
        Vec3::Y,
        -Vec3::Y,
        Vec3::new(0.3, 0.95, 0.1),
        Vec3::new(-0.7, 0.2, -0.4),
    ];
    for n in normals {
        let b = SurfaceBasis::from_normal(n);
        assert!((b.normal.length() - 1.0).abs() < 1e-5);
        assert!((b.tangent.length() - 1.0).abs() < 1e-5);
        assert!((b.bitangent.length() - 1.0).abs() < 1e-5);
        assert!(b.tangent.dot(b.normal).abs() < 1e-5);
        assert!(b.bitangent.dot(b.normal).abs() < 1e-5);
        assert!((b.tangent.cross(b.bitangent) - b.normal).length() < 1e-4);
        // the basis rotation takes the circle's +Z onto the normal
        assert!((b.rotation() * Vec3::Z - b.normal).length() < 1e-4);
    }
}

#[test]
fn globe_markers_follow_the_globe_rotation() {
    let mut ctx = InteractionContext::default();
    let id = ctx.markers.insert(event(Vec3::X, LocationType::Earth), 0.0);
    ctx.globe.yaw = std::f32::consts::FRAC_PI_2;
    let world = marker_world_position(&ctx, ctx.markers.get(id).unwrap()).unwrap();
    // rotating +X by 90 degrees about Y lands on -Z
    assert!((world - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
}

#[test]
fn station_frame_needs_the_satellite() {
    let mut ctx = InteractionContext::default();
    let id = ctx.markers.insert(event(Vec3::ZERO, LocationType::Station), 0.0);
    let marker = ctx.markers.get(id).unwrap();
    assert_eq!(marker.frame, FrameKind::Station);
    assert_eq!(resolve_frame(&ctx, marker).unwrap_err(), SceneError::MissingSatellite);
    assert!(!ctx.frame_visible(FrameKind::Station));
}

#[test]
fn station_decals_face_away_from_the_globe() {
    let pose = StationPose {
        position: Vec3::new(0.0, 1.4, 0.0),
        rotation: Quat::from_rotation_z(0.7),
    };
    let mut ctx = station_context(pose);
    let id = ctx.markers.insert(event(Vec3::ZERO, LocationType::Station), 0.0);
    let marker = ctx.markers.get(id).unwrap();
    let world = decal_world_transform(&ctx, marker, Vec3::ONE).unwrap();
    let facing = world.transform_vector3(Vec3::Z).normalize();
    // normal in world space points from the globe centre to the satellite
    assert!((facing - Vec3::Y).length() < 1e-4);
}

#[test]
fn ray_sphere_hits_in_front_only() {
    let hit = ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, 5.0), 1.0);
    assert!((hit.unwrap() - 4.0).abs() < 1e-5);
    assert!(ray_sphere(Vec3::ZERO, -Vec3::Z, Vec3::new(0.0, 0.0, 5.0), 1.0).is_none());
}

#[test]
fn picking_skips_the_far_hemisphere() {
    let mut ctx = InteractionContext::default();
    let back = ctx.markers.insert(event(-Vec3::Z, LocationType::Earth), 0.0);
    let ray = Ray::new(ctx.camera.eye, -Vec3::Z);
    assert_eq!(pick_marker(&ctx, ray), None);

    let front = ctx.markers.insert(event(Vec3::Z, LocationType::Earth), 0.0);
    assert_eq!(pick_marker(&ctx, ray), Some(front));
    assert_ne!(pick_marker(&ctx, ray), Some(back));
}

#[test]
fn locked_and_secondary_markers_are_not_pickable() {
    let mut ctx = InteractionContext::default();
    let mut locked = event(Vec3::Z, LocationType::Earth);
    locked.is_locked = true;
    ctx.markers.insert(locked, 0.0);
    let mut secondary = event(Vec3::Z, LocationType::Earth);
    secondary.is_interactive = false;
    ctx.markers.insert(secondary, 0.0);
    let ray = Ray::new(ctx.camera.eye, -Vec3::Z);
    assert_eq!(pick_marker(&ctx, ray), None);
}

#[test]
fn hidden_panels_hide_their_markers() {
    let mut ctx = InteractionContext::default();
    ctx.moon.position = Vec3::new(0.0, 0.0, 1.5);
    let id = ctx.markers.insert(event(Vec3::ZERO, LocationType::Moon), 0.0);
    let ray = Ray::new(ctx.camera.eye, -Vec3::Z);
    assert_eq!(pick_marker(&ctx, ray), None);
    ctx.moon.visible = true;
    assert_eq!(pick_marker(&ctx, ray), Some(id));
}

#[test]
fn desktop_panels_stack_on_the_right() {
    let mut ctx = InteractionContext::default();
    ctx.camera.aspect = ctx.viewport.aspect();
    update_panels(&mut ctx, None);
    let moon = ctx.camera.project(ctx.moon.position).unwrap();
    let mars = ctx.camera.project(ctx.mars.position).unwrap();
    assert!(moon.x > 0.5 && mars.x > 0.5);
    assert!(moon.y > mars.y);
    assert!((moon.x - mars.x).abs() < 1e-3);
    // billboarded toward the camera
    let facing = ctx.moon.rotation * Vec3::Z;
    assert!(facing.dot(Vec3::Z) > 0.999);
}

#[test]
fn mobile_portrait_panels_sit_side_by_side_at_the_top() {
    let mut ctx = InteractionContext::default();
    ctx.viewport = Viewport::new(390.0, 844.0);
    ctx.camera.aspect = ctx.viewport.aspect();
    update_panels(&mut ctx, None);
    let moon = ctx.camera.project(ctx.moon.position).unwrap();
    let mars = ctx.camera.project(ctx.mars.position).unwrap();
    assert!(moon.y > 0.5 && mars.y > 0.5);
    assert!(moon.x < 0.0 && mars.x > 0.0);
    assert!((moon.y - mars.y).abs() < 1e-3);
}

#[test]
fn panels_fade_toward_their_visibility() {
    let mut ctx = InteractionContext::default();
    ctx.moon.visible = true;
    for _ in 0..5 {
        update_panels(&mut ctx, None);
    }
    assert!(ctx.moon.opacity > 0.3 && ctx.moon.opacity < 1.0);
    for _ in 0..50 {
        update_panels(&mut ctx, None);
    }
    assert!((ctx.moon.opacity - 1.0).abs() < 1e-6);
    assert_eq!(ctx.mars.opacity, 0.0);
}

#[test]
fn hovered_panel_glows() {
    let mut ctx = InteractionContext::default();
    ctx.mars.visible = true;
    let id = ctx.markers.insert(event(Vec3::ZERO, LocationType::Mars), 0.0);
    update_panels(&mut ctx, Some(id));
    assert!(ctx.mars.emissive > 0.0);
    assert_eq!(ctx.moon.emissive, 0.0);
}

#[test]
fn pin_lines_drop_from_station_markers_to_the_surface() {
    let pose = StationPose {
        position: Vec3::new(0.0, 0.0, 1.5),
        rotation: Quat::IDENTITY,
    };
    let mut ctx = station_context(pose);
    let id = ctx.markers.insert(event(Vec3::ZERO, LocationType::Station), 0.0);
    ctx.markers.insert(event(Vec3::Z, LocationType::Earth), 0.0);
    update_station_pin_lines(&mut ctx);
    assert_eq!(ctx.pin_lines.len(), 1);
    let line = ctx.pin_lines[0];
    assert_eq!(line.marker, id);
    assert!((line.start - Vec3::Z).length() < 1e-5);
    assert!((line.end - Vec3::new(0.0, 0.0, 1.5)).length() < 1e-5);
}

#[test]
fn no_satellite_no_pin_lines() {
    let mut ctx = InteractionContext::default();
    ctx.markers.insert(event(Vec3::ZERO, LocationType::Station), 0.0);
    update_station_pin_lines(&mut ctx);
    assert!(ctx.pin_lines.is_empty());
}
