//! Spatial frame resolver.
//!
//! Every marker carries an explicit [`FrameKind`] tag. This module turns that
//! tag into the parent world transform and the frame-local surface basis used
//! to lay flat decals (pulse rings) tangent to the surface they sit on.

use crate::constants::RING_SURFACE_OFFSET;
use crate::context::InteractionContext;
use crate::error::SceneError;
use crate::marker::Marker;
use glam::{Mat3, Mat4, Quat, Vec3};
use std::f32::consts::FRAC_PI_2;

/// Above this |normal · up| the world-right axis replaces world-up when
/// building a tangent.
const PARALLEL_TO_UP_DOT: f32 = 0.9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// Curved globe surface, parented to the rotating globe.
    Globe,
    /// Flat-map projection plane.
    FlatMap,
    MoonPanel,
    MarsPanel,
    /// Riding the moving satellite.
    Station,
}

impl FrameKind {
    /// Flat frames keep decals pinned to z = 1 when scaling.
    pub fn is_flat(self) -> bool {
        !matches!(self, FrameKind::Globe)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ResolvedFrame {
    pub kind: FrameKind,
    pub parent_world: Mat4,
    pub parent_rotation: Quat,
}

/// Locate the parent node of `marker`'s frame.
pub fn resolve_frame(
    ctx: &InteractionContext,
    marker: &Marker,
) -> Result<ResolvedFrame, SceneError> {
    let kind = marker.frame;
    match kind {
        FrameKind::Globe => Ok(ResolvedFrame {
            kind,
            parent_world: ctx.globe.world_matrix(),
            parent_rotation: ctx.globe.world_rotation(),
        }),
        FrameKind::Station => {
            let pose = ctx.find_satellite().ok_or(SceneError::MissingSatellite)?;
            Ok(ResolvedFrame {
                kind,
                parent_world: pose.world_matrix(),
                parent_rotation: pose.rotation,
            })
        }
        FrameKind::FlatMap | FrameKind::MoonPanel | FrameKind::MarsPanel => {
            let panel = ctx.panel(kind).ok_or(SceneError::HiddenFrame(kind))?;
            Ok(ResolvedFrame {
                kind,
                parent_world: panel.world_matrix(),
                parent_rotation: panel.rotation,
            })
        }
    }
}

/// Orthonormal right-handed frame on a surface: `tangent × bitangent = normal`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceBasis {
    pub normal: Vec3,
    pub tangent: Vec3,
    pub bitangent: Vec3,
}

impl SurfaceBasis {
    pub fn from_normal(normal: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        let reference = if normal.dot(Vec3::Y).abs() > PARALLEL_TO_UP_DOT {
            Vec3::X
        } else {
            Vec3::Y
        };
        let tangent = reference.cross(normal).normalize_or_zero();
        let bitangent = normal.cross(tangent);
        Self {
            normal,
            tangent,
            bitangent,
        }
    }

    /// Rotation taking local +Z onto the normal.
    pub fn rotation(&self) -> Quat {
        Quat::from_mat3(&Mat3::from_cols(self.tangent, self.bitangent, self.normal))
    }
}

/// Outward surface normal at `marker`, in the frame's local space.
pub fn surface_normal(
    ctx: &InteractionContext,
    marker: &Marker,
    frame: &ResolvedFrame,
) -> Result<Vec3, SceneError> {
    match frame.kind {
        FrameKind::Globe => marker
            .position
            .try_normalize()
            .ok_or(SceneError::DegenerateDirection(marker.id)),
        FrameKind::Station => {
            // The decal is parented to the satellite, so the world normal
            // (away from the globe centre) is brought into satellite space.
            let pose = ctx.find_satellite().ok_or(SceneError::MissingSatellite)?;
            let world_normal = (pose.position - ctx.globe.position)
                .try_normalize()
                .ok_or(SceneError::DegenerateDirection(marker.id))?;
            Ok(frame.parent_rotation.inverse() * world_normal)
        }
        FrameKind::FlatMap | FrameKind::MoonPanel | FrameKind::MarsPanel => Ok(Vec3::Z),
    }
}

/// Frame-local rotation that lays a +Z-facing circle flush with the surface.
pub fn decal_local_rotation(frame: FrameKind, normal: Vec3) -> Quat {
    // The circle primitive is rotated a quarter turn about its own normal.
    let quarter = Quat::from_rotation_z(FRAC_PI_2);
    match frame {
        FrameKind::Globe | FrameKind::Station => {
            SurfaceBasis::from_normal(normal).rotation() * quarter
        }
        FrameKind::FlatMap | FrameKind::MoonPanel | FrameKind::MarsPanel => quarter,
    }
}

pub fn marker_world_position(
    ctx: &InteractionContext,
    marker: &Marker,
) -> Result<Vec3, SceneError> {
    let frame = resolve_frame(ctx, marker)?;
    Ok(frame.parent_world.transform_point3(marker.position))
}

/// World transform of a decal centred on `marker` with the given local scale.
pub fn decal_world_transform(
    ctx: &InteractionContext,
    marker: &Marker,
    scale: Vec3,
) -> Result<Mat4, SceneError> {
    let frame = resolve_frame(ctx, marker)?;
    let normal = surface_normal(ctx, marker, &frame)?;
    let rotation = decal_local_rotation(frame.kind, normal);
    let position = marker.position + normal * RING_SURFACE_OFFSET;
    let local = Mat4::from_scale_rotation_translation(scale, rotation, position);
    Ok(frame.parent_world * local)
}
