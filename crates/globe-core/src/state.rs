//! Scene-graph value types shared with the web frontend.
//!
//! These types avoid platform APIs. The front-end reads them to build camera
//! matrices and to place decals; the interaction components mutate them.

use crate::constants::{CAMERA_FOV_Y, CAMERA_ZFAR, CAMERA_ZNEAR, MOBILE_BREAKPOINT_PX};
use crate::picking::Ray;
use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

/// Right-handed perspective camera that always looks at `target`.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, crate::constants::DEFAULT_CAMERA_DISTANCE),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.0,
            fovy_radians: CAMERA_FOV_Y,
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Distance from the world origin, where the globe sits.
    pub fn distance(&self) -> f32 {
        self.eye.length()
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }

    /// Camera-space right and up axes derived from the current look direction.
    pub fn basis(&self) -> (Vec3, Vec3) {
        let forward = self.forward();
        let right = forward.cross(self.up).normalize_or_zero();
        let up = right.cross(forward);
        (right, up)
    }

    /// World-space height of the view frustum at `distance` along the view axis.
    pub fn visible_height_at(&self, distance: f32) -> f32 {
        2.0 * distance * (self.fovy_radians * 0.5).tan()
    }

    /// Unproject normalized device coordinates into a world-space ray starting at the eye.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_proj().inverse();
        let p_far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let p1: Vec3 = p_far.truncate() / p_far.w;
        Ray::new(self.eye, (p1 - self.eye).normalize_or_zero())
    }

    /// Project a world point to normalized device coordinates.
    pub fn project(&self, world: Vec3) -> Option<Vec3> {
        let clip = self.view_proj() * world.extend(1.0);
        (clip.w > 0.0).then(|| clip.truncate() / clip.w)
    }
}

/// The Earth node. Rotation is pitch about X then yaw about Y, in that
/// composition order (pitch outermost), matching an XYZ Euler triple.
#[derive(Clone, Debug, Default)]
pub struct Globe {
    pub position: Vec3,
    pub pitch: f32,
    pub yaw: f32,
}

impl Globe {
    pub fn rotation(&self) -> Vec2 {
        Vec2::new(self.pitch, self.yaw)
    }

    pub fn set_rotation(&mut self, rotation: Vec2) {
        self.pitch = rotation.x;
        self.yaw = rotation.y;
    }

    pub fn world_rotation(&self) -> Quat {
        Self::rotation_for(self.rotation())
    }

    /// Orientation the globe would have at the given (pitch, yaw).
    pub fn rotation_for(rotation: Vec2) -> Quat {
        Quat::from_rotation_x(rotation.x) * Quat::from_rotation_y(rotation.y)
    }

    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.world_rotation(), self.position)
    }
}

/// A flat auxiliary panel (Moon, Mars or the flat map).
#[derive(Clone, Debug)]
pub struct Panel {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub visible: bool,
    pub opacity: f32,
    pub emissive: f32,
}

impl Default for Panel {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            visible: false,
            opacity: 0.0,
            emissive: 0.0,
        }
    }
}

impl Panel {
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// World pose of the moving satellite, as reported by the transport feed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StationPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl StationPose {
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }
}

/// Size of the container the globe is drawn into, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(1.0)
    }

    pub fn is_mobile(&self) -> bool {
        self.width <= MOBILE_BREAKPOINT_PX
    }

    pub fn is_mobile_portrait(&self) -> bool {
        self.is_mobile() && self.height > self.width
    }

    /// Container pixel coordinates to normalized device coordinates (y up).
    pub fn to_ndc(&self, px: Vec2) -> Vec2 {
        Vec2::new(
            (px.x / self.width) * 2.0 - 1.0,
            1.0 - (px.y / self.height) * 2.0,
        )
    }
}
