use glam::Vec3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }
}

/// Distance along a normalized ray to the first intersection with a sphere.
///
/// Returns `None` for a miss or when the sphere lies behind the origin.
#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

/// Keep the closest of two candidate hits; ties keep the earlier one.
#[inline]
pub fn closer<T>(best: Option<(T, f32)>, candidate: (T, f32)) -> Option<(T, f32)> {
    match best {
        Some((_, bt)) if candidate.1 >= bt => best,
        _ => Some(candidate),
    }
}
