use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Latitude/longitude of a direction, in radians.
///
/// Latitude is `asin(y)`, longitude is `atan2(z, x)` of the normalized vector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatLon {
    pub lat: f32,
    pub lon: f32,
}

impl LatLon {
    pub fn of(direction: Vec3) -> Option<Self> {
        let n = direction.try_normalize()?;
        Some(Self {
            lat: n.y.clamp(-1.0, 1.0).asin(),
            lon: n.z.atan2(n.x),
        })
    }

    /// Signed (Δlat, Δlon) from `self` to `target`, longitude taking the short way round.
    pub fn delta_to(self, target: LatLon) -> (f32, f32) {
        (target.lat - self.lat, wrap_angle(target.lon - self.lon))
    }
}

/// Wrap an angle into [-π, π].
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped < -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}
