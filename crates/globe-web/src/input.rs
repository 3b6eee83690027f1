use glam::Vec2;
use web_sys as web;

/// Pointer position relative to the container, in CSS pixels.
///
/// The core works in the same units as [`Viewport`](globe_core::Viewport),
/// so no device-pixel scaling happens here.
#[inline]
pub fn pointer_container_px(ev: &web::MouseEvent, container: &web::Element) -> Vec2 {
    let rect = container.get_bounding_client_rect();
    Vec2::new(
        ev.client_x() as f32 - rect.left() as f32,
        ev.client_y() as f32 - rect.top() as f32,
    )
}

/// Milliseconds since page load, the clock every core timestamp uses.
#[inline]
pub fn now_ms() -> f64 {
    instant::now()
}
