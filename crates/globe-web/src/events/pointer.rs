use super::InputWiring;
use crate::dom::{add_active_listener, add_listener};
use crate::input::{now_ms, pointer_container_px};
use globe_core::PointerKind;
use wasm_bindgen::JsCast;
use web_sys as web;

fn pointer_kind(ev: &web::PointerEvent) -> PointerKind {
    match ev.pointer_type().as_str() {
        "touch" | "pen" => PointerKind::Touch,
        _ => PointerKind::Mouse,
    }
}

/// Pointer events cover mouse and touch; the container captures the pointer
/// for the length of a gesture so drags keep rotating outside it.
pub fn wire_input_handlers(w: &InputWiring) {
    let target: &web::EventTarget = w.container.unchecked_ref();

    // The page must not pan or pinch-zoom while the globe is being dragged.
    if let Some(html) = w.container.dyn_ref::<web::HtmlElement>() {
        let _ = html.style().set_property("touch-action", "none");
    }

    // pointerdown
    {
        let w = w.clone();
        add_listener(target, "pointerdown", move |ev: web::PointerEvent| {
            if ev.button() > 0 {
                return;
            }
            if let Some(sound) = &w.sound {
                sound.resume();
            }
            let _ = w.container.set_pointer_capture(ev.pointer_id());
            let pos = pointer_container_px(&ev, &w.container);
            w.controls.borrow_mut().pointer_down(pos, pointer_kind(&ev));
            w.flush_effects();
        });
    }

    // pointermove: hover when idle, rotation while dragging
    {
        let w = w.clone();
        add_active_listener(target, "pointermove", move |ev: web::PointerEvent| {
            let pos = pointer_container_px(&ev, &w.container);
            let moved = w.controls.borrow_mut().pointer_move(pos, now_ms());
            if moved.suppress_default {
                ev.prevent_default();
            }
            w.flush_effects();
        });
    }

    // pointerup: end of drag, or a click/tap
    {
        let w = w.clone();
        add_listener(target, "pointerup", move |ev: web::PointerEvent| {
            let _ = w.container.release_pointer_capture(ev.pointer_id());
            let outcome = w.controls.borrow_mut().pointer_up(now_ms());
            if let Some(outcome) = outcome {
                log::debug!("[input] click -> {:?}", outcome);
            }
            w.flush_effects();
        });
    }

    {
        let w = w.clone();
        add_listener(target, "pointercancel", move |_ev: web::PointerEvent| {
            w.controls.borrow_mut().pointer_cancel(now_ms());
            w.flush_effects();
        });
    }

    {
        let w = w.clone();
        add_listener(target, "pointerleave", move |_ev: web::PointerEvent| {
            w.controls.borrow_mut().pointer_leave(now_ms());
        });
    }

    // wheel zoom; non-passive so the page does not scroll underneath
    {
        let w = w.clone();
        add_active_listener(target, "wheel", move |ev: web::WheelEvent| {
            ev.prevent_default();
            w.controls.borrow_mut().wheel(ev.delta_y() as f32);
        });
    }
}
