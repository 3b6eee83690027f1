use super::InputWiring;
use crate::dom::add_listener;
use crate::input::now_ms;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn handle_global_keydown(ev: &web::KeyboardEvent, w: &InputWiring) {
    // Leave typing in form fields alone.
    if let Some(target) = ev.target() {
        if let Some(el) = target.dyn_ref::<web::Element>() {
            if matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT") {
                return;
            }
        }
    }
    let now = now_ms();
    let mut controls = w.controls.borrow_mut();
    match ev.key().as_str() {
        "Escape" => {
            controls.close_event(now);
            controls.return_to_previous_view(now);
        }
        "+" | "=" => controls.zoom_in(),
        "-" | "_" => controls.zoom_out(),
        _ => return,
    }
    drop(controls);
    w.flush_effects();
}

pub fn wire_global_keydown(w: &InputWiring) {
    let Some(window) = web::window() else {
        return;
    };
    let w = w.clone();
    add_listener(window.unchecked_ref(), "keydown", move |ev: web::KeyboardEvent| {
        handle_global_keydown(&ev, &w);
    });
}
