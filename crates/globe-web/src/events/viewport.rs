use super::InputWiring;
use crate::dom::{add_listener, element_size, sync_canvas_backing_size};
use wasm_bindgen::JsCast;
use web_sys as web;

/// Push the container size into the controls and the canvas backing store.
pub fn sync_viewport(w: &InputWiring, canvas: &web::HtmlCanvasElement) {
    let (width, height) = element_size(&w.container);
    sync_canvas_backing_size(canvas);
    w.controls.borrow_mut().on_window_resize(width, height);
}

pub fn wire_resize_handlers(w: &InputWiring, canvas: &web::HtmlCanvasElement) {
    let Some(window) = web::window() else {
        return;
    };
    for kind in ["resize", "orientationchange"] {
        let w = w.clone();
        let canvas = canvas.clone();
        add_listener(window.unchecked_ref(), kind, move |_ev: web::Event| {
            sync_viewport(&w, &canvas);
        });
    }
}
