use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Attach `handler` to `target` for the page lifetime.
pub fn add_listener<E>(target: &web::EventTarget, kind: &str, handler: impl FnMut(E) + 'static)
where
    E: FromWasmAbi + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    if let Err(e) = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref()) {
        log::error!("[dom] {} listener: {:?}", kind, e);
    }
    closure.forget();
}

/// Same as [`add_listener`] but registered non-passive, so the handler may
/// call `prevent_default` on wheel and touch events.
pub fn add_active_listener<E>(
    target: &web::EventTarget,
    kind: &str,
    handler: impl FnMut(E) + 'static,
) where
    E: FromWasmAbi + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    let options = web::AddEventListenerOptions::new();
    options.set_passive(false);
    if let Err(e) = target.add_event_listener_with_callback_and_add_event_listener_options(
        kind,
        closure.as_ref().unchecked_ref(),
        &options,
    ) {
        log::error!("[dom] {} listener: {:?}", kind, e);
    }
    closure.forget();
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// Container size in CSS pixels.
pub fn element_size(el: &web::Element) -> (f32, f32) {
    let rect = el.get_bounding_client_rect();
    (rect.width() as f32, rect.height() as f32)
}

/// Boolean `data-*` attribute; absent or unparsable falls back to `default`.
pub fn data_flag(el: &web::Element, name: &str, default: bool) -> bool {
    match el.get_attribute(&format!("data-{}", name)).as_deref() {
        Some("true") | Some("1") | Some("on") => true,
        Some("false") | Some("0") | Some("off") => false,
        _ => default,
    }
}

pub fn data_string(el: &web::Element, name: &str) -> Option<String> {
    el.get_attribute(&format!("data-{}", name))
        .filter(|v| !v.is_empty())
}
