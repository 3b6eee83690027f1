use globe_core::{HostEffect, MarkerId};
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

pub const DEFAULT_IMAGE_ID: &str = "event-image";
const FADE_IN_CLASS: &str = "fade-in";

fn event_image(document: &web::Document, image_id: &str) -> Option<web::HtmlElement> {
    document
        .get_element_by_id(image_id)?
        .dyn_into::<web::HtmlElement>()
        .ok()
}

/// Only the inline `opacity` is touched; the page's own inline styles stay.
pub fn hide_image(document: &web::Document, image_id: &str) {
    if let Some(el) = event_image(document, image_id) {
        let _ = el.class_list().remove_1(FADE_IN_CLASS);
        let _ = el.style().set_property("opacity", "0");
    }
}

/// Restart the CSS fade-in on the event image.
pub fn fade_in_image(document: &web::Document, image_id: &str) {
    let Some(el) = event_image(document, image_id) else {
        return;
    };
    let _ = el.class_list().remove_1(FADE_IN_CLASS);
    let _ = el.style().set_property("opacity", "0");
    // Reading layout forces a reflow so the class change restarts the transition.
    let _ = el.offset_height();
    let _ = el.style().remove_property("opacity");
    let _ = el.class_list().add_1(FADE_IN_CLASS);
}

fn dispatch(container: &web::Element, kind: &str, marker: MarkerId) {
    let init = web::CustomEventInit::new();
    init.set_detail(&JsValue::from(marker.0));
    init.set_bubbles(true);
    match web::CustomEvent::new_with_event_init_dict(kind, &init) {
        Ok(ev) => {
            let _ = container.dispatch_event(&ev);
        }
        Err(e) => log::error!("[overlay] {} event: {:?}", kind, e),
    }
}

/// Carry out the DOM side of everything the controls queued since the last drain.
pub fn apply_effects(
    document: &web::Document,
    container: &web::Element,
    image_id: &str,
    effects: Vec<HostEffect>,
) {
    for effect in effects {
        match effect {
            HostEffect::DragStarted => hide_image(document, image_id),
            HostEffect::FadeInEventImage => fade_in_image(document, image_id),
            HostEffect::EventOpened(marker) => dispatch(container, "globe-event-open", marker),
            HostEffect::EventClosed(marker) => dispatch(container, "globe-event-close", marker),
        }
    }
}
