pub mod keyboard;
pub mod pointer;
pub mod viewport;

use crate::audio::WebSound;
use crate::overlay;
use globe_core::GlobeControls;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

pub use keyboard::wire_global_keydown;
pub use pointer::wire_input_handlers;
pub use viewport::wire_resize_handlers;

/// Handles every DOM listener shares with the frame loop.
#[derive(Clone)]
pub struct InputWiring {
    pub document: web::Document,
    pub container: web::Element,
    pub controls: Rc<RefCell<GlobeControls>>,
    pub sound: Option<WebSound>,
    pub image_id: Rc<str>,
}

impl InputWiring {
    /// Apply the DOM effects the controls queued during the last call.
    pub fn flush_effects(&self) {
        let effects = self.controls.borrow_mut().drain_effects();
        if !effects.is_empty() {
            overlay::apply_effects(&self.document, &self.container, &self.image_id, effects);
        }
    }
}
