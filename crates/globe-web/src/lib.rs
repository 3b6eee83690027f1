#![cfg(target_arch = "wasm32")]
//! Browser front-end for the timeline globe.
//!
//! `GlobeApp` is the handle JavaScript holds. It owns the DOM wiring around a
//! shared [`GlobeControls`] and exposes the camera, marker and station feeds.

mod audio;
mod dom;
mod events;
mod frame;
mod input;
mod overlay;
mod render;

use events::InputWiring;
use globe_core::services::{PageLocations, SharedStation, Silent, SoundFx};
use globe_core::{
    ControlsConfig, EventPayload, GlobeControls, InteractionContext, LocationType, MarkerId,
    MarkerSpec, StationPose,
};
use glam::{Quat, Vec3};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("globe-web loaded");
    Ok(())
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Reuse the container's canvas or append a full-size one.
fn container_canvas(
    document: &web::Document,
    container: &web::Element,
) -> anyhow::Result<web::HtmlCanvasElement> {
    let existing = container
        .query_selector("canvas")
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    let el = match existing {
        Some(el) => el,
        None => {
            let el = document
                .create_element("canvas")
                .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
            let _ = el.set_attribute("style", "width:100%;height:100%;display:block");
            container
                .append_child(&el)
                .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
            el
        }
    };
    el.dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))
}

#[wasm_bindgen]
pub struct GlobeApp {
    wiring: InputWiring,
    canvas: web::HtmlCanvasElement,
    station: SharedStation,
    locations: PageLocations,
    loop_started: bool,
}

impl GlobeApp {
    fn setup(container_id: &str) -> anyhow::Result<Self> {
        let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| anyhow::anyhow!("missing #{}", container_id))?;
        let canvas = container_canvas(&document, &container)?;

        let config = ControlsConfig {
            auto_rotate_enabled: dom::data_flag(&container, "auto-rotate", true),
            sound_enabled: dom::data_flag(&container, "sound", true),
        };
        let sound = if config.sound_enabled {
            audio::WebSound::new()
        } else {
            None
        };
        let station = SharedStation::new();
        let locations = PageLocations::new();
        let sound_fx: Box<dyn SoundFx> = match &sound {
            Some(s) => Box::new(s.clone()),
            None => Box::new(Silent),
        };
        let ctx = InteractionContext::new(
            Box::new(station.clone()),
            Box::new(locations.clone()),
            sound_fx,
        );
        let controls = Rc::new(RefCell::new(GlobeControls::new(ctx, config)));

        let image_id = dom::data_string(&container, "image-id")
            .unwrap_or_else(|| overlay::DEFAULT_IMAGE_ID.to_string());
        let wiring = InputWiring {
            document,
            container,
            controls,
            sound,
            image_id: image_id.into(),
        };
        events::wire_input_handlers(&wiring);
        events::wire_global_keydown(&wiring);
        events::wire_resize_handlers(&wiring, &canvas);
        events::viewport::sync_viewport(&wiring, &canvas);

        // Start at the default distance for this viewport, without animating.
        {
            let mut controls = wiring.controls.borrow_mut();
            let ctx = controls.context_mut();
            ctx.camera.eye = Vec3::Z * ctx.default_camera_distance();
            ctx.camera.look_at(Vec3::ZERO);
        }

        log::info!("[globe] controls ready on #{}", container_id);
        Ok(Self {
            wiring,
            canvas,
            station,
            locations,
            loop_started: false,
        })
    }

    fn with_controls<R>(&self, f: impl FnOnce(&mut GlobeControls, f64) -> R) -> R {
        let result = f(&mut self.wiring.controls.borrow_mut(), input::now_ms());
        self.wiring.flush_effects();
        result
    }
}

#[wasm_bindgen]
impl GlobeApp {
    /// Wire the globe into the element with id `container_id`.
    #[wasm_bindgen(js_name = setupControls)]
    pub fn setup_controls(container_id: &str) -> Result<GlobeApp, JsValue> {
        Self::setup(container_id).map_err(|e| {
            log::error!("setup error: {:?}", e);
            js_err(e)
        })
    }

    /// Begin rendering. WebGPU is acquired asynchronously; without it the
    /// controls still run so picking and the DOM overlay keep working.
    #[wasm_bindgen(js_name = startLoop)]
    pub fn start_loop(&mut self) {
        if self.loop_started {
            log::warn!("[globe] loop already running");
            return;
        }
        self.loop_started = true;
        let wiring = self.wiring.clone();
        let canvas = self.canvas.clone();
        spawn_local(async move {
            let gpu = frame::init_gpu(&canvas).await;
            let frame_ctx = frame::FrameContext::new(wiring, canvas, gpu);
            frame::start_loop(Rc::new(RefCell::new(frame_ctx)));
        });
    }

    #[wasm_bindgen(js_name = onWindowResize)]
    pub fn on_window_resize(&self) {
        events::viewport::sync_viewport(&self.wiring, &self.canvas);
    }

    #[wasm_bindgen(js_name = zoomToMarker)]
    pub fn zoom_to_marker(&self, id: u32) -> Result<(), JsValue> {
        self.with_controls(|c, now| c.zoom_to_marker(MarkerId(id), now))
            .map_err(js_err)
    }

    #[wasm_bindgen(js_name = resetCameraToDefault)]
    pub fn reset_camera_to_default(&self) {
        self.with_controls(|c, now| c.reset_camera_to_default(now));
    }

    #[wasm_bindgen(js_name = returnToPreviousView)]
    pub fn return_to_previous_view(&self) {
        self.with_controls(|c, now| c.return_to_previous_view(now));
    }

    #[wasm_bindgen(js_name = startFollowingStation)]
    pub fn start_following_station(&self, id: u32) -> Result<(), JsValue> {
        self.with_controls(|c, _| c.start_following_station(MarkerId(id)))
            .map_err(js_err)
    }

    #[wasm_bindgen(js_name = stopFollowingStation)]
    pub fn stop_following_station(&self) {
        self.with_controls(|c, _| c.stop_following_station());
    }

    #[wasm_bindgen(js_name = updatePulseRings)]
    pub fn update_pulse_rings(&self) {
        self.with_controls(|c, now| c.update_pulse_rings(now));
    }

    #[wasm_bindgen(js_name = updateMarkerPulse)]
    pub fn update_marker_pulse(&self) {
        self.with_controls(|c, now| c.update_marker_pulse(now));
    }

    #[wasm_bindgen(js_name = updateStationPinLines)]
    pub fn update_station_pin_lines(&self) {
        self.with_controls(|c, _| c.update_station_pin_lines());
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&self) {
        self.with_controls(|c, _| c.zoom_in());
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&self) {
        self.with_controls(|c, _| c.zoom_out());
    }

    /// Add an event marker at frame-local `(x, y, z)`; returns its id.
    #[wasm_bindgen(js_name = addMarker)]
    #[allow(clippy::too_many_arguments)]
    pub fn add_marker(
        &self,
        x: f32,
        y: f32,
        z: f32,
        location: &str,
        name: String,
        description: String,
        image: Option<String>,
        locked: bool,
    ) -> Result<u32, JsValue> {
        let location: LocationType = location.parse().map_err(js_err)?;
        let mut spec = MarkerSpec::event(
            Vec3::new(x, y, z),
            location,
            EventPayload {
                name,
                description,
                image,
            },
        );
        spec.is_locked = locked;
        Ok(self.with_controls(|c, now| c.add_marker(spec, now)).0)
    }

    #[wasm_bindgen(js_name = clearMarkers)]
    pub fn clear_markers(&self) {
        self.with_controls(|c, _| c.clear_markers());
    }

    #[wasm_bindgen(js_name = setMarkerAnimating)]
    pub fn set_marker_animating(&self, id: u32, animating: bool) -> Result<(), JsValue> {
        self.with_controls(|c, _| c.set_marker_animating(MarkerId(id), animating))
            .map_err(js_err)
    }

    /// Location types present on the current page, e.g. `["earth", "moon"]`.
    #[wasm_bindgen(js_name = setPageLocations)]
    pub fn set_page_locations(&self, locations: js_sys::Array) {
        let parsed = locations.iter().filter_map(|v| {
            let s = v.as_string()?;
            match s.parse::<LocationType>() {
                Ok(l) => Some(l),
                Err(e) => {
                    log::warn!("[globe] {}", e);
                    None
                }
            }
        });
        self.locations.set(parsed);
        self.with_controls(|c, _| c.context_mut().apply_panel_visibility());
    }

    #[wasm_bindgen(js_name = setStationPose)]
    #[allow(clippy::too_many_arguments)]
    pub fn set_station_pose(&self, x: f32, y: f32, z: f32, qx: f32, qy: f32, qz: f32, qw: f32) {
        self.station.set(Some(StationPose {
            position: Vec3::new(x, y, z),
            rotation: Quat::from_xyzw(qx, qy, qz, qw).normalize(),
        }));
    }

    #[wasm_bindgen(js_name = clearStationPose)]
    pub fn clear_station_pose(&self) {
        self.station.set(None);
    }

    #[wasm_bindgen(js_name = currentEvent)]
    pub fn current_event(&self) -> Option<u32> {
        self.wiring.controls.borrow().current_event().map(|m| m.0)
    }

    #[wasm_bindgen(js_name = closeEvent)]
    pub fn close_event(&self) {
        self.with_controls(|c, now| c.close_event(now));
    }

    /// The event image overlay is covering the globe; pause hover picking.
    #[wasm_bindgen(js_name = setOverlayBlocking)]
    pub fn set_overlay_blocking(&self, blocking: bool) {
        self.with_controls(|c, _| c.set_overlay_blocking(blocking));
    }

    #[wasm_bindgen(js_name = setAutoRotateEnabled)]
    pub fn set_auto_rotate_enabled(&self, enabled: bool) {
        self.with_controls(|c, now| c.set_auto_rotate_enabled(enabled, now));
    }
}
