//! The interaction orchestrator.
//!
//! [`GlobeControls`] owns the scene context and every interaction component.
//! Input handlers and the per-frame callback are the only entry points; all
//! state changes happen inside them, on a single thread.

use crate::autorotate::{AutoRotateController, AutoRotateMode, RecenterEvent};
use crate::camera_anim::{CameraAnimator, CameraEvent, CameraSnapshot};
use crate::constants::{
    RECENTER_AFTER_ZOOM_MS, RESUME_DELAY_EVENT_OPEN_MS, RESUME_DELAY_HOVER_EXIT_MS,
    RESUME_DELAY_IDLE_MS,
};
use crate::context::InteractionContext;
use crate::error::SceneError;
use crate::frames::FrameKind;
use crate::gesture::{rotate_globe, GestureMove, GestureTracker, PointerKind, RotationVelocity};
use crate::hover::{pick_marker, HoverEngine, HoverTransition};
use crate::layout::{update_panels, update_station_pin_lines};
use crate::marker::{MarkerId, MarkerSpec};
use crate::picking::Ray;
use crate::pulse::{update_marker_pulse, update_pulse_rings};
use crate::services::Silent;
use crate::state::Viewport;
use crate::zoom::{apply_zoom, clamp_camera_distance, ZoomInput};
use glam::Vec2;

/// Runtime options, read once at setup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlsConfig {
    pub auto_rotate_enabled: bool,
    pub sound_enabled: bool,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            auto_rotate_enabled: true,
            sound_enabled: true,
        }
    }
}

/// Side effects the host (DOM) has to carry out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEffect {
    /// A drag started over an open event; hide its image.
    DragStarted,
    /// Bring back the event image hidden by an earlier drag.
    FadeInEventImage,
    EventOpened(MarkerId),
    EventClosed(MarkerId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Missed,
    /// The clicked marker's event was already open and got closed.
    Closed(MarkerId),
    OpenedAndZoomed(MarkerId),
    /// Moon, Mars and station events show the whole scene instead of zooming.
    OpenedAndReset(MarkerId),
}

pub struct GlobeControls {
    ctx: InteractionContext,
    gesture: GestureTracker,
    hover: HoverEngine,
    camera: CameraAnimator,
    autorotate: AutoRotateController,
    open_event: Option<MarkerId>,
    image_hidden: bool,
    overlay_blocking: bool,
    effects: Vec<HostEffect>,
}

impl GlobeControls {
    pub fn new(mut ctx: InteractionContext, config: ControlsConfig) -> Self {
        if !config.sound_enabled {
            ctx.set_sound(Box::new(Silent));
        }
        ctx.camera.aspect = ctx.viewport.aspect();
        ctx.apply_panel_visibility();
        log::info!(
            "[controls] ready, auto-rotate {}",
            if config.auto_rotate_enabled { "on" } else { "off" }
        );
        Self {
            ctx,
            gesture: GestureTracker::new(),
            hover: HoverEngine::new(),
            camera: CameraAnimator::new(),
            autorotate: AutoRotateController::new(config.auto_rotate_enabled),
            open_event: None,
            image_hidden: false,
            overlay_blocking: false,
            effects: Vec::new(),
        }
    }

    pub fn context(&self) -> &InteractionContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut InteractionContext {
        &mut self.ctx
    }

    pub fn hovered(&self) -> Option<MarkerId> {
        self.hover.hovered()
    }

    /// Marker whose event overlay is showing.
    pub fn current_event(&self) -> Option<MarkerId> {
        self.open_event
    }

    pub fn snapshot(&self) -> Option<CameraSnapshot> {
        self.camera.snapshot()
    }

    pub fn auto_rotate_mode(&self) -> AutoRotateMode {
        self.autorotate.mode()
    }

    pub fn auto_rotate(&self) -> &AutoRotateController {
        &self.autorotate
    }

    pub fn velocity(&self) -> RotationVelocity {
        self.gesture.velocity
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    pub fn is_camera_animating(&self) -> bool {
        self.camera.is_animating()
    }

    pub fn following(&self) -> Option<MarkerId> {
        self.camera.following()
    }

    pub fn drain_effects(&mut self) -> Vec<HostEffect> {
        std::mem::take(&mut self.effects)
    }

    fn ray_at(&self, pos: Vec2) -> Ray {
        self.ctx.camera.ray_from_ndc(self.ctx.viewport.to_ndc(pos))
    }

    // ---- pointer input ----

    pub fn pointer_down(&mut self, pos: Vec2, kind: PointerKind) {
        self.gesture.pointer_down(pos, kind);
        self.autorotate.interrupt();
        if self.open_event.is_some() {
            self.image_hidden = true;
            self.effects.push(HostEffect::DragStarted);
        }
    }

    pub fn pointer_move(&mut self, pos: Vec2, now_ms: f64) -> GestureMove {
        if !self.gesture.is_dragging() {
            self.gesture.pointer_move(pos);
            self.hover_at(pos, now_ms);
            return GestureMove::default();
        }
        let moved = self.gesture.pointer_move(pos);
        if let Some(rotation) = moved.rotation {
            rotate_globe(&mut self.ctx.globe, rotation);
        }
        if self.open_event.is_some() {
            self.autorotate.interrupt();
        }
        moved
    }

    /// Release the pointer. A release that never left the tap radius is
    /// handled as a click at the release position.
    pub fn pointer_up(&mut self, now_ms: f64) -> Option<ClickOutcome> {
        let end = self.gesture.pointer_up();
        if !end.was_dragging {
            return None;
        }
        self.schedule_release_resume(now_ms);
        let outcome = if end.was_drag {
            None
        } else {
            end.position.map(|pos| self.click_at(pos, now_ms))
        };
        self.restore_image_unless_recentering();
        outcome
    }

    /// The browser took the pointer away; treat it as a release without a click.
    pub fn pointer_cancel(&mut self, now_ms: f64) {
        if !self.gesture.cancel() {
            return;
        }
        self.schedule_release_resume(now_ms);
        self.restore_image_unless_recentering();
    }

    fn schedule_release_resume(&mut self, now_ms: f64) {
        if self.hover.hovered().is_some() {
            return;
        }
        let delay = if self.open_event.is_some() {
            RESUME_DELAY_EVENT_OPEN_MS
        } else {
            RESUME_DELAY_IDLE_MS
        };
        self.autorotate.schedule_resume(now_ms, delay);
    }

    /// Recentering fades the hidden event image back in once it gets close.
    /// When no recenter is coming, bring the image back right away.
    fn restore_image_unless_recentering(&mut self) {
        if !self.image_hidden {
            return;
        }
        let on_globe = self
            .open_event
            .and_then(|id| self.ctx.markers.get(id).ok())
            .is_some_and(|m| m.frame == FrameKind::Globe);
        if on_globe && self.autorotate.resume_pending() {
            return;
        }
        self.image_hidden = false;
        self.effects.push(HostEffect::FadeInEventImage);
    }

    /// Pointer left the container: drop the hover as if it moved off the marker.
    pub fn pointer_leave(&mut self, now_ms: f64) {
        if let Some(marker) = self.hover.clear(&mut self.ctx) {
            self.on_hover_transition(HoverTransition::Exited(marker), now_ms);
        }
    }

    fn hover_at(&mut self, pos: Vec2, now_ms: f64) {
        if self.overlay_blocking {
            return;
        }
        let ray = self.ray_at(pos);
        let transition = self.hover.update(&mut self.ctx, ray, now_ms);
        self.on_hover_transition(transition, now_ms);
    }

    fn on_hover_transition(&mut self, transition: HoverTransition, now_ms: f64) {
        if transition.entered().is_some() {
            self.autorotate.interrupt();
        } else if transition.exited().is_some() && self.open_event.is_none() {
            self.autorotate
                .schedule_resume(now_ms, RESUME_DELAY_HOVER_EXIT_MS);
        }
    }

    /// Route a click: toggle the open event or open a new one.
    pub fn click_at(&mut self, pos: Vec2, now_ms: f64) -> ClickOutcome {
        let ray = self.ray_at(pos);
        let Some(marker) = pick_marker(&self.ctx, ray) else {
            return ClickOutcome::Missed;
        };
        let location = match self.ctx.markers.get(marker) {
            Ok(m) if m.event.is_some() => m.location,
            _ => return ClickOutcome::Missed,
        };
        if self.open_event == Some(marker) {
            self.close_event(now_ms);
            return ClickOutcome::Closed(marker);
        }
        self.open_event(marker);
        if location.resets_on_click() {
            self.reset_camera_to_default(now_ms);
            ClickOutcome::OpenedAndReset(marker)
        } else {
            match self.zoom_to_marker(marker, now_ms) {
                Ok(()) => ClickOutcome::OpenedAndZoomed(marker),
                Err(e) => {
                    log::debug!("[controls] zoom after click failed: {}", e);
                    ClickOutcome::OpenedAndReset(marker)
                }
            }
        }
    }

    // ---- events ----

    pub fn open_event(&mut self, marker: MarkerId) {
        if self.open_event == Some(marker) {
            return;
        }
        self.open_event = Some(marker);
        self.image_hidden = false;
        self.autorotate.reset_recenter();
        self.ctx.play_sound("open");
        self.effects.push(HostEffect::EventOpened(marker));
        log::info!("[controls] event {} opened", marker);
    }

    /// Close the open event. The camera stays where it is; idle spinning
    /// resumes after the usual delay.
    pub fn close_event(&mut self, now_ms: f64) {
        let Some(marker) = self.open_event.take() else {
            return;
        };
        self.image_hidden = false;
        self.overlay_blocking = false;
        self.autorotate.reset_recenter();
        self.autorotate.schedule_resume(now_ms, RESUME_DELAY_IDLE_MS);
        self.effects.push(HostEffect::EventClosed(marker));
        log::info!("[controls] event {} closed", marker);
    }

    /// The event image overlay is fully shown; hover testing pauses while it is.
    pub fn set_overlay_blocking(&mut self, blocking: bool) {
        self.overlay_blocking = blocking;
    }

    // ---- zoom & camera ----

    pub fn wheel(&mut self, delta_y: f32) {
        self.manual_zoom(ZoomInput::Wheel(delta_y));
    }

    pub fn zoom_in(&mut self) {
        self.manual_zoom(ZoomInput::In);
    }

    pub fn zoom_out(&mut self) {
        self.manual_zoom(ZoomInput::Out);
    }

    fn manual_zoom(&mut self, input: ZoomInput) {
        self.camera.cancel();
        self.camera.clear_snapshot();
        apply_zoom(&mut self.ctx, input);
    }

    pub fn on_window_resize(&mut self, width: f32, height: f32) {
        self.ctx.viewport = Viewport::new(width, height);
        self.ctx.camera.aspect = self.ctx.viewport.aspect();
        clamp_camera_distance(&mut self.ctx);
        log::debug!(
            "[controls] resize {}x{} mobile={}",
            width,
            height,
            self.ctx.viewport.is_mobile()
        );
    }

    pub fn zoom_to_marker(&mut self, marker: MarkerId, now_ms: f64) -> Result<(), SceneError> {
        self.autorotate.interrupt();
        self.gesture.velocity.clear();
        self.camera.zoom_to_marker(&mut self.ctx, marker, now_ms)
    }

    pub fn reset_camera_to_default(&mut self, now_ms: f64) {
        self.autorotate.interrupt();
        self.gesture.velocity.clear();
        self.camera.reset_to_default(&mut self.ctx, now_ms);
    }

    pub fn return_to_previous_view(&mut self, now_ms: f64) {
        self.autorotate.interrupt();
        self.gesture.velocity.clear();
        self.camera.return_to_previous_view(&mut self.ctx, now_ms);
    }

    pub fn start_following_station(&mut self, marker: MarkerId) -> Result<(), SceneError> {
        self.ctx.markers.get(marker)?;
        self.camera.start_following(marker);
        Ok(())
    }

    pub fn stop_following_station(&mut self) {
        self.camera.stop_following();
    }

    pub fn set_auto_rotate_enabled(&mut self, enabled: bool, now_ms: f64) {
        self.autorotate.set_enabled(enabled);
        if enabled {
            self.autorotate.schedule_resume(now_ms, 0.0);
        }
    }

    // ---- markers ----

    /// Rebuild the marker set for a new page or filter.
    pub fn replace_markers<I>(&mut self, specs: I, now_ms: f64) -> Vec<MarkerId>
    where
        I: IntoIterator<Item = MarkerSpec>,
    {
        self.clear_markers();
        let ids: Vec<MarkerId> = specs
            .into_iter()
            .map(|spec| self.ctx.markers.insert(spec, now_ms))
            .collect();
        self.ctx.apply_panel_visibility();
        log::debug!("[controls] {} markers", ids.len());
        ids
    }

    pub fn add_marker(&mut self, spec: MarkerSpec, now_ms: f64) -> MarkerId {
        self.ctx.markers.insert(spec, now_ms)
    }

    pub fn clear_markers(&mut self) {
        self.hover.clear(&mut self.ctx);
        self.ctx.markers.clear();
        self.ctx.pin_lines.clear();
        self.camera.stop_following();
        if self.open_event.take().is_some() {
            self.autorotate.reset_recenter();
        }
    }

    pub fn set_marker_animating(&mut self, marker: MarkerId, animating: bool) -> Result<(), SceneError> {
        self.ctx.markers.get_mut(marker)?.is_animating = animating;
        Ok(())
    }

    // ---- per-frame steps ----

    pub fn update_pulse_rings(&mut self, now_ms: f64) {
        update_pulse_rings(&mut self.ctx, now_ms);
    }

    pub fn update_marker_pulse(&mut self, now_ms: f64) {
        update_marker_pulse(&mut self.ctx, now_ms);
    }

    pub fn update_station_pin_lines(&mut self) {
        update_station_pin_lines(&mut self.ctx);
    }

    /// Run one frame: timers, momentum, auto-rotation, camera, decals, layout.
    pub fn frame(&mut self, now_ms: f64) {
        self.hover.tick(&mut self.ctx, now_ms);

        if !self.gesture.is_dragging() {
            self.gesture.velocity.step(&mut self.ctx.globe);
        }

        let recenter = self.autorotate.tick(
            &mut self.ctx,
            now_ms,
            self.open_event,
            &mut self.gesture.velocity,
        );
        if matches!(
            recenter,
            Some(RecenterEvent::NinetyPercent | RecenterEvent::Converged | RecenterEvent::Stalled)
        ) && self.image_hidden
        {
            self.image_hidden = false;
            self.effects.push(HostEffect::FadeInEventImage);
        }

        match self.camera.tick(&mut self.ctx, now_ms) {
            Some(CameraEvent::ZoomCompleted(marker)) => {
                if self.open_event == Some(marker) {
                    self.autorotate
                        .schedule_resume(now_ms, RECENTER_AFTER_ZOOM_MS);
                }
            }
            Some(CameraEvent::ResetCompleted | CameraEvent::ReturnCompleted) => {
                self.autorotate.schedule_resume(now_ms, RESUME_DELAY_IDLE_MS);
            }
            None => {}
        }

        self.update_pulse_rings(now_ms);
        self.update_marker_pulse(now_ms);
        self.update_station_pin_lines();
        update_panels(&mut self.ctx, self.hover.hovered());
    }
}
