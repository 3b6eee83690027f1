use crate::events::InputWiring;
use crate::input::now_ms;
use crate::render;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Frames slower than this get a warning in the console.
const SLOW_FRAME: Duration = Duration::from_millis(50);

pub struct FrameContext<'a> {
    pub wiring: InputWiring,
    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState<'a>>,
    pub last_instant: Instant,
}

impl<'a> FrameContext<'a> {
    pub fn new(
        wiring: InputWiring,
        canvas: web::HtmlCanvasElement,
        gpu: Option<render::GpuState<'a>>,
    ) -> Self {
        Self {
            wiring,
            canvas,
            gpu,
            last_instant: Instant::now(),
        }
    }

    pub fn frame(&mut self) {
        let started = Instant::now();
        let dt = started - self.last_instant;
        self.last_instant = started;
        if dt > SLOW_FRAME {
            log::trace!("[frame] {} ms since last frame", dt.as_millis());
        }

        self.wiring.controls.borrow_mut().frame(now_ms());
        self.wiring.flush_effects();

        if let Some(g) = &mut self.gpu {
            let (view_proj, instances) = {
                let controls = self.wiring.controls.borrow();
                (
                    controls.context().camera.view_proj(),
                    render::collect_instances(&controls),
                )
            };
            g.resize_if_needed(self.canvas.width(), self.canvas.height());
            if let Err(e) = g.render(view_proj, &instances) {
                log::error!("render error: {:?}", e);
            }
        }

        let spent = started.elapsed();
        if spent > SLOW_FRAME {
            log::warn!("[frame] slow frame: {} ms", spent.as_millis());
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    let cb = match tick.borrow().as_ref() {
        Some(closure) => closure.as_ref().clone(),
        None => return,
    };
    if let Err(e) = w.request_animation_frame(cb.unchecked_ref()) {
        log::error!("[frame] requestAnimationFrame: {:?}", e);
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}
