use crate::audio::AnalyserSpectrum;
use crate::overlay;
use crate::render;
use app_core::stats::FrameStats;
use app_core::{FrameOutcome, OrbitCamera, ParameterMapper, Preset, RenderTarget};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub preset: Preset,
    pub mapper: ParameterMapper,
    pub spectrum: AnalyserSpectrum,
    pub paused: Rc<Cell<bool>>,
    pub orbit: Rc<RefCell<OrbitCamera>>,
    pub canvas: web::HtmlCanvasElement,
    pub document: web::Document,
    pub gpu: Option<render::GpuState<'a>>,
    pub stats: FrameStats,
    pub last_instant: Instant,
    pub last_fps: Option<f32>,
    pub idle_frames: u32,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;

        let Some(g) = &mut self.gpu else {
            return;
        };

        if !self.paused.get() {
            match self.mapper.tick(&mut self.spectrum, g) {
                FrameOutcome::Idle => {
                    if self.idle_frames == 0 {
                        log::info!("[frame] waiting for audio");
                    }
                    self.idle_frames = self.idle_frames.saturating_add(1);
                }
                FrameOutcome::Applied(_) => {
                    if self.idle_frames > 0 {
                        log::info!("[frame] audio live after {} idle frames", self.idle_frames);
                        self.idle_frames = 0;
                    }
                }
            }
        }

        g.resize_if_needed(self.canvas.width(), self.canvas.height());
        let orbit = self.orbit.borrow().clone();
        if let Err(e) = g.render(&orbit) {
            log::error!("render error: {:?}", e);
        }

        if let Some(fps) = self.stats.record(dt_sec) {
            self.last_fps = Some(fps);
            let state = self.mapper.state();
            overlay::update_hint(
                &self.document,
                self.preset.name(),
                state.bloom_strength,
                state.camera_fov,
                self.last_fps,
                self.paused.get(),
            );
        }
    }
}

/// Create the renderer and push the mapper's starting values into it.
pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    mapper: &ParameterMapper,
    stars: &[app_core::scene::StarInstance],
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    let state = mapper.state().clone();
    match render::GpuState::new(
        leaked_canvas,
        mapper.bar_count(),
        stars,
        state.camera_fov,
        state.bloom_strength,
    )
    .await
    {
        Ok(mut g) => {
            for (i, s) in state.bar_scale.iter().enumerate() {
                g.set_bar_scale(i, *s);
            }
            Some(g)
        }
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
