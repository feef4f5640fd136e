#![cfg(target_arch = "wasm32")]
use app_core::constants::STAR_COUNT;
use app_core::scene::seeded_starfield;
use app_core::stats::FrameStats;
use app_core::{AnalyserConfig, OrbitCamera, ParameterMapper, Preset};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod dom;
mod events;
mod frame;
mod input;
mod overlay;
mod render;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        // The frame loop picks up the new size and refreshes the aspect ratio.
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

fn wire_overlay_buttons(audio_ctx: &web::AudioContext, paused: &Rc<Cell<bool>>) {
    if let Some(document) = dom::window_document() {
        for id in ["overlay-ok", "overlay-close"] {
            let paused_ok = paused.clone();
            let audio_ok = audio_ctx.clone();
            dom::add_click_listener(&document, id, move || {
                events::keyboard::set_paused(&audio_ok, &paused_ok, false);
                if let Some(d2) = dom::window_document() {
                    overlay::hide(&d2);
                }
            });
        }
    }
}

/// Fetch, decode and start the preset's track, then flag the spectrum as live.
fn spawn_track_loader(graph: Rc<audio::AudioGraph>, preset: Preset, ready: Rc<Cell<bool>>) {
    spawn_local(async move {
        let url = preset.track_url();
        log::info!("[audio] loading {}", url);
        let result = match audio::load_track(&graph.ctx, url).await {
            Ok(buffer) => audio::play_looped(&graph, &buffer),
            Err(e) => Err(e),
        };
        match result {
            Ok(_src) => {
                ready.set(true);
                if let Some(document) = dom::window_document() {
                    overlay::set_status(&document, "Ready");
                }
            }
            Err(e) => {
                log::error!("[audio] track load failed: {:?}", e);
                if let Some(document) = dom::window_document() {
                    overlay::set_status(&document, &format!("Could not load {}", url));
                }
            }
        }
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("app-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id("app-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #app-canvas"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    wire_canvas_resize(&canvas);

    let preset = Preset::from_query(&dom::query_string());
    let analyser_cfg = AnalyserConfig::default();
    let mapper = ParameterMapper::new(preset.mapper_config(), analyser_cfg.bin_count())?;
    log::info!(
        "[init] preset={} bins={}",
        preset.name(),
        mapper.bar_count()
    );

    let graph = Rc::new(audio::build_graph(&analyser_cfg)?);
    // Paused until the start overlay is dismissed (autoplay policy).
    let paused = Rc::new(Cell::new(true));
    let ready = Rc::new(Cell::new(false));
    wire_overlay_buttons(&graph.ctx, &paused);
    spawn_track_loader(graph.clone(), preset, ready.clone());

    let orbit = Rc::new(RefCell::new(OrbitCamera::default()));
    events::wire_global_keydown(graph.ctx.clone(), paused.clone(), orbit.clone());
    events::wire_input_handlers(events::InputWiring {
        canvas: canvas.clone(),
        orbit: orbit.clone(),
        drag_state: Rc::new(RefCell::new(input::DragState::default())),
    });

    let stars = seeded_starfield(STAR_COUNT, js_sys::Math::random().to_bits());
    let gpu = frame::init_gpu(&canvas, &mapper, &stars).await;
    if gpu.is_none() {
        overlay::set_status(&document, "WebGPU is not available in this browser");
    }

    let spectrum = audio::AnalyserSpectrum::new(graph.analyser.clone(), ready);
    mapper.check_source(&spectrum);
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        preset,
        mapper,
        spectrum,
        paused,
        orbit,
        canvas,
        document,
        gpu,
        stats: FrameStats::default(),
        last_instant: Instant::now(),
        last_fps: None,
        idle_frames: 0,
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
