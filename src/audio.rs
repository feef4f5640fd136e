use app_core::constants::TRACK_VOLUME;
use app_core::{AnalyserConfig, SpectrumSource};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

fn js_err(e: wasm_bindgen::JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

/// Track gain feeding an analyser that passes audio through to the speakers.
pub struct AudioGraph {
    pub ctx: web::AudioContext,
    pub gain: web::GainNode,
    pub analyser: web::AnalyserNode,
}

fn create_gain(audio_ctx: &web::AudioContext, value: f32, label: &str) -> anyhow::Result<web::GainNode> {
    match web::GainNode::new(audio_ctx) {
        Ok(g) => {
            g.gain().set_value(value);
            Ok(g)
        }
        Err(e) => {
            log::error!("{} GainNode error: {:?}", label, e);
            Err(js_err(e))
        }
    }
}

pub fn build_graph(analyser_cfg: &AnalyserConfig) -> anyhow::Result<AudioGraph> {
    analyser_cfg.validate()?;
    let ctx = web::AudioContext::new().map_err(js_err)?;
    let gain = create_gain(&ctx, TRACK_VOLUME, "Track")?;
    let analyser = web::AnalyserNode::new(&ctx).map_err(|e| {
        log::error!("AnalyserNode error: {:?}", e);
        js_err(e)
    })?;
    analyser.set_fft_size(analyser_cfg.fft_size);
    analyser.set_smoothing_time_constant(analyser_cfg.smoothing as f64);

    // gain -> analyser -> destination
    _ = gain.connect_with_audio_node(&analyser);
    _ = analyser.connect_with_audio_node(&ctx.destination());
    log::info!(
        "[audio] analyser fft={} bins={}",
        analyser.fft_size(),
        analyser.frequency_bin_count()
    );
    Ok(AudioGraph {
        ctx,
        gain,
        analyser,
    })
}

/// Fetch and decode a track into an `AudioBuffer`.
pub async fn load_track(ctx: &web::AudioContext, url: &str) -> anyhow::Result<web::AudioBuffer> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let resp: web::Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    if !resp.ok() {
        anyhow::bail!("fetch {} failed: HTTP {}", url, resp.status());
    }
    let bytes: js_sys::ArrayBuffer = JsFuture::from(resp.array_buffer().map_err(js_err)?)
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    let decoded = JsFuture::from(ctx.decode_audio_data(&bytes).map_err(js_err)?)
        .await
        .map_err(js_err)?;
    decoded.dyn_into::<web::AudioBuffer>().map_err(js_err)
}

/// Start `buffer` looping into the graph's gain node.
pub fn play_looped(
    graph: &AudioGraph,
    buffer: &web::AudioBuffer,
) -> anyhow::Result<web::AudioBufferSourceNode> {
    let src = graph.ctx.create_buffer_source().map_err(js_err)?;
    src.set_buffer(Some(buffer));
    src.set_loop(true);
    src.connect_with_audio_node(&graph.gain).map_err(js_err)?;
    #[allow(deprecated)]
    src.start().map_err(js_err)?;
    log::info!("[audio] playing {:.1}s loop", buffer.duration());
    Ok(src)
}

/// Analyser-backed spectrum. Reports nothing until `ready` is raised by the
/// track loader, so the mapper idles while the track downloads and decodes.
pub struct AnalyserSpectrum {
    analyser: web::AnalyserNode,
    buf: Vec<f32>,
    ready: Rc<Cell<bool>>,
}

impl AnalyserSpectrum {
    pub fn new(analyser: web::AnalyserNode, ready: Rc<Cell<bool>>) -> Self {
        let bins = analyser.frequency_bin_count() as usize;
        Self {
            analyser,
            buf: vec![0.0; bins],
            ready,
        }
    }
}

impl SpectrumSource for AnalyserSpectrum {
    fn bin_count(&self) -> usize {
        self.buf.len()
    }

    fn snapshot(&mut self) -> Option<&[f32]> {
        if !self.ready.get() {
            return None;
        }
        self.analyser.get_float_frequency_data(&mut self.buf);
        Some(&self.buf)
    }
}
