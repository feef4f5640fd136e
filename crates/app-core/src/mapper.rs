//! Per-frame mapping from an audio spectrum to visual parameters.
//!
//! The mapper owns a [`VisualState`] and updates it once per rendered frame
//! from the analyser's frequency bins: bar heights follow every bin, while the
//! lowest bin (a bass proxy) drives bloom strength, camera field of view and
//! an extra spin through an attack/release pair of thresholds. Results are
//! pushed into whatever implements [`RenderTarget`].

use crate::config::{ConfigError, MapperConfig};
use crate::state::wrap_radians;

/// Something that can produce one spectrum per frame, in decibels.
pub trait SpectrumSource {
    fn bin_count(&self) -> usize;
    /// Current bins, or `None` while no audio is flowing yet.
    fn snapshot(&mut self) -> Option<&[f32]>;
}

/// Parameter slots on the renderer side that the mapper writes into.
pub trait RenderTarget {
    fn set_bar_scale(&mut self, index: usize, scale: f32);
    fn set_bloom_strength(&mut self, strength: f32);
    fn set_fov(&mut self, fov_degrees: f32);
    /// Called after `set_fov` whenever the value actually changed.
    fn on_fov_changed(&mut self) {}
    fn add_rotation(&mut self, delta_radians: f32);
}

#[derive(Clone, Debug, PartialEq)]
pub struct VisualState {
    pub bar_scale: Vec<f32>,
    pub bloom_strength: f32,
    pub camera_fov: f32,
    /// Accumulated spin in `[0, TAU)`.
    pub rotation_offset: f32,
}

impl VisualState {
    pub fn initial(config: &MapperConfig, bar_count: usize) -> Self {
        Self {
            bar_scale: vec![config.initial_bar_scale; bar_count],
            bloom_strength: config.min_bloom_strength,
            camera_fov: config.initial_fov,
            rotation_offset: 0.0,
        }
    }
}

/// Which side of the hysteresis loop the last frame landed on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BassPhase {
    #[default]
    Idle,
    Rising,
    Falling,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The source had nothing to offer; state and target were left alone.
    Idle,
    Applied(BassPhase),
}

pub struct ParameterMapper {
    config: MapperConfig,
    state: VisualState,
    phase: BassPhase,
    pending_rotation: f32,
    pending_fov_change: bool,
    last_mismatch: Option<usize>,
}

impl ParameterMapper {
    pub fn new(config: MapperConfig, bar_count: usize) -> Result<Self, ConfigError> {
        if bar_count == 0 {
            return Err(ConfigError::NoBins);
        }
        if let Err(e) = config.validate() {
            log::warn!("[mapper] rejected config: {}", e);
            return Err(e);
        }
        let state = VisualState::initial(&config, bar_count);
        Ok(Self {
            config,
            state,
            phase: BassPhase::Idle,
            pending_rotation: 0.0,
            pending_fov_change: false,
            last_mismatch: None,
        })
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn state(&self) -> &VisualState {
        &self.state
    }

    pub fn phase(&self) -> BassPhase {
        self.phase
    }

    pub fn bar_count(&self) -> usize {
        self.state.bar_scale.len()
    }

    /// Whether `source` delivers one bin per bar. A mismatch is logged; the
    /// mapper still runs, skipping or ignoring the unmatched bins.
    pub fn check_source<S: SpectrumSource + ?Sized>(&self, source: &S) -> bool {
        let bins = source.bin_count();
        if bins != self.bar_count() {
            log::warn!(
                "[mapper] source has {} bins for {} bars",
                bins,
                self.bar_count()
            );
            return false;
        }
        true
    }

    /// Advance the visual state by one frame. An empty snapshot is treated as
    /// "no audio yet" and leaves everything untouched.
    pub fn update(&mut self, snapshot: &[f32]) -> FrameOutcome {
        let Some(&first) = snapshot.first() else {
            return FrameOutcome::Idle;
        };
        let cfg = &self.config;
        let st = &mut self.state;

        if snapshot.len() != st.bar_scale.len() && self.last_mismatch != Some(snapshot.len()) {
            log::debug!(
                "[mapper] snapshot has {} bins for {} bars",
                snapshot.len(),
                st.bar_scale.len()
            );
            self.last_mismatch = Some(snapshot.len());
        }
        // Bars past the end of a short snapshot keep last frame's height.
        for (scale, db) in st.bar_scale.iter_mut().zip(snapshot) {
            *scale = db + cfg.bar_scale_offset_db;
        }

        let fov_before = st.camera_fov;
        let mut rotation = cfg.base_rotation_speed;
        self.phase = BassPhase::Idle;

        if !first.is_nan() {
            let bass = first.max(cfg.silence_floor_db);
            if bass > cfg.attack_threshold_db && st.bloom_strength < cfg.max_bloom_strength {
                st.bloom_strength += st.bloom_strength * (bass * -cfg.attack_bloom_gain);
                st.camera_fov -= bass * -cfg.attack_fov_gain;
                rotation += bass * cfg.attack_rotation_gain;
                self.phase = BassPhase::Rising;
            }
            if bass < cfg.release_threshold_db && st.bloom_strength > cfg.min_bloom_strength {
                st.bloom_strength -= st.bloom_strength * (bass * -cfg.release_bloom_gain);
                if st.camera_fov < cfg.max_fov {
                    st.camera_fov += bass * -cfg.release_fov_gain;
                }
                self.phase = BassPhase::Falling;
            }
        }

        st.bloom_strength = st
            .bloom_strength
            .clamp(cfg.min_bloom_strength, cfg.max_bloom_strength);
        st.camera_fov = st.camera_fov.clamp(cfg.min_fov, cfg.max_fov);
        st.rotation_offset = wrap_radians(st.rotation_offset + rotation);

        self.pending_rotation += rotation;
        self.pending_fov_change |= st.camera_fov != fov_before;
        FrameOutcome::Applied(self.phase)
    }

    /// Push the current state into `target`. Rotation is forwarded as the
    /// delta accumulated since the previous `apply`.
    pub fn apply<T: RenderTarget + ?Sized>(&mut self, target: &mut T) {
        for (i, scale) in self.state.bar_scale.iter().enumerate() {
            target.set_bar_scale(i, *scale);
        }
        target.set_bloom_strength(self.state.bloom_strength);
        if std::mem::take(&mut self.pending_fov_change) {
            target.set_fov(self.state.camera_fov);
            target.on_fov_changed();
        }
        let delta = std::mem::take(&mut self.pending_rotation);
        if delta != 0.0 {
            target.add_rotation(delta);
        }
    }

    /// One full frame: sample, update, apply.
    pub fn tick<S, T>(&mut self, source: &mut S, target: &mut T) -> FrameOutcome
    where
        S: SpectrumSource + ?Sized,
        T: RenderTarget + ?Sized,
    {
        let outcome = match source.snapshot() {
            Some(bins) => self.update(bins),
            None => FrameOutcome::Idle,
        };
        if outcome != FrameOutcome::Idle {
            self.apply(target);
        }
        outcome
    }
}
