//! Tunables for the audio-to-visual mapping and the analyser feeding it.
//!
//! Every number the per-frame mapping uses lives in [`MapperConfig`] so the
//! two visual presets differ only in data. Configurations are validated once
//! at startup; a config that would break the attack/release dead band or the
//! clamp bands is rejected instead of being corrected at runtime.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("`{field}` must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },
    #[error("release threshold {release} dB must be below attack threshold {attack} dB")]
    ThresholdOrder { attack: f32, release: f32 },
    #[error("bloom band [{min}, {max}] must satisfy 0 < min < max")]
    BloomBand { min: f32, max: f32 },
    #[error("fov band [{min}, {max}] must satisfy 0 < min < max < 180")]
    FovBand { min: f32, max: f32 },
    #[error("initial fov {fov} lies outside [{min}, {max}]")]
    InitialFov { fov: f32, min: f32, max: f32 },
    #[error("`{field}` must not be negative, got {value}")]
    NegativeGain { field: &'static str, value: f32 },
    #[error("fft size {0} must be a power of two in [32, 32768]")]
    FftSize(u32),
    #[error("smoothing {0} must lie in [0, 1]")]
    Smoothing(f32),
    #[error("a spectrum needs at least one frequency bin")]
    NoBins,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapperConfig {
    pub attack_threshold_db: f32,
    pub release_threshold_db: f32,
    pub min_bloom_strength: f32,
    pub max_bloom_strength: f32,
    pub min_fov: f32,
    pub max_fov: f32,
    pub initial_fov: f32,
    pub bar_scale_offset_db: f32,
    pub initial_bar_scale: f32,
    /// Radians added every frame regardless of audio.
    pub base_rotation_speed: f32,
    pub attack_bloom_gain: f32,
    pub attack_fov_gain: f32,
    /// Signed: `rotation += bass * attack_rotation_gain` while attacking.
    pub attack_rotation_gain: f32,
    pub release_bloom_gain: f32,
    pub release_fov_gain: f32,
    /// Floor for `-inf` bins, which the analyser reports for pure silence.
    pub silence_floor_db: f32,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Preset::default().mapper_config()
    }
}

impl MapperConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("attack_threshold_db", self.attack_threshold_db),
            ("release_threshold_db", self.release_threshold_db),
            ("min_bloom_strength", self.min_bloom_strength),
            ("max_bloom_strength", self.max_bloom_strength),
            ("min_fov", self.min_fov),
            ("max_fov", self.max_fov),
            ("initial_fov", self.initial_fov),
            ("bar_scale_offset_db", self.bar_scale_offset_db),
            ("initial_bar_scale", self.initial_bar_scale),
            ("base_rotation_speed", self.base_rotation_speed),
            ("attack_bloom_gain", self.attack_bloom_gain),
            ("attack_fov_gain", self.attack_fov_gain),
            ("attack_rotation_gain", self.attack_rotation_gain),
            ("release_bloom_gain", self.release_bloom_gain),
            ("release_fov_gain", self.release_fov_gain),
            ("silence_floor_db", self.silence_floor_db),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }
        if self.release_threshold_db >= self.attack_threshold_db {
            return Err(ConfigError::ThresholdOrder {
                attack: self.attack_threshold_db,
                release: self.release_threshold_db,
            });
        }
        if self.min_bloom_strength <= 0.0 || self.min_bloom_strength >= self.max_bloom_strength {
            return Err(ConfigError::BloomBand {
                min: self.min_bloom_strength,
                max: self.max_bloom_strength,
            });
        }
        if self.min_fov <= 0.0 || self.min_fov >= self.max_fov || self.max_fov >= 180.0 {
            return Err(ConfigError::FovBand {
                min: self.min_fov,
                max: self.max_fov,
            });
        }
        if self.initial_fov < self.min_fov || self.initial_fov > self.max_fov {
            return Err(ConfigError::InitialFov {
                fov: self.initial_fov,
                min: self.min_fov,
                max: self.max_fov,
            });
        }
        let gains = [
            ("attack_bloom_gain", self.attack_bloom_gain),
            ("attack_fov_gain", self.attack_fov_gain),
            ("release_bloom_gain", self.release_bloom_gain),
            ("release_fov_gain", self.release_fov_gain),
        ];
        for (field, value) in gains {
            if value < 0.0 {
                return Err(ConfigError::NegativeGain { field, value });
            }
        }
        Ok(())
    }
}

/// WebAudio analyser settings. The bin count handed to the mapper is
/// `fft_size / 2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnalyserConfig {
    pub fft_size: u32,
    pub smoothing: f32,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 128,
            smoothing: 0.8,
        }
    }
}

impl AnalyserConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fft_size.is_power_of_two() || !(32..=32768).contains(&self.fft_size) {
            return Err(ConfigError::FftSize(self.fft_size));
        }
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(ConfigError::Smoothing(self.smoothing));
        }
        Ok(())
    }

    #[inline]
    pub fn bin_count(&self) -> usize {
        (self.fft_size / 2) as usize
    }
}

/// The two tunings of the effect, each paired with the track it was made for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Preset {
    #[default]
    ToosieSlide,
    EnjoyYourself,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::ToosieSlide, Preset::EnjoyYourself];

    pub fn name(self) -> &'static str {
        match self {
            Preset::ToosieSlide => "toosie-slide",
            Preset::EnjoyYourself => "enjoy-yourself",
        }
    }

    pub fn track_url(self) -> &'static str {
        match self {
            Preset::ToosieSlide => "sounds/toosieslide.mp3",
            Preset::EnjoyYourself => "sounds/enjoy-yourself.mp3",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    /// Pick the preset named by `preset=<name>` in a URL query string such as
    /// `?preset=enjoy-yourself&x=1`. Unknown or missing names give the default.
    pub fn from_query(query: &str) -> Self {
        query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "preset")
            .and_then(|(_, value)| Self::from_name(value))
            .unwrap_or_default()
    }

    pub fn mapper_config(self) -> MapperConfig {
        let base = MapperConfig {
            attack_threshold_db: -25.0,
            release_threshold_db: -27.0,
            min_bloom_strength: 1.3,
            max_bloom_strength: 5.0,
            min_fov: 20.0,
            max_fov: 75.0,
            initial_fov: 75.0,
            bar_scale_offset_db: 85.0,
            initial_bar_scale: 1.0,
            base_rotation_speed: 0.0005,
            attack_bloom_gain: 0.01,
            attack_fov_gain: 0.05,
            attack_rotation_gain: -0.0001,
            release_bloom_gain: 0.0015,
            release_fov_gain: 0.025,
            silence_floor_db: -100.0,
        };
        match self {
            Preset::ToosieSlide => base,
            Preset::EnjoyYourself => MapperConfig {
                attack_threshold_db: -20.0,
                release_threshold_db: -22.0,
                attack_rotation_gain: 0.001,
                ..base
            },
        }
    }
}
