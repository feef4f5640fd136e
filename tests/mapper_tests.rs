// Host-side tests for the audio-to-visual parameter mapper.

use app_core::{
    BassPhase, ConfigError, FrameOutcome, MapperConfig, ParameterMapper, Preset, RenderTarget,
    SpectrumSource,
};
use rand::prelude::*;

const BINS: usize = 64;

fn make_mapper() -> ParameterMapper {
    ParameterMapper::new(MapperConfig::default(), BINS).expect("default config is valid")
}

fn snapshot_with_bass(bass: f32, rest: f32) -> Vec<f32> {
    let mut s = vec![rest; BINS];
    s[0] = bass;
    s
}

#[derive(Default)]
struct RecordingTarget {
    bars: Vec<Option<f32>>,
    bloom: Option<f32>,
    fov: Option<f32>,
    fov_refreshes: usize,
    rotation: f32,
    writes: usize,
}

impl RecordingTarget {
    fn with_bars(n: usize) -> Self {
        Self {
            bars: vec![None; n],
            ..Default::default()
        }
    }
}

impl RenderTarget for RecordingTarget {
    fn set_bar_scale(&mut self, index: usize, scale: f32) {
        self.bars[index] = Some(scale);
        self.writes += 1;
    }
    fn set_bloom_strength(&mut self, strength: f32) {
        self.bloom = Some(strength);
        self.writes += 1;
    }
    fn set_fov(&mut self, fov_degrees: f32) {
        self.fov = Some(fov_degrees);
        self.writes += 1;
    }
    fn on_fov_changed(&mut self) {
        self.fov_refreshes += 1;
    }
    fn add_rotation(&mut self, delta_radians: f32) {
        self.rotation += delta_radians;
        self.writes += 1;
    }
}

struct FixedSource {
    bins: Vec<f32>,
    ready: bool,
}

impl SpectrumSource for FixedSource {
    fn bin_count(&self) -> usize {
        self.bins.len()
    }
    fn snapshot(&mut self) -> Option<&[f32]> {
        self.ready.then_some(self.bins.as_slice())
    }
}

#[test]
fn bar_scale_follows_exact_linear_law() {
    let mut mapper = make_mapper();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let snap: Vec<f32> = (0..BINS).map(|_| rng.gen_range(-140.0..10.0)).collect();
        mapper.update(&snap);
        let offset = mapper.config().bar_scale_offset_db;
        for (i, db) in snap.iter().enumerate() {
            assert_eq!(mapper.state().bar_scale[i], db + offset, "bar {i}");
        }
    }
}

#[test]
fn bloom_and_fov_stay_in_band_for_arbitrary_input() {
    let mut mapper = make_mapper();
    let cfg = mapper.config().clone();
    let mut rng = StdRng::seed_from_u64(42);
    for frame in 0..10_000 {
        // Long loud and quiet stretches as well as noise.
        let bass = match (frame / 500) % 3 {
            0 => rng.gen_range(-10.0..10.0),
            1 => rng.gen_range(-140.0..-30.0),
            _ => rng.gen_range(-140.0..10.0),
        };
        mapper.update(&snapshot_with_bass(bass, -60.0));
        let st = mapper.state();
        assert!(
            st.bloom_strength >= cfg.min_bloom_strength
                && st.bloom_strength <= cfg.max_bloom_strength,
            "bloom {} out of band at frame {frame}",
            st.bloom_strength
        );
        assert!(
            st.camera_fov >= cfg.min_fov && st.camera_fov <= cfg.max_fov,
            "fov {} out of band at frame {frame}",
            st.camera_fov
        );
    }
}

#[test]
fn fov_never_exceeds_ceiling_under_repeated_release() {
    let mut mapper = make_mapper();
    for _ in 0..40 {
        mapper.update(&snapshot_with_bass(-2.0, -50.0));
    }
    assert!(mapper.state().camera_fov < 75.0);
    for _ in 0..500 {
        mapper.update(&snapshot_with_bass(-120.0, -50.0));
        assert!(mapper.state().camera_fov <= mapper.config().max_fov);
    }
    assert_eq!(mapper.state().camera_fov, 75.0);
}

#[test]
fn dead_band_does_not_undo_an_attack() {
    let mut mapper = make_mapper();
    for _ in 0..3 {
        assert_eq!(
            mapper.update(&snapshot_with_bass(-5.0, -40.0)),
            FrameOutcome::Applied(BassPhase::Rising)
        );
    }
    let risen = mapper.state().clone();
    assert!(risen.bloom_strength > 1.3);

    // Between release (-27) and attack (-25)
    let outcome = mapper.update(&snapshot_with_bass(-26.0, -40.0));
    assert_eq!(outcome, FrameOutcome::Applied(BassPhase::Idle));
    assert_eq!(mapper.state().bloom_strength, risen.bloom_strength);
    assert_eq!(mapper.state().camera_fov, risen.camera_fov);
}

#[test]
fn dead_band_input_is_idempotent() {
    let mut mapper = make_mapper();
    for _ in 0..5 {
        mapper.update(&snapshot_with_bass(-5.0, -40.0));
    }
    let before = mapper.state().clone();
    for bass in [-27.0, -26.5, -26.0, -25.5, -25.0] {
        for _ in 0..20 {
            mapper.update(&snapshot_with_bass(bass, -40.0));
            assert_eq!(mapper.state().bloom_strength, before.bloom_strength);
            assert_eq!(mapper.state().camera_fov, before.camera_fov);
            assert_eq!(mapper.phase(), BassPhase::Idle);
        }
    }
}

#[test]
fn steady_quiet_input_settles_bars_and_leaves_effects_alone() {
    let mut mapper = make_mapper();
    let snap = vec![-40.0_f32; BINS];
    for _ in 0..100 {
        mapper.update(&snap);
    }
    let st = mapper.state();
    assert!(st.bar_scale.iter().all(|s| *s == 45.0));
    assert_eq!(st.bloom_strength, 1.3);
    assert_eq!(st.camera_fov, 75.0);
    assert!((st.rotation_offset - 100.0 * 0.0005).abs() < 1e-5);
}

#[test]
fn loud_bass_raises_bloom_every_frame_up_to_max() {
    let mut mapper = make_mapper();
    let mut prev = mapper.state().bloom_strength;
    assert_eq!(prev, 1.3);
    for frame in 0..10 {
        mapper.update(&snapshot_with_bass(-5.0, -40.0));
        let now = mapper.state().bloom_strength;
        assert!(now > prev, "frame {frame}: {now} <= {prev}");
        assert!(now <= 5.0);
        prev = now;
    }
    // 1.3 * 1.05^10
    assert!((prev - 2.1175).abs() < 1e-3, "got {prev}");
    // fov narrows by 0.25 per frame
    assert!((mapper.state().camera_fov - 72.5).abs() < 1e-3);
}

#[test]
fn quiet_bass_after_attack_decays_bloom_to_min() {
    let mut mapper = make_mapper();
    for _ in 0..10 {
        mapper.update(&snapshot_with_bass(-5.0, -40.0));
    }
    let mut prev = mapper.state().bloom_strength;
    for frame in 0..50 {
        mapper.update(&snapshot_with_bass(-30.0, -40.0));
        let now = mapper.state().bloom_strength;
        if prev > 1.3 {
            assert!(now < prev, "frame {frame}: {now} >= {prev}");
        } else {
            assert_eq!(now, prev);
        }
        assert!(now >= 1.3, "frame {frame}: {now} below min");
        prev = now;
    }
    assert_eq!(prev, 1.3);
    assert_eq!(mapper.state().camera_fov, 75.0);
}

#[test]
fn attack_stops_once_bloom_hits_ceiling() {
    let mut mapper = make_mapper();
    // -20 dB: bloom grows 20% and fov narrows 1 degree per frame.
    for frame in 0..8 {
        assert_eq!(
            mapper.update(&snapshot_with_bass(-20.0, -40.0)),
            FrameOutcome::Applied(BassPhase::Rising),
            "frame {frame}"
        );
    }
    assert_eq!(mapper.state().bloom_strength, 5.0);
    assert!((mapper.state().camera_fov - 67.0).abs() < 1e-4);

    // At the ceiling the attack gate closes and fov holds.
    assert_eq!(
        mapper.update(&snapshot_with_bass(-20.0, -40.0)),
        FrameOutcome::Applied(BassPhase::Idle)
    );
    assert!((mapper.state().camera_fov - 67.0).abs() < 1e-4);
}

#[test]
fn presets_spin_in_opposite_directions_on_attack() {
    let snap = snapshot_with_bass(-5.0, -40.0);

    let mut toosie = ParameterMapper::new(Preset::ToosieSlide.mapper_config(), BINS).unwrap();
    toosie.update(&snap);
    // 0.0005 + (-5 * -0.0001)
    assert!((toosie.state().rotation_offset - 0.001).abs() < 1e-6);

    let mut enjoy = ParameterMapper::new(Preset::EnjoyYourself.mapper_config(), BINS).unwrap();
    enjoy.update(&snap);
    // 0.0005 + (-5 * 0.001), wrapped into [0, TAU)
    let expected = std::f32::consts::TAU - 0.0045;
    assert!((enjoy.state().rotation_offset - expected).abs() < 1e-5);
}

#[test]
fn short_snapshot_keeps_trailing_bars() {
    let mut mapper = make_mapper();
    mapper.update(&[-40.0; 10]);
    let st = mapper.state();
    assert!(st.bar_scale[..10].iter().all(|s| *s == 45.0));
    assert!(st.bar_scale[10..].iter().all(|s| *s == 1.0));
}

#[test]
fn long_snapshot_ignores_extra_bins() {
    let mut mapper = make_mapper();
    mapper.update(&vec![-50.0; BINS * 2]);
    assert_eq!(mapper.state().bar_scale.len(), BINS);
    assert!(mapper.state().bar_scale.iter().all(|s| *s == 35.0));
}

#[test]
fn empty_snapshot_is_idle() {
    let mut mapper = make_mapper();
    let before = mapper.state().clone();
    assert_eq!(mapper.update(&[]), FrameOutcome::Idle);
    assert_eq!(mapper.state(), &before);
}

#[test]
fn nan_bass_skips_effects_but_not_bars() {
    let mut mapper = make_mapper();
    for _ in 0..5 {
        mapper.update(&snapshot_with_bass(-5.0, -40.0));
    }
    let before = mapper.state().clone();
    mapper.update(&snapshot_with_bass(f32::NAN, -40.0));
    let st = mapper.state();
    assert_eq!(st.bloom_strength, before.bloom_strength);
    assert_eq!(st.camera_fov, before.camera_fov);
    assert!(st.bar_scale[0].is_nan());
    assert_eq!(st.bar_scale[1], 45.0);
}

#[test]
fn silent_bins_are_floored_for_the_release_branch() {
    let mut mapper = make_mapper();
    for _ in 0..5 {
        mapper.update(&snapshot_with_bass(-5.0, -40.0));
    }
    let risen = mapper.state().bloom_strength;
    mapper.update(&snapshot_with_bass(f32::NEG_INFINITY, f32::NEG_INFINITY));
    let st = mapper.state();
    // Floored at -100 dB: bloom *= 1 - 0.15
    assert!((st.bloom_strength - (risen * 0.85).max(1.3)).abs() < 1e-5);
    assert!(st.bloom_strength.is_finite());
    assert!(st.camera_fov.is_finite());
    assert_eq!(st.bar_scale[3], f32::NEG_INFINITY);
}

#[test]
fn tick_does_nothing_until_source_is_ready() {
    let mut mapper = make_mapper();
    let before = mapper.state().clone();
    let mut source = FixedSource {
        bins: vec![-10.0; BINS],
        ready: false,
    };
    let mut target = RecordingTarget::with_bars(BINS);
    for _ in 0..10 {
        assert_eq!(mapper.tick(&mut source, &mut target), FrameOutcome::Idle);
    }
    assert_eq!(mapper.state(), &before);
    assert_eq!(target.writes, 0);

    source.ready = true;
    assert_eq!(
        mapper.tick(&mut source, &mut target),
        FrameOutcome::Applied(BassPhase::Rising)
    );
    assert!(target.bars.iter().all(|b| *b == Some(75.0)));
}

#[test]
fn apply_writes_every_slot_and_refreshes_fov_only_on_change() {
    let mut mapper = make_mapper();
    let mut target = RecordingTarget::with_bars(BINS);

    let mut quiet = FixedSource {
        bins: vec![-40.0; BINS],
        ready: true,
    };
    mapper.tick(&mut quiet, &mut target);
    assert!(target.bars.iter().all(|b| *b == Some(45.0)));
    assert_eq!(target.bloom, Some(1.3));
    assert_eq!(target.fov, None);
    assert_eq!(target.fov_refreshes, 0);
    assert!((target.rotation - 0.0005).abs() < 1e-7);

    let mut loud = FixedSource {
        bins: snapshot_with_bass(-5.0, -40.0),
        ready: true,
    };
    mapper.tick(&mut loud, &mut target);
    assert_eq!(target.fov, Some(mapper.state().camera_fov));
    assert_eq!(target.fov_refreshes, 1);
    assert_eq!(target.bloom, Some(mapper.state().bloom_strength));
}

#[test]
fn rotation_is_forwarded_as_accumulated_delta() {
    let mut mapper = make_mapper();
    let mut target = RecordingTarget::with_bars(BINS);
    let snap = vec![-40.0; BINS];
    mapper.update(&snap);
    mapper.update(&snap);
    mapper.update(&snap);
    mapper.apply(&mut target);
    assert!((target.rotation - 0.0015).abs() < 1e-7);
    // Nothing pending: a second apply adds no rotation.
    mapper.apply(&mut target);
    assert!((target.rotation - mapper.state().rotation_offset).abs() < 1e-7);
}

#[test]
fn construction_rejects_bad_inputs() {
    assert_eq!(
        ParameterMapper::new(MapperConfig::default(), 0).err(),
        Some(ConfigError::NoBins)
    );
    let cfg = MapperConfig {
        release_threshold_db: -19.0,
        ..MapperConfig::default()
    };
    assert!(matches!(
        ParameterMapper::new(cfg, BINS),
        Err(ConfigError::ThresholdOrder { .. })
    ));
}

#[test]
fn initial_state_comes_from_config() {
    let cfg = MapperConfig {
        initial_fov: 60.0,
        initial_bar_scale: 2.0,
        ..MapperConfig::default()
    };
    let mapper = ParameterMapper::new(cfg, 8).unwrap();
    let st = mapper.state();
    assert_eq!(st.bar_scale, vec![2.0; 8]);
    assert_eq!(st.bloom_strength, 1.3);
    assert_eq!(st.camera_fov, 60.0);
    assert_eq!(st.rotation_offset, 0.0);
    assert_eq!(mapper.phase(), BassPhase::Idle);
}

#[test]
fn silence_at_rest_changes_nothing_but_spin() {
    let mut mapper = make_mapper();
    let silent = vec![f32::NEG_INFINITY; BINS];
    for _ in 0..100 {
        assert_eq!(
            mapper.update(&silent),
            FrameOutcome::Applied(BassPhase::Idle)
        );
        assert_eq!(mapper.state().bloom_strength, 1.3);
        assert_eq!(mapper.state().camera_fov, 75.0);
    }
    let mut target = RecordingTarget::with_bars(BINS);
    mapper.apply(&mut target);
    assert_eq!(target.fov, None);
}

#[test]
fn rotation_offset_wraps_and_keeps_advancing() {
    use std::f32::consts::TAU;
    let mut mapper = make_mapper();
    let snap = vec![-40.0; BINS];
    // Several full turns at the base speed.
    for _ in 0..100_000 {
        mapper.update(&snap);
        let r = mapper.state().rotation_offset;
        assert!((0.0..TAU).contains(&r), "offset {r} escaped [0, TAU)");
    }
    let before = mapper.state().rotation_offset;
    mapper.update(&snap);
    let step = (mapper.state().rotation_offset - before).rem_euclid(TAU);
    assert!((step - 0.0005).abs() < 1e-5, "step {step}");
}

#[test]
fn reverse_spin_wraps_below_zero() {
    use std::f32::consts::TAU;
    let mut mapper =
        ParameterMapper::new(Preset::EnjoyYourself.mapper_config(), BINS).unwrap();
    let snap = snapshot_with_bass(-5.0, -40.0);
    for _ in 0..5_000 {
        mapper.update(&snap);
        let r = mapper.state().rotation_offset;
        assert!((0.0..TAU).contains(&r), "offset {r} escaped [0, TAU)");
    }
}

#[test]
fn source_bin_count_is_checked_against_bars() {
    let mapper = make_mapper();
    let matching = FixedSource {
        bins: vec![-40.0; BINS],
        ready: true,
    };
    let short = FixedSource {
        bins: vec![-40.0; BINS / 2],
        ready: true,
    };
    assert!(mapper.check_source(&matching));
    assert!(!mapper.check_source(&short));
}
