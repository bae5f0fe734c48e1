//! Property-based tests for the coefficient engine and the voice.

use hypersaw_synth::{
    CENTER_SLOT, Coefficients, DetuneCurve, Hypersaw, HypersawConfig, NORMALIZATION,
    NUM_OSCILLATORS, SmallRng, SummingMode, center_gain, side_gain,
};
use proptest::prelude::*;
use rand::SeedableRng;

fn curve_strategy() -> impl Strategy<Value = DetuneCurve> {
    prop_oneof![Just(DetuneCurve::Polynomial), Just(DetuneCurve::Quartic)]
}

fn config_strategy() -> impl Strategy<Value = HypersawConfig> {
    (
        curve_strategy(),
        prop_oneof![Just(SummingMode::Weighted), Just(SummingMode::Unweighted)],
        0.0f32..=1.0,
        0.0f32..=0.5,
    )
        .prop_map(|(detune_curve, summing, filter_drive, filter_resonance)| HypersawConfig {
            detune_curve,
            summing,
            filter_drive,
            filter_resonance,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Any detune input maps into [0, 1].
    #[test]
    fn detune_curve_in_unit_range(x in prop::num::f32::ANY, curve in curve_strategy()) {
        let y = curve.apply(x);
        prop_assert!((0.0..=1.0).contains(&y), "{:?}({}) = {}", curve, x, y);
    }

    /// Center frequency is the fundamental bit-for-bit, and the filter tracks it.
    #[test]
    fn center_exact(
        freq in 1.0f32..20000.0,
        detune in -2.0f32..3.0,
        mix in -2.0f32..3.0,
        curve in curve_strategy(),
    ) {
        let c = Coefficients::compute(freq, detune, mix, curve);
        prop_assert_eq!(c.frequencies[CENTER_SLOT], freq);
        prop_assert_eq!(c.filter_cutoff, freq);
    }

    /// Slot frequencies ascend with slot index whenever any detune is applied.
    #[test]
    fn slot_frequencies_ordered(
        freq in 20.0f32..10000.0,
        detune in 0.0f32..=1.0,
    ) {
        let c = Coefficients::compute(freq, detune, 0.5, DetuneCurve::Polynomial);
        for pair in c.frequencies.windows(2) {
            prop_assert!(pair[0] < pair[1], "{:?}", c.frequencies);
        }
    }

    /// Gains never push the normalised sum over unity.
    #[test]
    fn gain_budget(mix in 0.0f32..=1.0) {
        let total = 6.0 * side_gain(mix) + center_gain(mix);
        prop_assert!(total > 0.0);
        prop_assert!(total / NORMALIZATION < 1.0);
    }

    /// Out-of-range controls behave exactly like their clamped values.
    #[test]
    fn setter_clamp_equivalence(
        below in -100.0f32..0.0,
        above in 1.0f32..100.0,
        seed in any::<u64>(),
    ) {
        let mut a = Hypersaw::with_seed(48000.0, seed);
        let mut b = Hypersaw::with_seed(48000.0, seed);
        a.set_detune(below);
        a.set_mix(above);
        b.set_detune(0.0);
        b.set_mix(1.0);
        prop_assert_eq!(a.coefficients(), b.coefficients());
    }

    /// Output stays finite and bounded for any audible pitch and voicing.
    #[test]
    fn voice_output_bounded(
        freq in 20.0f32..12000.0,
        detune in 0.0f32..=1.0,
        mix in 0.0f32..=1.0,
        config in config_strategy(),
        seed in any::<u64>(),
    ) {
        let mut voice = Hypersaw::with_config(48000.0, config, SmallRng::seed_from_u64(seed));
        voice.set_freq(freq);
        voice.set_detune(detune);
        voice.set_mix(mix);
        let mut block = [0.0f32; 512];
        voice.process_block(&mut block);
        for &s in &block {
            prop_assert!(s.is_finite() && s.abs() < 20.0, "sample {}", s);
        }
    }

    /// Equal seeds render identical audio.
    #[test]
    fn seeded_determinism(seed in any::<u64>(), freq in 40.0f32..2000.0) {
        let mut a = Hypersaw::with_seed(48000.0, seed);
        let mut b = Hypersaw::with_seed(48000.0, seed);
        a.set_freq(freq);
        b.set_freq(freq);
        for _ in 0..256 {
            prop_assert_eq!(a.process(), b.process());
        }
    }

    /// Trigger keeps every phase in [0, 1).
    #[test]
    fn trigger_phases_in_range(seed in any::<u64>()) {
        let mut voice = Hypersaw::with_seed(48000.0, seed);
        voice.trigger();
        for i in 0..NUM_OSCILLATORS {
            let p = voice.phase(i).unwrap_or(-1.0);
            prop_assert!((0.0..1.0).contains(&p));
        }
    }
}
