//! Property-based tests for hypersaw-core DSP primitives.
//!
//! Filter stability across the parameter space the voice can reach, including
//! a cutoff swept every sample as the tracked fundamental changes.

use proptest::prelude::*;
use hypersaw_core::{Effect, Lfo, LfoWaveform, StateVariableFilter, SvfOutput, unit_clamp};

fn output_mode(index: usize) -> SvfOutput {
    match index % 4 {
        0 => SvfOutput::Lowpass,
        1 => SvfOutput::Highpass,
        2 => SvfOutput::Bandpass,
        _ => SvfOutput::Notch,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// For any cutoff and Q, every SVF output mode stays finite on bounded input.
    #[test]
    fn svf_stability(
        freq in 20.0f32..20000.0f32,
        q in 0.5f32..20.0f32,
        mode in 0usize..4,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_cutoff(freq);
        svf.set_resonance(q);
        svf.set_output_type(output_mode(mode));

        for &sample in &input {
            let out = svf.process(sample);
            prop_assert!(
                out.is_finite(),
                "SVF {:?} (freq={}, q={}) produced {} for input {}",
                output_mode(mode), freq, q, out, sample
            );
        }
    }

    /// Highpass with drive, fed a hot signal, never blows up.
    #[test]
    fn driven_highpass_bounded(
        freq in 20.0f32..5000.0f32,
        res in 0.0f32..=1.0f32,
        drive in 0.0f32..=1.0f32,
        input in prop::collection::vec(-4.5f32..=4.5f32, 256),
    ) {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_cutoff(freq);
        svf.set_resonance_unit(res);
        svf.set_drive(drive);
        svf.set_output_type(SvfOutput::Highpass);

        for &sample in &input {
            let out = svf.process(sample);
            prop_assert!(out.is_finite() && out.abs() < 1000.0, "out={}", out);
        }
    }

    /// Re-tuning the cutoff every sample (pitch tracking) stays stable.
    #[test]
    fn svf_cutoff_sweep_stable(
        cutoffs in prop::collection::vec(20.0f32..20000.0f32, 128),
    ) {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_output_type(SvfOutput::Highpass);
        svf.set_resonance_unit(0.1);

        for (i, &fc) in cutoffs.iter().enumerate() {
            svf.set_cutoff(fc);
            let input = if i % 2 == 0 { 1.0 } else { -1.0 };
            prop_assert!(svf.process(input).is_finite());
        }
    }

    /// The unit resonance control always lands inside the Q range.
    #[test]
    fn resonance_unit_in_range(res in -10.0f32..10.0f32) {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_resonance_unit(res);
        let q = svf.resonance();
        prop_assert!((0.5..=20.0).contains(&q), "q={}", q);
    }

    /// `unit_clamp` is idempotent and lands in [0, 1].
    #[test]
    fn unit_clamp_in_range(x in prop::num::f32::ANY) {
        let y = unit_clamp(x);
        prop_assert!((0.0..=1.0).contains(&y));
        prop_assert_eq!(unit_clamp(y), y);
    }

    /// LFO output stays bipolar-bounded for any rate and starting phase.
    #[test]
    fn lfo_bounded(freq in 0.001f32..50.0f32, phase in 0.0f32..1.0f32, wave in 0usize..4) {
        let mut lfo = Lfo::new(48000.0, freq);
        lfo.set_phase(phase);
        lfo.set_waveform(match wave {
            0 => LfoWaveform::Sine,
            1 => LfoWaveform::Triangle,
            2 => LfoWaveform::Saw,
            _ => LfoWaveform::Square,
        });
        for _ in 0..512 {
            let v = lfo.next();
            prop_assert!((-1.0..=1.0).contains(&v), "v={}", v);
            prop_assert!((0.0..1.0).contains(&lfo.phase()));
        }
    }
}
