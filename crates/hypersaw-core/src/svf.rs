//! State Variable Filter implementation.
//!
//! A filter that produces lowpass, highpass, bandpass, and notch responses
//! from one shared state. The hypersaw voice uses its highpass output with the
//! cutoff slaved to the fundamental, which thins the low end the way the
//! JP-8000's pitch-tracked HPF does.
//!
//! # Topology
//!
//! Implements the Topology-Preserving Transform (TPT) SVF after Zavalishin,
//! "The Art of VA Filter Design" (2012). The trapezoidal integrators keep the
//! analog prototype's response and stay stable when the cutoff is swept every
//! sample, which the pitch-tracked stage relies on.
//!
//! # Nonlinear Drive
//!
//! Optional soft saturation of the bandpass integrator state via
//! [`fast_tanh`]. Drive is applied to the state update only, so the
//! small-signal response is unchanged while hot signals pick up harmonics.
//!
//! # Resonance scales
//!
//! [`set_resonance`](StateVariableFilter::set_resonance) takes a Q factor.
//! [`set_resonance_unit`](StateVariableFilter::set_resonance_unit) takes a
//! 0–1 control and maps it to damping `k = 2·(1 − res^¼)`, the curve used by
//! common hardware-style SVF modules, so 0.0 is fully damped (Q = 0.5) and
//! 1.0 is the resonance ceiling.
//!
//! # Reference
//!
//! Zavalishin, "The Art of VA Filter Design", rev. 2.1.2 (2018), Chapter 3.

use core::f32::consts::PI;
use libm::{powf, tanf};

use crate::Effect;
use crate::math::{fast_tan, fast_tanh, flush_denormal, unit_clamp};

/// Lowest Q the filter accepts.
const MIN_Q: f32 = 0.5;
/// Highest Q the filter accepts.
const MAX_Q: f32 = 20.0;

/// Lowest cutoff in Hz.
const MIN_CUTOFF: f32 = 20.0;

/// State Variable Filter output type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SvfOutput {
    /// Low-pass filter output — passes frequencies below the cutoff.
    #[default]
    Lowpass,
    /// High-pass filter output — passes frequencies above the cutoff.
    Highpass,
    /// Band-pass filter output — passes frequencies near the cutoff.
    Bandpass,
    /// Notch (band-reject) filter output — rejects frequencies near the cutoff.
    Notch,
}

/// State Variable Filter (2-pole, 12 dB/oct).
///
/// ## Parameters
///
/// - `cutoff`: Filter cutoff frequency in Hz (20.0 to sr×0.49, default 1000.0)
/// - `resonance`: Q factor (0.5 to 20.0, default 0.707)
/// - `drive`: Nonlinear saturation amount (0.0 to 1.0, default 0.0)
/// - `output_type`: Which filter output to use (default `Lowpass`)
///
/// # Example
///
/// ```rust
/// use hypersaw_core::{StateVariableFilter, SvfOutput, Effect};
///
/// let mut svf = StateVariableFilter::new(48000.0);
/// svf.set_cutoff(110.0);
/// svf.set_resonance_unit(0.1);
/// svf.set_output_type(SvfOutput::Highpass);
///
/// let output = svf.process(0.5);
/// ```
#[derive(Debug, Clone)]
pub struct StateVariableFilter {
    // Filter state
    ic1eq: f32,
    ic2eq: f32,

    // Coefficients
    g: f32,
    k: f32,

    // Parameters
    sample_rate: f32,
    cutoff: f32,
    resonance: f32,
    output_type: SvfOutput,
    drive: f32,
}

impl Default for StateVariableFilter {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl StateVariableFilter {
    /// Create a new SVF with the given sample rate.
    ///
    /// Initialises with cutoff = 1000 Hz, Q = 0.707 (Butterworth), drive = 0,
    /// lowpass output.
    pub fn new(sample_rate: f32) -> Self {
        let mut svf = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            g: 0.0,
            k: 0.0,
            sample_rate,
            cutoff: 1000.0,
            resonance: 0.707,
            output_type: SvfOutput::Lowpass,
            drive: 0.0,
        };
        svf.update_coefficients();
        svf
    }

    /// Set cutoff frequency in Hz.
    ///
    /// Range: 20.0 to `sample_rate × 0.49`. Values are clamped, so a tracked
    /// fundamental outside the audible band cannot destabilise the filter.
    /// Below about 41 Hz sample rate the upper bound wins; a non-finite or
    /// non-positive sample rate pins the cutoff at 20 Hz.
    pub fn set_cutoff(&mut self, freq: f32) {
        let freq = if freq.is_nan() { MIN_CUTOFF } else { freq };
        let max_cutoff = self.sample_rate * 0.49;
        self.cutoff = if max_cutoff.is_finite() && max_cutoff > 0.0 {
            freq.clamp(MIN_CUTOFF.min(max_cutoff), max_cutoff)
        } else {
            MIN_CUTOFF
        };
        self.update_coefficients();
    }

    /// Get current cutoff frequency in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Set resonance (Q factor).
    ///
    /// Range: 0.5 to 20.0. Values are clamped. Q = 0.707 gives a Butterworth
    /// (maximally flat) response.
    pub fn set_resonance(&mut self, q: f32) {
        self.resonance = q.clamp(MIN_Q, MAX_Q);
        self.update_coefficients();
    }

    /// Set resonance from a 0–1 control.
    ///
    /// Maps `res` to damping `k = 2·(1 − res^¼)` and then to `Q = 1/k`,
    /// clamped to the filter's Q range. Low values (≈0.1) give the gentle
    /// shaping used for spectral tilt rather than an audible peak.
    pub fn set_resonance_unit(&mut self, res: f32) {
        let damping = 2.0 * (1.0 - powf(unit_clamp(res), 0.25));
        let q = if damping > 1.0 / MAX_Q {
            1.0 / damping
        } else {
            MAX_Q
        };
        self.set_resonance(q);
    }

    /// Get current resonance (Q factor).
    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Set the output type (lowpass, highpass, bandpass, or notch).
    pub fn set_output_type(&mut self, output_type: SvfOutput) {
        self.output_type = output_type;
    }

    /// Get current output type.
    pub fn output_type(&self) -> SvfOutput {
        self.output_type
    }

    /// Set nonlinear drive amount.
    ///
    /// Range: 0.0 (linear, no saturation) to 1.0 (maximum saturation).
    /// The drive gain factor is `1 + drive × 3`, normalised after the tanh so
    /// the small-signal gain is preserved.
    pub fn set_drive(&mut self, drive: f32) {
        self.drive = unit_clamp(drive);
    }

    /// Get current drive amount (0.0–1.0).
    pub fn drive(&self) -> f32 {
        self.drive
    }

    /// Get the sample rate the coefficients were computed for.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Recompute filter coefficients from cutoff and resonance.
    ///
    /// Uses `fast_tan` below 10 kHz and `libm::tanf` above, where the Padé
    /// approximation approaches its accuracy limit.
    fn update_coefficients(&mut self) {
        let arg = PI * self.cutoff / self.sample_rate;
        self.g = if self.cutoff < 10_000.0 {
            fast_tan(arg)
        } else {
            tanf(arg)
        };
        self.k = 1.0 / self.resonance;
    }

    /// Process one sample and return all outputs `(lowpass, highpass, bandpass, notch)`.
    pub fn process_all(&mut self, input: f32) -> (f32, f32, f32, f32) {
        let v3 = input - self.ic2eq;
        let v1 = (self.g * v3 + self.ic1eq) / (1.0 + self.g * (self.g + self.k));
        let v2 = self.ic2eq + self.g * v1;

        let v1_sat = if self.drive > 0.0 {
            let d = 1.0 + self.drive * 3.0;
            fast_tanh(v1 * d) / d
        } else {
            v1
        };

        self.ic1eq = flush_denormal(2.0 * v1_sat - self.ic1eq);
        self.ic2eq = flush_denormal(2.0 * v2 - self.ic2eq);

        let lp = v2;
        let bp = v1;
        let hp = input - self.k * v1 - v2;
        let notch = lp + hp;

        (lp, hp, bp, notch)
    }
}

impl Effect for StateVariableFilter {
    fn process(&mut self, input: f32) -> f32 {
        let (lp, hp, bp, notch) = self.process_all(input);

        match self.output_type {
            SvfOutput::Lowpass => lp,
            SvfOutput::Highpass => hp,
            SvfOutput::Bandpass => bp,
            SvfOutput::Notch => notch,
        }
    }

    fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        // Re-clamp against the new Nyquist limit.
        self.set_cutoff(self.cutoff);
        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, cutoff = self.cutoff, "svf: sample rate changed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rms(signal: &[f32]) -> f32 {
        let sum: f32 = signal.iter().map(|x| x * x).sum();
        libm::sqrtf(sum / signal.len() as f32)
    }

    fn sine_through(svf: &mut StateVariableFilter, freq: f32, sr: f32) -> f32 {
        let omega = core::f32::consts::TAU * freq / sr;
        let mut out = [0.0f32; 4000];
        for (i, o) in out.iter_mut().enumerate() {
            *o = svf.process(libm::sinf(i as f32 * omega));
        }
        rms(&out[2000..])
    }

    #[test]
    fn test_svf_lowpass_dc() {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_cutoff(1000.0);

        let mut output = 0.0;
        for _ in 0..1000 {
            output = svf.process(1.0);
        }
        assert!(
            (output - 1.0).abs() < 0.05,
            "DC should pass, got {}",
            output
        );
    }

    #[test]
    fn test_svf_highpass_blocks_dc() {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_cutoff(1000.0);
        svf.set_output_type(SvfOutput::Highpass);

        let mut output = 0.0;
        for _ in 0..1000 {
            output = svf.process(1.0);
        }
        assert!(output.abs() < 0.1, "DC should be blocked, got {}", output);
    }

    #[test]
    fn test_highpass_passes_harmonics_above_cutoff() {
        let sr = 48000.0;
        let mut svf = StateVariableFilter::new(sr);
        svf.set_cutoff(220.0);
        svf.set_resonance_unit(0.1);
        svf.set_output_type(SvfOutput::Highpass);

        let below = sine_through(&mut svf, 55.0, sr);
        svf.reset();
        let above = sine_through(&mut svf, 1760.0, sr);

        // A unit sine has RMS ≈ 0.707; three octaves above cutoff passes almost untouched.
        assert!(above > 0.6, "harmonic above cutoff attenuated: {above}");
        assert!(
            below < above * 0.2,
            "two octaves below cutoff should be strongly attenuated: below={below}, above={above}"
        );
    }

    #[test]
    fn test_svf_process_all_finite() {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_cutoff(1000.0);

        let (lp, hp, bp, notch) = svf.process_all(1.0);
        assert!(lp.is_finite());
        assert!(hp.is_finite());
        assert!(bp.is_finite());
        assert!(notch.is_finite());
    }

    #[test]
    fn test_svf_reset() {
        let mut svf = StateVariableFilter::new(48000.0);
        for _ in 0..100 {
            svf.process(1.0);
        }

        svf.reset();

        assert_eq!(svf.ic1eq, 0.0);
        assert_eq!(svf.ic2eq, 0.0);
    }

    #[test]
    fn test_cutoff_clamped_to_valid_range() {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_cutoff(-50.0);
        assert_eq!(svf.cutoff(), 20.0);
        svf.set_cutoff(40_000.0);
        assert!((svf.cutoff() - 48000.0 * 0.49).abs() < 1e-3);
        svf.set_cutoff(f32::NAN);
        assert_eq!(svf.cutoff(), 20.0);
    }

    #[test]
    fn test_sample_rate_change_reclamps_cutoff() {
        let mut svf = StateVariableFilter::new(96000.0);
        svf.set_cutoff(30_000.0);
        svf.set_sample_rate(48000.0);
        assert!(svf.cutoff() <= 48000.0 * 0.49);
    }

    // ---- Resonance ----

    #[test]
    fn test_resonance_unit_zero_is_fully_damped() {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_resonance_unit(0.0);
        assert!((svf.resonance() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_resonance_unit_low_setting() {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_resonance_unit(0.1);
        // k = 2(1 - 0.1^0.25) ≈ 0.8754 → Q ≈ 1.142
        assert!(
            (svf.resonance() - 1.142).abs() < 0.01,
            "got Q={}",
            svf.resonance()
        );
    }

    #[test]
    fn test_resonance_unit_full_hits_ceiling() {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_resonance_unit(1.0);
        assert_eq!(svf.resonance(), MAX_Q);
        svf.set_resonance_unit(5.0);
        assert_eq!(svf.resonance(), MAX_Q);
    }

    #[test]
    fn test_resonance_unit_monotonic() {
        let mut svf = StateVariableFilter::new(48000.0);
        let mut prev = 0.0;
        for i in 0..=20 {
            svf.set_resonance_unit(i as f32 / 20.0);
            assert!(svf.resonance() >= prev);
            prev = svf.resonance();
        }
    }

    // ---- Drive ----

    #[test]
    fn test_drive_default_zero() {
        let svf = StateVariableFilter::new(48000.0);
        assert_eq!(svf.drive(), 0.0);
    }

    #[test]
    fn test_drive_clamp() {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_drive(-0.5);
        assert_eq!(svf.drive(), 0.0);
        svf.set_drive(2.0);
        assert_eq!(svf.drive(), 1.0);
    }

    #[test]
    fn test_drive_adds_saturation() {
        let mut svf_clean = StateVariableFilter::new(48000.0);
        svf_clean.set_cutoff(2000.0);
        svf_clean.set_resonance(4.0);

        let mut svf_driven = StateVariableFilter::new(48000.0);
        svf_driven.set_cutoff(2000.0);
        svf_driven.set_resonance(4.0);
        svf_driven.set_drive(0.8);

        let mut max_diff: f32 = 0.0;
        for i in 0..500 {
            let input = libm::sinf(i as f32 * 0.25) * 2.0;
            let diff = (svf_clean.process(input) - svf_driven.process(input)).abs();
            max_diff = max_diff.max(diff);
        }
        assert!(
            max_diff > 0.01,
            "drive should produce measurably different output, max_diff={max_diff}"
        );
    }

    #[test]
    fn test_drive_output_bounded() {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_cutoff(500.0);
        svf.set_resonance(10.0);
        svf.set_drive(1.0);
        svf.set_output_type(SvfOutput::Highpass);

        for i in 0..2000 {
            let input = libm::sinf(i as f32 * 0.3) * 5.0;
            let output = svf.process(input);
            assert!(
                output.is_finite() && output.abs() < 100.0,
                "output unbounded at sample {i}: {output}"
            );
        }
    }

    #[test]
    fn test_fast_tan_above_10k_fallback() {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_cutoff(15000.0);
        let g_expected = tanf(PI * 15000.0 / 48000.0);
        assert!(
            (svf.g - g_expected).abs() < 1e-6,
            "above 10 kHz should use tanf: {} vs {g_expected}",
            svf.g
        );
    }

    #[test]
    fn test_cutoff_at_very_low_sample_rate() {
        let mut svf = StateVariableFilter::new(32.0);
        svf.set_cutoff(220.0);
        assert!((svf.cutoff() - 32.0 * 0.49).abs() < 1e-6);
        svf.set_cutoff(1.0);
        assert!((svf.cutoff() - 32.0 * 0.49).abs() < 1e-6);
        for i in 0..256 {
            assert!(svf.process(libm::sinf(i as f32)).is_finite());
        }
    }

    #[test]
    fn test_cutoff_with_degenerate_sample_rate() {
        for sr in [f32::NAN, f32::INFINITY, 0.0, -48000.0] {
            let mut svf = StateVariableFilter::new(48000.0);
            svf.set_sample_rate(sr);
            assert_eq!(svf.cutoff(), 20.0, "sample rate {sr}");
        }
    }
}
