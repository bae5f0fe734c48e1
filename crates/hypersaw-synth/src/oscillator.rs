//! Audio-rate oscillator with PolyBLEP anti-aliasing.
//!
//! The primitive the hypersaw voice is built from: a phase accumulator with a
//! selectable waveform, settable phase (for trigger randomisation) and output
//! amplitude.
//!
//! # Saw orientation
//!
//! [`OscillatorWaveform::Saw`] falls from +1 to −1 over a cycle;
//! [`OscillatorWaveform::Ramp`] rises from −1 to +1. Both are band-limited
//! at the wrap discontinuity with the same 4th-order PolyBLEP residual.

use core::f32::consts::TAU;
use libm::{fabsf, floorf, sinf};

/// Oscillator waveform types
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OscillatorWaveform {
    /// Sine waveform — pure fundamental tone.
    Sine,
    /// Triangle waveform — odd harmonics, softer than saw.
    Triangle,
    /// Falling sawtooth, +1 → −1. The JP-8000 voice default.
    #[default]
    Saw,
    /// Rising sawtooth, −1 → +1.
    Ramp,
    /// Square waveform (50% duty cycle).
    Square,
}

/// Audio-rate oscillator.
///
/// # Example
///
/// ```rust
/// use hypersaw_synth::{Oscillator, OscillatorWaveform};
///
/// let mut osc = Oscillator::new(48000.0);
/// osc.set_frequency(220.0);
/// osc.set_waveform(OscillatorWaveform::Saw);
/// osc.set_phase(0.25);
///
/// let sample = osc.advance();
/// ```
#[derive(Debug, Clone)]
pub struct Oscillator {
    /// Current phase position [0.0, 1.0)
    phase: f32,
    phase_inc: f32,
    sample_rate: f32,
    /// Requested frequency in Hz, stored as given
    frequency: f32,
    amplitude: f32,
    waveform: OscillatorWaveform,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Oscillator {
    /// Create a new oscillator: 440 Hz, unit amplitude, phase 0, falling saw.
    pub fn new(sample_rate: f32) -> Self {
        let mut osc = Self {
            phase: 0.0,
            phase_inc: 0.0,
            sample_rate,
            frequency: 440.0,
            amplitude: 1.0,
            waveform: OscillatorWaveform::Saw,
        };
        osc.update_increment();
        osc
    }

    /// Set frequency in Hz.
    ///
    /// The value is stored unchanged and reported back by
    /// [`frequency`](Self::frequency). Negative or NaN frequencies stop the
    /// phase accumulator instead of running it backwards.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.frequency = freq_hz;
        self.update_increment();
    }

    /// Get the requested frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Set output amplitude (linear gain applied after waveform generation).
    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude;
    }

    /// Get output amplitude.
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Set waveform type.
    pub fn set_waveform(&mut self, waveform: OscillatorWaveform) {
        self.waveform = waveform;
    }

    /// Get current waveform.
    pub fn waveform(&self) -> OscillatorWaveform {
        self.waveform
    }

    /// Set sample rate and recalculate phase increment.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_increment();
    }

    /// Get current sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Reset phase to 0.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Set phase directly, as a fraction of a cycle.
    ///
    /// Values are clamped to \[0, 1\]; a phase of exactly 1.0 is the same
    /// point as 0.0 and is stored as 0.0.
    pub fn set_phase(&mut self, phase: f32) {
        let phase = hypersaw_core::unit_clamp(phase);
        self.phase = if phase >= 1.0 { 0.0 } else { phase };
    }

    /// Get current phase in [0.0, 1.0).
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Generate the next sample and advance the phase.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let output = self.generate_sample(self.phase, self.phase_inc);
        self.advance_phase();
        output * self.amplitude
    }

    fn update_increment(&mut self) {
        self.phase_inc = self.frequency.max(0.0) / self.sample_rate;
    }

    #[inline]
    fn advance_phase(&mut self) {
        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= floorf(self.phase);
        }
    }

    /// Naive waveform plus PolyBLEP correction at each discontinuity.
    ///
    /// - **Sine**: no correction needed.
    /// - **Saw / Ramp**: one jump at the phase wrap. The ramp drops by 2
    ///   there, so the residual is subtracted; the falling saw jumps up, so
    ///   it is added.
    /// - **Square**: jumps at phase 0 and 0.5.
    /// - **Triangle**: continuous, only the slope changes; generated naively.
    #[inline]
    fn generate_sample(&self, phase: f32, dt: f32) -> f32 {
        match self.waveform {
            OscillatorWaveform::Sine => sinf(phase * TAU),
            OscillatorWaveform::Saw => 1.0 - 2.0 * phase + poly_blep(phase, dt),
            OscillatorWaveform::Ramp => 2.0 * phase - 1.0 - poly_blep(phase, dt),
            OscillatorWaveform::Square => {
                let naive = if phase < 0.5 { 1.0 } else { -1.0 };
                let mut falling = phase + 0.5;
                if falling >= 1.0 {
                    falling -= 1.0;
                }
                naive + poly_blep(phase, dt) - poly_blep(falling, dt)
            }
            OscillatorWaveform::Triangle => 1.0 - 4.0 * fabsf(phase - 0.5),
        }
    }
}

/// 4th-order PolyBLEP residual.
///
/// A C²-continuous degree-4 piecewise polynomial fitted to the ideal
/// band-limited step residual, spanning two samples either side of the
/// discontinuity. Roughly 50 dB of alias suppression.
///
/// Reference: Välimäki et al., "Antialiasing Oscillators", IEEE Signal
/// Processing Magazine, 2010.
///
/// `t` is the phase in [0, 1), `dt` the phase increment per sample. Returns
/// 0.0 away from the discontinuity or when the oscillator is stopped.
#[inline]
fn poly_blep(t: f32, dt: f32) -> f32 {
    // p₁(n) = A₄n⁴ + A₃n³ + A₂n² + A₀ on [0,1), p₂(n) = C(2-n)⁴ on [1,2)
    const A4: f32 = -43.0 / 48.0;
    const A3: f32 = 7.0 / 6.0;
    const A2: f32 = 0.5;
    const A0: f32 = -1.0;
    const C: f32 = -11.0 / 48.0;

    #[inline]
    fn residual(n: f32) -> f32 {
        if n < 1.0 {
            let n2 = n * n;
            A4 * n2 * n2 + A3 * n2 * n + A2 * n2 + A0
        } else {
            let u = 2.0 - n;
            let u2 = u * u;
            C * u2 * u2
        }
    }

    if dt <= 0.0 {
        return 0.0;
    }
    let dt2 = 2.0 * dt;
    if t < dt2 {
        residual(t / dt)
    } else if t > 1.0 - dt2 {
        -residual((1.0 - t) / dt)
    } else {
        0.0
    }
}
