//! Low Frequency Oscillator for parameter modulation.
//!
//! Slow periodic control signals, e.g. sweeping a voice's detune and mix
//! over several seconds. Evaluated once per sample on the host side; the
//! voice itself never owns an LFO.

use core::f32::consts::TAU;
use libm::sinf;

/// LFO waveform type
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LfoWaveform {
    /// Sinusoid.
    #[default]
    Sine,
    /// Linear up/down ramp.
    Triangle,
    /// Rising ramp with an abrupt reset.
    Saw,
    /// Two-level on/off.
    Square,
}

/// Low Frequency Oscillator for generating modulation signals.
///
/// Phase-accumulating, naive (not band-limited) waveforms: at sub-audio
/// rates aliasing is irrelevant.
///
/// # Example
///
/// ```rust
/// use hypersaw_core::{Lfo, LfoWaveform};
///
/// let mut lfo = Lfo::new(48000.0, 0.1);
/// lfo.set_waveform(LfoWaveform::Sine);
///
/// // Unit-range value suitable for a 0–1 control
/// let detune = lfo.next_unipolar();
/// assert!((0.0..=1.0).contains(&detune));
/// ```
#[derive(Debug, Clone)]
pub struct Lfo {
    /// Current phase position [0.0, 1.0)
    phase: f32,
    phase_inc: f32,
    sample_rate: f32,
    waveform: LfoWaveform,
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new(48000.0, 1.0)
    }
}

impl Lfo {
    /// Create new LFO with given sample rate and frequency
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        Self {
            phase: 0.0,
            phase_inc: freq_hz / sample_rate,
            sample_rate,
            waveform: LfoWaveform::Sine,
        }
    }

    /// Set frequency in Hz
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.phase_inc = freq_hz / self.sample_rate;
    }

    /// Get current frequency in Hz
    pub fn frequency(&self) -> f32 {
        self.phase_inc * self.sample_rate
    }

    /// Set waveform
    pub fn set_waveform(&mut self, waveform: LfoWaveform) {
        self.waveform = waveform;
    }

    /// Get current waveform
    pub fn waveform(&self) -> LfoWaveform {
        self.waveform
    }

    /// Reset phase to 0
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Set the phase (0.0 - 1.0). 0.25 = 90°, 0.5 = 180°.
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = crate::unit_clamp(phase);
        if self.phase >= 1.0 {
            self.phase = 0.0;
        }
    }

    /// Get current phase (0.0 - 1.0)
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Get next LFO value (-1.0 to 1.0)
    #[inline]
    pub fn next(&mut self) -> f32 {
        let p = self.phase;
        let output = match self.waveform {
            LfoWaveform::Sine => sinf(p * TAU),
            LfoWaveform::Triangle => {
                if p < 0.5 {
                    4.0 * p - 1.0
                } else {
                    3.0 - 4.0 * p
                }
            }
            LfoWaveform::Saw => 2.0 * p - 1.0,
            LfoWaveform::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        };

        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        output
    }

    /// Get next value remapped to 0.0–1.0
    #[inline]
    pub fn next_unipolar(&mut self) -> f32 {
        (self.next() + 1.0) * 0.5
    }

    /// Set sample rate, keeping the frequency in Hz.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        let freq = self.frequency();
        self.sample_rate = sample_rate;
        self.set_frequency(freq);
    }
}
