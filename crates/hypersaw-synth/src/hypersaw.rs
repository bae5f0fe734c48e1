//! The Super Saw voice.
//!
//! Seven free-running oscillators (one center, six detuned sides), summed
//! with mix-dependent gains, normalised, and passed through a high-pass
//! filter whose cutoff tracks the fundamental.
//!
//! ```text
//!  slot 0 ─┐
//!  slot 1 ─┤
//!  slot 2 ─┤ Σ × side_gain ──┐
//!  slot 4 ─┤                 │
//!  slot 5 ─┤                 ├─ ÷ 4.5 ── HPF (cutoff = freq) ── out
//!  slot 6 ─┘                 │
//!  slot 3 ─── × center_gain ─┘
//! ```
//!
//! All derived state (oscillator frequencies, gains, filter cutoff) is
//! recomputed eagerly by each setter; [`Hypersaw::process`] only sums and
//! filters.

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

use hypersaw_core::{Effect, StateVariableFilter, SvfOutput, unit_clamp};

use crate::coefficients::{
    CENTER_SLOT, Coefficients, DetuneCurve, NORMALIZATION, NUM_OSCILLATORS, SIDE_SLOTS,
    SummingMode,
};
use crate::oscillator::{Oscillator, OscillatorWaveform};

/// Default fundamental in Hz after construction or [`Hypersaw::init`].
pub const DEFAULT_FREQ: f32 = 100.0;
/// Default detune control.
pub const DEFAULT_DETUNE: f32 = 0.5;
/// Default mix control.
pub const DEFAULT_MIX: f32 = 0.5;

/// Voicing choices that differ between hardware emulations.
///
/// The default reproduces the measured JP-8000 behaviour: polynomial detune
/// curve, mix-weighted summing, a clean filter with low resonance.
/// [`HypersawConfig::reduced`] is the cheaper variant: quartic curve, flat
/// summing, driven filter.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HypersawConfig {
    /// Detune control → applied detune mapping.
    pub detune_curve: DetuneCurve,
    /// Oscillator bank summing.
    pub summing: SummingMode,
    /// High-pass filter saturation, 0–1.
    pub filter_drive: f32,
    /// High-pass filter resonance on the 0–1 control scale.
    pub filter_resonance: f32,
}

impl Default for HypersawConfig {
    fn default() -> Self {
        Self {
            detune_curve: DetuneCurve::Polynomial,
            summing: SummingMode::Weighted,
            filter_drive: 0.0,
            filter_resonance: 0.1,
        }
    }
}

impl HypersawConfig {
    /// Quartic detune curve, unweighted summing, filter drive 0.8.
    pub fn reduced() -> Self {
        Self {
            detune_curve: DetuneCurve::Quartic,
            summing: SummingMode::Unweighted,
            filter_drive: 0.8,
            filter_resonance: 0.1,
        }
    }
}

/// JP-8000 style Super Saw voice.
///
/// Generic over its random source so phase randomisation can be seeded for
/// reproducible output. Defaults to [`SmallRng`].
///
/// # Example
///
/// ```rust
/// use hypersaw_synth::Hypersaw;
///
/// let mut voice = Hypersaw::with_seed(48000.0, 7);
/// voice.set_freq(220.0);
/// voice.set_detune(0.6);
/// voice.set_mix(0.4);
/// voice.trigger();
///
/// let mut block = [0.0f32; 256];
/// voice.process_block(&mut block);
/// assert!(block.iter().all(|s| s.is_finite()));
/// ```
#[derive(Debug, Clone)]
pub struct Hypersaw<R: RngCore = SmallRng> {
    sample_rate: f32,
    freq: f32,
    detune: f32,
    mix: f32,
    config: HypersawConfig,
    coeffs: Coefficients,
    oscillators: [Oscillator; NUM_OSCILLATORS],
    filter: StateVariableFilter,
    rng: R,
}

impl Hypersaw<SmallRng> {
    /// Voice with a seeded [`SmallRng`]. Equal seeds give identical output.
    pub fn with_seed(sample_rate: f32, seed: u64) -> Self {
        Self::new(sample_rate, SmallRng::seed_from_u64(seed))
    }

    /// Voice seeded from operating-system entropy.
    #[cfg(feature = "std")]
    pub fn from_entropy(sample_rate: f32) -> Self {
        Self::new(sample_rate, SmallRng::from_entropy())
    }
}

impl<R: RngCore> Hypersaw<R> {
    /// Create a voice with the default configuration.
    ///
    /// The voice is fully initialised: defaults applied, phases randomised
    /// from `rng`, coefficients computed.
    pub fn new(sample_rate: f32, rng: R) -> Self {
        Self::with_config(sample_rate, HypersawConfig::default(), rng)
    }

    /// Create a voice with an explicit configuration.
    pub fn with_config(sample_rate: f32, config: HypersawConfig, rng: R) -> Self {
        let mut voice = Self {
            sample_rate,
            freq: DEFAULT_FREQ,
            detune: DEFAULT_DETUNE,
            mix: DEFAULT_MIX,
            config,
            coeffs: Coefficients::compute(
                DEFAULT_FREQ,
                DEFAULT_DETUNE,
                DEFAULT_MIX,
                config.detune_curve,
            ),
            oscillators: core::array::from_fn(|_| Oscillator::new(sample_rate)),
            filter: StateVariableFilter::new(sample_rate),
            rng,
        };
        voice.init(sample_rate);
        voice
    }

    /// (Re)initialise at `sample_rate`.
    ///
    /// Restores the default frequency, detune and mix, rebuilds the
    /// oscillators as falling saws, clears the filter, re-randomises phases
    /// and recomputes coefficients. The configuration and random source are
    /// kept.
    pub fn init(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.freq = DEFAULT_FREQ;
        self.detune = DEFAULT_DETUNE;
        self.mix = DEFAULT_MIX;

        for osc in &mut self.oscillators {
            *osc = Oscillator::new(sample_rate);
            osc.set_waveform(OscillatorWaveform::Saw);
        }

        self.filter = StateVariableFilter::new(sample_rate);
        self.apply_filter_voicing();

        self.trigger();
        self.update_coefficients();

        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, config = ?self.config, "hypersaw: initialised");
    }

    /// Set the fundamental in Hz. Stored unchanged.
    pub fn set_freq(&mut self, freq: f32) {
        self.freq = freq;
        self.update_coefficients();
    }

    /// Set the detune control, clamped to \[0, 1\] (NaN → 0).
    pub fn set_detune(&mut self, detune: f32) {
        self.detune = unit_clamp(detune);
        self.update_coefficients();
    }

    /// Set the center/side balance, clamped to \[0, 1\] (NaN → 0).
    pub fn set_mix(&mut self, mix: f32) {
        self.mix = unit_clamp(mix);
        self.update_coefficients();
    }

    /// Set the waveform of slot `index` (0–6). Out-of-range indices are ignored.
    pub fn set_waveform(&mut self, index: usize, waveform: OscillatorWaveform) {
        if let Some(osc) = self.oscillators.get_mut(index) {
            osc.set_waveform(waveform);
        }
    }

    /// Set the waveform of all seven slots.
    pub fn set_all_waveforms(&mut self, waveform: OscillatorWaveform) {
        for osc in &mut self.oscillators {
            osc.set_waveform(waveform);
        }
    }

    /// Replace the voicing configuration and re-derive dependent state.
    ///
    /// Filter state is kept, so switching mid-note does not click.
    pub fn set_config(&mut self, config: HypersawConfig) {
        self.config = config;
        self.apply_filter_voicing();
        self.update_coefficients();

        #[cfg(feature = "tracing")]
        tracing::debug!(config = ?self.config, "hypersaw: config changed");
    }

    /// Randomise every oscillator phase from the voice's own random source.
    pub fn trigger(&mut self) {
        let Self {
            oscillators, rng, ..
        } = self;
        randomize_phases(oscillators, rng);
    }

    /// Randomise every oscillator phase from a caller-supplied source.
    pub fn trigger_with<G: RngCore + ?Sized>(&mut self, rng: &mut G) {
        randomize_phases(&mut self.oscillators, rng);
    }

    /// Produce the next output sample.
    #[inline]
    pub fn process(&mut self) -> f32 {
        let mut side_sum = 0.0;
        for &slot in &SIDE_SLOTS {
            side_sum += self.oscillators[slot].advance();
        }
        let center = self.oscillators[CENTER_SLOT].advance();

        let sum = match self.config.summing {
            SummingMode::Weighted => {
                side_sum * self.coeffs.side_gain + center * self.coeffs.center_gain
            }
            SummingMode::Unweighted => side_sum + center,
        };

        self.filter.process(sum / NORMALIZATION)
    }

    /// Fill `buffer` with consecutive output samples.
    pub fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process();
        }
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Fundamental in Hz, as last set.
    pub fn freq(&self) -> f32 {
        self.freq
    }

    /// Detune control in \[0, 1\].
    pub fn detune(&self) -> f32 {
        self.detune
    }

    /// Mix control in \[0, 1\].
    pub fn mix(&self) -> f32 {
        self.mix
    }

    /// Active configuration.
    pub fn config(&self) -> HypersawConfig {
        self.config
    }

    /// Current derived state.
    pub fn coefficients(&self) -> &Coefficients {
        &self.coeffs
    }

    /// Center oscillator gain.
    pub fn center_gain(&self) -> f32 {
        self.coeffs.center_gain
    }

    /// Side oscillator gain.
    pub fn side_gain(&self) -> f32 {
        self.coeffs.side_gain
    }

    /// Detune after the curve.
    pub fn scaled_detune(&self) -> f32 {
        self.coeffs.scaled_detune
    }

    /// Frequency of slot `index`, or `None` if out of range.
    pub fn oscillator_frequency(&self, index: usize) -> Option<f32> {
        self.oscillators.get(index).map(Oscillator::frequency)
    }

    /// Waveform of slot `index`, or `None` if out of range.
    pub fn waveform(&self, index: usize) -> Option<OscillatorWaveform> {
        self.oscillators.get(index).map(Oscillator::waveform)
    }

    /// Phase of slot `index`, or `None` if out of range.
    pub fn phase(&self, index: usize) -> Option<f32> {
        self.oscillators.get(index).map(Oscillator::phase)
    }

    /// Cutoff the filter is asked to track (the fundamental). The filter
    /// itself clamps this to its valid range.
    pub fn filter_cutoff(&self) -> f32 {
        self.coeffs.filter_cutoff
    }

    /// The pitch-tracked high-pass filter.
    pub fn filter(&self) -> &StateVariableFilter {
        &self.filter
    }

    fn apply_filter_voicing(&mut self) {
        self.filter.set_output_type(SvfOutput::Highpass);
        self.filter.set_resonance_unit(self.config.filter_resonance);
        self.filter.set_drive(self.config.filter_drive);
    }

    fn update_coefficients(&mut self) {
        self.coeffs = Coefficients::compute(
            self.freq,
            self.detune,
            self.mix,
            self.config.detune_curve,
        );
        for (osc, &freq) in self.oscillators.iter_mut().zip(&self.coeffs.frequencies) {
            osc.set_frequency(freq);
        }
        self.filter.set_cutoff(self.coeffs.filter_cutoff);
    }
}

fn randomize_phases<G: RngCore + ?Sized>(oscillators: &mut [Oscillator], rng: &mut G) {
    for osc in oscillators {
        osc.set_phase(rng.gen_range(0.0f32..1.0));
    }
}
