//! Hypersaw Synth - JP-8000 style Super Saw voice
//!
//! Seven band-limited sawtooth oscillators, a coefficient engine mapping the
//! detune and mix controls onto per-oscillator frequencies and gains, a
//! pitch-tracked high-pass filter, and trigger-time phase randomisation.
//!
//! # Core Components
//!
//! ## Voice
//!
//! - [`Hypersaw`] - The seven-oscillator voice
//! - [`HypersawConfig`] - Detune curve, summing and filter voicing
//!
//! ```rust
//! use hypersaw_synth::Hypersaw;
//!
//! let mut voice = Hypersaw::with_seed(48000.0, 42);
//! voice.set_freq(220.0);
//! voice.set_detune(0.5);
//! voice.set_mix(0.5);
//!
//! let sample = voice.process();
//! ```
//!
//! ## Coefficient engine
//!
//! Pure functions, usable without a voice: [`center_gain`], [`side_gain`],
//! [`side_ratio`], [`DetuneCurve::apply`], [`Coefficients::compute`].
//!
//! ## Oscillators
//!
//! - [`Oscillator`] - PolyBLEP oscillator with settable phase and amplitude
//! - [`OscillatorWaveform`] - Sine, Triangle, Saw (falling), Ramp (rising), Square
//!
//! ## Cross-thread control
//!
//! - [`SharedParams`] - Atomic parameter store applied once per audio buffer
//!
//! # Features
//!
//! - `std` (default): OS-entropy seeding via [`Hypersaw::from_entropy`]
//! - `serde`: `Serialize`/`Deserialize` for the configuration enums
//! - `tracing`: debug events on initialisation and configuration changes
//!
//! # no_std Support
//!
//! ```toml
//! [dependencies]
//! hypersaw-synth = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod coefficients;
pub mod hypersaw;
pub mod oscillator;
pub mod params;
pub mod pitch;

// Re-export main types at crate root
pub use coefficients::{
    CENTER_SLOT, Coefficients, DETUNE_RATIOS, DetuneCurve, NORMALIZATION, NUM_OSCILLATORS,
    SIDE_SLOTS, SummingMode, center_gain, side_gain, side_ratio,
};
pub use hypersaw::{DEFAULT_DETUNE, DEFAULT_FREQ, DEFAULT_MIX, Hypersaw, HypersawConfig};
pub use oscillator::{Oscillator, OscillatorWaveform};
pub use params::SharedParams;
pub use pitch::{freq_to_midi, midi_to_freq, scale_step_freq};

pub use rand::rngs::SmallRng;

// Re-export commonly used types from hypersaw-core
pub use hypersaw_core::{Effect, Lfo, LfoWaveform, StateVariableFilter, SvfOutput};
