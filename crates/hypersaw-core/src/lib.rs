//! Hypersaw Core - DSP primitives for the hypersaw synthesis engine
//!
//! This crate provides the signal-processing building blocks the hypersaw
//! voice is assembled from, designed for real-time audio with zero
//! allocation in the audio path.
//!
//! # Core Abstractions
//!
//! - [`Effect`] - Object-safe trait for sample-by-sample processors
//! - [`StateVariableFilter`] - Multi-output TPT SVF with nonlinear drive
//! - [`Lfo`] - Low-frequency oscillator for control-rate modulation
//!
//! ## Utilities
//!
//! - Math functions: [`fast_tan`], [`fast_tanh`], [`flush_denormal`], [`unit_clamp`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded audio applications.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! hypersaw-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use hypersaw_core::{Effect, StateVariableFilter, SvfOutput};
//!
//! let mut hpf = StateVariableFilter::new(48000.0);
//! hpf.set_output_type(SvfOutput::Highpass);
//! hpf.set_cutoff(220.0);
//!
//! let mut buffer = [0.25f32; 64];
//! hpf.process_block_inplace(&mut buffer);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod effect;
pub mod lfo;
pub mod math;
pub mod svf;

// Re-export main types at crate root
pub use effect::Effect;
pub use lfo::{Lfo, LfoWaveform};
pub use math::{fast_tan, fast_tanh, flush_denormal, unit_clamp};
pub use svf::{StateVariableFilter, SvfOutput};
