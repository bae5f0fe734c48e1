//! Lock-free parameter handoff between a control context and the audio callback.
//!
//! [`SharedParams`] stores the voice's three continuous controls as `f32`
//! bits in atomics. Any thread may write through `&self`; the audio callback
//! calls [`SharedParams::apply_to`] once per buffer, which pushes changed
//! values through the voice's own setters. Updates therefore land with at
//! most one buffer of latency and the oscillator bank is only ever touched
//! from the audio side.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use rand::RngCore;

use crate::Hypersaw;
use crate::hypersaw::{DEFAULT_DETUNE, DEFAULT_FREQ, DEFAULT_MIX};

/// Atomic freq / detune / mix store with a change counter.
///
/// # Example
///
/// ```rust
/// use hypersaw_synth::{Hypersaw, SharedParams};
///
/// let params = SharedParams::default();
/// let mut voice = Hypersaw::with_seed(48000.0, 1);
///
/// // control thread
/// params.set_freq(330.0);
/// params.request_trigger();
///
/// // audio callback, once per buffer
/// params.apply_to(&mut voice);
/// assert_eq!(voice.freq(), 330.0);
/// ```
#[derive(Debug)]
pub struct SharedParams {
    freq: AtomicU32,
    detune: AtomicU32,
    mix: AtomicU32,
    /// Bumped on every write; compared against `applied` by the reader.
    generation: AtomicU32,
    applied: AtomicU32,
    trigger: AtomicBool,
}

impl Default for SharedParams {
    fn default() -> Self {
        Self::new(DEFAULT_FREQ, DEFAULT_DETUNE, DEFAULT_MIX)
    }
}

impl SharedParams {
    /// Create a store holding the given values.
    ///
    /// The first [`apply_to`](Self::apply_to) always pushes them.
    pub fn new(freq: f32, detune: f32, mix: f32) -> Self {
        Self {
            freq: AtomicU32::new(freq.to_bits()),
            detune: AtomicU32::new(detune.to_bits()),
            mix: AtomicU32::new(mix.to_bits()),
            generation: AtomicU32::new(1),
            applied: AtomicU32::new(0),
            trigger: AtomicBool::new(false),
        }
    }

    /// Set the fundamental in Hz.
    pub fn set_freq(&self, freq: f32) {
        self.freq.store(freq.to_bits(), Ordering::Relaxed);
        self.bump();
    }

    /// Set the detune control.
    pub fn set_detune(&self, detune: f32) {
        self.detune.store(detune.to_bits(), Ordering::Relaxed);
        self.bump();
    }

    /// Set the mix control.
    pub fn set_mix(&self, mix: f32) {
        self.mix.store(mix.to_bits(), Ordering::Relaxed);
        self.bump();
    }

    /// Ask the audio side to re-randomise phases on its next apply.
    pub fn request_trigger(&self) {
        self.trigger.store(true, Ordering::Release);
    }

    /// Last written fundamental.
    pub fn freq(&self) -> f32 {
        f32::from_bits(self.freq.load(Ordering::Relaxed))
    }

    /// Last written detune control (unclamped).
    pub fn detune(&self) -> f32 {
        f32::from_bits(self.detune.load(Ordering::Relaxed))
    }

    /// Last written mix control (unclamped).
    pub fn mix(&self) -> f32 {
        f32::from_bits(self.mix.load(Ordering::Relaxed))
    }

    /// Push pending values into `voice`.
    ///
    /// Call from the audio callback before rendering a buffer. Returns `true`
    /// if anything was applied. When nothing changed this is two atomic loads.
    pub fn apply_to<R: RngCore>(&self, voice: &mut Hypersaw<R>) -> bool {
        let generation = self.generation.load(Ordering::Acquire);
        let changed = generation != self.applied.load(Ordering::Relaxed);
        if changed {
            voice.set_freq(self.freq());
            voice.set_detune(self.detune());
            voice.set_mix(self.mix());
            self.applied.store(generation, Ordering::Relaxed);
        }

        let triggered = self.trigger.swap(false, Ordering::Acquire);
        if triggered {
            voice.trigger();
        }

        changed || triggered
    }

    fn bump(&self) {
        self.generation.fetch_add(1, Ordering::Release);
    }
}
