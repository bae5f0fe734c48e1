//! Coefficient engine: detune and mix controls → per-slot frequencies and gains.
//!
//! Pure functions of `(freq, detune, mix)`. The voice re-runs
//! [`Coefficients::compute`] synchronously from every parameter setter, so
//! the per-sample path only reads the cached result.
//!
//! # Slot layout
//!
//! Seven oscillator slots. Slot [`CENTER_SLOT`] (3) runs at the fundamental;
//! the six [`SIDE_SLOTS`] run at `freq × (1 + scaled_detune × ratio)` with the
//! ratios in [`DETUNE_RATIOS`], three below the fundamental and three above.
//!
//! # Gain curves
//!
//! Measured from the JP-8000 (Szabo, "How to Emulate the Super Saw", 2010):
//!
//! | mix | center gain | side gain |
//! |-----|-------------|-----------|
//! | 0.0 | 0.99785     | 0.04437   |
//! | 0.5 | 0.72102     | 0.50201   |
//! | 1.0 | 0.44419     | 0.59083   |
//!
//! The center gain falls linearly; the side gain is a concave parabola
//! peaking at mix ≈ 0.87.

use libm::powf;

use hypersaw_core::unit_clamp;

/// Number of oscillator slots in a voice.
pub const NUM_OSCILLATORS: usize = 7;

/// Index of the center oscillator.
pub const CENTER_SLOT: usize = 3;

/// Indices of the six side oscillators, in [`DETUNE_RATIOS`] order.
pub const SIDE_SLOTS: [usize; 6] = [0, 1, 2, 4, 5, 6];

/// Relative frequency offsets of the side oscillators at full detune.
pub const DETUNE_RATIOS: [f32; 6] = [
    -0.110_023_13,
    -0.062_884_39,
    -0.019_523_56,
    0.019_912_21,
    0.062_165_38,
    0.107_452_42,
];

/// Fixed divisor applied to the weighted sum before filtering.
///
/// Larger than the worst-case gain sum (≈ 4.14 at mix ≈ 0.87), so
/// coherent peaks of seven unit saws stay below full scale.
pub const NORMALIZATION: f32 = 4.5;

/// Detune curve polynomial, highest degree (x¹¹) first, down to x¹.
const POLY_COEFFS: [f64; 11] = [
    10_028.731_289_163_4,
    -50_818.865_204_592_4,
    111_363.480_872_936_8,
    -138_150.676_108_054_8,
    106_649.679_158_292,
    -53_046.964_275_187_5,
    17_019.951_858_008_0,
    -3_425.083_659_131_8,
    404.270_393_888,
    -24.187_882_439_1,
    0.671_741_763_4,
];

/// Constant term of the detune polynomial.
const POLY_OFFSET: f64 = 0.003_011_559_6;

/// Center oscillator gain for a mix setting.
///
/// `-0.55366·m + 0.99785`. Not clamped; callers pass a unit value.
#[inline]
pub fn center_gain(mix: f32) -> f32 {
    -0.55366 * mix + 0.99785
}

/// Side oscillator gain for a mix setting.
///
/// `-0.73764·m² + 1.2841·m + 0.044372`. Not clamped; callers pass a unit value.
#[inline]
pub fn side_gain(mix: f32) -> f32 {
    -0.73764 * mix * mix + 1.2841 * mix + 0.044372
}

/// Frequency multiplier of side oscillator `index` (0–5) for a curve-scaled
/// detune amount.
///
/// # Panics
///
/// Panics if `index >= 6`.
#[inline]
pub fn side_ratio(index: usize, scaled_detune: f32) -> f32 {
    1.0 + scaled_detune * DETUNE_RATIOS[index]
}

/// Mapping from the 0–1 detune control to the applied detune amount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DetuneCurve {
    /// 11th-degree fit to the hardware's measured detune response.
    ///
    /// Nearly flat through the lower half, steep in the last tenth. Evaluated
    /// in `f64`: the alternating coefficients cancel heavily and lose several
    /// percent of accuracy in `f32` near the top of the range.
    ///
    /// Not zero at zero detune: the constant term 0.0030115596 leaves the
    /// side oscillators within 0.04 % of the fundamental (219.93 to 220.07 Hz
    /// at 220 Hz). Use [`DetuneCurve::Quartic`] for an exact unison.
    #[default]
    Polynomial,
    /// `x⁴`. Same broad shape, exactly zero at zero detune.
    Quartic,
}

impl DetuneCurve {
    /// Map a detune control to the applied amount, clamped to \[0, 1\].
    pub fn apply(self, detune: f32) -> f32 {
        let x = unit_clamp(detune);
        match self {
            Self::Polynomial => {
                let x = f64::from(x);
                let acc = POLY_COEFFS.iter().fold(0.0f64, |acc, &c| acc * x + c);
                unit_clamp((acc * x + POLY_OFFSET) as f32)
            }
            Self::Quartic => unit_clamp(powf(x, 4.0)),
        }
    }
}

/// How the oscillator bank is summed before normalisation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SummingMode {
    /// `side_sum · side_gain + center · center_gain`.
    #[default]
    Weighted,
    /// `side_sum + center`. The mix control has no audible effect.
    Unweighted,
}

/// Derived voice state for one `(freq, detune, mix)` setting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coefficients {
    /// Gain on the center oscillator.
    pub center_gain: f32,
    /// Gain on each side oscillator.
    pub side_gain: f32,
    /// Detune after the curve, in \[0, 1\].
    pub scaled_detune: f32,
    /// Frequency of every slot in Hz. `frequencies[CENTER_SLOT]` is the
    /// fundamental, bit-for-bit.
    pub frequencies: [f32; NUM_OSCILLATORS],
    /// High-pass cutoff in Hz; tracks the fundamental.
    pub filter_cutoff: f32,
}

impl Coefficients {
    /// Compute all derived state.
    ///
    /// `detune` and `mix` are clamped to \[0, 1\] (NaN → 0). `freq` is used
    /// as given.
    pub fn compute(freq: f32, detune: f32, mix: f32, curve: DetuneCurve) -> Self {
        let mix = unit_clamp(mix);
        let scaled_detune = curve.apply(detune);

        let mut frequencies = [freq; NUM_OSCILLATORS];
        for (i, &slot) in SIDE_SLOTS.iter().enumerate() {
            frequencies[slot] = freq * side_ratio(i, scaled_detune);
        }

        Self {
            center_gain: center_gain(mix),
            side_gain: side_gain(mix),
            scaled_detune,
            frequencies,
            filter_cutoff: freq,
        }
    }

    /// Frequency multiplier of every slot relative to the fundamental.
    pub fn ratios(&self) -> [f32; NUM_OSCILLATORS] {
        let mut ratios = [1.0; NUM_OSCILLATORS];
        for (i, &slot) in SIDE_SLOTS.iter().enumerate() {
            ratios[slot] = side_ratio(i, self.scaled_detune);
        }
        ratios
    }
}
