//! Mathematical utility functions for DSP.
//!
//! All functions are allocation-free and suitable for `no_std`.
//!
//! | Function | Replaces | Use case | Max error |
//! |----------|----------|----------|-----------|
//! | [`fast_tan`] | `libm::tanf` | Filter coefficients | < 0.1% (f < sr/4) |
//! | [`fast_tanh`] | - | Filter drive saturation | exact (`libm::tanhf`) |
//! | [`flush_denormal`] | - | Integrator state | - |
//! | [`unit_clamp`] | `f32::clamp` | User-facing 0–1 controls | - |

use libm::tanhf;

/// Fast tangent via a [3/2] Padé approximant.
///
/// `tan(x) ≈ x·(15 − x²) / (15 − 6x²)`
///
/// # Accuracy
///
/// < 0.1% relative error for x ∈ \[0, π/4\], i.e. cutoffs up to a quarter of
/// the sample rate. Beyond π/3 the error grows as tan approaches its pole.
///
/// # Examples
///
/// ```
/// use hypersaw_core::math::fast_tan;
///
/// // 1 kHz @ 48 kHz: argument ≈ 0.0654
/// let x = core::f32::consts::PI * 1000.0 / 48000.0;
/// let exact = libm::tanf(x);
/// assert!((fast_tan(x) - exact).abs() / exact < 0.001);
/// ```
#[inline]
pub fn fast_tan(x: f32) -> f32 {
    let x2 = x * x;
    x * (15.0 - x2) / (15.0 - 6.0 * x2)
}

/// Hyperbolic tangent used for soft saturation.
///
/// Delegates to `libm::tanhf`; kept behind one name so the filter's drive
/// stage can switch approximations in one place.
#[inline]
pub fn fast_tanh(x: f32) -> f32 {
    tanhf(x)
}

/// Flush subnormal (denormalized) floats to zero.
///
/// Subnormal floats cause severe CPU slowdowns on most architectures. Values
/// below 1e-20 are replaced with zero, leaving margin before the IEEE 754
/// subnormal range begins. Use in integrator and feedback state.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Clamp a user-facing control into \[0, 1\].
///
/// NaN maps to 0.0, so the result is always a valid unit value.
#[inline]
pub fn unit_clamp(x: f32) -> f32 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}
