//! Core Effect trait.
//!
//! The [`Effect`] trait is the common interface of every sample processor in
//! the workspace, providing single-sample and block-based processing.
//!
//! ## Design Decisions
//!
//! - **Mono processing**: Single `f32` input/output. The hypersaw voice is a
//!   mono source; stereo duplication happens host-side.
//!
//! - **Object-safe**: `dyn Effect` works, though the voice owns its filter by
//!   value and uses static dispatch.
//!
//! - **No allocations**: All methods are designed to be called in real-time
//!   audio contexts with zero heap allocations.

/// Core trait for sample processors.
///
/// # Example
///
/// ```rust
/// use hypersaw_core::Effect;
///
/// struct Gain {
///     gain: f32,
/// }
///
/// impl Effect for Gain {
///     fn process(&mut self, input: f32) -> f32 {
///         input * self.gain
///     }
///
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///
///     fn reset(&mut self) {}
/// }
/// ```
pub trait Effect {
    /// Process a single sample.
    ///
    /// For processors with internal state (filters), this advances the state
    /// by one sample.
    fn process(&mut self, input: f32) -> f32;

    /// Process a block of samples.
    ///
    /// Default implementation calls `process()` for each sample.
    ///
    /// # Panics
    /// Debug builds panic if `input.len() != output.len()`
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(
            input.len(),
            output.len(),
            "Input and output buffers must have same length"
        );
        for (inp, out) in input.iter().zip(output.iter_mut()) {
            *out = self.process(*inp);
        }
    }

    /// Process a block of samples in-place.
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Update the sample rate and recompute rate-dependent coefficients.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear internal state without changing parameters.
    fn reset(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Gain(f32);

    impl Effect for Gain {
        fn process(&mut self, input: f32) -> f32 {
            input * self.0
        }
        fn set_sample_rate(&mut self, _: f32) {}
        fn reset(&mut self) {}
    }

    #[test]
    fn test_process_block() {
        let mut gain = Gain(0.5);
        let input = [1.0, 2.0, 3.0];
        let mut output = [0.0; 3];
        gain.process_block(&input, &mut output);
        assert_eq!(output, [0.5, 1.0, 1.5]);
    }

    #[test]
    fn test_process_block_inplace() {
        let mut gain = Gain(2.0);
        let mut buffer = [1.0, -1.0, 0.25];
        gain.process_block_inplace(&mut buffer);
        assert_eq!(buffer, [2.0, -2.0, 0.5]);
    }

    #[test]
    fn test_dyn_dispatch() {
        let mut gain = Gain(3.0);
        let effect: &mut dyn Effect = &mut gain;
        assert_eq!(effect.process(1.0), 3.0);
    }
}
