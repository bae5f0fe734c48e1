//! Pitch conversion helpers.

/// Convert MIDI note number to frequency in Hz (A4 = note 69 = 440 Hz).
#[inline]
pub fn midi_to_freq(note: u8) -> f32 {
    440.0 * libm::powf(2.0, (f32::from(note) - 69.0) / 12.0)
}

/// Convert frequency in Hz to a (fractional) MIDI note number.
#[inline]
pub fn freq_to_midi(freq: f32) -> f32 {
    69.0 + 12.0 * libm::log2f(freq / 440.0)
}

/// Frequency of step `index` of `scale` (semitone offsets) above `root`.
///
/// The index wraps, so a sequencer can count upward forever. Notes past the
/// MIDI range saturate at 127. Returns `None` for an empty scale.
pub fn scale_step_freq(root: u8, scale: &[u8], index: usize) -> Option<f32> {
    let offset = *scale.get(index.checked_rem(scale.len())?)?;
    Some(midi_to_freq(root.saturating_add(offset).min(127)))
}
