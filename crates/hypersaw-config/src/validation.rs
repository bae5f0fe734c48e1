//! Patch validation.
//!
//! The voice itself clamps every control, so a bad patch would still play.
//! Validation exists to tell the user their file doesn't say what they
//! meant. It reports every problem at once rather than stopping at the first.

use thiserror::Error;

use crate::patch::{Modulation, Patch, Sequence, VoiceSettings};

/// Highest MIDI note number.
pub const MAX_MIDI_NOTE: u16 = 127;

/// Lowest sample rate a patch may request, in Hz.
pub const MIN_SAMPLE_RATE: u32 = 8000;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Dotted parameter path, e.g. `voice.detune`.
        param: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// A value that must be strictly positive is not.
    #[error("parameter '{param}' must be positive, got {value}")]
    NotPositive {
        /// Dotted parameter path.
        param: String,
        /// The offending value.
        value: f32,
    },

    /// Sample rate below [`MIN_SAMPLE_RATE`].
    #[error("sample rate {0} Hz is below the {MIN_SAMPLE_RATE} Hz minimum")]
    SampleRateTooLow(u32),

    /// Sequence with no steps.
    #[error("sequence scale is empty")]
    EmptyScale,

    /// `root_note + offset` leaves the MIDI range.
    #[error("sequence note {note} (root {root} + offset {offset}) exceeds MIDI range")]
    NoteOutOfRange {
        /// Root note of the sequence.
        root: u8,
        /// Scale offset that overflows.
        offset: u8,
        /// The resulting note number.
        note: u16,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a whole patch, collecting every error.
pub fn validate_patch(patch: &Patch) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if patch.sample_rate < MIN_SAMPLE_RATE {
        errors.push(ValidationError::SampleRateTooLow(patch.sample_rate));
    }
    check_voice(&patch.voice, &mut errors);
    if let Some(modulation) = &patch.modulation {
        check_modulation(modulation, &mut errors);
    }
    if let Some(sequence) = &patch.sequence {
        check_sequence(sequence, &mut errors);
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

fn check_unit(param: &str, value: f32, errors: &mut Vec<ValidationError>) {
    if !(0.0..=1.0).contains(&value) {
        errors.push(ValidationError::OutOfRange {
            param: param.to_string(),
            value,
            min: 0.0,
            max: 1.0,
        });
    }
}

fn check_positive(param: &str, value: f32, errors: &mut Vec<ValidationError>) {
    if value.is_nan() || value <= 0.0 {
        errors.push(ValidationError::NotPositive {
            param: param.to_string(),
            value,
        });
    }
}

fn check_voice(voice: &VoiceSettings, errors: &mut Vec<ValidationError>) {
    check_positive("voice.freq", voice.freq, errors);
    check_unit("voice.detune", voice.detune, errors);
    check_unit("voice.mix", voice.mix, errors);
    check_unit("voice.filter_drive", voice.filter_drive, errors);
    check_unit("voice.filter_resonance", voice.filter_resonance, errors);
}

fn check_modulation(modulation: &Modulation, errors: &mut Vec<ValidationError>) {
    for (param, value) in [
        ("modulation.detune_lfo_hz", modulation.detune_lfo_hz),
        ("modulation.mix_lfo_hz", modulation.mix_lfo_hz),
    ] {
        if value.is_nan() || value < 0.0 {
            errors.push(ValidationError::OutOfRange {
                param: param.to_string(),
                value,
                min: 0.0,
                max: f32::INFINITY,
            });
        }
    }
}

fn check_sequence(sequence: &Sequence, errors: &mut Vec<ValidationError>) {
    check_positive("sequence.step_seconds", sequence.step_seconds, errors);
    if sequence.scale.is_empty() {
        errors.push(ValidationError::EmptyScale);
    }
    for &offset in &sequence.scale {
        let note = u16::from(sequence.root_note) + u16::from(offset);
        if note > MAX_MIDI_NOTE {
            errors.push(ValidationError::NoteOutOfRange {
                root: sequence.root_note,
                offset,
                note,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patch_is_valid() {
        assert_eq!(validate_patch(&Patch::default()), Ok(()));
    }

    #[test]
    fn test_single_error_is_not_wrapped() {
        let mut patch = Patch::default();
        patch.voice.detune = 1.5;
        let err = validate_patch(&patch).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { ref param, .. } if param == "voice.detune"));
    }

    #[test]
    fn test_all_errors_are_collected() {
        let mut patch = Patch::default();
        patch.sample_rate = 0;
        patch.voice.mix = -0.1;
        patch.voice.filter_resonance = f32::NAN;
        patch.sequence = Some(Sequence {
            root_note: 120,
            step_seconds: 0.0,
            scale: vec![0, 12],
        });

        match validate_patch(&patch) {
            Err(ValidationError::Multiple(errors)) => {
                assert_eq!(errors.len(), 5, "{errors:?}");
                assert!(errors.contains(&ValidationError::SampleRateTooLow(0)));
                assert!(errors.contains(&ValidationError::NoteOutOfRange {
                    root: 120,
                    offset: 12,
                    note: 132
                }));
            }
            other => panic!("expected Multiple, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_scale_rejected() {
        let mut patch = Patch::default();
        patch.sequence = Some(Sequence {
            scale: Vec::new(),
            ..Sequence::default()
        });
        assert_eq!(validate_patch(&patch), Err(ValidationError::EmptyScale));
    }

    #[test]
    fn test_negative_lfo_rate_rejected() {
        let mut patch = Patch::default();
        patch.modulation = Some(Modulation {
            detune_lfo_hz: -0.1,
            mix_lfo_hz: 0.0,
        });
        assert!(validate_patch(&patch).is_err());
    }

    #[test]
    fn test_multiple_display_joins_messages() {
        let err = ValidationError::Multiple(vec![
            ValidationError::SampleRateTooLow(0),
            ValidationError::EmptyScale,
        ]);
        assert_eq!(
            err.to_string(),
            "multiple validation errors: sample rate 0 Hz is below the 8000 Hz minimum; sequence scale is empty"
        );
    }

    #[test]
    fn test_sample_rate_below_audio_floor_rejected() {
        let mut patch = Patch::default();
        patch.sample_rate = 30;
        assert_eq!(
            validate_patch(&patch),
            Err(ValidationError::SampleRateTooLow(30))
        );
        patch.sample_rate = MIN_SAMPLE_RATE;
        assert_eq!(validate_patch(&patch), Ok(()));
    }
}
