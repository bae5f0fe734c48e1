//! Patch file format and operations.

use hypersaw_synth::{
    DEFAULT_DETUNE, DEFAULT_FREQ, DEFAULT_MIX, DetuneCurve, Hypersaw, HypersawConfig,
    OscillatorWaveform, SummingMode, scale_step_freq,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::factory::get_factory_patch;
use crate::validation::{ValidationResult, validate_patch};

/// Minor-pentatonic-ish run over two octaves, as played by the classic demo.
pub const DEMO_SCALE: [u8; 24] = [
    0, 3, 5, 7, 9, 10, 12, 15, 17, 19, 21, 22, 24, 27, 29, 31, 32, 34, 36, 39, 41, 43, 46, 48,
];

/// A complete voice setup: static controls plus optional modulation and
/// note sequence.
///
/// # TOML Format
///
/// ```toml
/// name = "Trance lead"
/// sample_rate = 48000
///
/// [voice]
/// detune = 0.5
/// mix = 0.5
/// detune_curve = "polynomial"
/// summing = "weighted"
/// filter_drive = 0.0
/// filter_resonance = 0.1
/// waveform = "saw"
/// seed = 1234
///
/// [modulation]
/// detune_lfo_hz = 0.1
/// mix_lfo_hz = 0.07
///
/// [sequence]
/// root_note = 48
/// step_seconds = 1.0
/// scale = [0, 3, 5, 7]
/// ```
///
/// Every field except `name` may be omitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patch {
    /// Name of the patch.
    pub name: String,

    /// Optional description of the patch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sample rate hint (defaults to 48000). Real-time playback uses the
    /// device rate instead.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Static voice controls.
    #[serde(default)]
    pub voice: VoiceSettings,

    /// Slow LFOs sweeping detune and mix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modulation: Option<Modulation>,

    /// Host-side note sequence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<Sequence>,
}

fn default_sample_rate() -> u32 {
    48000
}

/// `[voice]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VoiceSettings {
    /// Fundamental in Hz, used when no sequence is given.
    pub freq: f32,
    /// Detune control, 0–1.
    pub detune: f32,
    /// Mix control, 0–1.
    pub mix: f32,
    /// Detune control mapping.
    pub detune_curve: DetuneCurve,
    /// Oscillator bank summing.
    pub summing: SummingMode,
    /// Filter saturation, 0–1.
    pub filter_drive: f32,
    /// Filter resonance on the 0–1 control scale.
    pub filter_resonance: f32,
    /// Waveform for all seven oscillators.
    pub waveform: OscillatorWaveform,
    /// Seed for phase randomisation. Omitted means a fresh seed every run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        let config = HypersawConfig::default();
        Self {
            freq: DEFAULT_FREQ,
            detune: DEFAULT_DETUNE,
            mix: DEFAULT_MIX,
            detune_curve: config.detune_curve,
            summing: config.summing,
            filter_drive: config.filter_drive,
            filter_resonance: config.filter_resonance,
            waveform: OscillatorWaveform::Saw,
            seed: None,
        }
    }
}

impl VoiceSettings {
    /// Voicing choices as the synth's configuration type.
    pub fn to_config(&self) -> HypersawConfig {
        HypersawConfig {
            detune_curve: self.detune_curve,
            summing: self.summing,
            filter_drive: self.filter_drive,
            filter_resonance: self.filter_resonance,
        }
    }
}

/// `[modulation]` section: two free-running sine LFOs remapped to 0–1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Modulation {
    /// Detune LFO rate in Hz. Zero holds detune at its LFO start value.
    pub detune_lfo_hz: f32,
    /// Mix LFO rate in Hz.
    pub mix_lfo_hz: f32,
}

impl Default for Modulation {
    fn default() -> Self {
        Self {
            detune_lfo_hz: 0.1,
            mix_lfo_hz: 0.07,
        }
    }
}

/// `[sequence]` section: a looping run of semitone offsets above a root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Sequence {
    /// MIDI note the offsets are added to.
    pub root_note: u8,
    /// Seconds per step.
    pub step_seconds: f32,
    /// Semitone offsets, played in order and looped.
    pub scale: Vec<u8>,
}

impl Default for Sequence {
    fn default() -> Self {
        Self {
            root_note: 48,
            step_seconds: 1.0,
            scale: DEMO_SCALE.to_vec(),
        }
    }
}

impl Sequence {
    /// Frequency of step `index`, wrapping around the scale.
    pub fn freq_at(&self, index: usize) -> Option<f32> {
        scale_step_freq(self.root_note, &self.scale, index)
    }

    /// Step length in samples, at least one.
    pub fn step_frames(&self, sample_rate: f32) -> usize {
        let frames = (self.step_seconds * sample_rate).round();
        if frames.is_finite() && frames >= 1.0 {
            frames as usize
        } else {
            1
        }
    }
}

impl Patch {
    /// Create a patch with default voice settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sample_rate: default_sample_rate(),
            voice: VoiceSettings::default(),
            modulation: None,
            sequence: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the sample rate hint.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Replace the voice section.
    pub fn with_voice(mut self, voice: VoiceSettings) -> Self {
        self.voice = voice;
        self
    }

    /// Add detune/mix LFOs.
    pub fn with_modulation(mut self, modulation: Modulation) -> Self {
        self.modulation = Some(modulation);
        self
    }

    /// Add a note sequence.
    pub fn with_sequence(mut self, sequence: Sequence) -> Self {
        self.sequence = Some(sequence);
        self
    }

    /// Load a patch from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let patch = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), name = %patch.name, "patch loaded");
        Ok(patch)
    }

    /// Load a patch from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load a file if `name_or_path` is an existing path, otherwise look up a
    /// factory patch of that name.
    pub fn resolve(name_or_path: &str) -> Result<Self, ConfigError> {
        let path = Path::new(name_or_path);
        if path.is_file() {
            return Self::load(path);
        }
        get_factory_patch(name_or_path)
            .ok_or_else(|| ConfigError::PatchNotFound(name_or_path.to_string()))
    }

    /// Save the patch to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the patch to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every value, reporting all problems.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_patch(self)
    }

    /// Build a voice at the patch's sample rate.
    pub fn build_voice(&self) -> Hypersaw {
        self.build_voice_at(self.sample_rate as f32)
    }

    /// Build a voice at an explicit sample rate, e.g. a device's.
    ///
    /// The voice starts on the first sequence note when there is a sequence,
    /// otherwise on `voice.freq`.
    pub fn build_voice_at(&self, sample_rate: f32) -> Hypersaw {
        let mut voice = match self.voice.seed {
            Some(seed) => Hypersaw::with_seed(sample_rate, seed),
            None => Hypersaw::from_entropy(sample_rate),
        };
        voice.set_config(self.voice.to_config());
        voice.set_all_waveforms(self.voice.waveform);
        voice.set_detune(self.voice.detune);
        voice.set_mix(self.voice.mix);
        let freq = self
            .sequence
            .as_ref()
            .and_then(|s| s.freq_at(0))
            .unwrap_or(self.voice.freq);
        voice.set_freq(freq);
        voice
    }
}

impl Default for Patch {
    fn default() -> Self {
        Self::new("Init")
    }
}
