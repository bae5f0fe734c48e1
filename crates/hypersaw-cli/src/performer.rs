//! Drives a voice the way the classic demo does: per-sample LFO sweeps of
//! detune and mix, a sample-clocked note sequence, and a fixed output gain.

use hypersaw_config::{Patch, Sequence};
use hypersaw_synth::{Hypersaw, Lfo, Oscillator, OscillatorWaveform};

/// Output gain applied after the voice.
pub const OUTPUT_GAIN: f32 = 0.8;
/// Frequency of the diagnostic tone.
pub const TEST_TONE_HZ: f32 = 440.0;
/// Amplitude of the diagnostic tone. Not scaled by [`OUTPUT_GAIN`].
pub const TEST_TONE_AMPLITUDE: f32 = 0.3;

/// Steps through a [`Sequence`] counting samples.
#[derive(Debug, Clone)]
pub struct Sequencer {
    sequence: Sequence,
    step_frames: usize,
    frame: usize,
    step: usize,
}

impl Sequencer {
    /// Start at step 0.
    pub fn new(sequence: Sequence, sample_rate: f32) -> Self {
        let step_frames = sequence.step_frames(sample_rate);
        Self {
            sequence,
            step_frames,
            frame: 0,
            step: 0,
        }
    }

    /// Advance one sample. Returns the new frequency when a step boundary is crossed.
    #[inline]
    pub fn tick(&mut self) -> Option<f32> {
        self.frame += 1;
        if self.frame < self.step_frames {
            return None;
        }
        self.frame = 0;
        self.step += 1;
        self.sequence.freq_at(self.step)
    }

    /// Steps taken so far.
    pub fn step(&self) -> usize {
        self.step
    }
}

struct Sweep {
    detune: Lfo,
    mix: Lfo,
}

enum Source {
    Voice {
        voice: Box<Hypersaw>,
        sweep: Option<Sweep>,
        sequencer: Option<Sequencer>,
    },
    TestTone(Oscillator),
}

/// Sample source for render and play.
pub struct Performer {
    source: Source,
}

impl Performer {
    /// Build from a patch at `sample_rate`, with the patch's sequence clocked
    /// internally.
    pub fn new(patch: &Patch, sample_rate: f32) -> Self {
        let voice = patch.build_voice_at(sample_rate);
        let sweep = patch.modulation.map(|m| Sweep {
            detune: Lfo::new(sample_rate, m.detune_lfo_hz),
            mix: Lfo::new(sample_rate, m.mix_lfo_hz),
        });
        let sequencer = patch
            .sequence
            .clone()
            .map(|s| Sequencer::new(s, sample_rate));
        Self {
            source: Source::Voice {
                voice: Box::new(voice),
                sweep,
                sequencer,
            },
        }
    }

    /// A 440 Hz sine at 0.3 in place of the voice, for checking the output path.
    pub fn test_tone(sample_rate: f32) -> Self {
        let mut osc = Oscillator::new(sample_rate);
        osc.set_waveform(OscillatorWaveform::Sine);
        osc.set_frequency(TEST_TONE_HZ);
        osc.set_amplitude(TEST_TONE_AMPLITUDE);
        Self {
            source: Source::TestTone(osc),
        }
    }

    /// Drop the internal sequencer so pitch can be driven externally.
    pub fn without_sequencer(mut self) -> Self {
        if let Source::Voice { sequencer, .. } = &mut self.source {
            *sequencer = None;
        }
        self
    }

    /// The voice, unless this is a test tone.
    pub fn voice_mut(&mut self) -> Option<&mut Hypersaw> {
        match &mut self.source {
            Source::Voice { voice, .. } => Some(&mut **voice),
            Source::TestTone(_) => None,
        }
    }

    /// Next output sample.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        match &mut self.source {
            Source::Voice {
                voice,
                sweep,
                sequencer,
            } => {
                if let Some(sweep) = sweep {
                    voice.set_detune(sweep.detune.next_unipolar());
                    voice.set_mix(sweep.mix.next_unipolar());
                }
                let out = voice.process() * OUTPUT_GAIN;
                if let Some(freq) = sequencer.as_mut().and_then(Sequencer::tick) {
                    voice.set_freq(freq);
                }
                out
            }
            Source::TestTone(osc) => osc.advance(),
        }
    }

    /// Fill `block` with consecutive samples.
    pub fn render_block(&mut self, block: &mut [f32]) {
        for s in block.iter_mut() {
            *s = self.next_sample();
        }
    }
}
