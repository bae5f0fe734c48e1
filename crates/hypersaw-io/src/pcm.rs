//! Sample format conversion and level metering.

/// Convert a float sample to 16-bit PCM.
///
/// Scales by 32767, rounds to nearest, and clamps to the full i16 range, so
/// overs saturate rather than wrap. NaN converts to 0.
#[inline]
pub fn sample_to_i16(sample: f32) -> i16 {
    let scaled = (sample * 32767.0).round();
    scaled.clamp(-32768.0, 32767.0) as i16
}

/// Copy each mono sample to every channel of an interleaved buffer.
///
/// `output.len()` should be a multiple of `channels`; a trailing partial
/// frame is left untouched. Frames beyond `mono.len()` are silenced.
pub fn duplicate_to_channels(mono: &[f32], output: &mut [f32], channels: usize) {
    if channels == 0 {
        return;
    }
    for (i, frame) in output.chunks_exact_mut(channels).enumerate() {
        frame.fill(mono.get(i).copied().unwrap_or(0.0));
    }
}

/// Mono float samples → interleaved 16-bit PCM with `channels` copies per frame.
pub fn mono_to_interleaved_i16(mono: &[f32], channels: usize) -> Vec<i16> {
    let mut out = Vec::with_capacity(mono.len() * channels);
    for &s in mono {
        let v = sample_to_i16(s);
        out.extend(std::iter::repeat_n(v, channels));
    }
    out
}

/// Tracks the absolute peak of a signal over a reporting window.
#[derive(Debug, Clone, Default)]
pub struct PeakMeter {
    peak: f32,
    blocks: u32,
}

impl PeakMeter {
    /// Create an empty meter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one block and count it.
    pub fn process_block(&mut self, block: &[f32]) {
        self.peak = block.iter().fold(self.peak, |p, s| p.max(s.abs()));
        self.blocks += 1;
    }

    /// Peak since the last reset.
    pub fn peak(&self) -> f32 {
        self.peak
    }

    /// Blocks seen since the last reset.
    pub fn blocks(&self) -> u32 {
        self.blocks
    }

    /// Return the peak and start a new window.
    pub fn take(&mut self) -> f32 {
        let peak = self.peak;
        self.peak = 0.0;
        self.blocks = 0;
        peak
    }
}
