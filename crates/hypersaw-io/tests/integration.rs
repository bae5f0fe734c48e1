//! Integration tests for rendering a voice to WAV.

use hypersaw_io::{
    PeakMeter, WavSpec, WavStreamWriter, read_wav, read_wav_info, sample_to_i16, write_wav,
};
use hypersaw_synth::Hypersaw;
use tempfile::NamedTempFile;

const BLOCK: usize = 256;

fn render_voice(seed: u64, blocks: usize) -> Vec<f32> {
    let mut voice = Hypersaw::with_seed(48000.0, seed);
    voice.set_freq(220.0);
    let mut out = vec![0.0f32; blocks * BLOCK];
    for block in out.chunks_mut(BLOCK) {
        voice.process_block(block);
        for s in block.iter_mut() {
            *s *= 0.8;
        }
    }
    out
}

#[test]
fn streamed_voice_matches_pcm_conversion() {
    let samples = render_voice(7, 20);
    let file = NamedTempFile::new().unwrap();

    let mut writer = WavStreamWriter::create(file.path(), WavSpec::pcm16_stereo(48000)).unwrap();
    for block in samples.chunks(BLOCK) {
        writer.write_mono_block(block).unwrap();
    }
    writer.finalize().unwrap();

    let info = read_wav_info(file.path()).unwrap();
    assert_eq!(info.channels, 2);
    assert_eq!(info.sample_rate, 48000);
    assert_eq!(info.num_frames, samples.len() as u64);
    assert!((info.duration_secs - samples.len() as f64 / 48000.0).abs() < 1e-9);

    // Both channels hold the same value, so the mono mixdown is exact.
    let (loaded, _) = read_wav(file.path()).unwrap();
    assert_eq!(loaded.len(), samples.len());
    for (&orig, &got) in samples.iter().zip(&loaded) {
        let expected = f32::from(sample_to_i16(orig)) / 32768.0;
        assert!((expected - got).abs() < 1e-6, "{expected} vs {got}");
    }
}

#[test]
fn float_mono_roundtrip_is_lossless() {
    let samples = render_voice(3, 8);
    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &samples, WavSpec::float_mono(48000)).unwrap();

    let (loaded, spec) = read_wav(file.path()).unwrap();
    assert_eq!(spec, WavSpec::float_mono(48000));
    assert_eq!(loaded, samples);
}

#[test]
fn rendered_voice_peak_is_sane() {
    let samples = render_voice(11, 40);
    let mut meter = PeakMeter::new();
    for block in samples.chunks(BLOCK) {
        meter.process_block(block);
    }
    assert_eq!(meter.blocks(), 40);
    let peak = meter.take();
    assert!(peak > 0.05, "voice should be audible, peak {peak}");
    assert!(peak < 1.5, "peak {peak}");
}

#[test]
fn missing_file_is_an_error() {
    assert!(read_wav("/nonexistent/hypersaw.wav").is_err());
    assert!(read_wav_info("/nonexistent/hypersaw.wav").is_err());
}
